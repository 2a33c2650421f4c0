//! Configuration Management
//!
//! Reads the OCI SDK config file (`~/.oci/config` by default) and selects a
//! profile. The file is never written.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Profile used when neither `--profile` nor `OCI_CONFIG_PROFILE` is set
pub const DEFAULT_PROFILE: &str = "DEFAULT";

pub const PROFILE_ENV: &str = "OCI_CONFIG_PROFILE";
pub const PATH_ENV: &str = "OCI_CONFIG_PATH";

const REQUIRED_KEYS: &[&str] = &["user", "fingerprint", "key_file", "tenancy", "region"];

/// Where to read credentials from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub profile: String,
}

impl ConfigSource {
    /// Pick path and profile (CLI > environment > SDK default)
    pub fn from_env(path: Option<PathBuf>, profile: Option<String>) -> Self {
        Self::resolve(
            path,
            profile,
            std::env::var_os(PATH_ENV).map(PathBuf::from),
            std::env::var(PROFILE_ENV).ok(),
        )
    }

    fn resolve(
        path: Option<PathBuf>,
        profile: Option<String>,
        env_path: Option<PathBuf>,
        env_profile: Option<String>,
    ) -> Self {
        let path = path
            .or(env_path)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(default_config_path);
        let profile = profile
            .or(env_profile)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        Self {
            path: expand_home(&path),
            profile,
        }
    }

    pub fn load(&self) -> Result<OciConfig> {
        OciConfig::load(&self.path, &self.profile)
    }
}

/// One resolved profile of the OCI config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciConfig {
    pub profile: String,
    pub user: String,
    pub fingerprint: String,
    pub key_file: PathBuf,
    pub tenancy: String,
    pub region: String,
    pub pass_phrase: Option<String>,
}

impl OciConfig {
    /// Load a profile from disk
    pub fn load(path: &Path, profile: &str) -> Result<Self> {
        tracing::debug!("Loading OCI config profile {} from {:?}", profile, path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(path, format!("Could not read OCI config file: {e}"))
        })?;

        Self::parse(&content, profile, path)
    }

    /// Parse config file content; `path` is only used for error reporting
    pub fn parse(content: &str, profile: &str, path: &Path) -> Result<Self> {
        let sections = parse_sections(content);

        let Some(selected) = sections.get(profile) else {
            return Err(Error::config(
                path,
                format!("Profile '{profile}' not found in OCI config file"),
            ));
        };

        // Named profiles fall back to DEFAULT for keys they leave out
        let defaults = sections.get(DEFAULT_PROFILE);
        let lookup = |key: &str| -> Option<String> {
            selected
                .get(key)
                .or_else(|| defaults.and_then(|d| d.get(key)))
                .filter(|v| !v.is_empty())
                .cloned()
        };

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|&key| lookup(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::config(
                path,
                format!(
                    "Profile '{profile}' is missing required key(s): {}",
                    missing.join(", ")
                ),
            ));
        }

        let value = |key: &str| lookup(key).unwrap_or_default();

        Ok(Self {
            profile: profile.to_string(),
            user: value("user"),
            fingerprint: value("fingerprint"),
            key_file: expand_home(Path::new(&value("key_file"))),
            tenancy: value("tenancy"),
            region: value("region"),
            pass_phrase: lookup("pass_phrase"),
        })
    }

    /// `keyId` for the HTTP signature
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

fn parse_sections(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!("Ignoring malformed line in OCI config file");
            continue;
        };

        match &current {
            Some(section) => {
                sections
                    .entry(section.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
            None => tracing::warn!("Ignoring key '{}' outside of any profile", key.trim()),
        }
    }

    sections
}

fn default_config_path() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        return home.join(".oci").join("config");
    }
    PathBuf::from(".oci").join("config")
}

/// Expand a leading `~` against the home directory
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
