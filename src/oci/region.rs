//! OCI Regions
//!
//! Maps the `region` of a config profile, given either as a region identifier
//! (`us-phoenix-1`) or a short key (`phx`), to the realm domain its service
//! endpoints live under.

/// Realms with a known second-level domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Realm {
    /// Commercial
    Oc1,
    /// US Government (FedRAMP)
    Oc2,
    /// US Government (DISA IL5)
    Oc3,
    /// UK Government
    Oc4,
}

impl Realm {
    pub fn domain(self) -> &'static str {
        match self {
            Realm::Oc1 => "oraclecloud.com",
            Realm::Oc2 | Realm::Oc3 => "oraclegovcloud.com",
            Realm::Oc4 => "oraclegovcloud.uk",
        }
    }
}

/// (short key, region identifier, realm)
const REGIONS: &[(&str, &str, Realm)] = &[
    ("phx", "us-phoenix-1", Realm::Oc1),
    ("iad", "us-ashburn-1", Realm::Oc1),
    ("sjc", "us-sanjose-1", Realm::Oc1),
    ("ord", "us-chicago-1", Realm::Oc1),
    ("yyz", "ca-toronto-1", Realm::Oc1),
    ("yul", "ca-montreal-1", Realm::Oc1),
    ("fra", "eu-frankfurt-1", Realm::Oc1),
    ("ams", "eu-amsterdam-1", Realm::Oc1),
    ("zrh", "eu-zurich-1", Realm::Oc1),
    ("mad", "eu-madrid-1", Realm::Oc1),
    ("cdg", "eu-paris-1", Realm::Oc1),
    ("arn", "eu-stockholm-1", Realm::Oc1),
    ("mrs", "eu-marseille-1", Realm::Oc1),
    ("lin", "eu-milan-1", Realm::Oc1),
    ("lhr", "uk-london-1", Realm::Oc1),
    ("cwl", "uk-cardiff-1", Realm::Oc1),
    ("nrt", "ap-tokyo-1", Realm::Oc1),
    ("kix", "ap-osaka-1", Realm::Oc1),
    ("icn", "ap-seoul-1", Realm::Oc1),
    ("yny", "ap-chuncheon-1", Realm::Oc1),
    ("bom", "ap-mumbai-1", Realm::Oc1),
    ("hyd", "ap-hyderabad-1", Realm::Oc1),
    ("syd", "ap-sydney-1", Realm::Oc1),
    ("mel", "ap-melbourne-1", Realm::Oc1),
    ("sin", "ap-singapore-1", Realm::Oc1),
    ("gru", "sa-saopaulo-1", Realm::Oc1),
    ("vcp", "sa-vinhedo-1", Realm::Oc1),
    ("scl", "sa-santiago-1", Realm::Oc1),
    ("jed", "me-jeddah-1", Realm::Oc1),
    ("dxb", "me-dubai-1", Realm::Oc1),
    ("auh", "me-abudhabi-1", Realm::Oc1),
    ("jnb", "af-johannesburg-1", Realm::Oc1),
    ("mtz", "il-jerusalem-1", Realm::Oc1),
    ("qro", "mx-queretaro-1", Realm::Oc1),
    ("lfi", "us-langley-1", Realm::Oc2),
    ("luf", "us-luke-1", Realm::Oc2),
    ("ric", "us-gov-ashburn-1", Realm::Oc3),
    ("pia", "us-gov-chicago-1", Realm::Oc3),
    ("tus", "us-gov-phoenix-1", Realm::Oc3),
    ("ltn", "uk-gov-london-1", Realm::Oc4),
    ("brs", "uk-gov-cardiff-1", Realm::Oc4),
];

/// A region resolved from config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub realm: Realm,
}

impl Region {
    /// Resolve a region identifier or short key
    ///
    /// Identifiers missing from the table are kept as given and assumed to be
    /// in the commercial realm.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();

        let known = REGIONS
            .iter()
            .find(|(short, id, _)| *short == raw || *id == raw);

        match known {
            Some((_, id, realm)) => Self {
                id: id.to_string(),
                realm: *realm,
            },
            None => {
                tracing::debug!("Region {} is not in the region table, assuming oc1", raw);
                Self {
                    id: raw,
                    realm: Realm::Oc1,
                }
            }
        }
    }

    /// Host of a regional service, e.g. `identity` or `functions`
    pub fn service_host(&self, service: &str) -> String {
        format!("{}.{}.oci.{}", service, self.id, self.realm.domain())
    }
}
