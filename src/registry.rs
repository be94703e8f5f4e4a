use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DefaultOnNull;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::parser::{MAX_IBAN_LENGTH, MIN_IBAN_LENGTH};

/// Total IBAN length per country, as published in the SWIFT IBAN registry (ISO 13616).
const ISO_13616_LENGTHS: [(&str, usize); 89] = [
    ("AD", 24),
    ("AE", 23),
    ("AL", 28),
    ("AT", 20),
    ("AZ", 28),
    ("BA", 20),
    ("BE", 16),
    ("BG", 22),
    ("BH", 22),
    ("BI", 27),
    ("BR", 29),
    ("BY", 28),
    ("CH", 21),
    ("CR", 22),
    ("CY", 28),
    ("CZ", 24),
    ("DE", 22),
    ("DJ", 27),
    ("DK", 18),
    ("DO", 28),
    ("EE", 20),
    ("EG", 29),
    ("ES", 24),
    ("FI", 18),
    ("FK", 18),
    ("FO", 18),
    ("FR", 27),
    ("GB", 22),
    ("GE", 22),
    ("GI", 23),
    ("GL", 18),
    ("GR", 27),
    ("GT", 28),
    ("HN", 28),
    ("HR", 21),
    ("HU", 28),
    ("IE", 22),
    ("IL", 23),
    ("IQ", 23),
    ("IS", 26),
    ("IT", 27),
    ("JO", 30),
    ("KW", 30),
    ("KZ", 20),
    ("LB", 28),
    ("LC", 32),
    ("LI", 21),
    ("LT", 20),
    ("LU", 20),
    ("LV", 21),
    ("LY", 25),
    ("MC", 27),
    ("MD", 24),
    ("ME", 22),
    ("MK", 19),
    ("MN", 20),
    ("MR", 27),
    ("MT", 31),
    ("MU", 30),
    ("NI", 28),
    ("NL", 18),
    ("NO", 15),
    ("OM", 23),
    ("PK", 24),
    ("PL", 28),
    ("PS", 29),
    ("PT", 25),
    ("QA", 29),
    ("RO", 24),
    ("RS", 22),
    ("RU", 33),
    ("SA", 24),
    ("SC", 31),
    ("SD", 18),
    ("SE", 24),
    ("SI", 19),
    ("SK", 24),
    ("SM", 27),
    ("SO", 23),
    ("ST", 25),
    ("SV", 28),
    ("TL", 23),
    ("TN", 24),
    ("TR", 26),
    ("UA", 29),
    ("VA", 22),
    ("VG", 24),
    ("XK", 20),
    ("YE", 30),
];

lazy_static! {
    /// The complete ISO 13616 table, built on first use.
    pub static ref DEFAULT_REGISTRY: CountryRegistry = CountryRegistry::iso13616();
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Country code {code:?} must be exactly two uppercase ASCII letters")]
    InvalidCountryCode { code: String },

    #[error("IBAN length {length} for country {code} is outside of the 5..=34 range")]
    InvalidLength { code: String, length: usize },
}

/// Immutable mapping from a two letter country code to the total length of the IBANs
/// issued in that country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, usize>", into = "BTreeMap<String, usize>")]
pub struct CountryRegistry {
    lengths: HashMap<String, usize>,
}

impl CountryRegistry {
    pub fn iso13616() -> Self {
        Self {
            lengths: ISO_13616_LENGTHS
                .iter()
                .map(|(code, length)| (code.to_string(), *length))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            lengths: HashMap::new(),
        }
    }

    /// Builds a registry from arbitrary entries. Every entry is checked, later entries
    /// override earlier ones for the same country.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut lengths = HashMap::new();
        for (code, length) in entries {
            let code = code.into();
            check_entry(&code, length)?;
            lengths.insert(code, length);
        }
        Ok(Self { lengths })
    }

    /// Expected total IBAN length for the country, `None` if the country does not issue IBANs.
    pub fn lookup(&self, country_code: &str) -> Option<usize> {
        self.lengths.get(country_code).copied()
    }

    pub fn contains(&self, country_code: &str) -> bool {
        self.lengths.contains_key(country_code)
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Entries sorted by country code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .lengths
            .iter()
            .map(|(code, length)| (code.as_str(), *length))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }

    pub fn with_country(&self, code: &str, length: usize) -> Result<Self, RegistryError> {
        check_entry(code, length)?;
        Ok(self.mutate_clone(|x| {
            x.lengths.insert(code.to_owned(), length);
        }))
    }

    pub fn without_country(&self, code: &str) -> Self {
        self.mutate_clone(|x| {
            x.lengths.remove(code);
        })
    }

    fn mutate_clone(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        modify(&mut clone);
        clone
    }
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::iso13616()
    }
}

impl TryFrom<HashMap<String, usize>> for CountryRegistry {
    type Error = RegistryError;

    fn try_from(entries: HashMap<String, usize>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<CountryRegistry> for BTreeMap<String, usize> {
    fn from(registry: CountryRegistry) -> Self {
        registry.lengths.into_iter().collect()
    }
}

fn check_entry(code: &str, length: usize) -> Result<(), RegistryError> {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(RegistryError::InvalidCountryCode {
            code: code.to_owned(),
        });
    }
    if !(MIN_IBAN_LENGTH..=MAX_IBAN_LENGTH).contains(&length) {
        return Err(RegistryError::InvalidLength {
            code: code.to_owned(),
            length,
        });
    }
    Ok(())
}

/// Registry configuration, usually loaded from JSON.
///
/// `countries` overrides or extends the ISO 13616 table, or replaces it entirely when
/// `include_iso13616` is false.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RegistryConfig {
    #[serde(default = "default_include_iso13616")]
    pub include_iso13616: bool,

    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub countries: BTreeMap<String, usize>,
}

fn default_include_iso13616() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            include_iso13616: true,
            countries: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    pub fn build(&self) -> Result<CountryRegistry, RegistryError> {
        let base = if self.include_iso13616 {
            CountryRegistry::iso13616()
        } else {
            CountryRegistry::empty()
        };
        self.countries
            .iter()
            .try_fold(base, |registry, (code, length)| {
                registry.with_country(code, *length)
            })
    }
}
