use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::parser::{parse, ParseError};
use crate::registry::DEFAULT_REGISTRY;
use crate::validator::{assess, IbanValidator, Validity};

const BLOCK_SIZE: usize = 4;

/// A structurally well formed IBAN.
///
/// Values only come out of [`parse`], so the country code is always two uppercase letters
/// and the BBAN only holds uppercase letters and digits. Whether the IBAN is actually valid
/// (registered country, expected length, checksum) is a separate question answered by
/// [`Iban::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban {
    country_code: String,
    check_value: u8,
    bban: String,
}

impl Iban {
    pub(crate) fn new(country_code: String, check_value: u8, bban: String) -> Self {
        Self {
            country_code,
            check_value,
            bban,
        }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// The check digits, always two characters ("04", not "4").
    pub fn check_digits(&self) -> String {
        format!("{:02}", self.check_value)
    }

    pub fn check_value(&self) -> u8 {
        self.check_value
    }

    pub fn bban(&self) -> &str {
        &self.bban
    }

    /// Compact representation without any separator, e.g. `DE68210501700012345678`.
    pub fn machine_form(&self) -> String {
        format!("{}{:02}{}", self.country_code, self.check_value, self.bban)
    }

    /// The machine form split into blocks of four characters, e.g.
    /// `DE68 2105 0170 0012 3456 78`.
    pub fn human_readable(&self) -> String {
        let machine_form = self.machine_form();
        let mut result =
            String::with_capacity(machine_form.len() + machine_form.len() / BLOCK_SIZE);
        for (i, c) in machine_form.chars().enumerate() {
            if i > 0 && i % BLOCK_SIZE == 0 {
                result.push(' ');
            }
            result.push(c);
        }
        result
    }

    /// Checks the IBAN against the ISO 13616 registry: the country must issue IBANs, the
    /// length must match and the MOD 97-10 checksum must hold.
    pub fn validate(&self) -> bool {
        self.validity().is_valid()
    }

    pub fn validity(&self) -> Validity {
        assess(self, &DEFAULT_REGISTRY)
    }

    pub fn validate_with(&self, validator: &IbanValidator) -> bool {
        validator.validate(self)
    }
}

/// Writes the machine form, or the human readable form with `{:#}`.
impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str(&self.human_readable())
        } else {
            f.write_str(&self.machine_form())
        }
    }
}

impl FromStr for Iban {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<&str> for Iban {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value)
    }
}

impl Serialize for Iban {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.machine_form())
    }
}

impl<'de> Deserialize<'de> for Iban {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}
