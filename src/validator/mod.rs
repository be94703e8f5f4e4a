mod metrics;

use strum::IntoStaticStr;

use crate::checksum::iban_remainder;
use crate::iban::Iban;
use crate::observability::labels::Labels;
use crate::parser::{parse, ParseError};
use crate::registry::{CountryRegistry, DEFAULT_REGISTRY};
use crate::validator::metrics::Metrics;

/// Length of the country code and check digits in front of the BBAN.
const PREFIX_LENGTH: usize = 4;

pub trait Validator: Send + Sync {
    fn is_valid_match(&self, candidate: &str) -> bool;
}

/// Outcome of validating a parsed IBAN. Only [`Validity::Valid`] means the IBAN can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Validity {
    Valid,
    /// The country code is not in the registry.
    UnknownCountry,
    WrongLength {
        expected: usize,
        actual: usize,
    },
    /// Length is right, but the MOD 97-10 remainder is not 1.
    ChecksumMismatch {
        remainder: u32,
    },
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

pub(crate) fn assess(iban: &Iban, registry: &CountryRegistry) -> Validity {
    let Some(expected) = registry.lookup(iban.country_code()) else {
        return Validity::UnknownCountry;
    };

    let actual = PREFIX_LENGTH + iban.bban().chars().count();
    if actual != expected {
        return Validity::WrongLength { expected, actual };
    }

    match iban_remainder(iban) {
        1 => Validity::Valid,
        remainder => Validity::ChecksumMismatch { remainder },
    }
}

/// Decides whether parsed IBANs are valid against a country registry, and reports every
/// decision through the `metrics` facade.
pub struct IbanValidator {
    registry: CountryRegistry,
    metrics: Metrics,
}

impl IbanValidator {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> IbanValidatorBuilder {
        IbanValidatorBuilder::new()
    }

    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }

    pub fn assess(&self, iban: &Iban) -> Validity {
        let validity = assess(iban, &self.registry);
        self.metrics.record_validity(&validity);
        validity
    }

    pub fn validate(&self, iban: &Iban) -> bool {
        self.assess(iban).is_valid()
    }

    /// Parses `raw` and validates the result. Parse failures are counted before being
    /// returned.
    pub fn parse_and_assess(&self, raw: &str) -> Result<Validity, ParseError> {
        match parse(raw) {
            Ok(iban) => Ok(self.assess(&iban)),
            Err(err) => {
                self.metrics.record_parse_failure(err.kind());
                Err(err)
            }
        }
    }
}

impl Default for IbanValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for IbanValidator {
    fn is_valid_match(&self, candidate: &str) -> bool {
        self.parse_and_assess(candidate)
            .is_ok_and(|validity| validity.is_valid())
    }
}

pub struct IbanValidatorBuilder {
    registry: Option<CountryRegistry>,
    labels: Labels,
}

impl IbanValidatorBuilder {
    pub fn new() -> Self {
        IbanValidatorBuilder {
            registry: None,
            labels: Labels::empty(),
        }
    }

    /// Defaults to the ISO 13616 registry.
    pub fn registry(mut self, registry: CountryRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Labels added to every metric emitted by the validator.
    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn build(self) -> IbanValidator {
        IbanValidator {
            registry: self
                .registry
                .unwrap_or_else(|| DEFAULT_REGISTRY.clone()),
            metrics: Metrics::new(&self.labels),
        }
    }
}

impl Default for IbanValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
