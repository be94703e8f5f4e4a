use crate::observability::labels::Labels;
use crate::parser::ParseErrorKind;
use crate::validator::Validity;
use metrics::{counter, Counter};

const VALIDATION: &str = "iban.validation";
const PARSE_FAILURE: &str = "iban.parse_failure";

const OUTCOME: &str = "outcome";
const REASON: &str = "reason";

pub struct Metrics {
    pub valid: Counter,
    pub unknown_country: Counter,
    pub wrong_length: Counter,
    pub checksum_mismatch: Counter,

    pub too_short: Counter,
    pub too_long: Counter,
    pub invalid_country_code: Counter,
    pub invalid_check_digits: Counter,
    pub invalid_character: Counter,
}

impl Metrics {
    pub fn new(labels: &Labels) -> Self {
        let validation = |outcome: Validity| {
            counter!(
                VALIDATION,
                labels.clone_with_label((OUTCOME, outcome.as_str()))
            )
        };
        let parse_failure = |reason: ParseErrorKind| {
            counter!(
                PARSE_FAILURE,
                labels.clone_with_label((REASON, reason.as_str()))
            )
        };

        // Field values are irrelevant, only the variant names end up in the labels.
        Metrics {
            valid: validation(Validity::Valid),
            unknown_country: validation(Validity::UnknownCountry),
            wrong_length: validation(Validity::WrongLength {
                expected: 0,
                actual: 0,
            }),
            checksum_mismatch: validation(Validity::ChecksumMismatch { remainder: 0 }),

            too_short: parse_failure(ParseErrorKind::TooShort { length: 0 }),
            too_long: parse_failure(ParseErrorKind::TooLong { length: 0 }),
            invalid_country_code: parse_failure(ParseErrorKind::InvalidCountryCode),
            invalid_check_digits: parse_failure(ParseErrorKind::InvalidCheckDigits),
            invalid_character: parse_failure(ParseErrorKind::InvalidCharacter {
                character: ' ',
                position: 0,
            }),
        }
    }

    pub fn record_validity(&self, validity: &Validity) {
        match validity {
            Validity::Valid => self.valid.increment(1),
            Validity::UnknownCountry => self.unknown_country.increment(1),
            Validity::WrongLength { .. } => self.wrong_length.increment(1),
            Validity::ChecksumMismatch { .. } => self.checksum_mismatch.increment(1),
        }
    }

    pub fn record_parse_failure(&self, kind: &ParseErrorKind) {
        match kind {
            ParseErrorKind::TooShort { .. } => self.too_short.increment(1),
            ParseErrorKind::TooLong { .. } => self.too_long.increment(1),
            ParseErrorKind::InvalidCountryCode => self.invalid_country_code.increment(1),
            ParseErrorKind::InvalidCheckDigits => self.invalid_check_digits.increment(1),
            ParseErrorKind::InvalidCharacter { .. } => self.invalid_character.increment(1),
        }
    }
}
