use strum::IntoStaticStr;
use thiserror::Error;

use crate::iban::Iban;

pub const MIN_IBAN_LENGTH: usize = 5;
pub const MAX_IBAN_LENGTH: usize = 34;

const COUNTRY_CODE_LENGTH: usize = 2;
const CHECK_DIGITS_LENGTH: usize = 2;

/// Why a string could not be read as an IBAN. Positions are character indices in the
/// normalized input.
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ParseErrorKind {
    #[error("{length} characters is too short")]
    TooShort { length: usize },

    #[error("{length} characters is too long")]
    TooLong { length: usize },

    #[error("the country code must be two letters")]
    InvalidCountryCode,

    #[error("the check digits must be two digits")]
    InvalidCheckDigits,

    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

impl ParseErrorKind {
    /// Stable snake_case name, used as a metric label.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot parse IBAN {input}: {kind}")]
pub struct ParseError {
    input: String,
    kind: ParseErrorKind,
}

impl ParseError {
    fn new(input: &str, kind: ParseErrorKind) -> Self {
        Self {
            input: input.to_owned(),
            kind,
        }
    }

    /// The raw input, before normalization.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

/// Removes every whitespace character and uppercases ASCII letters. Other characters are
/// kept as they are.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Parses a user supplied string into an [`Iban`].
///
/// Only the structure is checked here: a successfully parsed IBAN can still fail
/// [`Iban::validate`].
pub fn parse(raw: &str) -> Result<Iban, ParseError> {
    decompose(&normalize(raw)).map_err(|kind| ParseError::new(raw, kind))
}

fn decompose(normalized: &str) -> Result<Iban, ParseErrorKind> {
    let length = normalized.chars().count();
    if length < MIN_IBAN_LENGTH {
        return Err(ParseErrorKind::TooShort { length });
    }
    if length > MAX_IBAN_LENGTH {
        return Err(ParseErrorKind::TooLong { length });
    }

    let mut chars = normalized.chars();

    let country_code: String = chars.by_ref().take(COUNTRY_CODE_LENGTH).collect();
    if !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ParseErrorKind::InvalidCountryCode);
    }

    let mut check_value = 0u8;
    for c in chars.by_ref().take(CHECK_DIGITS_LENGTH) {
        match c.to_digit(10) {
            Some(digit) => check_value = check_value * 10 + digit as u8,
            None => return Err(ParseErrorKind::InvalidCheckDigits),
        }
    }

    let bban: String = chars.collect();
    if let Some((offset, character)) = bban
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_alphanumeric())
    {
        return Err(ParseErrorKind::InvalidCharacter {
            character,
            position: COUNTRY_CODE_LENGTH + CHECK_DIGITS_LENGTH + offset,
        });
    }

    Ok(Iban::new(country_code, check_value, bban))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_removes_whitespace_and_uppercases() {
        assert_eq!(
            normalize("345 sdfnsf8 403  fsdfs \na\t asda"),
            "345SDFNSF8403FSDFSAASDA"
        );
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n \t asidas da4a sab sd94"), "ASIDASDA4ASABSD94");
        assert_eq!(normalize("abfOAHF48tadf"), "ABFOAHF48TADF");
        // non-breaking space is whitespace too
        assert_eq!(normalize("de68\u{a0}2105"), "DE682105");
        assert_eq!(normalize("dé68"), "Dé68");
    }

    #[test]
    fn parse_with_spaces() {
        let iban = parse("DE68 2105 0170 0012 3456 78").unwrap();
        assert_eq!(iban.country_code(), "DE");
        assert_eq!(iban.check_digits(), "68");
        assert_eq!(iban.bban(), "210501700012345678");
    }

    #[test]
    fn parse_lowercase_and_surrounding_whitespace() {
        let iban = parse(" \tgb82 west 1234 5698 7654 32\n").unwrap();
        assert_eq!(iban.machine_form(), "GB82WEST12345698765432");
    }

    #[test]
    fn parse_keeps_leading_zero_of_check_digits() {
        let iban = parse("SA0380000000608010167519").unwrap();
        assert_eq!(iban.check_digits(), "03");
        assert_eq!(iban.check_value(), 3);

        let iban = parse("XX00ABC").unwrap();
        assert_eq!(iban.check_digits(), "00");
    }

    #[test]
    fn parse_any_alphanumeric_bban() {
        let iban = parse("AD43oh8445353ADF").unwrap();
        assert_eq!(iban.country_code(), "AD");
        assert_eq!(iban.check_value(), 43);
        assert_eq!(iban.bban(), "OH8445353ADF");
    }

    #[test]
    fn too_short() {
        let err = parse("BLA").unwrap_err();
        assert_eq!(err.kind(), &ParseErrorKind::TooShort { length: 3 });
        assert_eq!(err.input(), "BLA");

        assert_eq!(
            parse("DE 6 8").unwrap_err().kind(),
            &ParseErrorKind::TooShort { length: 4 }
        );
        assert_eq!(
            parse("").unwrap_err().kind(),
            &ParseErrorKind::TooShort { length: 0 }
        );
    }

    #[test]
    fn length_bounds() {
        assert!(parse("DE681").is_ok());
        let longest = format!("DE68{}", "1".repeat(30));
        assert!(parse(&longest).is_ok());

        let too_long = format!("DE68{}", "1".repeat(31));
        assert_eq!(
            parse(&too_long).unwrap_err().kind(),
            &ParseErrorKind::TooLong { length: 35 }
        );
    }

    #[test]
    fn length_is_counted_after_whitespace_removal() {
        let spaced = format!("DE68 {}", "1 ".repeat(30));
        assert!(parse(&spaced).is_ok());
    }

    #[test]
    fn invalid_country_code() {
        let err = parse("B1af935395").unwrap_err();
        assert_eq!(err.kind(), &ParseErrorKind::InvalidCountryCode);
        assert_eq!(err.input(), "B1af935395");
        assert_eq!(
            parse("1268210501").unwrap_err().kind(),
            &ParseErrorKind::InvalidCountryCode
        );
        assert_eq!(
            parse("ÄE68210501").unwrap_err().kind(),
            &ParseErrorKind::InvalidCountryCode
        );
    }

    #[test]
    fn invalid_check_digits() {
        assert_eq!(
            parse("DEX8210501").unwrap_err().kind(),
            &ParseErrorKind::InvalidCheckDigits
        );
        assert_eq!(
            parse("DE6X210501").unwrap_err().kind(),
            &ParseErrorKind::InvalidCheckDigits
        );
        assert_eq!(
            parse("DE+8210501").unwrap_err().kind(),
            &ParseErrorKind::InvalidCheckDigits
        );
        // non ASCII digits are not check digits
        assert_eq!(
            parse("DE६8210501").unwrap_err().kind(),
            &ParseErrorKind::InvalidCheckDigits
        );
    }

    #[test]
    fn invalid_bban_character() {
        let err = parse("DE682105017000/2345678").unwrap_err();
        assert_eq!(
            err.kind(),
            &ParseErrorKind::InvalidCharacter {
                character: '/',
                position: 14
            }
        );
        assert_eq!(err.input(), "DE682105017000/2345678");

        assert_eq!(
            parse("DE68-2105").unwrap_err().kind(),
            &ParseErrorKind::InvalidCharacter {
                character: '-',
                position: 4
            }
        );
        assert_eq!(
            parse("DE682105é").unwrap_err().kind(),
            &ParseErrorKind::InvalidCharacter {
                character: 'é',
                position: 8
            }
        );
    }

    #[test]
    fn error_message_contains_original_input() {
        let err = parse("de68 2105 0170 00/2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot parse IBAN de68 2105 0170 00/2: invalid character '/' at position 14"
        );
        assert_eq!(
            parse("BLA").unwrap_err().to_string(),
            "Cannot parse IBAN BLA: 3 characters is too short"
        );
    }

    #[test]
    fn error_kind_names() {
        assert_eq!(ParseErrorKind::TooShort { length: 1 }.as_str(), "too_short");
        assert_eq!(ParseErrorKind::TooLong { length: 40 }.as_str(), "too_long");
        assert_eq!(
            ParseErrorKind::InvalidCountryCode.as_str(),
            "invalid_country_code"
        );
        assert_eq!(
            ParseErrorKind::InvalidCheckDigits.as_str(),
            "invalid_check_digits"
        );
        assert_eq!(
            ParseErrorKind::InvalidCharacter {
                character: '/',
                position: 4
            }
            .as_str(),
            "invalid_character"
        );
    }
}
