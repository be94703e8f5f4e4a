use crate::iban::Iban;
use crate::validator::Validator;

const MODULUS: u32 = 97;

/// Separators tolerated by [`Mod97_10Checksum`] in printed account numbers.
const SEPARATORS: [char; 4] = [' ', '-', '_', '/'];

#[inline]
fn push_digit(remainder: u32, digit: u32) -> u32 {
    (remainder * 10 + digit) % MODULUS
}

/// Feeds the numeric value of an alphanumeric character into the running remainder.
/// Letters stand for the two digit numbers `10..=35` (`A` is 10, `Z` is 35).
#[inline]
fn push_value(remainder: u32, value: u32) -> u32 {
    if value < 10 {
        push_digit(remainder, value)
    } else {
        push_digit(push_digit(remainder, value / 10), value % 10)
    }
}

/// Remainder modulo 97 of the numeral obtained by expanding every letter of `input` into
/// two digits. The numeral is never built: the remainder is updated one digit at a time,
/// so any input length works with `u32` state.
///
/// Returns `None` if `input` contains anything but ASCII letters and digits.
pub fn mod97_10_remainder(input: &str) -> Option<u32> {
    input
        .chars()
        .try_fold(0, |remainder, c| Some(push_value(remainder, c.to_digit(36)?)))
}

/// Remainder of the rearranged IBAN: BBAN first, then country code and check digits.
pub(crate) fn iban_remainder(iban: &Iban) -> u32 {
    let check_digits = iban.check_digits();
    iban.bban()
        .chars()
        .chain(iban.country_code().chars())
        .chain(check_digits.chars())
        .filter_map(|c| c.to_digit(36))
        .fold(0, push_value)
}

/// ISO 7064 MOD 97-10 check on a string whose check digits are already at the end.
///
/// An IBAN has to be rearranged first (BBAN, then country code and check digits):
/// `WEST12345698765432GB82` passes, `GB82WEST12345698765432` does not. Use
/// [`crate::IbanValidator`] for IBANs as they are written.
pub struct Mod97_10Checksum;

impl Validator for Mod97_10Checksum {
    fn is_valid_match(&self, candidate: &str) -> bool {
        let compact: String = candidate
            .chars()
            .filter(|c| !SEPARATORS.contains(c))
            .collect();
        mod97_10_remainder(&compact) == Some(1)
    }
}
