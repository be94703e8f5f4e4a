// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod checksum;
mod iban;
mod observability;
mod parser;
mod registry;
mod validator;

// This is the public API of the IBAN library
pub use checksum::{mod97_10_remainder, Mod97_10Checksum};
pub use iban::Iban;
pub use observability::labels::Labels;
pub use parser::{
    normalize, parse, ParseError, ParseErrorKind, MAX_IBAN_LENGTH, MIN_IBAN_LENGTH,
};
pub use registry::{CountryRegistry, RegistryConfig, RegistryError, DEFAULT_REGISTRY};
pub use validator::{IbanValidator, IbanValidatorBuilder, Validator, Validity};
