//! Phone number normalization seam.

use phonenumber::{country, Mode};

/// Parses raw phone input into its canonical international form.
pub trait PhoneNormalizer: Send + Sync {
    /// Returns the E.164 form of `raw`, or `None` if it is not a valid number.
    ///
    /// `region` is the ISO 3166-1 alpha-2 region used for national-format
    /// input. With `None`, only input carrying an international prefix parses.
    fn parse(&self, raw: &str, region: Option<&str>) -> Option<String>;
}

/// [`PhoneNormalizer`] backed by the `phonenumber` port of libphonenumber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibPhoneNumber;

impl PhoneNormalizer for LibPhoneNumber {
    fn parse(&self, raw: &str, region: Option<&str>) -> Option<String> {
        let region = match region {
            Some(code) => Some(code.trim().to_ascii_uppercase().parse::<country::Id>().ok()?),
            None => None,
        };
        let number = phonenumber::parse(region, raw).ok()?;
        if !phonenumber::is_valid(&number) {
            return None;
        }
        Some(number.format().mode(Mode::E164).to_string())
    }
}
