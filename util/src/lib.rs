use std::{error::Error, fmt};

/// Byte order of every multi-byte value in object output.
pub type Endian = byteorder::LittleEndian;

/// A token did not name any variant of the expected enum.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseEnumError {
    pub value: String,
    pub enum_name: &'static str,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\" is not a {}", &self.value, &self.enum_name)
    }
}

impl Error for ParseEnumError {}

/// Name-based enum parsing, ignoring ASCII case. Derivable through
/// `util_derive::EnumFromStr`, which also provides `std::str::FromStr`.
pub trait EnumFromStr: Sized {
    fn from_str(s: &str) -> Result<Self, ParseEnumError>;
}
