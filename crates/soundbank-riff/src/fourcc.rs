//! Four-character chunk identifiers.

use std::fmt;

/// A four-byte chunk tag.
///
/// Tags are compared as raw bytes: case-sensitive, not nul-terminated and
/// not required to be valid UTF-8.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const RIFF: FourCc = FourCc(*b"RIFF");
    pub const LIST: FourCc = FourCc(*b"LIST");

    /// Create a tag from four bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Read a tag from the first four bytes of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let head: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(Self(head))
    }

    /// Raw tag bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl PartialEq<[u8; 4]> for FourCc {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl PartialEq<&[u8; 4]> for FourCc {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_printable() {
        assert_eq!(FourCc::RIFF.to_string(), "RIFF");
        assert_eq!(FourCc(*b"sfbk").to_string(), "sfbk");
    }

    #[test]
    fn test_display_escapes_binary() {
        let tag = FourCc([b'a', 0, 0xff, b'z']);
        assert_eq!(tag.to_string(), "a\\x00\\xffz");
        assert_eq!(format!("{:?}", FourCc::LIST), "FourCc(LIST)");
    }

    #[test]
    fn test_case_sensitive_compare() {
        assert_ne!(FourCc(*b"list"), FourCc::LIST);
        assert_eq!(FourCc::LIST, b"LIST");
    }

    #[test]
    fn test_from_slice() {
        assert_eq!(FourCc::from_slice(b"INFOxyz"), Some(FourCc(*b"INFO")));
        assert_eq!(FourCc::from_slice(b"IN"), None);
    }
}
