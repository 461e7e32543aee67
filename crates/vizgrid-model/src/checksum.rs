//! Change-detection checksums.
//!
//! A [`Checksum`] is the first 16 bytes of a SHA-256 digest, rendered as
//! lowercase hex. It is reproducible across processes, which keeps cache keys
//! and test expectations stable, but it is only used to notice that something
//! changed. It is not an integrity guarantee.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::grid::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checksum([u8; 16]);

impl Checksum {
    pub fn from_first_16_bytes_of_sha256(digest: [u8; 32]) -> Self {
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for Checksum {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Checksum {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() != 16 {
            return Err(serde::de::Error::custom("Checksum must be 16 bytes"));
        }
        let mut out = [0u8; 16];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

/// Incremental checksum builder.
///
/// Every part is length-prefixed so that `["ab", "c"]` and `["a", "bc"]`
/// never produce the same digest.
#[derive(Clone, Default)]
pub struct ChecksumBuilder {
    hasher: Sha256,
}

impl ChecksumBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn str(mut self, value: &str) -> Self {
        self.hasher.update((value.len() as u64).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.hasher.update(value.to_le_bytes());
        self
    }

    pub fn checksum(mut self, value: Checksum) -> Self {
        self.hasher.update(value.as_bytes());
        self
    }

    pub fn cell(mut self, value: &CellValue) -> Self {
        match value {
            CellValue::Missing => {
                self.hasher.update([0u8]);
                self
            }
            CellValue::Text(text) => {
                self.hasher.update([1u8]);
                self.str(text)
            }
        }
    }

    pub fn finish(self) -> Checksum {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&self.hasher.finalize());
        Checksum::from_first_16_bytes_of_sha256(digest)
    }
}

/// Hash a sequence of string parts.
pub fn hash_strs<'a>(parts: impl IntoIterator<Item = &'a str>) -> Checksum {
    parts
        .into_iter()
        .fold(ChecksumBuilder::new(), ChecksumBuilder::str)
        .finish()
}

/// Hash one data row.
pub fn hash_row(row: &[CellValue]) -> Checksum {
    row.iter()
        .fold(ChecksumBuilder::new().u64(row.len() as u64), ChecksumBuilder::cell)
        .finish()
}

/// Hash a sequence of checksums (e.g. one per field or per row).
pub fn hash_checksums(parts: impl IntoIterator<Item = Checksum>) -> Checksum {
    parts
        .into_iter()
        .fold(ChecksumBuilder::new(), ChecksumBuilder::checksum)
        .finish()
}
