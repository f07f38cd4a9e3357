//! Git object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings representing SHA-1 hashes.
//! They uniquely identify all objects in the database (blobs, trees, commits).
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

/// Git object identifier (SHA-1 hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a 40-character hexadecimal string
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("Invalid object ID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid object ID characters: {}", id);
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Build an object ID from the raw 20-byte digest
    pub fn from_digest(digest: &[u8]) -> anyhow::Result<Self> {
        let hex = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        Self::try_parse(hex)
    }

    /// Write the object ID in its binary form (20 bytes), as stored in tree entries
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let hex40 = self.as_ref();

        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from its binary form (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut digest = [0u8; OBJECT_ID_LENGTH / 2];
        reader.read_exact(&mut digest)?;

        Self::from_digest(&digest)
    }

    /// Convert to the loose object path, `ab/c123...` for `abc123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl FromStr for ObjectId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::try_parse(s.to_string())
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const OID: &str = "8ab686eafeb1f44702738c8b0f24f2567c36da6d";

    #[test]
    fn binary_form_survives_write_and_read() {
        let oid = ObjectId::try_parse(OID.to_string()).unwrap();
        let mut buffer = Vec::new();
        oid.write_h40_to(&mut buffer).unwrap();

        assert_eq!(buffer.len(), 20);
        assert_eq!(ObjectId::read_h40_from(&mut buffer.as_slice()).unwrap(), oid);
    }

    #[test]
    fn path_splits_after_two_characters() {
        let oid: ObjectId = OID.parse().unwrap();

        assert_eq!(
            oid.to_path(),
            PathBuf::from("8a").join("b686eafeb1f44702738c8b0f24f2567c36da6d")
        );
        assert_eq!(oid.to_short_oid(), "8ab686e");
    }

    #[rstest]
    #[case("abc")]
    #[case("zzb686eafeb1f44702738c8b0f24f2567c36da6d")]
    #[case("8ab686eafeb1f44702738c8b0f24f2567c36da6d0")]
    fn rejects_malformed_ids(#[case] raw: &str) {
        assert!(ObjectId::try_parse(raw.to_string()).is_err());
    }
}
