//! Persisted record format
//!
//! State that must survive between invocations is stored as a small framed
//! record:
//!
//! ```text
//! magic: u32 LE | version: u8 | len: u32 LE | payload (postcard) | crc32: u32 LE
//! ```
//!
//! The CRC covers every byte before it. Any framing, checksum or decoding
//! failure is reported as a `CacheStoreError`; callers treat that as an
//! empty cache.

use alloc::string::String;
use alloc::vec::Vec;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// magic + version + payload length
const HEADER_LEN: usize = 4 + 1 + 4;

/// Trailing CRC32
const CRC_LEN: usize = 4;

/// Persisted state errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheStoreError {
    /// The backing store failed
    #[error("state store I/O failed: {0}")]
    Io(String),
    /// Record shorter than its framing says
    #[error("record truncated")]
    Truncated,
    /// Record belongs to something else
    #[error("bad record magic {0:#010x}")]
    BadMagic(u32),
    /// Record written by an incompatible version
    #[error("record version {found}, expected {expected}")]
    VersionMismatch { found: u8, expected: u8 },
    /// CRC mismatch
    #[error("record checksum mismatch")]
    Checksum,
    /// Payload did not decode
    #[error("record payload could not be decoded")]
    Deserialize,
    /// Payload did not encode
    #[error("record payload could not be encoded")]
    Serialize,
}

/// A type stored as a framed record
pub trait Record: Serialize + DeserializeOwned {
    /// Identifies the record type
    const MAGIC: u32;
}

/// Frame `value` as a record
pub fn encode<T: Record>(value: &T) -> Result<Vec<u8>, CacheStoreError> {
    let payload = postcard::to_allocvec(value).map_err(|_| CacheStoreError::Serialize)?;
    let len = u32::try_from(payload.len()).map_err(|_| CacheStoreError::Serialize)?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + CRC_LEN);
    out.extend_from_slice(&T::MAGIC.to_le_bytes());
    out.push(RECORD_VERSION);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&payload);

    let crc = crc32(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    Ok(out)
}

/// Validate framing and decode a record
pub fn decode<T: Record>(bytes: &[u8]) -> Result<T, CacheStoreError> {
    if bytes.len() < HEADER_LEN + CRC_LEN {
        return Err(CacheStoreError::Truncated);
    }

    let magic = read_u32(&bytes[0..4]);
    if magic != T::MAGIC {
        return Err(CacheStoreError::BadMagic(magic));
    }

    let version = bytes[4];
    if version != RECORD_VERSION {
        return Err(CacheStoreError::VersionMismatch {
            found: version,
            expected: RECORD_VERSION,
        });
    }

    let len = read_u32(&bytes[5..9]) as usize;
    let body_end = HEADER_LEN.checked_add(len).ok_or(CacheStoreError::Truncated)?;
    if bytes.len() != body_end + CRC_LEN {
        return Err(CacheStoreError::Truncated);
    }

    let stored_crc = read_u32(&bytes[body_end..]);
    if stored_crc != crc32(&bytes[..body_end]) {
        return Err(CacheStoreError::Checksum);
    }

    postcard::from_bytes(&bytes[HEADER_LEN..body_end]).map_err(|_| CacheStoreError::Deserialize)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(word)
}

/// CRC32 over `data` (IEEE 802.3 polynomial)
fn crc32(data: &[u8]) -> u32 {
    !crc32_update(0xFFFF_FFFF, data)
}

fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        counter: u64,
        label: String,
    }

    impl Record for Sample {
        const MAGIC: u32 = 0x5445_5354; // "TEST"
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Other(u8);

    impl Record for Other {
        const MAGIC: u32 = 0x4F54_4852; // "OTHR"
    }

    fn sample() -> Sample {
        Sample {
            counter: 42,
            label: "clock".into(),
        }
    }

    #[test]
    fn test_crc32_check_value() {
        // Standard CRC-32 check value
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_record_decodes() {
        let bytes = encode(&sample()).unwrap();
        assert_eq!(&bytes[0..4], &0x5445_5354u32.to_le_bytes());
        assert_eq!(decode::<Sample>(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_truncated() {
        let bytes = encode(&sample()).unwrap();
        assert_eq!(
            decode::<Sample>(&bytes[..bytes.len() - 1]),
            Err(CacheStoreError::Truncated)
        );
        assert_eq!(decode::<Sample>(&[]), Err(CacheStoreError::Truncated));
    }

    #[test]
    fn test_wrong_record_type() {
        let bytes = encode(&Other(7)).unwrap();
        assert_eq!(
            decode::<Sample>(&bytes),
            Err(CacheStoreError::BadMagic(0x4F54_4852))
        );
    }

    #[test]
    fn test_version_mismatch() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[4] = RECORD_VERSION + 1;
        assert_eq!(
            decode::<Sample>(&bytes),
            Err(CacheStoreError::VersionMismatch {
                found: RECORD_VERSION + 1,
                expected: RECORD_VERSION
            })
        );
    }

    #[test]
    fn test_corrupted_payload() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[HEADER_LEN] ^= 0x01;
        assert_eq!(decode::<Sample>(&bytes), Err(CacheStoreError::Checksum));
    }
}
