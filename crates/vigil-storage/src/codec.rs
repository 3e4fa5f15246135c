//! JSON encoding of stored records

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use vigil_core::{Error, KvPair, Result};

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a record read by point lookup. A record that cannot be decoded is
/// a backing-store fault, not a caller error.
pub(crate) fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Upstream(format!("Corrupt record at {}: {}", key, e)))
}

/// Decode every record of a listing, skipping the ones that fail so a single
/// corrupt record cannot fail the whole listing.
pub(crate) fn decode_listing<T: DeserializeOwned>(pairs: Vec<KvPair>) -> Vec<T> {
    pairs
        .into_iter()
        .filter_map(|pair| match serde_json::from_slice(&pair.value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping corrupt record at {}: {}", pair.key, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_listing_skips_corrupt_records() {
        let pairs = vec![
            KvPair::new("/a", encode(&1u32).unwrap()),
            KvPair::new("/b", b"{not json".to_vec()),
            KvPair::new("/c", encode(&3u32).unwrap()),
        ];

        let values: Vec<u32> = decode_listing(pairs);
        assert_eq!(values, vec![1, 3]);
    }

    #[test]
    fn test_decode_corrupt_record_is_upstream() {
        let result: Result<u32> = decode("/a", b"garbage");
        assert!(matches!(result, Err(Error::Upstream(_))));
    }
}
