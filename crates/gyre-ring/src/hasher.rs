//! Ring hash functions.

/// Hash function mapping arbitrary bytes onto the u64 ring.
///
/// Fixed at ring construction and immutable thereafter: the same hasher
/// places both vnodes and keys, so swapping it on a live ring would
/// silently re-home every record. Any fast hash with decent dispersion
/// works — the choice affects distribution quality, not correctness.
pub trait RingHasher: Send + Sync {
    /// Map `data` to a position on the ring.
    fn position(&self, data: &[u8]) -> u64;
}

/// Default hasher: BLAKE3 truncated to the first 8 bytes, little-endian.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl RingHasher for Blake3Hasher {
    fn position(&self, data: &[u8]) -> u64 {
        let hash = blake3::hash(data);
        let bytes: [u8; 8] = hash.as_bytes()[..8].try_into().expect("8 bytes");
        u64::from_le_bytes(bytes)
    }
}
