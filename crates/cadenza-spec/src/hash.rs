//! Score hashing and seed derivation.
//!
//! - The default seed of a prompt is derived from its BLAKE3 hash
//! - Every (section, track, instance) gets its own RNG stream seed
//! - Score hashes cover the compact JSON of a composition result

use crate::error::SpecError;
use crate::score::CompositionResult;

/// Derives the seed used when a caller supplies none.
///
/// ```text
/// prompt_seed = u64_le(BLAKE3(prompt)[0..8])
/// ```
///
/// # Example
/// ```
/// use cadenza_spec::hash::prompt_seed;
///
/// assert_eq!(prompt_seed("lofi, 80 bpm"), prompt_seed("lofi, 80 bpm"));
/// assert_ne!(prompt_seed("lofi"), prompt_seed("trap"));
/// ```
pub fn prompt_seed(prompt: &str) -> u64 {
    let hash = blake3::hash(prompt.as_bytes());
    first_u64(hash.as_bytes())
}

/// Derives an independent stream seed for one generator invocation.
///
/// ```text
/// stream_seed = u64_le(BLAKE3(seed || 0 || section_index || 0 || salt)[0..8])
/// ```
///
/// Adding or removing one track never changes the stream of another.
///
/// # Example
/// ```
/// use cadenza_spec::hash::derive_stream_seed;
///
/// let a = derive_stream_seed(42, 0, "melody-0");
/// let b = derive_stream_seed(42, 1, "melody-0");
/// assert_ne!(a, b);
/// ```
pub fn derive_stream_seed(seed: u64, section_index: u32, salt: &str) -> u64 {
    let mut input = Vec::with_capacity(8 + 4 + salt.len() + 2);
    input.extend_from_slice(&seed.to_le_bytes());
    input.push(0);
    input.extend_from_slice(&section_index.to_le_bytes());
    input.push(0);
    input.extend_from_slice(salt.as_bytes());

    let hash = blake3::hash(&input);
    first_u64(hash.as_bytes())
}

/// Computes the BLAKE3 hash of a composition's compact JSON.
///
/// Struct fields serialize in declaration order and maps are `BTreeMap`s,
/// so equal compositions always hash equally.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn canonical_score_hash(result: &CompositionResult) -> Result<String, SpecError> {
    let json = serde_json::to_vec(result)?;
    Ok(blake3_hash(&json))
}

/// Computes a BLAKE3 hash of arbitrary data as lowercase hex.
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

fn first_u64(bytes: &[u8; 32]) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&bytes[0..8]);
    u64::from_le_bytes(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_seed_stable() {
        let a = prompt_seed("trap, 140 bpm");
        let b = prompt_seed("trap, 140 bpm");
        assert_eq!(a, b);
        assert_ne!(a, prompt_seed("trap, 141 bpm"));
    }

    #[test]
    fn test_stream_seed_depends_on_every_input() {
        let base = derive_stream_seed(7, 2, "bass-0");
        assert_eq!(base, derive_stream_seed(7, 2, "bass-0"));
        assert_ne!(base, derive_stream_seed(8, 2, "bass-0"));
        assert_ne!(base, derive_stream_seed(7, 3, "bass-0"));
        assert_ne!(base, derive_stream_seed(7, 2, "bass-1"));
    }

    #[test]
    fn test_blake3_hash_len() {
        assert_eq!(blake3_hash(b"cadenza").len(), 64);
    }
}
