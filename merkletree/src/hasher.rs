use sha2::Digest as _;
use sha2::Sha256;

use crate::Digest;
use crate::error::MerkleTreeError;

/// The hash function a tree is built with.
///
/// Implementations must be deterministic and produce digests of one fixed
/// length. The parallel engine invokes the hasher concurrently from its
/// worker pool, hence the `Send + Sync` bound.
pub trait TreeHasher: Send + Sync {
    fn hash(&self, data: &[u8]) -> Result<Digest, MerkleTreeError>;
}

/// The default hash function: SHA-256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sha256Hasher;

impl TreeHasher for Sha256Hasher {
    fn hash(&self, data: &[u8]) -> Result<Digest, MerkleTreeError> {
        Ok(Sha256::digest(data).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hasher_matches_the_nist_test_vector() {
        let digest = Sha256Hasher.hash(b"abc").unwrap();
        let expected =
            hex::decode("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
                .unwrap();
        assert_eq!(expected, digest);
    }

    #[test]
    fn sha256_digests_are_32_bytes() {
        assert_eq!(32, Sha256Hasher.hash(b"").unwrap().len());
    }
}
