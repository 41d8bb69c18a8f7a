//! Inclusion proofs and their verification.

use serde::Deserialize;
use serde::Serialize;

use crate::Digest;
use crate::block::DataBlock;
use crate::config::Config;
use crate::error::MerkleTreeError;
use crate::hasher::TreeHasher;

type Result<T> = core::result::Result<T, MerkleTreeError>;

/// An inclusion proof for one data block.
///
/// `siblings` lists the sibling digest at every level from the leaf layer
/// up to, but excluding, the root; its length equals the tree depth. Bit
/// `k` of `path` (bit 0 is the deepest step) encodes the node's position at
/// step `k`: 0 when the node is the left child (its sibling sits to the
/// right), 1 when it is the right child.
///
/// At a level whose length was odd, the last node's sibling is the node
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proof {
    pub siblings: Vec<Digest>,
    pub path: u64,
}

impl Proof {
    /// The number of steps in the proof, i.e. the depth of the tree it was
    /// generated from.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// Verifies an inclusion proof against an externally supplied root digest.
///
/// Passing `None` for the configuration verifies under the default policy:
/// SHA-256, tree-order concatenation, leaf hashing enabled. The
/// configuration must match the one the tree was built with, or
/// verification fails.
///
/// Returns `Ok(false)` on a digest mismatch; serialization and hashing
/// failures are errors.
///
/// ```
/// use merkletree::prelude::*;
///
/// let blocks: Vec<Vec<u8>> = vec![vec![0; 8], vec![1; 8]];
/// let tree = MerkleTree::new(Config::new(), &blocks)?;
/// let proof = &tree.proofs().unwrap()[0];
///
/// assert!(verify(&blocks[0], proof, tree.root(), None::<&Config>)?);
/// assert!(!verify(&blocks[1], proof, tree.root(), None::<&Config>)?);
/// # Ok::<(), MerkleTreeError>(())
/// ```
pub fn verify<B, H>(
    block: &B,
    proof: &Proof,
    root: &[u8],
    config: Option<&Config<H>>,
) -> Result<bool>
where
    B: DataBlock + ?Sized,
    H: TreeHasher,
    Config<H>: Default,
{
    let recomputed = match config {
        Some(config) => recompute_root(block, proof, config)?,
        None => recompute_root(block, proof, &Config::<H>::default())?,
    };
    Ok(recomputed.as_slice() == root)
}

/// Replays a proof from the block's leaf digest up to a root candidate.
pub(crate) fn recompute_root<B, H>(block: &B, proof: &Proof, config: &Config<H>) -> Result<Digest>
where
    B: DataBlock + ?Sized,
    H: TreeHasher,
{
    let mut current = config.leaf_digest(&block.serialize()?)?;
    for (step, sibling) in proof.siblings.iter().enumerate() {
        // Shifts past the bitmap width read as "left child"; such proofs
        // cannot stem from this library and fail the final comparison.
        let node_is_right_child = proof.path.checked_shr(step as u32).unwrap_or(0) & 1 == 1;
        current = if node_is_right_child {
            config.hash_pair(sibling, &current)?
        } else {
            config.hash_pair(&current, sibling)?
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Sha256Hasher;

    fn digest_of(data: &[u8]) -> Digest {
        Sha256Hasher.hash(data).unwrap()
    }

    #[test]
    fn a_single_step_proof_for_a_left_child_replays_the_root() {
        let config = Config::new();
        let left = vec![0_u8; 12];
        let right = vec![1_u8; 12];
        let root = config
            .hash_pair(&digest_of(&left), &digest_of(&right))
            .unwrap();

        let proof = Proof {
            siblings: vec![digest_of(&right)],
            path: 0,
        };
        assert_eq!(Ok(true), verify(&left, &proof, &root, None::<&Config>));
    }

    #[test]
    fn a_single_step_proof_for_a_right_child_replays_the_root() {
        let config = Config::new();
        let left = vec![0_u8; 12];
        let right = vec![1_u8; 12];
        let root = config
            .hash_pair(&digest_of(&left), &digest_of(&right))
            .unwrap();

        let proof = Proof {
            siblings: vec![digest_of(&left)],
            path: 1,
        };
        assert_eq!(Ok(true), verify(&right, &proof, &root, None::<&Config>));
    }

    #[test]
    fn a_wrong_position_bit_fails_verification() {
        let config = Config::new();
        let left = vec![0_u8; 12];
        let right = vec![1_u8; 12];
        let root = config
            .hash_pair(&digest_of(&left), &digest_of(&right))
            .unwrap();

        let proof = Proof {
            siblings: vec![digest_of(&right)],
            path: 1,
        };
        assert_eq!(Ok(false), verify(&left, &proof, &root, None::<&Config>));
    }

    #[test]
    fn an_oversized_proof_fails_without_panicking() {
        let proof = Proof {
            siblings: vec![vec![0_u8; 32]; 70],
            path: u64::MAX,
        };
        let root = vec![0_u8; 32];
        let block = vec![1_u8, 2, 3];
        assert_eq!(Ok(false), verify(&block, &proof, &root, None::<&Config>));
    }
}
