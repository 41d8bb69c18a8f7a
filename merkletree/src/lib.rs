#![warn(clippy::shadow_unrelated)]

//! A binary Merkle hash tree over an ordered sequence of data blocks.
//!
//! Every block is serialized, hashed into a leaf digest, and folded
//! level-by-level into a single root digest. Depending on the configured
//! [`Mode`](config::Mode), construction additionally yields a compact
//! inclusion [`Proof`](proof::Proof) for every leaf, retains the whole tree
//! for on-demand proof generation, or both. Construction can run on a
//! fixed-size worker pool; the parallel build is bit-identical to the serial
//! one for any worker count.
//!
//! ```
//! use merkletree::prelude::*;
//!
//! let blocks: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i; 16]).collect();
//! let tree = MerkleTree::new(Config::new(), &blocks)?;
//!
//! let proofs = tree.proofs().expect("default mode generates proofs");
//! for (block, proof) in blocks.iter().zip(proofs) {
//!     assert!(tree.verify(block, proof)?);
//! }
//! # Ok::<(), MerkleTreeError>(())
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod hasher;
pub mod merkle_tree;
pub mod prelude;
pub mod proof;

/// Raw digest bytes.
///
/// Digest width is determined by the configured [`TreeHasher`]
/// (32 bytes for the default SHA-256), or by the blocks' serialized length
/// when leaf hashing is disabled.
///
/// [`TreeHasher`]: hasher::TreeHasher
pub type Digest = Vec<u8>;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    /// The compiler automatically adds any applicable auto trait (all of
    /// which are marker traits) to self-defined types. These trait bounds
    /// silently vanish if their pre-conditions stop holding, which would be
    /// a breaking API change. Testing for their presence makes the removal
    /// deliberate.
    fn implements_usual_auto_traits<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn public_types_implement_the_usual_auto_traits() {
        implements_usual_auto_traits::<MerkleTree>();
        implements_usual_auto_traits::<Config>();
        implements_usual_auto_traits::<Mode>();
        implements_usual_auto_traits::<Proof>();
        implements_usual_auto_traits::<Sha256Hasher>();
        implements_usual_auto_traits::<MerkleTreeError>();
    }
}
