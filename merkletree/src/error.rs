use thiserror::Error;

/// Anything that can go wrong when building a tree, generating a proof, or
/// verifying one.
///
/// A digest mismatch during verification is *not* an error; verification
/// returns `Ok(false)` in that case.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
#[non_exhaustive]
pub enum MerkleTreeError {
    #[error("at least two data blocks are required to build a tree, got {0}")]
    InsufficientBlocks(usize),

    #[error("on-demand proofs require a tree built in `Mode::TreeBuild`")]
    TreeNotRetained,

    #[error("all blocks must serialize to the same length when leaf hashing is disabled")]
    UnevenLeafLength,

    #[error("worker pool could not be created: {0}")]
    WorkerPool(String),

    #[error("data block serialization failed: {0}")]
    Serialization(String),

    #[error("hash function failed: {0}")]
    Hashing(String),

    #[error("no leaf of the tree matches the given data block")]
    BlockNotFound,
}
