//! Re-exports the most common public items.
//!
//! ```
//! use merkletree::prelude::*;
//! ```

pub use crate::Digest;
pub use crate::block::DataBlock;
pub use crate::config::Config;
pub use crate::config::Mode;
pub use crate::error::MerkleTreeError;
pub use crate::hasher::Sha256Hasher;
pub use crate::hasher::TreeHasher;
pub use crate::merkle_tree::MerkleTree;
pub use crate::proof::Proof;
pub use crate::proof::verify;
