//! Construction-time options: which artifacts to produce, whether to build
//! on a worker pool, and the hashing/concatenation policy shared by the
//! build engines and the verifier.

use std::num::NonZeroUsize;
use std::thread;

use serde::Deserialize;
use serde::Serialize;

use crate::Digest;
use crate::error::MerkleTreeError;
use crate::hasher::Sha256Hasher;
use crate::hasher::TreeHasher;

/// Selects which artifacts a build produces.
///
/// Proof generation and tree retention trade memory for functionality:
/// [`Mode::ProofGen`] materializes every leaf's proof during the build and
/// holds at most two adjacent levels at a time, while [`Mode::TreeBuild`]
/// retains every level for the tree's lifetime so that proofs can be
/// derived on demand via [`MerkleTree::proof`](crate::merkle_tree::MerkleTree::proof).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Generate a proof for every leaf during construction; discard levels
    /// once the next one is computed.
    #[default]
    ProofGen,

    /// Retain every level of the tree; generate proofs on demand.
    TreeBuild,

    /// Generate all proofs eagerly *and* retain every level.
    ProofGenAndTreeBuild,
}

impl Mode {
    pub(crate) fn generates_proofs(self) -> bool {
        matches!(self, Self::ProofGen | Self::ProofGenAndTreeBuild)
    }

    pub(crate) fn retains_tree(self) -> bool {
        matches!(self, Self::TreeBuild | Self::ProofGenAndTreeBuild)
    }
}

/// Options for building and verifying a tree.
///
/// The default configuration hashes leaves with SHA-256, concatenates
/// siblings in tree order, builds serially, and generates all proofs
/// eagerly ([`Mode::ProofGen`]).
#[derive(Debug, Clone, Default)]
pub struct Config<H = Sha256Hasher> {
    /// The hash function applied to leaves (unless disabled) and to every
    /// concatenated sibling pair.
    pub hasher: H,

    /// Which artifacts construction produces.
    pub mode: Mode,

    /// Build on a fixed-size worker pool owned by the construction call.
    /// The result is byte-identical to a serial build.
    pub run_in_parallel: bool,

    /// Worker count for the parallel build. `0` selects the hardware
    /// parallelism; values exceeding the leaf count are clamped.
    pub num_routines: usize,

    /// Concatenate each sibling pair with the lexicographically smaller
    /// digest first instead of in tree order. This makes proofs verifiable
    /// without position information, at the cost of committing to an
    /// unordered set.
    pub sort_sibling_pairs: bool,

    /// Use each block's serialization directly as its leaf digest. All
    /// blocks must then serialize to the same length.
    pub disable_leaf_hashing: bool,
}

impl Config {
    /// The default configuration under the default hasher: SHA-256,
    /// tree-order concatenation, leaf hashing enabled, serial
    /// [`Mode::ProofGen`] build.
    ///
    /// Unlike `Config::default()`, this pins the hasher type, so it can be
    /// used where nothing else determines it.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: TreeHasher> Config<H> {
    /// The digest a block contributes to level 0.
    pub(crate) fn leaf_digest(&self, data: &[u8]) -> Result<Digest, MerkleTreeError> {
        if self.disable_leaf_hashing {
            Ok(data.to_vec())
        } else {
            self.hasher.hash(data)
        }
    }

    /// The parent digest of two sibling digests. Sorted-sibling mode
    /// reorders the concatenation, never the operands' contents.
    pub(crate) fn hash_pair(&self, left: &[u8], right: &[u8]) -> Result<Digest, MerkleTreeError> {
        let concatenated = if self.sort_sibling_pairs && right < left {
            [right, left].concat()
        } else {
            [left, right].concat()
        };
        self.hasher.hash(&concatenated)
    }

    /// Resolves `num_routines` to the worker count actually used:
    /// `0` means hardware parallelism, and no build uses more workers than
    /// there are leaves.
    pub(crate) fn worker_count(&self, leaf_count: usize) -> usize {
        let requested = if self.num_routines == 0 {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            self.num_routines
        };
        requested.min(leaf_count).max(1)
    }
}
