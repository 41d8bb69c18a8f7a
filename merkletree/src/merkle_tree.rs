//! The tree itself: leaf-layer building, the serial and parallel build
//! engines, and proof materialization.

use itertools::Itertools;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::iter::IndexedParallelIterator;
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::IntoParallelRefMutIterator;
use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSlice;

use crate::Digest;
use crate::block::DataBlock;
use crate::config::Config;
use crate::config::Mode;
use crate::error::MerkleTreeError;
use crate::hasher::Sha256Hasher;
use crate::hasher::TreeHasher;
use crate::proof;
use crate::proof::Proof;

type Result<T> = core::result::Result<T, MerkleTreeError>;

/// Levels with fewer digests than this are processed on the calling thread
/// even when a worker pool is configured. Does not affect output bytes.
const PARALLELIZATION_CUTOFF: usize = 16;

/// A binary Merkle hash tree over an ordered sequence of data blocks.
///
/// A tree is constructed once and never mutated. Leaf `i` is the (optionally
/// hashed) serialization of block `i`; every level of odd length is padded
/// by duplicating its last digest before pairing, so each parent is
/// `H(combine(left, right))` over a fully even level.
///
/// # Design
///
/// The configured [`Mode`] decides which artifacts outlive construction:
/// eagerly generated proofs, the retained levels, or both. The parallel
/// engine divides each level across a fixed-size worker pool owned by the
/// construction call; its output is byte-identical to the serial engine's
/// for any worker count, because level slots are written order-preserving
/// and the per-level barrier keeps the pairing schedule fixed.
///
/// ```
/// use merkletree::prelude::*;
///
/// let blocks: Vec<Vec<u8>> = (0..5u8).map(|seed| vec![seed; 100]).collect();
/// let tree = MerkleTree::new(Config::new(), &blocks)?;
///
/// assert_eq!(3, tree.depth());
/// let proofs = tree.proofs().unwrap();
/// assert!(tree.verify(&blocks[3], &proofs[3])?);
/// # Ok::<(), MerkleTreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MerkleTree<H = Sha256Hasher> {
    config: Config<H>,
    root: Digest,
    proofs: Option<Vec<Proof>>,
    levels: Option<Vec<Vec<Digest>>>,
    leaf_count: usize,
    depth: usize,
}

impl<H: TreeHasher> MerkleTree<H> {
    /// Builds a tree over `blocks`, which must contain at least two
    /// entries.
    ///
    /// Serialization and hashing failures are fatal; in a parallel build
    /// the first worker error aborts construction.
    pub fn new<B>(config: Config<H>, blocks: &[B]) -> Result<Self>
    where
        B: DataBlock + Sync,
    {
        if blocks.len() < 2 {
            return Err(MerkleTreeError::InsufficientBlocks(blocks.len()));
        }

        let pool = if config.run_in_parallel {
            let workers = config.worker_count(blocks.len());
            let pool = ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|err| MerkleTreeError::WorkerPool(err.to_string()))?;
            Some(pool)
        } else {
            None
        };

        let leaves = build_leaves(&config, pool.as_ref(), blocks)?;
        let output = build_tree(&config, pool.as_ref(), leaves, blocks.len())?;

        Ok(Self {
            config,
            root: output.root,
            proofs: output.proofs,
            levels: output.levels,
            leaf_count: blocks.len(),
            depth: output.depth,
        })
    }

    /// The root digest.
    pub fn root(&self) -> &[u8] {
        &self.root
    }

    /// The eagerly generated proofs, ordered by block index. Present iff
    /// the mode generates proofs.
    pub fn proofs(&self) -> Option<&[Proof]> {
        self.proofs.as_deref()
    }

    /// The hash function the tree was built with.
    pub fn hasher(&self) -> &H {
        &self.config.hasher
    }

    /// The configuration the tree was built with.
    pub fn config(&self) -> &Config<H> {
        &self.config
    }

    /// The number of levels below the root; equivalently, the length of
    /// every proof.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of blocks the tree commits to, excluding padding.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Generates the inclusion proof for `block` from the retained levels.
    ///
    /// Only available on trees built in [`Mode::TreeBuild`]; the
    /// proof-generating modes already materialize every proof during
    /// construction. The block is matched against level 0 by its leaf
    /// digest.
    pub fn proof<B>(&self, block: &B) -> Result<Proof>
    where
        B: DataBlock + ?Sized,
    {
        if self.config.mode != Mode::TreeBuild {
            return Err(MerkleTreeError::TreeNotRetained);
        }
        let levels = self.levels.as_ref().ok_or(MerkleTreeError::TreeNotRetained)?;

        let leaf = self.config.leaf_digest(&block.serialize()?)?;
        let mut index = levels[0]
            .iter()
            .position(|digest| *digest == leaf)
            .ok_or(MerkleTreeError::BlockNotFound)?;

        let mut siblings = Vec::with_capacity(self.depth);
        let mut path = 0_u64;
        for (step, level) in levels[..levels.len() - 1].iter().enumerate() {
            path |= ((index & 1) as u64) << step;
            siblings.push(level[index ^ 1].clone());
            index >>= 1;
        }
        Ok(Proof { siblings, path })
    }

    /// Verifies `proof` for `block` against this tree's own root, under
    /// this tree's hash policy.
    ///
    /// Returns `Ok(false)` on a digest mismatch; serialization and hashing
    /// failures are errors.
    pub fn verify<B>(&self, block: &B, proof: &Proof) -> Result<bool>
    where
        B: DataBlock + ?Sized,
    {
        let recomputed = proof::recompute_root(block, proof, &self.config)?;
        Ok(recomputed == self.root)
    }
}

struct EngineOutput {
    root: Digest,
    proofs: Option<Vec<Proof>>,
    levels: Option<Vec<Vec<Digest>>>,
    depth: usize,
}

/// Serializes and leaf-hashes every block, in block order.
fn build_leaves<H, B>(config: &Config<H>, pool: Option<&ThreadPool>, blocks: &[B]) -> Result<Vec<Digest>>
where
    H: TreeHasher,
    B: DataBlock + Sync,
{
    let digest_block = |block: &B| config.leaf_digest(&block.serialize()?);

    let leaves: Vec<Digest> = match pool {
        Some(pool) if blocks.len() >= PARALLELIZATION_CUTOFF => {
            pool.install(|| blocks.par_iter().map(digest_block).collect::<Result<_>>())?
        }
        _ => blocks.iter().map(digest_block).collect::<Result<_>>()?,
    };

    if config.disable_leaf_hashing
        && leaves.windows(2).any(|pair| pair[0].len() != pair[1].len())
    {
        return Err(MerkleTreeError::UnevenLeafLength);
    }
    Ok(leaves)
}

/// Folds the leaf layer into the root, recording proofs and retaining
/// levels as the mode demands. Both engines run through here; the worker
/// pool only changes *where* each level's pairs are hashed, never the
/// pairing schedule, so serial and parallel output are identical.
fn build_tree<H>(
    config: &Config<H>,
    pool: Option<&ThreadPool>,
    mut level: Vec<Digest>,
    leaf_count: usize,
) -> Result<EngineOutput>
where
    H: TreeHasher,
{
    let generate_proofs = config.mode.generates_proofs();
    let retain = config.mode.retains_tree();

    let mut proofs = generate_proofs.then(|| vec![Proof::default(); leaf_count]);
    let mut levels: Vec<Vec<Digest>> = Vec::new();
    let mut step = 0;

    pad_to_even(&mut level);
    loop {
        if let Some(proofs) = proofs.as_deref_mut() {
            record_siblings(proofs, &level, step, pool);
        }

        let mut next = hash_level(config, pool, &level)?;
        if retain {
            levels.push(std::mem::take(&mut level));
        }

        if next.len() == 1 {
            let root = next[0].clone();
            if retain {
                levels.push(next);
            }
            return Ok(EngineOutput {
                root,
                proofs,
                levels: retain.then_some(levels),
                depth: step + 1,
            });
        }

        pad_to_even(&mut next);
        level = next;
        step += 1;
    }
}

/// Hashes the pairs `(2i, 2i+1)` of an even-length level into the next
/// level, at half length.
fn hash_level<H>(config: &Config<H>, pool: Option<&ThreadPool>, level: &[Digest]) -> Result<Vec<Digest>>
where
    H: TreeHasher,
{
    debug_assert_eq!(0, level.len() % 2);
    match pool {
        Some(pool) if level.len() >= PARALLELIZATION_CUTOFF => pool.install(|| {
            level
                .par_chunks(2)
                .map(|pair| config.hash_pair(&pair[0], &pair[1]))
                .collect()
        }),
        _ => level
            .iter()
            .tuples()
            .map(|(left, right)| config.hash_pair(left, right))
            .collect(),
    }
}

/// Appends, for every original leaf, the sibling of its ancestor at the
/// given level, and sets the leaf's path bit for this step. Each worker
/// writes to disjoint proofs, keyed by leaf index.
fn record_siblings(proofs: &mut [Proof], level: &[Digest], step: usize, pool: Option<&ThreadPool>) {
    let record = |(leaf_index, proof): (usize, &mut Proof)| {
        let ancestor = leaf_index >> step;
        proof.siblings.push(level[ancestor ^ 1].clone());
        proof.path |= ((ancestor & 1) as u64) << step;
    };

    match pool {
        Some(pool) if proofs.len() >= PARALLELIZATION_CUTOFF => {
            pool.install(|| proofs.par_iter_mut().enumerate().for_each(record));
        }
        _ => proofs.iter_mut().enumerate().for_each(record),
    }
}

/// Duplicates the last digest of an odd-length level.
fn pad_to_even(level: &mut Vec<Digest>) {
    if level.len() % 2 == 1 {
        let last = level[level.len() - 1].clone();
        level.push(last);
    }
}
