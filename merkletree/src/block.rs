use crate::error::MerkleTreeError;

/// The contract a data block has to fulfill to be committed to by a tree.
///
/// A block's identity is defined solely by the bytes its serialization
/// returns: two blocks with equal serializations are indistinguishable to
/// the tree, its proofs, and its verifier.
///
/// Serialization must be deterministic. A failing serialization aborts the
/// enclosing operation.
pub trait DataBlock {
    fn serialize(&self) -> Result<Vec<u8>, MerkleTreeError>;
}

/// Blocks that already are plain bytes.
impl DataBlock for Vec<u8> {
    fn serialize(&self) -> Result<Vec<u8>, MerkleTreeError> {
        Ok(self.clone())
    }
}
