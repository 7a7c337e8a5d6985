use super::*;

pub trait MerkleHasher: Send + Sync {
    /// Root over the coinbase followed by `transactions`, in RPC display order.
    fn merkle_root(
        &self,
        transactions: &[TemplateTransaction],
        coinbase_hash: &Hash256,
    ) -> Result<Hash256>;
}

/// Bitcoin-style double-SHA256 tree, duplicating the last node of odd levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256dMerkle;

fn txid(display: &Hash256) -> Txid {
    Txid::from_byte_array(display.reversed().to_byte_array())
}

impl MerkleHasher for Sha256dMerkle {
    fn merkle_root(
        &self,
        transactions: &[TemplateTransaction],
        coinbase_hash: &Hash256,
    ) -> Result<Hash256> {
        let leaves = std::iter::once(coinbase_hash)
            .chain(transactions.iter().map(|tx| &tx.hash))
            .map(|hash| TxMerkleNode::from_raw_hash(txid(hash).to_raw_hash()));

        let root = merkle_tree::calculate_root(leaves).context("no leaves to hash")?;

        Ok(Hash256::from_byte_array(root.to_byte_array()).reversed())
    }
}
