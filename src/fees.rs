use super::*;

pub trait FeeCalculator: Send + Sync {
    fn total_fees(&self, transactions: &[TemplateTransaction]) -> Result<u64>;
}

/// Trusts the `fee` the node declares for each transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredFees;

impl FeeCalculator for DeclaredFees {
    fn total_fees(&self, transactions: &[TemplateTransaction]) -> Result<u64> {
        transactions.iter().try_fold(0u64, |total, tx| {
            total
                .checked_add(tx.fee)
                .ok_or_else(|| anyhow!("fee total overflows at transaction {}", tx.hash))
        })
    }
}
