//! Per-account nonce-ordered transaction list

use crate::error::{TxPoolError, TxPoolResult};
use crate::transaction::PooledTransaction;
use std::collections::BTreeMap;

/// Nonce-ordered transactions for a single account.
///
/// One list exists per account and partition. The `strict` flag picks the
/// invalidation mode: a strict list (pending partition) treats its entries
/// as an executable run, so removing a nonce also evicts every higher
/// nonce; a loose list (queue partition) tolerates gaps and never cascades.
#[derive(Debug)]
pub(crate) struct TxList {
    /// Whether removal cascades to higher nonces
    strict: bool,
    /// Live entries, keyed by nonce
    txs: BTreeMap<u64, PooledTransaction>,
}

impl TxList {
    /// Create an empty list with the given invalidation mode
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            strict,
            txs: BTreeMap::new(),
        }
    }

    /// Insert a transaction, replacing an existing entry at the same nonce
    /// only if the newcomer clears the price bump threshold.
    ///
    /// Replacement requires `new > old * (100 + price_bump) / 100`, checked
    /// exactly in integer arithmetic. Returns the displaced transaction on
    /// replacement; on rejection the list is unchanged.
    pub(crate) fn add(
        &mut self,
        tx: PooledTransaction,
        price_bump: u128,
    ) -> TxPoolResult<Option<PooledTransaction>> {
        if let Some(old) = self.txs.get(&tx.nonce()) {
            if tx.gas_price() * 100 <= old.gas_price() * (100 + price_bump) {
                return Err(TxPoolError::ReplacementUnderpriced {
                    old: old.gas_price(),
                    new: tx.gas_price(),
                });
            }
        }
        Ok(self.txs.insert(tx.nonce(), tx))
    }

    /// Remove the entry at `nonce`.
    ///
    /// In a strict list every entry with a higher nonce is evicted as well
    /// and returned; the caller decides what to do with them (the pool
    /// demotes them to the queue partition).
    pub(crate) fn remove(&mut self, nonce: u64) -> (bool, Vec<PooledTransaction>) {
        if self.txs.remove(&nonce).is_none() {
            return (false, Vec::new());
        }
        if !self.strict {
            return (true, Vec::new());
        }
        let cascaded = match nonce.checked_add(1) {
            Some(next) => self.txs.split_off(&next),
            None => BTreeMap::new(),
        };
        (true, cascaded.into_values().collect())
    }

    /// Whether an entry already exists at this nonce
    pub(crate) fn overlaps(&self, nonce: u64) -> bool {
        self.txs.contains_key(&nonce)
    }

    /// Number of live entries
    pub(crate) fn len(&self) -> usize {
        self.txs.len()
    }

    /// Whether the list holds no entries
    pub(crate) fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    /// Iterate entries in ascending nonce order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &PooledTransaction> {
        self.txs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_primitives::Address;

    fn tx(nonce: u64, gas_price: u128) -> PooledTransaction {
        PooledTransaction::new(Address::from_bytes([0x11; 20]), nonce, gas_price)
    }

    #[test]
    fn test_add_fresh() {
        let mut list = TxList::new(false);
        let replaced = list.add(tx(0, 100), 10).unwrap();
        assert!(replaced.is_none());
        assert_eq!(list.len(), 1);
        assert!(list.overlaps(0));
        assert!(!list.overlaps(1));
    }

    #[test]
    fn test_replacement_below_threshold_rejected() {
        let mut list = TxList::new(false);
        list.add(tx(0, 100), 10).unwrap();

        // 105 <= 100 * 1.10, not enough
        let err = list.add(tx(0, 105), 10).unwrap_err();
        assert_eq!(
            err,
            TxPoolError::ReplacementUnderpriced { old: 100, new: 105 }
        );

        // Original entry untouched
        assert_eq!(list.iter().next().unwrap().gas_price(), 100);
    }

    #[test]
    fn test_replacement_at_exact_threshold_rejected() {
        let mut list = TxList::new(false);
        list.add(tx(0, 100), 10).unwrap();

        // Exactly 110 is not strictly above the threshold
        assert!(list.add(tx(0, 110), 10).is_err());
    }

    #[test]
    fn test_replacement_above_threshold_accepted() {
        let mut list = TxList::new(false);
        list.add(tx(0, 100), 10).unwrap();

        let replaced = list.add(tx(0, 115), 10).unwrap();
        assert_eq!(replaced.unwrap().gas_price(), 100);
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next().unwrap().gas_price(), 115);
    }

    #[test]
    fn test_zero_bump_still_strict() {
        let mut list = TxList::new(false);
        list.add(tx(0, 100), 0).unwrap();

        // Equal price never replaces, even with no bump configured
        assert!(list.add(tx(0, 100), 0).is_err());
        assert!(list.add(tx(0, 101), 0).is_ok());
    }

    #[test]
    fn test_remove_missing() {
        let mut list = TxList::new(true);
        let (removed, cascaded) = list.remove(5);
        assert!(!removed);
        assert!(cascaded.is_empty());
    }

    #[test]
    fn test_strict_remove_cascades() {
        let mut list = TxList::new(true);
        for nonce in [2, 3, 4, 7] {
            list.add(tx(nonce, 100), 10).unwrap();
        }

        let (removed, cascaded) = list.remove(3);
        assert!(removed);

        // Every nonce above 3 is evicted, including past the gap
        let mut nonces: Vec<u64> = cascaded.iter().map(|t| t.nonce()).collect();
        nonces.sort_unstable();
        assert_eq!(nonces, vec![4, 7]);

        // Only the lower nonce survives
        assert_eq!(list.len(), 1);
        assert!(list.overlaps(2));
    }

    #[test]
    fn test_loose_remove_never_cascades() {
        let mut list = TxList::new(false);
        for nonce in [2, 3, 4] {
            list.add(tx(nonce, 100), 10).unwrap();
        }

        let (removed, cascaded) = list.remove(2);
        assert!(removed);
        assert!(cascaded.is_empty());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_strict_remove_highest_nonce() {
        let mut list = TxList::new(true);
        list.add(tx(0, 100), 10).unwrap();
        list.add(tx(1, 100), 10).unwrap();

        let (removed, cascaded) = list.remove(1);
        assert!(removed);
        assert!(cascaded.is_empty());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_iter_nonce_order() {
        let mut list = TxList::new(false);
        for nonce in [5, 1, 3] {
            list.add(tx(nonce, 100), 10).unwrap();
        }
        let nonces: Vec<u64> = list.iter().map(|t| t.nonce()).collect();
        assert_eq!(nonces, vec![1, 3, 5]);
    }

    #[test]
    fn test_distinct_nonces() {
        let mut list = TxList::new(false);
        list.add(tx(0, 100), 10).unwrap();
        list.add(tx(0, 200), 10).unwrap();
        list.add(tx(1, 100), 10).unwrap();

        // Replacement keeps nonces unique
        assert_eq!(list.len(), 2);
    }
}
