//! Price-ordered eviction index
//!
//! A min-price heap over every pooled transaction, consulted only under
//! capacity pressure. Entries are not removed when their transaction
//! leaves the pool; a stale counter tracks how many dead entries the heap
//! still holds, and they are skipped (and uncounted) when they surface at
//! the top. Liveness is decided by membership in the pool's authoritative
//! hash set, passed in by the caller.

use crate::transaction::PooledTransaction;
use cinder_primitives::H256;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// One heap entry: price plus an admission sequence number for stable
/// ordering among equal prices.
#[derive(Debug)]
struct PricedEntry {
    gas_price: u128,
    seq: u64,
    tx: PooledTransaction,
}

// BinaryHeap is a max-heap, so the comparison is reversed: the cheapest
// price wins, ties broken by the older (lower) sequence number.
impl Ord for PricedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .gas_price
            .cmp(&self.gas_price)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PricedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PricedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PricedEntry {}

/// Min-price heap with lazy deletion.
#[derive(Debug)]
pub(crate) struct PricedHeap {
    heap: BinaryHeap<PricedEntry>,
    /// Heap entries whose transaction has already left the pool
    stales: u64,
    /// Next admission sequence number
    seq: u64,
}

impl PricedHeap {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            stales: 0,
            seq: 0,
        }
    }

    /// Record a newly admitted transaction. Replacements push a fresh entry
    /// without touching the old one; the old entry is charged to the stale
    /// counter by the caller instead.
    pub(crate) fn put(&mut self, tx: PooledTransaction) {
        let entry = PricedEntry {
            gas_price: tx.gas_price(),
            seq: self.seq,
            tx,
        };
        self.seq += 1;
        self.heap.push(entry);
    }

    /// Whether `tx` cannot free any capacity: true iff the heap holds a
    /// live entry and the cheapest live price is at least `tx`'s price.
    /// Dead entries surfacing at the top are dropped on the way.
    pub(crate) fn underpriced(&mut self, tx: &PooledTransaction, all: &HashSet<H256>) -> bool {
        self.prune_stale(all);
        self.heap
            .peek()
            .is_some_and(|cheapest| cheapest.gas_price >= tx.gas_price())
    }

    /// Charge `count` heap entries as stale. Called whenever transactions
    /// leave the pool through any path that does not pop their entry here.
    pub(crate) fn removed(&mut self, count: u64) {
        self.stales += count;
    }

    /// Pop the cheapest live transactions until `slots` are filled or the
    /// heap runs dry. The result is a selection only: the caller must
    /// remove each returned transaction from the pool itself.
    pub(crate) fn discard(
        &mut self,
        mut slots: usize,
        all: &HashSet<H256>,
    ) -> Vec<PooledTransaction> {
        let mut drop = Vec::new();
        while slots > 0 {
            let Some(entry) = self.heap.pop() else { break };
            if !all.contains(&entry.tx.hash()) {
                self.stales -= 1;
                continue;
            }
            drop.push(entry.tx);
            slots -= 1;
        }
        drop
    }

    /// Physical entry count, dead entries included
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Current stale entry count
    pub(crate) fn stales(&self) -> u64 {
        self.stales
    }

    fn prune_stale(&mut self, all: &HashSet<H256>) {
        while let Some(top) = self.heap.peek() {
            if all.contains(&top.tx.hash()) {
                break;
            }
            self.heap.pop();
            self.stales -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_primitives::Address;

    fn tx(seed: u8, nonce: u64, gas_price: u128) -> PooledTransaction {
        PooledTransaction::new(Address::from_bytes([seed; 20]), nonce, gas_price)
    }

    fn live(txs: &[PooledTransaction]) -> HashSet<H256> {
        txs.iter().map(|t| t.hash()).collect()
    }

    #[test]
    fn test_underpriced_empty() {
        let mut heap = PricedHeap::new();
        assert!(!heap.underpriced(&tx(1, 0, 1), &HashSet::new()));
    }

    #[test]
    fn test_underpriced_against_cheapest() {
        let mut heap = PricedHeap::new();
        let pooled = [tx(1, 0, 50), tx(2, 0, 80)];
        for t in &pooled {
            heap.put(t.clone());
        }
        let all = live(&pooled);

        // Equal to the cheapest is still underpriced
        assert!(heap.underpriced(&tx(3, 0, 50), &all));
        assert!(heap.underpriced(&tx(3, 0, 30), &all));
        assert!(!heap.underpriced(&tx(3, 0, 51), &all));
    }

    #[test]
    fn test_underpriced_skips_stale_minimum() {
        let mut heap = PricedHeap::new();
        let cheap = tx(1, 0, 10);
        let mid = tx(2, 0, 60);
        heap.put(cheap.clone());
        heap.put(mid.clone());

        // The cheapest entry is dead; the live minimum is 60
        heap.removed(1);
        let all = live(&[mid]);

        assert!(!heap.underpriced(&tx(3, 0, 61), &all));
        assert!(heap.underpriced(&tx(3, 0, 60), &all));
        assert_eq!(heap.stales(), 0);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_discard_cheapest_first() {
        let mut heap = PricedHeap::new();
        let pooled = [tx(1, 0, 90), tx(2, 0, 20), tx(3, 0, 50)];
        for t in &pooled {
            heap.put(t.clone());
        }
        let all = live(&pooled);

        let victims = heap.discard(2, &all);
        let prices: Vec<u128> = victims.iter().map(|t| t.gas_price()).collect();
        assert_eq!(prices, vec![20, 50]);
    }

    #[test]
    fn test_discard_equal_prices_oldest_first() {
        let mut heap = PricedHeap::new();
        let first = tx(1, 0, 40);
        let second = tx(2, 0, 40);
        heap.put(first.clone());
        heap.put(second.clone());
        let all = live(&[first.clone(), second]);

        let victims = heap.discard(1, &all);
        assert_eq!(victims[0], first);
    }

    #[test]
    fn test_discard_skips_stale_without_consuming_slots() {
        let mut heap = PricedHeap::new();
        let dead = tx(1, 0, 10);
        let alive = tx(2, 0, 70);
        heap.put(dead.clone());
        heap.put(alive.clone());
        heap.removed(1);

        let all = live(&[alive.clone()]);
        let victims = heap.discard(1, &all);

        assert_eq!(victims, vec![alive]);
        assert_eq!(heap.stales(), 0);
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_discard_exhausts_heap() {
        let mut heap = PricedHeap::new();
        let pooled = [tx(1, 0, 10), tx(2, 0, 20)];
        for t in &pooled {
            heap.put(t.clone());
        }
        let all = live(&pooled);

        let victims = heap.discard(5, &all);
        assert_eq!(victims.len(), 2);
        assert!(heap.discard(1, &all).is_empty());
    }

    #[test]
    fn test_replacement_leaves_both_entries() {
        let mut heap = PricedHeap::new();
        let old = tx(1, 0, 100);
        let new = tx(1, 0, 115);
        heap.put(old);
        heap.put(new.clone());
        heap.removed(1);

        assert_eq!(heap.len(), 2);
        assert_eq!(heap.stales(), 1);

        // Only the live replacement comes back out
        let all = live(&[new.clone()]);
        assert_eq!(heap.discard(2, &all), vec![new]);
        assert_eq!(heap.stales(), 0);
    }
}
