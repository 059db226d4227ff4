mod iter;

pub use iter::RangeIter;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Key, Value};

/// Maximum level a node can reach.
pub const MAX_LEVEL: usize = 16;

/// Probability of promoting a node one more level.
pub const PROBABILITY: f64 = 0.5;

/// Arena slot of the head sentinel.
const HEAD: usize = 0;

/// A single node in the skip list.
///
/// Each node has one forward link per level it participates in. Level 0
/// contains all nodes (a regular linked list). Higher levels skip over nodes,
/// enabling O(log n) average-case search.
///
/// ```text
/// Level 3:  HEAD ──────────────────────────────► 50 ──────────► NIL
/// Level 2:  HEAD ──────────► 20 ────────────────► 50 ──────────► NIL
/// Level 1:  HEAD ──► 10 ──► 20 ────► 35 ────────► 50 ──► 60 ──► NIL
/// Level 0:  HEAD ──► 10 ──► 20 ──► 25 ──► 35 ──► 50 ──► 60 ──► 70 ► NIL
/// ```
///
/// Links are indices into `SkipList::nodes`. The link vector of a regular
/// node is sized once, at insertion, and never grows afterwards.
struct SkipNode<V> {
    key: Key,
    /// `None` for the head sentinel and for freed slots.
    value: Option<V>,
    forward: Vec<Option<usize>>,
}

/// A probabilistic ordered map from byte-string keys to `V`.
///
/// Average case: O(log n) put, get, delete and `first_ge`; O(1) per step of
/// a range scan. Worst case is O(n), but astronomically unlikely with random
/// level assignment.
///
/// Level selection draws from an injected generator `R`, so tests can
/// seed it with [`SkipList::with_seed`].
pub struct SkipList<V = Value, R = StdRng> {
    /// Arena. Slot 0 is the head sentinel, whose link vector is exactly
    /// `level` long.
    nodes: Vec<SkipNode<V>>,
    /// Slots released by `delete`, reused by later inserts.
    free: Vec<usize>,
    /// Highest level in use; never below 1.
    level: usize,
    len: usize,
    rng: R,
}

impl<V> SkipList<V, StdRng> {
    /// Create an empty skip list seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty skip list with a deterministic level sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<V> Default for SkipList<V, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> SkipList<V, R> {
    /// Look up a key. Returns the value if found.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        let (found, _) = self.search(key);
        found
            .filter(|&idx| self.nodes[idx].key == key)
            .and_then(|idx| self.nodes[idx].value.as_ref())
    }

    /// Leftmost entry whose key is `>= key`, or `None` if every key is
    /// smaller.
    pub fn first_ge(&self, key: &[u8]) -> Option<(&[u8], &V)> {
        let (found, _) = self.search(key);
        found.and_then(|idx| self.entry(idx))
    }

    /// Remove `key`. Returns whether it was present.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        let (found, update) = self.search(key);
        let target = match found {
            Some(idx) if self.nodes[idx].key == key => idx,
            _ => return false,
        };

        for lvl in 0..self.level {
            let prev = update[lvl];
            if self.nodes[prev].forward[lvl] == Some(target) {
                self.nodes[prev].forward[lvl] = self.nodes[target].forward[lvl];
            }
        }

        let node = &mut self.nodes[target];
        node.key = Vec::new();
        node.value = None;
        node.forward = Vec::new();
        self.free.push(target);
        self.len -= 1;

        // Drop empty top levels so searches start as low as possible.
        while self.level > 1 && self.nodes[HEAD].forward[self.level - 1].is_none() {
            self.nodes[HEAD].forward.pop();
            self.level -= 1;
        }

        true
    }

    /// Lazily yield entries with `start <= key <= end` in ascending order.
    ///
    /// Walks level 0 links directly; nothing is buffered.
    pub fn range_scan(&self, start: &[u8], end: &[u8]) -> RangeIter<'_, V> {
        let (first, _) = self.search(start);
        RangeIter::new(&self.nodes, first, Some(end.to_vec()))
    }

    /// Iterate over every entry in ascending key order.
    pub fn iter(&self) -> RangeIter<'_, V> {
        RangeIter::new(&self.nodes, self.nodes[HEAD].forward[0], None)
    }

    /// Number of entries in the skip list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the skip list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current top level (1-based). An empty list reports 1.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Shared search: returns the first node with key `>= key` and, for
    /// every level below the current top, the rightmost node whose key is
    /// strictly less than `key`.
    fn search(&self, key: &[u8]) -> (Option<usize>, [usize; MAX_LEVEL]) {
        let mut update = [HEAD; MAX_LEVEL];
        let mut x = HEAD;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.nodes[x].forward[lvl] {
                if self.nodes[next].key.as_slice() < key {
                    x = next;
                } else {
                    break;
                }
            }
            update[lvl] = x;
        }
        (self.nodes[x].forward[0], update)
    }

    fn entry(&self, idx: usize) -> Option<(&[u8], &V)> {
        let node = &self.nodes[idx];
        node.value.as_ref().map(|v| (node.key.as_slice(), v))
    }
}

impl<V, R: Rng> SkipList<V, R> {
    /// Create an empty skip list drawing levels from `rng`.
    pub fn with_rng(rng: R) -> Self {
        let head = SkipNode {
            key: Vec::new(),
            value: None,
            forward: vec![None],
        };
        SkipList {
            nodes: vec![head],
            free: Vec::new(),
            level: 1,
            len: 0,
            rng,
        }
    }

    /// Insert a key-value pair. Overwrites if the key already exists and
    /// returns the previous value.
    ///
    /// Algorithm:
    ///   1. Find the insertion point at each level (track predecessors)
    ///   2. On an exact match, swap the value in place and stop
    ///   3. Otherwise pick a random level, growing the head if needed
    ///   4. Splice the new node in after each recorded predecessor
    pub fn put(&mut self, key: impl Into<Key>, value: V) -> Option<V> {
        let key = key.into();
        let (found, mut update) = self.search(&key);
        if let Some(idx) = found {
            if self.nodes[idx].key == key {
                return self.nodes[idx].value.replace(value);
            }
        }

        let level = self.random_level();
        if level > self.level {
            // New top levels have no predecessor but the head.
            for slot in &mut update[self.level..level] {
                *slot = HEAD;
            }
            self.nodes[HEAD].forward.resize(level, None);
            self.level = level;
        }

        let idx = self.alloc(key, value, level);
        for (lvl, &prev) in update.iter().enumerate().take(level) {
            self.nodes[idx].forward[lvl] = self.nodes[prev].forward[lvl];
            self.nodes[prev].forward[lvl] = Some(idx);
        }
        self.len += 1;
        None
    }

    /// Coin flips with probability `PROBABILITY`, capped at `MAX_LEVEL`.
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.gen_bool(PROBABILITY) {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, key: Key, value: V, level: usize) -> usize {
        let node = SkipNode {
            key,
            value: Some(value),
            forward: vec![None; level],
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Walk every level and check the structural invariants.
    fn check_invariants<V, R>(sl: &SkipList<V, R>) {
        assert!(sl.level >= 1 && sl.level <= MAX_LEVEL);
        assert_eq!(sl.nodes[HEAD].forward.len(), sl.level);

        let mut prev_level_members: Option<Vec<usize>> = None;
        for lvl in 0..sl.level {
            let mut members = Vec::new();
            let mut cur = sl.nodes[HEAD].forward[lvl];
            while let Some(idx) = cur {
                let node = &sl.nodes[idx];
                assert!(node.value.is_some(), "freed slot still linked");
                assert!(node.forward.len() > lvl, "node linked above its level");
                assert!(node.forward.len() <= MAX_LEVEL);
                if let Some(&last) = members.last() {
                    let last_node: &SkipNode<V> = &sl.nodes[last];
                    assert!(last_node.key < node.key, "level {lvl} out of order");
                }
                members.push(idx);
                cur = node.forward[lvl];
            }
            if lvl == 0 {
                assert_eq!(members.len(), sl.len);
            }
            if let Some(lower) = &prev_level_members {
                for idx in &members {
                    assert!(lower.contains(idx), "level {lvl} not nested");
                }
            }
            prev_level_members = Some(members);
        }

        if !sl.is_empty() {
            let top = (0..sl.level)
                .rev()
                .find(|&lvl| sl.nodes[HEAD].forward[lvl].is_some());
            assert_eq!(top, Some(sl.level - 1));
        }
    }

    #[test]
    fn empty_list_has_level_one() {
        let sl: SkipList = SkipList::with_seed(1);
        assert_eq!(sl.level(), 1);
        assert!(sl.is_empty());
        check_invariants(&sl);
    }

    #[test]
    fn random_level_stays_within_cap() {
        let mut sl: SkipList = SkipList::with_seed(7);
        let mut seen_above_one = false;
        for _ in 0..10_000 {
            let level = sl.random_level();
            assert!((1..=MAX_LEVEL).contains(&level));
            seen_above_one |= level > 1;
        }
        assert!(seen_above_one);
    }

    #[test]
    fn random_level_is_roughly_geometric() {
        let mut sl: SkipList = SkipList::with_seed(42);
        let trials = 20_000;
        let ones = (0..trials).filter(|_| sl.random_level() == 1).count();
        // p = 0.5 → about half the nodes stay at level 1.
        let ratio = ones as f64 / trials as f64;
        assert!((0.45..0.55).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn invariants_hold_across_inserts_and_deletes() {
        let mut sl = SkipList::with_seed(3);
        for i in (0..500u32).rev() {
            sl.put(format!("k{:04}", i), i);
        }
        check_invariants(&sl);

        for i in (0..500u32).step_by(3) {
            assert!(sl.delete(format!("k{:04}", i).as_bytes()));
        }
        check_invariants(&sl);

        for i in 0..500u32 {
            sl.delete(format!("k{:04}", i).as_bytes());
        }
        assert!(sl.is_empty());
        assert_eq!(sl.level(), 1);
        check_invariants(&sl);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut sl = SkipList::with_seed(9);
        for i in 0..10u32 {
            sl.put(format!("k{i}"), i);
        }
        let arena = sl.nodes.len();
        assert!(sl.delete(b"k3"));
        assert!(sl.delete(b"k7"));
        sl.put("x1", 100);
        sl.put("x2", 200);
        assert_eq!(sl.nodes.len(), arena);
        check_invariants(&sl);
        assert_eq!(sl.get(b"x1"), Some(&100));
        assert_eq!(sl.get(b"k3"), None);
    }

    #[test]
    fn matches_btreemap_model() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut sl = SkipList::with_seed(11);
        let mut model = BTreeMap::new();

        for _ in 0..5_000 {
            let key = format!("{:03}", rng.gen_range(0..300u32)).into_bytes();
            if rng.gen_bool(0.7) {
                let val: u32 = rng.gen_range(0..1_000_000);
                assert_eq!(sl.put(key.clone(), val), model.insert(key, val));
            } else {
                assert_eq!(sl.delete(&key), model.remove(&key).is_some());
            }
        }

        check_invariants(&sl);
        assert_eq!(sl.len(), model.len());
        let got: Vec<_> = sl.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
        let want: Vec<_> = model.into_iter().collect();
        assert_eq!(got, want);
    }
}
