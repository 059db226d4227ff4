use std::iter::FusedIterator;

use super::SkipNode;
use crate::types::Key;

/// Iterator over skip list entries in sorted order.
///
/// Simply follows level 0 forward links; level 0 is a sorted linked list
/// containing every entry. Stops at the first key past `end` (inclusive
/// bound), or at the end of the list when unbounded. Not restartable: call
/// `range_scan` again for a fresh pass.
pub struct RangeIter<'a, V> {
    nodes: &'a [SkipNode<V>],
    current: Option<usize>,
    end: Option<Key>,
}

impl<'a, V> RangeIter<'a, V> {
    pub(super) fn new(nodes: &'a [SkipNode<V>], start: Option<usize>, end: Option<Key>) -> Self {
        RangeIter {
            nodes,
            current: start,
            end,
        }
    }
}

impl<'a, V> Iterator for RangeIter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.current?];
        if let Some(end) = &self.end {
            if node.key.as_slice() > end.as_slice() {
                self.current = None;
                return None;
            }
        }
        self.current = node.forward[0];
        node.value.as_ref().map(|v| (node.key.as_slice(), v))
    }
}

impl<V> FusedIterator for RangeIter<'_, V> {}
