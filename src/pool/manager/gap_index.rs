/*!
 * Gap Index
 * Size-ordered, address-tiebroken index of free regions
 */

use super::region_list::{NodeIndex, RegionList};
use crate::core::limits::GAP_INDEX_INIT_CAPACITY;
use crate::core::types::Size;

/// One free region: its size (carried for scan locality) and its node
#[derive(Debug, Clone, Copy)]
pub(crate) struct GapEntry {
    pub(crate) size: Size,
    pub(crate) node: NodeIndex,
}

/// All free regions of a pool, ordered by (size ascending, base ascending)
///
/// The ordering makes the first entry at least as large as a request the
/// best-fit choice, with a deterministic winner among equal-sized gaps.
pub(crate) struct GapIndex {
    entries: Vec<GapEntry>,
}

impl GapIndex {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::with_capacity(GAP_INDEX_INIT_CAPACITY),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[GapEntry] {
        &self.entries
    }

    /// Size of the largest gap, or zero when there are none
    pub(crate) fn largest(&self) -> Size {
        self.entries.last().map_or(0, |e| e.size)
    }

    /// Append an entry for `node`, then bubble it up to its ordered position
    pub(crate) fn insert(&mut self, list: &RegionList, node: NodeIndex) {
        let size = list.node(node).size;
        self.entries.push(GapEntry { size, node });

        // The new entry is at the tail; swap it toward the front while it
        // sorts before its predecessor
        let mut i = self.entries.len() - 1;
        while i > 0 {
            let cur = self.entries[i];
            let prev = self.entries[i - 1];
            let cur_key = (cur.size, list.node(cur.node).base);
            let prev_key = (prev.size, list.node(prev.node).base);
            if cur_key >= prev_key {
                break;
            }
            self.entries.swap(i, i - 1);
            i -= 1;
        }
    }

    /// Remove the entry referencing `node`, preserving order
    pub(crate) fn remove(&mut self, node: NodeIndex) -> bool {
        match self.entries.iter().position(|e| e.node == node) {
            Some(i) => {
                // Vec::remove shifts the later entries one position forward
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Smallest gap at least as large as the request
    pub(crate) fn best_fit(&self, size: Size) -> Option<NodeIndex> {
        self.entries
            .iter()
            .find(|e| e.size >= size)
            .map(|e| e.node)
    }
}
