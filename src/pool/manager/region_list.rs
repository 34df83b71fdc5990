/*!
 * Region List
 * Address-ordered doubly-linked region nodes in a growable slot store
 */

use crate::core::limits::{EXPAND_FACTOR, FILL_FACTOR, NODE_STORE_INIT_CAPACITY};
use crate::core::types::{Offset, Size};

/// Stable identifier of a node slot
///
/// All neighbor links and gap-index references are slot indices, never
/// pointers, so growing the store can't invalidate them.
pub(crate) type NodeIndex = usize;

/// One contiguous sub-range of a pool, allocated or free
#[derive(Debug, Clone)]
pub(crate) struct RegionNode {
    pub(crate) base: Offset,
    pub(crate) size: Size,
    pub(crate) allocated: bool,
    pub(crate) live: bool,
    pub(crate) next: Option<NodeIndex>,
    pub(crate) prev: Option<NodeIndex>,
}

impl RegionNode {
    /// A recyclable slot; base and size carry no meaning while `live` is false
    fn vacant() -> Self {
        Self {
            base: 0,
            size: 0,
            allocated: false,
            live: false,
            next: None,
            prev: None,
        }
    }
}

/// The region list: live nodes cover the pool exactly once in address order
pub(crate) struct RegionList {
    nodes: Vec<RegionNode>,
    head: NodeIndex,
    used_nodes: usize,
}

impl RegionList {
    /// Create the list as a single free region covering the whole pool
    pub(crate) fn new(pool_size: Size) -> Self {
        let mut nodes = vec![RegionNode::vacant(); NODE_STORE_INIT_CAPACITY];
        nodes[0] = RegionNode {
            base: 0,
            size: pool_size,
            allocated: false,
            live: true,
            next: None,
            prev: None,
        };
        Self {
            nodes,
            head: 0,
            used_nodes: 1,
        }
    }

    pub(crate) fn head(&self) -> NodeIndex {
        self.head
    }

    pub(crate) fn used_nodes(&self) -> usize {
        self.used_nodes
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &RegionNode {
        &self.nodes[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut RegionNode {
        &mut self.nodes[idx]
    }

    /// Traverse live nodes in address order
    pub(crate) fn iter(&self) -> RegionIter<'_> {
        RegionIter {
            list: self,
            cur: Some(self.head),
        }
    }

    /// First free node (in address order) large enough for the request
    pub(crate) fn first_fit(&self, size: Size) -> Option<NodeIndex> {
        let mut cur = Some(self.head);
        while let Some(idx) = cur {
            let node = &self.nodes[idx];
            if !node.allocated && node.size >= size {
                return Some(idx);
            }
            cur = node.next;
        }
        None
    }

    /// Locate the live allocated node based at `base`
    pub(crate) fn find_allocated(&self, base: Offset) -> Option<NodeIndex> {
        let mut cur = Some(self.head);
        while let Some(idx) = cur {
            let node = &self.nodes[idx];
            if node.allocated && node.base == base {
                return Some(idx);
            }
            cur = node.next;
        }
        None
    }

    /// Locate the live allocated node containing `offset..offset + len`
    pub(crate) fn find_containing(&self, offset: Offset, len: Size) -> Option<NodeIndex> {
        let end = offset.checked_add(len)?;
        let mut cur = Some(self.head);
        while let Some(idx) = cur {
            let node = &self.nodes[idx];
            if node.allocated && offset >= node.base && end <= node.base + node.size {
                return Some(idx);
            }
            cur = node.next;
        }
        None
    }

    /// Splice a new free node of `size` at `base` immediately after `idx`
    ///
    /// The slot store grows first if the load factor is exceeded, so the
    /// claimed slot is always distinct from every live one.
    pub(crate) fn split_after(&mut self, idx: NodeIndex, base: Offset, size: Size) -> NodeIndex {
        let slot = self.claim_slot();
        let after = self.nodes[idx].next;

        self.nodes[slot] = RegionNode {
            base,
            size,
            allocated: false,
            live: true,
            next: after,
            prev: Some(idx),
        };
        self.nodes[idx].next = Some(slot);
        if let Some(after) = after {
            self.nodes[after].prev = Some(slot);
        }

        self.used_nodes += 1;
        slot
    }

    /// Remove `idx` from the list and mark its slot recyclable
    pub(crate) fn unlink(&mut self, idx: NodeIndex) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            // Unlinking the head only happens while a neighbor survives
            None => {
                debug_assert!(next.is_some());
                if let Some(next) = next {
                    self.head = next;
                }
            }
        }
        if let Some(next) = next {
            self.nodes[next].prev = prev;
        }

        self.nodes[idx] = RegionNode::vacant();
        self.used_nodes -= 1;
    }

    /// Claim a vacant slot, growing the store when the load factor is exceeded
    fn claim_slot(&mut self) -> NodeIndex {
        if self.used_nodes as f64 / self.capacity() as f64 > FILL_FACTOR {
            self.grow();
        }
        match self.nodes.iter().position(|n| !n.live) {
            Some(slot) => slot,
            None => {
                // Fill factor below 1.0 makes this unreachable; grow anyway
                let slot = self.nodes.len();
                self.grow();
                slot
            }
        }
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity() * EXPAND_FACTOR;
        self.nodes.resize(new_capacity, RegionNode::vacant());
    }
}

/// Iterator over live nodes in forward-link order
pub(crate) struct RegionIter<'a> {
    list: &'a RegionList,
    cur: Option<NodeIndex>,
}

impl<'a> Iterator for RegionIter<'a> {
    type Item = (NodeIndex, &'a RegionNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cur?;
        let node = self.list.node(idx);
        self.cur = node.next;
        Some((idx, node))
    }
}
