/*!
 * Free Range Tree
 * Address-ordered free space tracking with fit queries in O(log n)
 */

use crate::core::types::{range_end, Address, Size};

const NIL: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Node {
    base: Address,
    len: Size,
    prio: u64,
    left: usize,
    right: usize,
    /// Longest range in this subtree
    max_len: Size,
}

/// Free ranges of one partition
///
/// A treap keyed by base address where every node also carries the longest
/// range in its subtree. That augmentation answers "lowest (or highest)
/// range of at least N bytes" by a single root-to-leaf descent, and the
/// largest free range is read off the root.
///
/// Ranges never overlap and never touch: `release` merges neighbours.
#[derive(Debug, Clone)]
pub(super) struct FreeList {
    nodes: Vec<Node>,
    vacant: Vec<usize>,
    root: usize,
    total: u64,
    count: usize,
    rng: u64,
}

impl FreeList {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            vacant: Vec::new(),
            root: NIL,
            total: 0,
            count: 0,
            rng: 0x9e37_79b9_7f4a_7c15,
        }
    }

    /// Tracker covering the whole of `[base, base + len)`
    pub fn spanning(base: Address, len: Size) -> Self {
        let mut list = Self::new();
        if len > 0 {
            list.insert(base, len);
        }
        list
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Sum of all free bytes
    #[inline]
    pub fn total(&self) -> Size {
        self.total as Size
    }

    /// Longest single free range
    #[inline]
    pub fn largest(&self) -> Size {
        self.max_len(self.root)
    }

    /// Number of disjoint free ranges
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Free ranges in address order
    pub fn ranges(&self) -> Vec<(Address, Size)> {
        let mut out = Vec::with_capacity(self.count);
        let mut stack = Vec::new();
        let mut t = self.root;
        while t != NIL || !stack.is_empty() {
            while t != NIL {
                stack.push(t);
                t = self.nodes[t].left;
            }
            if let Some(n) = stack.pop() {
                out.push((self.nodes[n].base, self.nodes[n].len));
                t = self.nodes[n].right;
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Carving
    // ------------------------------------------------------------------

    /// Carve `size` bytes from the low end of the lowest range that fits
    pub fn take_low(&mut self, size: Size) -> Option<Address> {
        let (base, len) = self.first_fit(size)?;
        self.remove(base);
        if len > size {
            self.insert(base + size, len - size);
        }
        Some(base)
    }

    /// Carve `size` bytes from the high end of the highest range that fits
    pub fn take_high(&mut self, size: Size) -> Option<Address> {
        let (base, len) = self.last_fit(size)?;
        self.remove(base);
        if len > size {
            self.insert(base, len - size);
        }
        Some(base + (len - size))
    }

    /// Carve exactly `[addr, addr + size)`; false if any of it is not free
    pub fn take_exact(&mut self, addr: Address, size: Size) -> bool {
        let Some((base, len)) = self.floor(addr) else {
            return false;
        };
        let end = range_end(addr, size);
        let free_end = range_end(base, len);
        if end > free_end {
            return false;
        }

        self.remove(base);
        if addr > base {
            self.insert(base, addr - base);
        }
        if end < free_end {
            self.insert(end as Address, (free_end - end) as Size);
        }
        true
    }

    /// Return `[addr, addr + size)` and merge it with touching neighbours
    ///
    /// The caller guarantees the range is currently allocated.
    pub fn release(&mut self, addr: Address, size: Size) {
        let mut base = addr;
        let mut len = size as u64;

        if let Some((pbase, plen)) = self.floor(addr) {
            debug_assert!(range_end(pbase, plen) <= addr as u64, "release overlaps free range");
            if range_end(pbase, plen) == addr as u64 {
                self.remove(pbase);
                base = pbase;
                len += plen as u64;
            }
        }

        let end = range_end(addr, size);
        if end <= Address::MAX as u64 {
            if let Some((nbase, nlen)) = self.ceil(end as Address) {
                debug_assert!(nbase as u64 >= end, "release overlaps free range");
                if nbase as u64 == end {
                    self.remove(nbase);
                    len += nlen as u64;
                }
            }
        }

        self.insert(base, len as Size);
    }

    // ------------------------------------------------------------------
    // Searches
    // ------------------------------------------------------------------

    /// Lowest-addressed range with `len >= size`
    fn first_fit(&self, size: Size) -> Option<(Address, Size)> {
        if self.largest() < size {
            return None;
        }
        let mut t = self.root;
        while t != NIL {
            let node = &self.nodes[t];
            if self.max_len(node.left) >= size {
                t = node.left;
            } else if node.len >= size {
                return Some((node.base, node.len));
            } else {
                t = node.right;
            }
        }
        None
    }

    /// Highest-addressed range with `len >= size`
    fn last_fit(&self, size: Size) -> Option<(Address, Size)> {
        if self.largest() < size {
            return None;
        }
        let mut t = self.root;
        while t != NIL {
            let node = &self.nodes[t];
            if self.max_len(node.right) >= size {
                t = node.right;
            } else if node.len >= size {
                return Some((node.base, node.len));
            } else {
                t = node.left;
            }
        }
        None
    }

    /// Range with the greatest base `<= addr`
    fn floor(&self, addr: Address) -> Option<(Address, Size)> {
        let mut best = None;
        let mut t = self.root;
        while t != NIL {
            let node = &self.nodes[t];
            if node.base <= addr {
                best = Some((node.base, node.len));
                t = node.right;
            } else {
                t = node.left;
            }
        }
        best
    }

    /// Range with the smallest base `>= addr`
    fn ceil(&self, addr: Address) -> Option<(Address, Size)> {
        let mut best = None;
        let mut t = self.root;
        while t != NIL {
            let node = &self.nodes[t];
            if node.base >= addr {
                best = Some((node.base, node.len));
                t = node.left;
            } else {
                t = node.right;
            }
        }
        best
    }

    // ------------------------------------------------------------------
    // Treap plumbing
    // ------------------------------------------------------------------

    fn insert(&mut self, base: Address, len: Size) {
        let prio = self.next_prio();
        let node = Node {
            base,
            len,
            prio,
            left: NIL,
            right: NIL,
            max_len: len,
        };
        let n = match self.vacant.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        let (l, r) = self.split(self.root, base as u64);
        let l = self.merge(l, n);
        self.root = self.merge(l, r);
        self.total += len as u64;
        self.count += 1;
    }

    fn remove(&mut self, base: Address) -> Option<Size> {
        let (l, rest) = self.split(self.root, base as u64);
        let (mid, r) = self.split(rest, base as u64 + 1);
        self.root = self.merge(l, r);
        if mid == NIL {
            return None;
        }

        let len = self.nodes[mid].len;
        self.vacant.push(mid);
        self.total -= len as u64;
        self.count -= 1;
        Some(len)
    }

    /// Split into (bases `< key`, bases `>= key`)
    fn split(&mut self, t: usize, key: u64) -> (usize, usize) {
        if t == NIL {
            return (NIL, NIL);
        }
        if (self.nodes[t].base as u64) < key {
            let (l, r) = self.split(self.nodes[t].right, key);
            self.nodes[t].right = l;
            self.update(t);
            (t, r)
        } else {
            let (l, r) = self.split(self.nodes[t].left, key);
            self.nodes[t].left = r;
            self.update(t);
            (l, t)
        }
    }

    /// Join two treaps where every base in `a` precedes every base in `b`
    fn merge(&mut self, a: usize, b: usize) -> usize {
        if a == NIL {
            return b;
        }
        if b == NIL {
            return a;
        }
        if self.nodes[a].prio > self.nodes[b].prio {
            let r = self.merge(self.nodes[a].right, b);
            self.nodes[a].right = r;
            self.update(a);
            a
        } else {
            let l = self.merge(a, self.nodes[b].left);
            self.nodes[b].left = l;
            self.update(b);
            b
        }
    }

    #[inline]
    fn update(&mut self, t: usize) {
        let node = &self.nodes[t];
        let max_len = node
            .len
            .max(self.max_len(node.left))
            .max(self.max_len(node.right));
        self.nodes[t].max_len = max_len;
    }

    #[inline]
    fn max_len(&self, t: usize) -> Size {
        if t == NIL {
            0
        } else {
            self.nodes[t].max_len
        }
    }

    // xorshift64*
    fn next_prio(&mut self) -> u64 {
        self.rng ^= self.rng >> 12;
        self.rng ^= self.rng << 25;
        self.rng ^= self.rng >> 27;
        self.rng.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }
}
