use std::cell::Cell;

/// Weighted quick-union by size with full path compression.
///
/// `find` only needs `&self`: path compression rewrites cached parent
/// pointers through `Cell`, which never changes the partition itself.
/// Cloning gives an independent deep copy of the parent and size arrays.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<Cell<usize>>,
    size: Vec<usize>,
}

impl DisjointSet {
    /// `len` singletons, each its own root with size 1.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).map(Cell::new).collect(),
            size: vec![1; len],
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.parent.len()
    }

    /// Root of `x`'s set. Every node on the walked path is re-pointed at the root.
    pub fn find(&self, x: usize) -> usize {
        let mut root = x;
        loop {
            let p = self.parent[root].get();
            if p == root {
                break;
            }
            root = p;
        }

        // Second pass: compress the whole path, not just one hop.
        let mut cur = x;
        while cur != root {
            let next = self.parent[cur].get();
            self.parent[cur].set(root);
            cur = next;
        }
        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb].set(ra);
        self.size[ra] += self.size[rb];
    }

    #[inline]
    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of nodes in `x`'s set.
    #[cfg(test)]
    fn set_size(&self, x: usize) -> usize {
        self.size[self.find(x)]
    }
}
