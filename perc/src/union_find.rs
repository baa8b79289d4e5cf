//! Weighted quick-union over elements `0..n`.
//!
//! Smaller trees are attached under larger ones and every `find` compresses
//! the path it walks, so both operations are effectively constant time.

#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Creates `n` singleton sets `{0}, {1}, ..., {n - 1}`.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Returns the root of the set containing `x`.
    ///
    /// # Panics
    ///
    /// If `x` is not below the `n` given to [`new`](Self::new).
    pub fn find(&mut self, x: usize) -> usize {
        let root = self.root(x);

        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }

        root
    }

    /// Same as [`find`](Self::find), but leaves the forest untouched.
    /// Trees never get deeper than `log2(n)`, so the walk stays short.
    pub fn root(&self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    /// Merges the sets containing `x` and `y`.
    ///
    /// Returns the root that represents the merged set, or `None` if `x` and
    /// `y` were already in the same set. The other root stops being a root
    /// after this call, so anything keyed by it must be moved to the returned
    /// one.
    ///
    /// # Panics
    ///
    /// If `x` or `y` is out of range.
    pub fn union(&mut self, x: usize, y: usize) -> Option<usize> {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return None;
        }

        let (big, small) = if self.size[root_x] < self.size[root_y] {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];

        Some(big)
    }
}

////////////////////////////////////////////////////////////////////////////////
