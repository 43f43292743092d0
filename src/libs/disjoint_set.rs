/// Disjoint-set forest over the elements `0..n`.
///
/// Nodes live in one index array; union by rank and path compression keep
/// operations near-O(1) amortized.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Merges the sets of `x` and `y`. Returns false if they were already joined.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        let (smaller, larger) = if self.rank[root_x] < self.rank[root_y] {
            (root_x, root_y)
        } else {
            (root_y, root_x)
        };
        self.parent[smaller] = larger;
        if self.rank[root_x] == self.rank[root_y] {
            self.rank[larger] += 1;
        }

        true
    }

    /// Number of distinct sets.
    pub fn num_sets(&mut self) -> usize {
        (0..self.len()).filter(|&x| self.find(x) == x).count()
    }
}
