// Union-find over the initial clique indices, used by the spanning
// tree computation of the clique graph merge strategy.  Merging by
// subtree size with full path compression on every lookup; indexing
// over the initial indices keeps tombstoned cliques from shifting
// live ones.

#[derive(Debug)]
pub(crate) struct DisjointSetUnion {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSetUnion {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);

        if ra == rb {
            return;
        }

        // smaller tree hangs off the larger
        let (big, small) = {
            if self.size[ra] >= self.size[rb] {
                (ra, rb)
            } else {
                (rb, ra)
            }
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }

    pub(crate) fn in_same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    fn find(&mut self, x: usize) -> usize {
        // locate the root, then point the whole path at it
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut v = x;
        while self.parent[v] != root {
            let next = self.parent[v];
            self.parent[v] = root;
            v = next;
        }
        root
    }
}

// -------------
// testing

#[test]
fn test_union_find_basic() {
    let mut dsu = DisjointSetUnion::new(6);
    dsu.union(0, 1);
    dsu.union(2, 3);
    assert!(dsu.in_same_set(0, 1));
    assert!(!dsu.in_same_set(1, 2));

    dsu.union(1, 2);
    assert!(dsu.in_same_set(0, 3));
    assert!(!dsu.in_same_set(4, 2));

    // union with itself is a no-op
    dsu.union(5, 5);
    assert!(dsu.in_same_set(5, 5));
    assert!(!dsu.in_same_set(5, 0));
}

#[test]
fn test_union_find_compresses_paths() {
    let mut dsu = DisjointSetUnion::new(8);
    for i in 0..7 {
        dsu.union(i, i + 1);
    }
    // all joined into one component
    for i in 1..8 {
        assert!(dsu.in_same_set(0, i));
    }
    // after lookups every node points straight at the root
    let root = dsu.find(0);
    assert!((0..8).all(|v| dsu.parent[v] == root));
}
