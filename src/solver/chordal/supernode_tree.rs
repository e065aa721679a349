#![allow(non_snake_case)]
use super::VertexSet;
use crate::algebra::*;
use std::iter::repeat_with;

// marker for root nodes, i.e. ones with no parent
pub(crate) const NO_PARENT: usize = usize::MAX;

// when cliques are merged away, their tree pointers are marked thusly
pub(crate) const INACTIVE_NODE: usize = usize::MAX - 1;

// one entry per scheduler step during clique merging
#[derive(Debug, Clone)]
pub(crate) struct MergeLogEntry {
    pub cand: (usize, usize),
    pub accepted: bool,
}

// Supernodal structure of the sparsity pattern of an LDLᵀ factor of a
// chordal matrix: supernodes, separators, parent/child structure and
// postorderings of both vertices and cliques.
#[derive(Debug)]
pub(crate) struct SuperNodeTree {
    // vertices of each supernode (the unique part of a clique)
    pub snd: Vec<VertexSet>,
    // postorder of the supernodal elimination tree
    pub snd_post: Vec<usize>,
    // parent of each supernode
    pub snd_parent: Vec<usize>,
    // children of each supernode
    pub snd_children: Vec<VertexSet>,
    // postordering of the vertices in the elimination tree
    pub post: Vec<usize>,
    // vertices of each clique separator
    pub sep: Vec<VertexSet>,

    // per-clique block dimensions in postorder.  Populated after
    // merging by `calculate_block_dimensions`
    pub nblk: Option<Vec<usize>>,

    // number of nonempty supernodes / cliques.  Decrements as
    // supernodes are merged into one another
    pub n_cliques: usize,

    // record of candidate merges and their outcomes
    pub merge_log: Vec<MergeLogEntry>,
}

impl SuperNodeTree {
    pub fn new<T: FloatT>(L: &CscMatrix<T>) -> Self {
        // elimination tree parents and subdiagonal counts come from a
        // single sweep over the factor's columns
        let (parent, degree) = etree_structure(L);

        let mut children = children_of(&parent);
        let post = post_order(&parent, &mut children, parent.len());

        let (snd, snd_parent) = supernode_partition(&parent, &post, &degree);

        let mut snd_children = children_of(&snd_parent);
        let snd_post = post_order(&snd_parent, &mut snd_children, snd_parent.len());

        // separators exist from the start; the clique-graph merge
        // strategy discards and later recomputes them
        let sep = separators_from_factor(L, &snd);

        let n_cliques = snd.len();

        Self {
            snd,
            snd_post,
            snd_parent,
            snd_children,
            post,
            sep,
            nblk: None,
            n_cliques,
            merge_log: Vec::new(),
        }
    }

    // accessors taking post-order clique indices

    pub(crate) fn get_snd(&self, i: usize) -> &VertexSet {
        &self.snd[self.snd_post[i]]
    }

    pub(crate) fn get_sep(&self, i: usize) -> &VertexSet {
        &self.sep[self.snd_post[i]]
    }

    // overlap of clique i with its parent clique
    pub(crate) fn get_overlap(&self, i: usize) -> usize {
        self.sep[self.snd_post[i]].len()
    }

    pub(crate) fn get_nblk(&self, i: usize) -> usize {
        self.nblk.as_ref().unwrap()[i]
    }

    // the full clique: supernode plus separator
    pub(crate) fn get_clique(&self, i: usize) -> VertexSet {
        let c = self.snd_post[i];
        self.snd[c].iter().chain(self.sep[c].iter()).copied().collect()
    }

    pub(crate) fn get_decomposed_dim_and_overlaps(&self) -> (usize, usize) {
        let dim = (0..self.n_cliques)
            .map(|i| triangular_number(self.get_nblk(i)))
            .sum();
        let overlaps = (0..self.n_cliques)
            .map(|i| triangular_number(self.get_overlap(i)))
            .sum();
        (dim, overlaps)
    }

    // Relabels the vertices so that every supernode occupies a
    // consecutive range, numbered block by block in clique postorder.
    // This gives the decomposed blocks equal column structure for the
    // psd completion of the dual.  `ordering`, which maps tree vertices
    // to rows of the original data, is carried along.
    pub(crate) fn reorder_snd_consecutively(&mut self, ordering: &mut [usize]) {
        let nv = self.post.len();

        // new consecutive label of each vertex
        let mut relabel = vec![0usize; nv];
        let mut next = 0;

        for &c in self.snd_post.iter() {
            let mut members: Vec<usize> = self.snd[c].iter().copied().collect();
            members.sort_unstable();

            let start = next;
            for v in members {
                relabel[v] = next;
                next += 1;
            }
            self.snd[c].clear();
            self.snd[c].extend(start..next);
        }

        // separators move to the new labels
        for sp in self.sep.iter_mut() {
            let mapped: Vec<usize> = sp.iter().map(|&v| relabel[v]).collect();
            sp.clear();
            sp.extend(mapped);
        }

        // the data-row lookup follows: the new label of a vertex finds
        // the row its original label pointed at
        let old = ordering.to_vec();
        for (v, &row) in old.iter().enumerate() {
            ordering[relabel[v]] = row;
        }
    }

    pub(crate) fn calculate_block_dimensions(&mut self) {
        let nblk = self
            .snd_post
            .iter()
            .map(|&c| self.snd[c].len() + self.sep[c].len())
            .collect();
        self.nblk = Some(nblk);
    }
}

// -------------------------
// construction internals

// One pass over the (strictly lower triangular) factor collects, per
// column, its first subdiagonal row — the elimination tree parent —
// and its subdiagonal count.
fn etree_structure<T: FloatT>(L: &CscMatrix<T>) -> (Vec<usize>, Vec<usize>) {
    let n = L.n;
    let mut parent = vec![NO_PARENT; n];
    let mut degree = vec![0usize; n];

    for v in 0..n {
        let rows = &L.rowval[L.colptr[v]..L.colptr[v + 1]];
        degree[v] = rows.len();
        if let Some(&first) = rows.first() {
            parent[v] = first;
        }
    }
    (parent, degree)
}

// child sets from a parent array.  Entries holding the root or
// inactive markers carry no link.
fn children_of(parent: &[usize]) -> Vec<VertexSet> {
    let mut children: Vec<VertexSet> = repeat_with(VertexSet::new).take(parent.len()).collect();
    for (v, &p) in parent.iter().enumerate() {
        if p < parent.len() {
            children[p].insert(v);
        }
    }
    children
}

// Postorder of the tree rooted at the unique NO_PARENT node, children
// visited in ascending index order.  Emits exactly the nc live nodes;
// inactive nodes are unreachable from the root and never appear.
pub(crate) fn post_order(parent: &[usize], children: &mut [VertexSet], nc: usize) -> Vec<usize> {
    let root = parent.iter().position(|&p| p == NO_PARENT).unwrap();

    // canonicalize the child ordering up front so the walk
    // is deterministic
    for set in children.iter_mut() {
        set.sort();
    }

    // depth-first walk with an explicit expand/emit marker per node
    let mut out = Vec::with_capacity(nc);
    let mut stack = vec![(root, false)];

    while let Some((v, emit)) = stack.pop() {
        if emit {
            out.push(v);
            continue;
        }
        stack.push((v, true));
        // pushed in reverse so the smallest child is expanded first
        for &c in children[v].iter().rev() {
            stack.push((c, false));
        }
    }

    debug_assert_eq!(out.len(), nc);
    out
}

// Pothen-Sun partition of the elimination tree into supernodes.
// Working upward in postorder, a parent is absorbed into the supernode
// of its first eligible child whenever the subdiagonal count shrinks by
// exactly one along the edge.  Each supernode is a chain whose deepest
// vertex acts as representative.
fn supernode_partition(
    parent: &[usize],
    post: &[usize],
    degree: &[usize],
) -> (Vec<VertexSet>, Vec<usize>) {
    let n = parent.len();

    // rep[v]: representative of the supernode v belongs to
    let mut rep: Vec<usize> = (0..n).collect();
    // a parent can be absorbed by only one child
    let mut claimed = vec![false; n];

    for &v in post {
        let p = parent[v];
        if p == NO_PARENT {
            continue;
        }
        if degree[v] == degree[p] + 1 && !claimed[p] {
            // children precede parents in postorder, so rep[v] is
            // final by the time v gives it to p
            rep[p] = rep[v];
            claimed[p] = true;
        }
    }

    // number the supernodes by ascending representative vertex
    let reps: Vec<usize> = (0..n).filter(|&v| rep[v] == v).collect();
    let mut index_of_rep = vec![usize::MAX; n];
    for (k, &r) in reps.iter().enumerate() {
        index_of_rep[r] = k;
    }

    let mut snd: Vec<VertexSet> = repeat_with(VertexSet::new).take(reps.len()).collect();
    for v in 0..n {
        snd[index_of_rep[rep[v]]].insert(v);
    }

    // a supernode's parent is found by following the one parent link
    // that exits its chain
    let mut snd_parent = vec![NO_PARENT; reps.len()];
    for v in 0..n {
        let p = parent[v];
        if p != NO_PARENT && rep[p] != rep[v] {
            snd_parent[index_of_rep[rep[v]]] = index_of_rep[rep[p]];
        }
    }

    (snd, snd_parent)
}

// The separator of each clique is the column structure of its
// representative vertex with the supernode's own vertices removed.
fn separators_from_factor<T: FloatT>(L: &CscMatrix<T>, snd: &[VertexSet]) -> Vec<VertexSet> {
    snd.iter()
        .map(|sn| {
            let vrep = *sn.iter().min().unwrap();
            L.rowval[L.colptr[vrep]..L.colptr[vrep + 1]]
                .iter()
                .filter(|v| !sn.contains(*v))
                .copied()
                .collect()
        })
        .collect()
}

// -------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    // strictly lower triangular pattern of a 5x5 banded factor
    fn banded_factor() -> CscMatrix<f64> {
        CscMatrix::new(
            5,
            5,
            vec![0, 1, 2, 3, 4, 4],
            vec![1, 2, 3, 4],
            vec![1., 1., 1., 1.],
        )
    }

    #[test]
    fn test_etree_structure() {
        let L = banded_factor();
        let (parent, degree) = etree_structure(&L);
        assert_eq!(parent, vec![1, 2, 3, 4, NO_PARENT]);
        assert_eq!(degree, vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_post_order_children_first() {
        // star rooted at 2 with children {0, 1}, child 3 of node 1
        let parent = vec![2, 2, NO_PARENT, 1];
        let mut children = children_of(&parent);
        let post = post_order(&parent, &mut children, 4);

        // every node appears after its children, smallest subtree first
        assert_eq!(post, vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_supernode_tree_of_band() {
        let L = banded_factor();
        let t = SuperNodeTree::new(&L);

        // the band splits into cliques {i, i+1}; the top pair collapses
        // into one supernode and the rest are singletons
        assert_eq!(t.n_cliques, 4);

        let mut cliques: Vec<Vec<usize>> = (0..t.n_cliques)
            .map(|i| {
                let mut c: Vec<usize> = t.get_clique(i).iter().copied().collect();
                c.sort();
                c
            })
            .collect();
        cliques.sort();
        assert_eq!(
            cliques,
            vec![vec![0, 1], vec![1, 2], vec![2, 3], vec![3, 4]]
        );
    }

    #[test]
    fn test_reorder_consecutive() {
        let L = banded_factor();
        let mut t = SuperNodeTree::new(&L);
        let mut ordering: Vec<usize> = (0..5).collect();

        t.reorder_snd_consecutively(&mut ordering);

        // supernodes now hold consecutive labels covering 0..5 once
        let mut seen = vec![false; 5];
        for set in t.snd.iter() {
            for &v in set.iter() {
                assert!(!seen[v]);
                seen[v] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));

        // the ordering remains a permutation
        let mut sorted = ordering.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..5).collect::<Vec<usize>>());
    }
}
