#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::chordal::*;
use std::cmp::{max, min, Reverse};
use std::collections::{HashMap, HashSet};

// The (default) merge strategy based on the *reduced* clique graph: the
// union of all clique trees of the chordal graph, with nodes the cliques
// and edges weighted by the predicted computational saving of merging
// their endpoints.
//
// While the graph contains a permissible edge of positive weight, the
// heaviest such edge is merged and the local weights are recomputed.
// Since the result is a graph rather than a tree, a clique tree is
// recomputed afterwards from a maximum weight spanning tree.
//
// See: Garstka, Cannon, Goulart - A clique graph based merging strategy
// for decomposable SDPs (2019)
//
// All edge bookkeeping lives in flat arrays of fixed size: `edges`,
// `inter` and `weights` are allocated once from the initial reduced
// clique graph and never resized.  Edges removed by a merge are
// tombstoned with weight -∞ so that indices stay stable and the
// sorting workspace `p` can be reused across iterations.

// weight of a dead edge
pub(crate) const TOMBSTONE: isize = isize::MIN;

// weight marking an edge selected into the spanning tree
pub(crate) const IN_TREE: isize = -1;

pub(crate) struct CliqueGraphMergeStrategy {
    stop: bool,                    // whether merging should halt
    edges: Vec<(usize, usize)>,    // edges (u, v) of the reduced clique graph, u > v
    inter: Vec<usize>,             // per-edge index of its separator in sep_sorted
    weights: Vec<isize>,           // edge weights, parallel to edges
    p: Vec<usize>,                 // workspace for the weight sorting permutation
    adjacency_table: HashMap<usize, VertexSet>, // node -> neighbor set, for fast lookups
    sep_sorted: Vec<VertexSet>,    // separators sorted by descending cardinality
    edge_weight: EdgeWeightMethod, // edge scoring policy
    clique_tree_recomputed: bool,
}

impl CliqueGraphMergeStrategy {
    pub(crate) fn new() -> Self {
        Self {
            stop: false,
            edges: Vec::new(),
            inter: Vec::new(),
            weights: Vec::new(),
            p: Vec::new(),
            adjacency_table: HashMap::new(),
            sep_sorted: Vec::new(),
            edge_weight: EdgeWeightMethod::Complexity,
            clique_tree_recomputed: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn edges_and_weights(&self) -> (&[(usize, usize)], &[isize]) {
        (&self.edges, &self.weights)
    }

    #[cfg(test)]
    pub(crate) fn adjacency(&self) -> &HashMap<usize, VertexSet> {
        &self.adjacency_table
    }

    // test-only initialisation from a tree whose supernodes already
    // hold full cliques and whose separator field holds the minimal
    // separator list
    #[cfg(test)]
    pub(crate) fn initialise_from_cliques(&mut self, t: &mut SuperNodeTree) {
        for i in 0..t.snd_parent.len() {
            t.snd_parent[i] = INACTIVE_NODE;
            t.snd_children[i] = VertexSet::new();
        }

        let (sep_sorted, edges, inter) = compute_reduced_clique_graph(&t.sep, &t.snd);
        let weights = compute_weights(&edges, &t.snd, self.edge_weight);

        self.p = vec![0; edges.len()];
        self.adjacency_table = compute_adjacency_table(&edges, t.snd.len());
        self.edges = edges;
        self.inter = inter;
        self.weights = weights;
        self.sep_sorted = sep_sorted;
    }
}

impl MergeStrategy for CliqueGraphMergeStrategy {
    fn initialise(&mut self, t: &mut SuperNodeTree) {
        // this strategy works on the clique graph, so the tree structure
        // is given up: absorb the separators into the supernodes, which
        // then represent full cliques.  A new clique tree is recomputed
        // in post_process_merge.
        for (snd, sep) in t.snd.iter_mut().zip(t.sep.iter()) {
            for &s in sep {
                snd.insert(s);
            }
        }

        for i in 0..t.snd_parent.len() {
            t.snd_parent[i] = INACTIVE_NODE;
            t.snd_children[i] = VertexSet::new();
        }

        // compute the edges and separator intersections of the reduced
        // clique graph
        let (sep_sorted, edges, inter) = compute_reduced_clique_graph(&t.sep, &t.snd);

        let weights = compute_weights(&edges, &t.snd, self.edge_weight);

        self.p = vec![0; edges.len()];
        self.adjacency_table = compute_adjacency_table(&edges, t.snd.len());
        self.edges = edges;
        self.inter = inter;
        self.weights = weights;
        self.sep_sorted = sep_sorted;
    }

    fn is_done(&self) -> bool {
        self.stop
    }

    fn traverse(&mut self, t: &SuperNodeTree) -> Option<(usize, usize)> {
        if self.edges.is_empty() {
            return None;
        }

        // try the edge with the highest weight first
        let ind = findmax(&self.weights).unwrap();
        if self.weights[ind] == TOMBSTONE {
            return None; // no live edges remain
        }
        if ispermissible(self.edges[ind], &self.adjacency_table, &t.snd) {
            return Some(self.edges[ind]);
        }

        // otherwise sort the weights to find the permutation p, and try
        // edges with decreasing weight until one is permissible.  The
        // weight ordering changes little between merges, so the sort
        // input is almost sorted already.
        sortperm_rev(&mut self.p, &self.weights);

        for k in 1..self.edges.len() {
            let idx = self.p[k];
            if self.weights[idx] == TOMBSTONE {
                break; // everything after this is dead
            }
            if ispermissible(self.edges[idx], &self.adjacency_table, &t.snd) {
                return Some(self.edges[idx]);
            }
        }

        None
    }

    fn evaluate(&mut self, _t: &SuperNodeTree, cand: (usize, usize)) -> bool {
        let idx = find_edge(&self.edges, &self.weights, cand.0, cand.1).unwrap();
        let do_merge = self.weights[idx] >= 0;

        if !do_merge {
            self.stop = true;
        }
        do_merge
    }

    fn merge_two_cliques(&self, t: &mut SuperNodeTree, cand: (usize, usize)) {
        let (c1, c2) = cand;

        // merge clique c2 into c1, emptying c2
        absorb_set(&mut t.snd, c1, c2);

        t.n_cliques -= 1;
    }

    fn update_strategy(&mut self, t: &SuperNodeTree, cand: (usize, usize), do_merge: bool) {
        if !do_merge {
            return;
        }

        let (c_1_ind, c_removed) = cand;
        let c_1 = &t.snd[c_1_ind];

        let neighbors: Vec<usize> = self.adjacency_table[&c_1_ind].iter().copied().collect();

        // neighbors exclusive to the removed clique, order preserving
        let mut new_neighbors = self.adjacency_table[&c_removed].clone();
        for e in neighbors.iter() {
            new_neighbors.shift_remove(e);
        }
        new_neighbors.shift_remove(&c_1_ind);

        // recompute the weight of every edge between c_1 and its neighbors
        for &n_ind in neighbors.iter() {
            if n_ind != c_removed {
                let idx = find_edge(&self.edges, &self.weights, c_1_ind, n_ind).unwrap();
                self.weights[idx] = edge_metric(c_1, &t.snd[n_ind], self.edge_weight);
            }
        }

        // point edges exclusive to the removed clique at the surviving
        // clique and recompute their weights
        for &n_ind in new_neighbors.iter() {
            let idx = find_edge(&self.edges, &self.weights, c_removed, n_ind).unwrap();
            self.edges[idx] = (max(c_1_ind, n_ind), min(c_1_ind, n_ind));
            self.weights[idx] = edge_metric(c_1, &t.snd[n_ind], self.edge_weight);
        }

        // tombstone the merged edge and anything else still touching
        // the removed clique
        for (idx, &(u, v)) in self.edges.iter().enumerate() {
            if u == c_removed || v == c_removed {
                self.weights[idx] = TOMBSTONE;
            }
        }

        // update the adjacency table in the same manner
        for new_neighbor in new_neighbors.iter() {
            self.adjacency_table
                .get_mut(&c_1_ind)
                .unwrap()
                .insert(*new_neighbor);
            self.adjacency_table
                .get_mut(new_neighbor)
                .unwrap()
                .insert(c_1_ind);
        }

        self.adjacency_table.remove(&c_removed);

        for set in self.adjacency_table.values_mut() {
            set.shift_remove(&c_removed);
        }
    }

    fn post_process_merge(&mut self, t: &mut SuperNodeTree) {
        // we have a graph, not a tree, so a post ordering and parent
        // structure do not exist yet.  Just number the nonempty
        // supernodes for now
        t.snd_post = t.snd.iter().position_all(|&x| !x.is_empty());
        t.snd_parent = vec![INACTIVE_NODE; t.snd.len()];

        // recompute a clique tree from the clique graph
        if t.n_cliques > 1 {
            self.clique_tree_from_graph(t);
        }

        t.snd.iter_mut().for_each(|s| s.sort());
        t.sep.iter_mut().for_each(|s| s.sort());
    }
}

impl CliqueGraphMergeStrategy {
    // A clique tree is a maximum weight spanning tree of the clique
    // graph where the edge weights are the cardinality of the
    // intersections between the cliques.
    fn clique_tree_from_graph(&mut self, t: &mut SuperNodeTree) {
        clique_intersections(&mut self.weights, &self.edges, &t.snd);

        kruskal(&self.edges, &mut self.weights, &mut self.p, t.snd.len(), t.n_cliques);

        // the root can be any clique, but we use the one containing the
        // vertex with the highest order
        determine_parent_cliques(
            &mut t.snd_parent,
            &mut t.snd_children,
            &t.snd,
            &t.post,
            &self.edges,
            &self.weights,
        );

        // snd_post shrinks to the possibly reduced clique count
        t.snd_post = post_order(&t.snd_parent, &mut t.snd_children, t.n_cliques);

        // the graph separators are stale; rebuild them from the tree
        t.sep.iter_mut().for_each(|set| set.clear());

        split_cliques(&mut t.snd, &mut t.sep, &t.snd_parent, &t.snd_post, t.n_cliques);

        self.clique_tree_recomputed = true;
    }
}

// ------------------- internal utilities -------------------

// Compute the reduced clique graph (union of all clique trees) given the
// supernodes (holding full cliques) and the separator list.
//
// Uses the algorithm of **Habib & Stacho - Polynomial-time algorithm for
// the leafage of chordal graphs (2009)**:
// 1. Sort the minimal separators by descending cardinality.
// 2. Start from the cliques as nodes, with no edges.
// 3. For each separator S in order, add an edge between any two cliques
//    that both contain S and lie in different connected components of
//    the separator graph of S, recording the separator index in `inter`.
//
// The separator list is sorted on a fresh copy which is returned to the
// caller; the `inter` indices refer to the returned sorted list, not to
// the input order.

pub(crate) fn compute_reduced_clique_graph(
    sep: &[VertexSet],
    snd: &[VertexSet],
) -> (Vec<VertexSet>, Vec<(usize, usize)>, Vec<usize>) {
    let mut sep_sorted = sep.to_vec();
    sep_sorted.sort_by_key(|b| Reverse(b.len()));

    let mut edges = Vec::new();
    let mut inter = Vec::new();

    // duplicate separators in the input would regenerate the same
    // edges, so track what has been added
    let mut seen = HashSet::<(usize, usize)>::new();

    for (k, separator) in sep_sorted.iter().enumerate() {
        // cliques that contain the separator
        let clique_indices = snd.iter().position_all(|&x| separator.is_subset(x));

        // the separator graph of S, for connectivity analysis
        let H = separator_graph(&clique_indices, separator, snd);

        // connected components of H
        let components = find_components(&H, &clique_indices);

        // for each pair of cliques containing the separator, add an
        // edge to the reduced clique graph if they lie in unconnected
        // components
        let ncliques = clique_indices.len();

        for i in 0..ncliques {
            for j in (i + 1)..ncliques {
                let pair = (clique_indices[i], clique_indices[j]);
                if is_unconnected(pair, &components) {
                    let edge = (max(pair.0, pair.1), min(pair.0, pair.1));
                    if seen.insert(edge) {
                        edges.push(edge);
                        inter.push(k);
                    }
                }
            }
        }
    }

    (sep_sorted, edges, inter)
}

// The separator graph H of S restricted to the cliques containing S:
// nodes are clique indices, and (ca, cb) is an edge iff the cliques
// intersect in strictly more than S.

fn separator_graph(
    clique_ind: &[usize],
    separator: &VertexSet,
    snd: &[VertexSet],
) -> HashMap<usize, Vec<usize>> {
    let mut H = HashMap::<usize, Vec<usize>>::new();

    let nindex = clique_ind.len();

    for i in 0..nindex {
        for j in (i + 1)..nindex {
            let ca = clique_ind[i];
            let cb = clique_ind[j];
            // edge iff snd[ca] ∩ snd[cb] != separator, tested without
            // materializing the intersection
            if !inter_equal(&snd[ca], &snd[cb], separator) {
                H.entry(ca).or_default().push(cb);
                H.entry(cb).or_default().push(ca);
            }
        }
    }
    // add unconnected cliques
    for v in clique_ind.iter() {
        H.entry(*v).or_default();
    }
    H
}

// Connected components of the undirected separator graph, by iterative
// depth-first search.  An explicit stack is used to keep large chordal
// problems from exhausting the call stack.
fn find_components(H: &HashMap<usize, Vec<usize>>, clique_ind: &[usize]) -> Vec<VertexSet> {
    let mut visited = HashMap::<usize, bool>::with_capacity(clique_ind.len());
    for v in clique_ind {
        visited.insert(*v, false);
    }

    let mut components = Vec::<VertexSet>::new();
    let mut stack = Vec::<usize>::new();

    for v in clique_ind {
        if !(*visited.get(v).unwrap()) {
            let mut component = VertexSet::new();

            visited.insert(*v, true);
            stack.push(*v);
            while let Some(u) = stack.pop() {
                component.insert(u);
                for n in H.get(&u).unwrap().iter() {
                    if !(*visited.get(n).unwrap()) {
                        visited.insert(*n, true);
                        stack.push(*n);
                    }
                }
            }
            components.push(component);
        }
    }
    components
}

// Whether the `pair` of cliques lies in different `components`.
fn is_unconnected(pair: (usize, usize), components: &[VertexSet]) -> bool {
    let component_ind = components.iter().position(|x| x.contains(&pair.0)).unwrap();
    !components[component_ind].contains(&pair.1)
}

// Check whether s1 ∩ s2 == s3 without allocating the intersection.
fn inter_equal(s1: &VertexSet, s2: &VertexSet, s3: &VertexSet) -> bool {
    let mut dim = 0;

    let len_s3 = s3.len();

    // maximum possible intersection size
    let mut max_intersect = s1.len() + s2.len();
    if max_intersect < len_s3 {
        return false;
    }

    let (sa, sb) = {
        if s1.len() < s2.len() {
            (s1, s2)
        } else {
            (s2, s1)
        }
    };

    for e in sa.iter() {
        if sb.contains(e) {
            dim += 1;
            if dim > len_s3 || !s3.contains(e) {
                return false;
            }
        }
        max_intersect -= 1;
        if max_intersect < len_s3 {
            return false;
        }
    }
    dim == len_s3
}

// Build the adjacency table (node -> set of neighbors) with nodes from
// 0 to num_vertices - 1.

pub(crate) fn compute_adjacency_table(
    edges: &[(usize, usize)],
    num_vertices: usize,
) -> HashMap<usize, VertexSet> {
    let mut table = HashMap::<usize, VertexSet>::with_capacity(num_vertices);

    for i in 0..num_vertices {
        table.insert(i, VertexSet::new());
    }

    for &(u, v) in edges {
        table.get_mut(&u).unwrap().insert(v);
        table.get_mut(&v).unwrap().insert(u);
    }
    table
}

// Check whether `edge` is permissible for a merge: for every common
// neighbor N of the two cliques, C_1 ∩ N == C_2 ∩ N must hold.  With no
// common neighbors the edge is trivially permissible.  This preserves
// the running-intersection property of the recomputed tree.

pub(crate) fn ispermissible(
    edge: (usize, usize),
    adjacency_table: &HashMap<usize, VertexSet>,
    snd: &[VertexSet],
) -> bool {
    let (c_1, c_2) = edge;

    let common_neighbors = adjacency_table[&c_1].intersection(&adjacency_table[&c_2]);

    for &neighbor in common_neighbors {
        let int1 = snd[c_1].intersection(&snd[neighbor]);
        let int2 = snd[c_2].intersection(&snd[neighbor]);
        if !int1.eq(int2) {
            return false;
        }
    }
    true
}

// find the live edge joining cliques c1 and c2, if any
fn find_edge(
    edges: &[(usize, usize)],
    weights: &[isize],
    c1: usize,
    c2: usize,
) -> Option<usize> {
    let key = (max(c1, c2), min(c1, c2));
    edges
        .iter()
        .zip(weights.iter())
        .position(|(&e, &w)| e == key && w != TOMBSTONE)
}

// Replace the weight of every live edge by the cardinality of the
// intersection of its endpoint cliques.
pub(crate) fn clique_intersections(
    weights: &mut [isize],
    edges: &[(usize, usize)],
    snd: &[VertexSet],
) {
    for (w, &(u, v)) in weights.iter_mut().zip(edges.iter()) {
        if *w != TOMBSTONE {
            *w = intersect_dim(&snd[u], &snd[v]) as isize;
        }
    }
}

// Number of elements in s1 ∩ s2.
fn intersect_dim(s1: &VertexSet, s2: &VertexSet) -> usize {
    let (sa, sb) = {
        if s1.len() < s2.len() {
            (s1, s2)
        } else {
            (s2, s1)
        }
    };

    sa.iter().filter(|e| sb.contains(*e)).count()
}

// Size of s1 ∪ s2, assuming each set holds unique elements.
fn union_dim(s1: &VertexSet, s2: &VertexSet) -> usize {
    s1.len() + s2.len() - intersect_dim(s1, s2)
}

// Kruskal's algorithm for a maximum weight spanning tree of the clique
// graph.  Selected edges are marked with the IN_TREE sentinel weight;
// tombstoned edges are skipped.  The disjoint set structure covers the
// initial clique indices so that dead indices do not shift live ones.

pub(crate) fn kruskal(
    edges: &[(usize, usize)],
    weights: &mut [isize],
    p: &mut [usize],
    num_initial_cliques: usize,
    num_cliques: usize,
) {
    let mut connected = DisjointSetUnion::new(num_initial_cliques);

    sortperm_rev(p, weights);

    let mut num_edges_found = 0;

    // iterate through edges with decreasing weight
    for &k in p.iter() {
        if weights[k] == TOMBSTONE {
            break; // only dead edges remain
        }
        let (u, v) = edges[k];
        if !connected.in_same_set(u, v) {
            connected.union(u, v);
            weights[k] = IN_TREE;
            num_edges_found += 1;
            // stop when all cliques are joined in one tree
            if num_edges_found >= (num_cliques - 1) {
                break;
            }
        }
    }
}

// Given the spanning tree marked in `weights`, determine a parent
// structure for the clique tree.

fn determine_parent_cliques(
    snd_parent: &mut [usize],
    snd_children: &mut [VertexSet],
    cliques: &[VertexSet],
    post: &[usize],
    edges: &[(usize, usize)],
    weights: &[isize],
) {
    // vertex with the highest order
    let v = post.last().unwrap();
    let mut c = 0;

    // find the clique that contains that vertex and make it the root
    for (k, clique) in cliques.iter().enumerate() {
        if clique.contains(v) {
            snd_parent[k] = NO_PARENT;
            c = k;
            break;
        }
    }

    // assign children along the spanning tree, iteratively
    let mut stack = vec![c];

    while let Some(c) = stack.pop() {
        for (idx, &(u, v)) in edges.iter().enumerate() {
            if weights[idx] != IN_TREE {
                continue;
            }
            let n = {
                if u == c {
                    v
                } else if v == c {
                    u
                } else {
                    continue;
                }
            };
            // skip the edge back up to c's own parent
            if snd_parent[c] != n {
                snd_parent[n] = c;
                snd_children[c].insert(n);
                stack.push(n);
            }
        }
    }
}

// Traverse the new clique tree in descending topological order and
// split each clique back into a supernode and a separator.

fn split_cliques(
    snd: &mut [VertexSet],
    sep: &mut [VertexSet],
    snd_parent: &[usize],
    snd_post: &[usize],
    num_cliques: usize,
) {
    for j in 0..(num_cliques - 1) {
        let c_ind = snd_post[j];
        let p_ind = snd_parent[c_ind];

        // the separator is the intersection of the clique with its parent
        sep[c_ind] = VertexSet::new();
        sep[c_ind].extend(snd[c_ind].intersection(&snd[p_ind]));

        let mut tmp = VertexSet::new();
        tmp.extend(snd[c_ind].iter().filter(|&s| !sep[c_ind].contains(s)));
        snd[c_ind] = tmp;
    }
}

// -------------------
// edge weights
// -------------------

// Compute the edge weight between all cliques specified by `edges`.

fn compute_weights(
    edges: &[(usize, usize)],
    snd: &[VertexSet],
    edge_weight: EdgeWeightMethod,
) -> Vec<isize> {
    edges
        .iter()
        .map(|&(u, v)| edge_metric(&snd[u], &snd[v], edge_weight))
        .collect()
}

// Given two cliques `c_a` and `c_b`, return a weight for their edge.

pub(crate) fn edge_metric(c_a: &VertexSet, c_b: &VertexSet, edge_weight: EdgeWeightMethod) -> isize {
    let n_1 = c_a.len() as isize;
    let n_2 = c_b.len() as isize;

    // merged block size
    let n_m = union_dim(c_a, c_b) as isize;

    match edge_weight {
        EdgeWeightMethod::Complexity => n_1.pow(3) + n_2.pow(3) - n_m.pow(3),
    }
}
