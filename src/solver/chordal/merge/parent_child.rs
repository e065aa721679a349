use super::*;
use crate::solver::chordal::*;

// Tree based merge strategy.  Every clique is considered exactly once,
// in descending topological order, and is folded into its parent when
// the predicted fill-in or the supernode sizes fall below fixed
// thresholds.

pub(crate) struct ParentChildMergeStrategy {
    // cliques still to be visited, popped from the back.  Built once
    // at initialisation from the clique postorder, with the root left
    // out since it has no parent to fold into
    schedule: Vec<usize>,
    t_fill: usize,
    t_size: usize,
}

impl ParentChildMergeStrategy {
    pub(crate) fn new(t_fill: usize, t_size: usize) -> Self {
        Self {
            schedule: Vec::new(),
            t_fill,
            t_size,
        }
    }
}

impl MergeStrategy for ParentChildMergeStrategy {
    fn initialise(&mut self, t: &mut SuperNodeTree) {
        // popping from the back of the postorder visits cliques of
        // higher order first
        let nkeep = t.snd_post.len() - 1;
        self.schedule = t.snd_post[..nkeep].to_vec();
    }

    fn is_done(&self) -> bool {
        self.schedule.is_empty()
    }

    // Candidates are (parent, clique) pairs.  The parent lookup is
    // live: earlier merges may already have handed this clique to a
    // new parent.
    fn traverse(&mut self, t: &SuperNodeTree) -> Option<(usize, usize)> {
        let c = *self.schedule.last()?;
        Some((t.snd_parent[c], c))
    }

    fn evaluate(&mut self, t: &SuperNodeTree, cand: (usize, usize)) -> bool {
        let (parent, child) = cand;

        let overlap = t.sep[child].len();
        let parent_dim = t.snd[parent].len() + t.sep[parent].len();
        let child_dim = t.snd[child].len() + t.sep[child].len();

        // fill-in that a merge would introduce into the parent block
        let fill = (parent_dim - overlap) * (child_dim - overlap);
        let max_snd = std::cmp::max(t.snd[child].len(), t.snd[parent].len());

        fill <= self.t_fill || max_snd <= self.t_size
    }

    fn merge_two_cliques(&self, t: &mut SuperNodeTree, cand: (usize, usize)) {
        // orient the pair: the parent holds the other as a child
        let (p, ch) = {
            if t.snd_children[cand.0].contains(&cand.1) {
                (cand.0, cand.1)
            } else {
                (cand.1, cand.0)
            }
        };

        // the parent takes over the child's vertices; the child's
        // separator dissolves into the merged block
        absorb_set(&mut t.snd, p, ch);
        t.sep[ch].clear();

        // grandchildren move up one level
        let grandchildren = std::mem::take(&mut t.snd_children[ch]);
        for &g in grandchildren.iter() {
            t.snd_parent[g] = p;
        }
        t.snd_children[p].shift_remove(&ch);
        t.snd_children[p].extend(grandchildren);

        t.snd_parent[ch] = INACTIVE_NODE;
        t.n_cliques -= 1;
    }

    fn update_strategy(&mut self, _t: &SuperNodeTree, _cand: (usize, usize), _do_merge: bool) {
        self.schedule.pop();
    }

    fn post_process_merge(&mut self, t: &mut SuperNodeTree) {
        // merging leaves empty supernodes behind; the postorder is
        // recomputed over the survivors
        t.snd_post = post_order(&t.snd_parent, &mut t.snd_children, t.n_cliques);
    }
}
