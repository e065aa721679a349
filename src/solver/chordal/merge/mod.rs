mod clique_graph;
mod disjoint_set_union;
mod nomerge;
mod parent_child;
use crate::solver::chordal::*;
pub(crate) use clique_graph::*;
pub(crate) use disjoint_set_union::*;
pub(crate) use nomerge::*;
pub(crate) use parent_child::*;

#[cfg(test)]
mod tests;

// Clique merging runs through a fixed scheduler; strategies only decide
// which candidates to offer and whether to accept them.

pub(crate) trait MergeStrategy {
    // scheduler shared by every strategy.  Candidates keep coming
    // until the strategy stops, runs dry, or the structure degenerates
    // to a single clique
    fn merge_cliques(&mut self, t: &mut SuperNodeTree) {
        self.initialise(t);

        while !(self.is_done() || t.n_cliques <= 1) {
            let Some(cand) = self.traverse(t) else {
                break;
            };

            let do_merge = self.evaluate(t, cand);
            if do_merge {
                self.merge_two_cliques(t, cand);
            }
            self.log_merge(t, cand, do_merge);
            self.update_strategy(t, cand, do_merge);
        }

        self.post_process_merge(t);
    }

    // record the outcome of a candidate evaluation
    fn log_merge(&self, t: &mut SuperNodeTree, cand: (usize, usize), accepted: bool) {
        t.merge_log.push(MergeLogEntry { cand, accepted });
    }

    // prepare the tree and any internal bookkeeping
    fn initialise(&mut self, t: &mut SuperNodeTree);

    // true once no further candidates should be offered
    fn is_done(&self) -> bool;

    // propose the next candidate pair, if any
    fn traverse(&mut self, t: &SuperNodeTree) -> Option<(usize, usize)>;

    // decide whether the candidate pair should merge
    fn evaluate(&mut self, t: &SuperNodeTree, cand: (usize, usize)) -> bool;

    // carry out an accepted merge
    fn merge_two_cliques(&self, t: &mut SuperNodeTree, cand: (usize, usize));

    // refresh bookkeeping after a candidate was handled
    fn update_strategy(&mut self, t: &SuperNodeTree, cand: (usize, usize), do_merge: bool);

    // restore the tree invariants once merging is finished
    fn post_process_merge(&mut self, t: &mut SuperNodeTree);
}

// edge weighting policies for the clique graph strategy.  A positive
// weight predicts that one larger projection is cheaper than two
// smaller ones.
#[derive(Clone, Copy, Debug)]
pub(crate) enum EdgeWeightMethod {
    // |Ci|³ + |Cj|³ - |Ci ∪ Cj|³
    Complexity,
}

// utilities

// sets[dst] absorbs sets[src], leaving the source empty.  Taking the
// source out first sidesteps the aliasing problem of indexing the same
// slice twice.

pub(crate) fn absorb_set(sets: &mut [VertexSet], dst: usize, src: usize) {
    if dst == src {
        return;
    }
    let moved = std::mem::take(&mut sets[src]);
    sets[dst].extend(moved);
}
