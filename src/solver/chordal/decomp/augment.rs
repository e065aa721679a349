#![allow(non_snake_case)]

// -----------------------------------------
// The standard form of the decomposition transformation.
//
// Each decomposable PSD constraint is replaced by one smaller PSD cone
// per clique.  A selection matrix H, with one unit entry per clique
// variable, scatters the stacked clique variables z onto the original
// rows, so the transformed problem reads
//
//   minimize    ½ x'Px + q'x
//   subject to  Ax + Hz = b        (zero cone over the original rows)
//               z ∈ K_decomposed
//
// Overlapping clique entries land on the same row of H and are summed,
// which is exactly the decomposition of a pattern-supported PSD matrix
// into clique-supported PSD terms.
// -----------------------------------------

use crate::{
    algebra::*,
    solver::{
        chordal::{ChordalInfo, SparsityPattern},
        SupportedConeT::{self, *},
    },
};

impl<T> ChordalInfo<T>
where
    T: FloatT,
{
    #[allow(clippy::type_complexity)]
    pub(crate) fn decomp_augment_standard(
        &mut self,
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        b: &[T],
    ) -> (
        CscMatrix<T>,
        Vec<T>,
        CscMatrix<T>,
        Vec<T>,
        Vec<SupportedConeT<T>>,
    ) {
        let (m, n) = A.size();

        let (H, cones_new) = self.build_H_and_cones();
        let nz = H.ncols();

        // the clique variables carry no quadratic or linear cost, so P
        // is padded with empty columns and q and b with zeros
        let mut P_new = P.clone();
        let nnzP = P_new.nnz();
        P_new.colptr.extend(std::iter::repeat(nnzP).take(nz));
        P_new.m += nz;
        P_new.n += nz;

        let mut q_new = q.to_vec();
        q_new.resize(n + nz, T::zero());

        let mut b_new = b.to_vec();
        b_new.resize(m + nz, T::zero());

        // assemble [[A H]; [0 -I]] column-stack by column-stack: the x
        // columns sit over zeros, the clique columns over -I
        let left = CscMatrix::vcat(A, &CscMatrix::zeros((nz, n)));

        let mut negI = CscMatrix::identity(nz);
        negI.negate();
        let right = CscMatrix::vcat(&H, &negI);

        let A_new = CscMatrix::hcat(&left, &right);

        // H is kept for the reversal step
        self.H = Some(H);

        (P_new, q_new, A_new, b_new, cones_new)
    }

    // The selection matrix H and the decomposed cone list.  H has one
    // column per clique variable holding a single unit entry, so it is
    // assembled directly in CSC form from its row indices.
    fn build_H_and_cones(&self) -> (CscMatrix<T>, Vec<SupportedConeT<T>>) {
        let (_, m) = self.init_dims;
        let (nz, _) = self.get_decomposed_dim_and_overlaps();

        let mut rows = Vec::with_capacity(nz);
        let mut cones_new = Vec::with_capacity(self.final_cone_count() + 1);

        // the original rows all become equalities gluing the blocks
        cones_new.push(ZeroConeT(m));

        let mut row0 = 0;
        for (coneidx, cone) in self.init_cones.iter().enumerate() {
            match self.pattern_for(coneidx) {
                Some(sp) => {
                    push_clique_columns(&mut rows, &mut cones_new, sp, row0);
                }
                None => {
                    // undecomposed cones map through unchanged
                    rows.extend(row0..row0 + cone.nvars());
                    cones_new.push(cone.clone());
                }
            }
            row0 += cone.nvars();
        }

        debug_assert_eq!(rows.len(), nz);

        let H = CscMatrix::new(m, nz, (0..=nz).collect(), rows, vec![T::one(); nz]);
        (H, cones_new)
    }
}

// Emit the H columns and the cone for every clique of a decomposed
// block.  The tree algorithms worked on a permuted pattern, so each
// clique is first mapped back to the row order of the data.

fn push_clique_columns<T>(
    rows: &mut Vec<usize>,
    cones_new: &mut Vec<SupportedConeT<T>>,
    sp: &SparsityPattern,
    row0: usize,
) where
    T: FloatT,
{
    for i in 0..sp.sntree.n_cliques {
        let mut verts: Vec<usize> = sp
            .sntree
            .get_clique(i)
            .iter()
            .map(|&v| sp.ordering[v])
            .collect();
        verts.sort_unstable();

        // one column per upper triangular entry of the clique block,
        // in the block's own packed ordering
        for (j, &vj) in verts.iter().enumerate() {
            for &vi in verts[..=j].iter() {
                rows.push(row0 + coord_to_upper_triangular_index((vi, vj)));
            }
        }

        cones_new.push(PSDTriangleConeT(sp.sntree.get_nblk(i)));
    }
}
