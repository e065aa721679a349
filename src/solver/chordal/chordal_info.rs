#![allow(non_snake_case)]

use crate::{
    algebra::*,
    ldl::LdlFactorization,
    solver::{
        implementations::default::DefaultSettings,
        SupportedConeT::{self, *},
    },
};

use super::SparsityPattern;

// -------------------------------------
// Chordal decomposition information
// -------------------------------------

#[derive(Debug)]
pub(crate) struct ChordalInfo<T> {
    // (n, m) of the original problem
    pub init_dims: (usize, usize),
    // the original cones of the problem
    pub init_cones: Vec<SupportedConeT<T>>,

    // sparsity patterns of the decomposable PSD cones
    pub spatterns: Vec<SparsityPattern>,

    // the selection matrix gluing decomposed blocks to the original
    // rows.  Required for the reversal step
    pub H: Option<CscMatrix<T>>,
}

impl<T> ChordalInfo<T>
where
    T: FloatT,
{
    pub(crate) fn new(
        A: &CscMatrix<T>,
        b: &[T],
        cones: &[SupportedConeT<T>],
        settings: &DefaultSettings<T>,
    ) -> Self {
        // a row of the aggregate structure is live when either the
        // matrix or the constant term touches it
        let mut nz_mask: Vec<bool> = b.iter().map(|&bi| bi != T::zero()).collect();
        for &r in A.rowval.iter() {
            nz_mask[r] = true;
        }

        // walk the cones and collect a pattern for every triangular
        // PSD block with exploitable sparsity
        let mut spatterns = Vec::new();
        let mut row = 0;

        for (coneidx, cone) in cones.iter().enumerate() {
            let numel = cone.nvars();
            if let PSDTriangleConeT(dim) = cone {
                let block = &mut nz_mask[row..row + numel];
                if let Some(sp) = decomposition_pattern(block, *dim, coneidx, settings) {
                    spatterns.push(sp);
                }
            }
            row += numel;
        }

        // the generating cones are only needed when something was
        // actually decomposed
        let init_cones = {
            if spatterns.is_empty() {
                Vec::new()
            } else {
                cones.to_vec()
            }
        };

        Self {
            init_dims: (A.ncols(), A.nrows()),
            init_cones,
            spatterns,
            H: None,
        }
    }

    // did any PSD cones get decomposed?
    pub(crate) fn is_decomposed(&self) -> bool {
        !self.spatterns.is_empty()
    }

    // cone count after decomposition: each decomposed cone is replaced
    // by one cone per clique
    pub(crate) fn final_cone_count(&self) -> usize {
        let added: usize = self
            .spatterns
            .iter()
            .map(|sp| sp.sntree.n_cliques - 1)
            .sum();
        self.init_cones.len() + added
    }

    // total variables and overlaps of the decomposed blocks
    pub(crate) fn get_decomposed_dim_and_overlaps(&self) -> (usize, usize) {
        let mut sum_cols = 0;
        let mut sum_overlaps = 0;

        for (coneidx, cone) in self.init_cones.iter().enumerate() {
            let (cols, overlap) = {
                match self.pattern_for(coneidx) {
                    Some(sp) => sp.sntree.get_decomposed_dim_and_overlaps(),
                    None => (cone.nvars(), 0),
                }
            };
            sum_cols += cols;
            sum_overlaps += overlap;
        }

        (sum_cols, sum_overlaps)
    }

    // the pattern generated for the given cone index, if any
    pub(crate) fn pattern_for(&self, coneidx: usize) -> Option<&SparsityPattern> {
        self.spatterns.iter().find(|sp| sp.orig_index == coneidx)
    }
}

// -------------------------------------
// per-block analysis
// -------------------------------------

// Analyse one triangular PSD block.  Returns its sparsity pattern
// unless the block is dense or the cliques all merged back together.

fn decomposition_pattern<T: FloatT>(
    mask: &mut [bool],
    conedim: usize,
    coneidx: usize,
    settings: &DefaultSettings<T>,
) -> Option<SparsityPattern> {
    // the diagonal is always treated as structurally present, which
    // keeps the symbolic factorization well posed
    for i in 0..conedim {
        mask[triangular_index(i)] = true;
    }

    if mask.iter().all(|&m| m) {
        return None; // dense block, nothing to exploit
    }

    let (L, ordering) = symbolic_factor_pattern(mask, conedim);
    let spattern = SparsityPattern::new(L, ordering, coneidx, settings);

    (spattern.sntree.n_cliques > 1).then_some(spattern)
}

// Symbolic elimination of a block's pattern: an AMD ordered logical
// LDL pass produces the filled factor L, whose column structure is a
// chordal completion of the pattern's graph, together with the
// ordering it was computed under.

fn symbolic_factor_pattern(mask: &[bool], dim: usize) -> (CscMatrix<f64>, Vec<usize>) {
    let mut rows = Vec::new();
    let mut cols = Vec::new();

    for c in 0..dim {
        for r in 0..=c {
            if mask[coord_to_upper_triangular_index((r, c))] {
                rows.push(r);
                cols.push(c);
            }
        }
    }

    // values are irrelevant to a logical factorization
    let vals = vec![1f64; rows.len()];
    let pattern = CscMatrix::new_from_triplets(dim, dim, rows, cols, vals);

    let factors = LdlFactorization::<f64>::new(&pattern, None, true).unwrap();
    let mut L = factors.L;

    stitch_unconnected_columns(&mut L);

    (L, factors.perm)
}

// An elimination ordering of a disconnected pattern leaves columns
// with an empty subdiagonal in the middle of the factor.  Linking each
// such column to its successor keeps the elimination structure a
// single tree.

fn stitch_unconnected_columns<T: FloatT>(L: &mut CscMatrix<T>) {
    let n = L.ncols();

    let isolated: Vec<usize> = (0..n - 1)
        .filter(|&j| {
            L.rowval[L.colptr[j]..L.colptr[j + 1]]
                .iter()
                .all(|&row| row <= j)
        })
        .collect();

    for j in isolated {
        L.set_entry((j + 1, j), T::one());
    }
}

// -------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_factor_of_band() {
        // 5x5 pattern with diagonal and first superdiagonal
        let n = 5;
        let mut mask = vec![false; triangular_number(n)];
        for i in 0..n {
            mask[triangular_index(i)] = true;
        }
        for i in 0..(n - 1) {
            mask[coord_to_upper_triangular_index((i, i + 1))] = true;
        }

        let (L, ordering) = symbolic_factor_pattern(&mask, n);
        assert_eq!(L.ncols(), n);
        assert_eq!(ordering.len(), n);

        // every non-terminal column of L connects downwards
        for j in 0..(n - 1) {
            assert!(L.rowval[L.colptr[j]..L.colptr[j + 1]]
                .iter()
                .any(|&r| r > j));
        }
    }

    #[test]
    fn test_stitching_disconnected_blocks() {
        // 4x4 logical factor of two disconnected 2-blocks: columns 1
        // and 3 have empty subdiagonals
        let mut L = CscMatrix::new(
            4,
            4,
            vec![0, 1, 1, 2, 2],
            vec![1, 3],
            vec![1.0f64, 1.0],
        );
        stitch_unconnected_columns(&mut L);

        // column 1 is now linked to vertex 2
        assert_eq!(L.get_entry((2, 1)), Some(1.0));

        // the final column stays untouched
        assert_eq!(L.colptr[4] - L.colptr[3], 0);
    }

    #[test]
    fn test_dense_block_is_not_decomposed() {
        let n = 3;
        let mut mask = vec![true; triangular_number(n)];
        let settings = DefaultSettings::<f64>::default();
        assert!(decomposition_pattern(&mut mask, n, 0, &settings).is_none());
    }
}
