// -----------------------------------
// reverse the standard decomposition
// -----------------------------------

use crate::algebra::*;
use crate::solver::chordal::ChordalInfo;
use crate::solver::DefaultVariables;

impl<T> ChordalInfo<T>
where
    T: FloatT,
{
    pub(crate) fn decomp_reverse_standard(
        &self,
        new_vars: &mut DefaultVariables<T>,
        old_vars: &DefaultVariables<T>,
    ) {
        let H = self.H.as_ref().unwrap();
        let (_, m) = new_vars.dims();

        // slack and dual of the original rows are reassembled from the
        // per-clique blocks through H; the equality multiplier on the
        // original rows carries over directly
        H.gemv(&mut new_vars.s, &old_vars.s[m..], T::one(), T::zero());
        H.gemv(&mut new_vars.μ, &old_vars.μ[m..], T::one(), T::zero());
        new_vars.ν.copy_from(&old_vars.ν[0..m]);

        // entries shared between blocks were summed once per block;
        // the reported dual takes their average.  H carries a unit
        // entry per block touching a row, so the number of overlapping
        // blocks is just the row's entry count
        let mut hits = vec![0usize; H.m];
        for &r in H.rowval.iter() {
            hits[r] += 1;
        }

        for (μi, &k) in new_vars.μ.iter_mut().zip(hits.iter()) {
            if k > 1 {
                *μi /= T::from_usize(k).unwrap();
            }
        }
    }
}
