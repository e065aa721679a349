mod augment;
mod psd_completion;
mod reverse;

use super::chordal_info::ChordalInfo;
use crate::{
    algebra::*,
    solver::{DefaultVariables, SupportedConeT},
};

impl<T> ChordalInfo<T>
where
    T: FloatT,
{
    #[allow(clippy::type_complexity)]
    pub(crate) fn decomp_augment(
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
        self.decomp_augment_standard(P, q, A, b)
    }

    pub(crate) fn decomp_reverse(
        &self,
        old_vars: &DefaultVariables<T>,
        complete_dual: bool,
    ) -> DefaultVariables<T> {
        // `old_vars` is the solution of the internal decomposed
        // problem; rebuild the user's variables from it

        let (n, m) = self.init_dims;
        let mut new_vars = DefaultVariables::<T>::new(n, m);

        new_vars.x.copy_from(&old_vars.x[0..n]);

        self.decomp_reverse_standard(&mut new_vars, old_vars);

        if complete_dual {
            self.psd_completion(&mut new_vars);
        }

        new_vars
    }
}
