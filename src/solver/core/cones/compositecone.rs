use super::*;
use crate::algebra::*;
use std::ops::Range;

// -------------------------------------
// default composite cone type
// -------------------------------------

pub struct CompositeCone<T: FloatT = f64> {
    cones: Vec<SupportedCone<T>>,

    // overall number of rows in the composite cone
    pub(crate) numel: usize,

    // ranges for the indices of the constituent cones
    pub(crate) rng_cones: Vec<Range<usize>>,
}

impl<T> CompositeCone<T>
where
    T: FloatT,
{
    pub fn new(types: &[SupportedConeT<T>]) -> Self {
        let mut cones: Vec<SupportedCone<T>> = Vec::with_capacity(types.len());

        for t in types.iter() {
            cones.push(make_cone(t));
        }

        let numel = cones.iter().map(|c| c.numel()).sum();

        // the index ranges of the constituent cones partition 0..numel
        let mut rng_cones = Vec::with_capacity(cones.len());
        let mut start = 0;
        for cone in &cones {
            let stop = start + cone.numel();
            rng_cones.push(start..stop);
            start = stop;
        }

        Self {
            cones,
            numel,
            rng_cones,
        }
    }

    pub fn len(&self) -> usize {
        self.cones.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, SupportedCone<T>> {
        self.cones.iter()
    }
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SupportedCone<T>> {
        self.cones.iter_mut()
    }

    // is the cone at the given position a zero (equality) cone?
    pub(crate) fn is_zero_cone(&self, i: usize) -> bool {
        matches!(self.cones[i], SupportedCone::ZeroCone(_))
    }
}

impl<T> Cone<T> for CompositeCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.numel
    }

    fn project(&mut self, x: &mut [T]) {
        let cones = &mut self.cones;
        let rngs = &self.rng_cones;
        for (cone, rng) in cones.iter_mut().zip(rngs.iter()) {
            cone.project(&mut x[rng.clone()]);
        }
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        let cones = &mut self.cones;
        let rngs = &self.rng_cones;
        for (cone, rng) in cones.iter_mut().zip(rngs.iter()) {
            if !cone.in_dual(&y[rng.clone()], tol) {
                return false;
            }
        }
        true
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        let cones = &mut self.cones;
        let rngs = &self.rng_cones;
        for (cone, rng) in cones.iter_mut().zip(rngs.iter()) {
            if !cone.in_recession(&x[rng.clone()], tol) {
                return false;
            }
        }
        true
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        let cones = &mut self.cones;
        let rngs = &self.rng_cones;
        let mut out = T::zero();
        for (cone, rng) in cones.iter_mut().zip(rngs.iter()) {
            out += cone.support_function(&y[rng.clone()], tol);
            if out == T::infinity() {
                break;
            }
        }
        out
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        let mut any_changed = false;

        // we will update e <- δ .* e using return values
        // from this function.  The default is to do nothing at all
        δ.set(T::one());
        for (cone, rng) in self.iter().zip(self.rng_cones.iter()) {
            let δi = &mut δ[rng.clone()];
            let ei = &e[rng.clone()];
            any_changed |= cone.rectify_equilibration(δi, ei);
        }
        any_changed
    }

    fn scale_units(&mut self, e: &[T]) {
        let cones = &mut self.cones;
        let rngs = &self.rng_cones;
        for (cone, rng) in cones.iter_mut().zip(rngs.iter()) {
            cone.scale_units(&e[rng.clone()]);
        }
    }
}
