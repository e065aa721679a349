use super::*;
use crate::algebra::triangular_number;
use enum_dispatch::*;

// ---------------------------------------------------
// We define some machinery here for enumerating the
// different cone types that can live in the composite cone
// ---------------------------------------------------

/// API type describing the type of a conic constraint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupportedConeT<T> {
    /// The zero cone (used for equality constraints).
    ///
    /// The parameter indicates the cone's dimension.
    ZeroConeT(usize),
    /// The nonnegative cone.
    NonnegativeConeT(usize),
    /// The box set `{ s : l ≤ s ≤ u }`.
    ///
    /// The parameters are the lower and upper bound vectors.
    BoxConeT(Vec<T>, Vec<T>),
    /// The second order cone.
    SecondOrderConeT(usize),
    /// The positive semidefinite cone in full (square) storage.
    ///
    /// The parameter is the matrix side dimension, so the cone
    /// occupies n² rows.
    PSDConeT(usize),
    /// The positive semidefinite cone in scaled triangular storage.
    ///
    /// The parameter is the matrix side dimension, so the cone
    /// occupies n(n+1)/2 rows.
    PSDTriangleConeT(usize),
    /// The exponential cone in ℝ³.
    ExponentialConeT(),
    /// The dual exponential cone in ℝ³.
    DualExponentialConeT(),
    /// The power cone with power α in ℝ³.
    PowerConeT(T),
    /// The dual power cone with power α in ℝ³.
    DualPowerConeT(T),
}

impl<T> SupportedConeT<T> {
    /// number of rows occupied by the cone
    pub fn nvars(&self) -> usize {
        match self {
            SupportedConeT::ZeroConeT(dim) => *dim,
            SupportedConeT::NonnegativeConeT(dim) => *dim,
            SupportedConeT::BoxConeT(l, _u) => l.len(),
            SupportedConeT::SecondOrderConeT(dim) => *dim,
            SupportedConeT::PSDConeT(dim) => dim * dim,
            SupportedConeT::PSDTriangleConeT(dim) => triangular_number(*dim),
            SupportedConeT::ExponentialConeT() => 3,
            SupportedConeT::DualExponentialConeT() => 3,
            SupportedConeT::PowerConeT(_) => 3,
            SupportedConeT::DualPowerConeT(_) => 3,
        }
    }
}

// -------------------------------------
// the internal cone representation
// -------------------------------------

#[enum_dispatch(Cone<T>)]
pub enum SupportedCone<T>
where
    T: FloatT,
{
    ZeroCone(ZeroCone<T>),
    NonnegativeCone(NonnegativeCone<T>),
    BoxCone(BoxCone<T>),
    SecondOrderCone(SecondOrderCone<T>),
    PSDCone(PSDCone<T>),
    PSDTriangleCone(PSDTriangleCone<T>),
    ExponentialCone(ExponentialCone<T>),
    DualExponentialCone(DualExponentialCone<T>),
    PowerCone(PowerCone<T>),
    DualPowerCone(DualPowerCone<T>),
}

// make a cone object from the API type
pub(crate) fn make_cone<T: FloatT>(cone: &SupportedConeT<T>) -> SupportedCone<T> {
    match cone {
        SupportedConeT::ZeroConeT(dim) => ZeroCone::<T>::new(*dim).into(),
        SupportedConeT::NonnegativeConeT(dim) => NonnegativeCone::<T>::new(*dim).into(),
        SupportedConeT::BoxConeT(l, u) => BoxCone::<T>::new(l, u).into(),
        SupportedConeT::SecondOrderConeT(dim) => SecondOrderCone::<T>::new(*dim).into(),
        SupportedConeT::PSDConeT(dim) => PSDCone::<T>::new(*dim).into(),
        SupportedConeT::PSDTriangleConeT(dim) => PSDTriangleCone::<T>::new(*dim).into(),
        SupportedConeT::ExponentialConeT() => ExponentialCone::<T>::new().into(),
        SupportedConeT::DualExponentialConeT() => DualExponentialCone::<T>::new().into(),
        SupportedConeT::PowerConeT(α) => PowerCone::<T>::new(*α).into(),
        SupportedConeT::DualPowerConeT(α) => DualPowerCone::<T>::new(*α).into(),
    }
}
