use crate::algebra::*;
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Solver settings.
///
/// Defaults are configured with a builder, e.g.
/// ```no_run
/// use splitcone::solver::DefaultSettingsBuilder;
/// let settings = DefaultSettingsBuilder::<f64>::default()
///     .eps_abs(1e-6)
///     .max_iter(4000)
///     .build()
///     .unwrap();
/// ```

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultSettings<T: FloatT> {
    /// maximum number of iterations
    #[builder(default = "2500")]
    pub max_iter: u32,

    /// maximum run time (seconds).  Zero disables the limit
    #[builder(default = "0.0")]
    pub time_limit: f64,

    /// verbose printing
    #[builder(default = "false")]
    pub verbose: bool,

    /// absolute residual tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_abs: T,

    /// relative residual tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_rel: T,

    /// primal infeasibility detection tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_prim_inf: T,

    /// dual infeasibility detection tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_dual_inf: T,

    /// over-relaxation parameter, in (0, 2)
    #[builder(default = "(1.6).as_T()")]
    pub alpha: T,

    /// KKT regularization parameter
    #[builder(default = "(1e-6).as_T()")]
    pub sigma: T,

    /// initial penalty parameter
    #[builder(default = "(0.1).as_T()")]
    pub rho: T,

    /// smallest allowable penalty
    #[builder(default = "(1e-6).as_T()")]
    pub rho_min: T,

    /// largest allowable penalty
    #[builder(default = "(1e6).as_T()")]
    pub rho_max: T,

    /// enable residual balancing updates of the penalty
    #[builder(default = "true")]
    pub adaptive_rho: bool,

    /// iterations between penalty updates
    #[builder(default = "40")]
    pub adaptive_rho_interval: u32,

    /// accept a new penalty only if it changes ρ by this ratio
    #[builder(default = "(5.0).as_T()")]
    pub adaptive_rho_tolerance: T,

    /// iterations between convergence checks
    #[builder(default = "40")]
    pub check_termination: u32,

    /// iterations between infeasibility checks.  Zero disables
    #[builder(default = "40")]
    pub check_infeasibility: u32,

    /// number of Ruiz equilibration iterations.  Zero disables scaling
    #[builder(default = "10")]
    pub scaling: u32,

    /// minimum scaling factor
    #[builder(default = "(1e-4).as_T()")]
    pub min_scaling: T,

    /// maximum scaling factor
    #[builder(default = "(1e4).as_T()")]
    pub max_scaling: T,

    /// enable chordal decomposition of PSD triangle cones
    #[builder(default = "true")]
    pub decompose: bool,

    /// clique merge strategy ("none", "parent_child" or "clique_graph")
    #[builder(default = r#""clique_graph".to_string()"#)]
    pub merge_method: String,

    /// parent-child merge fill-in threshold
    #[builder(default = "8")]
    pub merge_t_fill: usize,

    /// parent-child merge supernode size threshold
    #[builder(default = "8")]
    pub merge_t_size: usize,

    /// complete the dual variable of decomposed PSD cones
    #[builder(default = "true")]
    pub complete_dual: bool,
}

impl<T> Default for DefaultSettings<T>
where
    T: FloatT,
{
    fn default() -> DefaultSettings<T> {
        DefaultSettingsBuilder::<T>::default().build().unwrap()
    }
}

// pre-build checker (for auto-validation when using the builder)

impl<T> DefaultSettingsBuilder<T>
where
    T: FloatT,
{
    fn validate(&self) -> Result<(), String> {
        if let Some(alpha) = self.alpha {
            validate_alpha(alpha)?;
        }
        if let Some(rho) = self.rho {
            validate_positive("rho", rho)?;
        }
        if let Some(sigma) = self.sigma {
            validate_positive("sigma", sigma)?;
        }
        if let Some(ref merge_method) = self.merge_method {
            validate_merge_method(merge_method.as_str())?;
        }
        Ok(())
    }
}

// post-build checker, used by the solver constructor on settings that
// may have been assembled manually

impl<T> DefaultSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid
    pub fn validate(&self) -> Result<(), String> {
        validate_alpha(self.alpha)?;
        validate_positive("rho", self.rho)?;
        validate_positive("sigma", self.sigma)?;
        validate_merge_method(&self.merge_method)?;

        if self.eps_abs < T::zero() || self.eps_rel < T::zero() {
            return Err("Residual tolerances must be nonnegative".to_string());
        }
        if self.min_scaling <= T::zero() || self.max_scaling < self.min_scaling {
            return Err("Scaling bounds must satisfy 0 < min_scaling <= max_scaling".to_string());
        }
        if self.rho_min <= T::zero() || self.rho_max < self.rho_min {
            return Err("Penalty bounds must satisfy 0 < rho_min <= rho_max".to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions
// ---------------------------------------------------------

fn validate_alpha<T: FloatT>(alpha: T) -> Result<(), String> {
    if alpha <= T::zero() || alpha >= (2.0).as_T() {
        Err(format!("alpha must be in (0,2), got {}", alpha))
    } else {
        Ok(())
    }
}

fn validate_positive<T: FloatT>(name: &str, v: T) -> Result<(), String> {
    if v <= T::zero() {
        Err(format!("{} must be strictly positive, got {}", name, v))
    } else {
        Ok(())
    }
}

fn validate_merge_method(merge_method: &str) -> Result<(), String> {
    match merge_method {
        "none" | "parent_child" | "clique_graph" => Ok(()),
        _ => Err(format!("Invalid merge_method: {:?}", merge_method)),
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    DefaultSettingsBuilder::<f64>::default().build().unwrap();

    // fail on an out of range relaxation parameter
    assert!(DefaultSettingsBuilder::<f64>::default()
        .alpha(2.5)
        .build()
        .is_err());

    // fail on a nonpositive penalty
    assert!(DefaultSettingsBuilder::<f64>::default()
        .rho(0.0)
        .build()
        .is_err());

    // fail on an unknown merge strategy
    assert!(DefaultSettingsBuilder::<f64>::default()
        .merge_method("foo".to_string())
        .build()
        .is_err());
}
