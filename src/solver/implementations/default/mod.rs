//! Implementation of the solver for the standard problem format.

#![allow(non_snake_case)]

mod equilibration;
mod infeasibility;
mod info_print;
mod kktsystem;
mod problemdata;
mod residuals;
mod settings;
mod solution;
mod solver;
mod variables;

// export flattened
pub use equilibration::*;
pub(crate) use infeasibility::*;
pub(crate) use info_print::*;
pub use kktsystem::*;
pub use problemdata::*;
pub use residuals::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;
pub use variables::*;
