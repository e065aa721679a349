use super::*;
use crate::algebra::*;
use crate::solver::core::SolverStatus;

// ---------------
// verbose progress printing
// ---------------

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn print_banner(verbose: bool) {
    if !verbose {
        return;
    }
    println!("-------------------------------------------------------------");
    println!("     splitcone v{} - conic ADMM solver", VERSION);
    println!("-------------------------------------------------------------");
}

pub(crate) fn print_configuration<T: FloatT>(
    settings: &DefaultSettings<T>,
    data: &DefaultProblemData<T>,
    ncones: usize,
) {
    if !settings.verbose {
        return;
    }
    println!(
        "problem:  variables n = {}, constraints m = {}, cones = {}",
        data.n, data.m, ncones
    );
    println!(
        "settings: eps_abs = {:.1e}, eps_rel = {:.1e}, max_iter = {}, rho = {:.1e}, alpha = {}",
        settings.eps_abs, settings.eps_rel, settings.max_iter, settings.rho, settings.alpha
    );
}

pub(crate) fn print_status_header(verbose: bool) {
    if !verbose {
        return;
    }
    println!("iter      objective      r_prim       r_dual       rho");
    println!("------------------------------------------------------------");
}

pub(crate) fn print_status<T: FloatT>(
    verbose: bool,
    iter: u32,
    residuals: &DefaultResiduals<T>,
    rho: T,
) {
    if !verbose {
        return;
    }
    println!(
        "{:<6} {:>13.6e} {:>12.3e} {:>12.3e} {:>9.2e}",
        iter, residuals.cost, residuals.r_prim, residuals.r_dual, rho
    );
}

pub(crate) fn print_footer(verbose: bool, status: SolverStatus, iter: u32, solve_time: f64) {
    if !verbose {
        return;
    }
    println!("------------------------------------------------------------");
    println!(
        "status: {}, iterations: {}, solve time: {:.3e}s",
        status, iter, solve_time
    );
}
