//! Execution helper that runs the Nelder–Mead solver on an objective and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    simplex_optimizer::{
        Objective, OptimOutcome, SimplexOptions, Theta, adapter::ArgMinAdapter,
        types::NelderMeadSolver,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::CostFunction;
use argmin::core::{Executor, State};

/// Run an `argmin` Nelder–Mead optimization.
///
/// Wires up:
/// - the user objective via [`ArgMinAdapter`],
/// - the prepared solver (initial simplex already embedded),
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always` and a one-time
/// pre-iteration line logs c(θ₀).
///
/// # Errors
/// - Propagates any `argmin` runtime error (including errors raised by the
///   objective) via the crate's `From<argmin::core::Error>` conversion.
/// - Propagates validation errors encountered when constructing
///   [`OptimOutcome`].
#[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
pub fn run_nelder_mead<'a, F>(
    theta0: &Theta, opts: &SimplexOptions, problem: ArgMinAdapter<'a, F>, solver: NelderMeadSolver,
) -> OptResult<OptimOutcome>
where
    F: Objective,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    OptimOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective,
{
    let c0 = problem.cost(theta0)?;
    eprintln!("init: c(theta0) = {c0:.6e}");
    Ok(())
}
