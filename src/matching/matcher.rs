//! matcher — align a surrogate waveform with a reference over time shift and
//! orbital-plane rotation.
//!
//! Purpose
//! -------
//! Find `(δt, δφ)` minimizing the normalized mismatch between a reference
//! `(t_ref, h_ref)` and the surrogate's projected waveform
//! `h(t − δt; θ, φ, z_rot = δφ)` over a trimmed overlap window.
//!
//! Key behaviors
//! -------------
//! - Builds the overlap window once (see [`crate::matching::overlap`]).
//! - Derives the starting point from a coarse lag scan of the complex
//!   overlap, then refines it with the crate's Nelder–Mead minimizer.
//! - Two strategies:
//!   - [`MatchStrategy::Fast`] evaluates a prebuilt
//!     [`SphericalWaveform`] inside the optimizer;
//!   - [`MatchStrategy::Slow`] calls [`MultiModeSurrogate::evaluate`] on the
//!     shifted grid for every trial point.
//!
//! Invariants & assumptions
//! ------------------------
//! - Reference times are geometric (`t / M`); the matcher never applies
//!   physical scaling.
//! - The parameter is range-checked once, before any waveform is built.
//!
//! Conventions
//! -----------
//! - `δt > 0` delays the surrogate; `δφ` is an orbital-plane rotation, so
//!   mode `m` picks up `e^{i m δφ}`.
use crate::{
    matching::{
        overlap::{OverlapWindow, coarse_alignment, mismatch},
        spherical::SphericalWaveform,
    },
    optimization::{
        errors::{OptError, OptResult},
        simplex_optimizer::{Cost, Objective, SimplexOptions, Theta, minimize},
    },
    surrogate::{
        core::options::{EvalOptions, RangeCheck},
        errors::{SurrogateError, SurrogateResult},
        multi_mode::{ModeOutput, ModeSelection, MultiModeOptions, MultiModeSurrogate},
    },
};
use ndarray::{Array1, ArrayView1, array};
use num_complex::Complex64;
use std::str::FromStr;

/// Default fraction of the overlap trimmed at each end.
pub const DEFAULT_TRIM_FRACTION: f64 = 0.0125;

/// How the model waveform is produced inside the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    #[default]
    Fast,
    Slow,
}

impl FromStr for MatchStrategy {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(MatchStrategy::Fast),
            "slow" => Ok(MatchStrategy::Slow),
            _ => Err(SurrogateError::UnknownMatchStrategy { name: s.to_string() }),
        }
    }
}

/// Matcher configuration.
///
/// Defaults: fast strategy, face-on observer `(θ, φ) = (0, 0)`, every
/// stored mode plus negative-m modes, 1.25% trim, lag scan over ±10% of the
/// window with 201 lags, strict range checking, default simplex options
/// with a step of one sample in `δt` and 0.05 rad in `δφ`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    pub strategy: MatchStrategy,
    pub theta: f64,
    pub phi: f64,
    pub modes: ModeSelection,
    pub include_negative_m: bool,
    pub trim_fraction: f64,
    /// Half-width of the lag scan as a fraction of the window length.
    pub max_lag_fraction: f64,
    pub n_lags: usize,
    pub range_check: RangeCheck,
    pub simplex: SimplexOptions,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            strategy: MatchStrategy::Fast,
            theta: 0.0,
            phi: 0.0,
            modes: ModeSelection::All,
            include_negative_m: true,
            trim_fraction: DEFAULT_TRIM_FRACTION,
            max_lag_fraction: 0.1,
            n_lags: 201,
            range_check: RangeCheck::Strict,
            simplex: SimplexOptions::default(),
        }
    }
}

impl MatchOptions {
    /// Options with the given strategy and observer angles; remaining
    /// fields take their defaults.
    ///
    /// # Errors
    /// See [`MatchOptions::validate`].
    pub fn new(strategy: MatchStrategy, theta: f64, phi: f64) -> SurrogateResult<Self> {
        let opts = MatchOptions { strategy, theta, phi, ..MatchOptions::default() };
        opts.validate()?;
        Ok(opts)
    }

    /// # Errors
    /// - `InvalidOption` for non-finite angles, `trim_fraction ∉ [0, 0.5)`,
    ///   `max_lag_fraction ∉ [0, 1)`, or `n_lags == 0`.
    pub fn validate(&self) -> SurrogateResult<()> {
        for (name, v) in [("theta", self.theta), ("phi", self.phi)] {
            if !v.is_finite() {
                return Err(SurrogateError::InvalidOption { name, value: v, reason: "must be finite" });
            }
        }
        if !(0.0..0.5).contains(&self.trim_fraction) {
            return Err(SurrogateError::InvalidOption {
                name: "trim_fraction",
                value: self.trim_fraction,
                reason: "must lie in [0, 0.5)",
            });
        }
        if !(0.0..1.0).contains(&self.max_lag_fraction) {
            return Err(SurrogateError::InvalidOption {
                name: "max_lag_fraction",
                value: self.max_lag_fraction,
                reason: "must lie in [0, 1)",
            });
        }
        if self.n_lags == 0 {
            return Err(SurrogateError::InvalidOption { name: "n_lags", value: 0.0, reason: "must be >= 1" });
        }
        Ok(())
    }
}

/// Result of an alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub mismatch: f64,
    pub time_shift: f64,
    pub phase_shift: f64,
    /// Trimmed common time grid.
    pub t_common: Array1<f64>,
    /// Aligned surrogate on `t_common`.
    pub h_aligned: Array1<Complex64>,
    /// Reference restricted to `t_common`.
    pub h_ref_aligned: Array1<Complex64>,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
}

/// Aligns references against one multi-mode surrogate.
#[derive(Debug, Clone)]
pub struct WaveformMatcher<'a> {
    surrogate: &'a MultiModeSurrogate,
    opts: MatchOptions,
}

impl<'a> WaveformMatcher<'a> {
    /// # Errors
    /// See [`MatchOptions::validate`].
    pub fn new(surrogate: &'a MultiModeSurrogate, opts: MatchOptions) -> SurrogateResult<Self> {
        opts.validate()?;
        Ok(WaveformMatcher { surrogate, opts })
    }

    pub fn options(&self) -> &MatchOptions {
        &self.opts
    }

    /// Align the surrogate at parameter `x` with `(t_ref, h_ref)`.
    ///
    /// # Errors
    /// - Parameter, mode, and configuration errors from the surrogate.
    /// - `InvalidReference` / `InsufficientOverlap` from the window.
    /// - `OptimizationFailed` when the simplex run fails.
    pub fn match_waveform(
        &self, x: f64, t_ref: ArrayView1<f64>, h_ref: ArrayView1<Complex64>,
    ) -> SurrogateResult<MatchOutcome> {
        let o = &self.opts;
        let spherical =
            SphericalWaveform::from_surrogate(self.surrogate, x, &o.modes, o.include_negative_m, o.range_check)?;
        let window = OverlapWindow::new(t_ref, h_ref, spherical.domain(), o.trim_fraction)?;

        let guess = coarse_alignment(&window, o.max_lag_fraction * window.span(), o.n_lags, spherical.dominant_m(), |lag| {
            spherical.evaluate(window.shifted(lag).view(), o.theta, o.phi, 0.0)
        });
        tracing::debug!(time_shift = guess.time_shift, phase_shift = guess.phase_shift, "initial alignment guess");

        let model = match o.strategy {
            MatchStrategy::Fast => Model::Fast(&spherical),
            MatchStrategy::Slow => Model::Slow { surrogate: self.surrogate, x },
        };
        let objective = AlignmentObjective { model, opts: o };
        let mut simplex = o.simplex.clone();
        if simplex.initial_step.is_none() {
            simplex.initial_step = Some(array![window.typical_step(), 0.05]);
        }
        let outcome = minimize(&objective, array![guess.time_shift, guess.phase_shift], &window, &simplex)?;

        let (time_shift, phase_shift) = (outcome.theta_hat[0], outcome.theta_hat[1]);
        let h_aligned = objective.model_waveform(&window, time_shift, phase_shift)?;
        let value = mismatch(&window, h_aligned.view());
        tracing::debug!(
            mismatch = value,
            time_shift,
            phase_shift,
            iterations = outcome.iterations,
            converged = outcome.converged,
            "alignment finished"
        );
        Ok(MatchOutcome {
            mismatch: value,
            time_shift,
            phase_shift,
            t_common: window.t.clone(),
            h_aligned,
            h_ref_aligned: window.h_ref.clone(),
            converged: outcome.converged,
            status: outcome.status,
            iterations: outcome.iterations,
        })
    }
}

// ---- Objective ----

enum Model<'m> {
    Fast(&'m SphericalWaveform),
    Slow { surrogate: &'m MultiModeSurrogate, x: f64 },
}

struct AlignmentObjective<'m> {
    model: Model<'m>,
    opts: &'m MatchOptions,
}

impl AlignmentObjective<'_> {
    fn model_waveform(&self, window: &OverlapWindow, dt: f64, dphi: f64) -> SurrogateResult<Array1<Complex64>> {
        let samples = window.shifted(dt);
        match &self.model {
            Model::Fast(sph) => Ok(sph.evaluate(samples.view(), self.opts.theta, self.opts.phi, dphi)),
            Model::Slow { surrogate, x } => {
                let mm = MultiModeOptions {
                    modes: self.opts.modes.clone(),
                    include_negative_m: self.opts.include_negative_m,
                    theta: Some(self.opts.theta),
                    phi: Some(self.opts.phi),
                    z_rot: Some(dphi),
                    sum: true,
                    eval: EvalOptions {
                        samples: Some(samples),
                        range_check: self.opts.range_check,
                        ..EvalOptions::default()
                    },
                };
                match surrogate.evaluate(*x, &mm)?.output {
                    ModeOutput::Summed { hp, hc } => {
                        Ok(Array1::from_iter(hp.iter().zip(&hc).map(|(p, c)| Complex64::new(*p, *c))))
                    }
                    ModeOutput::PerMode { .. } => Err(SurrogateError::InvalidOptionCombination {
                        reason: "alignment requires a summed waveform",
                    }),
                }
            }
        }
    }
}

impl Objective for AlignmentObjective<'_> {
    type Data = OverlapWindow;

    fn value(&self, theta: &Theta, data: &OverlapWindow) -> OptResult<Cost> {
        let h = self.model_waveform(data, theta[0], theta[1]).map_err(OptError::from)?;
        Ok(mismatch(data, h.view()))
    }

    fn check(&self, theta: &Theta, _data: &OverlapWindow) -> OptResult<()> {
        if theta.len() != 2 {
            return Err(OptError::SimplexDimMismatch { expected: 2, found: theta.len() });
        }
        Ok(())
    }
}
