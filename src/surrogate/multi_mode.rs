//! multi_mode — combine single-mode surrogates into a multi-mode waveform.
//!
//! Purpose
//! -------
//! Own a collection of `(ℓ, m)` surrogates, resolve which modes a call
//! needs, derive negative-m modes through orbital-plane symmetry, project
//! onto the sphere with `₋₂Yℓm(θ, φ)`, and either sum or stack the results.
//!
//! Key behaviors
//! -------------
//! - Cross-mode consistency (time grid, fit interval, parameterization) is
//!   checked once in [`MultiModeSurrogate::new`]; evaluation trusts it.
//! - [`MultiModeSurrogate::generate_mode_eval_list`] supports three
//!   selections: every stored mode, every mode up to a maximum `ℓ`, or an
//!   explicit `(ℓ, m)` list, optionally extended with `(ℓ, −m)`.
//! - Every request is validated (options, mode list, mode availability,
//!   parameter range) before the first mode is reconstructed.
//! - Derived modes use `h(ℓ, −m) = (−1)^ℓ conj(h(ℓ, m))`, i.e.
//!   `h+ → (−1)^ℓ h+` and `h× → −(−1)^ℓ h×`. The direct evaluator is never
//!   asked for a mode it does not hold, and each stored mode is evaluated at
//!   most once per call.
//! - An orbital-plane rotation `z_rot` multiplies mode `m` by `e^{i m z_rot}`
//!   before aggregation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Stored keys satisfy `ℓ ≥ 2`, `|m| ≤ ℓ`; with symmetry enabled no stored
//!   key has `m < 0`.
//! - Per-mode evaluations share no mutable state; accumulation happens
//!   after each mode's evaluation completes.
//!
//! Conventions
//! -----------
//! - Per-mode output stacks modes as columns `hp[[sample, mode]]` in the
//!   order returned by `generate_mode_eval_list`.
//! - `f_low` is checked once on the summed waveform, or once per column when
//!   modes are returned separately.
use crate::surrogate::{
    core::{
        harmonics::{GW_SPIN_WEIGHT, MAX_ELL, spin_weighted_ylm},
        options::EvalOptions,
    },
    errors::{SurrogateError, SurrogateResult, SurrogateWarning},
    single_mode::{Evaluation, SingleModeSurrogate, low_frequency_warning},
};
use ndarray::{Array1, Array2, s};
use num_complex::Complex64;
use std::collections::BTreeMap;

/// `(ℓ, m)` mode index.
pub type ModeKey = (i32, i32);

/// Which modes an evaluation covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModeSelection {
    /// Every stored mode.
    #[default]
    All,
    /// All `(ℓ, m)` with `2 ≤ ℓ ≤ ℓmax`, `0 ≤ m ≤ ℓ`; unmodelled modes are
    /// zero-filled. `ℓmax` must not exceed [`MAX_ELL`].
    MaxEll(i32),
    /// Exactly these pairs, in this order.
    Explicit { ell: Vec<i32>, m: Vec<i32> },
}

/// Options for [`MultiModeSurrogate::evaluate`].
///
/// Defaults: all stored modes, no negative-m generation, no sky position or
/// rotation, per-mode output, default [`EvalOptions`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiModeOptions {
    pub modes: ModeSelection,
    /// Extend every `m > 0` entry with `(ℓ, −m)`.
    pub include_negative_m: bool,
    /// Polar angle of the observer.
    pub theta: Option<f64>,
    /// Azimuthal angle of the observer.
    pub phi: Option<f64>,
    /// Rotation about the orbital axis.
    pub z_rot: Option<f64>,
    /// Sum modes into one `(h+, h×)` pair.
    pub sum: bool,
    pub eval: EvalOptions,
}

impl MultiModeOptions {
    /// Validated options from their parts.
    ///
    /// # Errors
    /// See [`MultiModeOptions::validate`].
    pub fn new(
        modes: ModeSelection, include_negative_m: bool, theta: Option<f64>, phi: Option<f64>, z_rot: Option<f64>,
        sum: bool, eval: EvalOptions,
    ) -> SurrogateResult<Self> {
        let opts = MultiModeOptions { modes, include_negative_m, theta, phi, z_rot, sum, eval };
        opts.validate()?;
        Ok(opts)
    }

    /// Check angle pairing, finiteness, and the embedded [`EvalOptions`].
    ///
    /// # Errors
    /// - `InvalidOptionCombination` when only one of `theta`/`phi` is set.
    /// - `InvalidOption` for non-finite angles or rotation.
    pub fn validate(&self) -> SurrogateResult<()> {
        if self.theta.is_some() != self.phi.is_some() {
            return Err(SurrogateError::InvalidOptionCombination {
                reason: "theta and phi must be given together",
            });
        }
        for (name, value) in [("theta", self.theta), ("phi", self.phi), ("z_rot", self.z_rot)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(SurrogateError::InvalidOption { name, value: v, reason: "must be finite" });
                }
            }
        }
        self.eval.validate()
    }

    fn angles(&self) -> Option<(f64, f64)> {
        self.theta.zip(self.phi)
    }
}

/// Aggregated waveform content.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeOutput {
    Summed { hp: Array1<f64>, hc: Array1<f64> },
    PerMode { modes: Vec<ModeKey>, hp: Array2<f64>, hc: Array2<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiModeEvaluation {
    pub t: Array1<f64>,
    pub output: ModeOutput,
    pub warnings: Vec<SurrogateWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ModeSource {
    Direct,
    Symmetric(ModeKey),
    Zero,
}

/// A collection of single-mode surrogates sharing grid, interval, and
/// parameterization.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiModeSurrogate {
    modes: BTreeMap<ModeKey, SingleModeSurrogate>,
    use_orbital_plane_symmetry: bool,
}

impl MultiModeSurrogate {
    /// Build a collection and check cross-mode consistency.
    ///
    /// # Errors
    /// - `EmptySurrogate`, `InvalidMode`, `DuplicateMode`,
    ///   `NegativeModeWithSymmetry` for malformed key sets.
    /// - `InconsistentSurrogate` when any record disagrees with the first
    ///   on time grid, fit interval, or parameterization.
    pub fn new<I>(modes: I, use_orbital_plane_symmetry: bool) -> SurrogateResult<Self>
    where
        I: IntoIterator<Item = (ModeKey, SingleModeSurrogate)>,
    {
        let mut map = BTreeMap::new();
        for ((ell, m), sur) in modes {
            validate_mode(ell, m)?;
            if use_orbital_plane_symmetry && m < 0 {
                return Err(SurrogateError::NegativeModeWithSymmetry { ell, m });
            }
            if map.insert((ell, m), sur).is_some() {
                return Err(SurrogateError::DuplicateMode { ell, m });
            }
        }
        let Some((&reference, first)) = map.iter().next() else {
            return Err(SurrogateError::EmptySurrogate);
        };
        let (t_ref, interval, param) = {
            let r = first.record();
            (r.times(), r.fit_interval(), r.parameterization())
        };
        for (&mode, sur) in map.iter().skip(1) {
            let r = sur.record();
            let what = if r.times().len() != t_ref.len() {
                Some("time grid shape")
            } else if r.times() != t_ref {
                Some("time samples")
            } else if r.fit_interval() != interval {
                Some("fit interval")
            } else if r.parameterization() != param {
                Some("parameterization")
            } else {
                None
            };
            if let Some(what) = what {
                return Err(SurrogateError::InconsistentSurrogate { mode, reference, what });
            }
        }
        tracing::debug!(modes = map.len(), symmetry = use_orbital_plane_symmetry, "built multi-mode surrogate");
        Ok(MultiModeSurrogate { modes: map, use_orbital_plane_symmetry })
    }

    /// Stored mode keys in ascending order.
    pub fn modes(&self) -> impl Iterator<Item = ModeKey> + '_ {
        self.modes.keys().copied()
    }

    pub fn mode(&self, key: ModeKey) -> Option<&SingleModeSurrogate> {
        self.modes.get(&key)
    }

    pub fn use_orbital_plane_symmetry(&self) -> bool {
        self.use_orbital_plane_symmetry
    }

    /// The first stored mode; every mode shares its grid and interval.
    fn reference(&self) -> SurrogateResult<&SingleModeSurrogate> {
        self.modes.values().next().ok_or(SurrogateError::EmptySurrogate)
    }

    /// Resolve a selection into the ordered list of modes to evaluate.
    ///
    /// # Errors
    /// - `ModeListLengthMismatch`, `InvalidMode`, `DuplicateMode` for bad
    ///   explicit lists; `InvalidMode` for `MaxEll` outside `2..=MAX_ELL`.
    /// - `NegativeModeRequested` when negative-m generation meets an m < 0
    ///   entry.
    pub fn generate_mode_eval_list(
        &self, selection: &ModeSelection, include_negative_m: bool,
    ) -> SurrogateResult<Vec<ModeKey>> {
        let (mut list, sort) = match selection {
            ModeSelection::All => (self.modes().collect::<Vec<_>>(), true),
            ModeSelection::MaxEll(ell_max) => {
                if !(2..=MAX_ELL).contains(ell_max) {
                    return Err(SurrogateError::InvalidMode { ell: *ell_max, m: 0 });
                }
                ((2..=*ell_max).flat_map(|ell| (0..=ell).map(move |m| (ell, m))).collect(), true)
            }
            ModeSelection::Explicit { ell, m } => {
                if ell.len() != m.len() {
                    return Err(SurrogateError::ModeListLengthMismatch { ell: ell.len(), m: m.len() });
                }
                if ell.is_empty() {
                    return Err(SurrogateError::InvalidOptionCombination { reason: "explicit mode list is empty" });
                }
                let mut pairs: Vec<ModeKey> = Vec::with_capacity(ell.len());
                for (&l, &mm) in ell.iter().zip(m) {
                    validate_mode(l, mm)?;
                    if pairs.contains(&(l, mm)) {
                        return Err(SurrogateError::DuplicateMode { ell: l, m: mm });
                    }
                    pairs.push((l, mm));
                }
                (pairs, false)
            }
        };
        if include_negative_m {
            if let Some(&(ell, m)) = list.iter().find(|(_, m)| *m < 0) {
                return Err(SurrogateError::NegativeModeRequested { ell, m });
            }
            let negatives: Vec<ModeKey> = list.iter().filter(|(_, m)| *m > 0).map(|&(l, m)| (l, -m)).collect();
            list.extend(negatives);
        }
        if sort {
            list.sort_unstable();
        }
        Ok(list)
    }

    fn resolve(&self, key: ModeKey, zero_fill: bool) -> SurrogateResult<ModeSource> {
        let (ell, m) = key;
        if self.modes.contains_key(&key) {
            Ok(ModeSource::Direct)
        } else if self.use_orbital_plane_symmetry && self.modes.contains_key(&(ell, -m)) {
            Ok(ModeSource::Symmetric((ell, -m)))
        } else if zero_fill {
            Ok(ModeSource::Zero)
        } else {
            Err(SurrogateError::ModeUnavailable { ell, m })
        }
    }

    /// Evaluate the selected modes at physical parameter `x`.
    ///
    /// # Errors
    /// - Option, mode-list, and availability errors before any evaluation.
    /// - `InvalidOptionCombination` when summing several modes without a
    ///   sky position.
    /// - `ParameterOutOfRange` in strict mode.
    pub fn evaluate(&self, x: f64, opts: &MultiModeOptions) -> SurrogateResult<MultiModeEvaluation> {
        opts.validate()?;
        let list = self.generate_mode_eval_list(&opts.modes, opts.include_negative_m)?;
        if opts.sum && list.len() > 1 && opts.angles().is_none() {
            return Err(SurrogateError::InvalidOptionCombination {
                reason: "summing several modes requires theta and phi",
            });
        }
        let zero_fill = matches!(opts.modes, ModeSelection::MaxEll(_));
        let sources =
            list.iter().map(|&key| self.resolve(key, zero_fill)).collect::<SurrogateResult<Vec<_>>>()?;

        let reference = self.reference()?;
        let (internal, range_warning) = reference.check_parameter(x, opts.eval.range_check)?;
        let mut warnings = Vec::new();
        if let Some(w) = range_warning {
            w.emit();
            warnings.push(w);
        }

        let mode_opts = EvalOptions { f_low: None, ..opts.eval.clone() };
        let t = reference.output_times(&mode_opts);
        let n = t.len();
        let mut cache: BTreeMap<ModeKey, Evaluation> = BTreeMap::new();
        let mut columns: Vec<Array1<Complex64>> = Vec::with_capacity(list.len());

        for (&(ell, m), source) in list.iter().zip(&sources) {
            let (hp, hc) = match *source {
                ModeSource::Direct => {
                    let e = self.cached(&mut cache, (ell, m), internal, &mode_opts)?;
                    (e.hp.clone(), e.hc.clone())
                }
                ModeSource::Symmetric(src) => {
                    let e = self.cached(&mut cache, src, internal, &mode_opts)?;
                    let sign = if ell % 2 == 0 { 1.0 } else { -1.0 };
                    (&e.hp * sign, &e.hc * -sign)
                }
                ModeSource::Zero => (Array1::zeros(n), Array1::zeros(n)),
            };
            let mut factor = Complex64::new(1.0, 0.0);
            if let Some((theta, phi)) = opts.angles() {
                factor *= spin_weighted_ylm(GW_SPIN_WEIGHT, ell, m, theta, phi);
            }
            if let Some(z) = opts.z_rot {
                factor *= Complex64::from_polar(1.0, m as f64 * z);
            }
            let mut h = Array1::<Complex64>::zeros(n);
            for i in 0..n {
                h[i] = Complex64::new(hp[i], hc[i]) * factor;
            }
            columns.push(h);
        }

        let output = if opts.sum {
            let mut total = Array1::<Complex64>::zeros(n);
            for col in &columns {
                total += col;
            }
            let (hp, hc) = (total.mapv(|z| z.re), total.mapv(|z| z.im));
            if let Some(f_low) = opts.eval.f_low {
                warnings.extend(low_frequency_warning(hp.view(), hc.view(), t.view(), f_low));
            }
            ModeOutput::Summed { hp, hc }
        } else {
            let mut hp = Array2::zeros((n, columns.len()));
            let mut hc = Array2::zeros((n, columns.len()));
            for (j, col) in columns.iter().enumerate() {
                hp.slice_mut(s![.., j]).assign(&col.mapv(|z| z.re));
                hc.slice_mut(s![.., j]).assign(&col.mapv(|z| z.im));
                if let Some(f_low) = opts.eval.f_low {
                    let (p, c) = (hp.column(j), hc.column(j));
                    warnings.extend(low_frequency_warning(p, c, t.view(), f_low));
                }
            }
            ModeOutput::PerMode { modes: list, hp, hc }
        };
        for w in warnings.iter().filter(|w| matches!(w, SurrogateWarning::LowFrequency { .. })) {
            w.emit();
        }
        Ok(MultiModeEvaluation { t, output, warnings })
    }

    fn cached<'c>(
        &self, cache: &'c mut BTreeMap<ModeKey, Evaluation>, key: ModeKey, internal: f64, opts: &EvalOptions,
    ) -> SurrogateResult<&'c Evaluation> {
        if !cache.contains_key(&key) {
            let sur = self.modes.get(&key).ok_or(SurrogateError::ModeUnavailable { ell: key.0, m: key.1 })?;
            cache.insert(key, sur.evaluate_unchecked(internal, opts)?);
        }
        cache.get(&key).ok_or(SurrogateError::ModeUnavailable { ell: key.0, m: key.1 })
    }
}

/// `2 ≤ ℓ ≤ MAX_ELL` and `−ℓ ≤ m ≤ ℓ`.
fn validate_mode(ell: i32, m: i32) -> SurrogateResult<()> {
    if !(2..=MAX_ELL).contains(&ell) || m < -ell || m > ell {
        Err(SurrogateError::InvalidMode { ell, m })
    } else {
        Ok(())
    }
}
