//! bspline — interpolating B-splines for basis resampling and spline fits.
//!
//! Purpose
//! -------
//! Provide the single spline representation used in two places:
//! - the per-column resampling cache built over a record's native time grid,
//!   and
//! - `spline_1d` / `fast_spline_*` parametric fits, whose coefficient rows
//!   are packed B-splines.
//!
//! Key behaviors
//! -------------
//! - [`BSpline::interpolate`] builds the not-a-knot interpolant of odd degree
//!   `k ∈ {1, 3, 5}` through `(x_i, y_i)` by solving the banded collocation
//!   system with Gaussian elimination.
//! - [`BSpline::eval`] evaluates with either polynomial continuation of the
//!   boundary pieces or constant (clamped) extrapolation outside
//!   `[x_0, x_{n-1}]`.
//! - [`BSpline::basis_at`] exposes the `k + 1` non-zero basis values at a
//!   point so that many splines on one knot vector can share a single basis
//!   evaluation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Knot vectors are non-decreasing with `k + 1`-fold end knots.
//! - `coefs.len() + degree + 1 == knots.len()`.
//! - Collocation matrices of B-splines are totally positive, so elimination
//!   without pivoting is stable and never meets a zero pivot for strictly
//!   increasing abscissae.
//!
//! Conventions
//! -----------
//! - Packed rows use the layout `[degree, n_coef, knots…, coefs…, pad…]`;
//!   trailing padding is ignored.
use crate::surrogate::errors::{SurrogateError, SurrogateResult};
use ndarray::ArrayView1;

/// Largest supported spline degree.
pub const MAX_DEGREE: usize = 5;

/// How to evaluate outside the interpolation interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Continue the boundary polynomial pieces.
    #[default]
    Polynomial,
    /// Hold the boundary value constant.
    Clamp,
}

/// A B-spline `s(x) = Σ_j c_j N_{j,k}(x)` on a clamped knot vector.
#[derive(Debug, Clone, PartialEq)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coefs: Vec<f64>,
}

impl BSpline {
    /// Build the not-a-knot interpolant of degree `degree` through `(x, y)`.
    ///
    /// # Errors
    /// - `InvalidSplineDegree` if `degree` is even, zero, above
    ///   [`MAX_DEGREE`], or not below the number of samples.
    /// - `InvalidTimeSamples` if `x` is not strictly increasing and finite,
    ///   or `y` has a different length.
    pub fn interpolate(x: ArrayView1<f64>, y: ArrayView1<f64>, degree: usize) -> SurrogateResult<Self> {
        let n = x.len();
        if degree == 0 || degree % 2 == 0 || degree > MAX_DEGREE || n < degree + 1 {
            return Err(SurrogateError::InvalidSplineDegree { degree, samples: n });
        }
        if y.len() != n {
            return Err(SurrogateError::InvalidTimeSamples {
                index: y.len().min(n),
                reason: "ordinates and abscissae differ in length",
            });
        }
        for i in 0..n {
            if !x[i].is_finite() {
                return Err(SurrogateError::InvalidTimeSamples { index: i, reason: "sample is not finite" });
            }
            if i > 0 && x[i] <= x[i - 1] {
                return Err(SurrogateError::InvalidTimeSamples {
                    index: i,
                    reason: "samples must be strictly increasing",
                });
            }
        }

        let knots = not_a_knot_knots(x, degree);
        let mut band = Band::new(n, degree);
        for (row, &xr) in x.iter().enumerate() {
            let span = find_span(&knots, degree, n, xr);
            let vals = basis_funs(&knots, degree, span, xr);
            for (r, v) in vals.iter().enumerate() {
                band.set(row, span - degree + r, *v);
            }
        }
        let coefs = band.solve(y.to_vec())?;
        Ok(BSpline { degree, knots, coefs })
    }

    /// Decode a packed row `[degree, n_coef, knots…, coefs…, pad…]`.
    ///
    /// Returns a short reason on malformed input; callers attach row context.
    pub fn from_packed(row: ArrayView1<f64>) -> Result<Self, &'static str> {
        if row.len() < 2 {
            return Err("packed spline row is shorter than its header");
        }
        let (deg_f, n_f) = (row[0], row[1]);
        if !(deg_f.fract() == 0.0 && deg_f >= 1.0 && deg_f <= MAX_DEGREE as f64) {
            return Err("packed spline degree must be an integer in 1..=5");
        }
        if !(n_f.fract() == 0.0 && n_f >= deg_f + 1.0) {
            return Err("packed spline coefficient count must be an integer above the degree");
        }
        let degree = deg_f as usize;
        let n_coef = n_f as usize;
        let n_knots = n_coef + degree + 1;
        if row.len() < 2 + n_knots + n_coef {
            return Err("packed spline row is shorter than its declared sizes");
        }
        let knots: Vec<f64> = row.iter().skip(2).take(n_knots).copied().collect();
        let coefs: Vec<f64> = row.iter().skip(2 + n_knots).take(n_coef).copied().collect();
        if knots.iter().chain(coefs.iter()).any(|v| !v.is_finite()) {
            return Err("packed spline contains non-finite values");
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err("packed spline knots must be non-decreasing");
        }
        if knots[degree] >= knots[n_coef] {
            return Err("packed spline has an empty base interval");
        }
        Ok(BSpline { degree, knots, coefs })
    }

    /// Encode into the packed row layout, padded with zeros to `width`.
    pub fn to_packed(&self, width: usize) -> Vec<f64> {
        let mut row = Vec::with_capacity(width.max(self.packed_len()));
        row.push(self.degree as f64);
        row.push(self.coefs.len() as f64);
        row.extend_from_slice(&self.knots);
        row.extend_from_slice(&self.coefs);
        row.resize(width.max(row.len()), 0.0);
        row
    }

    pub fn packed_len(&self) -> usize {
        2 + self.knots.len() + self.coefs.len()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn coefs(&self) -> &[f64] {
        &self.coefs
    }

    /// Interpolation interval `[t_k, t_n]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.coefs.len()])
    }

    /// Non-zero basis values at `x`: the index of the first contributing
    /// coefficient and the `degree + 1` values.
    pub fn basis_at(&self, x: f64, extrap: Extrapolation) -> (usize, Vec<f64>) {
        let x = match extrap {
            Extrapolation::Polynomial => x,
            Extrapolation::Clamp => {
                let (lo, hi) = self.domain();
                x.clamp(lo, hi)
            }
        };
        let n = self.coefs.len();
        let span = find_span(&self.knots, self.degree, n, x);
        (span - self.degree, basis_funs(&self.knots, self.degree, span, x))
    }

    /// Evaluate the spline at `x`.
    pub fn eval(&self, x: f64, extrap: Extrapolation) -> f64 {
        let (first, vals) = self.basis_at(x, extrap);
        self.dot_basis(first, &vals)
    }

    /// Combine precomputed basis values with this spline's coefficients.
    pub fn dot_basis(&self, first: usize, vals: &[f64]) -> f64 {
        vals.iter().zip(&self.coefs[first..]).map(|(n, c)| n * c).sum()
    }

    /// True when `other` shares this spline's degree and knot vector.
    pub fn same_knots(&self, other: &BSpline) -> bool {
        self.degree == other.degree && self.knots == other.knots
    }
}

// ---- Knot placement ----

fn not_a_knot_knots(x: ArrayView1<f64>, degree: usize) -> Vec<f64> {
    let n = x.len();
    let m = (degree - 1) / 2;
    let mut knots = Vec::with_capacity(n + degree + 1);
    knots.extend(std::iter::repeat_n(x[0], degree + 1));
    knots.extend(x.iter().skip(m + 1).take(n - 2 * m - 2).copied());
    knots.extend(std::iter::repeat_n(x[n - 1], degree + 1));
    knots
}

/// Knot span `s ∈ [k, n-1]` with `t_s ≤ x < t_{s+1}`; points outside the base
/// interval use the nearest boundary span.
fn find_span(knots: &[f64], degree: usize, n_coef: usize, x: f64) -> usize {
    if x >= knots[n_coef] {
        return n_coef - 1;
    }
    if x <= knots[degree] {
        return degree;
    }
    // Largest s in [k, n-1] with t_s <= x.
    let slice = &knots[degree..n_coef];
    degree + slice.partition_point(|&t| t <= x) - 1
}

/// Cox–de Boor recursion for the `degree + 1` non-zero basis functions on
/// `span`.
fn basis_funs(knots: &[f64], degree: usize, span: usize, x: f64) -> Vec<f64> {
    let mut out = vec![0.0; degree + 1];
    let mut left = [0.0; MAX_DEGREE + 1];
    let mut right = [0.0; MAX_DEGREE + 1];
    out[0] = 1.0;
    for j in 1..=degree {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = out[r] / (right[r + 1] + left[j - r]);
            out[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        out[j] = saved;
    }
    out
}

// ---- Banded collocation solve ----

/// Square matrix with `k` sub- and super-diagonals stored row-wise.
struct Band {
    n: usize,
    k: usize,
    data: Vec<f64>,
}

impl Band {
    fn new(n: usize, k: usize) -> Self {
        Band { n, k, data: vec![0.0; n * (2 * k + 1)] }
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * (2 * self.k + 1) + (col + self.k - row)
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.idx(row, col)]
    }

    fn set(&mut self, row: usize, col: usize, v: f64) {
        let i = self.idx(row, col);
        self.data[i] = v;
    }

    fn solve(mut self, mut rhs: Vec<f64>) -> SurrogateResult<Vec<f64>> {
        let (n, k) = (self.n, self.k);
        for p in 0..n {
            let pivot = self.get(p, p);
            if pivot.abs() < f64::MIN_POSITIVE || !pivot.is_finite() {
                return Err(SurrogateError::InvalidTimeSamples {
                    index: p,
                    reason: "spline collocation system is singular",
                });
            }
            let last = (p + k).min(n - 1);
            for i in p + 1..=last {
                let factor = self.get(i, p) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for c in p..=last {
                    let v = self.get(i, c) - factor * self.get(p, c);
                    self.set(i, c, v);
                }
                rhs[i] -= factor * rhs[p];
            }
        }
        let mut sol = vec![0.0; n];
        for i in (0..n).rev() {
            let last = (i + k).min(n - 1);
            let mut acc = rhs[i];
            for c in i + 1..=last {
                acc -= self.get(i, c) * sol[c];
            }
            sol[i] = acc / self.get(i, i);
        }
        Ok(sol)
    }
}
