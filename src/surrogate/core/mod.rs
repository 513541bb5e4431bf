//! surrogate::core — building blocks of surrogate evaluation.
//!
//! Leaves first: [`units`], [`affine`], [`parameterization`], [`bspline`],
//! [`fits`], [`record`], [`resample`], [`reconstruct`], [`harmonics`],
//! [`waveform`], and the shared [`options`].
pub mod affine;
pub mod bspline;
pub mod fits;
pub mod harmonics;
pub mod options;
pub mod parameterization;
pub mod reconstruct;
pub mod record;
pub mod resample;
pub mod units;
pub mod waveform;
