//! Credo Temporal Timeline Engine
//!
//! Stores scalar snapshots (confidence, entropy) per claim and derives
//! smoothed values and finite-difference derivatives from them.
//!
//! # Derived quantities
//!
//! All are computed lazily over the trailing window (`window = None` covers
//! the full history):
//!
//! - SMA and EMA (EMA seeded with the first raw value)
//! - Velocity, acceleration and jerk, divided by real elapsed hours so
//!   irregular spacing is handled
//! - Population variance, plateau detection and variance trend
//! - Spike/collapse detection against the mean of the preceding samples
//!
//! Fewer than 2/3/4 samples leave velocity/acceleration/jerk undefined
//! (`None`, never zero). Variance-based detection on fewer than 3 samples
//! fails with [`TimelineError::InsufficientData`] so callers can tell "not
//! enough data yet" from "computed and stable".

#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
mod series;

pub use analysis::{Anomaly, AnomalyKind, Rate};
pub use config::{DerivativeBasis, TimelineConfig};
pub use engine::TimelineEngine;
pub use error::TimelineError;
pub use features::{SignalFeatures, TimelineFeatures};
