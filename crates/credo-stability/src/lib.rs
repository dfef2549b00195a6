//! Credo Stability Classifier
//!
//! A deterministic finite-state machine over timeline features. The
//! classifier itself is the pure function [`classify`]; state is kept
//! separately in [`ClassificationHistory`].
//!
//! # Rules
//!
//! Evaluated in priority order, first match wins:
//!
//! | # | Transition | Condition |
//! |---|------------|-----------|
//! | 1 | any → Critical | ≥ `critical_alert_count` distinct anomaly alerts active |
//! | 2 | Critical → Diverging / Volatile | active count below the threshold; Diverging while drift acceleration > ε |
//! | 3 | Stable → Volatile | confidence or entropy std above its threshold |
//! | 4 | Stable → Converging | confidence variance trend decreasing |
//! | 5 | Converging → Stable | confidence plateau |
//! | 6 | Converging → Volatile | confidence variance trend increasing |
//! | 7 | Volatile → Diverging | drift acceleration > ε and entropy velocity > 0 |
//! | 8 | Volatile → Converging | variance trend decreasing, or plateau |
//! | 9 | Diverging → Volatile | drift acceleration < −ε |
//!
//! No match leaves the state unchanged.

#![warn(missing_docs)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod history;

pub use classifier::{classify, classify_named, parse_state, Rule, Transition};
pub use config::StabilityConfig;
pub use error::StabilityError;
pub use history::ClassificationHistory;
