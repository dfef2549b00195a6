//! Credo Alert Engine
//!
//! Rule-based alerts over timeline features and classifier transitions.
//!
//! | Rule | Fires when | Severity |
//! |------|------------|----------|
//! | `entropy_spike` / `entropy_collapse` | latest entropy beyond the 2σ test | warning / critical |
//! | `confidence_surge` / `confidence_collapse` | latest confidence beyond the 2σ test | warning / critical |
//! | `drift_acceleration` | \|entropy acceleration\| above threshold | warning |
//! | `drift_inflection` | last two accelerations change sign, both above ε | info |
//! | `tension_surge` | contradiction cluster grows sharply since the previous epoch | warning |
//! | `stability_transition` | classifier state changed | info |
//! | `critical_state` | classifier state is Critical | critical |
//!
//! Evaluation runs in two phases per claim and epoch:
//! [`AlertEngine::evaluate_signals`] (the seven anomaly rules, whose active
//! count feeds the classifier) and then [`AlertEngine::evaluate_transition`].
//! Alerts are keyed by (claim, type, epoch); re-running an epoch never
//! duplicates a record.

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod summary;

pub use config::AlertConfig;
pub use engine::{AlertEngine, TensionObservation};
pub use error::AlertError;
pub use summary::AlertSummary;
