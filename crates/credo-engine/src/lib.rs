//! Credo Engine
//!
//! Orchestrates one evaluation epoch across the component crates:
//!
//! 1. Contradiction clusters and total tension at the epoch
//! 2. Per-claim pure phase: mutation metric and confidence score over the
//!    read-only graph, in parallel with `rayon` when enabled
//! 3. Per-claim sequential phase: timeline samples, signal alerts,
//!    classification, state alerts
//!
//! Per-claim failures are collected into the [`EpochReport`] and never abort
//! the batch. Re-running an epoch replaces its records.
//!
//! ## Example
//!
//! ```
//! use credo_domain::{ClaimId, ClaimNode, ClaimType};
//! use credo_engine::{ClaimSelection, EngineConfig, EpistemicEngine};
//!
//! let mut engine = EpistemicEngine::new(EngineConfig::default()).unwrap();
//! let claim = ClaimId::new();
//! engine
//!     .graph_mut()
//!     .add_claim(ClaimNode::new(claim, "the bridge held".into(), ClaimType::Observation, 0))
//!     .unwrap();
//!
//! let report = engine.evaluate_epoch(3_600_000, &ClaimSelection::All);
//! assert_eq!(report.evaluated, 1);
//! assert!(engine.get_latest_score(claim).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod report;

pub use config::{ConfigError, EngineConfig, EngineSettings};
pub use engine::EpistemicEngine;
pub use error::{EngineError, ErrorKind};
pub use metrics::EngineMetrics;
pub use report::{ClaimFailure, ClaimOutcome, ClaimSelection, EpochReport};
