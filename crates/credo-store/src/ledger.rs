//! SQLite ledger of output records

use crate::codec::{
    claim_column, id_to_bytes, json_column, parsed_column, ts_column, ts_to_sql,
};
use crate::StoreError;
use credo_domain::traits::RecordSink;
use credo_domain::{
    AlertId, AlertType, ClaimId, ClaimScore, EpistemicAlert, MutationMetric, ScoreComponents,
    Severity, StabilityClassification, StabilityState, TimelineSample,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// Row counts per ledger table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerCounts {
    /// Rows in `claim_scores`
    pub scores: usize,
    /// Rows in `mutation_metrics`
    pub metrics: usize,
    /// Rows in `timeline_samples`
    pub samples: usize,
    /// Rows in `stability_classifications`
    pub classifications: usize,
    /// Rows in `epistemic_alerts`
    pub alerts: usize,
}

/// SQLite-backed [`RecordSink`]
///
/// Writes are upserts on each record's natural key, so exporting the same
/// engine state twice leaves the ledger unchanged. Alerts are keyed by claim,
/// type and epoch, so several engines can export into one ledger. Alert ids
/// read back are ledger row ids.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// ledger instance.
pub struct SqliteLedger {
    conn: Connection,
}

const SCORE_COLUMNS: &str = "claim_id, timestamp, prior, credibility, citation, contradiction, \
                             verification, mutation_decay, weights, composite";

const ALERT_COLUMNS: &str = "id, claim_id, alert_type, severity, timestamp, value, threshold, \
                             message, resolved, resolved_at";

impl SqliteLedger {
    /// Open (or create) a ledger at the given path
    ///
    /// Use `:memory:` for an in-memory database.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use credo_store::SqliteLedger;
    ///
    /// let ledger = SqliteLedger::new("credo.sqlite").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let ledger = Self { conn };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    /// Open an in-memory ledger
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    // ---- read-back ----

    /// Most recent score of a claim
    pub fn latest_score(&self, claim: ClaimId) -> Result<Option<ClaimScore>, StoreError> {
        let sql = format!(
            "SELECT {} FROM claim_scores WHERE claim_id = ?1 ORDER BY timestamp DESC LIMIT 1",
            SCORE_COLUMNS
        );
        let score = self
            .conn
            .query_row(&sql, params![id_to_bytes(claim)], score_from_row)
            .optional()?;
        Ok(score)
    }

    /// Every score of a claim, oldest first
    pub fn scores_for(&self, claim: ClaimId) -> Result<Vec<ClaimScore>, StoreError> {
        let sql = format!(
            "SELECT {} FROM claim_scores WHERE claim_id = ?1 ORDER BY timestamp",
            SCORE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let scores = stmt
            .query_map(params![id_to_bytes(claim)], score_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scores)
    }

    /// Unresolved alerts of a claim, or every unresolved alert with `None`
    pub fn active_alerts(&self, claim: Option<ClaimId>) -> Result<Vec<EpistemicAlert>, StoreError> {
        let alerts = match claim {
            Some(claim) => {
                let sql = format!(
                    "SELECT {} FROM epistemic_alerts
                     WHERE resolved = 0 AND claim_id = ?1 ORDER BY id",
                    ALERT_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![id_to_bytes(claim)], alert_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM epistemic_alerts WHERE resolved = 0 ORDER BY id",
                    ALERT_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], alert_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(alerts)
    }

    /// State of a claim's latest classification
    pub fn current_state(&self, claim: ClaimId) -> Result<Option<StabilityState>, StoreError> {
        let state = self
            .conn
            .query_row(
                "SELECT state FROM stability_classifications WHERE claim_id = ?1
                 ORDER BY timestamp DESC LIMIT 1",
                params![id_to_bytes(claim)],
                |row| parsed_column(row, 0, "stability state", StabilityState::parse),
            )
            .optional()?;
        Ok(state)
    }

    /// Classification history of a claim, oldest first
    pub fn classifications_for(
        &self,
        claim: ClaimId,
    ) -> Result<Vec<StabilityClassification>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT claim_id, timestamp, from_state, state, rule, reason, features
             FROM stability_classifications WHERE claim_id = ?1 ORDER BY timestamp",
        )?;
        let entries = stmt
            .query_map(params![id_to_bytes(claim)], |row| {
                Ok(StabilityClassification {
                    claim_id: claim_column(row, 0)?,
                    timestamp: ts_column(row, 1)?,
                    from: parsed_column(row, 2, "stability state", StabilityState::parse)?,
                    state: parsed_column(row, 3, "stability state", StabilityState::parse)?,
                    rule: row.get(4)?,
                    reason: row.get(5)?,
                    features: json_column(row, 6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Row counts per table
    pub fn counts(&self) -> Result<LedgerCounts, StoreError> {
        let count = |table: &str| -> Result<usize, StoreError> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
            Ok(n as usize)
        };
        Ok(LedgerCounts {
            scores: count("claim_scores")?,
            metrics: count("mutation_metrics")?,
            samples: count("timeline_samples")?,
            classifications: count("stability_classifications")?,
            alerts: count("epistemic_alerts")?,
        })
    }
}

fn score_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClaimScore> {
    Ok(ClaimScore {
        claim_id: claim_column(row, 0)?,
        timestamp: ts_column(row, 1)?,
        components: ScoreComponents {
            prior: row.get(2)?,
            credibility: row.get(3)?,
            citation: row.get(4)?,
            contradiction: row.get(5)?,
            verification: row.get(6)?,
            mutation_decay: row.get(7)?,
        },
        weights: json_column(row, 8)?,
        composite: row.get(9)?,
    })
}

fn alert_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EpistemicAlert> {
    let id: i64 = row.get(0)?;
    let scope: Vec<u8> = row.get(1)?;
    let claim_id = if scope.is_empty() {
        None
    } else {
        Some(claim_column(row, 1)?)
    };
    let resolved_at = match row.get::<_, Option<i64>>(9)? {
        Some(_) => Some(ts_column(row, 9)?),
        None => None,
    };
    Ok(EpistemicAlert {
        id: AlertId(id as u64),
        claim_id,
        alert_type: parsed_column(row, 2, "alert type", AlertType::parse)?,
        severity: parsed_column(row, 3, "severity", Severity::parse)?,
        timestamp: ts_column(row, 4)?,
        value: row.get(5)?,
        threshold: row.get(6)?,
        message: row.get(7)?,
        resolved: row.get(8)?,
        resolved_at,
    })
}

impl RecordSink for SqliteLedger {
    type Error = StoreError;

    fn record_score(&mut self, score: &ClaimScore) -> Result<(), Self::Error> {
        let c = &score.components;
        self.conn.execute(
            "INSERT INTO claim_scores (claim_id, timestamp, prior, credibility, citation,
                 contradiction, verification, mutation_decay, weights, composite)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(claim_id, timestamp) DO UPDATE SET
                 prior = excluded.prior, credibility = excluded.credibility,
                 citation = excluded.citation, contradiction = excluded.contradiction,
                 verification = excluded.verification, mutation_decay = excluded.mutation_decay,
                 weights = excluded.weights, composite = excluded.composite",
            params![
                id_to_bytes(score.claim_id),
                ts_to_sql(score.timestamp)?,
                c.prior,
                c.credibility,
                c.citation,
                c.contradiction,
                c.verification,
                c.mutation_decay,
                serde_json::to_string(&score.weights)?,
                score.composite,
            ],
        )?;
        debug!(claim = %score.claim_id, t = score.timestamp, "Stored score");
        Ok(())
    }

    fn record_metric(&mut self, metric: &MutationMetric) -> Result<(), Self::Error> {
        let d = &metric.distribution;
        self.conn.execute(
            "INSERT INTO mutation_metrics (claim_id, timestamp, version_id, depth, entropy,
                 drift_velocity, lineage_similarity, p_insert, p_delete, p_substitute, p_unchanged)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(claim_id, timestamp) DO UPDATE SET
                 version_id = excluded.version_id, depth = excluded.depth,
                 entropy = excluded.entropy, drift_velocity = excluded.drift_velocity,
                 lineage_similarity = excluded.lineage_similarity,
                 p_insert = excluded.p_insert, p_delete = excluded.p_delete,
                 p_substitute = excluded.p_substitute, p_unchanged = excluded.p_unchanged",
            params![
                id_to_bytes(metric.claim_id),
                ts_to_sql(metric.timestamp)?,
                id_to_bytes(metric.version_id),
                metric.depth as i64,
                metric.entropy,
                metric.drift_velocity,
                metric.lineage_similarity,
                d.insert,
                d.delete,
                d.substitute,
                d.unchanged,
            ],
        )?;
        Ok(())
    }

    fn record_sample(&mut self, sample: &TimelineSample) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO timeline_samples (claim_id, signal, timestamp, raw, smoothed)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(claim_id, signal, timestamp) DO UPDATE SET
                 raw = excluded.raw, smoothed = excluded.smoothed",
            params![
                id_to_bytes(sample.claim_id),
                sample.signal.as_str(),
                ts_to_sql(sample.timestamp)?,
                sample.raw,
                sample.smoothed,
            ],
        )?;
        Ok(())
    }

    fn record_classification(
        &mut self,
        classification: &StabilityClassification,
    ) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO stability_classifications (claim_id, timestamp, from_state, state,
                 rule, reason, features)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(claim_id, timestamp) DO UPDATE SET
                 from_state = excluded.from_state, state = excluded.state,
                 rule = excluded.rule, reason = excluded.reason, features = excluded.features",
            params![
                id_to_bytes(classification.claim_id),
                ts_to_sql(classification.timestamp)?,
                classification.from.as_str(),
                classification.state.as_str(),
                classification.rule,
                classification.reason,
                serde_json::to_string(&classification.features)?,
            ],
        )?;
        Ok(())
    }

    fn record_alert(&mut self, alert: &EpistemicAlert) -> Result<(), Self::Error> {
        let resolved_at = alert.resolved_at.map(ts_to_sql).transpose()?;
        self.conn.execute(
            "INSERT INTO epistemic_alerts (claim_id, alert_type, severity, timestamp,
                 value, threshold, message, resolved, resolved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(claim_id, alert_type, timestamp) DO UPDATE SET
                 resolved = excluded.resolved, resolved_at = excluded.resolved_at",
            params![
                alert.claim_id.map(id_to_bytes).unwrap_or_default(),
                alert.alert_type.as_str(),
                alert.severity.as_str(),
                ts_to_sql(alert.timestamp)?,
                alert.value,
                alert.threshold,
                alert.message,
                alert.resolved,
                resolved_at,
            ],
        )?;
        Ok(())
    }

    fn begin_batch(&mut self) -> Result<(), Self::Error> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<(), Self::Error> {
        self.conn.execute_batch("COMMIT")?;
        debug!("Committed export batch");
        Ok(())
    }

    fn rollback_batch(&mut self) -> Result<(), Self::Error> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}
