use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::enums::ExecutionStatus;

/// A configured trading/arbitrage/liquidation policy targeting a specific
/// blockchain network. This is the authoritative shape as read back from
/// the `strategies` table.
///
/// Strategies are never physically deleted in normal operation; operators
/// soft-disable them via `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Caller-assigned unique identifier, immutable once assigned.
    pub id: String,
    pub name: String,
    /// Open string tag identifying the strategy kind, e.g. "atomic_arb"
    /// or "liquidator".
    #[serde(rename = "type")]
    pub kind: String,
    /// Target blockchain network identifier.
    pub chain_id: String,
    pub is_active: bool,
    /// Strategy-specific configuration; always a JSON object.
    pub parameters: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The insert shape for a strategy. `is_active` defaults to false when the
/// caller omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStrategy {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub chain_id: String,
    #[serde(default)]
    pub is_active: bool,
    pub parameters: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One run of a strategy, with a terminal outcome and financial result.
///
/// An execution is created pending/running, mutated exactly once on
/// completion (status, completed_at, result or error_message, profit,
/// gas_used), and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    /// References an existing `Strategy`.
    pub strategy_id: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    /// Set exactly when `status` is terminal, never while pending/running.
    pub completed_at: Option<DateTime<Utc>>,
    /// Strategy-specific result document; a JSON object when present.
    pub result: Option<JsonValue>,
    pub error_message: Option<String>,
    pub profit: f64,
    pub gas_used: f64,
}

/// The insert shape for an execution. `profit` and `gas_used` default to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExecution {
    pub id: String,
    pub strategy_id: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<JsonValue>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub gas_used: f64,
}

/// The one-shot completion mutation applied to an execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Must be a terminal status (completed or failed).
    pub status: ExecutionStatus,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub result: Option<JsonValue>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub gas_used: f64,
}

/// A single observed measurement (profit, gas cost, slippage, ...)
/// attributable to a strategy and optionally a specific execution.
/// Metrics are append-only and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub strategy_id: String,
    pub execution_id: Option<String>,
    /// Open string tag, e.g. "profit", "gas", "slippage".
    pub metric_type: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// The insert shape for a metric. Identical to the full record; metrics
/// have no server-assigned defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMetric {
    pub id: String,
    pub strategy_id: String,
    #[serde(default)]
    pub execution_id: Option<String>,
    pub metric_type: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}
