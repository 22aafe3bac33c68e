use crate::error::DbError;
use chrono::{DateTime, Utc};
use core_types::{
    Execution, ExecutionOutcome, ExecutionStatus, Metric, NewExecution, NewMetric, NewStrategy,
    Strategy,
};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use sqlx::sqlite::SqlitePool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic
/// for the three tables: strategies, executions, and metrics.
///
/// Every insert validates the candidate record first; every row read back
/// is re-validated while converting to its domain type, so a malformed row
/// surfaces as an error instead of a partially filled record.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

// Timestamps are stored as RFC 3339 text, JSON documents as serialized text.

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, DbError> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn format_json(document: &JsonValue) -> Result<String, DbError> {
    Ok(serde_json::to_string(document)?)
}

fn parse_json(raw: &str) -> Result<JsonValue, DbError> {
    Ok(serde_json::from_str(raw)?)
}

/// A row fetched from the `strategies` table, before shape validation.
#[derive(Debug, Clone, FromRow)]
struct StrategyRow {
    id: String,
    name: String,
    #[sqlx(rename = "type")]
    kind: String,
    chain_id: String,
    is_active: bool,
    parameters: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<StrategyRow> for Strategy {
    type Error = DbError;

    fn try_from(row: StrategyRow) -> Result<Self, Self::Error> {
        let strategy = Strategy {
            id: row.id,
            name: row.name,
            kind: row.kind,
            chain_id: row.chain_id,
            is_active: row.is_active,
            parameters: parse_json(&row.parameters)?,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        };
        strategy.validate()?;
        Ok(strategy)
    }
}

/// A row fetched from the `executions` table, before shape validation.
#[derive(Debug, Clone, FromRow)]
struct ExecutionRow {
    id: String,
    strategy_id: String,
    status: String,
    started_at: String,
    completed_at: Option<String>,
    result: Option<String>,
    error_message: Option<String>,
    profit: f64,
    gas_used: f64,
}

impl TryFrom<ExecutionRow> for Execution {
    type Error = DbError;

    fn try_from(row: ExecutionRow) -> Result<Self, Self::Error> {
        let execution = Execution {
            id: row.id,
            strategy_id: row.strategy_id,
            status: row.status.parse::<ExecutionStatus>()?,
            started_at: parse_ts(&row.started_at)?,
            completed_at: row.completed_at.as_deref().map(parse_ts).transpose()?,
            result: row.result.as_deref().map(parse_json).transpose()?,
            error_message: row.error_message,
            profit: row.profit,
            gas_used: row.gas_used,
        };
        execution.validate()?;
        Ok(execution)
    }
}

/// A row fetched from the `metrics` table, before shape validation.
#[derive(Debug, Clone, FromRow)]
struct MetricRow {
    id: String,
    strategy_id: String,
    execution_id: Option<String>,
    metric_type: String,
    value: f64,
    timestamp: String,
}

impl TryFrom<MetricRow> for Metric {
    type Error = DbError;

    fn try_from(row: MetricRow) -> Result<Self, Self::Error> {
        let metric = Metric {
            id: row.id,
            strategy_id: row.strategy_id,
            execution_id: row.execution_id,
            metric_type: row.metric_type,
            value: row.value,
            timestamp: parse_ts(&row.timestamp)?,
        };
        metric.validate()?;
        Ok(metric)
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ----- Strategies -----

    /// Persists a new strategy and returns the stored record.
    pub async fn save_strategy(&self, strategy: &NewStrategy) -> Result<Strategy, DbError> {
        strategy.validate()?;
        sqlx::query(
            r#"
            INSERT INTO strategies (id, name, type, chain_id, is_active, parameters, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&strategy.id)
        .bind(&strategy.name)
        .bind(&strategy.kind)
        .bind(&strategy.chain_id)
        .bind(strategy.is_active)
        .bind(format_json(&strategy.parameters)?)
        .bind(format_ts(&strategy.created_at))
        .bind(format_ts(&strategy.updated_at))
        .execute(&self.pool)
        .await?;

        self.get_strategy(&strategy.id).await
    }

    /// Fetches a single strategy by its identifier.
    pub async fn get_strategy(&self, id: &str) -> Result<Strategy, DbError> {
        let row = sqlx::query_as::<_, StrategyRow>("SELECT * FROM strategies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)?;
        row.try_into()
    }

    /// Fetches all strategies, newest first.
    pub async fn get_all_strategies(&self) -> Result<Vec<Strategy>, DbError> {
        let rows = sqlx::query_as::<_, StrategyRow>(
            "SELECT * FROM strategies ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Strategy::try_from).collect()
    }

    /// Fetches the active strategies targeting a given chain.
    pub async fn get_active_strategies(&self, chain_id: &str) -> Result<Vec<Strategy>, DbError> {
        let rows = sqlx::query_as::<_, StrategyRow>(
            "SELECT * FROM strategies WHERE chain_id = ? AND is_active = 1 ORDER BY created_at DESC",
        )
        .bind(chain_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Strategy::try_from).collect()
    }

    /// Replaces a strategy's parameter document and bumps `updated_at`.
    pub async fn update_strategy_parameters(
        &self,
        id: &str,
        parameters: &JsonValue,
    ) -> Result<Strategy, DbError> {
        if !parameters.is_object() {
            return Err(core_types::ValidationError::new(
                "parameters",
                "must be a JSON object",
            )
            .into());
        }
        let result = sqlx::query("UPDATE strategies SET parameters = ?, updated_at = ? WHERE id = ?")
            .bind(format_json(parameters)?)
            .bind(format_ts(&Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        self.get_strategy(id).await
    }

    /// Enables or soft-disables a strategy and bumps `updated_at`.
    pub async fn set_strategy_active(&self, id: &str, active: bool) -> Result<Strategy, DbError> {
        let result = sqlx::query("UPDATE strategies SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(format_ts(&Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        self.get_strategy(id).await
    }

    // ----- Executions -----

    /// Records the start of a strategy run. The referenced strategy must
    /// exist; a dangling `strategy_id` is rejected with
    /// [`DbError::ReferentialIntegrity`].
    pub async fn save_execution(&self, execution: &NewExecution) -> Result<Execution, DbError> {
        execution.validate()?;
        sqlx::query(
            r#"
            INSERT INTO executions (id, strategy_id, status, started_at, completed_at, result, error_message, profit, gas_used)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&execution.id)
        .bind(&execution.strategy_id)
        .bind(execution.status.as_str())
        .bind(format_ts(&execution.started_at))
        .bind(execution.completed_at.as_ref().map(format_ts))
        .bind(execution.result.as_ref().map(format_json).transpose()?)
        .bind(&execution.error_message)
        .bind(execution.profit)
        .bind(execution.gas_used)
        .execute(&self.pool)
        .await?;

        self.get_execution(&execution.id).await
    }

    /// Applies the one-shot completion mutation to a pending or running
    /// execution. An execution that already reached a terminal status is
    /// immutable and the update is rejected.
    pub async fn update_execution_outcome(
        &self,
        id: &str,
        outcome: &ExecutionOutcome,
    ) -> Result<Execution, DbError> {
        outcome.validate()?;
        let result = sqlx::query(
            r#"
            UPDATE executions
            SET status = ?, completed_at = ?, result = ?, error_message = ?, profit = ?, gas_used = ?
            WHERE id = ? AND status IN ('pending', 'running')
            "#,
        )
        .bind(outcome.status.as_str())
        .bind(format_ts(&outcome.completed_at))
        .bind(outcome.result.as_ref().map(format_json).transpose()?)
        .bind(&outcome.error_message)
        .bind(outcome.profit)
        .bind(outcome.gas_used)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing execution from an already-final one.
            let existing = self.get_execution(id).await?;
            return Err(core_types::ValidationError::new(
                "status",
                format!("execution '{}' already finalized as '{}'", id, existing.status),
            )
            .into());
        }
        self.get_execution(id).await
    }

    /// Fetches a single execution by its identifier.
    pub async fn get_execution(&self, id: &str) -> Result<Execution, DbError> {
        let row = sqlx::query_as::<_, ExecutionRow>("SELECT * FROM executions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)?;
        row.try_into()
    }

    /// Fetches the execution history of a strategy, oldest first.
    pub async fn get_executions_for_strategy(
        &self,
        strategy_id: &str,
    ) -> Result<Vec<Execution>, DbError> {
        let rows = sqlx::query_as::<_, ExecutionRow>(
            "SELECT * FROM executions WHERE strategy_id = ? ORDER BY started_at ASC",
        )
        .bind(strategy_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Execution::try_from).collect()
    }

    /// Counts the recorded executions of a strategy.
    pub async fn count_executions_for_strategy(&self, strategy_id: &str) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM executions WHERE strategy_id = ?",
        )
        .bind(strategy_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // ----- Metrics -----

    /// Appends a single observation. Both referenced rows must exist;
    /// dangling references are rejected with
    /// [`DbError::ReferentialIntegrity`].
    pub async fn save_metric(&self, metric: &NewMetric) -> Result<Metric, DbError> {
        metric.validate()?;
        sqlx::query(
            r#"
            INSERT INTO metrics (id, strategy_id, execution_id, metric_type, value, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&metric.id)
        .bind(&metric.strategy_id)
        .bind(&metric.execution_id)
        .bind(&metric.metric_type)
        .bind(metric.value)
        .bind(format_ts(&metric.timestamp))
        .execute(&self.pool)
        .await?;

        self.get_metric(&metric.id).await
    }

    /// Fetches a single metric by its identifier.
    pub async fn get_metric(&self, id: &str) -> Result<Metric, DbError> {
        let row = sqlx::query_as::<_, MetricRow>("SELECT * FROM metrics WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)?;
        row.try_into()
    }

    /// Fetches all observations recorded for a strategy, oldest first.
    pub async fn get_metrics_for_strategy(
        &self,
        strategy_id: &str,
    ) -> Result<Vec<Metric>, DbError> {
        let rows = sqlx::query_as::<_, MetricRow>(
            "SELECT * FROM metrics WHERE strategy_id = ? ORDER BY timestamp ASC",
        )
        .bind(strategy_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Metric::try_from).collect()
    }

    /// Fetches the observations tied to one specific execution.
    pub async fn get_metrics_for_execution(
        &self,
        execution_id: &str,
    ) -> Result<Vec<Metric>, DbError> {
        let rows = sqlx::query_as::<_, MetricRow>(
            "SELECT * FROM metrics WHERE execution_id = ? ORDER BY timestamp ASC",
        )
        .bind(execution_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Metric::try_from).collect()
    }
}
