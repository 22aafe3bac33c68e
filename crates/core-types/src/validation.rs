//! Shape checks for the three record families.
//!
//! Two contracts live here. The insert contract (`NewStrategy::validate`
//! and friends) guards caller-supplied records before they reach the
//! store. The select contract (`Strategy::validate` and friends) applies
//! the same checks to rows read back from storage as a defensive
//! integrity check. Both stop at the first failing field and never return
//! a partially checked record.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::enums::ExecutionStatus;
use crate::error::ValidationError;
use crate::records::{
    Execution, ExecutionOutcome, Metric, NewExecution, NewMetric, NewStrategy, Strategy,
};

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must be a non-empty string"));
    }
    Ok(())
}

fn require_object(field: &'static str, value: &JsonValue) -> Result<(), ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::new(field, "must be a JSON object"));
    }
    Ok(())
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    Ok(())
}

/// `completed_at` is set exactly when the status is terminal.
fn check_completion_pairing(
    status: ExecutionStatus,
    completed_at: Option<&DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (status.is_terminal(), completed_at) {
        (true, None) => Err(ValidationError::new(
            "completed_at",
            format!("must be set when status is '{status}'"),
        )),
        (false, Some(_)) => Err(ValidationError::new(
            "completed_at",
            format!("must be null while status is '{status}'"),
        )),
        _ => Ok(()),
    }
}

fn check_strategy_fields(
    id: &str,
    name: &str,
    kind: &str,
    chain_id: &str,
    parameters: &JsonValue,
) -> Result<(), ValidationError> {
    require_non_empty("id", id)?;
    require_non_empty("name", name)?;
    require_non_empty("type", kind)?;
    require_non_empty("chain_id", chain_id)?;
    require_object("parameters", parameters)
}

fn check_execution_fields(
    id: &str,
    strategy_id: &str,
    status: ExecutionStatus,
    completed_at: Option<&DateTime<Utc>>,
    result: Option<&JsonValue>,
    profit: f64,
    gas_used: f64,
) -> Result<(), ValidationError> {
    require_non_empty("id", id)?;
    require_non_empty("strategy_id", strategy_id)?;
    check_completion_pairing(status, completed_at)?;
    if let Some(result) = result {
        require_object("result", result)?;
    }
    require_finite("profit", profit)?;
    require_finite("gas_used", gas_used)
}

fn check_metric_fields(
    id: &str,
    strategy_id: &str,
    execution_id: Option<&str>,
    metric_type: &str,
    value: f64,
) -> Result<(), ValidationError> {
    require_non_empty("id", id)?;
    require_non_empty("strategy_id", strategy_id)?;
    if let Some(execution_id) = execution_id {
        require_non_empty("execution_id", execution_id)?;
    }
    require_non_empty("metric_type", metric_type)?;
    require_finite("value", value)
}

impl NewStrategy {
    /// Insert contract: required fields present and well-formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_strategy_fields(&self.id, &self.name, &self.kind, &self.chain_id, &self.parameters)
    }
}

impl Strategy {
    /// Select contract: same shape check applied to a stored row.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_strategy_fields(&self.id, &self.name, &self.kind, &self.chain_id, &self.parameters)
    }
}

impl NewExecution {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_execution_fields(
            &self.id,
            &self.strategy_id,
            self.status,
            self.completed_at.as_ref(),
            self.result.as_ref(),
            self.profit,
            self.gas_used,
        )
    }
}

impl Execution {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_execution_fields(
            &self.id,
            &self.strategy_id,
            self.status,
            self.completed_at.as_ref(),
            self.result.as_ref(),
            self.profit,
            self.gas_used,
        )
    }
}

impl ExecutionOutcome {
    /// The completion mutation must carry a terminal status.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.status.is_terminal() {
            return Err(ValidationError::new(
                "status",
                format!("outcome status must be terminal, got '{}'", self.status),
            ));
        }
        if let Some(result) = &self.result {
            require_object("result", result)?;
        }
        require_finite("profit", self.profit)?;
        require_finite("gas_used", self.gas_used)
    }
}

impl NewMetric {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_metric_fields(
            &self.id,
            &self.strategy_id,
            self.execution_id.as_deref(),
            &self.metric_type,
            self.value,
        )
    }
}

impl Metric {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_metric_fields(
            &self.id,
            &self.strategy_id,
            self.execution_id.as_deref(),
            &self.metric_type,
            self.value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn valid_strategy() -> NewStrategy {
        NewStrategy {
            id: "s1".into(),
            name: "ArbBot".into(),
            kind: "atomic_arb".into(),
            chain_id: "1".into(),
            is_active: false,
            parameters: json!({"slippageBps": 50}),
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[test]
    fn valid_strategy_passes() {
        assert!(valid_strategy().validate().is_ok());
    }

    #[test]
    fn strategy_parameters_must_be_an_object() {
        let mut strategy = valid_strategy();
        strategy.parameters = json!([1, 2, 3]);
        let err = strategy.validate().unwrap_err();
        assert_eq!(err.field, "parameters");
    }

    #[test]
    fn first_failing_field_wins() {
        let mut strategy = valid_strategy();
        strategy.name = String::new();
        strategy.chain_id = String::new();
        assert_eq!(strategy.validate().unwrap_err().field, "name");
    }

    #[test]
    fn completed_execution_requires_completed_at() {
        let execution = NewExecution {
            id: "e1".into(),
            strategy_id: "s1".into(),
            status: ExecutionStatus::Completed,
            started_at: t0(),
            completed_at: None,
            result: None,
            error_message: None,
            profit: 0.0,
            gas_used: 0.0,
        };
        let err = execution.validate().unwrap_err();
        assert_eq!(err.field, "completed_at");
    }

    #[test]
    fn pending_execution_must_not_have_completed_at() {
        let execution = NewExecution {
            id: "e1".into(),
            strategy_id: "s1".into(),
            status: ExecutionStatus::Pending,
            started_at: t0(),
            completed_at: Some(t0()),
            result: None,
            error_message: None,
            profit: 0.0,
            gas_used: 0.0,
        };
        assert_eq!(execution.validate().unwrap_err().field, "completed_at");
    }

    #[test]
    fn outcome_rejects_non_terminal_status() {
        let outcome = ExecutionOutcome {
            status: ExecutionStatus::Running,
            completed_at: t0(),
            result: None,
            error_message: None,
            profit: 0.0,
            gas_used: 0.0,
        };
        assert_eq!(outcome.validate().unwrap_err().field, "status");
    }

    #[test]
    fn metric_value_must_be_finite() {
        let metric = NewMetric {
            id: "m1".into(),
            strategy_id: "s1".into(),
            execution_id: None,
            metric_type: "profit".into(),
            value: f64::NAN,
            timestamp: t0(),
        };
        assert_eq!(metric.validate().unwrap_err().field, "value");
    }

    #[test]
    fn metric_type_must_be_non_empty() {
        let metric = NewMetric {
            id: "m1".into(),
            strategy_id: "s1".into(),
            execution_id: Some("e1".into()),
            metric_type: "  ".into(),
            value: 1.0,
            timestamp: t0(),
        };
        assert_eq!(metric.validate().unwrap_err().field, "metric_type");
    }
}
