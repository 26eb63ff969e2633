// src/domain/filter_expr.rs
// Criterion parsing shared by the `list` flags and the TUI filter prompt.

use super::Dataset;
use crate::errors::GuardError;
use crate::listing::{Criterion, FieldKind, FieldSchema, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionOp {
    Equals,
    AtLeast,
    Below,
    Contains,
}

impl Dataset {
    /// Like `field`, but also rejects fields the registry does not filter on.
    pub fn filterable_field(self, name: &str) -> Result<&'static FieldSchema, GuardError> {
        let schema = self.field(name)?;
        if !schema.filterable {
            return Err(GuardError::InvalidArgument(format!(
                "field '{}' of {} is not filterable",
                name, self
            )));
        }
        Ok(schema)
    }

    /// Builds a criterion on `field` from its raw text value.
    pub fn criterion(self, field: &str, op: CriterionOp, raw: &str) -> Result<Criterion, GuardError> {
        let schema = self.filterable_field(field)?;
        let criterion = match op {
            CriterionOp::Equals => Criterion::Equals(exact_value(schema, raw)?),
            CriterionOp::AtLeast => Criterion::AtLeast(parse_number(raw, field)?),
            CriterionOp::Below => Criterion::Below(parse_number(raw, field)?),
            CriterionOp::Contains => Criterion::Contains(raw.to_string()),
        };
        Ok(criterion)
    }
}

/// Parses `field=value`, `field>=number`, `field<number` or `field~text`.
pub fn parse_filter_expression(dataset: Dataset, expr: &str) -> Result<(String, Criterion), GuardError> {
    let invalid = || {
        GuardError::InvalidArgument(format!(
            "expected FIELD=VALUE, FIELD>=N, FIELD<N or FIELD~TEXT, got '{}'",
            expr
        ))
    };
    let at = expr
        .find(|c: char| matches!(c, '=' | '<' | '>' | '~'))
        .ok_or_else(invalid)?;
    let (field, rest) = expr.split_at(at);
    let (op, value) = if let Some(value) = rest.strip_prefix(">=") {
        (CriterionOp::AtLeast, value)
    } else if let Some(value) = rest.strip_prefix('<') {
        (CriterionOp::Below, value)
    } else if let Some(value) = rest.strip_prefix('~') {
        (CriterionOp::Contains, value)
    } else if let Some(value) = rest.strip_prefix('=') {
        (CriterionOp::Equals, value)
    } else {
        return Err(invalid());
    };
    let (field, value) = (field.trim(), value.trim());
    if field.is_empty() || value.is_empty() {
        return Err(invalid());
    }
    Ok((field.to_string(), dataset.criterion(field, op, value)?))
}

fn parse_number(raw: &str, field: &str) -> Result<f64, GuardError> {
    raw.parse::<f64>()
        .map_err(|_| GuardError::InvalidArgument(format!("'{}' is not a number for field '{}'", raw, field)))
}

fn exact_value(schema: &FieldSchema, raw: &str) -> Result<FieldValue, GuardError> {
    let value = match schema.kind {
        FieldKind::Number => FieldValue::Number(parse_number(raw, schema.name)?),
        FieldKind::Flag => FieldValue::Flag(raw.parse::<bool>().map_err(|_| {
            GuardError::InvalidArgument(format!("'{}' is not true/false for field '{}'", raw, schema.name))
        })?),
        FieldKind::Enum => FieldValue::text(raw.to_lowercase()),
        FieldKind::Text | FieldKind::Date => FieldValue::text(raw),
    };
    Ok(value)
}
