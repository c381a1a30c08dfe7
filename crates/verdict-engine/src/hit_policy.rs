//! Hit policy resolution
//!
//! After rule matching, the table's hit policy decides which matching rules
//! survive and whether their outputs reduce to a single aggregate. Handlers
//! are a closed enum selected once per table evaluation; COLLECT splits on
//! whether an aggregator is declared.

use verdict_core::model::{Aggregator, DecisionTable, HitPolicy, Output};
use verdict_core::{TypedValue, Value};

use crate::error::{EngineError, Result};
use crate::event::EvaluatedRule;

/// Resolved hit policy behavior for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HitPolicyHandler {
    Unique,
    First,
    Any,
    Priority,
    RuleOrder,
    OutputOrder,
    Collect,
    CollectAggregate(Aggregator),
}

/// What survives hit policy resolution.
#[derive(Debug)]
pub(crate) enum PolicyOutcome {
    /// The surviving rules, each contributing one result entry map
    Rules(Vec<EvaluatedRule>),
    /// The matched rules plus the reduced aggregate value; `None` means
    /// "no result" (SUM/MIN/MAX over zero matches)
    Aggregate {
        rules: Vec<EvaluatedRule>,
        value: Option<TypedValue>,
    },
}

impl HitPolicyHandler {
    pub(crate) fn from_table(table: &DecisionTable) -> Self {
        match table.hit_policy {
            HitPolicy::Unique => HitPolicyHandler::Unique,
            HitPolicy::First => HitPolicyHandler::First,
            HitPolicy::Any => HitPolicyHandler::Any,
            HitPolicy::Priority => HitPolicyHandler::Priority,
            HitPolicy::RuleOrder => HitPolicyHandler::RuleOrder,
            HitPolicy::OutputOrder => HitPolicyHandler::OutputOrder,
            HitPolicy::Collect => match table.aggregator {
                Some(aggregator) => HitPolicyHandler::CollectAggregate(aggregator),
                None => HitPolicyHandler::Collect,
            },
        }
    }

    pub(crate) fn apply(
        &self,
        table: &DecisionTable,
        mut rules: Vec<EvaluatedRule>,
    ) -> Result<PolicyOutcome> {
        match self {
            HitPolicyHandler::Unique => {
                if rules.len() > 1 {
                    return Err(EngineError::UniqueHitPolicyViolated(rules.len()));
                }
                Ok(PolicyOutcome::Rules(rules))
            }
            HitPolicyHandler::First => {
                rules.truncate(1);
                Ok(PolicyOutcome::Rules(rules))
            }
            HitPolicyHandler::Any => {
                if let Some(first) = rules.first() {
                    let reference = first.entries();
                    if rules.iter().skip(1).any(|rule| rule.entries() != reference) {
                        return Err(EngineError::AnyHitPolicyViolated);
                    }
                    rules.truncate(1);
                }
                Ok(PolicyOutcome::Rules(rules))
            }
            HitPolicyHandler::RuleOrder => Ok(PolicyOutcome::Rules(rules)),
            HitPolicyHandler::Priority => {
                let mut sorted = sort_by_output_values(table, rules, "PRIORITY")?;
                sorted.truncate(1);
                Ok(PolicyOutcome::Rules(sorted))
            }
            HitPolicyHandler::OutputOrder => {
                let sorted = sort_by_output_values(table, rules, "OUTPUT ORDER")?;
                Ok(PolicyOutcome::Rules(sorted))
            }
            HitPolicyHandler::Collect => Ok(PolicyOutcome::Rules(rules)),
            HitPolicyHandler::CollectAggregate(aggregator) => {
                let value = aggregate(table, *aggregator, &rules)?;
                Ok(PolicyOutcome::Aggregate { rules, value })
            }
        }
    }
}

/// Stable sort of the matching rules by the position of their output values
/// in the declared output-value lists, lowest index first, columns compared
/// left to right.
fn sort_by_output_values(
    table: &DecisionTable,
    rules: Vec<EvaluatedRule>,
    policy_name: &'static str,
) -> Result<Vec<EvaluatedRule>> {
    if rules.is_empty() {
        return Err(EngineError::SortingRequiresMatch(policy_name));
    }

    let mut keyed = Vec::with_capacity(rules.len());
    for rule in rules {
        let key = sort_key(table, &rule)?;
        keyed.push((key, rule));
    }
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(keyed.into_iter().map(|(_, rule)| rule).collect())
}

/// Position of the rule's value in each output column's declared value list.
/// Columns without declared values do not participate in the ordering.
fn sort_key(table: &DecisionTable, rule: &EvaluatedRule) -> Result<Vec<usize>> {
    let mut key = Vec::new();
    for output in &table.outputs {
        if output.output_values.is_empty() {
            continue;
        }
        let value = rule
            .outputs
            .iter()
            .find(|entry| entry.output_name == output.output_name)
            .map(|entry| entry.value.as_value())
            .unwrap_or(Value::Null);
        let position = output
            .output_values
            .iter()
            .position(|declared| *declared == value)
            .ok_or_else(|| EngineError::UndeclaredOutputValue {
                output: output.output_name.clone(),
                value: value.clone(),
            })?;
        key.push(position);
    }
    Ok(key)
}

/// Reduce the matched rules' outputs under a collect aggregator.
///
/// Requires exactly one output column. A single SUM/MIN/MAX match passes its
/// typed value through unchanged; several values widen per participant types.
fn aggregate(
    table: &DecisionTable,
    aggregator: Aggregator,
    rules: &[EvaluatedRule],
) -> Result<Option<TypedValue>> {
    let output = single_output(table)?;
    let values: Vec<TypedValue> = rules
        .iter()
        .filter_map(|rule| {
            rule.outputs
                .iter()
                .find(|entry| entry.output_name == output.output_name)
                .map(|entry| entry.value.clone())
        })
        .collect();

    if aggregator == Aggregator::Count {
        return Ok(Some(TypedValue::Integer(values.len() as i32)));
    }
    if values.is_empty() {
        return Ok(None);
    }
    // a sole match is passed through as-is, numeric or not
    if let [value] = values.as_slice() {
        return Ok(Some(value.clone()));
    }

    let numbers = NumericValues::collect(&values)?;
    Ok(Some(match aggregator {
        Aggregator::Sum => numbers.sum(),
        Aggregator::Min => numbers.min(),
        Aggregator::Max => numbers.max(),
        Aggregator::Count => unreachable!("handled above"),
    }))
}

fn single_output(table: &DecisionTable) -> Result<&Output> {
    match table.outputs.as_slice() {
        [output] => Ok(output),
        outputs => Err(EngineError::AggregationFailed(format!(
            "aggregation requires exactly one output column, table has {}",
            outputs.len()
        ))),
    }
}

/// The numeric participants of an aggregation, tracking the widest width
/// seen: all Integer stays integer, any Long widens to long, any Double
/// widens to double.
struct NumericValues {
    ints: Vec<i64>,
    floats: Vec<f64>,
    any_long: bool,
    any_double: bool,
}

impl NumericValues {
    fn collect(values: &[TypedValue]) -> Result<Self> {
        let mut numbers = NumericValues {
            ints: Vec::with_capacity(values.len()),
            floats: Vec::with_capacity(values.len()),
            any_long: false,
            any_double: false,
        };
        for value in values {
            match value {
                TypedValue::Integer(i) => {
                    numbers.ints.push(*i as i64);
                    numbers.floats.push(*i as f64);
                }
                TypedValue::Long(l) | TypedValue::Untyped(Value::Int(l)) => {
                    numbers.any_long = true;
                    numbers.ints.push(*l);
                    numbers.floats.push(*l as f64);
                }
                TypedValue::Double(d) | TypedValue::Untyped(Value::Float(d)) => {
                    numbers.any_double = true;
                    numbers.floats.push(*d);
                }
                other => {
                    return Err(EngineError::AggregationFailed(format!(
                        "output value of type '{}' is not numeric",
                        other.type_name()
                    )))
                }
            }
        }
        Ok(numbers)
    }

    fn sum(&self) -> TypedValue {
        if self.any_double {
            TypedValue::Double(self.floats.iter().sum())
        } else {
            self.integral(self.ints.iter().sum())
        }
    }

    fn min(&self) -> TypedValue {
        if self.any_double {
            TypedValue::Double(self.floats.iter().copied().fold(f64::INFINITY, f64::min))
        } else {
            self.integral(self.ints.iter().copied().min().unwrap_or(0))
        }
    }

    fn max(&self) -> TypedValue {
        if self.any_double {
            TypedValue::Double(self.floats.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        } else {
            self.integral(self.ints.iter().copied().max().unwrap_or(0))
        }
    }

    fn integral(&self, value: i64) -> TypedValue {
        if !self.any_long {
            if let Ok(narrow) = i32::try_from(value) {
                return TypedValue::Integer(narrow);
            }
        }
        TypedValue::Long(value)
    }
}
