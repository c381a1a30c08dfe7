//! Shared test support: a small expression evaluator covering the syntax the
//! engine emits, plus builders for decision descriptors.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail};
use chrono::{NaiveDateTime, TimeZone, Utc};
use verdict_core::model::{
    DecisionDescriptor, DecisionTable, HitPolicy, Input, LogicDescriptor, Output, Rule,
};
use verdict_core::{Value, VariableMap};
use verdict_engine::{
    DecisionEngine, DecisionEvaluationEvent, DecisionEvaluationListener,
    DecisionTableEvaluationEvent, DecisionTableEvaluationListener, EngineConfiguration,
    ExpressionEvaluator,
};

/// Recursive descent evaluator for the expressions used in tests: literals,
/// identifiers, `dateTime("...")`, comparisons, `!`, `&&`, `||`, `+`, `*`
/// and parentheses.
pub struct TestEvaluator;

impl ExpressionEvaluator for TestEvaluator {
    fn evaluate(&self, expression: &str, scope: &VariableMap) -> anyhow::Result<Value> {
        let tokens = tokenize(expression)?;
        let mut parser = Parser {
            tokens,
            position: 0,
            scope,
        };
        let value = parser.or_expression()?;
        if parser.position != parser.tokens.len() {
            bail!("trailing input in expression '{}'", expression);
        }
        Ok(value)
    }
}

pub fn engine() -> DecisionEngine {
    EngineConfiguration::new(Arc::new(TestEvaluator)).build_engine()
}

/// Table listener pushing every event into a shared vector.
pub struct RecordingTableListener(pub Arc<Mutex<Vec<DecisionTableEvaluationEvent>>>);

impl DecisionTableEvaluationListener for RecordingTableListener {
    fn notify(&self, event: &DecisionTableEvaluationEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

/// Decision listener pushing every root event into a shared vector.
pub struct RecordingDecisionListener(pub Arc<Mutex<Vec<DecisionEvaluationEvent>>>);

impl DecisionEvaluationListener for RecordingDecisionListener {
    fn notify(&self, event: &DecisionEvaluationEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

pub fn variables(pairs: &[(&str, Value)]) -> VariableMap {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

pub fn input(id: &str, expression: &str, type_name: Option<&str>) -> Input {
    Input {
        id: id.to_string(),
        name: None,
        expression: expression.to_string(),
        input_variable: "cellInput".to_string(),
        type_name: type_name.map(str::to_string),
    }
}

pub fn output(id: &str, output_name: &str, type_name: Option<&str>) -> Output {
    Output {
        id: id.to_string(),
        name: None,
        output_name: output_name.to_string(),
        type_name: type_name.map(str::to_string),
        output_values: vec![],
    }
}

pub fn rule(id: &str, conditions: &[&str], conclusions: &[&str]) -> Rule {
    Rule {
        id: id.to_string(),
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
        conclusions: conclusions.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn table(
    hit_policy: HitPolicy,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    rules: Vec<Rule>,
) -> DecisionTable {
    DecisionTable {
        inputs,
        outputs,
        rules,
        hit_policy,
        aggregator: None,
    }
}

pub fn table_descriptor(key: &str, required: &[&str], table: DecisionTable) -> DecisionDescriptor {
    DecisionDescriptor {
        key: key.to_string(),
        name: None,
        logic: LogicDescriptor::DecisionTable(table),
        required_decisions: required.iter().map(|key| key.to_string()).collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(Value),
    Str(String),
    Symbol(&'static str),
}

fn tokenize(expression: &str) -> anyhow::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = expression.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '"' {
            let start = i + 1;
            let mut end = start;
            while end < chars.len() && chars[end] != '"' {
                end += 1;
            }
            if end == chars.len() {
                bail!("unterminated string in '{}'", expression);
            }
            tokens.push(Token::Str(chars[start..end].iter().collect()));
            i = end + 1;
            continue;
        }
        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
        {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            let value = match literal.parse::<i64>() {
                Ok(int) => Value::Int(int),
                Err(_) => Value::Float(literal.parse::<f64>()?),
            };
            tokens.push(Token::Number(value));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }
        let two: String = chars[i..(i + 2).min(chars.len())].iter().collect();
        let symbol = match two.as_str() {
            "==" | "!=" | "<=" | ">=" | "&&" | "||" => {
                i += 2;
                match two.as_str() {
                    "==" => "==",
                    "!=" => "!=",
                    "<=" => "<=",
                    ">=" => ">=",
                    "&&" => "&&",
                    _ => "||",
                }
            }
            _ => {
                i += 1;
                match c {
                    '<' => "<",
                    '>' => ">",
                    '!' => "!",
                    '(' => "(",
                    ')' => ")",
                    '+' => "+",
                    '-' => "-",
                    '*' => "*",
                    other => bail!("unexpected character '{}' in '{}'", other, expression),
                }
            }
        };
        tokens.push(Token::Symbol(symbol));
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    scope: &'a VariableMap,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.peek() == Some(&Token::Symbol(symbol_static(symbol))) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, symbol: &str) -> anyhow::Result<()> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            bail!("expected '{}' at token {}", symbol, self.position)
        }
    }

    fn or_expression(&mut self) -> anyhow::Result<Value> {
        let mut value = self.and_expression()?;
        while self.eat_symbol("||") {
            let right = self.and_expression()?;
            value = Value::Bool(as_bool(&value)? || as_bool(&right)?);
        }
        Ok(value)
    }

    fn and_expression(&mut self) -> anyhow::Result<Value> {
        let mut value = self.unary_expression()?;
        while self.eat_symbol("&&") {
            let right = self.unary_expression()?;
            value = Value::Bool(as_bool(&value)? && as_bool(&right)?);
        }
        Ok(value)
    }

    fn unary_expression(&mut self) -> anyhow::Result<Value> {
        if self.eat_symbol("!") {
            let value = self.unary_expression()?;
            return Ok(Value::Bool(!as_bool(&value)?));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> anyhow::Result<Value> {
        let left = self.additive()?;
        let operator = match self.peek() {
            Some(Token::Symbol(symbol @ ("==" | "!=" | "<" | "<=" | ">" | ">="))) => *symbol,
            _ => return Ok(left),
        };
        self.position += 1;
        let right = self.additive()?;
        let result = match operator {
            "==" => values_equal(&left, &right),
            "!=" => !values_equal(&left, &right),
            _ => {
                let ordering = compare(&left, &right)?;
                match operator {
                    "<" => ordering.is_lt(),
                    "<=" => ordering.is_le(),
                    ">" => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }
            }
        };
        Ok(Value::Bool(result))
    }

    fn additive(&mut self) -> anyhow::Result<Value> {
        let mut value = self.multiplicative()?;
        loop {
            if self.eat_symbol("+") {
                value = arithmetic(&value, &self.multiplicative()?, |a, b| a + b, |a, b| a + b)?;
            } else if self.eat_symbol("-") {
                value = arithmetic(&value, &self.multiplicative()?, |a, b| a - b, |a, b| a - b)?;
            } else {
                return Ok(value);
            }
        }
    }

    fn multiplicative(&mut self) -> anyhow::Result<Value> {
        let mut value = self.primary()?;
        while self.eat_symbol("*") {
            value = arithmetic(&value, &self.primary()?, |a, b| a * b, |a, b| a * b)?;
        }
        Ok(value)
    }

    fn primary(&mut self) -> anyhow::Result<Value> {
        if self.eat_symbol("(") {
            let value = self.or_expression()?;
            self.expect_symbol(")")?;
            return Ok(value);
        }
        match self.peek().cloned() {
            Some(Token::Number(value)) => {
                self.position += 1;
                Ok(value)
            }
            Some(Token::Str(s)) => {
                self.position += 1;
                Ok(Value::String(s))
            }
            Some(Token::Ident(name)) => {
                self.position += 1;
                match name.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    "dateTime" => {
                        self.expect_symbol("(")?;
                        let literal = match self.peek().cloned() {
                            Some(Token::Str(s)) => s,
                            _ => bail!("dateTime expects a string literal"),
                        };
                        self.position += 1;
                        self.expect_symbol(")")?;
                        let parsed =
                            NaiveDateTime::parse_from_str(&literal, "%Y-%m-%dT%H:%M:%S")?;
                        Ok(Value::Date(Utc.from_utc_datetime(&parsed)))
                    }
                    _ => self
                        .scope
                        .get(&name)
                        .cloned()
                        .ok_or_else(|| anyhow!("unknown variable '{}'", name)),
                }
            }
            other => bail!("unexpected token {:?}", other),
        }
    }
}

fn symbol_static(symbol: &str) -> &'static str {
    match symbol {
        "==" => "==",
        "!=" => "!=",
        "<=" => "<=",
        ">=" => ">=",
        "&&" => "&&",
        "||" => "||",
        "<" => "<",
        ">" => ">",
        "!" => "!",
        "(" => "(",
        ")" => ")",
        "+" => "+",
        "-" => "-",
        "*" => "*",
        _ => unreachable!("unknown symbol {symbol}"),
    }
}

fn as_bool(value: &Value) -> anyhow::Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| anyhow!("expected a boolean, got {}", value.kind()))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (as_number(left), as_number(right)) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

fn compare(left: &Value, right: &Value) -> anyhow::Result<std::cmp::Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
        _ => match (as_number(left), as_number(right)) {
            (Some(a), Some(b)) => a
                .partial_cmp(&b)
                .ok_or_else(|| anyhow!("unordered comparison")),
            _ => bail!("cannot compare {} with {}", left.kind(), right.kind()),
        },
    }
}

fn arithmetic(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> anyhow::Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
        _ => match (as_number(left), as_number(right)) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => bail!("cannot apply arithmetic to {} and {}", left.kind(), right.kind()),
        },
    }
}
