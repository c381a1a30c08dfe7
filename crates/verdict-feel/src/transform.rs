//! The unary test transform chain
//!
//! Grammar levels, first match wins:
//!
//! - simple unary tests: `-` wildcard, `not(...)`, positive unary tests
//! - simple positive unary tests: top-level comma list, single test
//! - simple positive unary test: custom function transformers, interval,
//!   comparison, bare value as equality
//! - endpoint: `date and time(...)` literal, verbatim passthrough
//!
//! Predicates are cheap prefix checks since the chain runs once per rule
//! cell per evaluation.

use crate::error::{FeelError, Result};

/// A caller-registered transformer for function-style unary tests.
///
/// Checked before the built-in interval, comparison and equality transforms;
/// the first transformer whose predicate matches wins.
pub trait FunctionTransformer: Send + Sync {
    /// Cheap predicate deciding whether this transformer handles the test.
    fn matches(&self, expression: &str) -> bool;

    /// Rewrite the test into a target boolean expression against `input_name`.
    fn transform(&self, expression: &str, input_name: &str) -> Result<String>;
}

/// Rewrites a unary test expression into a target boolean expression against
/// a named input variable.
///
/// Custom function transformers are owned by this object: register them at
/// configuration time, never mutate while evaluations are in flight.
#[derive(Default)]
pub struct UnaryTestTransform {
    function_transformers: Vec<Box<dyn FunctionTransformer>>,
}

impl UnaryTestTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom function transformer. Transformers are consulted in
    /// registration order.
    pub fn register_function_transformer(&mut self, transformer: Box<dyn FunctionTransformer>) {
        self.function_transformers.push(transformer);
    }

    /// Rewrite a simple unary tests expression against `input_name`.
    pub fn transform_unary_tests(&self, expression: &str, input_name: &str) -> Result<String> {
        let expression = expression.trim();
        let transformed = if expression == "-" {
            "true".to_string()
        } else if let Some(inner) = expression.strip_prefix("not(") {
            let inner = inner
                .strip_suffix(')')
                .ok_or_else(|| FeelError::UnterminatedNot(expression.to_string()))?;
            format!("!({})", self.transform_positive_unary_tests(inner, input_name)?)
        } else {
            self.transform_positive_unary_tests(expression, input_name)?
        };
        log::trace!("transformed unary tests '{}' into '{}'", expression, transformed);
        Ok(transformed)
    }

    /// Rewrite a comma-separated list of positive unary tests. Commas inside
    /// quoted literals are not separators.
    fn transform_positive_unary_tests(&self, expression: &str, input_name: &str) -> Result<String> {
        let elements = split_top_level(expression);
        if elements.len() == 1 {
            return self.transform_positive_unary_test(elements[0], input_name);
        }

        let mut transformed = Vec::with_capacity(elements.len());
        for element in elements {
            if element.trim().is_empty() {
                return Err(FeelError::EmptyListElement(expression.to_string()));
            }
            transformed.push(format!(
                "({})",
                self.transform_positive_unary_test(element, input_name)?
            ));
        }
        Ok(transformed.join(" || "))
    }

    /// Rewrite one positive unary test.
    fn transform_positive_unary_test(&self, expression: &str, input_name: &str) -> Result<String> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(FeelError::MalformedTest(expression.to_string()));
        }

        for transformer in &self.function_transformers {
            if transformer.matches(expression) {
                return transformer.transform(expression, input_name);
            }
        }

        if expression.starts_with(['[', '(', ']']) {
            return transform_interval(expression, input_name);
        }
        if expression.starts_with(['<', '>']) {
            return transform_comparison(expression, input_name);
        }

        Ok(format!("{} == {}", input_name, transform_endpoint(expression)))
    }
}

/// Rewrite an interval test: bracket, lower bound, `..`, upper bound,
/// bracket. `[` is an inclusive lower bound, `]` an inclusive upper bound;
/// parentheses and reversed brackets are exclusive on either side.
fn transform_interval(expression: &str, input_name: &str) -> Result<String> {
    let malformed = || FeelError::MalformedInterval(expression.to_string());

    let mut chars = expression.chars();
    let open = chars.next().ok_or_else(malformed)?;
    let close = chars.next_back().ok_or_else(malformed)?;
    if !matches!(close, ']' | ')' | '[') {
        return Err(malformed());
    }

    let body = &expression[1..expression.len() - 1];
    let separator = body.find("..").ok_or_else(malformed)?;
    let lower = body[..separator].trim();
    let upper = body[separator + 2..].trim();
    if lower.is_empty() || upper.is_empty() {
        return Err(malformed());
    }

    let lower_op = if open == '[' { ">=" } else { ">" };
    let upper_op = if close == ']' { "<=" } else { "<" };

    Ok(format!(
        "{input} {lower_op} {lower} && {input} {upper_op} {upper}",
        input = input_name,
        lower_op = lower_op,
        lower = transform_endpoint(lower),
        upper_op = upper_op,
        upper = transform_endpoint(upper),
    ))
}

/// Rewrite a comparison test: `<`, `<=`, `>` or `>=` followed by an endpoint.
fn transform_comparison(expression: &str, input_name: &str) -> Result<String> {
    let (operator, rest) = if let Some(rest) = expression.strip_prefix("<=") {
        ("<=", rest)
    } else if let Some(rest) = expression.strip_prefix(">=") {
        (">=", rest)
    } else if let Some(rest) = expression.strip_prefix('<') {
        ("<", rest)
    } else if let Some(rest) = expression.strip_prefix('>') {
        (">", rest)
    } else {
        return Err(FeelError::MalformedComparison(expression.to_string()));
    };

    let endpoint = rest.trim();
    if endpoint.is_empty() {
        return Err(FeelError::MalformedComparison(expression.to_string()));
    }
    Ok(format!("{} {} {}", input_name, operator, transform_endpoint(endpoint)))
}

/// Rewrite an endpoint: the `date and time(...)` literal becomes the target
/// date constructor, everything else passes through trimmed.
fn transform_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if let Some(inner) = endpoint
        .strip_prefix("date and time(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return format!("dateTime({})", inner);
    }
    endpoint.to_string()
}

/// Split on top-level commas only: a single left-to-right scan toggling an
/// in-quotes flag, so commas inside quoted literals do not separate.
fn split_top_level(expression: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, c) in expression.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                elements.push(&expression[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    elements.push(&expression[start..]);
    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(expression: &str) -> Result<String> {
        UnaryTestTransform::new().transform_unary_tests(expression, "x")
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(transform("-").unwrap(), "true");
        assert_eq!(transform(" - ").unwrap(), "true");
    }

    #[test]
    fn test_equality() {
        assert_eq!(transform("13.37").unwrap(), "x == 13.37");
        assert_eq!(transform("\"Hello World\"").unwrap(), "x == \"Hello World\"");
        assert_eq!(transform("y").unwrap(), "x == y");
        assert_eq!(transform(" 12 ").unwrap(), "x == 12");
    }

    #[test]
    fn test_comparison() {
        assert_eq!(transform("<13").unwrap(), "x < 13");
        assert_eq!(transform("<=y").unwrap(), "x <= y");
        assert_eq!(transform(">= .37").unwrap(), "x >= .37");
        assert_eq!(transform("\t>=12 ").unwrap(), "x >= 12");
    }

    #[test]
    fn test_comparison_without_endpoint_fails() {
        let error = transform("<").unwrap_err();
        assert_eq!(error.code(), "FEEL-01002");
        let error = transform(">= ").unwrap_err();
        assert_eq!(error.code(), "FEEL-01002");
    }

    #[test]
    fn test_interval_brackets() {
        assert_eq!(transform("[1..10)").unwrap(), "x >= 1 && x < 10");
        assert_eq!(transform("[a..b]").unwrap(), "x >= a && x <= b");
        assert_eq!(transform("(a..b]").unwrap(), "x > a && x <= b");
        assert_eq!(transform("]a..b[").unwrap(), "x > a && x < b");
        assert_eq!(transform("[.12...37]").unwrap(), "x >= .12 && x <= .37");
    }

    #[test]
    fn test_malformed_interval_fails() {
        for expression in ["[1..10", "[1.10]", "[..10]", "[1..]"] {
            let error = transform(expression).unwrap_err();
            assert_eq!(error.code(), "FEEL-01003", "expression {}", expression);
        }
    }

    #[test]
    fn test_not() {
        assert_eq!(transform("not(13)").unwrap(), "!(x == 13)");
        assert_eq!(transform("not(<y)").unwrap(), "!(x < y)");
        assert_eq!(
            transform("not(1,2,3)").unwrap(),
            "!((x == 1) || (x == 2) || (x == 3))"
        );
    }

    #[test]
    fn test_unterminated_not_fails() {
        let error = transform("not(13").unwrap_err();
        assert_eq!(error.code(), "FEEL-01004");
    }

    #[test]
    fn test_list() {
        assert_eq!(
            transform("y,12,13.37").unwrap(),
            "(x == y) || (x == 12) || (x == 13.37)"
        );
        assert_eq!(
            transform("<y,>13.37,>=.37").unwrap(),
            "(x < y) || (x > 13.37) || (x >= .37)"
        );
        assert_eq!(
            transform("[1..2],[4..5]").unwrap(),
            "(x >= 1 && x <= 2) || (x >= 4 && x <= 5)"
        );
    }

    #[test]
    fn test_list_comma_inside_quotes_is_not_a_separator() {
        assert_eq!(
            transform("\"a,b\", \"c\"").unwrap(),
            "(x == \"a,b\") || (x == \"c\")"
        );
    }

    #[test]
    fn test_empty_list_element_fails() {
        let error = transform("1,,3").unwrap_err();
        assert_eq!(error.code(), "FEEL-01005");
        let error = transform("1,2,").unwrap_err();
        assert_eq!(error.code(), "FEEL-01005");
    }

    #[test]
    fn test_empty_expression_fails() {
        let error = transform("").unwrap_err();
        assert_eq!(error.code(), "FEEL-01001");
    }

    #[test]
    fn test_date_and_time_endpoint() {
        assert_eq!(
            transform("date and time(\"2015-12-12T22:12:53\")").unwrap(),
            "x == dateTime(\"2015-12-12T22:12:53\")"
        );
        assert_eq!(
            transform("[date and time(\"2015-12-12T00:00:00\")..date and time(\"2016-06-06T00:00:00\"))").unwrap(),
            "x >= dateTime(\"2015-12-12T00:00:00\") && x < dateTime(\"2016-06-06T00:00:00\")"
        );
    }

    #[test]
    fn test_nested_not_with_list_and_interval() {
        assert_eq!(
            transform("not(>=a,13.37,].37...42),<.37)").unwrap(),
            "!((x >= a) || (x == 13.37) || (x > .37 && x < .42) || (x < .37))"
        );
    }

    #[test]
    fn test_custom_function_transformer_wins() {
        struct StartsWith;
        impl FunctionTransformer for StartsWith {
            fn matches(&self, expression: &str) -> bool {
                expression.starts_with("starts with(")
            }
            fn transform(&self, expression: &str, input_name: &str) -> Result<String> {
                let inner = expression
                    .strip_prefix("starts with(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| FeelError::MalformedTest(expression.to_string()))?;
                Ok(format!("startsWith({}, {})", input_name, inner))
            }
        }

        let mut chain = UnaryTestTransform::new();
        chain.register_function_transformer(Box::new(StartsWith));
        assert_eq!(
            chain.transform_unary_tests("starts with(\"He\")", "x").unwrap(),
            "startsWith(x, \"He\")"
        );
        // the rest of the chain still applies to other tests
        assert_eq!(chain.transform_unary_tests("<13", "x").unwrap(), "x < 13");
    }
}
