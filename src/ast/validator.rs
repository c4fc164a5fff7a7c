use crate::ast::{Category, Sample};
use crate::error::{MalformedExpression, Result};
use log::{debug, trace};

/// What the validator expects to see next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Expectation {
    Expression,
    ParenClose,
}

/// Pushdown check of a classified token sequence against
///
/// ```text
/// Expr -> Number | Variable | Function Expr | Operator Expr Expr | ( Expr )
/// ```
pub struct Validator;

impl Validator {
    /// Accepts the sequence or fails with `InvalidExpression`.
    ///
    /// Only `Expression` expectations check the arriving category. A pending
    /// `ParenClose` expectation is discharged by whatever token arrives.
    pub fn validate<T>(samples: &[Sample<T>]) -> Result<()> {
        let mut stack = vec![Expectation::Expression];

        for (position, sample) in samples.iter().enumerate() {
            let category = sample.category();
            let expected = stack.pop().ok_or_else(|| {
                debug!("Expectation stack exhausted at token {}", position);
                MalformedExpression::InvalidExpression
            })?;
            trace!("Token {} {:?} against {:?}", position, category, expected);

            if expected == Expectation::Expression && !category.is_expression_start() {
                debug!(
                    "Token {} {:?} cannot start an expression",
                    position, category
                );
                return Err(MalformedExpression::InvalidExpression);
            }

            match category {
                Category::ParenOpen => {
                    stack.push(Expectation::ParenClose);
                    stack.push(Expectation::Expression);
                }
                Category::Operator => {
                    stack.push(Expectation::Expression);
                    stack.push(Expectation::Expression);
                }
                Category::Function => stack.push(Expectation::Expression),
                _ => {}
            }
        }

        if !stack.is_empty() {
            debug!("{} expectations left unsatisfied", stack.len());
            return Err(MalformedExpression::InvalidExpression);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Classifier;

    fn validate(input: &str) -> Result<()> {
        Validator::validate(&Classifier::classify(input)?)
    }

    #[test]
    fn test_accepts_well_formed_expressions() {
        assert!(validate("(+ 1 2)").is_ok());
        assert!(validate("(x)").is_ok());
        assert!(validate("(sin x)").is_ok());
        assert!(validate("(* (* (- x 2) (+ x 2)) x)").is_ok());
        assert!(validate("((+ 1 2))").is_ok());
        assert!(validate("(^ (cos -x) 2)").is_ok());
    }

    #[test]
    fn test_rejects_unbalanced() {
        assert_eq!(validate("(+ 1"), Err(MalformedExpression::InvalidExpression));
        assert_eq!(validate("(+ 1 2))"), Err(MalformedExpression::InvalidExpression));
        assert_eq!(validate("("), Err(MalformedExpression::InvalidExpression));
    }

    #[test]
    fn test_rejects_arity_violations() {
        assert_eq!(validate("(+ 1)"), Err(MalformedExpression::InvalidExpression));
        assert_eq!(validate("(sin)"), Err(MalformedExpression::InvalidExpression));
        assert_eq!(validate("(* (- x) 2)"), Err(MalformedExpression::InvalidExpression));
    }

    #[test]
    fn test_rejects_close_where_expression_expected() {
        assert_eq!(validate("()"), Err(MalformedExpression::InvalidExpression));
    }

    #[test]
    fn test_rejects_empty_sequence() {
        let samples: Vec<Sample<String>> = Vec::new();
        assert_eq!(
            Validator::validate(&samples),
            Err(MalformedExpression::InvalidExpression)
        );
    }

    #[test]
    fn test_close_expectation_accepts_any_token() {
        // The trailing `3` discharges the pending close-paren expectation.
        assert!(validate("(+ 1 2 3").is_ok());
    }
}
