use crate::ast::{Category, Sample, Trigonometric};
use crate::error::{MalformedExpression, Result};
use log::{debug, trace};

/// Splits raw text into tokens and assigns each one a grammar category.
pub struct Classifier;

impl Classifier {
    /// Classifies every token of `input`, in order.
    ///
    /// Whitespace separates tokens and is discarded; `(` and `)` separate
    /// tokens and are kept. Multi-character tokens that are neither numbers,
    /// function names nor `-x` are dropped without producing a sample.
    ///
    /// The surviving samples are weighted `0..n` by position.
    pub fn classify(input: &str) -> Result<Vec<Sample<String>>> {
        debug!("Classifying expression: {}", input);
        let mut samples = Vec::new();
        let mut open_parens = 0usize;

        for token in Self::tokenize(input) {
            if token == "(" {
                open_parens += 1;
            }
            match Self::classify_token(token)? {
                Some(sample) => {
                    trace!("Token {:?} -> {:?}", token, sample.category());
                    samples.push(sample);
                }
                None => debug!("Dropping unknown token {:?}", token),
            }
        }

        if open_parens == 0 {
            return Err(MalformedExpression::MissingParentheses);
        }

        for (position, sample) in samples.iter_mut().enumerate() {
            sample.set_weight(position as i64);
        }
        debug!("Classified {} samples", samples.len());
        Ok(samples)
    }

    /// Splits on whitespace and parentheses, emitting each parenthesis as its
    /// own token.
    pub fn tokenize(input: &str) -> Vec<&str> {
        let mut tokens = Vec::new();
        let mut start = None;

        for (index, c) in input.char_indices() {
            if c.is_whitespace() || c == '(' || c == ')' {
                if let Some(begin) = start.take() {
                    tokens.push(&input[begin..index]);
                }
                if c == '(' || c == ')' {
                    tokens.push(&input[index..index + 1]);
                }
            } else if start.is_none() {
                start = Some(index);
            }
        }
        if let Some(begin) = start {
            tokens.push(&input[begin..]);
        }

        tokens
    }

    fn classify_token(token: &str) -> Result<Option<Sample<String>>> {
        let is_number = Self::is_numeric_literal(token);
        let mut chars = token.chars();

        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !is_number {
                let category = match c {
                    'x' => Category::Variable,
                    '+' | '-' | '*' | '/' | '^' => Category::Operator,
                    '(' => Category::ParenOpen,
                    ')' => Category::ParenClose,
                    other => return Err(MalformedExpression::UnrecognizedSymbol(other)),
                };
                return Ok(Some(Sample::new(token.to_string(), category)));
            }
        }

        if is_number {
            return Ok(Some(Sample::new(token.to_string(), Category::Number)));
        }

        let lowered = token.to_lowercase();
        if Trigonometric::from_name(&lowered).is_some() {
            Ok(Some(Sample::new(lowered, Category::Function)))
        } else if lowered == "-x" {
            Ok(Some(Sample::new(lowered, Category::Variable)))
        } else {
            Ok(None)
        }
    }

    /// Decimal literals only: an optional sign, then a digit or `.`. Spelled
    /// out non-finite values such as `inf` or `NaN` are not numbers.
    fn is_numeric_literal(token: &str) -> bool {
        let unsigned = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
        unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            && token.parse::<f64>().is_ok()
    }
}
