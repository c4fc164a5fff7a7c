use crate::ast::{
    Algebraic, Category, Classifier, DerivationTree, NodeId, Operation, Sample, Trigonometric,
    Validator, VARIABLE_WEIGHT,
};
use crate::error::{MalformedExpression, Result};
use log::{debug, trace};

/// Where the next operable token will be attached.
#[derive(Debug, Copy, Clone)]
enum Anchor {
    /// Still under the opening parenthesis; the tree has no operable root yet.
    Pending,
    Node(NodeId),
}

/// Runs the classifier, the validator and the tree builder in sequence.
pub struct Compiler;

impl Compiler {
    /// Compiles prefix text into a derivation tree.
    pub fn compile_expression(expression: &str) -> Result<DerivationTree> {
        let samples = Classifier::classify(expression)?;
        Self::compile(samples)
    }

    /// Validates classified samples and builds their tree.
    pub fn compile(samples: Vec<Sample<String>>) -> Result<DerivationTree> {
        Validator::validate(&samples)?;
        debug!("Validated {} samples", samples.len());

        let operations = samples
            .into_iter()
            .map(Self::to_operation)
            .collect::<Result<Vec<_>>>()?;
        Self::build_tree(operations)
    }

    /// Replaces a textual payload with its operation. The category is kept and
    /// every free-variable sample is reweighted to [`VARIABLE_WEIGHT`].
    pub fn to_operation(sample: Sample<String>) -> Result<Sample<Operation>> {
        let category = sample.category();
        let weight = match category {
            Category::Variable => VARIABLE_WEIGHT,
            _ => sample.weight(),
        };
        let text = sample.payload();

        let operation = match category {
            Category::Number => text
                .parse::<f64>()
                .map(Operation::Constant)
                .map_err(|_| MalformedExpression::InvalidExpression)?,
            Category::Operator => text
                .chars()
                .next()
                .and_then(|c| Algebraic::try_from(c).ok())
                .map(Operation::Algebraic)
                .ok_or(MalformedExpression::InvalidExpression)?,
            Category::Function => Trigonometric::from_name(text)
                .map(Operation::Trigonometric)
                .ok_or(MalformedExpression::InvalidExpression)?,
            Category::Variable => Operation::Variable {
                negated: text == "-x",
            },
            Category::ParenOpen => Operation::ParenOpenMarker,
            Category::ParenClose => Operation::ParenCloseMarker,
            Category::Unknown => return Err(MalformedExpression::InvalidExpression),
        };

        Ok(Sample::with_weight(operation, category, weight))
    }

    /// Walks the samples left to right, attaching each one below the current
    /// anchor.
    ///
    /// Terminals attach without moving the anchor, operators and functions
    /// attach and become the anchor. A `)` moves the anchor up to its parent
    /// (never past the root) only when its `(` opened an anchored subtree;
    /// closing a parenthesized leaf such as `(x)` leaves the anchor in place.
    /// Arity overflow, an unsaturated node, or a token with nowhere to attach
    /// are reported as `InvalidExpression`.
    pub fn build_tree(operations: Vec<Sample<Operation>>) -> Result<DerivationTree> {
        let mut samples = operations.into_iter();
        let first = samples
            .next()
            .ok_or(MalformedExpression::InvalidExpression)?;

        // One entry per unclosed `(`: whether a node became the anchor inside it.
        let mut opened: Vec<bool> = Vec::new();
        let (mut tree, mut anchor) = if first.category() == Category::ParenOpen {
            opened.push(false);
            (None, Anchor::Pending)
        } else {
            let tree = DerivationTree::with_root(first);
            let root = tree.root();
            (Some(tree), Anchor::Node(root))
        };

        for sample in samples {
            let category = sample.category();
            trace!("Placing {} ({:?}) at {:?}", sample, category, anchor);

            match category {
                Category::ParenOpen => {
                    opened.push(false);
                    continue;
                }
                Category::ParenClose => {
                    if opened.pop() == Some(true) {
                        if let (Anchor::Node(current), Some(tree)) = (anchor, tree.as_ref()) {
                            if let Some(parent) = tree.parent(current) {
                                anchor = Anchor::Node(parent);
                            }
                        }
                    }
                    continue;
                }
                _ => {}
            }

            match anchor {
                Anchor::Pending if tree.is_some() => {
                    // A bare number already took the root.
                    if category.is_operable() || category.is_terminal() {
                        debug!("No anchor left for {}", sample);
                        return Err(MalformedExpression::InvalidExpression);
                    }
                }
                Anchor::Pending => {
                    if category.is_operable() || category == Category::Number {
                        let rooted = DerivationTree::with_root(sample);
                        if category.is_operable() {
                            anchor = Anchor::Node(rooted.root());
                            mark_anchored(&mut opened);
                        }
                        tree = Some(rooted);
                    }
                }
                Anchor::Node(current) => {
                    let tree = tree
                        .as_mut()
                        .ok_or(MalformedExpression::InvalidExpression)?;
                    if category.is_terminal() {
                        Self::attach(tree, current, sample)?;
                    } else if category.is_operable() {
                        anchor = Anchor::Node(Self::attach(tree, current, sample)?);
                        mark_anchored(&mut opened);
                    }
                }
            }
        }

        let tree = tree.ok_or(MalformedExpression::InvalidExpression)?;
        if !tree.is_saturated() {
            debug!("Tree {} leaves an operand slot empty", tree);
            return Err(MalformedExpression::InvalidExpression);
        }
        debug!("Built derivation tree {} with {} nodes", tree, tree.len());
        Ok(tree)
    }

    fn attach(
        tree: &mut DerivationTree,
        parent: NodeId,
        sample: Sample<Operation>,
    ) -> Result<NodeId> {
        let label = sample.to_string();
        tree.attach(parent, sample).ok_or_else(|| {
            debug!(
                "{} cannot take {} as another operand",
                tree.node(parent).operation(),
                label
            );
            MalformedExpression::InvalidExpression
        })
    }
}

fn mark_anchored(opened: &mut [bool]) {
    if let Some(innermost) = opened.last_mut() {
        *innermost = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::testing::random_expression;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn render(expression: &str) -> String {
        Compiler::compile_expression(expression).unwrap().to_string()
    }

    #[test]
    fn test_compile_simple_expression() {
        assert_eq!(render("(+ 1 2)"), "(+ 1 2)");
        assert_eq!(render("( +   1 2 )"), "(+ 1 2)");
    }

    #[test]
    fn test_compile_nested_expression() {
        let expression = "(* (* (- x 2) (+ x 2)) x)";
        let tree = Compiler::compile_expression(expression).unwrap();
        assert_eq!(tree.to_string(), expression);
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.depth(), 4);
    }

    #[test]
    fn test_compile_functions() {
        assert_eq!(render("(sin x)"), "(sin x)");
        assert_eq!(render("(SIN (+ x 1))"), "(sin (+ x 1))");
        assert_eq!(render("(/ (ctg -x) (sec 2.5))"), "(/ (ctg -x) (sec 2.5))");
    }

    #[test]
    fn test_compile_single_leaf() {
        assert_eq!(render("(x)"), "x");
        assert_eq!(render("(-x)"), "-x");
        assert_eq!(render("(5)"), "5");
        assert_eq!(render("((+ 1 2))"), "(+ 1 2)");
    }

    #[test]
    fn test_compile_unwrapped_root() {
        assert_eq!(render("+ 1 (2)"), "(+ 1 2)");
    }

    #[test]
    fn test_parenthesized_leaf_under_root() {
        assert_eq!(render("(+ (x) 2)"), "(+ x 2)");
    }

    #[test]
    fn test_parenthesized_leaf_keeps_anchor() {
        assert_eq!(render("(+ (* (x) 2) 3)"), "(+ (* x 2) 3)");
        assert_eq!(render("(* (- (sin (x)) 2) 3)"), "(* (- (sin x) 2) 3)");
        assert_eq!(render("(* (+ (1) x) 2)"), "(* (+ 1 x) 2)");
        assert_eq!(render("(/ ((-x)) ((cos ((2)))))"), "(/ -x (cos 2))");
    }

    #[test]
    fn test_redundant_parentheses_around_subtrees() {
        assert_eq!(render("(+ ((* x 2)) 3)"), "(+ (* x 2) 3)");
        assert_eq!(render("(((sin x)))"), "(sin x)");
        assert_eq!(render("(sin ((+ 1 2)))"), "(sin (+ 1 2))");
    }

    #[test]
    fn test_operation_payloads_and_weights() {
        let samples = Classifier::classify("(- x 2)").unwrap();
        let operations: Vec<_> = samples
            .into_iter()
            .map(|s| Compiler::to_operation(s).unwrap())
            .collect();

        assert_eq!(*operations[0].payload(), Operation::ParenOpenMarker);
        assert_eq!(
            *operations[1].payload(),
            Operation::Algebraic(Algebraic::Subtract)
        );
        assert_eq!(
            *operations[2].payload(),
            Operation::Variable { negated: false }
        );
        assert_eq!(*operations[3].payload(), Operation::Constant(2.0));
        assert_eq!(*operations[4].payload(), Operation::ParenCloseMarker);

        let weights: Vec<i64> = operations.iter().map(|s| s.weight()).collect();
        assert_eq!(weights, vec![0, 1, VARIABLE_WEIGHT, 3, 4]);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let sample = Sample::new("?".to_string(), Category::Unknown);
        assert_eq!(
            Compiler::to_operation(sample).unwrap_err(),
            MalformedExpression::InvalidExpression
        );
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(
            Compiler::compile_expression("(+ 1").unwrap_err(),
            MalformedExpression::InvalidExpression
        );
        assert_eq!(
            Compiler::compile_expression("(# 1 2)").unwrap_err(),
            MalformedExpression::UnrecognizedSymbol('#')
        );
        assert_eq!(
            Compiler::compile_expression("+ 1 2").unwrap_err(),
            MalformedExpression::MissingParentheses
        );
        // `inf` is not a literal, so `+` is left with a single operand.
        assert_eq!(
            Compiler::compile_expression("(+ inf 1)").unwrap_err(),
            MalformedExpression::InvalidExpression
        );
    }

    #[test]
    fn test_arity_overflow_after_lenient_validation() {
        // Accepted by the validator, but `+` cannot take a third operand.
        assert_eq!(
            Compiler::compile_expression("(+ 1 2 3").unwrap_err(),
            MalformedExpression::InvalidExpression
        );
        // Function operands must be parenthesized to close the function.
        assert_eq!(
            Compiler::compile_expression("(+ sin x 1)").unwrap_err(),
            MalformedExpression::InvalidExpression
        );
        assert_eq!(
            Compiler::compile_expression("(x 1").unwrap_err(),
            MalformedExpression::InvalidExpression
        );
        assert_eq!(
            Compiler::compile_expression("(5 x").unwrap_err(),
            MalformedExpression::InvalidExpression
        );
    }

    #[test]
    fn test_build_tree_rejects_empty_input() {
        assert_eq!(
            Compiler::build_tree(Vec::new()).unwrap_err(),
            MalformedExpression::InvalidExpression
        );
    }

    #[test]
    fn test_random_expressions_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..500 {
            let expression = random_expression(&mut rng, 5);
            let tree = Compiler::compile_expression(&expression)
                .unwrap_or_else(|e| panic!("{expression}: {e}"));
            let again = Compiler::compile_expression(&format!("({})", tree)).unwrap();
            assert_eq!(tree.to_string(), again.to_string(), "{expression}");
        }
    }

    #[test]
    fn test_pre_order_recovers_token_positions() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let expression = random_expression(&mut rng, 5);
            let samples = Classifier::classify(&expression).unwrap();
            let expected: Vec<i64> = samples
                .iter()
                .filter(|s| matches!(s.category(), Category::Number | Category::Operator | Category::Function))
                .map(|s| s.weight())
                .collect();

            let tree = Compiler::compile(samples).unwrap();
            let weights: Vec<i64> = tree
                .pre_order()
                .iter()
                .map(|s| s.weight())
                .filter(|w| *w != VARIABLE_WEIGHT)
                .collect();
            assert_eq!(weights, expected, "{expression}");
        }
    }
}
