use log::debug;
use prefix_plot::ast::{Classifier, Compiler, Evaluator, Validator};

fn main() {
    pretty_env_logger::init();

    let expr = "(* (* (- x 2) (+ x 2)) x)";

    let samples = Classifier::classify(expr).unwrap();
    debug!("samples: {samples:?}");
    Validator::validate(&samples).unwrap();

    let tree = Compiler::compile(samples).unwrap();
    println!("tree: {tree} (depth {})", tree.depth());

    let evaluator = Evaluator::new(&tree);
    for x in [-3.0, -2.0, 0.0, 2.0, 3.0] {
        println!("f({x}) = {}", evaluator.evaluate(x));
    }

    match Compiler::compile_expression("(+ 1") {
        Ok(tree) => println!("unexpected tree: {tree}"),
        Err(err) => println!("Error: {err}"),
    }
}
