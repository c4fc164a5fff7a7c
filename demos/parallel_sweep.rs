use prefix_plot::ast::{Compiler, Evaluator};

fn main() {
    pretty_env_logger::init();

    let tree = Compiler::compile_expression("(- (sin x) (/ x 2))").expect("Failed to compile");

    for id in tree.children(tree.root()) {
        println!("child of root: {}", tree.node(id).operation());
    }

    let evaluator = Evaluator::new(&tree);
    let points = evaluator.par_sample(-10.0, 10.0, 20_000);
    let crossings = points
        .windows(2)
        .filter(|w| w[0].1.signum() != w[1].1.signum())
        .count();

    println!("{} points, {} sign changes", points.len(), crossings);
}
