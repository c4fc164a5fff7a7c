use prefix_plot::{PlotConfig, Plotter, SampleConfig};

fn main() {
    pretty_env_logger::init();

    let expressions = [
        "(sin x)",
        "(* (* (- x 2) (+ x 2)) x)",
        "(/ 1 x)",
        "(SIN x)",
        "(+ 1 2 3",
        "",
    ];

    let mut plotter = Plotter::new(PlotConfig {
        sampling: SampleConfig::default().with_range(-3.0, 3.0),
        ..Default::default()
    });

    for (i, expression) in expressions.iter().enumerate() {
        match plotter.add_function(expression) {
            Ok(graph) => println!(
                "Graph {}: {} ({} finite of {} points)",
                i,
                graph.expression(),
                graph.finite_points().count(),
                graph.points().len()
            ),
            Err(err) => println!("Graph {}: {}", i, err),
        }
    }

    plotter.set_range(0.0, 1.0).unwrap();
    for graph in plotter.graphs() {
        let (x, y) = graph.points()[150];
        println!("{} at {}: {}", graph.expression(), x, y);
    }
}
