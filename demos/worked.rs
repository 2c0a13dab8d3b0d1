use std::fs;
use std::path::PathBuf;

use clap::Parser;

use probreach::graph::{Direction, EdgeFilter, ProbGraph};
use probreach::query::{build_diagram, QueryOptions};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Maximum number of edges per path (default: 1 + number of edges).
    #[clap(long, value_name = "INT")]
    max_length: Option<usize>,

    /// Write the diagram of the KNOWS+OWNS query to this DOT file.
    #[clap(long, value_name = "FILE")]
    dot: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    // (A) --[KNOWS 0.5]--> (B) --[OWNS 0.1]--> (C)
    // (A) --[KNOWS 0.4]--> (D) --[KNOWS 0.5]--> (B)
    //                      (D) --[OWNS 0.7]--> (E) --[KNOWS 0.7]--> (C)
    let mut graph = ProbGraph::new();
    let a = graph.add_node("A", ["Person"]);
    let b = graph.add_node("B", ["Person"]);
    let c = graph.add_node("C", ["Dog"]);
    let d = graph.add_node("D", ["Person"]);
    let e = graph.add_node("E", ["Dog"]);
    graph.add_edge("KNOWS", a, b, 0.5)?;
    graph.add_edge("OWNS", b, c, 0.1)?;
    graph.add_edge("KNOWS", a, d, 0.4)?;
    graph.add_edge("KNOWS", d, b, 0.5)?;
    graph.add_edge("OWNS", d, e, 0.7)?;
    graph.add_edge("KNOWS", e, c, 0.7)?;

    let options = QueryOptions {
        max_length: args.max_length,
    };

    let knows = EdgeFilter::new().allow("KNOWS", Direction::Outgoing);
    let diagram = build_diagram(&graph, a, c, &knows, &options)?;
    println!("KNOWS: diagram = {:?}", diagram);
    println!("The probability is {:.3}!", diagram.probability());

    let knows_owns = knows.allow("OWNS", Direction::Outgoing);
    let diagram = build_diagram(&graph, a, c, &knows_owns, &options)?;
    println!("KNOWS+OWNS: diagram = {:?}", diagram);
    println!("{}", diagram.to_bracket_string(diagram.root()));
    for path in diagram.paths() {
        let steps: Vec<String> = path.steps.iter().map(|s| s.to_string()).collect();
        println!("  [{}] {:.4}", steps.join(", "), path.weight);
    }
    println!("The probability is {:.3}!", diagram.probability());

    if let Some(path) = args.dot {
        fs::write(&path, diagram.to_dot()?)?;
        println!("Wrote {}", path.display());
    }

    println!("Done.");
    Ok(())
}
