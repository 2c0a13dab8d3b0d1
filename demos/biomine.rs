use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use probreach::dot::DotConfig;
use probreach::named::NamedGraph;

/// A fragment of a biological association network: `(tail, head, cost)`.
const EDGES: &[(&str, &str, u32)] = &[
    ("hgnc_620", "entrezprotein_33339674", 663),
    ("hgnc_9165", "pubmed_15214843", 504),
    ("hgnc_621", "entrezprotein_3342564", 435),
    ("uniprot_o00213", "go_go_0001540", 672),
    ("hgnc_983", "pubmed_2322535", 103),
    ("hgnc_620", "pubmed_9136074", 843),
    ("uniprot_o75882", "pubmed_14760718", 747),
    ("hgnc_2313", "pubmed_14760718", 627),
    ("hgnc_1358", "pubmed_14760718", 749),
    ("hgnc_5394", "entrezprotein_182607", 395),
    ("hgnc_9087", "pubmed_7622043", 347),
    ("hgnc_983", "pubmed_1769657", 103),
    ("hgnc_620", "pubmed_2507928", 103),
    ("hgnc_2313", "entrezprotein_27769064", 297),
];

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Source node.
    #[arg(value_name = "NAME", default_value = "hgnc_620")]
    source: String,

    /// Target node.
    #[arg(value_name = "NAME", default_value = "hgnc_983")]
    target: String,

    /// Write the input graph to this DOT file.
    #[clap(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Enable debug logging.
    #[clap(long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let loading = Instant::now();
    let mut graph = NamedGraph::new();
    for &(tail, head, cost) in EDGES {
        graph.add(tail, head, cost)?;
    }
    let loading = loading.elapsed();

    if let Some(path) = &args.dot {
        fs::write(path, graph.graph().to_dot(&DotConfig::default())?)?;
    }

    let solving = Instant::now();
    let prob = graph.probability(&args.source, &args.target)?;
    let solving = solving.elapsed();

    // run,load,solve,prob
    println!(
        "{},{:.3},{:.3},{:.3}",
        1,
        loading.as_secs_f64(),
        solving.as_secs_f64(),
        prob
    );
    log::info!(
        "{} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    println!("Done.");
    Ok(())
}
