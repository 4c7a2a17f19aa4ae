use fdgraph::graph::generators::DEFAULT_SIZE;
use fdgraph::{bench_repulsion, bench_step_curve};
use fdgraph::{compute_framing_position, GeneratorKind, Graph, GraphFile, LayoutConfig, NVec3, Simulator};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::path::PathBuf;
use std::str::FromStr;

/// Camera start used for `--focus` when no renderer supplies one
const CAMERA_START: [f64; 3] = [0.0, 0.0, 1500.0];

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Graph file: { "nodes": [{ "id", "data" }], "links": [{ "source", "target" }] }
    #[arg(conflicts_with = "generate")]
    graph: Option<PathBuf>,

    /// Build a synthetic graph instead: grid, grid3, path, ladder, complete,
    /// complete-bipartite, balanced-bin-tree, no-links
    #[arg(long)]
    generate: Option<GeneratorKind>,

    /// First generator size
    #[arg(short, default_value_t = DEFAULT_SIZE)]
    n: usize,

    /// Second generator size
    #[arg(short, default_value_t = DEFAULT_SIZE)]
    m: usize,

    /// Third generator size
    #[arg(short, default_value_t = DEFAULT_SIZE)]
    k: usize,

    /// Layout configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of simulation steps
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// Log metrics every N steps
    #[arg(long, default_value_t = 100)]
    log_every: u64,

    /// Print where the camera should fly to frame this node
    #[arg(long)]
    focus: Option<String>,

    /// Run the repulsion benchmarks instead of a layout
    #[arg(long)]
    bench: bool,
}

/// One line of output; ids keep their JSON type
#[derive(Serialize)]
struct PositionRecord<'a, I> {
    id: &'a I,
    position: [f64; 3],
}

// load here to keep main clean
fn load_config(args: &Args) -> Result<LayoutConfig> {
    match &args.config {
        Some(path) => LayoutConfig::load(path).with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(LayoutConfig::default()),
    }
}

fn run_layout<I, D>(graph: &Graph<I, D>, config: &LayoutConfig, args: &Args) -> Result<()>
where
    I: Eq + Hash + Clone + Debug + Display + FromStr + Serialize,
{
    info!(nodes = graph.node_count(), links = graph.link_count(), "graph ready");

    let mut simulator = Simulator::with_repulsion(graph, config.simulation.params, config.simulation.barnes_hut)?;
    let log_every = args.log_every.max(1);
    for _ in 0..args.steps {
        let metrics = simulator.step();
        if metrics.step % log_every == 0 {
            info!(
                step = metrics.step,
                kinetic_energy = metrics.kinetic_energy,
                max_displacement = metrics.max_displacement,
                "layout progress"
            );
        }
    }

    let snapshot = simulator.snapshot();

    if let Some(focus) = &args.focus {
        let key: I = focus.parse().map_err(|_| anyhow!("invalid node id {focus:?}"))?;
        let index = graph.index_of(&key)?;
        let target = snapshot.position(index.0).context("focused node has no position")?;
        let camera = NVec3::from(CAMERA_START);
        let destination = compute_framing_position(camera, target, config.camera.framing_radius, config.camera.fov_degrees)?;
        info!(node = %key, x = destination.x, y = destination.y, z = destination.z, "camera destination");
    }

    let records: Vec<PositionRecord<'_, I>> = graph
        .nodes()
        .map(|node| {
            let p = snapshot.positions[node.index.0];
            PositionRecord {
                id: &node.id,
                position: [p.x, p.y, p.z],
            }
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.bench {
        bench_repulsion();
        bench_step_curve()?;
        return Ok(());
    }

    let config = load_config(&args)?;

    match (&args.graph, args.generate) {
        (Some(path), _) => {
            let graph = GraphFile::load(path)
                .with_context(|| format!("failed to read graph {}", path.display()))?
                .into_graph()
                .context("graph file references are inconsistent")?;
            run_layout(&graph, &config, &args)
        }
        (None, Some(kind)) => {
            let graph = kind
                .build(args.n, args.m, args.k)
                .with_context(|| format!("failed to generate {kind} graph"))?;
            run_layout(&graph, &config, &args)
        }
        (None, None) => bail!("a graph file or --generate is required unless --bench is given"),
    }
}
