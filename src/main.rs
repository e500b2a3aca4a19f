//! authorlink CLI: author/record disambiguation over RDF graphs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use authorlink::algorithm::algorithm_by_name;
use authorlink::record::{load_into, read_graph, read_records};
use authorlink::score::{MatchEngine, ScoreConfig, ScoreContext};
use authorlink::store::GraphStore;
use authorlink::store::durable::DurableStore;
use authorlink::store::mem::MemoryGraph;
use authorlink::transfer::transfer;
use authorlink::vocab::Vocabulary;

#[derive(Parser)]
#[command(name = "authorlink", version, about = "Author disambiguation for RDF knowledge graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match records against the reference graph and rewrite authorship links.
    Score {
        /// JSON record file to load into the working graph.
        #[arg(long)]
        records: PathBuf,

        /// JSON triple file holding the reference graph.
        #[arg(long, conflicts_with = "data_dir")]
        reference: Option<PathBuf>,

        /// Persistent store holding the reference graph; matches are written
        /// back into it after the run.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Attribute to exact-match (repeatable, ordered).
        #[arg(long = "attribute", default_values = ["workEmail"])]
        attributes: Vec<String>,

        /// Similarity algorithm to thread through the run.
        #[arg(long, default_value = "soundex")]
        algorithm: String,

        /// Do not clear a non-empty working graph before loading records.
        #[arg(long)]
        allow_non_empty_working: bool,

        /// Keep the working graph after the run completes.
        #[arg(long)]
        retain_working: bool,

        /// Write the destination graph to a JSON triple file.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Copy all triples from one persistent store into another.
    Transfer {
        /// Source store directory.
        #[arg(long)]
        from: PathBuf,

        /// Destination store directory.
        #[arg(long)]
        to: PathBuf,

        /// Remove the triples from the source after copying.
        #[arg(long)]
        remove_source: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            records,
            reference,
            data_dir,
            attributes,
            algorithm,
            allow_non_empty_working,
            retain_working,
            output,
        } => {
            let config = ScoreConfig {
                attributes,
                clear_working_before: !allow_non_empty_working,
                retain_working_after: retain_working,
            };
            let vocab = Vocabulary::default();
            let algorithm = algorithm_by_name(&algorithm)?;

            // The reference graph doubles as the destination (the common
            // case): matches are committed straight into it.
            let durable = match &data_dir {
                Some(dir) => Some(DurableStore::open(dir)?),
                None => None,
            };
            let reference_graph = match (&durable, &reference) {
                (Some(store), _) => store.load()?,
                (None, Some(path)) => MemoryGraph::from_triples(&read_graph(path)?)?,
                (None, None) => {
                    miette::bail!("supply a reference graph via --reference or --data-dir");
                }
            };

            let working = MemoryGraph::new();
            let record_set = read_records(&records)?;
            let loaded = load_into(&working, &record_set, !config.clear_working_before)?;
            tracing::info!(records = record_set.len(), triples = loaded, "working graph loaded");

            let ctx = ScoreContext {
                reference: &reference_graph,
                working: &working,
                destination: &reference_graph,
                vocab: &vocab,
                algorithm: algorithm.as_ref(),
            };
            let engine = MatchEngine::new(ctx, &config)?;
            let report = engine.run();

            for pass in &report.passes {
                match &pass.aborted {
                    Some(reason) => println!(
                        "pass {}: ABORTED ({reason}); {} records seen",
                        pass.attribute, pass.records
                    ),
                    None => println!(
                        "pass {}: {} records, {} linked, {} skipped",
                        pass.attribute, pass.records, pass.linked, pass.skipped
                    ),
                }
            }
            println!(
                "run {}: {} anchors written",
                if report.succeeded() { "succeeded" } else { "finished with failures" },
                report.linked()
            );

            if !config.retain_working_after {
                working.clear()?;
            }

            if let Some(store) = &durable {
                let synced = store.replace_with(&reference_graph)?;
                tracing::info!(triples = synced, "destination graph persisted");
            }
            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&reference_graph.all_triples())
                    .into_diagnostic()?;
                std::fs::write(&path, json).into_diagnostic()?;
                println!("destination graph written to {}", path.display());
            }

            if !report.succeeded() {
                miette::bail!("one or more passes aborted");
            }
        }

        Commands::Transfer {
            from,
            to,
            remove_source,
        } => {
            let src_store = DurableStore::open(&from)?;
            let dst_store = DurableStore::open(&to)?;

            let src = src_store.load()?;
            let dst = dst_store.load()?;
            let count = transfer(&src, &dst, remove_source)?;

            dst_store.replace_with(&dst)?;
            if remove_source {
                src_store.replace_with(&src)?;
            }
            println!("transferred {count} triples from {} to {}", from.display(), to.display());
        }
    }

    Ok(())
}
