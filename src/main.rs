use clap::Parser;
use frontline::post::PostConfig;
use frontline::{run_cycle, AnalysisConfig, Revision, StateStore};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "frontline", about = "Measure land control on a layered SVG conflict map")]
struct Cli {
    /// Map to analyze (SVG)
    #[arg(short, long)]
    svg: PathBuf,

    /// JSON state file holding the last timestamp and percentage
    #[arg(long)]
    state: PathBuf,

    /// Upload time of this map revision, epoch seconds
    #[arg(short, long)]
    timestamp: i64,

    /// Analysis config (JSON); defaults match the current source map
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Revision description, posted as replies
    #[arg(short, long)]
    description: Option<String>,

    /// Print the status without updating the state file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config: AnalysisConfig = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => AnalysisConfig::default(),
    };
    let post_config = PostConfig::default();

    let svg = std::fs::read_to_string(&cli.svg)?;
    let revision = Revision {
        svg: &svg,
        timestamp: cli.timestamp,
        description: cli.description.as_deref(),
    };
    let store = StateStore::new(&cli.state);

    let Some(publication) = run_cycle(&store, &revision, &config, &post_config, !cli.dry_run)? else {
        return Ok(());
    };

    println!("{}", publication.media_filename);
    println!();
    println!("{}", publication.status);
    for reply in &publication.replies {
        println!();
        println!("{reply}");
    }

    if cli.dry_run {
        info!("dry run, state left untouched");
    }
    Ok(())
}
