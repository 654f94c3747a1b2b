// Warrant Check Binary Entry Point
//
// Purpose: Evaluate the nine signal warrants for one intersection
// Usage: warrant_check <inputs.json> [counts.csv]

use signal_warrants::{
    attach_counts, load_counts_csv, load_inputs, EngineConfig, JsonFormatter, WarrantEngine,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging to stderr, report on stdout)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "signal_warrants=info,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let inputs_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => anyhow::bail!("usage: warrant_check <inputs.json> [counts.csv]"),
    };
    let counts_path = args.next().map(PathBuf::from);

    let config = EngineConfig::from_env()?;
    tracing::info!("Configuration:");
    tracing::info!("  WARRANT_EDITION: {}", config.edition);
    tracing::info!("  WARRANT_TIE_BREAK: {:?}", config.tie_break);
    tracing::info!("  WARRANT_PARALLEL: {}", config.parallel);

    let mut inputs = load_inputs(&inputs_path)?;
    if let Some(path) = counts_path {
        let counts = load_counts_csv(&path)?;
        attach_counts(&mut inputs, counts)?;
    }

    let engine = WarrantEngine::new(config)?;
    let report = engine.run(&inputs)?;

    println!("{}", JsonFormatter::format(&report)?);
    tracing::info!("{}", report.summary.headline);

    Ok(())
}
