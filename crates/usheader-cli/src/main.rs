use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use usheader_core::HeaderSession;
use usheader_core::meta::options::HeaderOptions;
use usheader_core::report::model::{Report, ToolInfo};
use usheader_core::source::read::read_artifact;

mod args;

use args::OutputFormat;

fn main() -> Result<()> {
    let args = args::Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.in_place && args.format != OutputFormat::Script {
        bail!("--in-place requires --format script");
    }

    let mut options = match &args.options {
        Some(path) => HeaderOptions::load(path)?,
        None => HeaderOptions::default(),
    };
    for pair in &args.meta {
        options.set_pair(pair)?;
    }

    let session = HeaderSession::load(&args.manifest, options)?;

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: args.commit.clone(),
    };

    let artifact = read_artifact(&args.artifact)?;
    let resolution = session.resolve(&artifact.code)?;
    tracing::info!(
        artifact = %args.artifact.display(),
        grants = ?resolution.record.grants(),
        "header generated"
    );

    let output = match args.format {
        OutputFormat::Script => format!("{}\n\n{}", resolution.header, artifact.code),
        OutputFormat::Header => format!("{}\n", resolution.header),
        OutputFormat::Json => {
            let report = Report::new(tool, artifact.to_artifact(), resolution);
            format!("{}\n", serde_json::to_string_pretty(&report)?)
        }
    };

    if args.in_place {
        std::fs::write(&args.artifact, &output)
            .with_context(|| format!("failed to write artifact: {}", args.artifact.display()))?;
        return Ok(());
    }

    match args.out {
        Some(path) => std::fs::write(path, &output)?,
        None => print!("{output}"),
    }

    Ok(())
}
