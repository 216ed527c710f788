use anyhow::{Context, Result};
use clap::{App, Arg};
use gemcap::build::build_capsule;
use gemcap::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("gemcap")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("project")
                .value_name("PROJECT_DIR")
                .help("The project directory (searched upward for capsule.yaml)")
                .default_value(".")
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("Overrides the configured output directory")
                .takes_value(true),
        )
        .get_matches();

    let project = matches.value_of("project").unwrap_or(".");
    let project = std::fs::canonicalize(project)
        .with_context(|| format!("Resolving project directory `{}`", project))?;
    let mut config = Config::from_directory(&project)?;
    if let Some(output) = matches.value_of("output") {
        config.output_directory = PathBuf::from(output);
    }

    build_capsule(&config)?;
    Ok(())
}
