//! CRD generator
//!
//! Prints the GKEops CustomResourceDefinitions as YAML, or writes them to the
//! path given as first argument (or in `CRDGEN_OUTPUT`).

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays a clean manifest
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let output = env::args().nth(1).or_else(|| env::var("CRDGEN_OUTPUT").ok());

    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("failed to create {path}"))?;
            crds::write_crds(&mut BufWriter::new(file))
                .with_context(|| format!("failed to write CRDs to {path}"))?;
            info!("Wrote CRDs to {}", path);
        }
        None => {
            crds::write_crds(&mut io::stdout().lock()).context("failed to write CRDs to stdout")?;
        }
    }

    Ok(())
}
