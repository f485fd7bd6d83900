//! Writes the cross-signed certificate graph used by path-building tests.
//!
//! One PEM file per certificate, by default under `assets/path_building/`.

use std::path::PathBuf;

use cert_fixtures::fixtures::path_building::{self, DEFAULT_OUT_DIR};
use clap::Parser;
use eyre::WrapErr;

#[derive(Parser, Debug)]
#[command(name = "gen-path-building-fixtures")]
#[command(about = "Generate cross-signed certificate fixtures for path building", long_about = None)]
struct Options {
    /// Directory the certificate files are written to
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,
}

fn main() -> Result<(), eyre::Report> {
    let options = Options::parse();
    cert_fixtures::logging::init()?;

    path_building::generate(&options.out_dir).wrap_err_with(|| {
        format!(
            "failed to generate path building fixtures in {}",
            options.out_dir.display()
        )
    })?;
    Ok(())
}
