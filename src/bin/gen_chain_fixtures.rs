//! Writes the trusted/untrusted "localhost" chain fixtures.
//!
//! Produces `test_key.pkcs8`, `valid_chain.pem`, `invalid_chain.pem` and
//! `valid_ca.pem`, by default in the working directory.

use std::path::PathBuf;

use cert_fixtures::fixtures::chain;
use clap::Parser;
use eyre::WrapErr;

#[derive(Parser, Debug)]
#[command(name = "gen-chain-fixtures")]
#[command(about = "Generate trusted and untrusted certificate chain fixtures", long_about = None)]
struct Options {
    /// Directory the fixture files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<(), eyre::Report> {
    let options = Options::parse();
    cert_fixtures::logging::init()?;

    chain::generate(&options.out_dir).wrap_err_with(|| {
        format!(
            "failed to generate chain fixtures in {}",
            options.out_dir.display()
        )
    })?;
    Ok(())
}
