//! CLI entry point for wave function collapse image generation

use clap::Parser;
use wavecollapse::io::cli::{Cli, Runner};

fn main() -> wavecollapse::Result<()> {
    let cli = Cli::parse();
    let runner = Runner::new(cli);
    runner.run().map(|_| ())
}
