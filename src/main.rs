use anyhow::Result;
use clap::Parser;

use reproscope::cli::{Cli, run};
use reproscope::util::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
