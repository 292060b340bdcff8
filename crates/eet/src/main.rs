mod cmd;
mod exit;
mod logging;

use clap::Parser;

use crate::cmd::MergeArgs;
use crate::logging::{init_logging, LogArgs};

#[derive(Parser, Debug)]
#[command(
    name = "eet",
    version,
    about = "Combines data from pipes and outputs to stdout"
)]
struct Cli {
    #[command(flatten)]
    merge: MergeArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log);

    match cmd::run(cli.merge) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
