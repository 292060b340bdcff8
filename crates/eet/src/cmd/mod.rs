use clap::Args;

use crate::exit::CliResult;

pub mod merge;
pub mod usage;

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input streams: file or named-pipe paths, `-` for standard input.
    /// Put `--` before paths that start with `-` (e.g. `eet -- -weird`).
    #[arg(value_name = "STREAM")]
    pub streams: Vec<String>,
    /// Maximum bytes forwarded per read.
    #[arg(
        long,
        value_name = "BYTES",
        env = "EET_CHUNK_SIZE",
        default_value_t = eet_mux::DEFAULT_CHUNK_SIZE
    )]
    pub chunk_size: usize,
    /// Print a JSON run summary to stderr when done.
    #[arg(long)]
    pub stats: bool,
}

pub fn run(args: MergeArgs) -> CliResult<i32> {
    if args.streams.is_empty() {
        return usage::run();
    }
    merge::run(args)
}
