use eet_mux::{ChunkSink, MuxConfig, MuxReport, Multiplexer};
use eet_source::Designator;

use crate::cmd::MergeArgs;
use crate::exit::{mux_error, source_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: MergeArgs) -> CliResult<i32> {
    let config = MuxConfig::default().with_chunk_size(args.chunk_size);
    config.validate().map_err(mux_error)?;
    config
        .check_stream_count(args.streams.len())
        .map_err(mux_error)?;

    let designators = parse_designators(&args.streams)?;
    let mut mux = Multiplexer::open(&designators, config).map_err(mux_error)?;

    tracing::debug!(streams = designators.len(), "all streams opened");

    let mut sink = ChunkSink::pollable(std::io::stdout().lock());
    let report = mux.run(&mut sink).map_err(mux_error)?;

    let failed = report.failed_streams().count();
    if failed > 0 {
        tracing::info!(failed, "some streams closed on read errors");
    }

    if args.stats {
        print_stats(&report)?;
    }

    Ok(SUCCESS)
}

fn parse_designators(args: &[String]) -> CliResult<Vec<Designator>> {
    args.iter()
        .map(|arg| Designator::parse(arg).map_err(source_error))
        .collect()
}

fn print_stats(report: &MuxReport) -> CliResult<()> {
    let json = serde_json::to_string(report)
        .map_err(|err| CliError::new(INTERNAL, format!("stats encoding failed: {err}")))?;
    eprintln!("{json}");
    Ok(())
}
