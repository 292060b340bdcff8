use std::io::Write;

use crate::exit::{io_error, CliResult, SUCCESS};

pub fn run() -> CliResult<i32> {
    let mut out = std::io::stdout().lock();
    out.write_all(usage_text().as_bytes())
        .and_then(|()| out.flush())
        .map_err(|err| io_error("usage write failed", err))?;
    Ok(SUCCESS)
}

pub fn usage_text() -> String {
    format!(
        "eet {}\n\
         Combines data from pipes and outputs to stdout\n\
         Usage: eet [OPTIONS] <STREAM>...\n\
         (use '-' for stdin, at most {} streams; see --help)\n\
         (put '--' before paths starting with '-': eet -- -name)\n",
        env!("CARGO_PKG_VERSION"),
        eet_mux::MAX_STREAMS
    )
}
