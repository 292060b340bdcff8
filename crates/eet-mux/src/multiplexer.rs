use std::io::{Read, Write};
use std::os::fd::AsRawFd;

use eet_source::{Designator, InputSource};
use tracing::{debug, info, trace};

use crate::config::MuxConfig;
use crate::error::{MuxError, Result};
use crate::poll::{Readiness, ReadinessQuery};
use crate::report::{CloseReason, MuxReport};
use crate::sink::ChunkSink;
use crate::stream::{ReadOutcome, Stream};

/// Merges a fixed, ordered set of input streams into one sink.
///
/// Streams are indexed by their position at setup and never reindexed.
/// Handles are released as each stream closes, and the rest when the
/// multiplexer is dropped.
pub struct Multiplexer<S = InputSource> {
    streams: Vec<Stream<S>>,
    config: MuxConfig,
}

impl Multiplexer<InputSource> {
    /// Open every designator, or none.
    ///
    /// The count is checked against the ceiling before anything is opened.
    /// The first designator that fails to open aborts setup; handles opened
    /// before it are closed on return.
    pub fn open(designators: &[Designator], config: MuxConfig) -> Result<Self> {
        config.validate()?;
        config.check_stream_count(designators.len())?;

        let mut sources = Vec::with_capacity(designators.len());
        for designator in designators {
            let source = InputSource::open(designator)?;
            sources.push((designator.clone(), source));
        }

        Self::from_sources(sources, config)
    }
}

impl<S: Read + AsRawFd> Multiplexer<S> {
    /// Build a multiplexer from handles that are already open.
    pub fn from_sources(sources: Vec<(Designator, S)>, config: MuxConfig) -> Result<Self> {
        config.validate()?;
        config.check_stream_count(sources.len())?;

        let streams = sources
            .into_iter()
            .enumerate()
            .map(|(index, (origin, handle))| Stream::new(index, origin, handle))
            .collect();

        Ok(Self { streams, config })
    }

    pub fn streams(&self) -> &[Stream<S>] {
        &self.streams
    }

    pub fn open_count(&self) -> usize {
        self.streams.iter().filter(|s| s.is_open()).count()
    }

    pub fn config(&self) -> &MuxConfig {
        &self.config
    }

    /// Run the merge loop until every stream is closed (blocking).
    ///
    /// Fails only if the readiness query itself fails or the sink rejects a
    /// write. Per-stream read failures close that stream and the loop goes on.
    pub fn run<W: Write>(&mut self, sink: &mut ChunkSink<W>) -> Result<MuxReport> {
        self.run_with(sink, ReadinessQuery::wait)
    }

    /// The merge loop with the readiness wait supplied by the caller.
    pub(crate) fn run_with<W, F>(
        &mut self,
        sink: &mut ChunkSink<W>,
        mut wait: F,
    ) -> Result<MuxReport>
    where
        W: Write,
        F: FnMut(&mut ReadinessQuery) -> std::io::Result<usize>,
    {
        let mut buf = vec![0u8; self.config.chunk_size];
        let mut query = ReadinessQuery::with_capacity(self.streams.len());
        let mut iterations = 0u64;

        debug!(
            streams = self.streams.len(),
            chunk_size = self.config.chunk_size,
            "starting merge loop"
        );

        loop {
            query.clear();
            for stream in &self.streams {
                if let Some(fd) = stream.raw_fd() {
                    query.push(stream.index(), fd);
                }
            }

            if query.is_empty() {
                break;
            }

            let ready = wait(&mut query).map_err(MuxError::Poll)?;
            iterations += 1;
            trace!(open = query.len(), ready, "readiness query returned");

            for (index, readiness) in query.ready() {
                let stream = &mut self.streams[index];
                match readiness {
                    Readiness::Idle => {}
                    Readiness::Invalid => {
                        stream.close(CloseReason::read_error("invalid descriptor"))
                    }
                    Readiness::Readable => {
                        if let ReadOutcome::Data(n) = stream.read_chunk(&mut buf) {
                            sink.write_chunk(&buf[..n]).map_err(MuxError::Sink)?;
                        }
                    }
                }
            }
        }

        let report = self.report(iterations);
        info!(
            streams = report.streams.len(),
            bytes = report.total_bytes,
            iterations,
            "all streams closed"
        );
        Ok(report)
    }

    /// Summary of the streams as they stand now.
    pub fn report(&self, iterations: u64) -> MuxReport {
        let streams: Vec<_> = self.streams.iter().map(Stream::summary).collect();
        let total_bytes = streams.iter().map(|s| s.bytes).sum();
        MuxReport {
            streams,
            total_bytes,
            iterations,
        }
    }
}

impl<S> std::fmt::Debug for Multiplexer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multiplexer")
            .field("streams", &self.streams)
            .field("config", &self.config)
            .finish()
    }
}
