use std::io::{ErrorKind, Write};
use std::os::fd::{AsFd, AsRawFd, RawFd};

use crate::poll::wait_writable;

/// Writes merged chunks to the output, one complete chunk at a time.
///
/// A short write is resumed until the whole chunk has been accepted, so no
/// byte read from an input is ever dropped silently. When the output is a
/// non-blocking descriptor that is full, the sink blocks in `poll(2)` until
/// it drains.
pub struct ChunkSink<W> {
    inner: W,
    fd: Option<RawFd>,
    bytes_written: u64,
}

impl<W: Write + AsFd> ChunkSink<W> {
    /// A sink over a descriptor-backed writer, such as locked stdout.
    pub fn pollable(inner: W) -> Self {
        let fd = inner.as_fd().as_raw_fd();
        Self {
            inner,
            fd: Some(fd),
            bytes_written: 0,
        }
    }
}

impl<W: Write> ChunkSink<W> {
    /// A sink over an in-memory or otherwise fd-less writer.
    ///
    /// Such a writer has nothing to wait on, so `WouldBlock` is an error.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            fd: None,
            bytes_written: 0,
        }
    }

    /// Write a complete chunk and flush it (blocking).
    pub fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        let mut offset = 0usize;
        while offset < chunk.len() {
            match self.inner.write(&chunk[offset..]) {
                Ok(0) => {
                    return Err(std::io::Error::new(
                        ErrorKind::WriteZero,
                        "output accepted zero bytes",
                    ))
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => self.wait(err)?,
                Err(err) => return Err(err),
            }
        }
        self.bytes_written += chunk.len() as u64;

        self.flush()
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => self.wait(err)?,
                Err(err) => return Err(err),
            }
        }
    }

    /// Block until the output can take more bytes.
    fn wait(&self, would_block: std::io::Error) -> std::io::Result<()> {
        match self.fd {
            Some(fd) => wait_writable(fd),
            None => Err(would_block),
        }
    }

    /// Total bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    struct OneByteWriter {
        out: Vec<u8>,
        interrupt_next: bool,
    }

    impl Write for OneByteWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.interrupt_next = true;
            self.out.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_chunks_in_order() {
        let mut sink = ChunkSink::new(Cursor::new(Vec::<u8>::new()));
        sink.write_chunk(b"foo").unwrap();
        sink.write_chunk(b"bar").unwrap();

        assert_eq!(sink.bytes_written(), 6);
        assert_eq!(sink.into_inner().into_inner(), b"foobar");
    }

    #[test]
    fn partial_and_interrupted_writes_are_resumed() {
        let mut sink = ChunkSink::new(OneByteWriter {
            out: Vec::new(),
            interrupt_next: false,
        });
        sink.write_chunk(b"partial").unwrap();

        assert_eq!(sink.get_ref().out, b"partial");
        assert_eq!(sink.bytes_written(), 7);
    }

    #[test]
    fn zero_length_write_is_an_error() {
        let mut sink = ChunkSink::new(ZeroWriter);
        let err = sink.write_chunk(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteZero);
        assert_eq!(sink.bytes_written(), 0);
    }

    #[test]
    fn hard_error_is_returned() {
        let mut sink = ChunkSink::new(BrokenPipe);
        let err = sink.write_chunk(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }

    #[test]
    fn full_nonblocking_output_waits_for_reader() {
        use std::io::Read;
        use std::os::unix::net::UnixStream;
        use std::time::Duration;

        let (tx, mut rx) = UnixStream::pair().unwrap();
        tx.set_nonblocking(true).unwrap();

        let mut tx = tx;
        let mut backlog = 0usize;
        loop {
            match tx.write(&[b'.'; 4096]) {
                Ok(n) => backlog += n,
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) => panic!("unexpected write error: {err}"),
            }
        }

        let chunk: Vec<u8> = (0..64 * 1024u32).map(|i| (i % 251) as u8).collect();
        let expected = chunk.len();
        let reader = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            let mut buf = vec![0u8; backlog + expected];
            rx.read_exact(&mut buf).unwrap();
            buf.split_off(backlog)
        });

        let mut sink = ChunkSink::pollable(tx);
        sink.write_chunk(&chunk).unwrap();
        assert_eq!(sink.bytes_written(), chunk.len() as u64);

        assert_eq!(reader.join().unwrap(), chunk);
    }

    #[test]
    fn would_block_without_descriptor_is_an_error() {
        struct AlwaysFull;

        impl Write for AlwaysFull {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::WouldBlock))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = ChunkSink::new(AlwaysFull);
        let err = sink.write_chunk(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WouldBlock);
    }

    #[test]
    fn empty_chunk_is_a_no_op() {
        let mut sink = ChunkSink::new(ZeroWriter);
        sink.write_chunk(b"").unwrap();
        assert_eq!(sink.bytes_written(), 0);
    }
}
