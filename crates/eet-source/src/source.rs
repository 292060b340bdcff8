use std::fs::File;
use std::io::Read;
use std::os::fd::{AsFd, AsRawFd, RawFd};

use tracing::debug;

use crate::designator::Designator;
use crate::error::{Result, SourceError};

/// What kind of object backs an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Fifo,
    CharDevice,
    Socket,
    Other,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Fifo => "fifo",
            SourceKind::CharDevice => "char-device",
            SourceKind::Socket => "socket",
            SourceKind::Other => "other",
        }
    }
}

/// An open, readable input stream.
///
/// Owns its descriptor. Standard input is duplicated on open, so reads are
/// unbuffered and dropping the source never closes the process's fd 0.
pub struct InputSource {
    file: File,
    designator: Designator,
    kind: SourceKind,
}

impl InputSource {
    /// Acquire a readable handle for `designator` (blocking).
    ///
    /// Opening a named pipe blocks until a writer opens the other end.
    pub fn open(designator: &Designator) -> Result<Self> {
        let file = match designator {
            Designator::Stdin => std::io::stdin()
                .as_fd()
                .try_clone_to_owned()
                .map(File::from),
            Designator::Path(path) => File::open(path),
        }
        .map_err(|source| SourceError::Open {
            designator: designator.clone(),
            source,
        })?;

        Self::from_file(designator.clone(), file)
    }

    /// Wrap an already-open file as the source for `designator`.
    pub fn from_file(designator: Designator, file: File) -> Result<Self> {
        let metadata = file.metadata().map_err(|source| SourceError::Open {
            designator: designator.clone(),
            source,
        })?;

        if metadata.is_dir() {
            return Err(SourceError::Open {
                designator,
                source: std::io::Error::new(
                    std::io::ErrorKind::IsADirectory,
                    "is a directory",
                ),
            });
        }

        let kind = kind_of(file.as_raw_fd());
        debug!(origin = %designator, kind = kind.as_str(), "opened stream");

        Ok(Self {
            file,
            designator,
            kind,
        })
    }

    /// The designator this source was opened from.
    pub fn origin(&self) -> &Designator {
        &self.designator
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl AsRawFd for InputSource {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSource")
            .field("origin", &self.designator.to_string())
            .field("kind", &self.kind.as_str())
            .field("fd", &self.file.as_raw_fd())
            .finish()
    }
}

fn kind_of(fd: RawFd) -> SourceKind {
    // SAFETY: `libc::stat` is plain old data, so an all-zero value is valid.
    let mut stat: libc::stat = unsafe { std::mem::zeroed() };

    // SAFETY: `stat` is a valid writable pointer and `fd` is an open
    // descriptor owned by the caller for the duration of this call.
    let rc = unsafe { libc::fstat(fd, &mut stat) };
    if rc != 0 {
        return SourceKind::Other;
    }

    match stat.st_mode & libc::S_IFMT {
        libc::S_IFREG => SourceKind::File,
        libc::S_IFIFO => SourceKind::Fifo,
        libc::S_IFCHR => SourceKind::CharDevice,
        libc::S_IFSOCK => SourceKind::Socket,
        _ => SourceKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "eet-source-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn open_regular_file_and_read() {
        let dir = unique_temp_dir("file");
        let path = dir.join("input.txt");
        std::fs::write(&path, b"hello").unwrap();

        let mut source = InputSource::open(&Designator::Path(path.clone())).unwrap();
        assert_eq!(source.kind(), SourceKind::File);
        assert_eq!(source.origin(), &Designator::Path(path));

        let mut buf = Vec::new();
        source.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"hello");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_missing_path_names_designator() {
        let dir = unique_temp_dir("missing");
        let path = dir.join("nope");

        let err = InputSource::open(&Designator::Path(path.clone())).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
        assert!(err.to_string().contains(&path.display().to_string()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_directory_is_rejected() {
        let dir = unique_temp_dir("dir");

        let err = InputSource::open(&Designator::Path(dir.clone())).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::IsADirectory));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_fifo_reports_fifo_kind() {
        let dir = unique_temp_dir("fifo");
        let path = dir.join("pipe");
        let c_path = std::ffi::CString::new(path.as_os_str().as_encoded_bytes()).unwrap();
        // SAFETY: `c_path` is a valid NUL-terminated string.
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

        let writer_path = path.clone();
        let writer = std::thread::spawn(move || {
            use std::io::Write;
            let mut f = std::fs::OpenOptions::new()
                .write(true)
                .open(writer_path)
                .unwrap();
            f.write_all(b"x").unwrap();
        });

        let mut source = InputSource::open(&Designator::Path(path)).unwrap();
        assert_eq!(source.kind(), SourceKind::Fifo);
        let mut buf = Vec::new();
        source.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"x");

        writer.join().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn debug_shows_origin() {
        let dir = unique_temp_dir("debug");
        let path = dir.join("input.txt");
        std::fs::write(&path, b"").unwrap();

        let source = InputSource::open(&Designator::Path(path)).unwrap();
        let rendered = format!("{source:?}");
        assert!(rendered.contains("input.txt"));
        assert!(rendered.contains("file"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
