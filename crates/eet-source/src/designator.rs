use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SourceError};

/// The reserved designator naming the process's standard input.
pub const STDIN_TOKEN: &str = "-";

/// Where an input stream comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Designator {
    /// The process's own standard input.
    Stdin,
    /// A file-system path opened read-only.
    Path(PathBuf),
}

impl Designator {
    /// Parse one command-line argument.
    pub fn parse(arg: &str) -> Result<Self> {
        match arg {
            "" => Err(SourceError::Empty),
            STDIN_TOKEN => Ok(Designator::Stdin),
            path => Ok(Designator::Path(PathBuf::from(path))),
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, Designator::Stdin)
    }

    /// The path, unless this designates standard input.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Designator::Stdin => None,
            Designator::Path(path) => Some(path),
        }
    }
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Designator::Stdin => f.write_str(STDIN_TOKEN),
            Designator::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<PathBuf> for Designator {
    fn from(path: PathBuf) -> Self {
        Designator::Path(path)
    }
}
