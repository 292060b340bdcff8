use std::io::ErrorKind;
use std::os::fd::RawFd;

/// How a descriptor came back from the readiness query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Nothing to do this round.
    Idle,
    /// Data, hang-up or an error condition. One read tells which.
    Readable,
    /// The descriptor is not open.
    Invalid,
}

impl Readiness {
    pub fn from_revents(revents: libc::c_short) -> Self {
        if revents & libc::POLLNVAL != 0 {
            Readiness::Invalid
        } else if revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0 {
            Readiness::Readable
        } else {
            Readiness::Idle
        }
    }
}

/// The readiness-query table, rebuilt from the open streams each iteration.
///
/// Entries keep the order they were pushed in; each one remembers the stream
/// index it was built from.
#[derive(Debug, Default)]
pub struct ReadinessQuery {
    fds: Vec<libc::pollfd>,
    indices: Vec<usize>,
}

impl ReadinessQuery {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fds: Vec::with_capacity(capacity),
            indices: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.fds.clear();
        self.indices.clear();
    }

    /// Add the stream at `index` with descriptor `fd`.
    pub fn push(&mut self, index: usize, fd: RawFd) {
        self.fds.push(libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        });
        self.indices.push(index);
    }

    pub fn len(&self) -> usize {
        self.fds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fds.is_empty()
    }

    /// Block until at least one entry is ready. Returns the ready count.
    pub fn wait(&mut self) -> std::io::Result<usize> {
        poll_forever(&mut self.fds)
    }

    /// Stream indices with their readiness, in push order, skipping idle ones.
    pub fn ready(&self) -> impl Iterator<Item = (usize, Readiness)> + '_ {
        self.indices
            .iter()
            .zip(&self.fds)
            .map(|(&index, pfd)| (index, Readiness::from_revents(pfd.revents)))
            .filter(|(_, readiness)| *readiness != Readiness::Idle)
    }
}

/// Block until `fd` accepts more output.
///
/// Hang-up and error conditions also end the wait; the next write reports
/// them.
pub fn wait_writable(fd: RawFd) -> std::io::Result<()> {
    let mut pfd = [libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    }];
    poll_forever(&mut pfd).map(|_| ())
}

/// Blocking `poll(2)` with no timeout.
///
/// A wait interrupted by a signal is restarted; any other failure is
/// returned to the caller.
pub fn poll_forever(fds: &mut [libc::pollfd]) -> std::io::Result<usize> {
    loop {
        // SAFETY: `fds` is a valid, exclusively borrowed slice of `pollfd`
        // and its length is passed alongside the pointer.
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
        if rc >= 0 {
            return Ok(rc as usize);
        }

        let err = std::io::Error::last_os_error();
        if err.kind() == ErrorKind::Interrupted {
            continue;
        }
        return Err(err);
    }
}
