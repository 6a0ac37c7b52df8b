//! Internal utilities.

use std::os::unix::net::{UnixDatagram, UnixStream};
use std::path::Path;

/// Well-known syslog daemon sockets (Linux, macOS, BSD).
pub const SYSLOG_SOCKETS: &[&str] = &["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Returns the first well-known syslog socket that accepts a connection.
#[must_use]
pub fn find_syslog_socket() -> Option<&'static Path> {
    let candidates: Vec<&'static Path> = SYSLOG_SOCKETS.iter().map(Path::new).collect();
    find_syslog_socket_in(&candidates)
}

/// Returns the first of `candidates` that accepts a connection.
#[must_use]
pub fn find_syslog_socket_in<'a>(candidates: &[&'a Path]) -> Option<&'a Path> {
    candidates
        .iter()
        .copied()
        .find(|path| accepts_connections(path))
}

/// Checks whether something is listening on the Unix socket at `path`.
///
/// Datagram is tried first since that is what syslog daemons normally bind.
#[must_use]
pub fn accepts_connections(path: &Path) -> bool {
    UnixDatagram::unbound()
        .and_then(|sock| sock.connect(path))
        .is_ok()
        || UnixStream::connect(path).is_ok()
}
