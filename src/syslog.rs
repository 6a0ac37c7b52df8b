//! System log sink.
//!
//! [`Syslog`] is a [`MakeWriter`] for `tracing-subscriber`'s fmt layer. Each
//! event becomes one `syslog(3)` call whose priority depends on the event's
//! level (see [`Priority::for_level`]).

use std::ffi::{CStr, CString};
use std::io::{self, Write};
use std::path::Path;

use libc::c_int;
use tracing::Metadata;
use tracing_subscriber::fmt::MakeWriter;

use crate::priority::Priority;
use crate::util::{find_syslog_socket, find_syslog_socket_in};

/// Tag prepended to every line by the syslog daemon.
pub const IDENT: &CStr = c"dns-watchdog";

/// Handle to the process-wide syslog connection.
#[derive(Debug)]
pub struct Syslog {
    priority: Priority,
}

impl Syslog {
    /// Opens the system logger under [`IDENT`] with the facility of
    /// `priority`.
    ///
    /// Returns `None` when no syslog daemon socket is reachable, so the
    /// caller can log somewhere local instead.
    #[must_use]
    pub fn open(priority: Priority) -> Option<Self> {
        find_syslog_socket()?;
        Some(Self::connect(priority))
    }

    /// Like [`open`](Self::open), but looks for the daemon socket among
    /// `candidates` instead of the well-known paths.
    #[must_use]
    pub fn open_with(priority: Priority, candidates: &[&Path]) -> Option<Self> {
        find_syslog_socket_in(candidates)?;
        Some(Self::connect(priority))
    }

    fn connect(priority: Priority) -> Self {
        // SAFETY: `IDENT` is a `'static` C string, so the pointer `openlog`
        // keeps stays valid for the rest of the process.
        unsafe {
            libc::openlog(IDENT.as_ptr(), libc::LOG_PID | libc::LOG_NDELAY, priority.facility());
        }
        Self { priority }
    }

    /// The priority lines are tagged with.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }
}

impl Drop for Syslog {
    fn drop(&mut self) {
        // SAFETY: closing the descriptor opened by `openlog`; later
        // `syslog` calls would simply reopen it.
        unsafe { libc::closelog() }
    }
}

impl<'a> MakeWriter<'a> for Syslog {
    type Writer = SyslogLine;

    fn make_writer(&'a self) -> Self::Writer {
        SyslogLine::new(self.priority.code())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SyslogLine::new(self.priority.for_level(meta.level()))
    }
}

/// Buffers one formatted event and hands it to `syslog(3)` when flushed or
/// dropped.
#[derive(Debug)]
pub struct SyslogLine {
    priority: c_int,
    buf: Vec<u8>,
}

impl SyslogLine {
    const fn new(priority: c_int) -> Self {
        Self {
            priority,
            buf: Vec::new(),
        }
    }

    fn emit(&mut self) {
        let Some(message) = to_message(&self.buf) else {
            return;
        };
        self.buf.clear();
        // SAFETY: both pointers are NUL-terminated and outlive the call; the
        // message goes through "%s" so it is never read as a format string.
        unsafe { libc::syslog(self.priority, c"%s".as_ptr(), message.as_ptr()) }
    }
}

impl Write for SyslogLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit();
        Ok(())
    }
}

impl Drop for SyslogLine {
    fn drop(&mut self) {
        self.emit();
    }
}

/// Strips the trailing newline and interior NULs from a formatted event.
///
/// Returns `None` for blank lines.
fn to_message(buf: &[u8]) -> Option<CString> {
    let text = String::from_utf8_lossy(buf);
    let line = text.trim_end_matches(['\n', '\r']).replace('\0', "");
    if line.trim().is_empty() {
        return None;
    }
    CString::new(line).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_drops_trailing_newline() {
        let msg = to_message(b"Fail # 1 failures=1\n").unwrap();
        assert_eq!(msg.to_str().unwrap(), "Fail # 1 failures=1");
    }

    #[test]
    fn message_strips_interior_nul() {
        let msg = to_message(b"a\0b\n").unwrap();
        assert_eq!(msg.to_str().unwrap(), "ab");
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(to_message(b"").is_none());
        assert!(to_message(b"  \n").is_none());
    }

    #[test]
    fn unreachable_daemon_yields_no_sink() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("log");
        assert!(Syslog::open_with(Priority::default(), &[]).is_none());
        assert!(Syslog::open_with(Priority::default(), &[absent.as_path()]).is_none());
    }

    #[test]
    fn listening_daemon_yields_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        let _daemon = std::os::unix::net::UnixDatagram::bind(&path).unwrap();

        let priority = Priority::from_names("WARNING", "LOCAL1");
        let sink = Syslog::open_with(priority, &[path.as_path()]).unwrap();
        assert_eq!(sink.priority(), priority);
    }

    #[test]
    fn writer_priority_follows_level() {
        let sink = Syslog {
            priority: Priority::from_names("NOTICE", "LOCAL0"),
        };
        // Nothing is buffered, so dropping these never reaches syslog(3).
        assert_eq!(sink.make_writer().priority, libc::LOG_LOCAL0 | libc::LOG_NOTICE);
        assert_eq!(
            SyslogLine::new(sink.priority().for_level(&tracing::Level::ERROR)).priority,
            libc::LOG_LOCAL0 | libc::LOG_ERR
        );
    }
}
