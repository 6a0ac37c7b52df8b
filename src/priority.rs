//! Syslog severity and facility lookup.
//!
//! Names are the upper-case forms used by `syslog.conf` (`NOTICE`, `LOCAL3`).
//! Unknown names are not an error: they fall back to [`Priority::default`].

use libc::c_int;
use tracing::Level;

const SEVERITIES: &[(&str, c_int)] = &[
    ("EMERG", libc::LOG_EMERG),
    ("ALERT", libc::LOG_ALERT),
    ("CRIT", libc::LOG_CRIT),
    ("ERR", libc::LOG_ERR),
    ("WARNING", libc::LOG_WARNING),
    ("NOTICE", libc::LOG_NOTICE),
    ("INFO", libc::LOG_INFO),
    ("DEBUG", libc::LOG_DEBUG),
];

const FACILITIES: &[(&str, c_int)] = &[
    ("KERN", libc::LOG_KERN),
    ("USER", libc::LOG_USER),
    ("MAIL", libc::LOG_MAIL),
    ("DAEMON", libc::LOG_DAEMON),
    ("AUTH", libc::LOG_AUTH),
    ("SYSLOG", libc::LOG_SYSLOG),
    ("LPR", libc::LOG_LPR),
    ("NEWS", libc::LOG_NEWS),
    ("UUCP", libc::LOG_UUCP),
    ("CRON", libc::LOG_CRON),
    ("AUTHPRIV", libc::LOG_AUTHPRIV),
    ("FTP", libc::LOG_FTP),
    ("LOCAL0", libc::LOG_LOCAL0),
    ("LOCAL1", libc::LOG_LOCAL1),
    ("LOCAL2", libc::LOG_LOCAL2),
    ("LOCAL3", libc::LOG_LOCAL3),
    ("LOCAL4", libc::LOG_LOCAL4),
    ("LOCAL5", libc::LOG_LOCAL5),
    ("LOCAL6", libc::LOG_LOCAL6),
    ("LOCAL7", libc::LOG_LOCAL7),
];

/// Returns the severity code for `name`, if known.
#[must_use]
pub fn severity_code(name: &str) -> Option<c_int> {
    lookup(SEVERITIES, name)
}

/// Returns the facility code for `name`, if known.
#[must_use]
pub fn facility_code(name: &str) -> Option<c_int> {
    lookup(FACILITIES, name)
}

fn lookup(table: &[(&str, c_int)], name: &str) -> Option<c_int> {
    table
        .iter()
        .find_map(|&(known, code)| (known == name).then_some(code))
}

/// A facility plus the least urgent severity a line may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    severity: c_int,
    facility: c_int,
}

impl Priority {
    /// Builds a priority from syslog names, substituting `NOTICE` and
    /// `SYSLOG` for names that are not recognised.
    #[must_use]
    pub fn from_names(severity: &str, facility: &str) -> Self {
        let default = Self::default();
        Self {
            severity: severity_code(severity).unwrap_or(default.severity),
            facility: facility_code(facility).unwrap_or(default.facility),
        }
    }

    /// The facility bits.
    #[must_use]
    pub const fn facility(self) -> c_int {
        self.facility
    }

    /// The configured severity.
    #[must_use]
    pub const fn severity(self) -> c_int {
        self.severity
    }

    /// `facility | severity`, as passed to `syslog(3)`.
    #[must_use]
    pub const fn code(self) -> c_int {
        self.facility | self.severity
    }

    /// Priority code for an event at `level`.
    ///
    /// Lines are never tagged less urgent than the configured severity;
    /// warnings and errors escalate above it.
    #[must_use]
    pub fn for_level(self, level: &Level) -> c_int {
        let event = match *level {
            Level::ERROR => libc::LOG_ERR,
            Level::WARN => libc::LOG_WARNING,
            Level::INFO => libc::LOG_INFO,
            _ => libc::LOG_DEBUG,
        };
        self.facility | self.severity.min(event)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self {
            severity: libc::LOG_NOTICE,
            facility: libc::LOG_SYSLOG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(severity_code("EMERG"), Some(0));
        assert_eq!(severity_code("DEBUG"), Some(7));
        assert_eq!(facility_code("KERN"), Some(0));
        assert_eq!(facility_code("LOCAL7"), Some(libc::LOG_LOCAL7));
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(severity_code("notice"), None);
        assert_eq!(facility_code("local0"), None);
    }

    #[test]
    fn default_is_notice_syslog() {
        let p = Priority::from_names("NOTICE", "SYSLOG");
        assert_eq!(p, Priority::default());
        assert_eq!(p.code(), libc::LOG_SYSLOG | libc::LOG_NOTICE);
    }

    #[test]
    fn unknown_names_degrade_to_default() {
        let p = Priority::from_names("LOUD", "NOWHERE");
        assert_eq!(p, Priority::default());

        let p = Priority::from_names("CRIT", "NOWHERE");
        assert_eq!(p.severity(), libc::LOG_CRIT);
        assert_eq!(p.facility(), libc::LOG_SYSLOG);
    }

    #[test]
    fn every_table_entry_is_distinct() {
        for table in [SEVERITIES, FACILITIES] {
            for (i, (name, code)) in table.iter().enumerate() {
                for (other_name, other_code) in &table[i + 1..] {
                    assert_ne!(name, other_name);
                    assert_ne!(code, other_code);
                }
            }
        }
    }

    #[test]
    fn level_escalates_but_never_relaxes() {
        let p = Priority::from_names("NOTICE", "DAEMON");
        assert_eq!(p.for_level(&Level::INFO), libc::LOG_DAEMON | libc::LOG_NOTICE);
        assert_eq!(p.for_level(&Level::WARN), libc::LOG_DAEMON | libc::LOG_WARNING);
        assert_eq!(p.for_level(&Level::ERROR), libc::LOG_DAEMON | libc::LOG_ERR);

        let p = Priority::from_names("ALERT", "DAEMON");
        assert_eq!(p.for_level(&Level::ERROR), libc::LOG_DAEMON | libc::LOG_ALERT);
    }
}
