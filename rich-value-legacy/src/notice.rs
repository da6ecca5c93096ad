//! Structured deprecation notices and where they go

use std::fmt;

/// What was called, when it goes away and what to use instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub construct: &'static str,
    /// Version in which the construct is removed.
    pub version: &'static str,
    pub alternative: &'static str,
    pub link: &'static str,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is deprecated and will be removed in version {}. Please use {} instead. See: {}",
            self.construct, self.version, self.alternative, self.link
        )
    }
}

/// Receives a notice every time a deprecated construct is used.
pub trait DeprecationLogger {
    fn deprecated(&self, notice: &DeprecationNotice);
}

impl<L: DeprecationLogger + ?Sized> DeprecationLogger for &L {
    fn deprecated(&self, notice: &DeprecationNotice) {
        (**self).deprecated(notice)
    }
}

/// Forwards notices to the `log` facade at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDeprecations;

impl DeprecationLogger for LogDeprecations {
    fn deprecated(&self, notice: &DeprecationNotice) {
        log::warn!(target: "rich_value::deprecated", "{notice}");
    }
}
