//! Non-fatal problems collected while importing.

use std::fmt;

/// Problems that were defaulted or skipped during a decode.
///
/// Every warning is also logged through `tracing` when it is recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    /// No warnings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a warning.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.0.push(message);
    }

    /// Append already-logged warnings from another decode.
    pub fn append(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of warnings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The warnings in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether any warning contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.iter().any(|w| w.contains(needle))
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(w)?;
        }
        Ok(())
    }
}
