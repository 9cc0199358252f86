//! Generator configuration.
//!
//! Both option structs deserialize with defaults for missing keys, so they
//! can be embedded in application configuration files.

use bulksql_core::ConflictPolicy;
use serde::{Deserialize, Serialize};

/// Default number of rows per generated INSERT statement.
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Options for [`generate_insert_batches`](crate::generate_insert_batches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertOptions {
    /// Rows per statement; `0` puts every row in a single statement (default: 100)
    pub batch_size: u32,
    /// Prepended to every parameter name
    pub param_prefix: String,
    /// What the generated INSERT does with conflicting rows
    pub on_conflict: ConflictPolicy,
    /// Fail instead of warning when `on_conflict` cannot be expressed for the engine
    pub strict_conflict: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            param_prefix: String::new(),
            on_conflict: ConflictPolicy::Error,
            strict_conflict: false,
        }
    }
}

impl InsertOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch size (`0` = unbatched).
    pub fn batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the parameter-name prefix.
    pub fn param_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.param_prefix = prefix.into();
        self
    }

    /// Set the conflict policy.
    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.on_conflict = policy;
        self
    }

    /// Reject conflict policies the engine cannot express.
    pub fn strict_conflict(mut self, strict: bool) -> Self {
        self.strict_conflict = strict;
        self
    }

    /// Rows per batch as a `usize`, with `None` meaning unbatched.
    pub(crate) fn rows_per_batch(&self) -> Option<usize> {
        match self.batch_size {
            0 => None,
            n => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

/// Options for [`generate_update`](crate::generate_update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateOptions {
    /// Wrap all row updates in the engine's transaction envelope (default: true)
    pub use_transaction: bool,
    /// Prepended to every parameter name
    pub param_prefix: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            use_transaction: true,
            param_prefix: String::new(),
        }
    }
}

impl UpdateOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the transaction envelope.
    pub fn use_transaction(mut self, use_transaction: bool) -> Self {
        self.use_transaction = use_transaction;
        self
    }

    /// Set the parameter-name prefix.
    pub fn param_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.param_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_defaults() {
        let opts = InsertOptions::default();
        assert_eq!(opts.batch_size, 100);
        assert_eq!(opts.param_prefix, "");
        assert_eq!(opts.on_conflict, ConflictPolicy::Error);
        assert!(!opts.strict_conflict);
        assert_eq!(opts.rows_per_batch(), Some(100));
        assert_eq!(InsertOptions::new().batch_size(0).rows_per_batch(), None);
    }

    #[test]
    fn insert_from_partial_json() {
        let opts: InsertOptions =
            serde_json::from_str(r#"{"batch_size": 2, "on_conflict": "do_nothing"}"#).unwrap();
        assert_eq!(
            opts,
            InsertOptions::new()
                .batch_size(2)
                .on_conflict(ConflictPolicy::DoNothing)
        );
    }

    #[test]
    fn update_defaults_and_json() {
        assert!(UpdateOptions::default().use_transaction);

        let opts: UpdateOptions = serde_json::from_str(r#"{"param_prefix": "u_"}"#).unwrap();
        assert!(opts.use_transaction);
        assert_eq!(opts.param_prefix, "u_");

        let opts: UpdateOptions = serde_json::from_str(r#"{"use_transaction": false}"#).unwrap();
        assert_eq!(opts, UpdateOptions::new().use_transaction(false));
    }
}
