//! Database engine tags and their dialect policy table.
//!
//! Builders never branch on the engine directly. They look up a
//! [`DialectPolicy`] and use its transaction literals and conflict clause;
//! supporting another engine means adding a variant and a table row.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database engine a statement is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    /// PostgreSQL (and wire-compatible engines)
    Postgres,
    /// Microsoft SQL Server
    SqlServer,
    /// SQLite 3.24 or newer
    Sqlite,
    /// MySQL / MariaDB
    MySql,
}

/// How a multi-row INSERT treats rows that violate a unique constraint.
///
/// An `Update` (upsert) variant is intentionally not provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// No conflict clause; the engine's own constraint violation surfaces
    #[default]
    Error,
    /// Skip conflicting rows
    DoNothing,
}

/// Engine-specific syntax used by the statement builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectPolicy {
    /// Statement that opens a transaction, including its terminator
    pub transaction_open: &'static str,
    /// Statement that commits a transaction, including its terminator
    pub transaction_close: &'static str,
    /// Clause appended to an INSERT to ignore conflicting rows, if supported
    pub conflict_do_nothing: Option<&'static str>,
}

const POSTGRES: DialectPolicy = DialectPolicy {
    transaction_open: "BEGIN;",
    transaction_close: "COMMIT;",
    conflict_do_nothing: Some("ON CONFLICT DO NOTHING"),
};

const SQL_SERVER: DialectPolicy = DialectPolicy {
    transaction_open: "BEGIN TRANSACTION;",
    transaction_close: "COMMIT;",
    conflict_do_nothing: None,
};

const SQLITE: DialectPolicy = DialectPolicy {
    transaction_open: "BEGIN TRANSACTION;",
    transaction_close: "COMMIT;",
    conflict_do_nothing: Some("ON CONFLICT DO NOTHING"),
};

// MySQL ignores conflicts with `INSERT IGNORE`, a prefix rather than a
// trailing clause, so it has no entry here.
const MYSQL: DialectPolicy = DialectPolicy {
    transaction_open: "START TRANSACTION;",
    transaction_close: "COMMIT;",
    conflict_do_nothing: None,
};

impl DatabaseEngine {
    /// All supported engines.
    pub const ALL: [DatabaseEngine; 4] = [
        DatabaseEngine::Postgres,
        DatabaseEngine::SqlServer,
        DatabaseEngine::Sqlite,
        DatabaseEngine::MySql,
    ];

    /// The dialect policy for this engine.
    pub const fn policy(self) -> &'static DialectPolicy {
        match self {
            DatabaseEngine::Postgres => &POSTGRES,
            DatabaseEngine::SqlServer => &SQL_SERVER,
            DatabaseEngine::Sqlite => &SQLITE,
            DatabaseEngine::MySql => &MYSQL,
        }
    }

    /// Lowercase name used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            DatabaseEngine::Postgres => "postgres",
            DatabaseEngine::SqlServer => "sqlserver",
            DatabaseEngine::Sqlite => "sqlite",
            DatabaseEngine::MySql => "mysql",
        }
    }
}

impl DialectPolicy {
    /// The clause implementing `policy`, if the engine has one.
    ///
    /// [`ConflictPolicy::Error`] never needs a clause.
    pub fn conflict_clause(&self, policy: ConflictPolicy) -> Option<&'static str> {
        match policy {
            ConflictPolicy::Error => None,
            ConflictPolicy::DoNothing => self.conflict_do_nothing,
        }
    }

    /// Check whether `policy` can be expressed for this engine.
    pub fn supports(&self, policy: ConflictPolicy) -> bool {
        match policy {
            ConflictPolicy::Error => true,
            ConflictPolicy::DoNothing => self.conflict_do_nothing.is_some(),
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseEngine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "npgsql" => Ok(DatabaseEngine::Postgres),
            "sqlserver" | "mssql" => Ok(DatabaseEngine::SqlServer),
            "sqlite" => Ok(DatabaseEngine::Sqlite),
            "mysql" | "mariadb" => Ok(DatabaseEngine::MySql),
            _ => Err(Error::invalid_argument(
                "engine",
                format!("unknown database engine '{}'", s),
            )),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "error" => Ok(ConflictPolicy::Error),
            "do_nothing" | "donothing" => Ok(ConflictPolicy::DoNothing),
            _ => Err(Error::invalid_argument(
                "on_conflict",
                format!("unknown conflict policy '{}'", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_literals() {
        let pg = DatabaseEngine::Postgres.policy();
        assert_eq!(pg.transaction_open, "BEGIN;");
        assert_eq!(pg.transaction_close, "COMMIT;");

        let ms = DatabaseEngine::SqlServer.policy();
        assert_eq!(ms.transaction_open, "BEGIN TRANSACTION;");
        assert_eq!(ms.transaction_close, "COMMIT;");
    }

    #[test]
    fn conflict_support_per_engine() {
        assert_eq!(
            DatabaseEngine::Postgres
                .policy()
                .conflict_clause(ConflictPolicy::DoNothing),
            Some("ON CONFLICT DO NOTHING")
        );
        assert!(
            !DatabaseEngine::SqlServer
                .policy()
                .supports(ConflictPolicy::DoNothing)
        );
        assert!(!DatabaseEngine::MySql.policy().supports(ConflictPolicy::DoNothing));
        for engine in DatabaseEngine::ALL {
            assert_eq!(engine.policy().conflict_clause(ConflictPolicy::Error), None);
            assert!(engine.policy().supports(ConflictPolicy::Error));
        }
    }

    #[test]
    fn parse_engine_and_policy() {
        assert_eq!("MSSQL".parse::<DatabaseEngine>().unwrap(), DatabaseEngine::SqlServer);
        assert_eq!("postgresql".parse::<DatabaseEngine>().unwrap(), DatabaseEngine::Postgres);
        assert!("oracle".parse::<DatabaseEngine>().is_err());
        assert_eq!(
            "do-nothing".parse::<ConflictPolicy>().unwrap(),
            ConflictPolicy::DoNothing
        );
        for engine in DatabaseEngine::ALL {
            assert_eq!(engine.as_str().parse::<DatabaseEngine>().unwrap(), engine);
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&DatabaseEngine::SqlServer).unwrap(),
            "\"sqlserver\""
        );
        assert_eq!(
            serde_json::from_str::<ConflictPolicy>("\"do_nothing\"").unwrap(),
            ConflictPolicy::DoNothing
        );
    }
}
