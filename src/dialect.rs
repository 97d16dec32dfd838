//! The closed set of SQL backends the renderer knows about, and the two
//! capabilities (`Constant`, `FkAction`) that are polymorphic over it.

use crate::error::{MigrationError, Result};
use serde::{Deserialize, Serialize};

/// A supported (or declared-but-stubbed) SQL backend.
///
/// Every rendering function is parameterised by a `Dialect`. SQLite is
/// fully implemented; MySQL and Postgres have type maps but no
/// constant/FK-action rendering yet (§9 of SPEC_FULL.md) — asking for one
/// against those dialects is a typed error, not a silent wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Sqlite,
    Postgres,
    Mysql,
}

/// A named SQL constant, such as `CURRENT_TIMESTAMP`, that renders to a
/// literal-free token rather than a quoted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// The current timestamp, per the dialect's own clock function.
    Now,
}

impl Constant {
    /// Render this constant to a dialect-specific SQL token.
    pub fn render(self, dialect: Dialect) -> Result<&'static str> {
        match (self, dialect) {
            (Constant::Now, Dialect::Sqlite) => Ok("CURRENT_TIMESTAMP"),
            (Constant::Now, _) => Err(MigrationError::UnsupportedDialect {
                dialect,
                construct: "NOW constant",
            }),
        }
    }
}

/// Referential action taken by a foreign key on update/delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkAction {
    NoAction,
    Restrict,
    SetNull,
    SetDefault,
    Cascade,
}

impl FkAction {
    /// Render this action to the dialect's keyword(s).
    pub fn render(self, dialect: Dialect) -> Result<&'static str> {
        match dialect {
            Dialect::Sqlite => Ok(match self {
                FkAction::NoAction => "NO ACTION",
                FkAction::Restrict => "RESTRICT",
                FkAction::SetNull => "SET NULL",
                FkAction::SetDefault => "SET DEFAULT",
                FkAction::Cascade => "CASCADE",
            }),
            _ => Err(MigrationError::UnsupportedDialect {
                dialect,
                construct: "foreign key action",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_renders_for_sqlite() {
        assert_eq!(Constant::Now.render(Dialect::Sqlite).unwrap(), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn now_rejects_other_dialects() {
        let err = Constant::Now.render(Dialect::Postgres).unwrap_err();
        assert_eq!(
            err,
            MigrationError::UnsupportedDialect {
                dialect: Dialect::Postgres,
                construct: "NOW constant",
            }
        );
    }

    #[test]
    fn fk_action_renders_for_sqlite() {
        assert_eq!(FkAction::Cascade.render(Dialect::Sqlite).unwrap(), "CASCADE");
        assert_eq!(FkAction::SetNull.render(Dialect::Sqlite).unwrap(), "SET NULL");
    }

    #[test]
    fn fk_action_rejects_mysql() {
        assert!(FkAction::Cascade.render(Dialect::Mysql).is_err());
    }
}
