//! Migration registration: a migration is a pair of schema-mutating
//! closures keyed by an ordinal version number.

use crate::options::MigrateOptions;
use crate::schema::Schema;

/// A closure that records schema operations against a [`Schema`] created
/// fresh for the call. Both the `up` and `down` sides of a [`Migration`]
/// are one of these.
pub type SchemaMutator = Box<dyn Fn(&mut Schema) + Send + Sync>;

/// One migration: an ordinal `version`, and the schema mutations that move
/// the database forward (`up`) or back (`down`) across it.
pub struct Migration {
    pub version: u64,
    pub up: SchemaMutator,
    pub down: SchemaMutator,
}

impl Migration {
    pub fn new(
        version: u64,
        up: impl Fn(&mut Schema) + Send + Sync + 'static,
        down: impl Fn(&mut Schema) + Send + Sync + 'static,
    ) -> Self {
        Migration {
            version,
            up: Box::new(up),
            down: Box::new(down),
        }
    }

    /// Materialize this migration's `up` side into a fresh [`Schema`].
    pub fn up_schema(&self, options: &MigrateOptions) -> Schema {
        let mut schema = Schema::new(options.dialect, &options.schema_name);
        (self.up)(&mut schema);
        schema
    }

    /// Materialize this migration's `down` side into a fresh [`Schema`].
    pub fn down_schema(&self, options: &MigrateOptions) -> Schema {
        let mut schema = Schema::new(options.dialect, &options.schema_name);
        (self.down)(&mut schema);
        schema
    }
}

/// An ordered registry of migrations for one namespace.
///
/// [`Migrator::add`] accepts migrations in any order; [`Migrator::sorted`]
/// always returns them ascending by version, which is what the runner
/// walks for `UpTo` (and reverses for `DownTo`).
#[derive(Default)]
pub struct Migrator {
    migrations: Vec<Migration>,
}

impl Migrator {
    pub fn new() -> Self {
        Migrator { migrations: Vec::new() }
    }

    pub fn add(&mut self, migration: Migration) -> &mut Self {
        self.migrations.push(migration);
        self
    }

    /// Migrations in ascending version order. Duplicate versions are left
    /// for the runner to detect against recorded hashes rather than
    /// rejected here — registration order has no bearing on correctness.
    pub fn sorted(&self) -> Vec<&Migration> {
        let mut out: Vec<&Migration> = self.migrations.iter().collect();
        out.sort_by_key(|m| m.version);
        out
    }

    pub fn latest_version(&self) -> Option<u64> {
        self.migrations.iter().map(|m| m.version).max()
    }

    pub fn get(&self, version: u64) -> Option<&Migration> {
        self.migrations.iter().find(|m| m.version == version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    #[test]
    fn sorted_is_ascending_regardless_of_insertion_order() {
        let mut migrator = Migrator::new();
        migrator.add(Migration::new(3, |_| {}, |_| {}));
        migrator.add(Migration::new(1, |_| {}, |_| {}));
        migrator.add(Migration::new(2, |_| {}, |_| {}));
        let versions: Vec<u64> = migrator.sorted().iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn up_schema_runs_the_up_closure() {
        let migration = Migration::new(
            1,
            |schema| {
                schema.create("widgets", |t| {
                    t.primary("id").autoincrement();
                });
            },
            |schema| schema.drop("widgets"),
        );
        let options = MigrateOptions {
            dialect: Dialect::Sqlite,
            ..Default::default()
        };
        let schema = migration.up_schema(&options);
        assert_eq!(schema.tables.len(), 1);
    }
}
