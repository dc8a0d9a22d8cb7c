use driftwood_core::driver::{Connection, Value};
use driftwood_core::schema::live::{
    ForeignKey, LiveConstraint, LiveField, LiveIndex, LiveSchema, LiveTable, TableStats,
};
use driftwood_core::schema::ty::NativeTypeMap;
use driftwood_core::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Tables that belong to the system rather than to any declared
/// collection; never reported as orphans.
pub const SYSTEM_TABLES: &[&str] = &["migrations", "schema_migrations", "spatial_ref_sys"];

const COLUMNS_SQL: &str = "\
SELECT column_name, data_type, is_nullable, column_default \
FROM information_schema.columns \
WHERE table_schema = 'public' AND table_name = $1 \
ORDER BY ordinal_position";

// pg_index rather than information_schema so member columns come back in
// index ordinal position; the implicit primary-key index is excluded and
// surfaced via constraints instead.
const INDEXES_SQL: &str = "\
SELECT i.relname AS index_name, ix.indisunique AS is_unique, a.attname AS column_name \
FROM pg_class t \
JOIN pg_index ix ON t.oid = ix.indrelid \
JOIN pg_class i ON i.oid = ix.indexrelid \
JOIN LATERAL unnest(ix.indkey) WITH ORDINALITY AS ord(attnum, ordinality) ON true \
JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ord.attnum \
WHERE t.relname = $1 AND NOT ix.indisprimary \
ORDER BY index_name, ord.ordinality";

const CONSTRAINTS_SQL: &str = "\
SELECT tc.constraint_name, tc.constraint_type, kcu.column_name \
FROM information_schema.table_constraints tc \
JOIN information_schema.key_column_usage kcu \
  ON tc.constraint_name = kcu.constraint_name AND tc.table_name = kcu.table_name \
WHERE tc.table_schema = 'public' AND tc.table_name = $1 \
ORDER BY tc.constraint_name, kcu.ordinal_position";

const EXISTS_SQL: &str = "\
SELECT EXISTS ( \
  SELECT 1 FROM information_schema.tables \
  WHERE table_schema = 'public' AND table_name = $1 \
) AS present";

const TABLES_SQL: &str = "\
SELECT table_name FROM information_schema.tables \
WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
  AND table_name NOT LIKE 'pg\\_%' AND table_name NOT LIKE 'sql\\_%' \
ORDER BY table_name";

const STATS_SQL: &str = "\
SELECT c.reltuples::bigint AS row_estimate, \
       pg_total_relation_size(c.oid) AS total_bytes, \
       pg_table_size(c.oid) AS table_bytes, \
       pg_indexes_size(c.oid) AS index_bytes \
FROM pg_class c \
JOIN pg_namespace n ON n.oid = c.relnamespace \
WHERE n.nspname = 'public' AND c.relname = $1";

const FOREIGN_KEYS_SQL: &str = "\
SELECT tc.constraint_name, kcu.column_name, \
       ccu.table_name AS referenced_table, ccu.column_name AS referenced_column, \
       rc.delete_rule, rc.update_rule \
FROM information_schema.table_constraints tc \
JOIN information_schema.key_column_usage kcu \
  ON tc.constraint_name = kcu.constraint_name AND tc.table_name = kcu.table_name \
JOIN information_schema.constraint_column_usage ccu \
  ON ccu.constraint_name = tc.constraint_name \
JOIN information_schema.referential_constraints rc \
  ON rc.constraint_name = tc.constraint_name \
WHERE tc.table_schema = 'public' AND tc.table_name = $1 \
  AND tc.constraint_type = 'FOREIGN KEY' \
ORDER BY tc.constraint_name";

/// Reads the actual structure of the database from its catalog.
///
/// Every operation is a plain read: no transactions, no locks, no caching.
/// Each invocation re-queries the catalog, trading latency for
/// always-current results.
#[derive(Debug)]
pub struct Inspector {
    conn: Arc<dyn Connection>,
    types: NativeTypeMap,
}

impl Inspector {
    pub fn new(conn: Arc<dyn Connection>) -> Inspector {
        Inspector {
            conn,
            types: NativeTypeMap::default(),
        }
    }

    /// Uses a custom native-type dictionary, for catalogs whose type
    /// names differ from the defaults.
    pub fn with_native_types(conn: Arc<dyn Connection>, types: NativeTypeMap) -> Inspector {
        Inspector { conn, types }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.conn
    }

    /// Actual structure of one table.
    ///
    /// The three catalog queries run concurrently; if any fails the whole
    /// call fails, partial results are never returned. A nonexistent
    /// table yields empty lists, not an error.
    pub async fn table_schema(&self, table: &str) -> Result<LiveTable> {
        debug!(table, "introspecting table");

        let (fields, indexes, constraints) = tokio::try_join!(
            self.fields(table),
            self.indexes(table),
            self.constraints(table),
        )?;

        Ok(LiveTable {
            name: table.to_string(),
            fields,
            indexes,
            constraints,
        })
    }

    /// Actual structure of every base table in the working schema.
    pub async fn schema(&self) -> Result<LiveSchema> {
        let mut tables = Vec::new();
        for name in self.list_tables().await? {
            tables.push(self.table_schema(&name).await?);
        }
        Ok(LiveSchema { tables })
    }

    pub async fn fields(&self, table: &str) -> Result<Vec<LiveField>> {
        self.try_fields(table)
            .await
            .map_err(|err| err.context(Error::catalog("columns", Some(table))))
    }

    async fn try_fields(&self, table: &str) -> Result<Vec<LiveField>> {
        let rows = self.conn.query(COLUMNS_SQL, &[Value::from(table)]).await?;

        rows.iter()
            .map(|row| {
                Ok(LiveField {
                    name: row.string("column_name")?,
                    ty: self.types.normalize(row.str("data_type")?),
                    nullable: row.str("is_nullable")? == "YES",
                    default: row.opt_str("column_default")?.map(String::from),
                })
            })
            .collect()
    }

    pub async fn indexes(&self, table: &str) -> Result<Vec<LiveIndex>> {
        self.try_indexes(table)
            .await
            .map_err(|err| err.context(Error::catalog("indexes", Some(table))))
    }

    async fn try_indexes(&self, table: &str) -> Result<Vec<LiveIndex>> {
        let rows = self.conn.query(INDEXES_SQL, &[Value::from(table)]).await?;

        let mut indexes: IndexMap<String, LiveIndex> = IndexMap::new();
        for row in &rows {
            let name = row.string("index_name")?;
            let unique = row.bool("is_unique")?;
            let column = row.string("column_name")?;

            indexes
                .entry(name.clone())
                .or_insert_with(|| LiveIndex {
                    name,
                    fields: Vec::new(),
                    unique,
                })
                .fields
                .push(column);
        }

        Ok(indexes.into_values().collect())
    }

    pub async fn constraints(&self, table: &str) -> Result<Vec<LiveConstraint>> {
        self.try_constraints(table)
            .await
            .map_err(|err| err.context(Error::catalog("constraints", Some(table))))
    }

    async fn try_constraints(&self, table: &str) -> Result<Vec<LiveConstraint>> {
        let rows = self
            .conn
            .query(CONSTRAINTS_SQL, &[Value::from(table)])
            .await?;

        let mut constraints: IndexMap<String, LiveConstraint> = IndexMap::new();
        for row in &rows {
            let name = row.string("constraint_name")?;
            let kind = row.string("constraint_type")?;
            let column = row.string("column_name")?;

            constraints
                .entry(name.clone())
                .or_insert_with(|| LiveConstraint {
                    name,
                    kind,
                    fields: Vec::new(),
                })
                .fields
                .push(column);
        }

        Ok(constraints.into_values().collect())
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        self.try_table_exists(table)
            .await
            .map_err(|err| err.context(Error::catalog("existence", Some(table))))
    }

    async fn try_table_exists(&self, table: &str) -> Result<bool> {
        let rows = self.conn.query(EXISTS_SQL, &[Value::from(table)]).await?;
        rows.first()
            .ok_or_else(|| Error::invalid_result("empty result for existence check"))?
            .bool("present")
    }

    /// Base tables in the working schema, excluding catalog-prefixed
    /// names.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        self.try_list_tables()
            .await
            .map_err(|err| err.context(Error::catalog("tables", None)))
    }

    async fn try_list_tables(&self) -> Result<Vec<String>> {
        let rows = self.conn.query(TABLES_SQL, &[]).await?;
        rows.iter().map(|row| row.string("table_name")).collect()
    }

    /// Planner-estimated row count and storage sizes for one table.
    pub async fn table_stats(&self, table: &str) -> Result<TableStats> {
        self.try_table_stats(table)
            .await
            .map_err(|err| err.context(Error::catalog("statistics", Some(table))))
    }

    async fn try_table_stats(&self, table: &str) -> Result<TableStats> {
        let rows = self.conn.query(STATS_SQL, &[Value::from(table)]).await?;
        let row = rows
            .first()
            .ok_or_else(|| Error::invalid_result("table not present in pg_class"))?;

        Ok(TableStats {
            row_estimate: row.i64("row_estimate")?,
            total_bytes: row.i64("total_bytes")?,
            table_bytes: row.i64("table_bytes")?,
            index_bytes: row.i64("index_bytes")?,
        })
    }

    pub async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        self.try_foreign_keys(table)
            .await
            .map_err(|err| err.context(Error::catalog("foreign keys", Some(table))))
    }

    async fn try_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let rows = self
            .conn
            .query(FOREIGN_KEYS_SQL, &[Value::from(table)])
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ForeignKey {
                    constraint_name: row.string("constraint_name")?,
                    column: row.string("column_name")?,
                    referenced_table: row.string("referenced_table")?,
                    referenced_column: row.string("referenced_column")?,
                    on_delete: row.string("delete_rule")?,
                    on_update: row.string("update_rule")?,
                })
            })
            .collect()
    }

    /// Catalog tables that are neither declared collections nor system
    /// tables.
    pub async fn orphaned_tables(&self, declared: &[String]) -> Result<Vec<String>> {
        let tables = self.list_tables().await?;
        let declared: HashSet<&str> = declared.iter().map(String::as_str).collect();

        let orphans: Vec<String> = tables
            .into_iter()
            .filter(|table| !declared.contains(table.as_str()))
            .filter(|table| !SYSTEM_TABLES.contains(&table.as_str()))
            .collect();

        if !orphans.is_empty() {
            debug!(count = orphans.len(), "found orphaned tables");
        }
        Ok(orphans)
    }
}
