use crate::{quote_ident, Inspector, IntegrityReport};

use driftwood_core::driver::Connection;
use driftwood_core::{Error, Result};

use std::sync::Arc;
use tracing::warn;

/// Audits live row data for constraint violations the catalog's
/// structural metadata cannot reveal.
///
/// Checks run sequentially (null, then unique, then foreign-key) because
/// the later checks consume column and constraint lists produced by
/// catalog reads. The audit itself is best-effort: a failed check is
/// recorded as an issue and the remaining checks still run.
#[derive(Debug)]
pub struct Auditor {
    inspector: Inspector,
}

impl Auditor {
    pub fn new(conn: Arc<dyn Connection>) -> Auditor {
        Auditor {
            inspector: Inspector::new(conn),
        }
    }

    /// Shares an existing inspector's connection and type dictionary.
    pub fn from_inspector(inspector: Inspector) -> Auditor {
        Auditor { inspector }
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    /// Audits one table. Always returns a report; a check that could not
    /// run appends a failure entry without setting its flag.
    pub async fn check_table_integrity(&self, table: &str) -> IntegrityReport {
        let mut report = IntegrityReport::default();

        match self.null_violations(table).await {
            Ok(findings) => {
                report.has_null_violations = !findings.is_empty();
                report.issues.extend(findings);
            }
            Err(err) => {
                warn!(table, error = %err, "null-violation check failed");
                report
                    .issues
                    .push(format!("failed to check null violations: {err}"));
            }
        }

        match self.unique_violations(table).await {
            Ok(findings) => {
                report.has_unique_violations = !findings.is_empty();
                report.issues.extend(findings);
            }
            Err(err) => {
                warn!(table, error = %err, "unique-violation check failed");
                report
                    .issues
                    .push(format!("failed to check unique violations: {err}"));
            }
        }

        match self.foreign_key_violations(table).await {
            Ok(findings) => {
                report.has_foreign_key_violations = !findings.is_empty();
                report.issues.extend(findings);
            }
            Err(err) => {
                warn!(table, error = %err, "foreign-key-violation check failed");
                report
                    .issues
                    .push(format!("failed to check foreign key violations: {err}"));
            }
        }

        report
    }

    /// Rows holding NULL in a column that is declared NOT NULL and has no
    /// default. These exist when the constraint was added after the rows,
    /// or was declared in code but never enforced.
    async fn null_violations(&self, table: &str) -> Result<Vec<String>> {
        let fields = self.inspector.fields(table).await?;
        let mut findings = Vec::new();

        for field in fields
            .iter()
            .filter(|field| !field.nullable && field.default.is_none())
        {
            let sql = format!(
                "SELECT COUNT(*) AS count FROM {} WHERE {} IS NULL",
                quote_ident(table),
                quote_ident(&field.name),
            );
            let count = self.count(&sql).await?;
            if count > 0 {
                findings.push(format!(
                    "column \"{}\" has {} NULL value(s) but is declared NOT NULL",
                    field.name, count
                ));
            }
        }

        Ok(findings)
    }

    /// Duplicate non-null values in columns backed by a UNIQUE
    /// constraint.
    async fn unique_violations(&self, table: &str) -> Result<Vec<String>> {
        let constraints = self.inspector.constraints(table).await?;

        let mut columns: Vec<&str> = Vec::new();
        for constraint in constraints.iter().filter(|c| c.is_unique()) {
            for column in &constraint.fields {
                if !columns.contains(&column.as_str()) {
                    columns.push(column);
                }
            }
        }

        let mut findings = Vec::new();
        for column in columns {
            let sql = format!(
                "SELECT COUNT(*) AS count FROM ( \
                 SELECT {col} FROM {table} WHERE {col} IS NOT NULL \
                 GROUP BY {col} HAVING COUNT(*) > 1) AS duplicates",
                col = quote_ident(column),
                table = quote_ident(table),
            );
            let count = self.count(&sql).await?;
            if count > 0 {
                findings.push(format!(
                    "column \"{column}\" has {count} duplicated value(s) under a UNIQUE constraint"
                ));
            }
        }

        Ok(findings)
    }

    /// Non-null references with no matching row on the referenced side,
    /// e.g. left behind by a non-cascading delete.
    async fn foreign_key_violations(&self, table: &str) -> Result<Vec<String>> {
        let foreign_keys = self.inspector.foreign_keys(table).await?;
        let mut findings = Vec::new();

        for fk in &foreign_keys {
            let sql = format!(
                "SELECT COUNT(*) AS count FROM {table} AS src \
                 LEFT JOIN {target} AS dst ON src.{col} = dst.{target_col} \
                 WHERE src.{col} IS NOT NULL AND dst.{target_col} IS NULL",
                table = quote_ident(table),
                target = quote_ident(&fk.referenced_table),
                col = quote_ident(&fk.column),
                target_col = quote_ident(&fk.referenced_column),
            );
            let count = self.count(&sql).await?;
            if count > 0 {
                findings.push(format!(
                    "foreign key \"{}\" has {} dangling reference(s) to \"{}\"",
                    fk.constraint_name, count, fk.referenced_table
                ));
            }
        }

        Ok(findings)
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        let rows = self.inspector.connection().query(sql, &[]).await?;
        rows.first()
            .ok_or_else(|| Error::invalid_result("empty result for count query"))?
            .i64("count")
    }
}
