//! Schema reconciliation and integrity auditing.
//!
//! Driftwood keeps a code-declared data model and a live relational
//! database provably consistent. The generator derives an
//! [`ExpectedSchema`] from abstract type declarations, the
//! [`Inspector`] reads the actual structure back from the database
//! catalog, [`diff`] reports the drift between the two, and the
//! [`Auditor`] finds row data that violates declared constraints.
//!
//! ```no_run
//! use driftwood::{diff, generate, Auditor, Inspector};
//! use std::sync::Arc;
//!
//! # async fn run(conn: Arc<dyn driftwood::Connection>) -> driftwood::Result<()> {
//! let declarations = serde_json::from_str(r#"{
//!     "User": { "id": "string", "email": "string" }
//! }"#)?;
//!
//! let expected = generate::generate_schema(&declarations);
//!
//! let inspector = Inspector::new(conn.clone());
//! let actual = inspector.schema().await?;
//!
//! for entry in diff(&expected, &actual) {
//!     println!("{entry}");
//! }
//!
//! let report = Auditor::new(conn).check_table_integrity("users").await;
//! assert!(report.is_clean());
//! # Ok(())
//! # }
//! ```

pub use driftwood_core::{
    driver, schema, Connection, Error, ExpectedSchema, LiveSchema, Result,
};

pub use driftwood_core::schema::{diff::diff, diff::DriftEntry, generate};

pub use driftwood_inspect::{Auditor, Inspector, IntegrityReport, SYSTEM_TABLES};

#[cfg(feature = "postgresql")]
pub use driftwood_driver_postgresql::PostgreSQL;
