//! Read-only inspection of a live database.
//!
//! Two components with deliberately different failure policies:
//!
//! - [`Inspector`] reads the catalog and fails fast: structural
//!   introspection must not silently report wrong structure, so every
//!   query failure is wrapped with operation + table context and
//!   propagated. No retries, no partial results.
//! - [`Auditor`] reads row data and never fails outright: a partial
//!   integrity report is strictly more useful to an operator than an
//!   all-or-nothing failure, so individual check failures become issue
//!   entries in the report.

mod auditor;
mod inspector;
mod report;

pub use auditor::Auditor;
pub use inspector::{Inspector, SYSTEM_TABLES};
pub use report::IntegrityReport;

/// Quotes an identifier for interpolation into a statement. Identifiers
/// cannot be bound as parameters.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_ident;

    #[test]
    fn quoting_escapes_embedded_quotes() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
