use super::Error;

/// Error raised while introspecting the database catalog.
///
/// Carries the failed operation and, when the operation targets a single
/// table, the table name. The underlying query failure is attached as the
/// error's cause.
#[derive(Debug)]
pub(super) struct CatalogError {
    pub(super) operation: String,
    pub(super) table: Option<String>,
}

impl std::error::Error for CatalogError {}

impl core::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.table {
            Some(table) => write!(
                f,
                "failed to introspect {} for table `{}`",
                self.operation, table
            ),
            None => write!(f, "failed to introspect {}", self.operation),
        }
    }
}

impl Error {
    /// Creates an error describing a failed catalog operation.
    pub fn catalog(operation: impl Into<String>, table: Option<&str>) -> Error {
        Error::from(super::ErrorKind::Catalog(CatalogError {
            operation: operation.into(),
            table: table.map(String::from),
        }))
    }

    /// Returns `true` if this error is a catalog introspection error.
    pub fn is_catalog(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Catalog(_))
    }
}
