/// Point-in-time result of auditing one table's data.
///
/// The flags answer "is this category violated anywhere"; the issue list
/// carries one human-readable diagnostic per finding. A check that could
/// not run appends a failure entry without setting its flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntegrityReport {
    pub has_null_violations: bool,

    pub has_unique_violations: bool,

    pub has_foreign_key_violations: bool,

    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        !self.has_null_violations
            && !self.has_unique_violations
            && !self.has_foreign_key_violations
            && self.issues.is_empty()
    }
}
