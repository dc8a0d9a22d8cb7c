pub mod diff;
pub use diff::{diff, DriftEntry};

pub mod expected;
pub use expected::ExpectedSchema;

pub mod generate;

pub mod live;
pub use live::LiveSchema;

pub mod name;
pub use name::{DictionaryPluralizer, Pluralize, SuffixPluralizer};

pub mod ty;
pub use ty::{FieldType, NativeTypeMap, TypeMap};
