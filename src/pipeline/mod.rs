pub mod bucket;
pub mod import;
pub mod merge;
pub mod schema;
pub mod tokenize;

pub use bucket::bucket;
pub use import::{parse_day_csv, parse_week_csv, ParseOutcome};
pub use merge::combine;
pub use schema::CsvSchema;
pub use tokenize::tokenize;
