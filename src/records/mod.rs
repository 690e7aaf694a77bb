pub mod csv;
mod generate;
mod import;
mod record;
mod store;

pub use generate::{REPOSITORIES, XorShift64, generate};
pub use import::{Candidate, normalize_repo, parse_csv_records, parse_json_records, read_records};
pub use record::{Choice, ComparisonRecord};
pub use store::{IngestReport, RecordStore};
