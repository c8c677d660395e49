pub mod commands;
pub mod queries;

pub use commands::upsert::{upsert, StudentSubjectUpsert};
pub use queries::list::{list_for_student, StudentSubjectDetail};
