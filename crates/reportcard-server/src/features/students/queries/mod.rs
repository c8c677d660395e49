pub mod get;

pub use get::{GetStudentError, GetStudentQuery};
