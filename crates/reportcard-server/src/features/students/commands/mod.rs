pub mod create;
pub mod delete;

pub use create::{CreateStudentCommand, CreateStudentError, NewStudent};
pub use delete::{DeleteStudentCommand, DeleteStudentError, DeleteStudentResponse};
