pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateStudentCommand, CreateStudentError, DeleteStudentCommand, DeleteStudentError,
    DeleteStudentResponse, NewStudent,
};
pub use queries::{GetStudentError, GetStudentQuery};
pub use routes::students_routes;
