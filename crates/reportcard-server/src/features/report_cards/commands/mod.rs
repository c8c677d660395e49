pub mod create;
pub mod generate;
pub mod submit_subjects;

pub use generate::{GenerateReportCardCommand, GenerateReportCardError, GeneratedReportCard};
pub use submit_subjects::{
    SubjectEntry, SubmitSubjectsCommand, SubmitSubjectsError, SubmitSubjectsResponse,
    SubmittedReportCard,
};
