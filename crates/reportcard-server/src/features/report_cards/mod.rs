//! Report cards: recording marks in batches, issuing report cards and
//! reading back the latest one

pub mod assembler;
pub mod commands;
pub mod queries;
pub mod routes;

pub use assembler::{build_context, DocumentContext};
pub use commands::{
    GenerateReportCardCommand, GenerateReportCardError, SubmitSubjectsCommand,
    SubmitSubjectsError,
};
pub use queries::{
    aggregate, GetLatestReportCardError, GetLatestReportCardQuery, ReportCardDetail, SubjectRow,
};
pub use routes::report_cards_routes;
