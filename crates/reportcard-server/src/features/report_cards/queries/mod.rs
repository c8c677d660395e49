pub mod aggregate;
pub mod latest;

pub use aggregate::{aggregate, SubjectRow};
pub use latest::{
    GetLatestReportCardError, GetLatestReportCardQuery, ReportCardDetail, ReportCardSubject,
};
