//! Build the context the report card template is rendered with

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::queries::SubjectRow;
use crate::models::Student;

/// Shown in place of a subject code that was never set
pub const MISSING_CODE: &str = "-";

/// Everything the `report_card` template can reference.
///
/// Every field is always present; strict-mode templates fail on gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentContext {
    pub student: StudentIdentity,
    pub subjects: Vec<DocumentSubject>,
    pub final_comments: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentIdentity {
    pub name: String,
    pub roll_number: String,
    pub class: String,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSubject {
    pub subject_name: String,
    pub subject_code: String,
    /// Two decimals, e.g. `88.00`
    pub marks: String,
}

pub fn build_context(
    student: &Student,
    rows: &[SubjectRow],
    final_comments: Option<&str>,
    generated_at: DateTime<Utc>,
) -> DocumentContext {
    DocumentContext {
        student: StudentIdentity {
            name: student.name.clone(),
            roll_number: student.roll_number.clone(),
            class: student.class.clone(),
            section: student.section.clone(),
        },
        subjects: rows
            .iter()
            .map(|row| DocumentSubject {
                subject_name: row.subject_name.clone(),
                subject_code: row
                    .subject_code
                    .clone()
                    .unwrap_or_else(|| MISSING_CODE.to_string()),
                marks: row.marks.to_string(),
            })
            .collect(),
        final_comments: final_comments.unwrap_or_default().trim().to_string(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reportcard_common::Marks;
    use uuid::Uuid;

    fn student() -> Student {
        Student {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            roll_number: "R1".to_string(),
            class: "5".to_string(),
            section: "A".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_context() {
        let rows = vec![
            SubjectRow {
                subject_name: "Math".to_string(),
                subject_code: None,
                marks: Marks::from_hundredths(8800).unwrap(),
            },
            SubjectRow {
                subject_name: "Physics".to_string(),
                subject_code: Some("PHY".to_string()),
                marks: Marks::from_hundredths(7525).unwrap(),
            },
        ];
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 10, 30, 0).unwrap();

        let context = build_context(&student(), &rows, Some(" Good "), at);

        assert_eq!(context.student.name, "Asha");
        assert_eq!(context.student.section, "A");
        assert_eq!(context.subjects[0].subject_code, MISSING_CODE);
        assert_eq!(context.subjects[0].marks, "88.00");
        assert_eq!(context.subjects[1].subject_code, "PHY");
        assert_eq!(context.subjects[1].marks, "75.25");
        assert_eq!(context.final_comments, "Good");
        assert_eq!(context.generated_at, "2025-03-04 10:30 UTC");
    }

    #[test]
    fn test_build_context_without_comments_or_subjects() {
        let context = build_context(&student(), &[], None, Utc::now());
        assert!(context.subjects.is_empty());
        assert_eq!(context.final_comments, "");
    }
}
