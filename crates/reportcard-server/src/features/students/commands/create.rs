use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::api::response::FieldErrors;
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{deserialize_present, validate_json_text};
use crate::models::Student;

pub const NAME_MAX_LENGTH: usize = 100;
pub const ROLL_NUMBER_MAX_LENGTH: usize = 20;
pub const CLASS_MAX_LENGTH: usize = 20;
pub const SECTION_MAX_LENGTH: usize = 5;

pub const DUPLICATE_ROLL_NUMBER: &str = "student with this roll number already exists.";

/// Fields are untyped JSON so that a missing or mistyped field is reported
/// per field instead of failing JSON extraction as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStudentCommand {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub roll_number: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub class: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub section: Option<Value>,
}

/// A validated, trimmed student ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub roll_number: String,
    pub class: String,
    pub section: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateStudentError {
    #[error("Invalid student: {0}")]
    Validation(FieldErrors),
    #[error("Student with roll number '{0}' already exists")]
    DuplicateRollNumber(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateStudentError {
    /// Field-keyed messages for the 400 body
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::DuplicateRollNumber(_) => {
                Some(FieldErrors::single("roll_number", DUPLICATE_ROLL_NUMBER))
            },
            Self::Database(_) => None,
        }
    }
}

impl CreateStudentCommand {
    /// Check every field and collect all failures at once
    pub fn validate(&self) -> Result<NewStudent, CreateStudentError> {
        let mut errors = FieldErrors::new();
        let mut field = |key: &str, value: &Option<Value>, max_length: usize| {
            validate_json_text(value.as_ref(), max_length)
                .map_err(|e| errors.add(key, e.to_string()))
                .ok()
        };

        let name = field("name", &self.name, NAME_MAX_LENGTH);
        let roll_number = field("roll_number", &self.roll_number, ROLL_NUMBER_MAX_LENGTH);
        let class = field("class", &self.class, CLASS_MAX_LENGTH);
        let section = field("section", &self.section, SECTION_MAX_LENGTH);

        match (name, roll_number, class, section) {
            (Some(name), Some(roll_number), Some(class), Some(section)) => Ok(NewStudent {
                name,
                roll_number,
                class,
                section,
            }),
            _ => Err(CreateStudentError::Validation(errors)),
        }
    }
}

#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: SqlitePool,
    command: CreateStudentCommand,
) -> Result<Student, CreateStudentError> {
    let new_student = command.validate()?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (id, name, roll_number, class, section, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, name, roll_number, class, section, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_student.name)
    .bind(&new_student.roll_number)
    .bind(&new_student.class)
    .bind(&new_student.section)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CreateStudentError::DuplicateRollNumber(new_student.roll_number.clone()),
            CreateStudentError::Database,
        )
    })?;

    tracing::info!(student_id = %student.id, roll_number = %student.roll_number, "Student created");

    Ok(student)
}
