//! Subject lookup-or-insert by exact name

use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::models::Subject;

pub const NAME_MAX_LENGTH: usize = 100;

/// Return the subject called `name`, creating it if it does not exist.
///
/// A single upsert statement, so concurrent callers with the same name
/// converge on one row. The no-op `DO UPDATE` is what makes `RETURNING`
/// yield the existing row on conflict. `name` is expected to be validated.
#[tracing::instrument(skip(executor))]
pub async fn get_or_create<'e, E>(executor: E, name: &str) -> sqlx::Result<Subject>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Subject>(
        r#"
        INSERT INTO subjects (id, name, code)
        VALUES (?, ?, NULL)
        ON CONFLICT (name) DO UPDATE SET name = excluded.name
        RETURNING id, name, code
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(executor)
    .await
}
