use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::ResumeRow;
use crate::models::user::User;

pub struct NewResume<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub template_id: &'a str,
    pub content: &'a Value,
}

/// Fields a resume update may change; `None` keeps the stored value.
#[derive(Default)]
pub struct ResumeChanges<'a> {
    pub title: Option<&'a str>,
    pub template_id: Option<&'a str>,
    pub content: Option<&'a Value>,
}

pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_resume(pool: &PgPool, new: NewResume<'_>) -> Result<ResumeRow, sqlx::Error> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, title, template_id, content)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.title)
    .bind(new.template_id)
    .bind(new.content)
    .fetch_one(pool)
    .await?;

    info!("Created resume {} for user {}", row.id, row.user_id);
    Ok(row)
}

pub async fn get_resume(pool: &PgPool, resume_id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_resume(
    pool: &PgPool,
    resume_id: Uuid,
    changes: ResumeChanges<'_>,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET title       = COALESCE($2, title),
            template_id = COALESCE($3, template_id),
            content     = COALESCE($4, content),
            updated_at  = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(changes.title)
    .bind(changes.template_id)
    .bind(changes.content)
    .fetch_optional(pool)
    .await
}

/// Returns `false` if no such resume existed.
pub async fn delete_resume(pool: &PgPool, resume_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(resume_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Makes a resume public. An existing slug is kept so links already handed
/// out keep working.
pub async fn enable_sharing(
    pool: &PgPool,
    resume_id: Uuid,
    new_slug: &str,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET is_public  = TRUE,
            share_slug = COALESCE(share_slug, $2),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(new_slug)
    .fetch_optional(pool)
    .await
}

pub async fn disable_sharing(pool: &PgPool, resume_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE resumes SET is_public = FALSE, updated_at = NOW() WHERE id = $1",
    )
    .bind(resume_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_public_resume(pool: &PgPool, slug: &str) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE share_slug = $1 AND is_public = TRUE",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}
