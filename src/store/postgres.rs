//! PostgreSQL-backed store over a shared `PgPool`.

use super::StudentStore;
use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentPatch};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

const SELECT_COLUMNS: &str = "id, name, domain, gpa, email";

pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Student>, AppError> {
        let sql = format!("SELECT {} FROM students ORDER BY id", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Student>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<Student>, AppError> {
        let sql = format!("SELECT {} FROM students WHERE id = $1", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, AppError> {
        let sql = format!(
            "INSERT INTO students (name, domain, gpa, email) VALUES ($1, $2, $3, $4) RETURNING {}",
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(&student.name)
            .bind(&student.domain)
            .bind(student.gpa)
            .bind(&student.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, patch: &StudentPatch) -> Result<Option<Student>, AppError> {
        // NULL parameters keep the stored value, so one statement covers every subset.
        let sql = format!(
            "UPDATE students SET \
             name = COALESCE($2, name), \
             domain = COALESCE($3, domain), \
             gpa = COALESCE($4, gpa), \
             email = COALESCE($5, email) \
             WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(patch.name.as_deref())
            .bind(patch.domain.as_deref())
            .bind(patch.gpa)
            .bind(patch.email.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        tracing::debug!(id, "delete student");
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Build the pool from configuration. Acquisition and statements are both bounded
/// so a stalled database cannot pin every request worker.
pub async fn connect_pool(db: &DatabaseConfig) -> Result<PgPool, AppError> {
    let options = db
        .connect_options()?
        .options([(
            "statement_timeout",
            format!("{}ms", db.statement_timeout.as_millis()),
        )]);
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(db.acquire_timeout)
        .connect_with(options)
        .await?;
    tracing::info!(
        max_connections = db.max_connections,
        database = %db.database_name().unwrap_or_default(),
        "database pool ready"
    );
    Ok(pool)
}

/// Ensure the target database exists; create it if not. Connects to the
/// `postgres` maintenance database to run CREATE DATABASE. Call before [`connect_pool`].
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), AppError> {
    let db_name = options.get_database().unwrap_or_default().to_string();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = options.clone().database("postgres").connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("students"), "\"students\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
