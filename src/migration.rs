//! Schema bootstrap for the `students` table.
//! Each step runs once and is recorded in `schema_migrations`.

use crate::error::AppError;
use sqlx::PgPool;

/// Advisory lock key serializing concurrent replicas running migrations.
const MIGRATION_LOCK_KEY: i64 = 0x5354_5544_454e_5453;

pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create students table",
    sql: r#"
        CREATE TABLE IF NOT EXISTS students (
            id     SERIAL PRIMARY KEY,
            name   VARCHAR(50)  NOT NULL,
            domain VARCHAR(50)  NOT NULL,
            gpa    DOUBLE PRECISION NOT NULL,
            email  VARCHAR(120) NOT NULL,
            CONSTRAINT students_email_key UNIQUE (email)
        )
    "#,
}];

/// Apply every migration not yet recorded. Returns the versions applied by this call.
/// Runs in one transaction under an advisory lock so concurrent replicas serialize.
pub async fn apply_migrations(pool: &PgPool) -> Result<Vec<i32>, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    let done: Vec<i32> = sqlx::query_as::<_, (i32,)>("SELECT version FROM schema_migrations")
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(v,)| v)
        .collect();

    let mut applied = Vec::new();
    for m in pending(MIGRATIONS, &done) {
        sqlx::query(m.sql).execute(&mut *tx).await?;
        sqlx::query(
            "INSERT INTO schema_migrations (version, description, applied_at) VALUES ($1, $2, $3)",
        )
        .bind(m.version)
        .bind(m.description)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await?;
        tracing::info!(version = m.version, description = m.description, "migration applied");
        applied.push(m.version);
    }
    tx.commit().await?;
    Ok(applied)
}

fn pending<'a>(all: &'a [Migration], done: &[i32]) -> Vec<&'a Migration> {
    let mut out: Vec<&Migration> = all.iter().filter(|m| !done.contains(&m.version)).collect();
    out.sort_by_key(|m| m.version);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_unique_and_positive() {
        let mut seen = std::collections::HashSet::new();
        for m in MIGRATIONS {
            assert!(m.version > 0);
            assert!(seen.insert(m.version), "duplicate version {}", m.version);
        }
    }

    #[test]
    fn pending_skips_applied_and_sorts() {
        let all = [
            Migration { version: 3, description: "c", sql: "" },
            Migration { version: 1, description: "a", sql: "" },
            Migration { version: 2, description: "b", sql: "" },
        ];
        let todo: Vec<i32> = pending(&all, &[1]).iter().map(|m| m.version).collect();
        assert_eq!(todo, vec![2, 3]);
    }

    #[test]
    fn students_table_enforces_email_uniqueness() {
        let sql = MIGRATIONS[0].sql;
        assert!(sql.contains("UNIQUE (email)"));
        assert!(sql.contains("SERIAL PRIMARY KEY"));
    }
}
