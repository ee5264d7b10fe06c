//! Persistence seam for students. The handle is built once at start-up and shared.

mod memory;
mod postgres;

pub use memory::MemoryStudentStore;
pub use postgres::{connect_pool, ensure_database_exists, PgStudentStore};

use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentPatch};
use async_trait::async_trait;

/// Storage operations for the `students` table.
///
/// Implementations own atomicity and email uniqueness; a duplicate email must
/// surface as [`AppError::Conflict`] and leave no partial write behind.
#[async_trait]
pub trait StudentStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list(&self) -> Result<Vec<Student>, AppError>;

    async fn get(&self, id: i32) -> Result<Option<Student>, AppError>;

    async fn insert(&self, student: &NewStudent) -> Result<Student, AppError>;

    /// Returns `None` when no row has this id.
    async fn update(&self, id: i32, patch: &StudentPatch) -> Result<Option<Student>, AppError>;

    /// Returns `false` when no row has this id.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    /// Release underlying connections. Called once on shutdown.
    async fn close(&self);
}
