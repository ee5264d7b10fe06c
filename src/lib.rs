//! Student service: CRUD REST API over a single `students` table.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{Config, DatabaseConfig, HttpConfig, StoreBackend};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::{CreateStudentRequest, Student, UpdateStudentRequest};
pub use routes::{app, common_routes, student_routes};
pub use service::StudentService;
pub use state::AppState;
pub use store::{connect_pool, ensure_database_exists, MemoryStudentStore, PgStudentStore, StudentStore};
