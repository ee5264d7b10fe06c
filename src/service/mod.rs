//! StudentService: the resource operations behind the HTTP handlers.

mod students;
mod validation;
pub use students::StudentService;
pub use validation::{RequestValidator, MISSING_DATA, NO_VALID_FIELDS};
