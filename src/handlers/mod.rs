//! HTTP handlers for the student resource and operational endpoints.

pub mod common;
pub mod students;
