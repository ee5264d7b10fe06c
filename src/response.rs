//! Response body helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const STUDENT_ADDED: &str = "Student added successfully!";
pub const STUDENT_UPDATED: &str = "Student updated successfully!";
pub const STUDENT_DELETED: &str = "Student deleted successfully!";

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

pub fn message(status: StatusCode, message: &'static str) -> (StatusCode, Json<MessageBody>) {
    (status, Json(MessageBody { message }))
}

pub fn created(msg: &'static str) -> (StatusCode, Json<MessageBody>) {
    message(StatusCode::CREATED, msg)
}

pub fn ok(msg: &'static str) -> (StatusCode, Json<MessageBody>) {
    message(StatusCode::OK, msg)
}
