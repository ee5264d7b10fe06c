//! Student CRUD handlers.

use crate::error::AppError;
use crate::model::{CreateStudentRequest, Student, UpdateStudentRequest};
use crate::response::{self, MessageBody, STUDENT_ADDED, STUDENT_DELETED, STUDENT_UPDATED};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

pub const INVALID_JSON: &str = "Invalid JSON payload";
pub const INVALID_ID: &str = "Invalid student id";

type MessageResponse = (StatusCode, Json<MessageBody>);

fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<i32, AppError> {
    let Path(raw) = path.map_err(|_| AppError::BadRequest(INVALID_ID.into()))?;
    classify_id(&raw)
}

/// Integers outside the id range cannot name a stored row, so they are 404;
/// anything that is not an integer at all is 400.
fn classify_id(raw: &str) -> Result<i32, AppError> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(id);
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound(raw.to_string()));
    }
    Err(AppError::BadRequest(INVALID_ID.into()))
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(INVALID_JSON.into())
        }
    })
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(state.students.list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<MessageResponse, AppError> {
    let req = parse_body(body)?;
    state.students.create(req).await?;
    Ok(response::created(STUDENT_ADDED))
}

pub async fn read(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id(id)?;
    Ok(Json(state.students.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<MessageResponse, AppError> {
    let id = parse_id(id)?;
    let req = parse_body(body)?;
    state.students.update(id, req).await?;
    Ok(response::ok(STUDENT_UPDATED))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<MessageResponse, AppError> {
    let id = parse_id(id)?;
    state.students.delete(id).await?;
    Ok(response::ok(STUDENT_DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_ids_parse() {
        assert_eq!(classify_id("1").unwrap(), 1);
        assert_eq!(classify_id("-4").unwrap(), -4);
    }

    #[test]
    fn out_of_range_integers_are_not_found() {
        assert!(matches!(classify_id("3000000000"), Err(AppError::NotFound(_))));
        assert!(matches!(
            classify_id("-99999999999999999999999"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn non_integers_are_bad_requests() {
        for raw in ["abc", "1.5", "-", "12a", " 1"] {
            assert!(
                matches!(classify_id(raw), Err(AppError::BadRequest(_))),
                "{raw}"
            );
        }
    }
}
