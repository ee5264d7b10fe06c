//! Request validation: typed optional input in, validated record or error out.

use crate::error::AppError;
use crate::model::{
    CreateStudentRequest, NewStudent, StudentPatch, UpdateStudentRequest, DOMAIN_MAX_LEN,
    EMAIL_MAX_LEN, NAME_MAX_LEN,
};

pub const MISSING_DATA: &str = "Missing data";
pub const NO_VALID_FIELDS: &str = "No valid fields provided";

pub struct RequestValidator;

impl RequestValidator {
    /// All four fields must be present. Lengths are checked only once presence holds.
    pub fn validate_create(req: CreateStudentRequest) -> Result<NewStudent, AppError> {
        let (Some(name), Some(domain), Some(gpa), Some(email)) =
            (req.name, req.domain, req.gpa, req.email)
        else {
            return Err(AppError::Validation(MISSING_DATA.into()));
        };
        check_len("name", &name, NAME_MAX_LEN)?;
        check_len("domain", &domain, DOMAIN_MAX_LEN)?;
        check_len("email", &email, EMAIL_MAX_LEN)?;
        Ok(NewStudent {
            name,
            domain,
            gpa,
            email,
        })
    }

    /// At least one recognised field must be present.
    pub fn validate_update(req: UpdateStudentRequest) -> Result<StudentPatch, AppError> {
        let patch = StudentPatch {
            name: req.name,
            domain: req.domain,
            gpa: req.gpa,
            email: req.email,
        };
        if patch.is_empty() {
            return Err(AppError::Validation(NO_VALID_FIELDS.into()));
        }
        if let Some(name) = &patch.name {
            check_len("name", name, NAME_MAX_LEN)?;
        }
        if let Some(domain) = &patch.domain {
            check_len("domain", domain, DOMAIN_MAX_LEN)?;
        }
        if let Some(email) = &patch.email {
            check_len("email", email, EMAIL_MAX_LEN)?;
        }
        Ok(patch)
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
