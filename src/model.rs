//! Student entity and request payloads.

use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 50;
pub const DOMAIN_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 120;

/// A persisted student. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub domain: String,
    pub gpa: f64,
    pub email: String,
}

/// Body of `POST /students`. Every field is optional at the wire level so a
/// missing key becomes a validation error rather than a deserialization error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `PUT /students/{id}`. Unknown keys (including `id`) are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A fully validated record ready to insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub domain: String,
    pub gpa: f64,
    pub email: String,
}

/// A validated partial update; at least one field is set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub gpa: Option<f64>,
    pub email: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.domain.is_none() && self.gpa.is_none() && self.email.is_none()
    }

    /// Apply the set fields onto an existing record.
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name = name.clone();
        }
        if let Some(domain) = &self.domain {
            student.domain = domain.clone();
        }
        if let Some(gpa) = self.gpa {
            student.gpa = gpa;
        }
        if let Some(email) = &self.email {
            student.email = email.clone();
        }
    }
}

impl NewStudent {
    pub fn into_student(self, id: i32) -> Student {
        Student {
            id,
            name: self.name,
            domain: self.domain,
            gpa: self.gpa,
            email: self.email,
        }
    }
}
