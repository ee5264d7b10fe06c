//! Student operations: validation, store calls and not-found mapping.

use crate::error::AppError;
use crate::model::{CreateStudentRequest, Student, UpdateStudentRequest};
use crate::service::RequestValidator;
use crate::store::StudentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn StudentStore> {
        &self.store
    }

    pub async fn create(&self, req: CreateStudentRequest) -> Result<Student, AppError> {
        let new = RequestValidator::validate_create(req)?;
        let student = self.store.insert(&new).await?;
        tracing::info!(id = student.id, "student created");
        Ok(student)
    }

    /// All students; order is whatever the store yields.
    pub async fn list(&self) -> Result<Vec<Student>, AppError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Student, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// Existence is checked before the payload, so an unknown id is 404 even
    /// when the body carries no recognised field.
    pub async fn update(&self, id: i32, req: UpdateStudentRequest) -> Result<Student, AppError> {
        self.get(id).await?;
        let patch = RequestValidator::validate_update(req)?;
        let student = self
            .store
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tracing::info!(id, "student updated");
        Ok(student)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(id.to_string()));
        }
        tracing::info!(id, "student deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStudentStore;

    fn service() -> StudentService {
        StudentService::new(Arc::new(MemoryStudentStore::new()))
    }

    fn alice() -> CreateStudentRequest {
        CreateStudentRequest {
            name: Some("Alice".into()),
            domain: Some("Computer Science".into()),
            gpa: Some(3.8),
            email: Some("alice@example.com".into()),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let svc = service();
        let created = svc.create(alice()).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.gpa, 3.8);
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let svc = service();
        let mut req = alice();
        req.gpa = None;
        assert!(matches!(svc.create(req).await, Err(AppError::Validation(_))));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_even_with_empty_body() {
        let svc = service();
        let err = svc
            .update(99, UpdateStudentRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_existing_with_empty_body_is_validation_error() {
        let svc = service();
        let s = svc.create(alice()).await.unwrap();
        let err = svc
            .update(s.id, UpdateStudentRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let svc = service();
        let s = svc.create(alice()).await.unwrap();
        svc.delete(s.id).await.unwrap();
        assert!(matches!(svc.delete(s.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.get(s.id).await, Err(AppError::NotFound(_))));
    }
}
