//! Process-local store. One mutex guards the whole table so the email
//! uniqueness check and the write are a single atomic step.

use super::StudentStore;
use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Default)]
struct Table {
    /// Last id handed out. Ids are never reused, even after delete.
    last_id: i32,
    rows: BTreeMap<i32, Student>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|s| s.email == email && Some(s.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryStudentStore {
    table: Mutex<Table>,
    unavailable: AtomicBool,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the backend could not be reached.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("memory store marked unavailable".into()));
        }
        Ok(())
    }
}

fn duplicate_email(email: &str) -> AppError {
    AppError::Conflict(format!("email '{}' already exists", email))
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }

    async fn list(&self) -> Result<Vec<Student>, AppError> {
        self.check_available()?;
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Student>, AppError> {
        self.check_available()?;
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, AppError> {
        self.check_available()?;
        let mut table = self.table.lock().await;
        if table.email_taken(&student.email, None) {
            return Err(duplicate_email(&student.email));
        }
        table.last_id += 1;
        let row = student.clone().into_student(table.last_id);
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, patch: &StudentPatch) -> Result<Option<Student>, AppError> {
        self.check_available()?;
        let mut table = self.table.lock().await;
        if let Some(email) = &patch.email {
            if table.rows.contains_key(&id) && table.email_taken(email, Some(id)) {
                return Err(duplicate_email(email));
            }
        }
        Ok(table.rows.get_mut(&id).map(|row| {
            patch.apply_to(row);
            row.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        self.check_available()?;
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }

    async fn close(&self) {}
}
