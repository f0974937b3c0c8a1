use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{InsertError, StudentStore};
use crate::models::{Student, StudentDraft};

/// Keeps profiles in a map keyed by `user_id`. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryStudentStore {
    students: RwLock<HashMap<i32, Student>>,
    next_id: AtomicI32,
}

impl Default for MemoryStudentStore {
    fn default() -> Self {
        Self {
            students: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find_by_user_id(&self, user_id: i32) -> anyhow::Result<Option<Student>> {
        Ok(self.students.read().await.get(&user_id).cloned())
    }

    async fn commit(&self, student: &Student) -> anyhow::Result<()> {
        let mut students = self.students.write().await;
        match students.get_mut(&student.user_id) {
            Some(stored) => {
                *stored = Student {
                    student_id: stored.student_id,
                    ..student.clone()
                };
                Ok(())
            }
            None => bail!("No student row for user {}", student.user_id),
        }
    }

    async fn insert(&self, draft: StudentDraft) -> Result<Student, InsertError> {
        let mut students = self.students.write().await;
        if students.contains_key(&draft.user_id) {
            return Err(InsertError::Duplicate);
        }
        let student_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let student = draft.into_student(student_id);
        students.insert(student.user_id, student.clone());
        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(user_id: i32) -> StudentDraft {
        StudentDraft {
            user_id,
            university: "X".to_string(),
            degree: String::new(),
            gpa: 3.0,
            skills: String::new(),
            gender: String::new(),
            nic_document_path: String::new(),
            is_verified: false,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStudentStore::new();
        let a = store.insert(draft(7)).await.unwrap();
        let b = store.insert(draft(8)).await.unwrap();
        assert_eq!(a.student_id, 1);
        assert_eq!(b.student_id, 2);
        assert_eq!(store.find_by_user_id(8).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_user() {
        let store = MemoryStudentStore::new();
        store.insert(draft(7)).await.unwrap();
        assert!(matches!(
            store.insert(draft(7)).await,
            Err(InsertError::Duplicate)
        ));
    }

    #[tokio::test]
    async fn commit_replaces_fields_but_not_student_id() {
        let store = MemoryStudentStore::new();
        let mut student = store.insert(draft(7)).await.unwrap();
        student.university = "Y".to_string();
        student.student_id = 42;
        store.commit(&student).await.unwrap();

        let stored = store.find_by_user_id(7).await.unwrap().unwrap();
        assert_eq!(stored.university, "Y");
        assert_eq!(stored.student_id, 1);
    }

    #[tokio::test]
    async fn commit_fails_for_unknown_user() {
        let store = MemoryStudentStore::new();
        let student = draft(9).into_student(1);
        assert!(store.commit(&student).await.is_err());
        assert_eq!(store.find_by_user_id(9).await.unwrap(), None);
    }
}
