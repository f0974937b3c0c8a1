pub mod memory;
pub mod pg;

use async_trait::async_trait;

use crate::models::{Student, StudentDraft};

pub use memory::MemoryStudentStore;
pub use pg::PgStudentStore;

#[derive(Debug)]
pub enum InsertError {
    /// A profile for this user already exists.
    Duplicate,
    Other(anyhow::Error),
}

impl std::fmt::Display for InsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertError::Duplicate => f.write_str("duplicate user_id"),
            InsertError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl From<anyhow::Error> for InsertError {
    fn from(err: anyhow::Error) -> Self {
        InsertError::Other(err)
    }
}

/// Persistence for student profiles.
///
/// `commit` must apply the whole record atomically: either every mutable
/// column is written or none is.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: i32) -> anyhow::Result<Option<Student>>;

    /// Writes the mutable fields of `student`, matched by `user_id`.
    async fn commit(&self, student: &Student) -> anyhow::Result<()>;

    async fn insert(&self, draft: StudentDraft) -> Result<Student, InsertError>;
}
