use anyhow::bail;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{InsertError, StudentStore};
use crate::models::{Student, StudentDraft};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PgStudentStore {
    pg: PgPool,
}

impl PgStudentStore {
    pub fn new(pg: PgPool) -> Self {
        Self { pg }
    }

    /// Opens a pool and brings the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pg = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!().run(&pg).await?;
        Ok(Self::new(pg))
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn find_by_user_id(&self, user_id: i32) -> anyhow::Result<Option<Student>> {
        let student =
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE user_id = $1 LIMIT 1")
                .bind(user_id)
                .fetch_optional(&self.pg)
                .await?;
        Ok(student)
    }

    async fn commit(&self, student: &Student) -> anyhow::Result<()> {
        let mut tx = self.pg.begin().await?;
        let res = sqlx::query(
            "UPDATE students SET university = $1, degree = $2, gpa = $3, skills = $4, \
             gender = $5, nic_document_path = $6, is_verified = $7 WHERE user_id = $8",
        )
        .bind(&student.university)
        .bind(&student.degree)
        .bind(student.gpa)
        .bind(&student.skills)
        .bind(&student.gender)
        .bind(&student.nic_document_path)
        .bind(student.is_verified)
        .bind(student.user_id)
        .execute(&mut tx)
        .await?;

        if res.rows_affected() < 1 {
            tx.rollback().await?;
            bail!("No student row for user {}", student.user_id)
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert(&self, draft: StudentDraft) -> Result<Student, InsertError> {
        let mut tx = self.pg.begin().await.map_err(anyhow::Error::from)?;
        let inserted = sqlx::query_as::<_, Student>(
            "INSERT INTO students (user_id, university, degree, gpa, skills, gender, \
             nic_document_path, is_verified) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(draft.user_id)
        .bind(&draft.university)
        .bind(&draft.degree)
        .bind(draft.gpa)
        .bind(&draft.skills)
        .bind(&draft.gender)
        .bind(&draft.nic_document_path)
        .bind(draft.is_verified)
        .fetch_one(&mut tx)
        .await;

        let student = match inserted {
            Ok(student) => student,
            Err(err) => {
                let duplicate = err
                    .as_database_error()
                    .and_then(|db| db.code())
                    .map_or(false, |code| code == UNIQUE_VIOLATION);
                return Err(if duplicate {
                    InsertError::Duplicate
                } else {
                    InsertError::Other(err.into())
                });
            }
        };
        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(student)
    }
}
