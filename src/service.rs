use std::sync::Arc;

use crate::err::Error;
use crate::models::{Caller, NewStudent, Student, StudentPayload};
use crate::store::{InsertError, StudentStore};

pub const PROFILE_UPDATED: &str = "Full profile updated successfully!";

/// Reads, creates and updates student profiles over an injected store.
#[derive(Clone)]
pub struct StudentProfileService {
    store: Arc<dyn StudentStore>,
}

impl StudentProfileService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Student, Error> {
        self.store
            .find_by_user_id(user_id)
            .await
            .map_err(lookup_failed)?
            .ok_or_else(Error::student_not_found)
    }

    /// Replaces the mutable fields of the profile owned by `user_id` and
    /// commits them in one write.
    pub async fn update_by_user_id(
        &self,
        user_id: i32,
        payload: StudentPayload,
        caller: Caller,
    ) -> Result<(), Error> {
        let mut student = self.get_by_user_id(user_id).await?;

        if !student.apply(payload, caller) {
            log::warn!(
                "Ignoring isVerified change for user {} from non-admin caller",
                user_id
            );
        }

        if let Err(err) = self.store.commit(&student).await {
            log::error!("Failed to update student profile for user {}: {:#}", user_id, err);
            return Err(Error::persistence(err));
        }
        log::info!("Updated student profile for user {}", user_id);
        Ok(())
    }

    pub async fn create(&self, new: NewStudent, caller: Caller) -> Result<Student, Error> {
        let user_id = new.user_id;
        if self
            .store
            .find_by_user_id(user_id)
            .await
            .map_err(lookup_failed)?
            .is_some()
        {
            return Err(Error::student_exists());
        }

        if new.profile.is_verified == Some(true) && !caller.is_admin() {
            log::warn!(
                "Ignoring isVerified on new profile for user {} from non-admin caller",
                user_id
            );
        }

        match self.store.insert(new.into_draft(caller)).await {
            Ok(student) => {
                log::info!(
                    "Created student profile {} for user {}",
                    student.student_id,
                    user_id
                );
                Ok(student)
            }
            Err(InsertError::Duplicate) => Err(Error::student_exists()),
            Err(InsertError::Other(err)) => {
                log::error!("Failed to create student profile for user {}: {:#}", user_id, err);
                Err(Error::persistence(err))
            }
        }
    }
}

fn lookup_failed(err: anyhow::Error) -> Error {
    log::error!("Student lookup failed: {:#}", err);
    Error::from(err)
}
