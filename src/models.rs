use serde::{Deserialize, Deserializer, Serialize};

/// Privilege of whoever issued a request.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Caller {
    Student,
    Admin,
}

impl Caller {
    pub fn is_admin(self) -> bool {
        self == Caller::Admin
    }
}

/// A student profile row. One per `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: i32,
    pub user_id: i32,
    pub university: String,
    pub degree: String,
    pub gpa: f64,
    pub skills: String,
    pub gender: String,
    pub nic_document_path: String,
    pub is_verified: bool,
}

/// The mutable part of a profile as sent by clients.
///
/// Identity fields are absent, so a `userId` in the body can
/// never reach the stored record. Missing or `null` strings read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub university: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub degree: String,
    #[serde(default)]
    pub gpa: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nic_document_path: String,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub user_id: i32,
    #[serde(flatten)]
    pub profile: StudentPayload,
}

/// A student ready to be inserted; the store assigns `student_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDraft {
    pub user_id: i32,
    pub university: String,
    pub degree: String,
    pub gpa: f64,
    pub skills: String,
    pub gender: String,
    pub nic_document_path: String,
    pub is_verified: bool,
}

impl StudentDraft {
    pub fn into_student(self, student_id: i32) -> Student {
        Student {
            student_id,
            user_id: self.user_id,
            university: self.university,
            degree: self.degree,
            gpa: self.gpa,
            skills: self.skills,
            gender: self.gender,
            nic_document_path: self.nic_document_path,
            is_verified: self.is_verified,
        }
    }
}

impl NewStudent {
    pub fn into_draft(self, caller: Caller) -> StudentDraft {
        let profile = self.profile;
        StudentDraft {
            user_id: self.user_id,
            university: profile.university,
            degree: profile.degree,
            gpa: profile.gpa,
            skills: profile.skills,
            gender: profile.gender,
            nic_document_path: profile.nic_document_path,
            is_verified: caller.is_admin() && profile.is_verified.unwrap_or_default(),
        }
    }
}

impl Student {
    /// Overwrites the academic, demographic and verification fields.
    ///
    /// `is_verified` only changes for admins, and reads as `false` when an
    /// admin leaves it out. Returns `false` when a non-admin asked for a
    /// different value than the stored one.
    pub fn apply(&mut self, payload: StudentPayload, caller: Caller) -> bool {
        self.university = payload.university;
        self.degree = payload.degree;
        self.gpa = payload.gpa;
        self.skills = payload.skills;
        self.gender = payload.gender;
        self.nic_document_path = payload.nic_document_path;

        if caller.is_admin() {
            self.is_verified = payload.is_verified.unwrap_or_default();
            true
        } else {
            payload.is_verified.map_or(true, |wanted| wanted == self.is_verified)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn of<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student {
            student_id: 1,
            user_id: 7,
            university: "X".to_string(),
            degree: String::new(),
            gpa: 3.0,
            skills: String::new(),
            gender: String::new(),
            nic_document_path: "/docs/old.png".to_string(),
            is_verified: false,
        }
    }

    #[test]
    fn payload_ignores_identity_fields() {
        let payload: StudentPayload = serde_json::from_str(
            r#"{"userId": 99, "studentId": 5, "university": "Y", "gpa": 3.8}"#,
        )
        .unwrap();
        let mut s = student();
        s.apply(payload, Caller::Admin);
        assert_eq!(s.user_id, 7);
        assert_eq!(s.student_id, 1);
        assert_eq!(s.university, "Y");
        assert_eq!(s.gpa, 3.8);
    }

    #[test]
    fn missing_strings_become_empty() {
        let payload: StudentPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, StudentPayload::default());
    }

    #[test]
    fn null_strings_become_empty() {
        let payload: StudentPayload = serde_json::from_str(
            r#"{"university": null, "degree": "CS", "nicDocumentPath": null, "gpa": 3.8}"#,
        )
        .unwrap();
        assert_eq!(payload.university, "");
        assert_eq!(payload.degree, "CS");
        assert_eq!(payload.nic_document_path, "");
    }

    #[test]
    fn missing_document_path_is_cleared() {
        let mut s = student();
        s.apply(StudentPayload::default(), Caller::Student);
        assert_eq!(s.nic_document_path, "");

        s.apply(
            StudentPayload {
                nic_document_path: "/docs/7.png".to_string(),
                ..StudentPayload::default()
            },
            Caller::Student,
        );
        assert_eq!(s.nic_document_path, "/docs/7.png");
    }

    #[test]
    fn only_admins_change_verification() {
        let payload = StudentPayload {
            is_verified: Some(true),
            ..StudentPayload::default()
        };

        let mut s = student();
        assert!(!s.apply(payload.clone(), Caller::Student));
        assert!(!s.is_verified);

        assert!(s.apply(payload, Caller::Admin));
        assert!(s.is_verified);
    }

    #[test]
    fn student_omitting_verification_is_not_a_change() {
        let mut s = student();
        s.is_verified = true;

        assert!(s.apply(StudentPayload::default(), Caller::Student));
        assert!(s.is_verified);

        let same = StudentPayload {
            is_verified: Some(true),
            ..StudentPayload::default()
        };
        assert!(s.apply(same, Caller::Student));
        assert!(s.is_verified);
    }

    #[test]
    fn student_serializes_camel_case() {
        let value = serde_json::to_value(student()).unwrap();
        assert_eq!(value["userId"], 7);
        assert_eq!(value["nicDocumentPath"], "/docs/old.png");
        assert_eq!(value["isVerified"], false);
    }

    #[test]
    fn new_student_defaults_and_gates_verification() {
        let new: NewStudent =
            serde_json::from_str(r#"{"userId": 3, "degree": "CS", "isVerified": true}"#).unwrap();

        let draft = new.clone().into_draft(Caller::Student);
        assert_eq!(draft.user_id, 3);
        assert_eq!(draft.degree, "CS");
        assert_eq!(draft.nic_document_path, "");
        assert!(!draft.is_verified);

        assert!(new.into_draft(Caller::Admin).is_verified);
    }
}
