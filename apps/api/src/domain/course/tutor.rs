use chrono::{DateTime, Utc};

use crate::domain::validation::{is_blank, ErrorKind, ValidationErrors};

/// A persisted tutor
#[derive(Debug, Clone, PartialEq)]
pub struct Tutor {
    pub id: i64,
    pub course_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tutor attributes submitted alongside a new course
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTutor {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl NewTutor {
    pub fn new(
        first_name: impl Into<String>,
        last_name: Option<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name,
            email: Some(email.into()),
        }
    }

    /// Returns the email if it is present and not blank
    pub fn present_email(&self) -> Option<&str> {
        let email = self.email.as_deref();
        if is_blank(email) {
            None
        } else {
            email
        }
    }

    /// Presence checks, reported under the `tutors.` prefix
    pub(crate) fn validate_presence(&self, errors: &mut ValidationErrors) {
        if is_blank(self.first_name.as_deref()) {
            errors.add("tutors.first_name", ErrorKind::Blank);
        }
        if is_blank(self.email.as_deref()) {
            errors.add("tutors.email", ErrorKind::Blank);
        }
    }
}
