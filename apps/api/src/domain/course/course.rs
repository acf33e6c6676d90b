use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::tutor::{NewTutor, Tutor};
use crate::domain::validation::{is_blank, ErrorKind, ValidationErrors};

/// A persisted course together with its tutors
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tutors in creation order
    pub tutors: Vec<Tutor>,
}

/// Values of the unique attributes that already exist in storage
///
/// Filled in by a repository before validating a [`NewCourse`].
#[derive(Debug, Clone, Default)]
pub struct TakenValues {
    pub title: bool,
    pub emails: HashSet<String>,
}

/// Course creation input with nested tutors
///
/// # Invariants
/// - Title must not be blank and must not belong to an existing course
/// - Every tutor needs a first name and an email
/// - Tutor emails must be unique across storage and within the payload
///
/// # Example
/// ```
/// use courses_api::domain::course::{NewCourse, NewTutor, TakenValues};
///
/// let course = NewCourse::new(
///     "Ruby",
///     Some("Dev friendly language.".to_string()),
///     vec![NewTutor::new("Royce", None, "royce@example.com")],
/// );
///
/// assert!(course.validate(&TakenValues::default()).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tutors: Vec<NewTutor>,
}

impl NewCourse {
    pub fn new(title: impl Into<String>, description: Option<String>, tutors: Vec<NewTutor>) -> Self {
        Self {
            title: Some(title.into()),
            description,
            tutors,
        }
    }

    /// Returns the title if it is present and not blank
    pub fn present_title(&self) -> Option<&str> {
        let title = self.title.as_deref();
        if is_blank(title) {
            None
        } else {
            title
        }
    }

    /// Non-blank tutor emails in payload order
    pub fn tutor_emails(&self) -> Vec<&str> {
        self.tutors.iter().filter_map(NewTutor::present_email).collect()
    }

    /// Runs every rule and reports all failures at once
    ///
    /// Errors come out in a stable order: title first, then each tutor's
    /// first name and email in payload order.
    pub fn validate(&self, taken: &TakenValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.present_title().is_none() {
            errors.add("title", ErrorKind::Blank);
        } else if taken.title {
            errors.add("title", ErrorKind::Taken);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for tutor in &self.tutors {
            tutor.validate_presence(&mut errors);

            if let Some(email) = tutor.present_email() {
                if taken.emails.contains(email) || !seen.insert(email) {
                    errors.add("tutors.email", ErrorKind::Taken);
                }
            }
        }

        errors.into_result()
    }
}
