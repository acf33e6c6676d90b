use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::domain::course::{Course, NewCourse, TakenValues, Tutor};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::{CourseRepository, RepositoryError};
use crate::domain::validation::{ErrorKind, ValidationErrors};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i64,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self, tutors: Vec<Tutor>) -> Course {
        Course {
            id: self.id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            tutors,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TutorRow {
    id: i64,
    course_id: i64,
    first_name: String,
    last_name: Option<String>,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TutorRow> for Tutor {
    fn from(r: TutorRow) -> Self {
        Tutor {
            id: r.id,
            course_id: r.course_id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL implementation of CourseRepository
///
/// Uniqueness is checked inside the insert transaction and backed by the
/// `courses_title_key` and `tutors_email_key` unique indexes, so a
/// concurrent insert that slips past the check still surfaces as a
/// validation error.
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    /// Creates a new PostgresCourseRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn taken_values(
        conn: &mut PgConnection,
        course: &NewCourse,
    ) -> Result<TakenValues, sqlx::Error> {
        let title = match course.present_title() {
            Some(title) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS (SELECT 1 FROM courses WHERE title = $1)",
                )
                .bind(title)
                .fetch_one(&mut *conn)
                .await?
            }
            None => false,
        };

        let emails: Vec<String> = course
            .tutor_emails()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let taken_emails: Vec<String> = if emails.is_empty() {
            Vec::new()
        } else {
            sqlx::query_scalar("SELECT email FROM tutors WHERE email = ANY($1)")
                .bind(emails)
                .fetch_all(&mut *conn)
                .await?
        };

        Ok(TakenValues {
            title,
            emails: taken_emails.into_iter().collect(),
        })
    }
}

/// Maps a unique index violation onto the attribute it guards
fn map_insert_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let attribute = match db_err.constraint() {
                Some("courses_title_key") => Some("title"),
                Some("tutors_email_key") => Some("tutors.email"),
                _ => None,
            };
            if let Some(attribute) = attribute {
                tracing::warn!(attribute, "unique index rejected concurrent insert");
                let mut errors = ValidationErrors::new();
                errors.add(attribute, ErrorKind::Taken);
                return RepositoryError::Validation(errors);
            }
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn create(&self, course: NewCourse) -> Result<Course, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let taken = Self::taken_values(&mut tx, &course).await?;
        if let Err(errors) = course.validate(&taken) {
            tx.rollback().await?;
            return Err(RepositoryError::Validation(errors));
        }

        let row: CourseRow = sqlx::query_as(
            r#"
            INSERT INTO courses (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, created_at, updated_at
            "#,
        )
        .bind(course.title.as_deref())
        .bind(course.description.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        let mut tutors = Vec::with_capacity(course.tutors.len());
        for tutor in &course.tutors {
            let tutor_row: TutorRow = sqlx::query_as(
                r#"
                INSERT INTO tutors (first_name, last_name, email, course_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, course_id, first_name, last_name, email, created_at, updated_at
                "#,
            )
            .bind(tutor.first_name.as_deref())
            .bind(tutor.last_name.as_deref())
            .bind(tutor.email.as_deref())
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_insert_error)?;

            tutors.push(Tutor::from(tutor_row));
        }

        tx.commit().await?;

        Ok(row.into_course(tutors))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Course>, RepositoryError> {
        // Count and rows come from one snapshot so the links match the data
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<CourseRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, created_at, updated_at
            FROM courses
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;

        let course_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let tutor_rows: Vec<TutorRow> = if course_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(
                r#"
                SELECT id, course_id, first_name, last_name, email, created_at, updated_at
                FROM tutors
                WHERE course_id = ANY($1)
                ORDER BY id ASC
                "#,
            )
            .bind(course_ids)
            .fetch_all(&mut *tx)
            .await?
        };

        tx.commit().await?;

        let mut tutors_by_course: HashMap<i64, Vec<Tutor>> = HashMap::new();
        for tutor_row in tutor_rows {
            tutors_by_course
                .entry(tutor_row.course_id)
                .or_default()
                .push(Tutor::from(tutor_row));
        }

        let courses = rows
            .into_iter()
            .map(|r| {
                let tutors = tutors_by_course.remove(&r.id).unwrap_or_default();
                r.into_course(tutors)
            })
            .collect();

        Ok(Page::new(
            courses,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
