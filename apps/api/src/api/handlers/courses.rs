use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extractors::Params;
use crate::api::jsonapi::CourseCollectionDocument;
use crate::api::state::AppState;
use crate::domain::course::{Course, NewCourse, NewTutor};
use crate::domain::pagination::PageRequest;

/// Query string of the course listing
#[derive(Debug, Default, Deserialize)]
pub struct ListCoursesQuery {
    #[serde(rename = "page[number]")]
    pub page_number: Option<String>,
    #[serde(rename = "page[size]")]
    pub page_size: Option<String>,
}

/// Request body for creating a course
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub course: CourseParams,
}

/// Permitted course attributes
///
/// Scalars are read as strings; nested objects or lists in place of a
/// scalar are dropped, as are unknown keys.
#[derive(Debug, Default, Deserialize)]
pub struct CourseParams {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "tutor_list")]
    pub tutors_attributes: Vec<TutorParams>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TutorParams {
    #[serde(default, deserialize_with = "scalar_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accepts a list of tutors or an index-keyed object (`{"0": {...}}`)
fn tutor_list<'de, D>(deserializer: D) -> Result<Vec<TutorParams>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<Value> = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => {
            let mut indexed: Vec<(String, Value)> = map.into_iter().collect();
            indexed.sort_by_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), key.clone()));
            indexed.into_iter().map(|(_, value)| value).collect()
        }
        _ => Vec::new(),
    };

    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

impl From<CourseParams> for NewCourse {
    fn from(params: CourseParams) -> Self {
        Self {
            title: params.title,
            description: params.description,
            tutors: params
                .tutors_attributes
                .into_iter()
                .map(|t| NewTutor {
                    first_name: t.first_name,
                    last_name: t.last_name,
                    email: t.email,
                })
                .collect(),
        }
    }
}

/// Response from course creation
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.public_url {
        return url.clone();
    }
    headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_else(|| "http://localhost".to_string())
}

/// List courses with their tutors
///
/// GET /api/v1/courses?page[number]=&page[size]=
pub async fn list_courses(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ListCoursesQuery>, QueryRejection>,
) -> Result<Json<CourseCollectionDocument>, ApiError> {
    let Query(query) = query.map_err(|e| {
        tracing::warn!(error = %e, "rejected course listing query");
        ApiError::bad_request()
    })?;

    let request = PageRequest::parse(query.page_number.as_deref(), query.page_size.as_deref())?;
    let page = state.courses.list(request).await?;

    tracing::info!(
        page = request.number(),
        size = request.size(),
        returned = page.items.len(),
        total = page.total_entries,
        "listed courses"
    );

    let document = CourseCollectionDocument::from_page(&page, &base_url(&state, &headers));
    Ok(Json(document))
}

/// Create a course with nested tutors
///
/// POST /api/v1/courses
///
/// Accepts JSON or a bracket-nested urlencoded form.
pub async fn create_course(
    State(state): State<AppState>,
    Params(req): Params<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let course = state
        .courses
        .create(NewCourse::from(req.course))
        .await
        .map_err(|e| {
            tracing::info!(error = %e, "course not created");
            ApiError::from(e)
        })?;

    tracing::info!(
        course_id = course.id,
        tutors = course.tutors.len(),
        "course created"
    );

    Ok((StatusCode::CREATED, Json(CourseResponse::from(&course))))
}
