//! JSON:API document rendering
//!
//! Builds the `data` / `included` / `links` documents returned by the
//! course listing and the `errors` document returned on validation failure.
//! See <https://jsonapi.org/> for the shape.

use serde::Serialize;

use crate::domain::course::{Course, Tutor};
use crate::domain::pagination::Page;
use crate::domain::validation::ValidationErrors;

pub const COURSES_PATH: &str = "/api/v1/courses";

const COURSES_TYPE: &str = "courses";
const TUTORS_TYPE: &str = "tutors";

/// `{"id": ..., "type": ...}` pointer at another resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResourceIdentifier {
    fn course(id: i64) -> Self {
        Self {
            id: id.to_string(),
            kind: COURSES_TYPE,
        }
    }

    fn tutor(id: i64) -> Self {
        Self {
            id: id.to_string(),
            kind: TUTORS_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship<D> {
    pub data: D,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource<A, R> {
    #[serde(flatten)]
    pub identifier: ResourceIdentifier,
    pub attributes: A,
    pub relationships: R,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseAttributes {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRelationships {
    pub tutors: Relationship<Vec<ResourceIdentifier>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TutorAttributes {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorRelationships {
    pub course: Relationship<ResourceIdentifier>,
}

pub type CourseResource = Resource<CourseAttributes, CourseRelationships>;
pub type TutorResource = Resource<TutorAttributes, TutorRelationships>;

impl From<&Course> for CourseResource {
    fn from(course: &Course) -> Self {
        Self {
            identifier: ResourceIdentifier::course(course.id),
            attributes: CourseAttributes {
                title: course.title.clone(),
                description: course.description.clone(),
            },
            relationships: CourseRelationships {
                tutors: Relationship {
                    data: course
                        .tutors
                        .iter()
                        .map(|t| ResourceIdentifier::tutor(t.id))
                        .collect(),
                },
            },
        }
    }
}

impl From<&Tutor> for TutorResource {
    fn from(tutor: &Tutor) -> Self {
        Self {
            identifier: ResourceIdentifier::tutor(tutor.id),
            attributes: TutorAttributes {
                first_name: tutor.first_name.clone(),
                last_name: tutor.last_name.clone(),
                email: tutor.email.clone(),
            },
            relationships: TutorRelationships {
                course: Relationship {
                    data: ResourceIdentifier::course(tutor.course_id),
                },
            },
        }
    }
}

/// Pagination links; absent neighbours serialize as `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: String,
}

impl PaginationLinks {
    pub fn for_page<T>(page: &Page<T>, base_url: &str) -> Self {
        let size = page.size();
        let url = |number: u64| page_url(base_url, number, size);

        Self {
            self_link: url(page.number()),
            first: url(page.first_page()),
            prev: page.prev_page().map(url),
            next: page.next_page().map(url),
            last: url(page.last_page()),
        }
    }
}

/// Absolute URL of one page of the course listing
///
/// The brackets of `page[number]` and `page[size]` are percent-encoded.
pub fn page_url(base_url: &str, number: u64, size: u64) -> String {
    format!(
        "{}{}?page%5Bnumber%5D={}&page%5Bsize%5D={}",
        base_url.trim_end_matches('/'),
        COURSES_PATH,
        number,
        size
    )
}

/// Top-level document for a page of courses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCollectionDocument {
    pub data: Vec<CourseResource>,
    pub included: Vec<TutorResource>,
    pub links: PaginationLinks,
}

impl CourseCollectionDocument {
    pub fn from_page(page: &Page<Course>, base_url: &str) -> Self {
        Self {
            data: page.items.iter().map(CourseResource::from).collect(),
            included: page
                .items
                .iter()
                .flat_map(|c| c.tutors.iter())
                .map(TutorResource::from)
                .collect(),
            links: PaginationLinks::for_page(page, base_url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSource {
    pub pointer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub source: ErrorSource,
    pub detail: String,
}

/// Top-level `{"errors": [...]}` document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

impl From<&ValidationErrors> for ErrorDocument {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            errors: errors
                .iter()
                .map(|e| ErrorObject {
                    source: ErrorSource {
                        pointer: attribute_pointer(&e.attribute),
                    },
                    detail: e.kind.message().to_string(),
                })
                .collect(),
        }
    }
}

/// `tutors.first_name` -> `/data/attributes/tutors.first-name`
pub fn attribute_pointer(attribute: &str) -> String {
    format!("/data/attributes/{}", attribute.replace('_', "-"))
}
