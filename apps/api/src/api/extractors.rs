use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::errors::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request body accepted as JSON or as a bracket-nested urlencoded form
///
/// Form keys follow the `course[tutors_attributes][][email]` convention:
/// each `[name]` opens a nested object and `[]` appends to a list.
/// Anything that fails to parse is rejected as a bad request.
///
/// Usage:
/// ```rust,ignore
/// async fn handler(Params(req): Params<CreateCourseRequest>) { /* ... */ }
/// ```
pub struct Params<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "rejected form body");
                    ApiError::bad_request()
                })?;

            serde_json::from_value(nest_params(pairs))
                .map(Params)
                .map_err(|e| {
                    tracing::warn!(error = %e, "rejected form parameters");
                    ApiError::bad_request()
                })
        } else {
            let Json(body) = Json::<T>::from_request(req, state).await.map_err(|e| {
                tracing::warn!(error = %e, "rejected json body");
                ApiError::bad_request()
            })?;

            Ok(Params(body))
        }
    }
}

/// Folds flat `key[a][b]=value` pairs into a nested JSON object
pub fn nest_params(pairs: Vec<(String, String)>) -> Value {
    let mut root = Map::new();
    for (key, value) in pairs {
        let segments = key_segments(&key);
        insert(&mut root, &segments, value);
    }
    Value::Object(root)
}

/// `a[b][][c]` -> `["a", "b", "", "c"]`; malformed keys are kept whole
fn key_segments(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };

    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return vec![key.to_string()];
        };
        segments.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }

    if rest.is_empty() {
        segments
    } else {
        vec![key.to_string()]
    }
}

fn insert(target: &mut Map<String, Value>, segments: &[String], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    match rest.split_first() {
        None => {
            target.insert(head.clone(), Value::String(value));
        }
        Some((next, after)) if next.is_empty() => {
            let slot = target
                .entry(head.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            let Value::Array(items) = slot else {
                return;
            };

            if after.is_empty() {
                items.push(Value::String(value));
                return;
            }

            // A key already set on the last element starts a new one
            let start_new = match items.last() {
                Some(Value::Object(last)) => has_path(last, after),
                _ => true,
            };
            if start_new {
                items.push(Value::Object(Map::new()));
            }
            if let Some(Value::Object(last)) = items.last_mut() {
                insert(last, after, value);
            }
        }
        Some(_) => {
            let slot = target
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert(child, rest, value);
            }
        }
    }
}

fn has_path(object: &Map<String, Value>, segments: &[String]) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    match (object.get(head), rest.first()) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(_), Some(next)) if next.is_empty() => false,
        (Some(Value::Object(child)), Some(_)) => has_path(child, rest),
        (Some(_), Some(_)) => true,
    }
}
