use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        OriginalUri, Query, Request,
    },
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};
use territory::{database::DatabaseError, IngestError};

use crate::hateoas;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;
pub type HateoasResult<O> = RouteResult<Json<hateoas::Response<O>>>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VecResponse<T> {
    pub data: Vec<T>,
}

impl<T> VecResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responeses -

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    pub reason_code: Option<String>,

    pub retryable: Option<bool>,

    pub http_method: Option<String>,

    pub requested_uri: Option<String>,

    pub message: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            reason_code: None,
            retryable: None,
            http_method: None,
            requested_uri: None,
            message: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_reason_code("NOT_FOUND")
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_reason_code(mut self, reason_code: impl Into<String>) -> Self {
        self.reason_code = Some(reason_code.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }
}

impl From<IngestError> for RouteErrorResponse {
    fn from(value: IngestError) -> Self {
        let response = match &value {
            IngestError::Validation(why) => {
                Self::new(StatusCode::BAD_REQUEST).with_message(why.to_string())
            }
            // storage details stay in the log
            IngestError::Persistence(_) => Self::new(StatusCode::SERVICE_UNAVAILABLE)
                .with_message("The mission could not be stored, nothing was saved."),
        };
        response
            .with_reason_code(value.reason_code())
            .with_retryable(value.is_retryable())
    }
}

impl From<DatabaseError> for RouteErrorResponse {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound => Self::new(StatusCode::NOT_FOUND)
                .with_reason_code("NOT_FOUND")
                .with_message("The requested item does not exist."),
            DatabaseError::Other(why) => {
                log::error!("database error: {}", why);
                Self::new(StatusCode::SERVICE_UNAVAILABLE)
                    .with_reason_code("PERSISTENCE_ERROR")
                    .with_retryable(true)
                    .with_default_message()
            }
        }
    }
}

/// Bodies that are not json or do not fit the payload shape, e.g. a
/// coordinate given as a string. The parser message quotes the offending
/// value, so it only goes to the log.
impl From<JsonRejection> for RouteErrorResponse {
    fn from(value: JsonRejection) -> Self {
        log::warn!("rejected request body: {}", value.body_text());
        Self::new(StatusCode::BAD_REQUEST)
            .with_reason_code("VALIDATION_ERROR")
            .with_retryable(false)
            .with_message("The request body does not match the submission schema.")
    }
}

impl From<PathRejection> for RouteErrorResponse {
    fn from(value: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST)
            .with_reason_code("VALIDATION_ERROR")
            .with_retryable(false)
            .with_message(value.body_text())
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use territory::validation::ValidationError;

    use super::*;

    #[test]
    fn validation_error_is_bad_request() {
        let response = RouteErrorResponse::from(IngestError::from(
            ValidationError::UnknownOwner(-3),
        ));
        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(response.reason_code.as_deref(), Some("VALIDATION_ERROR"));
        assert_eq!(response.retryable, Some(false));
    }

    #[test]
    fn persistence_error_is_retryable() {
        let response = RouteErrorResponse::from(IngestError::from(
            DatabaseError::other(std::io::Error::other("connection reset")),
        ));
        assert_eq!(response.status_code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.reason_code.as_deref(), Some("PERSISTENCE_ERROR"));
        assert_eq!(response.retryable, Some(true));
        assert!(!response
            .message
            .unwrap_or_default()
            .contains("connection reset"));
    }

    #[test]
    fn unset_fields_are_not_serialized() {
        let response = RouteErrorResponse::not_found(&Method::GET, "/api/nope");
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["reasonCode"], "NOT_FOUND");
        assert!(value.get("retryable").is_none());
    }
}
