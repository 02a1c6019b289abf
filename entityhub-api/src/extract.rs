/// Validated request-body extractor
///
/// Deserializes the JSON body and runs `validator` rules before the handler
/// sees the value, so malformed and invalid bodies alike surface as a 400
/// validation error — schema checking happens at the boundary, not inside
/// business logic.

use axum::extract::{FromRequest, Request};
use axum::Json;
use validator::Validate;

use crate::error::{ApiError, FieldError};

/// JSON body that has passed schema validation
///
/// # Example
///
/// ```ignore
/// async fn create(ValidatedJson(req): ValidatedJson<CreateEntityRequest>) -> ... {
///     // req is deserialized and validated here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            ApiError::Validation(vec![FieldError {
                field: "body".to_string(),
                message: e.body_text(),
            }])
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
