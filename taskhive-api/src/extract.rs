/// Validated JSON extraction
///
/// `ValidatedJson<T>` deserializes a request body and runs the type's
/// declarative `validator` rules before the handler sees it. Malformed bodies
/// and rule violations both fail closed with a 400 naming the offending
/// field, so no partially-valid input ever reaches storage.
///
/// # Example
///
/// ```ignore
/// async fn create(ValidatedJson(req): ValidatedJson<TaskWriteRequest>) -> ApiResult<Json<Task>> {
///     // req is deserialized and validated here
/// }
/// ```
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{ApiError, ValidationErrorDetail};

/// JSON body that has passed schema validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate().map_err(validation_details)?;

        Ok(ValidatedJson(value))
    }
}

/// Flattens `validator` errors into field-level detail
pub fn validation_details(errors: validator::ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::Validation(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
    }

    #[test]
    fn test_validation_details_carry_field_and_message() {
        let sample = Sample {
            name: "ab".to_string(),
        };
        let err = sample.validate().unwrap_err();

        match validation_details(err) {
            ApiError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "name");
                assert_eq!(details[0].message, "Name must be at least 3 characters");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
