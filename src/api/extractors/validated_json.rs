//! JSON body extractor that runs `validator` rules before the handler.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::{AppError, FieldIssue};

/// Deserialize and validate a JSON body.
///
/// Malformed JSON is a plain validation error; rule failures become one
/// `FieldIssue` per failed rule.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::InvalidFields(field_issues(&e, "")))?;

        Ok(ValidatedJson(value))
    }
}

fn field_issues(errors: &ValidationErrors, prefix: &str) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                issues.extend(errs.iter().map(|e| FieldIssue {
                    path: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                }));
            }
            ValidationErrorsKind::Struct(nested) => issues.extend(field_issues(nested, &path)),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    issues.extend(field_issues(nested, &format!("{}[{}]", path, index)));
                }
            }
        }
    }
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    #[test]
    fn every_failed_rule_is_reported_with_its_path() {
        let signup = Signup {
            email: "nope".into(),
            password: "short".into(),
        };
        let issues = field_issues(&signup.validate().unwrap_err(), "");

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "email");
        assert_eq!(issues[0].message, "Invalid email format");
        assert_eq!(issues[1].path, "password");
        assert_eq!(issues[1].message, "password is invalid");
    }
}
