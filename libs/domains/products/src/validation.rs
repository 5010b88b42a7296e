//! Field checks for product payloads.
//!
//! All field errors are collected, not just the first one. `ValidProduct` is
//! also the request-body extractor for create and update, so handlers never
//! see an unchecked payload.

use axum::extract::{FromRequest, Json, Request};
use axum_helpers::AppError;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

use crate::models::{ProductInput, ValidProduct};

/// Longest accepted product name, counted in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Check a payload and turn it into a [`ValidProduct`].
///
/// | Field    | Condition                | Code       |
/// |----------|--------------------------|------------|
/// | name     | missing or blank         | `required` |
/// | name     | over 100 characters      | `length`   |
/// | price    | missing                  | `required` |
/// | price    | `<= 0` or not finite     | `range`    |
/// | quantity | missing                  | `required` |
/// | quantity | negative                 | `range`    |
pub fn validate_product(input: ProductInput) -> Result<ValidProduct, ValidationErrors> {
    let errors = field_errors(&input);

    match (input.name, input.price, input.quantity) {
        (Some(name), Some(price), Some(quantity)) if errors.is_empty() => Ok(ValidProduct {
            name,
            price,
            quantity,
        }),
        _ => Err(errors),
    }
}

/// Parses the JSON body as a [`ProductInput`] and validates it in one step.
///
/// Malformed JSON is rejected with 400 `INVALID_JSON`, failed checks with
/// 400 `VALIDATION_ERROR` listing every offending field.
impl<S> FromRequest<S> for ValidProduct
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(input) = Json::<ProductInput>::from_request(req, state).await?;
        Ok(validate_product(input)?)
    }
}

fn field_errors(input: &ProductInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match input.name.as_deref() {
        None => errors.add("name", required("Product name is required")),
        Some(name) if name.trim().is_empty() => {
            errors.add("name", required("Product name is required"))
        }
        Some(name) if name.chars().count() > NAME_MAX_CHARS => {
            let mut err = ValidationError::new("length")
                .with_message(Cow::Borrowed("Name must be less than 100 characters"));
            err.add_param(Cow::Borrowed("max"), &NAME_MAX_CHARS);
            errors.add("name", err);
        }
        Some(_) => {}
    }

    match input.price {
        None => errors.add("price", required("Price is required")),
        Some(price) if !price.is_finite() || price <= 0.0 => {
            let mut err = ValidationError::new("range")
                .with_message(Cow::Borrowed("Price must be greater than 0"));
            // NaN and infinities have no JSON form
            if price.is_finite() {
                err.add_param(Cow::Borrowed("value"), &price);
            }
            errors.add("price", err);
        }
        Some(_) => {}
    }

    match input.quantity {
        None => errors.add("quantity", required("Quantity is required")),
        Some(quantity) if quantity < 0 => {
            let mut err = ValidationError::new("range")
                .with_message(Cow::Borrowed("Quantity cannot be negative"));
            err.add_param(Cow::Borrowed("min"), &0);
            err.add_param(Cow::Borrowed("value"), &quantity);
            errors.add("quantity", err);
        }
        Some(_) => {}
    }

    errors
}

fn required(message: &'static str) -> ValidationError {
    ValidationError::new("required").with_message(Cow::Borrowed(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: Option<&str>, price: Option<f64>, quantity: Option<i32>) -> ProductInput {
        ProductInput {
            name: name.map(str::to_string),
            price,
            quantity,
        }
    }

    fn codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
            .unwrap_or_default()
    }

    fn message(errors: &ValidationErrors, field: &str) -> String {
        errors
            .field_errors()
            .get(field)
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_valid_input_passes() {
        let valid = validate_product(input(Some("Wireless Mouse"), Some(24.99), Some(25))).unwrap();
        assert_eq!(
            valid,
            ValidProduct {
                name: "Wireless Mouse".to_string(),
                price: 24.99,
                quantity: 25,
            }
        );
    }

    #[test]
    fn test_zero_quantity_is_allowed() {
        assert!(validate_product(input(Some("Cable"), Some(0.01), Some(0))).is_ok());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = validate_product(ProductInput::default()).unwrap_err();

        assert_eq!(codes(&errors, "name"), vec!["required"]);
        assert_eq!(codes(&errors, "price"), vec!["required"]);
        assert_eq!(codes(&errors, "quantity"), vec!["required"]);
        assert_eq!(message(&errors, "name"), "Product name is required");
        assert_eq!(message(&errors, "price"), "Price is required");
        assert_eq!(message(&errors, "quantity"), "Quantity is required");
    }

    #[test]
    fn test_blank_name_is_required() {
        let errors = validate_product(input(Some("   "), Some(1.0), Some(1))).unwrap_err();
        assert_eq!(codes(&errors, "name"), vec!["required"]);
    }

    #[test]
    fn test_name_length_counts_characters() {
        let at_limit = "é".repeat(NAME_MAX_CHARS);
        assert!(validate_product(input(Some(&at_limit), Some(1.0), Some(1))).is_ok());

        let over_limit = "a".repeat(NAME_MAX_CHARS + 1);
        let errors = validate_product(input(Some(&over_limit), Some(1.0), Some(1))).unwrap_err();
        assert_eq!(codes(&errors, "name"), vec!["length"]);
        assert_eq!(message(&errors, "name"), "Name must be less than 100 characters");
    }

    #[test]
    fn test_price_must_be_positive_and_finite() {
        for price in [0.0, -0.01, -10.0, f64::NAN, f64::INFINITY] {
            let errors = validate_product(input(Some("Mouse"), Some(price), Some(1))).unwrap_err();
            assert_eq!(codes(&errors, "price"), vec!["range"], "price {}", price);
            assert_eq!(message(&errors, "price"), "Price must be greater than 0");
        }
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let errors = validate_product(input(Some("Mouse"), Some(1.0), Some(-1))).unwrap_err();
        assert_eq!(codes(&errors, "quantity"), vec!["range"]);
        assert_eq!(message(&errors, "quantity"), "Quantity cannot be negative");
    }

    #[test]
    fn test_all_errors_are_collected() {
        let errors = validate_product(input(Some(""), Some(0.0), Some(-5))).unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }

    mod extractor {
        use super::*;
        use axum::{Router, body::Body, http::StatusCode, routing::post};
        use http_body_util::BodyExt;
        use tower::ServiceExt;

        async fn echo(product: ValidProduct) -> String {
            format!("{}:{}:{}", product.name, product.price, product.quantity)
        }

        async fn send(body: &'static str) -> (StatusCode, Vec<u8>) {
            let app = Router::new().route("/", post(echo));
            let response = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/")
                        .header("content-type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();

            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, bytes.to_vec())
        }

        #[tokio::test]
        async fn test_valid_body_yields_checked_fields() {
            let (status, body) = send(r#"{"name": "Mouse", "price": 2.5, "quantity": 4}"#).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, b"Mouse:2.5:4");
        }

        #[tokio::test]
        async fn test_invalid_body_lists_field_errors() {
            let (status, body) = send(r#"{"price": -1, "quantity": 4}"#).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"], "VALIDATION_ERROR");
            assert_eq!(json["details"]["name"][0]["code"], "required");
            assert_eq!(json["details"]["price"][0]["code"], "range");
            assert!(json["details"].get("quantity").is_none());
        }

        #[tokio::test]
        async fn test_malformed_body_is_invalid_json() {
            let (status, body) = send(r#"{"name": "#).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"], "INVALID_JSON");
        }
    }
}
