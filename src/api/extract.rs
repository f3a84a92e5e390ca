use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::AppError;

/// JSON 请求体，解析失败时返回统一的响应格式
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::Validation(format!("请求参数错误: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use serde::Deserialize;

    use super::*;
    use crate::utils::error_codes;

    #[derive(Debug, Deserialize)]
    struct Target {
        id: i64,
    }

    async fn extract(body: &'static str) -> Result<AppJson<Target>, AppError> {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        AppJson::<Target>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn missing_fields_become_validation_errors() {
        let err = extract("{}").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.code(), error_codes::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn malformed_json_becomes_validation_error() {
        let err = extract("{\"id\":").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let AppJson(target) = extract("{\"id\": 7}").await.unwrap();
        assert_eq!(target.id, 7);
    }
}
