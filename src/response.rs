use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Paging details for list endpoints; all `None` for single resources.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// Envelope shared by every endpoint: `{ message, data, meta }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

impl ApiResponse<Value> {
    /// Body for deletes and other operations with nothing to return.
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self::success(message, Value::Object(Default::default()), Some(Meta::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_envelope_carries_paging() {
        let body = ApiResponse::success("Ok", vec![1, 2], Some(Meta::new(2, 20, 22)));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "message": "Ok",
                "data": [1, 2],
                "meta": { "page": 2, "per_page": 20, "total": 22 }
            })
        );
    }

    #[test]
    fn acknowledged_has_empty_object_data() {
        let body = serde_json::to_value(ApiResponse::acknowledged("Deleted")).unwrap();
        assert_eq!(body["data"], json!({}));
        assert_eq!(body["meta"]["page"], Value::Null);
    }
}
