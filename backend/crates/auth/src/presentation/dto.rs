//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expiration: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_field_names() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"admin","password":"pw"}"#).unwrap();
        assert_eq!(req.username, "admin");
        assert_eq!(req.password, "pw");
    }

    #[test]
    fn test_login_response_shape() {
        let resp = LoginResponse {
            token: "abc".to_string(),
            expiration: Utc::now(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("token").is_some());
        assert!(json.get("expiration").is_some());
    }
}
