use crate::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public projection of a [User]. `updated_at` stays internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    // Missing fields decode as empty so they fail validation, not decoding.
    #[serde(default)]
    #[schema(example = "Ada")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty() || self.email.is_empty() {
            return Err("Name and Email are required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedUser {
    #[schema(example = 1)]
    pub id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_decode_as_empty_and_fail_validation() {
        let req: CreateUserRequest = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(req.email, "");
        assert_eq!(req.validate(), Err("Name and Email are required"));

        let req: CreateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn complete_request_is_valid() {
        let req = CreateUserRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn response_drops_updated_at() {
        let user = User {
            id: 7,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let created_at = user.created_at;

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        let fields = json.as_object().unwrap();

        assert_eq!(fields.len(), 4);
        assert!(!fields.contains_key("updated_at"));
        assert_eq!(json["id"], 7);
        assert_eq!(json["created_at"], serde_json::to_value(created_at).unwrap());
    }
}
