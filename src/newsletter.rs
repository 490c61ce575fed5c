//! Newsletter subscription validation

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

pub const INVALID_EMAIL: &str = "Please provide a valid email address";
pub const SUBSCRIBED: &str = "Successfully subscribed to newsletter";

/// Body of a subscription request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Successful subscription reply
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

impl SubscribeResponse {
    pub fn subscribed() -> Self {
        Self {
            success: true,
            message: SUBSCRIBED.to_string(),
        }
    }
}

/// Accept a trimmed, non-empty address containing `@`
pub fn validate_email(email: &str) -> Result<&str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(SiteError::Validation(INVALID_EMAIL.to_string()));
    }
    Ok(email)
}

/// Validate a request and produce the reply for it
pub fn subscribe(request: &SubscribeRequest) -> Result<SubscribeResponse> {
    let email = validate_email(request.email.as_deref().unwrap_or_default())?;
    tracing::info!("Newsletter subscription: {}", email);
    Ok(SubscribeResponse::subscribed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("a@b.com").unwrap(), "a@b.com");
        assert_eq!(validate_email("  reader@perfecxion.ai \n").unwrap(), "reader@perfecxion.ai");
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validation_message() {
        let err = validate_email("nope").unwrap_err();
        assert_eq!(err.to_string(), INVALID_EMAIL);
    }

    #[test]
    fn test_subscribe_missing_email() {
        let request: SubscribeRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(subscribe(&request), Err(SiteError::Validation(_))));
    }

    #[test]
    fn test_subscribe_ok() {
        let request: SubscribeRequest = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        let response = subscribe(&request).unwrap();
        assert!(response.success);
        assert_eq!(response.message, SUBSCRIBED);
    }
}
