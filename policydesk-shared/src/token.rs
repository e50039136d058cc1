//! Bearer token claim decoding.
//!
//! The API issues JWTs whose payload names the subject and role. The client
//! has no key to verify the signature, so claims are read as-is and only
//! used to label the session; the server stays the authority on every
//! request.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a three part JWT")]
    NotJwt,
    #[error("token payload is not valid base64url: {0}")]
    Encoding(String),
    #[error("token payload is not valid JSON: {0}")]
    Payload(String),
}

/// Claims carried by an access token payload.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT without verifying it.
    ///
    /// # Errors
    /// Returns [`TokenError`] when the token is opaque or its payload is malformed.
    pub fn decode_unverified(token: &str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::NotJwt);
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|err| TokenError::Encoding(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| TokenError::Payload(err.to_string()))
    }

    /// Non-empty subject claim.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|sub| !sub.is_empty())
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decodes_subject_and_role() {
        let token = jwt(r#"{"sub":"adminX","role":"admin","exp":1700000000}"#);
        let claims = TokenClaims::decode_unverified(&token).unwrap();
        assert_eq!(claims.subject(), Some("adminX"));
        assert_eq!(claims.role, Some(Role::Admin));
    }

    #[test]
    fn test_unknown_role_is_ignored() {
        let token = jwt(r#"{"sub":"carol","role":"auditor"}"#);
        let claims = TokenClaims::decode_unverified(&token).unwrap();
        assert_eq!(claims.subject(), Some("carol"));
        assert_eq!(claims.role, None);
    }

    #[test]
    fn test_opaque_token_is_rejected() {
        assert_eq!(
            TokenClaims::decode_unverified("T"),
            Err(TokenError::NotJwt)
        );
        assert_eq!(
            TokenClaims::decode_unverified("a.b.c.d"),
            Err(TokenError::NotJwt)
        );
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            TokenClaims::decode_unverified("a.!!!.c"),
            Err(TokenError::Encoding(_))
        ));
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(matches!(
            TokenClaims::decode_unverified(&not_json),
            Err(TokenError::Payload(_))
        ));
    }

    #[test]
    fn test_empty_subject_is_absent() {
        let token = jwt(r#"{"sub":""}"#);
        let claims = TokenClaims::decode_unverified(&token).unwrap();
        assert_eq!(claims.subject(), None);
    }
}
