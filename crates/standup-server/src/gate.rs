//! Password gate: cookie detection and password length rules.

use axum::http::{HeaderMap, header::COOKIE};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use standup_config::schema::GateConfig;

use crate::error::GateError;

/// `true` when the request carries the gate cookie, whatever its value.
pub fn is_authenticated(headers: &HeaderMap, cookie_name: &str) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(|pair| pair.split_once('=').map_or(pair, |(name, _)| name))
        .any(|name| name.trim() == cookie_name)
}

/// `Set-Cookie` value granting access.
pub fn auth_cookie(cookie_name: &str) -> String {
    format!("{cookie_name}=true; Path=/; HttpOnly; SameSite=Lax")
}

type HmacSha256 = Hmac<Sha256>;

const COMPARE_KEY: &[u8] = b"standup-gate";

/// Compares the submitted password with the stored one in constant time.
pub fn password_matches(submitted: &str, actual: &str) -> bool {
    let Ok(mut expected) = HmacSha256::new_from_slice(COMPARE_KEY) else {
        return false;
    };
    expected.update(actual.as_bytes());
    let tag = expected.finalize().into_bytes();

    let Ok(mut candidate) = HmacSha256::new_from_slice(COMPARE_KEY) else {
        return false;
    };
    candidate.update(submitted.as_bytes());
    candidate.verify_slice(&tag).is_ok()
}

/// Length checks run before the stored password is looked up.
pub fn validate_password(password: Option<&str>, gate: &GateConfig) -> Result<(), GateError> {
    let Some(password) = password else {
        return Err(GateError::Validation("Password is required".into()));
    };
    let chars = password.chars().count();
    if chars < gate.min_password_length as usize {
        return Err(GateError::Validation(format!(
            "Password must be at least {} characters",
            gate.min_password_length
        )));
    }
    if chars > gate.max_password_length as usize {
        return Err(GateError::Validation(format!(
            "Password must be at most {} characters",
            gate.max_password_length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn detects_cookie_among_others() {
        assert!(is_authenticated(&headers("is_authenticated=true"), "is_authenticated"));
        assert!(is_authenticated(
            &headers("theme=dark; is_authenticated=1; lang=en"),
            "is_authenticated"
        ));
        assert!(!is_authenticated(&headers("theme=dark"), "is_authenticated"));
        assert!(!is_authenticated(&headers("not_is_authenticated=true"), "is_authenticated"));
        assert!(!is_authenticated(&HeaderMap::new(), "is_authenticated"));
    }

    #[test]
    fn password_bounds() {
        let gate = GateConfig::default();
        assert!(validate_password(Some("12345678"), &gate).is_ok());
        assert!(validate_password(Some(&"p".repeat(100)), &gate).is_ok());

        let err = validate_password(Some("1234567"), &gate).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 8 characters");
        let err = validate_password(Some(&"p".repeat(101)), &gate).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at most 100 characters");
        let err = validate_password(None, &gate).unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
    }

    #[test]
    fn password_comparison() {
        assert!(password_matches("correct horse", "correct horse"));
        assert!(!password_matches("correct horsE", "correct horse"));
        assert!(!password_matches("correct horse battery", "correct horse"));
        assert!(!password_matches("", "correct horse"));
    }

    #[test]
    fn cookie_attributes() {
        assert_eq!(
            auth_cookie("is_authenticated"),
            "is_authenticated=true; Path=/; HttpOnly; SameSite=Lax"
        );
    }
}
