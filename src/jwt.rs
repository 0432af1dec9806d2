//! JWT helpers.
//!
//! Tokens are decoded without signature verification: the client only reads
//! claims to drive routing and expiry checks, it never grants access on them.
//! The backend remains the sole verifier.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{Map, Value};

use crate::token_store::TokenStore;

/// Decoded JWT payload
#[derive(Debug, Clone, PartialEq)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Expiry in seconds since the epoch
    pub fn exp(&self) -> Option<f64> {
        self.0.get("exp").and_then(Value::as_f64)
    }

    /// Subject, falling back to a `userId` claim
    pub fn subject(&self) -> Option<String> {
        ["sub", "userId"]
            .iter()
            .find_map(|key| self.0.get(*key).and_then(scalar_to_string))
    }

    /// Role from `role`, else the first entry of `roles` or `authorities`
    pub fn role(&self) -> Option<String> {
        ["role", "roles", "authorities"]
            .iter()
            .find_map(|key| match self.0.get(*key)? {
                Value::Array(items) => items.iter().find_map(scalar_to_string),
                other => scalar_to_string(other),
            })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the payload segment of a JWT. Returns `None` for anything malformed.
pub fn decode(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(map) => Some(Claims(map)),
        _ => None,
    }
}

/// Whether `token` must be treated as expired.
///
/// Fails closed: an undecodable token or one without `exp` counts as expired.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp_millis())
}

pub fn is_expired_at(token: &str, now_millis: i64) -> bool {
    match decode(token).and_then(|claims| claims.exp()) {
        Some(exp) => now_millis as f64 >= exp * 1000.0,
        None => true,
    }
}

pub fn user_role(token: &str) -> Option<String> {
    decode(token)?.role()
}

pub fn user_id(token: &str) -> Option<String> {
    decode(token)?.subject()
}

/// Role claim of `token`, or of the stored token when none is given
pub fn user_role_or_stored(token: Option<&str>, store: &TokenStore) -> Option<String> {
    match token {
        Some(token) => user_role(token),
        None => user_role(&store.get()?),
    }
}

/// Subject claim of `token`, or of the stored token when none is given
pub fn user_id_or_stored(token: Option<&str>, store: &TokenStore) -> Option<String> {
    match token {
        Some(token) => user_id(token),
        None => user_id(&store.get()?),
    }
}

/// Build an unsigned token carrying `payload`
#[cfg(test)]
pub(crate) fn unsigned_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SecureStorage;
    use serde_json::json;
    use tempfile::TempDir;

    const NOW_MS: i64 = 1_700_000_000_000;

    #[test]
    fn payload_round_trips() {
        let payload = json!({ "sub": "42", "exp": 1_900_000_000, "roles": ["ROLE_TUTOR"] });
        let claims = decode(&unsigned_token(&payload)).unwrap();
        assert_eq!(claims.into_value(), payload);
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert!(decode("").is_none());
        assert!(decode("only.two").is_none());
        assert!(decode("a.b.c.d").is_none());
        assert!(decode("a.!!!.c").is_none());

        let not_json = format!("x.{}.y", URL_SAFE_NO_PAD.encode(b"not json"));
        assert!(decode(&not_json).is_none());

        let array = format!("x.{}.y", URL_SAFE_NO_PAD.encode(b"[1,2]"));
        assert!(decode(&array).is_none());
    }

    #[test]
    fn padded_payload_is_accepted() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"a"}"#);
        let token = format!("h.{}==.s", payload);
        assert_eq!(user_id(&token).as_deref(), Some("a"));
    }

    #[test]
    fn expiry_fails_closed() {
        assert!(is_expired_at("garbage", NOW_MS));
        assert!(is_expired_at(&unsigned_token(&json!({ "sub": "1" })), NOW_MS));
        assert!(is_expired_at(&unsigned_token(&json!({ "exp": "soon" })), NOW_MS));
    }

    #[test]
    fn expiry_boundary() {
        let exp_secs = NOW_MS / 1000;
        let at_boundary = unsigned_token(&json!({ "exp": exp_secs }));
        assert!(is_expired_at(&at_boundary, NOW_MS));

        let later = unsigned_token(&json!({ "exp": exp_secs + 1 }));
        assert!(!is_expired_at(&later, NOW_MS));

        let earlier = unsigned_token(&json!({ "exp": exp_secs - 1 }));
        assert!(is_expired_at(&earlier, NOW_MS));
    }

    #[test]
    fn role_claim_lookup_order() {
        let single = unsigned_token(&json!({ "role": "ROLE_STUDENT", "roles": ["ROLE_TUTOR"] }));
        assert_eq!(user_role(&single).as_deref(), Some("ROLE_STUDENT"));

        let list = unsigned_token(&json!({ "roles": ["ROLE_TUTOR"] }));
        assert_eq!(user_role(&list).as_deref(), Some("ROLE_TUTOR"));

        let authorities = unsigned_token(&json!({ "authorities": ["ROLE_ADMIN"] }));
        assert_eq!(user_role(&authorities).as_deref(), Some("ROLE_ADMIN"));

        let none = unsigned_token(&json!({ "sub": "1" }));
        assert_eq!(user_role(&none), None);
    }

    #[test]
    fn subject_falls_back_to_user_id_claim() {
        let token = unsigned_token(&json!({ "userId": 17 }));
        assert_eq!(user_id(&token).as_deref(), Some("17"));
    }

    #[test]
    fn stored_token_fallback() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(SecureStorage::open(dir.path()));
        assert_eq!(user_role_or_stored(None, &store), None);

        store.set(&unsigned_token(&json!({ "sub": "9", "role": "ROLE_TUTOR" })));
        assert_eq!(user_role_or_stored(None, &store).as_deref(), Some("ROLE_TUTOR"));
        assert_eq!(user_id_or_stored(None, &store).as_deref(), Some("9"));

        let explicit = unsigned_token(&json!({ "sub": "3" }));
        assert_eq!(user_id_or_stored(Some(&explicit), &store).as_deref(), Some("3"));
    }
}
