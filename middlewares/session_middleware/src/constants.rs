use http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

pub const BEARER: &str = "Bearer";

/// Extracts the session token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively; anything that is not a UUID is
/// treated as no token at all.
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER) {
        return None;
    }
    Uuid::parse_str(token.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_bearer_token() {
        let token = Uuid::new_v4();
        assert_eq!(bearer_token(&headers(&format!("Bearer {token}"))), Some(token));
        assert_eq!(bearer_token(&headers(&format!("bearer  {token} "))), Some(token));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        let token = Uuid::new_v4();
        assert_eq!(bearer_token(&headers(&format!("Basic {token}"))), None);
        assert_eq!(bearer_token(&headers("Bearer not-a-token")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
