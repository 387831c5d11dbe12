use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::AdminCredentials;

/// Username and password carried by an `Authorization: Basic` header.
#[derive(PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Decode the value of an `Authorization` header using the Basic scheme.
pub fn parse_basic_header(header: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Constant-time comparison against the configured admin pair.
pub fn verify_credentials(given: &BasicCredentials, expected: &AdminCredentials) -> bool {
    let user_ok = ct_eq(given.username.as_bytes(), expected.username.as_bytes());
    let pass_ok = ct_eq(given.password.as_bytes(), expected.password.as_bytes());
    user_ok & pass_ok
}

fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn parses_basic_header() {
        let creds = parse_basic_header(&header("admin:admin")).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "admin");
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = parse_basic_header(&header("admin:a:b")).unwrap();
        assert_eq!(creds.password, "a:b");
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(parse_basic_header("Bearer abc.def").is_none());
        assert!(parse_basic_header("Basic !!!not-base64").is_none());
        assert!(parse_basic_header(&header("no-colon")).is_none());
        assert!(parse_basic_header("Basic").is_none());
    }

    #[test]
    fn verifies_only_exact_pair() {
        let expected = AdminCredentials::new("admin", "admin");
        let ok = parse_basic_header(&header("admin:admin")).unwrap();
        let wrong = parse_basic_header(&header("admin:admin2")).unwrap();
        let other = parse_basic_header(&header("root:admin")).unwrap();
        assert!(verify_credentials(&ok, &expected));
        assert!(!verify_credentials(&wrong, &expected));
        assert!(!verify_credentials(&other, &expected));
    }
}
