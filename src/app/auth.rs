use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// The single username/password pair allowed through HTTP Basic auth.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks a raw `Authorization` header value. Never fails; anything that is
    /// not a well-formed `Basic` header carrying the configured pair is `false`.
    pub fn verify(&self, authorization: Option<&str>) -> bool {
        match authorization.and_then(decode_basic) {
            Some((username, password)) => {
                username == self.username && password == self.password
            }
            None => false,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Splits `Basic <base64(user:pass)>` into its parts.
pub fn decode_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim().as_bytes()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
