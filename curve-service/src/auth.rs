use std::collections::HashMap;

use crate::{config::AuthConfig, curve::point_prefix};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing or malformed authorization header")]
    MissingCredentials,
    #[error("unknown token")]
    UnknownToken,
    #[error("token is not allowed to read {0}")]
    PointNotAllowed(String),
}

/// Static token registry with a per-token metering point allow-list.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    allowed: HashMap<String, Vec<String>>,
}

impl TokenRegistry {
    pub fn from_config(cfg: &AuthConfig) -> Self {
        let mut allowed: HashMap<String, Vec<String>> = HashMap::new();
        for t in &cfg.tokens {
            allowed
                .entry(t.token.clone())
                .or_default()
                .extend(t.allowed_cups.iter().cloned());
        }
        Self { allowed }
    }

    /// Check an `Authorization` header value against the point being read.
    ///
    /// Accepted form is `token <secret>`, optionally prefixed with `Basic `.
    /// Points match on their first 20 characters, like curve rows do.
    pub fn authorize(&self, header: Option<&str>, cups: &str) -> Result<(), AuthError> {
        let token = header
            .and_then(parse_token_header)
            .ok_or(AuthError::MissingCredentials)?;
        let allowed = self.allowed.get(token).ok_or(AuthError::UnknownToken)?;

        let wanted = point_prefix(cups);
        if allowed.iter().any(|a| point_prefix(a) == wanted) {
            Ok(())
        } else {
            Err(AuthError::PointNotAllowed(cups.to_string()))
        }
    }
}

fn parse_token_header(value: &str) -> Option<&str> {
    let value = value.strip_prefix("Basic ").unwrap_or(value);
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("token"), Some(token), None) => Some(token),
        _ => None,
    }
}
