//! One-shot notifications carried across a redirect in a cookie

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    /// `success`, `warning` or `error`
    pub category: String,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            category: "warning".to_string(),
            message: message.into(),
        }
    }
}

/// Queue messages for the next rendered page
pub fn push(jar: CookieJar, messages: Vec<FlashMessage>) -> CookieJar {
    let mut pending = peek(&jar);
    pending.extend(messages);

    let cookie = Cookie::build((FLASH_COOKIE, encode(&pending)))
        .path("/")
        .http_only(true);
    jar.add(cookie)
}

/// Consume pending messages and clear the cookie
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let messages = peek(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

fn peek(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

fn encode(messages: &[FlashMessage]) -> String {
    let json = serde_json::to_vec(messages).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Undecodable cookies yield no messages
fn decode(value: &str) -> Vec<FlashMessage> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_then_take() {
        let jar = push(CookieJar::new(), vec![FlashMessage::success("Author successfully added!")]);
        let jar = push(jar, vec![FlashMessage::warning("Second")]);

        let (jar, messages) = take(jar);
        assert_eq!(
            messages,
            vec![
                FlashMessage::success("Author successfully added!"),
                FlashMessage::warning("Second"),
            ]
        );
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_cookie_value_is_cookie_safe() {
        let jar = push(CookieJar::new(), vec![FlashMessage::success("Book 'Emma'; deleted, ok")]);
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_garbage_cookie_ignored() {
        assert!(decode("%%%not-base64").is_empty());
        assert!(decode(&URL_SAFE_NO_PAD.encode(b"{not json")).is_empty());
    }

    #[test]
    fn test_take_without_cookie() {
        let (_, messages) = take(CookieJar::new());
        assert!(messages.is_empty());
    }
}
