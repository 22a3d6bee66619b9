//! Request headers the Discord web client sends.
//!
//! The upstream only serves quests to requests that look like they come
//! from a desktop browser session, so the header set below is fixed.

use super::error::UpstreamError;
use base64::{Engine, engine::general_purpose};
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
    USER_AGENT,
};
use serde_json::json;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

const CLIENT_BUILD_NUMBER: u64 = 9298544;

const SUPER_PROPERTIES: &str = "x-super-properties";

const STATIC_HEADERS: &[(&str, &str)] = &[
    ("priority", "u=1, i"),
    (
        "sec-ch-ua",
        r#""Google Chrome";v="141", "Not?A_Brand";v="8", "Chromium";v="141""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""Linux""#),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("x-discord-locale", "en-US"),
];

/// Build the full header set for an authenticated quest request
pub fn build_headers(token: &str) -> Result<HeaderMap, UpstreamError> {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en,en-US;q=0.9,ar;q=0.8"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for &(name, value) in STATIC_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    let mut authorization =
        HeaderValue::from_str(token.trim()).map_err(|_| UpstreamError::InvalidCredential)?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    let properties = HeaderValue::from_str(&super_properties()).map_err(|e| {
        UpstreamError::InvalidHeader {
            name: SUPER_PROPERTIES,
            reason: e.to_string(),
        }
    })?;
    headers.insert(HeaderName::from_static(SUPER_PROPERTIES), properties);

    Ok(headers)
}

/// Base64 encoded JSON describing the pretend client
pub fn super_properties() -> String {
    let properties = json!({
        "os": "Linux",
        "browser": "Chrome",
        "device": "",
        "system_locale": "en-US",
        "browser_user_agent": BROWSER_USER_AGENT,
        "browser_version": "124.0.0.0",
        "os_version": "10",
        "referrer": "",
        "referring_domain": "",
        "referrer_current": "",
        "referring_domain_current": "",
        "release_channel": "stable",
        "client_build_number": CLIENT_BUILD_NUMBER,
        "client_event_source": null,
        "design_id": 0
    });

    general_purpose::STANDARD.encode(properties.to_string())
}
