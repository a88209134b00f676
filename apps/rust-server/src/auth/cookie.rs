// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie lookup on request headers.

use axum::http::{header::COOKIE, HeaderMap};

/// Default name of the cookie carrying the access token.
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Returns the value of cookie `name`, searching every `Cookie` header.
///
/// The first pair named `name` wins. An empty value counts as absent.
/// A value wrapped in double quotes is unwrapped.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| unquote(value.trim()))
        .filter(|value| !value.is_empty())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
