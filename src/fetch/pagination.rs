use serde_json::Value;
use url::Url;

use crate::error::{ImportError, ImportResult};
use crate::traits::{HttpClient, HttpResponse};

use super::ResourceRecord;

/// Extract the `rel="next"` target from an RFC 8288 `Link` header
pub fn next_link(header: &str) -> Option<String> {
    header
        .split(',')
        .find(|link| link.contains("rel=\"next\""))
        .and_then(|link| link.split(';').next())
        .map(|target| {
            target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        })
        .filter(|target| !target.is_empty())
}

/// GET a URL and fail on anything but a 2xx
fn get_ok(http: &dyn HttpClient, url: &str, headers: &[(&str, &str)]) -> ImportResult<HttpResponse> {
    let response = http
        .get(url, headers)
        .map_err(|e| ImportError::Transport(format!("{:#}", e)))?;

    if !response.is_success() {
        return Err(ImportError::Http {
            status: response.status,
            url: url.to_string(),
            body: response.body,
        });
    }

    Ok(response)
}

fn parse_body(url: &str, body: &str) -> ImportResult<Value> {
    serde_json::from_str(body).map_err(|e| ImportError::InvalidResponse {
        url: url.to_string(),
        message: format!("body is not valid JSON: {}", e),
    })
}

/// Follow `Link: <...>; rel="next"` headers, where every page body is a JSON array
pub fn fetch_link_paginated(
    http: &dyn HttpClient,
    start_url: &str,
    headers: &[(&str, &str)],
) -> ImportResult<Vec<ResourceRecord>> {
    let mut records = Vec::new();
    let mut next = Some(start_url.to_string());
    let mut pages = 0usize;

    while let Some(url) = next {
        let response = get_ok(http, &url, headers)?;

        match parse_body(&url, &response.body)? {
            Value::Array(page) => records.extend(page),
            other => {
                return Err(ImportError::InvalidResponse {
                    url,
                    message: format!("expected a JSON array, got {}", json_kind(&other)),
                });
            }
        }

        pages += 1;
        next = response.header("link").and_then(next_link);
    }

    tracing::debug!(pages, records = records.len(), "link pagination finished");
    Ok(records)
}

/// Follow `nextPageToken` in the body, feeding it back as `pageToken`.
/// Every page is an object whose `items` array may be absent on empty pages.
pub fn fetch_token_paginated(
    http: &dyn HttpClient,
    start_url: &Url,
    headers: &[(&str, &str)],
) -> ImportResult<Vec<ResourceRecord>> {
    let mut records = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let mut url = start_url.clone();
        if let Some(token) = &page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        let response = get_ok(http, url.as_str(), headers)?;
        let body = parse_body(url.as_str(), &response.body)?;

        let mut page = match body {
            Value::Object(page) => page,
            other => {
                return Err(ImportError::InvalidResponse {
                    url: url.to_string(),
                    message: format!("expected a JSON object, got {}", json_kind(&other)),
                });
            }
        };

        match page.remove("items") {
            Some(Value::Array(items)) => records.extend(items),
            None | Some(Value::Null) => {}
            Some(other) => {
                return Err(ImportError::InvalidResponse {
                    url: url.to_string(),
                    message: format!("'items' should be an array, got {}", json_kind(&other)),
                });
            }
        }

        pages += 1;
        page_token = page
            .get("nextPageToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        if page_token.is_none() {
            break;
        }
    }

    tracing::debug!(pages, records = records.len(), "token pagination finished");
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
