use anyhow::{Context, Result};
use std::collections::HashMap;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;

/// A fully-read HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are stored lowercased
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    #[cfg(test)]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    #[cfg(test)]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client trait for testing.
///
/// Returns every response that arrives, whatever its status; only transport
/// failures are errors. Callers decide what a non-2xx status means.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        tracing::debug!(url, "GET");

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .with_context(|| format!("Failed to fetch URL: {}", url))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from: {}", url))?;

        tracing::debug!(url, status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A request seen by MockHttpClient
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Scripted HTTP client: replies in order, records every request
#[cfg(test)]
pub struct MockHttpClient {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<HttpResponse>) -> Self {
        let client = Self::new();
        for response in responses {
            client.push(response);
        }
        client
    }

    pub fn push(&self, response: HttpResponse) {
        self.replies.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport-level failure
    pub fn push_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl HttpClient for MockHttpClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => anyhow::bail!("Failed to fetch URL: {}: {}", url, message),
            None => anyhow::bail!("No more mock HTTP responses available for {}", url),
        }
    }
}
