//! Test helpers: sample provider records and a context wired to mocks

#![cfg(test)]

use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::ImporterConfig;
use crate::context::Context;
use crate::import::SequentialSuffix;
use crate::traits::{
    MockCommandExecutor, MockFileSystem, MockHttpClient, MockOutput, MockResponse, MockUserInput,
};

/// Okta user record as returned by `/api/v1/users`
pub fn okta_user(id: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "id": id,
        "status": "ACTIVE",
        "profile": {
            "firstName": first_name,
            "lastName": last_name,
            "login": format!("{}.{}@example.com", first_name.to_lowercase(), last_name.to_lowercase()),
        }
    })
}

/// Okta group record as returned by `/api/v1/groups`
pub fn okta_group(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "type": "OKTA_GROUP",
        "profile": {"name": name, "description": null}
    })
}

/// Mocks kept alongside the context built from them, for assertions
pub struct TestHarness {
    pub fs: Arc<MockFileSystem>,
    pub input: Arc<MockUserInput>,
    pub output: Arc<MockOutput>,
    pub command: Arc<MockCommandExecutor>,
    pub http: Arc<MockHttpClient>,
}

impl TestHarness {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            input: Arc::new(MockUserInput::with_responses(responses)),
            output: Arc::new(MockOutput::new()),
            command: Arc::new(MockCommandExecutor::new()),
            http: Arc::new(MockHttpClient::new()),
        }
    }

    pub fn with_fs(mut self, fs: MockFileSystem) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    pub fn with_command(mut self, command: MockCommandExecutor) -> Self {
        self.command = Arc::new(command);
        self
    }

    pub fn with_http(mut self, http: MockHttpClient) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Context writing to `/out` with file suffixes starting at 1000
    pub fn context(&self) -> Context {
        Context {
            fs: self.fs.clone(),
            input: self.input.clone(),
            output: self.output.clone(),
            command: self.command.clone(),
            http: self.http.clone(),
            suffix: Arc::new(SequentialSuffix::starting_at(1000)),
            config: ImporterConfig {
                output_dir: "/out".into(),
                ..ImporterConfig::default()
            },
        }
    }
}
