/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * Github:   https://github.com/samwilcox/pawx
 *
 * License:
 * This file is part of the PAWX programming language project.
 *
 * PAWX is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *     https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::ClowderError;
use crate::value::Value;

/* ============================================================================
 * FETCHERS
 * ============================================================================
 */

/// Retrieves the text body behind a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, ClowderError>;
}

/// Blocking HTTP GET with request and connect timeouts.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(timeout)
                .timeout_connect(connect_timeout)
                .build(),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(config.timeout(), config.connect_timeout())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ClowderError> {
        debug!(url, "fetching remote text");

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| request_failed(url, e))?;

        response.into_string().map_err(|e| {
            ClowderError::collaborator_unavailable(format!("failed to read body of {}: {}", url, e))
        })
    }
}

/// Maps a failed request onto [`ClowderError::collaborator_unavailable`].
fn request_failed(url: &str, err: ureq::Error) -> ClowderError {
    match err {
        ureq::Error::Status(code, _) => {
            ClowderError::collaborator_unavailable(format!("GET {} returned status {}", url, code))
        }
        ureq::Error::Transport(t) => {
            ClowderError::collaborator_unavailable(format!("GET {} failed: {}", url, t))
        }
    }
}

/// Serves fixed bodies from memory. Unknown URLs are unavailable.
#[derive(Clone, Debug, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String, ClowderError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| ClowderError::collaborator_unavailable(format!("no route to {}", url)))
    }
}

/* ============================================================================
 * PUBLIC API
 * ============================================================================
 */

/// Builds the global `Http` object.
///
/// `Http.get(url)` returns the response text as a string. Only the text
/// is returned; nothing fetched is ever evaluated.
pub fn create_global_http_object(fetcher: Rc<dyn Fetcher>) -> Value {
    let get = Value::native(move |args| {
        let url = args
            .first()
            .and_then(Value::as_string)
            .ok_or_else(|| ClowderError::type_error("Http.get(url) requires a string url"))?;

        fetcher.fetch(url).map(Value::String)
    });

    Value::object(vec![("get".to_string(), get)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn static_fetcher_serves_known_urls() {
        let fetcher = StaticFetcher::new().with("mem://a", "hello");

        assert_eq!(fetcher.fetch("mem://a").unwrap(), "hello");
        assert_eq!(
            fetcher.fetch("mem://b").unwrap_err().kind,
            ErrorKind::CollaboratorUnavailable
        );
    }

    #[test]
    fn http_object_get_returns_text() {
        let http = create_global_http_object(Rc::new(StaticFetcher::new().with("mem://a", "hi")));

        let get = match &http {
            Value::Object { fields } => fields.borrow()["get"].clone(),
            other => panic!("expected object, got {:?}", other),
        };

        assert_eq!(get.call(vec![Value::from("mem://a")]).unwrap().as_string(), Some("hi"));
        assert_eq!(get.call(vec![]).unwrap_err().code, "E_TYPE");
    }

    #[test]
    fn error_status_is_collaborator_unavailable() {
        let response = ureq::Response::new(503, "Service Unavailable", "").unwrap();
        let err = request_failed("http://cats.test/m", ureq::Error::Status(503, response));

        assert_eq!(err.kind, ErrorKind::CollaboratorUnavailable);
        assert!(err.message.contains("503"));
    }

    #[test]
    fn transport_failure_is_collaborator_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = request_failed("http://cats.test/m", ureq::Error::from(io));

        assert_eq!(err.kind, ErrorKind::CollaboratorUnavailable);
        assert!(err.message.starts_with("GET http://cats.test/m failed"));
    }

    #[test]
    fn malformed_url_fails_before_connecting() {
        let fetcher = HttpFetcher::new(Duration::from_millis(200), Duration::from_millis(200));
        let err = fetcher.fetch("not a url").unwrap_err();

        assert_eq!(err.kind, ErrorKind::CollaboratorUnavailable);
    }
}
