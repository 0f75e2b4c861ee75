/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Remote Extension Loading
 * ------------------------
 * Loads behaviour that is not known when a program is written, without
 * ever evaluating fetched text:
 *
 *  1. Fetch the manifest text from a URL
 *  2. Check its SHA-256 against a pinned digest (when one is configured)
 *  3. Parse it as JSON: { "extensions": ["from_internet", ...] }
 *  4. Bind each named, compiled-in extension into the target scope
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * Github:   https://github.com/samwilcox/pawx
 *
 * License:
 * This file is part of the PAWX programming language project.
 *
 * PAWX is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *    https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::ClowderError;
use crate::interpreter::environment::Environment;
use crate::prototypes::extensions::ExtensionRegistry;
use crate::prototypes::http::Fetcher;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub extensions: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, ClowderError> {
        serde_json::from_str(text).map_err(|e| {
            ClowderError::remote_execution(format!("remote manifest is not valid: {}", e))
                .with_help("a manifest is JSON of the form {\"extensions\": [\"name\", ...]}")
        })
    }
}

/// Lowercase hex SHA-256 of `text`.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

pub struct RemoteLoader {
    fetcher: Rc<dyn Fetcher>,
    registry: ExtensionRegistry,
    pinned_sha256: Option<String>,
}

impl RemoteLoader {
    pub fn new(fetcher: Rc<dyn Fetcher>, registry: ExtensionRegistry) -> Self {
        Self {
            fetcher,
            registry,
            pinned_sha256: None,
        }
    }

    /// Requires fetched manifests to hash to `digest` (hex, any case).
    pub fn pinned(mut self, digest: Option<String>) -> Self {
        self.pinned_sha256 = digest.map(|d| d.trim().to_lowercase());
        self
    }

    /// Fetches and checks the manifest at `url`.
    pub fn manifest(&self, url: &str) -> Result<Manifest, ClowderError> {
        let text = self.fetcher.fetch(url)?;

        if let Some(expected) = &self.pinned_sha256 {
            let actual = sha256_hex(&text);
            if &actual != expected {
                return Err(ClowderError::remote_execution(format!(
                    "manifest from {} has sha256 {}, expected {}",
                    url, actual, expected
                )));
            }
        }

        Manifest::parse(&text)
    }

    /// Loads the manifest at `url` and binds every extension it names into
    /// `scope`. Returns the bound names.
    ///
    /// All extensions are resolved before anything is bound, so a manifest
    /// naming an unknown extension leaves `scope` untouched.
    pub fn load(
        &self,
        url: &str,
        scope: &Rc<RefCell<Environment>>,
    ) -> Result<Vec<String>, ClowderError> {
        let manifest = self.manifest(url)?;
        debug!(url, extensions = ?manifest.extensions, "manifest accepted");

        let extensions = manifest
            .extensions
            .iter()
            .map(|name| {
                self.registry.get(name).ok_or_else(|| {
                    ClowderError::remote_execution(format!("unknown extension '{}'", name))
                        .with_help(format!(
                            "extensions in this build: {}",
                            self.registry.names().collect::<Vec<_>>().join(", ")
                        ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut bound = Vec::new();
        let mut scope = scope.borrow_mut();

        for extension in extensions {
            for (name, value) in extension.bindings() {
                info!(extension = extension.name(), binding = %name, "binding extension");
                scope.define(name.clone(), value);
                bound.push(name);
            }
        }

        Ok(bound)
    }
}
