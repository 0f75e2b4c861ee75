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
 *    https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::time::Duration;

use serde::Deserialize;

use crate::authority::announce::DEFAULT_ANNOUNCEMENT;
use crate::error::ClowderError;

/// Runtime configuration.
///
/// Defaults are overridden by a JSON document and/or `CLOWDER_*`
/// environment variables:
///
/// | variable                        | field                          |
/// |---------------------------------|--------------------------------|
/// | `CLOWDER_REQUIRED_MEMBERS`      | `required_members` (comma list)|
/// | `CLOWDER_DECORATE`              | `decorate`                     |
/// | `CLOWDER_ANNOUNCEMENT`          | `announcement`                 |
/// | `CLOWDER_REMOTE_URL`            | `remote.url`                   |
/// | `CLOWDER_TIMEOUT_SECS`          | `remote.timeout_secs`          |
/// | `CLOWDER_CONNECT_TIMEOUT_SECS`  | `remote.connect_timeout_secs`  |
/// | `CLOWDER_PINNED_SHA256`         | `remote.pinned_sha256`         |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub required_members: Vec<String>,

    /// Decoration selector, see `DecorationSelector::from_str`.
    pub decorate: String,

    pub announcement: String,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Manifest location. `None` means the bundled manifest is used.
    pub url: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,

    /// Hex SHA-256 the fetched manifest must hash to.
    pub pinned_sha256: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_members: vec!["speak".to_string()],
            decorate: "substring:run".to_string(),
            announcement: DEFAULT_ANNOUNCEMENT.to_string(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            pinned_sha256: None,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ClowderError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ClowderError> {
        serde_json::from_str(text)
            .map_err(|e| ClowderError::config_error(format!("invalid config: {}", e)))
    }

    /// Applies `CLOWDER_*` overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ClowderError> {
        if let Some(list) = lookup("CLOWDER_REQUIRED_MEMBERS") {
            self.required_members = list
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(decorate) = lookup("CLOWDER_DECORATE") {
            self.decorate = decorate;
        }

        if let Some(announcement) = lookup("CLOWDER_ANNOUNCEMENT") {
            self.announcement = announcement;
        }

        if let Some(url) = lookup("CLOWDER_REMOTE_URL") {
            self.remote.url = Some(url).filter(|u| !u.is_empty());
        }

        if let Some(secs) = lookup("CLOWDER_TIMEOUT_SECS") {
            self.remote.timeout_secs = parse_secs("CLOWDER_TIMEOUT_SECS", &secs)?;
        }

        if let Some(secs) = lookup("CLOWDER_CONNECT_TIMEOUT_SECS") {
            self.remote.connect_timeout_secs = parse_secs("CLOWDER_CONNECT_TIMEOUT_SECS", &secs)?;
        }

        if let Some(digest) = lookup("CLOWDER_PINNED_SHA256") {
            self.remote.pinned_sha256 = Some(digest.trim().to_lowercase()).filter(|d| !d.is_empty());
        }

        Ok(())
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, ClowderError> {
    raw.trim().parse::<u64>().map_err(|_| {
        ClowderError::config_error(format!("{} must be a whole number of seconds, got '{}'", key, raw))
    })
}
