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

use std::collections::BTreeSet;
use std::str::FromStr;

use regex::Regex;

use crate::error::ClowderError;

/// Decides which declared methods get a decorated `_`-prefixed twin.
#[derive(Debug, Clone)]
pub enum DecorationSelector {
    /// Any member whose name contains the substring, anywhere.
    /// `run` matches `run`, `rerun` and `running`.
    Substring(String),

    /// Any member whose name matches the pattern.
    Pattern(Regex),

    /// Exactly the listed member names.
    Explicit(BTreeSet<String>),
}

impl DecorationSelector {
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DecorationSelector::Explicit(names.into_iter().map(Into::into).collect())
    }

    pub fn selects(&self, name: &str) -> bool {
        match self {
            DecorationSelector::Substring(needle) => name.contains(needle.as_str()),
            DecorationSelector::Pattern(re) => re.is_match(name),
            DecorationSelector::Explicit(names) => names.contains(name),
        }
    }
}

impl Default for DecorationSelector {
    fn default() -> Self {
        DecorationSelector::Substring("run".to_string())
    }
}

/// Parses `substring:<text>`, `regex:<pattern>` or `names:<a,b,...>`.
/// A bare string is taken as a substring.
impl FromStr for DecorationSelector {
    type Err = ClowderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind.trim(), rest),
            None => ("substring", s),
        };

        match kind {
            "substring" => Ok(DecorationSelector::Substring(rest.to_string())),

            "regex" => Regex::new(rest)
                .map(DecorationSelector::Pattern)
                .map_err(|e| ClowderError::config_error(format!("invalid decoration pattern: {}", e))),

            "names" => Ok(DecorationSelector::explicit(
                rest.split(',').map(str::trim).filter(|n| !n.is_empty()),
            )),

            other => Err(ClowderError::config_error(format!(
                "unknown decoration selector '{}'",
                other
            ))
            .with_help("use substring:<text>, regex:<pattern> or names:<a,b>")),
        }
    }
}
