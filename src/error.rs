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

use std::fmt;

/// Classifies a [`ClowderError`] so callers can match on the failure
/// without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A class declaration lacked a member its authority requires.
    MissingRequiredMember { member: String },

    /// A remote collaborator (HTTP fetch) could not be reached or answered
    /// with an error.
    CollaboratorUnavailable,

    /// Fetched remote content was rejected or could not be applied.
    RemoteExecutionError,

    Runtime,
    Type,
    Reference,
    Config,
}

#[derive(Debug, Clone)]
pub struct ClowderError {
    /// Stable error code (E_RUNTIME, E_MISSING_MEMBER, …)
    pub code: &'static str,

    pub kind: ErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Optional note / help text
    pub help: Option<String>,
}

impl ClowderError {
    /// Generic constructor
    pub fn new(code: &'static str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code,
            kind,
            message: message.into(),
            help: None,
        }
    }

    /// A construction authority rejected `class_name` because `member`
    /// was not declared.
    pub fn missing_required_member(member: impl Into<String>, class_name: &str) -> Self {
        let member = member.into();
        let message = format!(
            "class '{}' is missing required member '{}'",
            class_name, member
        );

        Self::new(
            "E_MISSING_MEMBER",
            ErrorKind::MissingRequiredMember { member },
            message,
        )
    }

    /// Network or transport failure talking to a remote collaborator.
    pub fn collaborator_unavailable(message: impl Into<String>) -> Self {
        Self::new("E_COLLABORATOR", ErrorKind::CollaboratorUnavailable, message)
    }

    /// Remote content was fetched but refused (bad digest, bad manifest,
    /// unknown extension).
    pub fn remote_execution(message: impl Into<String>) -> Self {
        Self::new("E_REMOTE_EXEC", ErrorKind::RemoteExecutionError, message)
    }

    /// Runtime error (during evaluation)
    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new("E_RUNTIME", ErrorKind::Runtime, message)
    }

    /// Type error (invalid operation / operand types)
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("E_TYPE", ErrorKind::Type, message)
    }

    /// Reference error (undefined variable, member, etc.)
    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::new("E_REFERENCE", ErrorKind::Reference, message)
    }

    /// Invalid configuration value
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new("E_CONFIG", ErrorKind::Config, message)
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Name of the missing member when this is a
    /// [`ErrorKind::MissingRequiredMember`] error.
    pub fn missing_member(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::MissingRequiredMember { member } => Some(member),
            _ => None,
        }
    }
}

impl fmt::Display for ClowderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;

        if let Some(help) = &self.help {
            write!(f, "\nhelp: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for ClowderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_member_names_the_member() {
        let err = ClowderError::missing_required_member("speak", "Person");

        assert_eq!(err.code, "E_MISSING_MEMBER");
        assert_eq!(err.missing_member(), Some("speak"));
        assert!(err.message.contains("Person"));
    }

    #[test]
    fn display_includes_help() {
        let err = ClowderError::reference_error("undefined member 'fly'")
            .with_help("declare it on the class or a base");

        let rendered = err.to_string();
        assert!(rendered.starts_with("error[E_REFERENCE]: undefined member 'fly'"));
        assert!(rendered.ends_with("help: declare it on the class or a base"));
    }
}
