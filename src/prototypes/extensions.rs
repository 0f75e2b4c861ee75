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

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::value::Value;

/// A compiled-in bundle of named values that may be bound into a scope.
pub trait Extension {
    fn name(&self) -> &str;

    /// Name/value pairs to bind.
    fn bindings(&self) -> Vec<(String, Value)>;
}

/// Extensions known to this build, by name.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<String, Rc<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every extension that ships with the runtime.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Rc::new(FromInternet::default()));
        registry
    }

    /// Adds `extension`, replacing any extension with the same name.
    pub fn register(&mut self, extension: Rc<dyn Extension>) {
        self.extensions.insert(extension.name().to_string(), extension);
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Extension>> {
        self.extensions.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }
}

/// Binds `from_internet()`, which prints a greeting.
pub struct FromInternet {
    greeting: String,
}

impl FromInternet {
    pub const NAME: &'static str = "from_internet";

    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
        }
    }
}

impl Default for FromInternet {
    fn default() -> Self {
        Self::new("Hello from the internet!")
    }
}

impl Extension for FromInternet {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn bindings(&self) -> Vec<(String, Value)> {
        let greeting = self.greeting.clone();

        vec![(
            Self::NAME.to_string(),
            Value::native(move |_args| {
                println!("{}", greeting);
                Ok(Value::Null)
            }),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_include_from_internet() {
        let registry = ExtensionRegistry::with_builtins();

        assert_eq!(registry.names().collect::<Vec<_>>(), ["from_internet"]);

        let bindings = registry.get("from_internet").unwrap().bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].0, "from_internet");
        assert!(matches!(bindings[0].1.call(vec![]), Ok(Value::Null)));
    }

    #[test]
    fn unknown_extension_is_absent() {
        assert!(ExtensionRegistry::with_builtins().get("rm_rf").is_none());
    }
}
