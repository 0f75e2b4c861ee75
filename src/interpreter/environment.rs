/*
 * ============================================================================
 *  PAWX - Code with Claws!
 * ============================================================================
 *
 *  File:     environment.rs
 *  Purpose:  Global scope for the clowder runtime. Holds declared
 *            classes, native functions and extension bindings.
 *
 *  Author:   Sam Wilcox
 *  Email:    sam@pawx-lang.com
 *  Website:  https://www.pawx-lang.com
 *  GitHub:   https://github.com/samwilcox/pawx
 *
 *  License:
 *  This file is part of the PAWX programming language project.
 *
 *  PAWX is dual-licensed under the terms of:
 *    - The MIT License
 *    - The Apache License, Version 2.0
 *
 *  You may choose either license to govern your use of this software.
 *  Full license text available at:
 *      https://license.pawx-lang.com
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under these licenses is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ============================================================================
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A single flat scope of named values.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a shared root scope.
    pub fn global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::new()))
    }

    /// Binds `name`, replacing any earlier binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Bound names, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_replaces_earlier_binding() {
        let mut scope = Environment::new();
        scope.define("cat", Value::from("Tom"));
        scope.define("cat", Value::from("Kit"));

        assert_eq!(scope.get("cat").unwrap().as_string(), Some("Kit"));
        assert_eq!(scope.local_names(), ["cat"]);
    }

    #[test]
    fn unbound_names_are_absent() {
        let scope = Environment::new();

        assert!(scope.get("dog").is_none());
        assert!(!scope.contains("dog"));
    }
}
