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

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::ClowderError;
use crate::interpreter::classes::{ClassObject, Instance};

/// Signature of a native host function:
/// takes a vector of PAWX Values → returns a PAWX Value or an error.
pub type NativeFn = dyn Fn(Vec<Value>) -> Result<Value, ClowderError>;

/// PAWX runtime value representation.
///
/// Every member value, field, argument and return value in the clowder
/// runtime is one of these.
#[derive(Clone)]
pub enum Value {
    // Primitive scalars
    Number(f64),
    String(String),
    Bool(bool),
    Null,

    NativeFunction(Rc<NativeFn>),

    // Plain object:
    // - Shared mutable field map
    Object {
        fields: Rc<RefCell<HashMap<String, Value>>>,
    },

    // Finalized class, shared by every instance built from it
    Class(Rc<ClassObject>),

    // Instance of a class
    Instance(Instance),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Null => write!(f, "Null"),

            Value::NativeFunction(_) => write!(f, "[NativeFunction]"),

            Value::Object { .. } => write!(f, "[Object]"),

            Value::Class(class) => write!(f, "[Class {}]", class.name()),

            Value::Instance(instance) => write!(f, "[Instance {}]", instance.class().name()),
        }
    }
}

impl Value {
    /// Wraps a Rust closure as a callable runtime value.
    pub fn native(
        func: impl Fn(Vec<Value>) -> Result<Value, ClowderError> + 'static,
    ) -> Value {
        Value::NativeFunction(Rc::new(func))
    }

    /// Builds a plain object from key/value pairs.
    pub fn object(fields: impl IntoIterator<Item = (String, Value)>) -> Value {
        Value::Object {
            fields: Rc::new(RefCell::new(fields.into_iter().collect())),
        }
    }

    /// Returns a stable type name string (useful for errors).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_)         => "Number",
            Value::String(_)         => "String",
            Value::Bool(_)           => "Bool",
            Value::Null              => "Null",
            Value::Object { .. }     => "Object",
            Value::Class(_)          => "Class",
            Value::Instance(_)       => "Instance",
            Value::NativeFunction(_) => "Function",
        }
    }

    /// `isclass`-style check: true only for finalized classes.
    pub fn is_class(&self) -> bool {
        matches!(self, Value::Class(_))
    }

    /// Attempts to extract a String reference from a Value.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Invokes a callable value.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, ClowderError> {
        match self {
            Value::NativeFunction(f) => f(args),
            other => Err(ClowderError::type_error(format!(
                "{} is not callable",
                other.type_name()
            ))),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calling_a_non_function_is_a_type_error() {
        let err = Value::Number(3.0).call(vec![]).unwrap_err();
        assert_eq!(err.code, "E_TYPE");
    }

    #[test]
    fn only_classes_are_classes() {
        use crate::ast::class::ClassDeclaration;
        use crate::authority::{BaseAuthority, ConstructionAuthority};
        use crate::interpreter::classes::construct_instance;

        let class = BaseAuthority.construct(ClassDeclaration::new("Cat")).unwrap();
        let tom = construct_instance(&class, vec![]).unwrap();

        assert!(Value::Class(Rc::clone(&class)).is_class());
        assert!(!Value::Instance(tom).is_class());
        assert!(!Value::object(Vec::new()).is_class());
    }
}
