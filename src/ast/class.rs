/*
 * ==========================================================================
 * PAWX - Code with Claws! 🐾
 * ==========================================================================
 *
 * File:     class.rs
 * Purpose:  Defines the declaration side of a PAWX `clowder` (class)
 *
 * This file defines:
 *  - Method / Member
 *  - MemberMap
 *  - ClassDeclaration
 *
 * These are produced by:
 *  - host code building a clowder declaration
 *
 * And consumed by:
 *  - authority/ (construction authorities)
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * GitHub:   https://github.com/samwilcox/pawx
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
 *     https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::ClowderError;
use crate::interpreter::classes::{ClassObject, Instance};
use crate::value::Value;

/// Body of a method: receives the bound receiver (`this`) and the
/// already-evaluated arguments.
pub type MethodFn = dyn Fn(&Instance, Vec<Value>) -> Result<Value, ClowderError>;

/// A named, callable class member.
///
/// Cloning a `Method` shares the same body; [`Method::same_body`] tells
/// whether two handles point at the same body.
#[derive(Clone)]
pub struct Method {
    name: String,
    body: Rc<MethodFn>,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&Instance, Vec<Value>) -> Result<Value, ClowderError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the method body with `receiver` bound as `this`.
    pub fn invoke(&self, receiver: &Instance, args: Vec<Value>) -> Result<Value, ClowderError> {
        (self.body)(receiver, args)
    }

    pub fn same_body(&self, other: &Method) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Method {}]", self.name)
    }
}

/// Represents **one declared member inside a PAWX `clowder`**.
#[derive(Debug, Clone)]
pub enum Member {
    /// Callable member, invoked with a receiver
    Method(Method),

    /// Plain class-level value
    Value(Value),
}

impl Member {
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Member::Method(method) => Some(method),
            Member::Value(_) => None,
        }
    }
}

/// Member name → member, in declaration order.
pub type MemberMap = IndexMap<String, Member>;

/// A not-yet-finalized class: name, bases, and the proposed members.
///
/// Consumed by a construction authority, which either returns a finalized
/// [`ClassObject`] or refuses the declaration.
#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    pub name: String,
    pub bases: Vec<Rc<ClassObject>>,
    pub members: MemberMap,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            members: MemberMap::new(),
        }
    }

    /// Appends a base class (builder-style).
    pub fn base(mut self, base: Rc<ClassObject>) -> Self {
        self.bases.push(base);
        self
    }

    /// Declares a method member (builder-style).
    pub fn method(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&Instance, Vec<Value>) -> Result<Value, ClowderError> + 'static,
    ) -> Self {
        let name = name.into();
        let method = Method::new(name.clone(), body);
        self.members.insert(name, Member::Method(method));
        self
    }

    /// Declares a plain value member (builder-style).
    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), Member::Value(value));
        self
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }
}
