/*
 * =============================================================================
 *  PAWX - Code with Claws!
 * =============================================================================
 *
 *  File:     classes.rs
 *  Purpose:  Runtime Class System for the clowder runtime.
 *            Implements finalized class objects, instance creation,
 *            member lookup through bases, method dispatch and `this` binding.
 *
 *  Author:   Sam Wilcox
 *  Email:    sam@pawx-lang.com
 *  Website:  https://www.pawx-lang.com
 *  GitHub:   https://github.com/samwilcox/pawx
 *
 * -----------------------------------------------------------------------------
 *  License:
 * -----------------------------------------------------------------------------
 *  This file is part of the PAWX programming language project.
 *
 *  PAWX is dual-licensed under the terms of:
 *    - The MIT License
 *    - The Apache License, Version 2.0
 *
 *  You may choose either license to govern your use of this software.
 *
 *  Full license text available at:
 *      https://license.pawx-lang.com
 *
 * -----------------------------------------------------------------------------
 *  Warranty Disclaimer:
 * -----------------------------------------------------------------------------
 *  Unless required by applicable law or agreed to in writing, this software is
 *  distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 *  either express or implied.
 *
 * =============================================================================
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::ast::class::{Member, MemberMap, Method};
use crate::error::ClowderError;
use crate::value::Value;

/// ==========================================================================
/// CLASS OBJECT
/// ==========================================================================

/// A finalized class.
///
/// Produced only by a construction authority; its member mapping is never
/// changed afterwards. Instances share it through `Rc`.
pub struct ClassObject {
    name: String,
    bases: Vec<Rc<ClassObject>>,
    members: MemberMap,
    authority: String,
}

impl ClassObject {
    pub(crate) fn new(
        name: String,
        bases: Vec<Rc<ClassObject>>,
        members: MemberMap,
        authority: String,
    ) -> Self {
        Self {
            name,
            bases,
            members,
            authority,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[Rc<ClassObject>] {
        &self.bases
    }

    /// Name of the construction authority that finalized this class.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Members declared (or synthesized) on this class only.
    pub fn members(&self) -> &MemberMap {
        &self.members
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Resolves a member on this class, then on each base depth-first,
    /// left to right.
    pub fn lookup(&self, name: &str) -> Option<&Member> {
        if let Some(member) = self.members.get(name) {
            return Some(member);
        }

        self.bases.iter().find_map(|base| base.lookup(name))
    }

    /// True if `self` is `other` or inherits from it.
    pub fn is_subclass_of(self: &Rc<Self>, other: &Rc<ClassObject>) -> bool {
        if Rc::ptr_eq(self, other) {
            return true;
        }

        self.bases.iter().any(|base| base.is_subclass_of(other))
    }
}

impl fmt::Debug for ClassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassObject")
            .field("name", &self.name)
            .field("bases", &self.bases.iter().map(|b| b.name()).collect::<Vec<_>>())
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .field("authority", &self.authority)
            .finish()
    }
}

/// ==========================================================================
/// INSTANCE
/// ==========================================================================

/// Instance of a finalized class.
///
/// Per-instance fields live here, separate from the class's members.
/// Cloning an `Instance` yields another handle to the same object.
#[derive(Clone)]
pub struct Instance {
    class: Rc<ClassObject>,
    fields: Rc<RefCell<HashMap<String, Value>>>,
}

impl Instance {
    pub fn class(&self) -> &Rc<ClassObject> {
        &self.class
    }

    /// `isinstance`-style check against the class and all its bases.
    pub fn is_instance_of(&self, class: &Rc<ClassObject>) -> bool {
        self.class.is_subclass_of(class)
    }

    /// Resolves property access on an instance (`obj.property`).
    ///
    /// Supports:
    /// - Direct fields
    /// - Class values
    /// - Methods (returned as bound native functions)
    pub fn get(&self, name: &str) -> Result<Value, ClowderError> {
        if let Some(val) = self.fields.borrow().get(name) {
            return Ok(val.clone());
        }

        match self.class.lookup(name) {
            Some(Member::Value(val)) => Ok(val.clone()),

            Some(Member::Method(method)) => {
                let method = method.clone();
                let receiver = self.clone();
                Ok(Value::native(move |args| method.invoke(&receiver, args)))
            }

            None => Err(self.undefined(name)),
        }
    }

    /// Assigns a per-instance field (`obj.property = value`).
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }

    /// Looks up a field, returning `Null` when it was never assigned.
    pub fn field(&self, name: &str) -> Value {
        self.fields.borrow().get(name).cloned().unwrap_or(Value::Null)
    }

    /// Invokes the method `name` with this instance bound as `this`.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, ClowderError> {
        let method = self.method(name)?;
        debug!(class = %self.class.name(), method = %name, "dispatching method");
        method.invoke(self, args)
    }

    fn method(&self, name: &str) -> Result<Method, ClowderError> {
        match self.class.lookup(name) {
            Some(Member::Method(method)) => Ok(method.clone()),

            Some(Member::Value(val)) => Err(ClowderError::type_error(format!(
                "member '{}' of '{}' is a {}, not a method",
                name,
                self.class.name(),
                val.type_name()
            ))),

            None => Err(self.undefined(name)),
        }
    }

    fn undefined(&self, name: &str) -> ClowderError {
        ClowderError::reference_error(format!(
            "Undefined member '{}' on instance of '{}'",
            name,
            self.class.name()
        ))
    }
}

/// ==========================================================================
/// INSTANCE CONSTRUCTION
/// ==========================================================================

/// Constructs a new runtime instance of a class.
///
/// This function:
/// - Creates an instance with its own empty field map
/// - Runs the constructor (`new`) if the class or a base defines one
///
/// # Returns
/// A fully initialized `Instance`
pub fn construct_instance(
    class: &Rc<ClassObject>,
    args: Vec<Value>,
) -> Result<Instance, ClowderError> {
    let instance = Instance {
        class: Rc::clone(class),
        fields: Rc::new(RefCell::new(HashMap::new())),
    };

    match class.lookup("new") {
        Some(Member::Method(constructor)) => {
            // Constructors discard return values
            constructor.invoke(&instance, args)?;
        }

        Some(Member::Value(_)) => {
            return Err(ClowderError::type_error(format!(
                "constructor 'new' of '{}' is not a method",
                class.name()
            )));
        }

        None => {}
    }

    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::class::ClassDeclaration;
    use crate::authority::{BaseAuthority, ConstructionAuthority};

    fn animal() -> Rc<ClassObject> {
        let decl = ClassDeclaration::new("Animal")
            .method("new", |this, args| {
                this.set("name", args.first().cloned().unwrap_or(Value::Null));
                Ok(Value::Null)
            })
            .method("describe", |this, _| {
                Ok(Value::String(format!("animal {}", this.field("name").as_string().unwrap_or("?"))))
            })
            .value("legs", Value::from(4.0));

        BaseAuthority.construct(decl).unwrap()
    }

    #[test]
    fn constructor_sets_per_instance_fields() {
        let class = animal();
        let tom = construct_instance(&class, vec![Value::from("Tom")]).unwrap();
        let kit = construct_instance(&class, vec![Value::from("Kit")]).unwrap();

        assert_eq!(tom.field("name").as_string(), Some("Tom"));
        assert_eq!(kit.field("name").as_string(), Some("Kit"));

        tom.set("name", Value::from("Thomas"));
        assert_eq!(kit.field("name").as_string(), Some("Kit"));
    }

    #[test]
    fn methods_and_values_resolve_through_bases() {
        let base = animal();
        let cat = BaseAuthority
            .construct(ClassDeclaration::new("Cat").base(Rc::clone(&base)))
            .unwrap();

        let felix = construct_instance(&cat, vec![Value::from("Felix")]).unwrap();

        assert_eq!(felix.call("describe", vec![]).unwrap().as_string(), Some("animal Felix"));
        assert_eq!(felix.get("legs").unwrap().as_number(), Some(4.0));
        assert!(felix.is_instance_of(&cat));
        assert!(felix.is_instance_of(&base));
        assert_eq!(cat.bases().len(), 1);
    }

    #[test]
    fn bound_method_keeps_its_receiver() {
        let class = animal();
        let tom = construct_instance(&class, vec![Value::from("Tom")]).unwrap();

        let bound = tom.get("describe").unwrap();
        assert_eq!(bound.call(vec![]).unwrap().as_string(), Some("animal Tom"));
    }

    #[test]
    fn unknown_member_is_a_reference_error() {
        let tom = construct_instance(&animal(), vec![]).unwrap();

        assert_eq!(tom.call("fly", vec![]).unwrap_err().code, "E_REFERENCE");
        assert_eq!(tom.get("fly").unwrap_err().code, "E_REFERENCE");
    }

    #[test]
    fn calling_a_value_member_is_a_type_error() {
        let tom = construct_instance(&animal(), vec![]).unwrap();
        assert_eq!(tom.call("legs", vec![]).unwrap_err().code, "E_TYPE");
    }

    #[test]
    fn fields_shadow_class_members() {
        let tom = construct_instance(&animal(), vec![]).unwrap();
        tom.set("legs", Value::from(3.0));

        assert_eq!(tom.get("legs").unwrap().as_number(), Some(3.0));
    }
}
