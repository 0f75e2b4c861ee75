/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Runtime Entry & Bootstrap
 * -------------------------
 * This module is the **primary runtime entrypoint** for the clowder
 * runtime. It is responsible for:
 *
 *  - Creating the global execution environment
 *  - Installing the built-in global objects
 *  - Declaring classes through a construction authority
 *  - Creating instances of declared classes
 *  - Loading remote extensions into the global scope
 *
 * The actual work is delegated to the following submodules:
 *
 *  - classes.rs     → Class & instance behavior
 *  - environment.rs → Scopes
 *  - display.rs     → Value formatting utilities
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

pub mod classes;
pub mod display;
pub mod environment;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::ast::class::ClassDeclaration;
use crate::authority::ConstructionAuthority;
use crate::error::ClowderError;
use crate::prototypes::http::{create_global_http_object, Fetcher};
use crate::remote::RemoteLoader;
use crate::value::Value;

use classes::{construct_instance, ClassObject, Instance};
use display::value_to_string;
use environment::Environment;

pub struct Runtime {
    globals: Rc<RefCell<Environment>>,
}

impl Runtime {
    /// Creates a runtime whose globals hold `meow` and the `Http` object.
    pub fn new(fetcher: Rc<dyn Fetcher>) -> Self {
        let globals = Environment::global();

        // -------------------------------------------------------------------------
        // Built-in: meow(...)
        // -------------------------------------------------------------------------
        globals.borrow_mut().define(
            "meow",
            Value::native(|args| {
                let parts: Vec<String> = args.iter().map(value_to_string).collect();
                println!("{}", parts.join(" "));
                Ok(Value::Null)
            }),
        );

        globals
            .borrow_mut()
            .define("Http", create_global_http_object(fetcher));

        Self { globals }
    }

    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.globals)
    }

    /// Runs `declaration` through `authority` and binds the finalized class
    /// under its name. Nothing is bound if the authority refuses it.
    pub fn declare_class(
        &self,
        declaration: ClassDeclaration,
        authority: &dyn ConstructionAuthority,
    ) -> Result<Rc<ClassObject>, ClowderError> {
        let class = authority.construct(declaration)?;

        info!(class = %class.name(), authority = %class.authority(), "class declared");
        self.globals
            .borrow_mut()
            .define(class.name().to_string(), Value::Class(Rc::clone(&class)));

        Ok(class)
    }

    /// Looks up a declared class by name.
    pub fn class(&self, name: &str) -> Result<Rc<ClassObject>, ClowderError> {
        match self.globals.borrow().get(name) {
            Some(Value::Class(class)) => Ok(class),
            Some(other) => Err(ClowderError::type_error(format!(
                "'{}' is a {}, not a class",
                name,
                other.type_name()
            ))),
            None => Err(ClowderError::reference_error(format!("Undefined class '{}'", name))),
        }
    }

    /// `new ClassName(args...)`
    pub fn instantiate(&self, class_name: &str, args: Vec<Value>) -> Result<Instance, ClowderError> {
        let class = self.class(class_name)?;
        construct_instance(&class, args)
    }

    /// Calls a global function such as `meow` or an extension binding.
    pub fn call_global(&self, name: &str, args: Vec<Value>) -> Result<Value, ClowderError> {
        let callee = self
            .globals
            .borrow()
            .get(name)
            .ok_or_else(|| ClowderError::reference_error(format!("Undefined function '{}'", name)))?;

        callee.call(args)
    }

    /// Loads the manifest at `url` into the global scope.
    pub fn load_extensions(&self, loader: &RemoteLoader, url: &str) -> Result<Vec<String>, ClowderError> {
        loader.load(url, &self.globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{RecordingSink, ValidatingAuthority};
    use crate::prototypes::extensions::ExtensionRegistry;
    use crate::prototypes::http::StaticFetcher;

    fn runtime() -> Runtime {
        Runtime::new(Rc::new(StaticFetcher::new()))
    }

    #[test]
    fn declared_class_is_bound_by_name() {
        let rt = runtime();
        let authority = ValidatingAuthority::new().with_sink(Rc::new(RecordingSink::new()));

        let decl = ClassDeclaration::new("Person").method("speak", |_, _| Ok(Value::Null));
        let class = rt.declare_class(decl, &authority).unwrap();

        assert!(Rc::ptr_eq(&class, &rt.class("Person").unwrap()));
        let p = rt.instantiate("Person", vec![]).unwrap();
        assert!(p.is_instance_of(&class));
    }

    #[test]
    fn refused_class_is_not_bound() {
        let rt = runtime();
        let authority = ValidatingAuthority::new().with_sink(Rc::new(RecordingSink::new()));

        let decl = ClassDeclaration::new("Person").method("run", |_, _| Ok(Value::Null));
        assert!(rt.declare_class(decl, &authority).is_err());
        assert_eq!(rt.class("Person").unwrap_err().code, "E_REFERENCE");
    }

    #[test]
    fn non_class_globals_are_not_classes() {
        assert_eq!(runtime().class("meow").unwrap_err().code, "E_TYPE");
    }

    #[test]
    fn extensions_become_callable_globals() {
        let rt = runtime();
        let loader = RemoteLoader::new(
            Rc::new(StaticFetcher::new().with("mem://m", r#"{"extensions":["from_internet"]}"#)),
            ExtensionRegistry::with_builtins(),
        );

        assert_eq!(rt.call_global("from_internet", vec![]).unwrap_err().code, "E_REFERENCE");

        rt.load_extensions(&loader, "mem://m").unwrap();
        assert!(matches!(rt.call_global("from_internet", vec![]), Ok(Value::Null)));
    }
}
