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

//! Clowder runtime: classes finalized by construction authorities.
//!
//! A [`ClassDeclaration`](ast::ClassDeclaration) is handed to a
//! [`ConstructionAuthority`](authority::ConstructionAuthority), which either
//! refuses it or returns a finalized class. The
//! [`ValidatingAuthority`](authority::ValidatingAuthority) requires a
//! `speak` member and adds an announcing `_`-prefixed twin for every
//! method whose name contains `run`.

pub mod ast;
pub mod authority;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod prototypes;
pub mod remote;
pub mod value;

pub use ast::{ClassDeclaration, Member, Method};
pub use authority::{BaseAuthority, ConstructionAuthority, DecorationSelector, ValidatingAuthority};
pub use config::Config;
pub use error::{ClowderError, ErrorKind};
pub use interpreter::classes::{construct_instance, ClassObject, Instance};
pub use interpreter::Runtime;
pub use value::Value;
