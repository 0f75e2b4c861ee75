/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Construction Authorities
 * ------------------------
 * Every clowder is finalized by a construction authority. The authority
 * receives the full declaration (name, bases, members) before a class
 * object exists and decides what the finalized class looks like:
 *
 *  - BaseAuthority       → the plain construction primitive
 *  - ValidatingAuthority → required members + decorated members
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

pub mod announce;
pub mod selector;
pub mod validating;

use std::rc::Rc;

use tracing::debug;

use crate::ast::class::ClassDeclaration;
use crate::error::ClowderError;
use crate::interpreter::classes::ClassObject;

pub use announce::{Announcement, AnnouncementSink, RecordingSink, StdoutSink};
pub use selector::DecorationSelector;
pub use validating::ValidatingAuthority;

/// Turns a class declaration into a finalized class, or refuses it.
pub trait ConstructionAuthority {
    /// Name recorded on every class this authority finalizes.
    fn name(&self) -> &str;

    fn construct(&self, declaration: ClassDeclaration) -> Result<Rc<ClassObject>, ClowderError>;
}

/// The plain construction primitive: no validation, members are taken as
/// declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseAuthority;

impl BaseAuthority {
    pub const NAME: &'static str = "type";

    /// Finalizes `declaration`, stamping `authority` as the class's
    /// construction authority.
    pub fn finalize(
        &self,
        declaration: ClassDeclaration,
        authority: &str,
    ) -> Result<Rc<ClassObject>, ClowderError> {
        let ClassDeclaration { name, bases, members } = declaration;

        debug!(
            class = %name,
            authority,
            bases = bases.len(),
            members = members.len(),
            "finalizing class"
        );

        Ok(Rc::new(ClassObject::new(name, bases, members, authority.to_string())))
    }
}

impl ConstructionAuthority for BaseAuthority {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn construct(&self, declaration: ClassDeclaration) -> Result<Rc<ClassObject>, ClowderError> {
        self.finalize(declaration, Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn base_authority_keeps_members_as_declared() {
        let class = BaseAuthority
            .construct(
                ClassDeclaration::new("Plain")
                    .method("run", |_, _| Ok(Value::Null))
                    .value("speed", Value::from(3.0)),
            )
            .unwrap();

        assert_eq!(class.authority(), "type");
        assert_eq!(class.member_names().collect::<Vec<_>>(), ["run", "speed"]);
    }

    #[test]
    fn base_authority_does_not_require_speak() {
        assert!(BaseAuthority.construct(ClassDeclaration::new("Mute")).is_ok());
    }

    #[test]
    fn any_name_is_accepted() {
        for name in ["", "  "] {
            let class = BaseAuthority.construct(ClassDeclaration::new(name)).unwrap();
            assert_eq!(class.name(), name);
        }
    }
}
