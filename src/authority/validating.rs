/*
 * =============================================================================
 *  PAWX - Code with Claws!
 * =============================================================================
 *
 *  File:     validating.rs
 *  Purpose:  Construction authority that enforces required members and
 *            decorates selected methods before the class is finalized.
 *
 *  For a declaration to pass, every required member (default: `speak`)
 *  must be present in the declared member mapping. Inherited members do
 *  not count.
 *
 *  For every declared member picked by the selector, a twin named
 *  `_<name>` is added. Calling the twin announces itself on the sink and
 *  then runs the original method with the same receiver, arguments and
 *  return value. The original stays under its own name, untouched.
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

use std::rc::Rc;

use tracing::{debug, warn};

use crate::ast::class::{ClassDeclaration, Member, MemberMap, Method};
use crate::authority::announce::{Announcement, AnnouncementSink, StdoutSink, DEFAULT_ANNOUNCEMENT};
use crate::authority::selector::DecorationSelector;
use crate::authority::{BaseAuthority, ConstructionAuthority};
use crate::config::Config;
use crate::error::ClowderError;
use crate::interpreter::classes::ClassObject;

/// Prefix of every synthesized member.
pub const DECORATED_PREFIX: &str = "_";

pub struct ValidatingAuthority {
    name: String,
    required: Vec<String>,
    selector: DecorationSelector,
    announcement: String,
    sink: Rc<dyn AnnouncementSink>,
}

impl ValidatingAuthority {
    pub const DEFAULT_NAME: &'static str = "MetaPerson";

    /// Requires `speak`, decorates every member containing `run`, and
    /// announces on stdout.
    pub fn new() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            required: vec!["speak".to_string()],
            selector: DecorationSelector::default(),
            announcement: DEFAULT_ANNOUNCEMENT.to_string(),
            sink: Rc::new(StdoutSink),
        }
    }

    /// Builds an authority from configuration, announcing on `sink`.
    pub fn from_config(config: &Config, sink: Rc<dyn AnnouncementSink>) -> Result<Self, ClowderError> {
        let selector = config.decorate.parse::<DecorationSelector>()?;

        Ok(Self::new()
            .with_required(config.required_members.iter().cloned())
            .with_selector(selector)
            .with_announcement(config.announcement.clone())
            .with_sink(sink))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_required<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_selector(mut self, selector: DecorationSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_announcement(mut self, announcement: impl Into<String>) -> Self {
        self.announcement = announcement.into();
        self
    }

    pub fn with_sink(mut self, sink: Rc<dyn AnnouncementSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// First required member missing from the declared mapping, if any.
    fn check_required(&self, declaration: &ClassDeclaration) -> Result<(), ClowderError> {
        match self.required.iter().find(|member| !declaration.has_member(member)) {
            Some(missing) => Err(ClowderError::missing_required_member(missing.as_str(), &declaration.name)
                .with_help(format!("declare a '{}' method on '{}'", missing, declaration.name))),
            None => Ok(()),
        }
    }

    /// Builds the synthesized members for the declared mapping.
    fn decorations(&self, class_name: &str, members: &MemberMap) -> MemberMap {
        members
            .iter()
            .filter(|(name, _)| self.selector.selects(name))
            .map(|(name, member)| {
                let key = format!("{}{}", DECORATED_PREFIX, name);
                let wrapper = self.decorate(class_name, &key, name, member.clone());
                (key, Member::Method(wrapper))
            })
            .collect()
    }

    /// Wraps `original` so that calling it announces first. A plain value
    /// is called like any other value, so a non-callable one still
    /// announces and then fails with `E_TYPE`.
    fn decorate(&self, class_name: &str, key: &str, member: &str, original: Member) -> Method {
        let sink = Rc::clone(&self.sink);
        let message = self.announcement.clone();
        let class_name = class_name.to_string();
        let member = member.to_string();

        Method::new(key, move |this, args| {
            sink.announce(&Announcement::new(&class_name, &member, &message));

            match &original {
                Member::Method(method) => method.invoke(this, args),
                Member::Value(value) => value.call(args),
            }
        })
    }
}

impl Default for ValidatingAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionAuthority for ValidatingAuthority {
    fn name(&self) -> &str {
        &self.name
    }

    fn construct(&self, mut declaration: ClassDeclaration) -> Result<Rc<ClassObject>, ClowderError> {
        self.check_required(&declaration)?;

        let decorations = self.decorations(&declaration.name, &declaration.members);

        for (key, member) in decorations {
            if declaration.members.contains_key(&key) {
                warn!(
                    class = %declaration.name,
                    member = %key,
                    "synthesized member replaces a declared member"
                );
            }

            debug!(class = %declaration.name, member = %key, "adding decorated member");
            declaration.members.insert(key, member);
        }

        BaseAuthority.finalize(declaration, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::announce::RecordingSink;
    use crate::interpreter::classes::construct_instance;
    use crate::value::Value;

    fn recording() -> (Rc<RecordingSink>, ValidatingAuthority) {
        let sink = Rc::new(RecordingSink::new());
        let authority = ValidatingAuthority::new().with_sink(sink.clone());
        (sink, authority)
    }

    #[test]
    fn missing_speak_is_refused() {
        let (_, authority) = recording();
        let decl = ClassDeclaration::new("Runner").method("run", |_, _| Ok(Value::Null));

        let err = authority.construct(decl).unwrap_err();
        assert_eq!(err.missing_member(), Some("speak"));
    }

    #[test]
    fn speak_as_a_plain_value_satisfies_the_requirement() {
        let (_, authority) = recording();
        let decl = ClassDeclaration::new("Parrot").value("speak", Value::from("squawk"));

        assert!(authority.construct(decl).is_ok());
    }

    #[test]
    fn inherited_speak_does_not_count() {
        let (_, authority) = recording();
        let base = authority
            .construct(ClassDeclaration::new("Person").method("speak", |_, _| Ok(Value::Null)))
            .unwrap();

        let child = ClassDeclaration::new("Child").base(base);
        assert!(authority.construct(child).is_err());
    }

    #[test]
    fn wraps_every_member_containing_run() {
        let (_, authority) = recording();
        let decl = ClassDeclaration::new("Athlete")
            .method("speak", |_, _| Ok(Value::Null))
            .method("run", |_, _| Ok(Value::Null))
            .method("outrun", |_, _| Ok(Value::Null))
            .method("running", |_, _| Ok(Value::Null))
            .value("runs", Value::from(3.0));

        let class = authority.construct(decl).unwrap();
        let names: Vec<&str> = class.member_names().collect();

        assert_eq!(
            names,
            ["speak", "run", "outrun", "running", "runs", "_run", "_outrun", "_running", "_runs"]
        );
        assert_eq!(class.authority(), "MetaPerson");
    }

    #[test]
    fn wrapped_plain_value_announces_then_is_a_type_error() {
        let (sink, authority) = recording();
        let decl = ClassDeclaration::new("Athlete")
            .method("speak", |_, _| Ok(Value::Null))
            .value("runs", Value::from(3.0));

        let class = authority.construct(decl).unwrap();
        let p = construct_instance(&class, vec![]).unwrap();

        assert_eq!(p.get("runs").unwrap().as_number(), Some(3.0));

        let err = p.call("_runs", vec![]).unwrap_err();
        assert_eq!(err.code, "E_TYPE");
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.announcements()[0].member, "runs");
    }

    #[test]
    fn wrapped_callable_value_delegates() {
        let (sink, authority) = recording();
        let decl = ClassDeclaration::new("Athlete")
            .method("speak", |_, _| Ok(Value::Null))
            .value("rerun", Value::native(|args| Ok(args.into_iter().next().unwrap_or(Value::Null))));

        let class = authority.construct(decl).unwrap();
        let p = construct_instance(&class, vec![]).unwrap();

        let out = p.call("_rerun", vec![Value::from("again")]).unwrap();
        assert_eq!(out.as_string(), Some("again"));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn nameless_class_with_speak_constructs() {
        let (_, authority) = recording();
        let class = authority
            .construct(ClassDeclaration::new("").method("speak", |_, _| Ok(Value::Null)))
            .unwrap();

        assert_eq!(class.name(), "");
        assert_eq!(class.member_names().collect::<Vec<_>>(), ["speak"]);
    }

    #[test]
    fn originals_are_kept_unmodified() {
        let (_, authority) = recording();
        let decl = ClassDeclaration::new("Person")
            .method("speak", |_, _| Ok(Value::Null))
            .method("run", |_, _| Ok(Value::from("ran")));

        let original = decl.members["run"].as_method().unwrap().clone();
        let class = authority.construct(decl).unwrap();

        let kept = class.members()["run"].as_method().unwrap();
        let wrapped = class.members()["_run"].as_method().unwrap();

        assert!(kept.same_body(&original));
        assert!(!wrapped.same_body(&original));
        assert_eq!(wrapped.name(), "_run");
    }

    #[test]
    fn wrapper_announces_once_then_delegates() {
        let (sink, authority) = recording();
        let decl = ClassDeclaration::new("Person")
            .method("speak", |_, _| Ok(Value::Null))
            .method("run", |this, args| {
                let steps = args.first().and_then(Value::as_number).unwrap_or(0.0);
                this.set("steps", Value::from(steps));
                Ok(Value::from(steps * 2.0))
            });

        let class = authority.construct(decl).unwrap();
        let p = construct_instance(&class, vec![]).unwrap();

        let out = p.call("_run", vec![Value::from(21.0)]).unwrap();

        assert_eq!(out.as_number(), Some(42.0));
        assert_eq!(p.field("steps").as_number(), Some(21.0));
        assert_eq!(sink.len(), 1);

        let announcement = &sink.announcements()[0];
        assert_eq!(announcement.class_name, "Person");
        assert_eq!(announcement.member, "run");
        assert_eq!(announcement.message, DEFAULT_ANNOUNCEMENT);
    }

    #[test]
    fn plain_call_does_not_announce() {
        let (sink, authority) = recording();
        let decl = ClassDeclaration::new("Person")
            .method("speak", |_, _| Ok(Value::Null))
            .method("run", |_, _| Ok(Value::Null));

        let class = authority.construct(decl).unwrap();
        let p = construct_instance(&class, vec![]).unwrap();
        p.call("run", vec![]).unwrap();
        p.call("speak", vec![]).unwrap();

        assert!(sink.is_empty());
    }

    #[test]
    fn wrapper_propagates_errors_after_announcing() {
        let (sink, authority) = recording();
        let decl = ClassDeclaration::new("Person")
            .method("speak", |_, _| Ok(Value::Null))
            .method("run", |_, _| Err(ClowderError::runtime_error("tripped")));

        let class = authority.construct(decl).unwrap();
        let p = construct_instance(&class, vec![]).unwrap();

        let err = p.call("_run", vec![]).unwrap_err();
        assert_eq!(err.message, "tripped");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn synthesized_member_wins_on_collision() {
        let (sink, authority) = recording();
        let decl = ClassDeclaration::new("Person")
            .method("speak", |_, _| Ok(Value::Null))
            .value("_run", Value::from("declared"))
            .method("run", |_, _| Ok(Value::from("ran")));

        let class = authority.construct(decl).unwrap();
        let p = construct_instance(&class, vec![]).unwrap();

        assert_eq!(p.call("_run", vec![]).unwrap().as_string(), Some("ran"));
        assert_eq!(sink.len(), 1);

        // The declared `_run` was itself selected, so its twin wraps the
        // declared value, not the synthesized method.
        assert_eq!(p.call("__run", vec![]).unwrap_err().code, "E_TYPE");
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn decorated_twins_are_not_decorated_again() {
        let (_, authority) = recording();
        let decl = ClassDeclaration::new("Person")
            .method("speak", |_, _| Ok(Value::Null))
            .method("run", |_, _| Ok(Value::Null));

        let class = authority.construct(decl).unwrap();
        assert!(class.members().get("__run").is_none());
    }

    #[test]
    fn explicit_selector_and_custom_requirements() {
        let sink = Rc::new(RecordingSink::new());
        let authority = ValidatingAuthority::new()
            .named("MetaDog")
            .with_required(["bark", "fetch"])
            .with_selector(DecorationSelector::explicit(["fetch"]))
            .with_announcement("*wag*")
            .with_sink(sink.clone());

        let err = authority
            .construct(ClassDeclaration::new("Dog").method("bark", |_, _| Ok(Value::Null)))
            .unwrap_err();
        assert_eq!(err.missing_member(), Some("fetch"));

        let class = authority
            .construct(
                ClassDeclaration::new("Dog")
                    .method("bark", |_, _| Ok(Value::Null))
                    .method("fetch", |_, _| Ok(Value::Null))
                    .method("run", |_, _| Ok(Value::Null)),
            )
            .unwrap();

        assert!(class.members().contains_key("_fetch"));
        assert!(!class.members().contains_key("_run"));
        assert_eq!(class.authority(), "MetaDog");

        let rex = construct_instance(&class, vec![]).unwrap();
        rex.call("_fetch", vec![]).unwrap();
        assert_eq!(sink.announcements()[0].message, "*wag*");
    }
}
