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

use chrono::{DateTime, Utc};
use tracing::info;

/// Default text printed when a decorated member fires.
pub const DEFAULT_ANNOUNCEMENT: &str = "\n*modified through metaclass";

/// One firing of a decorated member.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub class_name: String,

    /// Name of the original (wrapped) member, e.g. `run` for `_run`.
    pub member: String,

    pub message: String,
    pub at: DateTime<Utc>,
}

impl Announcement {
    pub fn new(class_name: &str, member: &str, message: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            member: member.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        }
    }
}

/// Receives the announcement a decorated member makes before delegating
/// to the original member.
pub trait AnnouncementSink {
    fn announce(&self, announcement: &Announcement);
}

/// Prints the announcement message to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl AnnouncementSink for StdoutSink {
    fn announce(&self, announcement: &Announcement) {
        info!(
            class = %announcement.class_name,
            member = %announcement.member,
            "decorated member invoked"
        );
        println!("{}", announcement.message);
    }
}

/// Keeps every announcement in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    announcements: RefCell<Vec<Announcement>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.announcements.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.announcements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.announcements.borrow().is_empty()
    }
}

impl AnnouncementSink for RecordingSink {
    fn announce(&self, announcement: &Announcement) {
        self.announcements.borrow_mut().push(announcement.clone());
    }
}
