/*
 * =============================================================================
 *  PAWX - Code with Claws!
 * =============================================================================
 *
 *  File:     display.rs
 *  Purpose:  Human-readable rendering of runtime values.
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

use crate::value::Value;

/// ============================================================================
/// value_to_string
/// ============================================================================
/// Converts a runtime `Value` into a **human-readable string**.
/// This is used by:
///   - the demo narration
///   - Debug output
///
/// Examples:
///   - Number(30)       → "30"
///   - String("Jo")     → "Jo"
///   - Object           → "{ age: 30, name: Jo }"
///   - Function         → "[function]"
///   - Class            → "<class 'Person'>"
///   - Instance         → "<Person object>"
/// ============================================================================
pub fn value_to_string(val: &Value) -> String {
    match val {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),

        // Keys are sorted so output is stable across runs.
        Value::Object { fields } => {
            let map = fields.borrow();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let parts: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}: {}", k, value_to_string(&map[k])))
                .collect();

            format!("{{ {} }}", parts.join(", "))
        }

        Value::NativeFunction(_) => "[function]".to_string(),

        Value::Class(class) => format!("<class '{}'>", class.name()),

        Value::Instance(instance) => format!("<{} object>", instance.class().name()),
    }
}
