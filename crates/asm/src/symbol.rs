/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Assembly symbols for user-declared names.
//!
//! Every user name gets a prefix ending in `_` followed by the name itself, so
//! no symbol can spell a register, an assembler operator keyword, a `str_<i>`
//! pool entry or a `.L<n>` label. A lone `main` keeps its name as the entry point.

/// The program entry point.
pub const ENTRY: &str = "main";

/// Symbol of a function. `overload` is the declaration's ordinal among
/// same-named functions, present only when the name is declared more than once.
pub fn function(name: &str, overload: Option<usize>) -> String {
    match overload {
        None if name == ENTRY => ENTRY.to_string(),
        None => format!("fn_{}", name),
        Some(ordinal) => format!("fn{}_{}", ordinal, name),
    }
}

/// Symbol of a global's data word.
pub fn global(name: &str) -> String {
    format!("gv_{}", name)
}
