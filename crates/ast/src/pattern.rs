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

use crate::expr::Literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// Binds the matched value to a new name.
    Identifier(String),
    /// `0`, `-1.5`, `true`, `'a'`, `null`
    Literal(Literal),
    /// `(p, q, ...)`
    Tuple(Vec<Pattern>),
    /// `Name { field: p, ... }`
    Struct {
        name: String,
        fields: Vec<(String, Pattern)>,
    },
}
