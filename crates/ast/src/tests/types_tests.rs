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
use crate::types::Type;
use crate::{Diagnostic, DiagnosticKind, Span};

#[test]
fn test_scalar_equality() {
    assert!(Type::Int.equals(&Type::Int));
    assert!(!Type::Int.equals(&Type::Float));
    assert!(!Type::Void.equals(&Type::Unit));
    assert!(Type::named("Point").equals(&Type::named("Point")));
    assert!(!Type::named("Point").equals(&Type::named("Vec")));
}

#[test]
fn test_int_float_compatibility_is_symmetric() {
    assert!(Type::Int.is_compatible(&Type::Float));
    assert!(Type::Float.is_compatible(&Type::Int));
    assert!(!Type::Int.is_compatible(&Type::Bool));
    assert!(!Type::String.is_compatible(&Type::Char));
}

#[test]
fn test_compatibility_applies_inside_composites() {
    let ints = Type::vector(3, Type::Int);
    let floats = Type::vector(3, Type::Float);
    assert!(ints.is_compatible(&floats));
    assert!(!ints.equals(&floats));
    assert!(Type::array(Type::Int).is_compatible(&Type::array(Type::Float)));
    assert!(Type::tuple(vec![Type::Int, Type::Bool])
        .is_compatible(&Type::tuple(vec![Type::Float, Type::Bool])));
}

#[test]
fn test_shapes_must_match_exactly() {
    assert!(!Type::vector(3, Type::Float).is_compatible(&Type::vector(4, Type::Float)));
    assert!(!Type::matrix(2, 3, Type::Float).is_compatible(&Type::matrix(3, 2, Type::Float)));
    assert!(!Type::tensor(vec![2, 3], Type::Int).is_compatible(&Type::tensor(vec![2, 3, 1], Type::Int)));
    assert!(!Type::tuple(vec![Type::Int]).is_compatible(&Type::tuple(vec![Type::Int, Type::Int])));
    assert!(!Type::quaternion(Type::Float).is_compatible(&Type::complex(Type::Float)));
    assert!(!Type::named("Meters").is_compatible(&Type::Int));
}

#[test]
fn test_function_priority_is_not_part_of_the_type() {
    let low = Type::function(vec![Type::Int], Type::Int, Some(1));
    let high = Type::function(vec![Type::Int], Type::Int, Some(2));
    let none = Type::function(vec![Type::Int], Type::Int, None);
    assert!(low.equals(&high));
    assert!(low.equals(&none));
    assert_eq!(low, high);
    assert_eq!(high.priority(), Some(2));
    let other_arity = Type::function(vec![Type::Int, Type::Int], Type::Int, Some(1));
    assert!(!low.is_compatible(&other_arity));
}

#[test]
fn test_display() {
    assert_eq!(Type::Unit.to_string(), "()");
    assert_eq!(Type::array(Type::Int).to_string(), "[int]");
    assert_eq!(Type::tuple(vec![Type::Int, Type::String]).to_string(), "(int, string)");
    assert_eq!(Type::vector(3, Type::Float).to_string(), "vec3<float>");
    assert_eq!(Type::matrix(2, 2, Type::Float).to_string(), "mat2x2<float>");
    assert_eq!(
        Type::tensor(vec![2, 3, 4], Type::Float).to_string(),
        "tensor<2x3x4, float>"
    );
    assert_eq!(Type::quaternion(Type::Float).to_string(), "quat<float>");
    assert_eq!(Type::complex(Type::Float).to_string(), "complex<float>");
    assert_eq!(
        Type::function(vec![Type::Int, Type::String], Type::Bool, Some(1)).to_string(),
        "fn(int, string) -> bool @1"
    );
    assert_eq!(Type::function(vec![], Type::Void, None).to_string(), "fn() -> void");
    assert_eq!(Type::pointer(Type::Int).to_string(), "*int");
    assert_eq!(Type::named("Point").to_string(), "Point");
}

#[test]
fn test_widen() {
    assert_eq!(Type::Int.widen(&Type::Int), Some(Type::Int));
    assert_eq!(Type::Int.widen(&Type::Float), Some(Type::Float));
    assert_eq!(Type::Bool.widen(&Type::Int), None);
}

#[test]
fn test_named_references() {
    let ty = Type::function(
        vec![Type::pointer(Type::named("Node"))],
        Type::array(Type::named("Edge")),
        None,
    );
    assert_eq!(ty.named_references(), vec!["Node", "Edge"]);
}

#[test]
fn test_literal_types() {
    assert_eq!(Literal::Int(1).ty(), Type::Int);
    assert_eq!(Literal::Float(1.0).ty(), Type::Float);
    assert_eq!(Literal::Str("s".into()).ty(), Type::String);
    assert_eq!(Literal::Char('c').ty(), Type::Char);
    assert_eq!(Literal::Null.ty(), Type::Unit);
}

#[test]
fn test_diagnostic_display() {
    let d = Diagnostic::type_error("bad return", Span::new(4, 9, 2, 7));
    assert_eq!(d.kind, DiagnosticKind::Type);
    assert_eq!(d.to_string(), "2:7: Type: bad return");
    assert!(!d.is_fatal());
    assert!(Diagnostic::internal("oops", Span::default()).is_fatal());
}
