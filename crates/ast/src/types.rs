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

//! Structural types shared by annotations, the type checker and the code generator.
//!
//! Equality is structural except that function priority is ignored. Compatibility
//! is equality plus `int`/`float` widening in either direction, applied element-wise
//! inside composites. Shapes (arity, dimensions) must always match exactly, and
//! named types are nominal.

use std::fmt;

#[derive(Debug, Clone)]
pub enum Type {
    Unit,
    Int,
    Float,
    Bool,
    String,
    Char,
    Void,
    Array(Box<Type>),
    Tuple(Vec<Type>),
    Vector(usize, Box<Type>),
    /// rows, cols, element
    Matrix(usize, usize, Box<Type>),
    Tensor(Vec<usize>, Box<Type>),
    Quaternion(Box<Type>),
    Complex(Box<Type>),
    Function {
        params: Vec<Type>,
        ret: Box<Type>,
        priority: Option<u32>,
    },
    Pointer(Box<Type>),
    Named(String),
}

impl Type {
    // ─── Constructors ────────────────────────────────────────────────────────

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(elements)
    }

    pub fn vector(dimension: usize, element: Type) -> Self {
        Type::Vector(dimension, Box::new(element))
    }

    pub fn matrix(rows: usize, cols: usize, element: Type) -> Self {
        Type::Matrix(rows, cols, Box::new(element))
    }

    pub fn tensor(dimensions: Vec<usize>, element: Type) -> Self {
        Type::Tensor(dimensions, Box::new(element))
    }

    pub fn quaternion(element: Type) -> Self {
        Type::Quaternion(Box::new(element))
    }

    pub fn complex(element: Type) -> Self {
        Type::Complex(Box::new(element))
    }

    pub fn function(params: Vec<Type>, ret: Type, priority: Option<u32>) -> Self {
        Type::Function {
            params,
            ret: Box::new(ret),
            priority,
        }
    }

    pub fn pointer(inner: Type) -> Self {
        Type::Pointer(Box::new(inner))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    // ─── Queries ─────────────────────────────────────────────────────────────

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float)
    }

    /// Types with no value: a function returning one of these may use a bare `return`.
    pub fn is_empty_return(&self) -> bool {
        matches!(self, Type::Void | Type::Unit)
    }

    /// Scalars that fit in one general-purpose register and compare with `==`.
    pub fn is_equatable(&self) -> bool {
        matches!(self, Type::Int | Type::Float | Type::Bool | Type::Char)
    }

    /// Result type of arithmetic on two numeric operands: float wins over int.
    pub fn widen(&self, other: &Type) -> Option<Type> {
        match (self, other) {
            (Type::Int, Type::Int) => Some(Type::Int),
            (Type::Float, Type::Float) | (Type::Int, Type::Float) | (Type::Float, Type::Int) => {
                Some(Type::Float)
            }
            _ => None,
        }
    }

    pub fn priority(&self) -> Option<u32> {
        match self {
            Type::Function { priority, .. } => *priority,
            _ => None,
        }
    }

    /// Every `Named` type referenced anywhere inside this type, outermost first.
    pub fn named_references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Type::Named(name) => out.push(name),
            Type::Array(inner)
            | Type::Vector(_, inner)
            | Type::Matrix(_, _, inner)
            | Type::Tensor(_, inner)
            | Type::Quaternion(inner)
            | Type::Complex(inner)
            | Type::Pointer(inner) => inner.collect_named(out),
            Type::Tuple(elems) => elems.iter().for_each(|t| t.collect_named(out)),
            Type::Function { params, ret, .. } => {
                params.iter().for_each(|t| t.collect_named(out));
                ret.collect_named(out);
            }
            Type::Unit
            | Type::Int
            | Type::Float
            | Type::Bool
            | Type::String
            | Type::Char
            | Type::Void => {}
        }
    }

    // ─── Relations ───────────────────────────────────────────────────────────

    /// Structural equality. Function priority is not part of a function's type.
    pub fn equals(&self, other: &Type) -> bool {
        self.relate(other, Relation::Equal)
    }

    /// Equality relaxed by `int`/`float` widening at any element position.
    /// Symmetric; shapes and names must still match exactly.
    pub fn is_compatible(&self, other: &Type) -> bool {
        self.relate(other, Relation::Compatible)
    }

    fn relate(&self, other: &Type, relation: Relation) -> bool {
        use Type::*;
        match (self, other) {
            (Int, Float) | (Float, Int) => relation == Relation::Compatible,
            (Unit, Unit)
            | (Int, Int)
            | (Float, Float)
            | (Bool, Bool)
            | (String, String)
            | (Char, Char)
            | (Void, Void) => true,
            (Array(a), Array(b))
            | (Quaternion(a), Quaternion(b))
            | (Complex(a), Complex(b))
            | (Pointer(a), Pointer(b)) => a.relate(b, relation),
            (Tuple(a), Tuple(b)) => relate_all(a, b, relation),
            (Vector(n, a), Vector(m, b)) => n == m && a.relate(b, relation),
            (Matrix(r1, c1, a), Matrix(r2, c2, b)) => r1 == r2 && c1 == c2 && a.relate(b, relation),
            (Tensor(d1, a), Tensor(d2, b)) => d1 == d2 && a.relate(b, relation),
            (
                Function { params: p1, ret: r1, .. },
                Function { params: p2, ret: r2, .. },
            ) => relate_all(p1, p2, relation) && r1.relate(r2, relation),
            (Named(a), Named(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Equal,
    Compatible,
}

fn relate_all(a: &[Type], b: &[Type], relation: Relation) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.relate(y, relation))
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Type {}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Type]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Surface syntax of a type; `parser::parse_type` reads it back.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unit => f.write_str("()"),
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::String => f.write_str("string"),
            Type::Char => f.write_str("char"),
            Type::Void => f.write_str("void"),
            Type::Array(elem) => write!(f, "[{}]", elem),
            Type::Tuple(elems) => {
                f.write_str("(")?;
                write_list(f, elems)?;
                f.write_str(")")
            }
            Type::Vector(n, elem) => write!(f, "vec{}<{}>", n, elem),
            Type::Matrix(rows, cols, elem) => write!(f, "mat{}x{}<{}>", rows, cols, elem),
            Type::Tensor(dims, elem) => {
                let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "tensor<{}, {}>", dims.join("x"), elem)
            }
            Type::Quaternion(elem) => write!(f, "quat<{}>", elem),
            Type::Complex(elem) => write!(f, "complex<{}>", elem),
            Type::Function { params, ret, priority } => {
                f.write_str("fn(")?;
                write_list(f, params)?;
                write!(f, ") -> {}", ret)?;
                if let Some(p) = priority {
                    write!(f, " @{}", p)?;
                }
                Ok(())
            }
            Type::Pointer(inner) => write!(f, "*{}", inner),
            Type::Named(name) => f.write_str(name),
        }
    }
}
