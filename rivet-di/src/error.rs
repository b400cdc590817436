//! Describes dependency resolution errors

use std::fmt::{Display, Formatter};

/// Everything that can go wrong while resolving a type.
///
/// Errors surface immediately to the caller of
/// [`resolve`](crate::Injector::resolve); nothing is retried or recovered
/// internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An interface was requested with no implementation bound to it.
    UnresolvedBinding(&'static str),
    /// The type exposes no usable public constructor.
    ConstructionFailure(&'static str),
    /// A dependency-marked property has no public setter (type, property).
    InvalidInjectableProperty(&'static str, &'static str),
    /// The resolved instance is not assignable to the requested type.
    TypeMismatch(&'static str),
    /// The type is already under construction further up the stack.
    CyclicDependency(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnresolvedBinding(type_name) => write!(f, "Resolution Error: no implementation registered for: {type_name}"),
            Error::ConstructionFailure(type_name) => write!(f, "Resolution Error: no usable public constructor for: {type_name}"),
            Error::InvalidInjectableProperty(type_name, property) => write!(f, "Resolution Error: a public setter is required for injectable property: {type_name}.{property}"),
            Error::TypeMismatch(type_name) => write!(f, "Resolution Error: resolved instance is not assignable to: {type_name}"),
            Error::CyclicDependency(type_name) => write!(f, "Resolution Error: cyclic dependency while constructing: {type_name}"),
        }
    }
}

impl std::error::Error for Error {}
