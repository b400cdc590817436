//! Reflection-free dependency resolution
//!
//! A requested type is turned into a fully constructed instance by
//! recursively satisfying its constructor parameters and injectable
//! properties, using a small registry of interface bindings, registered
//! instances, and lazy singleton lifetimes. Since Rust has no runtime
//! reflection, type introspection is supplied through [`TypeShape`] tables,
//! written by hand or generated by the `Injectable` derive (feature
//! `macros`).

pub use crate::{
    error::Error,
    injectable::{Injectable, Resolvable},
    injector::Injector,
    shape::{TypeCatalog, TypeShape, TypeToken},
};

#[cfg(feature = "macros")]
pub use rivet_macros::Injectable;

pub mod error;
pub mod injectable;
pub mod injector;
pub mod shape;

mod primitives;
