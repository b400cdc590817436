//! Type shapes: the introspection surface consumed by the resolver
//!
//! A [`TypeShape`] stands in for what a reflective runtime would discover
//! about a type: its constructors, in declaration order, and the properties
//! marked for injection. Shapes are plain closure tables, so they can be
//! written by hand or generated by the `Injectable` derive.

use crate::{error::Error, injectable::Injectable, injector::Injector};
use std::{
    any::{Any, TypeId, type_name},
    collections::{HashMap, HashSet},
    fmt::{self, Debug},
    hash::{BuildHasherDefault, Hasher},
    rc::Rc,
};

/// Uniform erased value: an `Rc<dyn Any>` wrapping the typed `Rc<T>` under
/// which the value was resolved. The double wrapping lets trait objects and
/// sized types travel through the same representation.
pub(crate) type Instance = Rc<dyn Any>;

type ConstructFn = Rc<dyn Fn(&Injector) -> Result<Box<dyn Any>, Error>>;
type AssignFn = Rc<dyn Fn(&mut dyn Any, &Injector) -> Result<(), Error>>;
type SealFn = fn(Box<dyn Any>) -> Result<Instance, Error>;

/// A `TypeId` paired with the type's name for diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct TypeToken {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

impl TypeToken {
    /// Returns the token of `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The type's name as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    // Trait objects are the non-constructible, bindable kind of type.
    pub(crate) fn is_trait_object(&self) -> bool {
        self.name.starts_with("dyn ")
    }
}

pub(crate) struct Constructor {
    pub(crate) arity: usize,
    pub(crate) construct: ConstructFn,
}

pub(crate) struct Property {
    pub(crate) name: &'static str,
    pub(crate) assign: Option<AssignFn>,
}

/// Describes how to construct a concrete type and which of its properties
/// must be injected afterwards.
pub struct TypeShape {
    pub(crate) name: &'static str,
    pub(crate) constructors: Vec<Constructor>,
    pub(crate) properties: Vec<Property>,
    pub(crate) seal: SealFn,
}

impl TypeShape {
    /// Starts an empty shape for `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            name: type_name::<T>(),
            constructors: Vec::new(),
            properties: Vec::new(),
            seal: seal_as::<T>,
        }
    }

    /// Declares a constructor taking `arity` parameters.
    ///
    /// The closure resolves each parameter through the injector, in
    /// declaration order, and returns the boxed value. Declaration order of
    /// constructors matters: the resolver prefers a parameterless
    /// constructor and otherwise takes the first one with parameters.
    pub fn with_constructor<F>(mut self, arity: usize, construct: F) -> Self
    where
        F: Fn(&Injector) -> Result<Box<dyn Any>, Error> + 'static,
    {
        self.constructors.push(Constructor {
            arity,
            construct: Rc::new(construct),
        });
        self
    }

    /// Declares an injectable property with a public setter. The closure
    /// resolves the property's type and assigns it to the freshly
    /// constructed value.
    pub fn with_property<F>(mut self, name: &'static str, assign: F) -> Self
    where
        F: Fn(&mut dyn Any, &Injector) -> Result<(), Error> + 'static,
    {
        self.properties.push(Property {
            name,
            assign: Some(Rc::new(assign)),
        });
        self
    }

    /// Declares an injectable property that lacks a public setter.
    /// Resolving the type fails with [`Error::InvalidInjectableProperty`].
    pub fn with_readonly_property(mut self, name: &'static str) -> Self {
        self.properties.push(Property { name, assign: None });
        self
    }
}

impl Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeShape({})", self.name)
    }
}

fn seal_as<T: Any>(object: Box<dyn Any>) -> Result<Instance, Error> {
    object
        .downcast::<T>()
        .map(|typed| Rc::new(Rc::<T>::from(typed)) as Instance)
        .map_err(|_| Error::TypeMismatch(type_name::<T>()))
}

#[derive(Default)]
pub(crate) struct TypeIdHasher(u64);

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[cold]
    fn write(&mut self, _: &[u8]) {
        unreachable!("TypeId calls write_u64");
    }

    #[inline]
    fn write_u64(&mut self, id: u64) {
        self.0 = id;
    }
}

pub(crate) type TypeIdMap<V> = HashMap<TypeId, V, BuildHasherDefault<TypeIdHasher>>;
pub(crate) type TypeIdSet = HashSet<TypeId, BuildHasherDefault<TypeIdHasher>>;

/// Store of catalogued shapes, consulted during resolution.
///
/// Populated lazily: registration methods and resolution entry points
/// catalog the shapes of the concrete types they mention.
#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    shapes: TypeIdMap<Rc<TypeShape>>,
}

impl TypeCatalog {
    /// Catalogs `T`'s shape unless it is already known.
    pub fn register<T: Injectable>(&mut self) {
        self.shapes
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Rc::new(T::shape()));
    }

    pub(crate) fn get(&self, id: &TypeId) -> Option<Rc<TypeShape>> {
        self.shapes.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Marker {}

    #[test]
    fn it_identifies_trait_objects() {
        assert!(TypeToken::of::<dyn Marker>().is_trait_object());
        assert!(!TypeToken::of::<String>().is_trait_object());
        assert!(!TypeToken::of::<Vec<Box<dyn Marker>>>().is_trait_object());
    }

    #[test]
    fn it_keeps_constructors_in_declaration_order() {
        let shape = TypeShape::of::<u8>()
            .with_constructor(2, |_| -> Result<Box<dyn std::any::Any>, Error> {
                Ok(Box::new(0u8))
            })
            .with_constructor(0, |_| -> Result<Box<dyn std::any::Any>, Error> {
                Ok(Box::new(1u8))
            });

        let arities: Vec<usize> = shape.constructors.iter().map(|c| c.arity).collect();

        assert_eq!(arities, vec![2, 0]);
    }

    #[test]
    fn it_seals_only_the_declared_type() {
        let shape = TypeShape::of::<u32>();

        let sealed = (shape.seal)(Box::new(7u32)).unwrap();
        assert_eq!(**sealed.downcast_ref::<Rc<u32>>().unwrap(), 7);

        let mismatched = (shape.seal)(Box::new("nope"));
        assert!(matches!(mismatched, Err(Error::TypeMismatch(_))));
    }
}
