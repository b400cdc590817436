//! Traits that let types participate in resolution

use crate::shape::{TypeCatalog, TypeShape};
use std::any::Any;

/// A concrete type the injector knows how to construct.
///
/// The shape lists the type's constructors in declaration order along with
/// its dependency-marked properties. Implement it by hand, or derive it
/// (feature `macros`):
///
/// # Example
/// ```ignore
/// use rivet_di::{Injectable, Injector};
/// use std::rc::Rc;
///
/// #[derive(Injectable)]
/// struct Repository {
///     cache: Rc<dyn Cache>,
/// }
///
/// let mut injector = Injector::new();
/// injector.register_binding::<dyn Cache, InMemoryCache>(|c| c);
///
/// let repository = injector.resolve_shared::<Repository>()?;
/// ```
///
/// A manual implementation builds the same table explicitly:
///
/// ```ignore
/// use rivet_di::{Error, Injectable, Injector, Resolvable, TypeCatalog, TypeShape};
///
/// impl Injectable for Repository {
///     fn shape() -> TypeShape {
///         TypeShape::of::<Repository>().with_constructor(1, |injector: &Injector| {
///             let cache = injector.resolve_shared::<dyn Cache>()?;
///             Ok(Box::new(Repository { cache }))
///         })
///     }
/// }
///
/// impl Resolvable for Repository {
///     fn register_shape(catalog: &mut TypeCatalog) {
///         catalog.register::<Repository>();
///     }
/// }
/// ```
pub trait Injectable: Any + Sized {
    /// Builds the type's shape.
    fn shape() -> TypeShape;
}

/// A type that can be requested from the [`Injector`](crate::Injector).
///
/// Concrete [`Injectable`] types implement it by cataloguing their shape.
/// Trait objects participate through an empty impl, most conveniently via
/// [`interface!`](crate::interface). Primitive scalars and the injector
/// itself are covered by the crate.
pub trait Resolvable: Any {
    /// Records the type's shape in the catalog before resolution starts.
    #[doc(hidden)]
    fn register_shape(_catalog: &mut TypeCatalog) {}
}

impl Resolvable for crate::Injector {}

/// Declares one or more traits as interface types that can be requested
/// from the injector once an implementation is bound.
///
/// # Macro Syntax
/// ```ignore
/// interface! {
///     Cache
///     Logger
/// };
/// ```
///
/// Each name must be a trait; the macro provides the marker impl that lets
/// `dyn Trait` appear as a resolution target or constructor parameter.
#[macro_export]
macro_rules! interface {
    ($($name:path)*) => {
        $(impl $crate::Resolvable for dyn $name {})*
    };
}
