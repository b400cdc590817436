//! The resolver: registry of instances, bindings, and lifetimes

use crate::{
    error::Error,
    injectable::{Injectable, Resolvable},
    primitives,
    shape::{Instance, TypeCatalog, TypeIdMap, TypeIdSet, TypeShape, TypeToken},
};
use std::{
    any::{Any, TypeId},
    cell::RefCell,
    fmt::{self, Debug},
    rc::Rc,
};

type CastFn = Rc<dyn Fn(&Instance) -> Option<Instance>>;

/// An interface binding: the concrete implementation to construct and the
/// unsizing cast captured when the binding was registered.
#[derive(Clone)]
struct Binding {
    target: TypeToken,
    cast: CastFn,
}

#[derive(Default)]
struct Registry {
    /// Realized instances, keyed by the type under which they were
    /// registered or committed.
    instances: TypeIdMap<Instance>,
    /// Interface type -> concrete implementation.
    bindings: TypeIdMap<Binding>,
    /// Types marked for lazy, once-only construction. Membership alone does
    /// not imply an instance exists yet.
    singleton_types: TypeIdSet,
    /// Shapes of the concrete types seen so far.
    catalog: TypeCatalog,
    /// Types currently being constructed further up the stack.
    in_progress: TypeIdSet,
}

/// Maps requested types to usable instances by recursively satisfying their
/// dependency graphs.
///
/// The injector is a deliberately single-threaded object: the registry is
/// ordinary mutable shared state behind an `Rc<RefCell<..>>`, with no
/// locking, so the handle is `!Send` by construction. Resolution is fully
/// synchronous and recursive.
///
/// # Example
/// ```ignore
/// use rivet_di::Injector;
///
/// let mut injector = Injector::new();
/// injector.register_binding::<dyn Logger, ConsoleLogger>(|c| c);
/// injector.register_singleton_type::<Database>();
///
/// let logger = injector.resolve_shared::<dyn Logger>()?;
/// let database = injector.resolve_shared::<Database>()?;
/// ```
pub struct Injector {
    registry: Rc<RefCell<Registry>>,
}

impl Default for Injector {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Injector {
    /// Creates an injector with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    /// Registers `instance` as the single instance for its exact type.
    /// Every future resolution of that type returns a shared reference to
    /// it. Overwrites any previous registration for the type.
    pub fn register_instance<T: Any>(&mut self, instance: T) {
        self.registry
            .borrow_mut()
            .instances
            .insert(TypeId::of::<T>(), Rc::new(Rc::new(instance)) as Instance);
    }

    /// Marks `T` for lazy, once-only construction: the first resolution
    /// builds the instance, every later one returns it. Idempotent.
    pub fn register_singleton_type<T: Injectable>(&mut self) {
        let mut registry = self.registry.borrow_mut();
        registry.catalog.register::<T>();
        registry.singleton_types.insert(TypeId::of::<T>());
    }

    /// Records `C` as the implementation of the interface `I`, overwriting
    /// any previous binding for `I`.
    ///
    /// `coerce` performs the unsizing step and is written `|c| c` at the
    /// call site:
    ///
    /// ```ignore
    /// injector.register_binding::<dyn Logger, ConsoleLogger>(|c| c);
    /// ```
    ///
    /// No compatibility check beyond the signature is performed; a binding
    /// only fails when resolution is attempted.
    pub fn register_binding<I, C>(&mut self, coerce: fn(Rc<C>) -> Rc<I>)
    where
        I: Any + ?Sized,
        C: Injectable,
    {
        let cast: CastFn = Rc::new(move |instance: &Instance| {
            let concrete = instance.downcast_ref::<Rc<C>>()?.clone();
            Some(Rc::new(coerce(concrete)) as Instance)
        });
        let mut registry = self.registry.borrow_mut();
        registry.catalog.register::<C>();
        registry.bindings.insert(
            TypeId::of::<I>(),
            Binding {
                target: TypeToken::of::<C>(),
                cast,
            },
        );
    }

    /// Resolves a type and returns a cloned value. `T` must implement
    /// [`Clone`]; otherwise use [`resolve_shared`](Self::resolve_shared),
    /// which returns a shared pointer.
    pub fn resolve<T: Resolvable + Clone>(&self) -> Result<T, Error> {
        self.resolve_shared::<T>().map(|shared| shared.as_ref().clone())
    }

    /// Resolves a type and returns a shared pointer. This is the entry
    /// point for trait objects: `resolve_shared::<dyn Logger>()` yields an
    /// `Rc<dyn Logger>` through the registered binding.
    pub fn resolve_shared<T: Resolvable + ?Sized>(&self) -> Result<Rc<T>, Error> {
        T::register_shape(&mut self.registry.borrow_mut().catalog);
        let token = TypeToken::of::<T>();
        let instance = self.resolve_token(token)?;
        instance
            .downcast_ref::<Rc<T>>()
            .cloned()
            .ok_or(Error::TypeMismatch(token.name))
    }

    /// Core resolution procedure. Branches are mutually exclusive and tried
    /// in order; the first match wins.
    fn resolve_token(&self, token: TypeToken) -> Result<Instance, Error> {
        // 1. The injector can always supply itself, so types in the graph
        //    may depend on it.
        if token.id == TypeId::of::<Injector>() {
            return Ok(Rc::new(Rc::new(self.handle())) as Instance);
        }

        // 2. Interfaces are never instantiated; redirect through the
        //    binding or fail.
        if token.is_trait_object() {
            let binding = self.registry.borrow().bindings.get(&token.id).cloned();
            let binding = binding.ok_or(Error::UnresolvedBinding(token.name))?;
            #[cfg(feature = "tracing")]
            tracing::trace!(interface = token.name, implementation = binding.target.name, "redirecting through binding");
            let target = self.resolve_token(binding.target)?;
            return (binding.cast)(&target).ok_or(Error::TypeMismatch(token.name));
        }

        // 3. A realized instance short-circuits construction entirely.
        let cached = self.registry.borrow().instances.get(&token.id).cloned();
        if let Some(instance) = cached {
            return Ok(instance);
        }

        // 4. Primitive scalars default to zero; they have no dependencies.
        if let Some(zero) = primitives::default_value(&token.id) {
            return Ok(zero);
        }

        // 5./6. Construct from the catalogued shape, guarding against
        // cyclic graphs.
        let shape = self
            .registry
            .borrow()
            .catalog
            .get(&token.id)
            .ok_or(Error::ConstructionFailure(token.name))?;
        if !self.registry.borrow_mut().in_progress.insert(token.id) {
            return Err(Error::CyclicDependency(token.name));
        }
        let constructed = self.construct(&shape, token);
        self.registry.borrow_mut().in_progress.remove(&token.id);
        let instance = constructed?;

        // 7. Lifetime commit: the first construction of a marked type is
        //    cached, after property injection ran.
        let mut registry = self.registry.borrow_mut();
        if registry.singleton_types.contains(&token.id)
            && !registry.instances.contains_key(&token.id)
        {
            #[cfg(feature = "tracing")]
            tracing::trace!(type_name = token.name, "committing singleton instance");
            registry.instances.insert(token.id, instance.clone());
        }
        Ok(instance)
    }

    fn construct(&self, shape: &TypeShape, token: TypeToken) -> Result<Instance, Error> {
        // Prefer a parameterless constructor; otherwise take the first one
        // with parameters, in declaration order.
        let constructor = shape
            .constructors
            .iter()
            .find(|c| c.arity == 0)
            .or_else(|| shape.constructors.iter().find(|c| c.arity > 0))
            .ok_or(Error::ConstructionFailure(token.name))?;
        #[cfg(feature = "tracing")]
        tracing::trace!(type_name = token.name, arity = constructor.arity, "constructing");
        let mut object = (constructor.construct)(self)?;
        for property in &shape.properties {
            let assign = property
                .assign
                .as_ref()
                .ok_or(Error::InvalidInjectableProperty(token.name, property.name))?;
            assign(object.as_mut(), self)?;
        }
        (shape.seal)(object)
    }

    // A handle sharing this injector's registry; what a resolved
    // `Injector` dependency receives.
    fn handle(&self) -> Injector {
        Injector {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl Clone for Injector {
    /// Copies registered instances (as shared references) and interface
    /// bindings into an independent registry.
    ///
    /// Lazy singleton markings are not carried over: the clone constructs a
    /// fresh instance on every resolution of a type that was only marked,
    /// while singletons realized before the copy transfer as shared
    /// instances.
    fn clone(&self) -> Self {
        let registry = self.registry.borrow();
        Self {
            registry: Rc::new(RefCell::new(Registry {
                instances: registry.instances.clone(),
                bindings: registry.bindings.clone(),
                catalog: registry.catalog.clone(),
                singleton_types: TypeIdSet::default(),
                in_progress: TypeIdSet::default(),
            })),
        }
    }
}

impl Debug for Injector {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Injector(..)")
    }
}
