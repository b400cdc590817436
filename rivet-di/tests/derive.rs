#![allow(missing_docs)]

use rivet_di::{Error, Injectable, Injector, interface};
use std::cell::RefCell;
use std::rc::Rc;

trait Logger {
    fn log(&self, message: &str);
    fn lines(&self) -> usize;
}

interface! { Logger }

#[derive(Injectable)]
struct ConsoleLogger;

thread_local! {
    static LOGGED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        LOGGED.with_borrow_mut(|lines| lines.push(message.to_string()));
    }

    fn lines(&self) -> usize {
        LOGGED.with_borrow(|lines| lines.len())
    }
}

#[derive(Injectable)]
struct Config {
    retries: i32,
    verbose: bool,
}

#[derive(Injectable)]
struct Service {
    config: Rc<Config>,
    logger: Rc<dyn Logger>,
}

#[derive(Injectable)]
struct Widget {
    #[inject]
    pub logger: Option<Rc<dyn Logger>>,
    #[inject]
    pub retries: Option<i32>,
}

#[derive(Injectable)]
struct Locked {
    #[inject]
    logger: Option<Rc<dyn Logger>>,
}

#[test]
fn it_resolves_primitive_fields_to_zero() {
    let injector = Injector::new();

    let config = injector.resolve_shared::<Config>().unwrap();

    assert_eq!(config.retries, 0);
    assert!(!config.verbose);
}

#[test]
fn it_wires_constructor_dependencies_in_declaration_order() {
    let mut injector = Injector::new();
    injector.register_binding::<dyn Logger, ConsoleLogger>(|c| c);

    let service = injector.resolve_shared::<Service>().unwrap();
    service.logger.log("ready");

    assert_eq!(service.config.retries, 0);
    assert_eq!(service.logger.lines(), 1);
}

#[test]
fn it_injects_marked_fields_after_construction() {
    let mut injector = Injector::new();
    injector.register_binding::<dyn Logger, ConsoleLogger>(|c| c);

    let widget = injector.resolve_shared::<Widget>().unwrap();

    assert!(widget.logger.is_some());
    assert_eq!(widget.retries, Some(0));
}

#[test]
fn it_rejects_marked_fields_without_public_setter() {
    let mut injector = Injector::new();
    injector.register_binding::<dyn Logger, ConsoleLogger>(|c| c);

    let result = injector.resolve_shared::<Locked>();

    assert!(matches!(
        result,
        Err(Error::InvalidInjectableProperty(_, "logger"))
    ));
}

#[test]
fn it_returns_bound_implementations_through_the_interface() {
    let mut injector = Injector::new();
    injector.register_binding::<dyn Logger, ConsoleLogger>(|c| c);

    let logger = injector.resolve_shared::<dyn Logger>().unwrap();
    logger.log("hello");

    assert_eq!(logger.lines(), 1);
}

#[test]
fn it_fails_on_unbound_interfaces() {
    let injector = Injector::new();

    let result = injector.resolve_shared::<dyn Logger>();

    assert!(matches!(result, Err(Error::UnresolvedBinding(_))));
}

#[test]
fn it_caches_singleton_types_lazily() {
    let mut injector = Injector::new();
    injector.register_singleton_type::<Config>();

    let first = injector.resolve_shared::<Config>().unwrap();
    let second = injector.resolve_shared::<Config>().unwrap();

    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn it_keeps_bindings_but_not_lifetimes_on_clone() {
    let mut injector = Injector::new();
    injector.register_binding::<dyn Logger, ConsoleLogger>(|c| c);
    injector.register_singleton_type::<Config>();

    let copy = injector.clone();

    assert!(copy.resolve_shared::<dyn Logger>().is_ok());
    let first = copy.resolve_shared::<Config>().unwrap();
    let second = copy.resolve_shared::<Config>().unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
}

#[derive(Injectable)]
struct Ping {
    _pong: Rc<Pong>,
}

#[derive(Injectable)]
struct Pong {
    _ping: Rc<Ping>,
}

#[test]
fn it_surfaces_cycles_as_errors() {
    let injector = Injector::new();

    let result = injector.resolve_shared::<Ping>();

    assert!(matches!(result, Err(Error::CyclicDependency(_))));
}
