#![allow(missing_docs)]

use rivet_di::{Injectable, Injector};
use std::rc::Rc;

#[derive(Injectable)]
struct Settings;

#[derive(Injectable)]
struct Panel {
    #[inject]
    pub settings: Option<Rc<Settings>>,
}

fn main() {
    let injector = Injector::new();

    let panel = injector.resolve_shared::<Panel>().unwrap();

    assert!(panel.settings.is_some());
}
