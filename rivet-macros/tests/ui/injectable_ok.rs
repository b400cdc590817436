#![allow(missing_docs)]

use rivet_di::{Injectable, Injector, interface};
use std::rc::Rc;

trait Clock {
    fn now(&self) -> u64;
}

interface! { Clock }

#[derive(Injectable)]
struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        0
    }
}

#[derive(Injectable)]
struct Scheduler {
    clock: Rc<dyn Clock>,
    interval: u64,
}

fn main() {
    let mut injector = Injector::new();
    injector.register_binding::<dyn Clock, FixedClock>(|c| c);

    let scheduler = injector.resolve_shared::<Scheduler>().unwrap();

    assert_eq!(scheduler.clock.now(), 0);
    assert_eq!(scheduler.interval, 0);
}
