use boot::{Component, Injectable};
use std::sync::Arc;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Default, Injectable)]
#[boot(export = "dyn Clock")]
struct FixedClock {
    #[boot("config,key:NOW,default:42")]
    now: u64,
}

impl Component for FixedClock {}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.now
    }
}

#[derive(Default, Injectable)]
struct Scheduler {
    #[boot("wire")]
    clock: Option<Arc<dyn Clock>>,
    #[boot("wire,name:backup")]
    backup: Option<Arc<FixedClock>>,
    untouched: Vec<String>,
}

impl Component for Scheduler {}

#[derive(Injectable)]
struct Marker;

impl Component for Marker {}

fn main() {
    let registry = boot::ComponentRegistry::default();
    let entry = registry.add("default", false, Scheduler::default()).unwrap();
    assert_eq!(entry.fields().len(), 2);
    let entry = registry.add("default", false, FixedClock::default()).unwrap();
    assert!(entry.exports::<dyn Clock>());
    registry.add("default", false, Marker).unwrap();
}
