//! Store-level tests.
//!
//! These tests drive [`RegionStore`](crate::store::RegionStore) the way the
//! outliner panel does and check the user-visible outcome.

mod scenario_tests;

use crate::config::StoreConfig;
use crate::model::{Region, RegionId, RegionType};
use crate::preferences::MemoryPreferences;
use crate::store::RegionStore;

/// Route log output through the test harness.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(s: &str) -> RegionId {
    RegionId::new(s)
}

fn ids(list: &[&str]) -> Vec<RegionId> {
    list.iter().map(|s| RegionId::new(*s)).collect()
}

/// Empty store with in-memory preferences and default settings.
fn empty_store() -> RegionStore {
    init_logging();
    RegionStore::new(
        Box::new(MemoryPreferences::new()),
        &StoreConfig::default(),
        None,
    )
}

/// Store with rectangles `R1..=Rn` created in order.
fn numbered_store(n: usize) -> RegionStore {
    let mut store = empty_store();
    for i in 1..=n {
        store
            .add(Region::new(format!("R{i}"), RegionType::Rectangle))
            .expect("add region");
    }
    store
}
