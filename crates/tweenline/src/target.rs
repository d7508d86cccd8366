//! Tween targets
//!
//! The chain reads and writes named numeric properties on an external object
//! through the `TweenTarget` capability. Hosts implement it for their own
//! types; map-based property bags work out of the box.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::rc::Rc;

/// Capability for objects whose named numeric properties a chain animates
pub trait TweenTarget {
    /// Read a property; `None` if the target has no such property
    fn get(&self, name: &str) -> Option<f32>;

    /// Write a property in place
    fn set(&mut self, name: &str, value: f32);
}

/// Shared handle to a tween target
///
/// Chains hold handles, never the target itself. `Rc<RefCell<_>>` because
/// evaluation is single-threaded and fully synchronous; the system assumes
/// single-writer access and performs no locking.
pub type TargetHandle = Rc<RefCell<dyn TweenTarget>>;

/// Wrap a target implementation into a shared handle
pub fn shared_target<T: TweenTarget + 'static>(target: T) -> TargetHandle {
    Rc::new(RefCell::new(target))
}

/// Target that ignores all reads and writes
///
/// Stands in for released targets after a chain is disposed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTarget;

impl TweenTarget for NullTarget {
    fn get(&self, _name: &str) -> Option<f32> {
        None
    }

    fn set(&mut self, _name: &str, _value: f32) {}
}

impl<S: BuildHasher> TweenTarget for IndexMap<String, f32, S> {
    fn get(&self, name: &str) -> Option<f32> {
        IndexMap::get(self, name).copied()
    }

    fn set(&mut self, name: &str, value: f32) {
        self.insert(name.to_owned(), value);
    }
}

impl<S: BuildHasher> TweenTarget for HashMap<String, f32, S> {
    fn get(&self, name: &str) -> Option<f32> {
        HashMap::get(self, name).copied()
    }

    fn set(&mut self, name: &str, value: f32) {
        self.insert(name.to_owned(), value);
    }
}
