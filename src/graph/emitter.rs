use std::collections::BTreeMap;
use std::rc::Rc;

/// Callback registered on a node's [`Emitter`].
pub type Listener = Rc<dyn Fn(&serde_json::Value)>;

/// Per-node event table: event name to an ordered set of listeners.
///
/// Listener identity is the `Rc` allocation; registering the same `Rc` twice is a no-op.
#[derive(Default)]
pub struct Emitter {
    table: BTreeMap<String, Vec<Listener>>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Returns `false` when it is already registered for `name`.
    pub fn on(&mut self, name: &str, listener: Listener) -> bool {
        let set = self.table.entry(name.to_owned()).or_default();
        if set.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            return false;
        }
        set.push(listener);
        true
    }

    /// Remove a listener. Returns `false` when it was not registered.
    pub fn off(&mut self, name: &str, listener: &Listener) -> bool {
        let Some(set) = self.table.get_mut(name) else {
            return false;
        };
        let before = set.len();
        set.retain(|l| !Rc::ptr_eq(l, listener));
        set.len() != before
    }

    /// Invoke every listener for `name`, in registration order.
    pub fn trigger(&self, name: &str, payload: &serde_json::Value) {
        if let Some(set) = self.table.get(name) {
            for listener in set {
                listener(payload);
            }
        }
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.table.get(name).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.table.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/emitter.rs"]
mod tests;
