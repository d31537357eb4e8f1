//! Named rendezvous events.
//!
//! A rendezvous is a named synchronization point with zero or more waiting
//! processes. Firing it releases every current waiter in the same
//! micro-step, preserving the simultaneity multi-agent handshakes need.
//! Events must be declared before anything can wait on them; waiting on an
//! undeclared name is reported at schedule time.

use std::collections::HashMap;

use crate::event::EventHandle;
use crate::types::ProcessId;

/// Opaque key of a declared rendezvous event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventKey(pub(crate) u32);

/// A process registered on a rendezvous, with its optional watchdog.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Waiter {
    pub pid: ProcessId,
    pub timeout: Option<EventHandle>,
}

/// Registry of declared rendezvous events and their waiters.
#[derive(Debug, Default)]
pub struct EventRegistry {
    names: Vec<String>,
    by_name: HashMap<String, EventKey>,
    waiters: Vec<Vec<Waiter>>,
}

impl EventRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a named event, returning its key.
    ///
    /// Declaring the same name twice returns the existing key.
    pub fn declare(&mut self, name: &str) -> EventKey {
        if let Some(&key) = self.by_name.get(name) {
            return key;
        }
        let key = EventKey(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), key);
        self.waiters.push(Vec::new());
        key
    }

    /// Looks up a declared event by name.
    pub fn key(&self, name: &str) -> Option<EventKey> {
        self.by_name.get(name).copied()
    }

    /// Returns the event's name, if the key is valid.
    pub fn name(&self, key: EventKey) -> Option<&str> {
        self.names.get(key.0 as usize).map(String::as_str)
    }

    /// Whether the key names a declared event.
    pub fn contains(&self, key: EventKey) -> bool {
        (key.0 as usize) < self.names.len()
    }

    pub(crate) fn add_waiter(&mut self, key: EventKey, waiter: Waiter) -> bool {
        match self.waiters.get_mut(key.0 as usize) {
            Some(list) => {
                list.push(waiter);
                true
            }
            None => false,
        }
    }

    /// Removes and returns all current waiters, in registration order.
    pub(crate) fn take_waiters(&mut self, key: EventKey) -> Vec<Waiter> {
        self.waiters
            .get_mut(key.0 as usize)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub(crate) fn remove_waiter(&mut self, key: EventKey, pid: ProcessId) {
        if let Some(list) = self.waiters.get_mut(key.0 as usize) {
            list.retain(|w| w.pid != pid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_is_idempotent() {
        let mut reg = EventRegistry::new();
        let a = reg.declare("txn_done");
        let b = reg.declare("txn_done");
        assert_eq!(a, b);
        assert_eq!(reg.name(a), Some("txn_done"));
    }

    #[test]
    fn test_unknown_name_has_no_key() {
        let reg = EventRegistry::new();
        assert!(reg.key("missing").is_none());
    }

    #[test]
    fn test_waiters_released_in_registration_order() {
        let mut reg = EventRegistry::new();
        let ev = reg.declare("go");
        for pid in [3, 1, 2] {
            reg.add_waiter(ev, Waiter { pid, timeout: None });
        }
        let pids: Vec<_> = reg.take_waiters(ev).iter().map(|w| w.pid).collect();
        assert_eq!(pids, vec![3, 1, 2]);
        assert!(reg.take_waiters(ev).is_empty());
    }

    #[test]
    fn test_remove_waiter() {
        let mut reg = EventRegistry::new();
        let ev = reg.declare("go");
        reg.add_waiter(ev, Waiter { pid: 1, timeout: None });
        reg.add_waiter(ev, Waiter { pid: 2, timeout: None });
        reg.remove_waiter(ev, 1);
        let pids: Vec<_> = reg.take_waiters(ev).iter().map(|w| w.pid).collect();
        assert_eq!(pids, vec![2]);
    }
}
