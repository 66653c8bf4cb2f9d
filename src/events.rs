//! Observer registration for property changes and element membership.
//!
//! A property change is first offered to every observer's `validate`; any
//! rejection leaves the property untouched. Accepted changes are then
//! broadcast through `notify`.

use log::warn;

/// A proposed or committed change to a named property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub name: &'static str,
    pub old: String,
    pub new: String,
}

impl PropertyChange {
    pub fn new(name: &'static str, old: impl ToString, new: impl ToString) -> Self {
        Self {
            name,
            old: old.to_string(),
            new: new.to_string(),
        }
    }
}

/// Observes property changes; may veto them before they take effect.
pub trait PropertyObserver {
    /// Return `Err(reason)` to reject the change.
    fn validate(&self, _change: &PropertyChange) -> std::result::Result<(), String> {
        Ok(())
    }

    fn notify(&self, _change: &PropertyChange) {}
}

/// Observes elements being added to or removed from a container.
pub trait ElementObserver {
    fn added(&self, _label: &str) {}

    fn removed(&self, _label: &str) {}
}

/// Registered observers of one component.
#[derive(Default)]
pub struct Observers {
    properties: Vec<Box<dyn PropertyObserver>>,
    elements: Vec<Box<dyn ElementObserver>>,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("properties", &self.properties.len())
            .field("elements", &self.elements.len())
            .finish()
    }
}

impl Observers {
    pub fn add_property_observer(&mut self, observer: Box<dyn PropertyObserver>) {
        self.properties.push(observer);
    }

    pub fn add_element_observer(&mut self, observer: Box<dyn ElementObserver>) {
        self.elements.push(observer);
    }

    /// Ask every observer to accept `change`. A veto is logged and `false` returned.
    pub fn propose(&self, change: &PropertyChange) -> bool {
        for observer in &self.properties {
            if let Err(reason) = observer.validate(change) {
                warn!(
                    "change of {} from {:?} to {:?} vetoed: {}",
                    change.name, change.old, change.new, reason
                );
                return false;
            }
        }
        true
    }

    pub fn notify(&self, change: &PropertyChange) {
        for observer in &self.properties {
            observer.notify(change);
        }
    }

    /// Propose, apply and notify in one step. Returns whether `apply` ran.
    pub fn change(&self, change: PropertyChange, apply: impl FnOnce()) -> bool {
        if !self.propose(&change) {
            return false;
        }
        apply();
        self.notify(&change);
        true
    }

    pub fn element_added(&self, label: &str) {
        for observer in &self.elements {
            observer.added(label);
        }
    }

    pub fn element_removed(&self, label: &str) {
        for observer in &self.elements {
            observer.removed(label);
        }
    }
}
