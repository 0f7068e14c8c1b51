//! Action triggers for button fields
//!
//! A button descriptor only carries an [`ActionId`]. The handler lives in the
//! owning form's [`ActionRegistry`] and receives the form's value map when the
//! button is pressed.

use std::collections::HashMap;

use crate::value_map::ValueMap;

/// Unique identifier for a registered action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(u64);

impl ActionId {
    /// Create a new action ID from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

type Handler = Box<dyn FnMut(&mut ValueMap)>;

/// A registered action
pub struct Action {
    handler: Handler,
    description: Option<String>,
}

impl Action {
    pub fn new(handler: impl FnMut(&mut ValueMap) + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            description: None,
        }
    }

    /// Attach a description for logs
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registry of button actions, indexed by unique IDs
#[derive(Debug)]
pub struct ActionRegistry {
    actions: HashMap<ActionId, Action>,
    next_id: u64,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register an action and return its ID
    pub fn register(&mut self, action: Action) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        self.actions.insert(id, action);
        id
    }

    /// Register a closure as an action
    pub fn register_fn(&mut self, handler: impl FnMut(&mut ValueMap) + 'static) -> ActionId {
        self.register(Action::new(handler))
    }

    /// Register an action under a caller-chosen ID, replacing any existing one
    pub fn register_as(&mut self, id: ActionId, action: Action) -> Option<Action> {
        self.next_id = self.next_id.max(id.raw() + 1);
        self.actions.insert(id, action)
    }

    #[must_use]
    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(&id)
    }

    /// Remove an action by ID
    pub fn unregister(&mut self, id: ActionId) -> Option<Action> {
        self.actions.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ActionId) -> bool {
        self.actions.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run the action, returning whether one was registered under `id`
    pub fn invoke(&mut self, id: ActionId, values: &mut ValueMap) -> bool {
        match self.actions.get_mut(&id) {
            Some(action) => {
                tracing::debug!(
                    action = id.raw(),
                    description = action.description.as_deref().unwrap_or(""),
                    "invoking action"
                );
                (action.handler)(values);
                true
            }
            None => {
                tracing::warn!(action = id.raw(), "no action registered");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_action_id() {
        let id = ActionId::new(42);
        assert_eq!(id.raw(), 42);
    }

    #[test]
    fn test_registry_ids_are_unique() {
        let mut registry = ActionRegistry::new();
        let a = registry.register_fn(|_| {});
        let b = registry.register_fn(|_| {});
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert!(registry.unregister(a).is_some());
        assert!(!registry.contains(a));
        assert!(registry.contains(b));
    }

    #[test]
    fn test_invoke_mutates_values() {
        let mut registry = ActionRegistry::new();
        let id = registry.register(
            Action::new(|values: &mut ValueMap| {
                values.set_item("clicked", true);
            })
            .with_description("mark clicked"),
        );
        assert_eq!(registry.get(id).and_then(Action::description), Some("mark clicked"));

        let mut values = ValueMap::new();
        assert!(registry.invoke(id, &mut values));
        assert_eq!(values.item("clicked"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_invoke_unknown_is_noop() {
        let mut registry = ActionRegistry::new();
        let mut values = ValueMap::new();
        assert!(!registry.invoke(ActionId::new(99), &mut values));
        assert!(values.is_empty());
    }

    #[test]
    fn test_register_as_advances_ids() {
        let mut registry = ActionRegistry::new();
        registry.register_as(ActionId::new(10), Action::new(|_| {}));
        let next = registry.register_fn(|_| {});
        assert_eq!(next.raw(), 11);
    }
}
