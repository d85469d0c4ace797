//! Sparse action-value table for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, StateKey};

/// One stored (action, state) estimate, the unit of the persisted schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    pub action: Action,
    pub state: StateKey,
    pub value: f64,
}

/// Q-table mapping action -> state key -> value estimate
///
/// Absent entries read as exactly `0.0`. Lookups never insert; only
/// [`QTable::set`] and the update helpers write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<Action, HashMap<StateKey, f64>>,
}

impl QTable {
    /// Value assigned to any pair that has never been written.
    pub const DEFAULT_VALUE: f64 = 0.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, action: Action, state: &StateKey) -> f64 {
        self.values
            .get(&action)
            .and_then(|by_state| by_state.get(state))
            .copied()
            .unwrap_or(Self::DEFAULT_VALUE)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, action: Action, state: StateKey, value: f64) {
        self.values.entry(action).or_default().insert(state, value);
    }

    /// Maximum Q-value over `actions` in `state`.
    ///
    /// Returns [`Self::DEFAULT_VALUE`] when `actions` is empty.
    pub fn max_value(&self, state: &StateKey, actions: &[Action]) -> f64 {
        if actions.is_empty() {
            return Self::DEFAULT_VALUE;
        }
        actions
            .iter()
            .map(|&action| self.get(action, state))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Legal actions tied for the highest value in `state`, in input order.
    pub fn best_actions(&self, state: &StateKey, actions: &[Action]) -> Vec<Action> {
        let best = self.max_value(state, actions);
        actions
            .iter()
            .copied()
            .filter(|&action| self.get(action, state) == best)
            .collect()
    }

    /// Move Q(s,a) toward `target` by step size `alpha`:
    ///
    /// Q(s,a) ← Q(s,a) + α[target - Q(s,a)]
    pub fn step_toward(&mut self, action: Action, state: &StateKey, target: f64, alpha: f64) {
        let current = self.get(action, state);
        let updated = current + alpha * (target - current);
        self.set(action, state.clone(), updated);
    }

    /// Total number of stored entries
    pub fn size(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// All stored entries, sorted by (action, state).
    pub fn entries(&self) -> Vec<ValueEntry> {
        let mut entries: Vec<ValueEntry> = self
            .values
            .iter()
            .flat_map(|(&action, by_state)| {
                by_state.iter().map(move |(state, &value)| ValueEntry {
                    action,
                    state: state.clone(),
                    value,
                })
            })
            .collect();
        entries.sort_by(|a, b| (a.action, &a.state).cmp(&(b.action, &b.state)));
        entries
    }

    /// Rebuild a table from stored entries; later duplicates win.
    pub fn from_entries<I: IntoIterator<Item = ValueEntry>>(entries: I) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.set(entry.action, entry.state, entry.value);
        }
        table
    }
}
