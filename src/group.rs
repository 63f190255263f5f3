//! Keeping parameters of many fixtures in step.
//!
//! [`SyncGroup`] never touches its dependents itself. It answers each change
//! with the [`SetCommand`]s its owner must apply, and the owner reports
//! independent dependent edits back through [`SyncGroup::dependent_changed`].
//! Commands flow one way, so applying them cannot echo back into the group.

use std::fmt;

use crate::log;

/// The value of a synchronizable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Continuous(f64),
    /// Index into the parameter's option list.
    Enum(usize),
}

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "boolean",
            ParamValue::Int(_) => "integer",
            ParamValue::Continuous(_) => "continuous",
            ParamValue::Enum(_) => "enumerated",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Continuous(v) => write!(f, "{v}"),
            ParamValue::Enum(i) => write!(f, "#{i}"),
        }
    }
}

/// Instruction to set the dependent `target` to `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCommand<K> {
    pub target: K,
    pub value: ParamValue,
}

/// One master value mirrored onto a set of dependents while enabled.
#[derive(Debug, Clone)]
pub struct SyncGroup<K> {
    master: ParamValue,
    enabled: bool,
    dependents: Vec<K>,
}

impl<K: Clone + PartialEq + fmt::Debug> SyncGroup<K> {
    /// A new, enabled group with no dependents.
    pub fn new(master: ParamValue) -> Self {
        Self {
            master,
            enabled: true,
            dependents: Vec::new(),
        }
    }

    pub fn value(&self) -> ParamValue {
        self.master
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dependents(&self) -> &[K] {
        &self.dependents
    }

    pub fn contains(&self, key: &K) -> bool {
        self.dependents.contains(key)
    }

    /// Register a dependent. While enabled, it is brought in line with the master.
    ///
    /// Returns `None` without changes if `key` is already registered.
    pub fn add_dependent(&mut self, key: K) -> Option<Vec<SetCommand<K>>> {
        if self.contains(&key) {
            log::debug!(?key, "dependent already registered");
            return None;
        }
        self.dependents.push(key.clone());
        Some(if self.enabled {
            vec![SetCommand {
                target: key,
                value: self.master,
            }]
        } else {
            Vec::new()
        })
    }

    pub fn remove_dependent(&mut self, key: &K) -> bool {
        let before = self.dependents.len();
        self.dependents.retain(|k| k != key);
        self.dependents.len() != before
    }

    /// Change the master value. While enabled, every dependent follows.
    pub fn set_value(&mut self, value: ParamValue) -> Vec<SetCommand<K>> {
        self.master = value;
        self.broadcast()
    }

    /// Enabling pushes the master value to every dependent.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<SetCommand<K>> {
        self.enabled = enabled;
        self.broadcast()
    }

    /// Record an edit made to a dependent outside the group. An edit that
    /// diverges from the master disables the group.
    pub fn dependent_changed(&mut self, key: &K, value: ParamValue) {
        if self.enabled && value != self.master && self.contains(key) {
            log::debug!(?key, %value, master = %self.master, "dependent diverged, sync disabled");
            self.enabled = false;
        }
    }

    fn broadcast(&self) -> Vec<SetCommand<K>> {
        if !self.enabled {
            return Vec::new();
        }
        self.dependents
            .iter()
            .map(|k| SetCommand {
                target: k.clone(),
                value: self.master,
            })
            .collect()
    }
}

/// Live sum over a set of keyed child values.
#[derive(Debug, Clone)]
pub struct SumAggregator<K> {
    children: Vec<(K, f64)>,
    sum: f64,
}

impl<K> Default for SumAggregator<K> {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            sum: 0.0,
        }
    }
}

impl<K: PartialEq> SumAggregator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_child(&self, key: &K) -> bool {
        self.children.iter().any(|(k, _)| k == key)
    }

    /// Returns `false` if `key` is already a child.
    pub fn add_child(&mut self, key: K, value: f64) -> bool {
        if self.has_child(&key) {
            return false;
        }
        self.children.push((key, value));
        self.refresh();
        true
    }

    /// Returns `false` if `key` is not a child.
    pub fn update_child(&mut self, key: &K, value: f64) -> bool {
        match self.children.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => {
                *v = value;
                self.refresh();
                true
            }
            None => false,
        }
    }

    pub fn remove_child(&mut self, key: &K) -> bool {
        let before = self.children.len();
        self.children.retain(|(k, _)| k != key);
        let removed = self.children.len() != before;
        if removed {
            self.refresh();
        }
        removed
    }

    fn refresh(&mut self) {
        self.sum = self.children.iter().map(|(_, v)| v).sum();
    }
}
