//! Symbol bindings: the production rule and drawing style bound to each symbol.
//!
//! A binding map only ever holds symbols reachable from the axiom: entries
//! appear when a symbol first becomes reachable and are dropped once it no
//! longer is.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grammar::Expression;

/// Rule and style for one symbol. Unset fields fall back to the render defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    /// Replacement for the symbol on each generation. `None` leaves the
    /// symbol in place.
    pub rule: Option<Expression>,
    pub scale: Option<f64>,
    pub line_width: Option<f64>,
    pub color: Option<String>,
}

impl Binding {
    pub fn new(rule: Expression) -> Self {
        Self {
            rule: Some(rule),
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = Some(line_width);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Symbols added and removed by [`BindingMap::sync`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Symbol name → binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingMap {
    entries: BTreeMap<String, Binding>,
}

impl BindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, binding: Binding) -> Option<Binding> {
        self.entries.insert(symbol.into(), binding)
    }

    pub fn get(&self, symbol: &str) -> Option<&Binding> {
        self.entries.get(symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Binding> {
        self.entries.get_mut(symbol)
    }

    pub fn remove(&mut self, symbol: &str) -> Option<Binding> {
        self.entries.remove(symbol)
    }

    /// The rule bound to `symbol`, if any.
    pub fn rule(&self, symbol: &str) -> Option<&Expression> {
        self.entries.get(symbol).and_then(|b| b.rule.as_ref())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every symbol reachable from `axiom_terms` through bound rules.
    pub fn reachable_from(&self, axiom_terms: &BTreeSet<String>) -> BTreeSet<String> {
        reachable_symbols(axiom_terms, self)
    }

    /// Make the map hold exactly the `reachable` symbols.
    ///
    /// Existing entries are kept untouched, new symbols get a rule-less
    /// default binding, everything else is removed.
    pub fn sync(&mut self, reachable: &BTreeSet<String>) -> SyncReport {
        let removed: Vec<String> = self
            .entries
            .keys()
            .filter(|k| !reachable.contains(*k))
            .cloned()
            .collect();
        for symbol in &removed {
            self.entries.remove(symbol);
        }

        let mut added = Vec::new();
        for symbol in reachable {
            if !self.entries.contains_key(symbol) {
                self.entries.insert(symbol.clone(), Binding::default());
                added.push(symbol.clone());
            }
        }

        SyncReport { added, removed }
    }
}

impl FromIterator<(String, Binding)> for BindingMap {
    fn from_iter<T: IntoIterator<Item = (String, Binding)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Breadth-first closure of symbols starting at `axiom_terms` and following
/// each bound rule's own terms.
pub fn reachable_symbols(axiom_terms: &BTreeSet<String>, bindings: &BindingMap) -> BTreeSet<String> {
    let mut reachable = axiom_terms.clone();
    let mut queue: VecDeque<&str> = axiom_terms.iter().map(String::as_str).collect();

    while let Some(symbol) = queue.pop_front() {
        let Some(rule) = bindings.rule(symbol) else {
            continue;
        };
        for term in &rule.terms {
            if reachable.insert(term.clone()) {
                queue.push_back(term);
            }
        }
    }

    reachable
}
