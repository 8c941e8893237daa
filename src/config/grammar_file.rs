//! Grammar files: an axiom, per-symbol rules and styles, and render defaults in YAML.
//!
//! ```yaml
//! axiom: "+97.5 F X"
//! default_angle: 90
//! generations: 10
//! terms:
//!   F: { expr: "F", color: "#942192" }
//!   X: { expr: "X + Y F +" }
//!   Y: { expr: "- F X - Y", line_width: 2 }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::grammar::{Expression, MalformedExpression, Parser};
use crate::render::{reachable_symbols, Binding, BindingMap, RenderParams};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid grammar file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed axiom\n{0}")]
    Axiom(MalformedExpression),
}

/// A rule body that failed to parse. The symbol renders with an empty rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleError {
    pub symbol: String,
    pub error: MalformedExpression,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed rule for {}\n{}", self.symbol, self.error)
    }
}

/// Rule and style for one symbol as written in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermDef {
    #[serde(default)]
    pub expr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarFile {
    #[serde(default)]
    pub axiom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Restrict rule bodies to symbols declared under `terms` or used in the axiom.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub terms: BTreeMap<String, TermDef>,
}

/// A grammar ready to render.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub axiom: Expression,
    pub bindings: BindingMap,
    pub params: RenderParams,
    pub background: Option<String>,
    pub rule_errors: Vec<RuleError>,
}

impl GrammarFile {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String, LoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render parameters from the file, defaults for anything unset.
    pub fn params(&self) -> RenderParams {
        let defaults = RenderParams::default();
        RenderParams {
            generations: self.generations.unwrap_or(defaults.generations),
            default_angle: self.default_angle.unwrap_or(defaults.default_angle),
            default_scale: self.default_scale.unwrap_or(defaults.default_scale),
            default_line_width: self
                .default_line_width
                .unwrap_or(defaults.default_line_width),
            default_color: self
                .default_color
                .clone()
                .unwrap_or(defaults.default_color),
        }
    }

    /// Parse the axiom and every rule.
    ///
    /// Only a malformed axiom is fatal. A malformed rule is reported in
    /// [`Grammar::rule_errors`] and replaced by an empty rule. Rules not
    /// reachable from the axiom are dropped.
    pub fn compile(&self) -> Result<Grammar, LoadError> {
        let mut parser = Parser::new();

        let axiom = parser.parse(&self.axiom, None).map_err(LoadError::Axiom)?;

        let known: Option<BTreeSet<String>> = self.strict.then(|| {
            self.terms
                .keys()
                .cloned()
                .chain(axiom.terms.iter().cloned())
                .collect()
        });

        let mut bindings = BindingMap::new();
        let mut rule_errors = Vec::new();

        for (symbol, def) in &self.terms {
            let rule = match parser.parse(&def.expr, known.as_ref()) {
                Ok(rule) => rule,
                Err(error) => {
                    debug!(symbol = %symbol, reason = %error.reason(), "malformed rule, using empty rule");
                    rule_errors.push(RuleError {
                        symbol: symbol.clone(),
                        error,
                    });
                    Expression::empty()
                }
            };

            bindings.insert(
                symbol.clone(),
                Binding {
                    rule: Some(rule),
                    scale: def.scale,
                    line_width: def.line_width,
                    color: def.color.clone(),
                },
            );
        }

        let reachable = reachable_symbols(&axiom.terms, &bindings);
        let report = bindings.sync(&reachable);
        for symbol in &report.removed {
            warn!(symbol = %symbol, "rule is unreachable from the axiom, ignoring it");
        }
        if !report.added.is_empty() {
            debug!(symbols = ?report.added, "symbols without rules draw with defaults");
        }

        Ok(Grammar {
            axiom,
            bindings,
            params: self.params(),
            background: self.background.clone(),
            rule_errors,
        })
    }
}
