//! Rewriting engine: expands an axiom through N generations of substitution
//! and flattens the result into turtle instructions.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bindings::BindingMap;
use super::instruction::Instruction;
use crate::grammar::{Expression, Node, NodeKind};

pub const DEFAULT_GENERATIONS: u32 = 5;
pub const DEFAULT_ANGLE: f64 = 30.0;
pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
pub const DEFAULT_COLOR: &str = "#000";

/// Parameters controlling expansion and flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    #[serde(default = "default_generations")]
    pub generations: u32,
    /// Magnitude of a bare `+` or `-`, in degrees.
    #[serde(default = "default_angle")]
    pub default_angle: f64,
    #[serde(default = "default_scale")]
    pub default_scale: f64,
    #[serde(default = "default_line_width")]
    pub default_line_width: f64,
    #[serde(default = "default_color")]
    pub default_color: String,
}

fn default_generations() -> u32 {
    DEFAULT_GENERATIONS
}

fn default_angle() -> f64 {
    DEFAULT_ANGLE
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_line_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            generations: DEFAULT_GENERATIONS,
            default_angle: DEFAULT_ANGLE,
            default_scale: DEFAULT_SCALE,
            default_line_width: DEFAULT_LINE_WIDTH,
            default_color: default_color(),
        }
    }
}

/// One generation: every bound `Term` is replaced by a fresh copy of its rule.
///
/// `Concat` nodes keep their span; unbound terms and other leaves are copied
/// as they are.
pub fn rewrite(tree: &Node, bindings: &BindingMap) -> Node {
    tree.map_leaves(|node| {
        if let NodeKind::Term(name) = &node.kind {
            if let Some(rule) = bindings.rule(name) {
                return rule.tree.clone();
            }
        }
        Node::new(node.kind.clone(), node.span, node.source.clone())
    })
}

/// Apply [`rewrite`] `generations` times. Generation 0 returns the axiom as is.
pub fn expand_tree(axiom: &Node, bindings: &BindingMap, generations: u32) -> Node {
    let mut tree = axiom.clone();
    for generation in 1..=generations {
        tree = rewrite(&tree, bindings);
        debug!(
            generation,
            instructions = tree.instruction_count(),
            "rewrote tree"
        );
    }
    tree
}

/// Emit one instruction per leaf of `tree`, in order.
///
/// Terms draw with their binding's style, or the defaults when unbound.
/// Bare turns are resolved against `params.default_angle`.
pub fn flatten(tree: &Node, bindings: &BindingMap, params: &RenderParams) -> Vec<Instruction> {
    // One resolved DrawLine per symbol; clones share the color.
    let mut styles: HashMap<Arc<str>, Instruction> = HashMap::new();
    let mut instructions = Vec::new();

    for leaf in tree.leaves() {
        let instruction = match &leaf.kind {
            NodeKind::Term(name) => styles
                .entry(name.clone())
                .or_insert_with(|| draw_style(name, bindings, params))
                .clone(),
            NodeKind::Turn(angle) => Instruction::Turn(angle.resolve(params.default_angle)),
            NodeKind::Save => Instruction::Save,
            NodeKind::Restore => Instruction::Restore,
            NodeKind::Concat(..) | NodeKind::End => unreachable!("leaves skips inner nodes"),
        };
        instructions.push(instruction);
    }

    instructions
}

fn draw_style(symbol: &str, bindings: &BindingMap, params: &RenderParams) -> Instruction {
    let binding = bindings.get(symbol);
    Instruction::draw(
        binding
            .and_then(|b| b.scale)
            .unwrap_or(params.default_scale),
        binding
            .and_then(|b| b.line_width)
            .unwrap_or(params.default_line_width),
        binding
            .and_then(|b| b.color.as_deref())
            .unwrap_or(params.default_color.as_str()),
    )
}

/// Expand `axiom` for `params.generations` generations and flatten it.
pub fn expand(axiom: &Expression, bindings: &BindingMap, params: &RenderParams) -> Vec<Instruction> {
    let tree = expand_tree(&axiom.tree, bindings, params.generations);
    let instructions = flatten(&tree, bindings, params);
    debug!(
        generations = params.generations,
        instructions = instructions.len(),
        "expanded axiom"
    );
    instructions
}
