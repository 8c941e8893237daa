//! Turtle instructions produced by flattening an expanded tree.

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Move forward by `scale` base units, drawing a line.
    DrawLine {
        scale: f64,
        width: f64,
        color: Arc<str>,
    },
    /// Rotate the heading by this many degrees.
    Turn(f64),
    Save,
    Restore,
}

impl Instruction {
    pub fn draw(scale: f64, width: f64, color: &str) -> Self {
        Instruction::DrawLine {
            scale,
            width,
            color: Arc::from(color),
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Instruction::DrawLine { .. })
    }
}
