//! Turtle interpreter: walks an instruction sequence and produces line segments.

use std::sync::Arc;

use super::instruction::Instruction;
use crate::geom::{Segment, Vec2};

/// Position and heading (degrees, measured from +x towards +y).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurtleState {
    pub position: Vec2,
    pub heading: f64,
}

/// A turtle with a save/restore stack.
///
/// The current state is always present; `Restore` with nothing saved is
/// ignored, so unmatched `]` never fails.
#[derive(Debug, Clone)]
pub struct Turtle {
    current: TurtleState,
    saved: Vec<TurtleState>,
    base_unit: f64,
}

impl Turtle {
    /// A turtle at the origin facing +x. Each `DrawLine` moves
    /// `base_unit × scale`.
    pub fn new(base_unit: f64) -> Self {
        Self {
            current: TurtleState::default(),
            saved: Vec::new(),
            base_unit,
        }
    }

    pub fn state(&self) -> TurtleState {
        self.current
    }

    /// Number of states on the stack, including the current one.
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    /// Execute one instruction, returning the segment it drew, if any.
    pub fn step(&mut self, instruction: &Instruction) -> Option<Segment> {
        match instruction {
            Instruction::DrawLine {
                scale,
                width,
                color,
            } => {
                let from = self.current.position;
                let to = from + Vec2::from_polar(self.base_unit * scale, self.current.heading);
                self.current.position = to;
                Some(Segment {
                    from,
                    to,
                    width: *width,
                    color: Arc::clone(color),
                })
            }
            Instruction::Turn(degrees) => {
                self.current.heading += degrees;
                None
            }
            Instruction::Save => {
                self.saved.push(self.current);
                None
            }
            Instruction::Restore => {
                if let Some(state) = self.saved.pop() {
                    self.current = state;
                }
                None
            }
        }
    }
}

/// Run `instructions` from the origin and collect every segment drawn.
///
/// Zero-width lines still produce segments; they move the turtle and count
/// towards the drawing's extent.
pub fn interpret(instructions: &[Instruction], base_unit: f64) -> Vec<Segment> {
    let mut turtle = Turtle::new(base_unit);
    instructions
        .iter()
        .filter_map(|instruction| turtle.step(instruction))
        .collect()
}
