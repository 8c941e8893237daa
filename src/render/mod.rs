//! Rendering pipeline: axiom + bindings → instructions → segments → fitted segments.

pub mod bindings;
pub mod expand;
pub mod fit;
pub mod instruction;
pub mod svg;
pub mod turtle;

pub use bindings::{reachable_symbols, Binding, BindingMap, SyncReport};
pub use expand::{expand, expand_tree, flatten, rewrite, RenderParams};
pub use fit::{fit, fit_to_viewport, Viewport};
pub use instruction::Instruction;
pub use svg::{draw_segments, Stroke, SvgDocument};
pub use turtle::{interpret, Turtle, TurtleState};

use tracing::debug;

use crate::geom::Segment;
use crate::grammar::Expression;

/// Expand, interpret and fit in one go, ready for a [`Stroke`] sink.
pub fn render_segments(
    axiom: &Expression,
    bindings: &BindingMap,
    params: &RenderParams,
    viewport: &Viewport,
) -> Vec<Segment> {
    let instructions = expand(axiom, bindings, params);
    let mut segments = interpret(&instructions, viewport.base_unit());
    debug!(
        instructions = instructions.len(),
        segments = segments.len(),
        "interpreted instructions"
    );
    fit_to_viewport(&mut segments, viewport);
    segments
}
