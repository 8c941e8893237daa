//! lsys: L-system grammars expanded and drawn with turtle graphics.

pub mod config;
pub mod geom;
pub mod grammar;
pub mod render;
