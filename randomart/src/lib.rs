//! Procedural "random art": grow an expression from a weighted grammar, then
//! evaluate it once per pixel over [-1, 1]².

pub mod evaluator;
pub mod fuzzer;
pub mod grammar;
pub mod grammars;
pub mod prelude;
pub mod render;
pub mod term;

pub use evaluator::{evaluate, EvalError, Value};
pub use fuzzer::{fuzz, Fuzzer, GenerationError, DEFAULT_DEPTH};
pub use grammar::{Branch, Grammar, Rule, RuleId, Weight};
pub use grammars::default_grammar;
pub use render::{render, Color, Raster, RenderError};
pub use term::{Kind, Node, Production, Term};

/// Default edge length of generated images, in pixels.
pub const DEFAULT_SIZE: u32 = 600;
