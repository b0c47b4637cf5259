/*!
## Rust Machine Module

This Rust module stores and executes TinyBasic programs.

*/

mod eval;
mod memory;
mod program;
mod runtime;
mod stack;

pub use eval::Evaluator;
pub use memory::Memory;
pub use program::{Edit, Line, Program};
pub use runtime::Event;
pub use runtime::Runtime;
pub use runtime::INPUT_PROMPT;
pub use stack::Stack;

#[cfg(test)]
mod tests;
