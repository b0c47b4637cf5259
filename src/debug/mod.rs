/*!
## Rust Debug Module

Statement stepping, breakpoints, and a mirror of the program for an
external viewer.

*/

mod debugger;
mod sync;
mod viewer;

pub use debugger::Debugger;
pub use sync::Message;
pub use viewer::{MemoryViewer, NullViewer, ProcessViewer, Viewer};
