//! # TinyBasic
//!
//! A TinyBasic interpreter with a stepping debugger.
//!
//! Programs are made of numbered lines. A line typed without a number
//! runs immediately.
//! ```text
//! 10 LET X = 5
//! 20 IF X > 3 THEN PRINT "BIG ", X
//! 30 END
//! RUN
//! ```
//!
//! Variables are the single letters `A` through `Z` and hold 16-bit
//! integers that wrap on overflow. `RND(N)` draws from `1..=N`.
//!
//! The [`mach::Runtime`] never blocks. Call `execute` in a loop and act on
//! the returned [`mach::Event`]. The [`debug::Debugger`] wraps a runtime
//! and adds stepping, breakpoints and an external viewer.

pub mod debug;
pub mod lang;
pub mod mach;
