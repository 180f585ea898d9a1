//! A tiny pipe-and-redirect shell.
//!
//! One line of input is split into tokens ([`lexer`]), classified into a
//! plain, redirected, or pipelined command ([`parser`]), and executed by
//! spawning real processes wired together with OS pipes. Commands ending in
//! `&` are left running in the background and are only reaped by the `exit`
//! builtin. There is deliberately no quoting, no variable expansion and no
//! job control; the crate is small enough to read in one sitting and is
//! meant for experiments with process creation and descriptor plumbing.
//!
//! The main entry point is [`Interpreter`], which owns the interactive
//! read-parse-execute loop as well as the one-shot execution path used by
//! the binary's `-c` option.

mod executor;
mod interpreter;
pub mod lexer;
pub mod parser;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::{DEFAULT_PROMPT, Interpreter};
