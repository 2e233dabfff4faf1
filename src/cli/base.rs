//! Base functionality for the dvsky CLI
//!
//! This module provides the common trait for command processing and
//! shared error/exit helpers used by the subcommands.

use crate::client::print_error;

/// Trait for processing CLI subcommands
///
/// Implementors define how to handle their specific subcommand variant.
pub trait Matcher {
    /// Process this subcommand
    fn process(self);
}

/// Prints an error to stderr and terminates with the given exit code.
pub fn exit_with_error(error: &str, code: i32) -> ! {
    print_error(error);
    std::process::exit(code);
}
