//! Result formatting for the terminal.

pub mod console;
pub mod formatter;
