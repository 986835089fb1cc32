//! UI components outside the main app shell.

pub mod results;
