//! Output formatting for the chat console

pub mod console;
