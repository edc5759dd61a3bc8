//! Chat progress reporting

pub mod reporter;
