//! Chat session domain.
//!
//! - [`entities::Conversation`]: ordered turn history of one session
//! - [`entities::Turn`]: a single role-tagged entry
//! - [`response::ModelReply`]: what one model query returns

pub mod entities;
pub mod response;
