//! palaver-bedrock
//!
//! Model request adaptation: builds the request shape each Bedrock model
//! family expects, invokes it, and pulls the reply text out of that family's
//! response shape.

pub mod chat;
pub mod client;
pub mod error;
pub mod families;
pub mod reply;
