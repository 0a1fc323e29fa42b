//! One assistant persona talking over one remote thread.
//!
//! The provider keeps the message history; locally only the assistant
//! and thread ids are held.

mod client;

#[cfg(test)]
mod tests;

pub use client::{ConversationClient, NO_RESPONSE};
