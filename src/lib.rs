//! Human-in-the-loop approval cards for an email assistant's tool calls.
//!
//! Pushed tool-call snapshots become cards; interrupted cards carry an
//! editable draft of the proposed arguments, and the human's decision goes
//! back to the orchestrator as a single resume command.

pub mod app;
pub mod card;
pub mod classify;
pub mod clipboard;
pub mod config;
pub mod draft;
pub mod render;
pub mod resume;
pub mod runtime;
pub mod terminal;
pub mod transport;
pub mod types;
pub mod ui;
pub mod util;

#[cfg(test)]
mod test_support;
