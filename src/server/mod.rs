//! Process-level serving: transport security and the listener loop.

pub mod listener;
pub mod security;
