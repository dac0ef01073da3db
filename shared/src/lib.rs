//! Types shared between the arena server and its clients: field
//! configuration, 2D math, and the JSON wire protocol.

pub mod config;
pub mod protocol;
pub mod vec2;
