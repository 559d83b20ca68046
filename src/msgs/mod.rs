#[macro_use]
mod macros;

pub mod alert;
pub mod base;
pub mod ccs;
pub mod codec;
pub mod fragment;
pub mod handshake;
pub mod message;
