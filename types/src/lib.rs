//! Common types for the playtime platform.
//!
//! Defines the account/balance model, settlement records, game identifiers and
//! the tunable constants shared by the engine and its clients. This crate is
//! deliberately free of I/O and async machinery; the stateful pieces live in
//! `playtime-engine`.

mod account;
mod constants;
mod game;
mod settlement;

pub use account::*;
pub use constants::*;
pub use game::*;
pub use settlement::*;
