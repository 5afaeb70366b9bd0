//! UpDown core: daily closes, round selection and the guess/reveal game.
//!
//! This crate holds everything that is not terminal I/O:
//! - Domain types (day bars, latest-first series)
//! - Market data providers (Alpha Vantage, on-disk fixtures) and payload parsing
//! - Start-day selection and the game state machine
//! - The controller that drives a [`presenter::Presenter`]
//! - Configuration and seeded randomness

pub mod config;
pub mod controller;
pub mod data;
pub mod domain;
pub mod format;
pub mod game;
pub mod presenter;
pub mod rng;
