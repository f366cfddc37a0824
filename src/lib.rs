//! Wordle Pilot
//!
//! Reads a Wordle board out of the page's shadow-DOM component tree and types
//! guesses back through its on-screen keyboard with human-like key timing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use wordle_pilot::driver::{DriverConfig, InputDriver};
//! use wordle_pilot::schedule::VirtualClock;
//! use wordle_pilot::surface::BoardSimulator;
//!
//! let clock = Arc::new(VirtualClock::new());
//! let board = Arc::new(Mutex::new(BoardSimulator::new("slate")));
//! let driver = InputDriver::new(board, Arc::clone(&clock), DriverConfig::default());
//!
//! driver.type_word("crane").unwrap();
//! clock.flush();
//!
//! let state = driver.extract().unwrap();
//! println!("{}", state.to_json().unwrap()); // {"guesses":[{"word":"crane","results":"--X-X"}]}
//! ```

// Core domain types
pub mod core;

// Errors and non-fatal diagnostics
pub mod diagnostics;
pub mod error;

// Page access
pub mod surface;

// Board state extraction
pub mod extract;

// Timers and timed key input
pub mod driver;
pub mod schedule;

// Solver boundary
pub mod solver;

// Configuration
pub mod config;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
