//! Application state management module.
//!
//! This module contains the core state management for the engine, including:
//! - Main `State` struct that holds all admin surface data
//! - Navigation types (Route)
//! - Form controller types (Form, FormMode, FormPhase)
//! - Delete confirmation modal state
//! - State error handling

mod error;
mod form;
mod modal;
mod navigation;

pub use error::StateError;
pub use form::{Form, FormMode, FormPhase};
pub use modal::{ConfirmModal, DeleteTarget};
pub use navigation::Route;

// Re-export implementation from state_impl.rs
// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

// Re-export State
pub use state_impl::{State, StoreContext};
