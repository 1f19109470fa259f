//! # Core Application Logic
//!
//! J.A.R.V.I.S.'s business logic. It knows nothing about any specific UI
//! technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │   Proxy    │
//!          │  Adapter   │ ── HTTP ────►  │  (axum)    │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and the `RequestState` slot
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`conversation`]: Turns sent upstream with every request
//! - [`attachment`]: Staged images
//! - [`input`]: Input height normalization
//! - [`greeting`]: Time-of-day greeting and status lines
//! - [`config`]: `~/.jarvis/config.toml` loading and resolution
//! - [`export`]: HTML transcript export

pub mod action;
pub mod attachment;
pub mod config;
pub mod conversation;
pub mod export;
pub mod greeting;
pub mod input;
pub mod state;
