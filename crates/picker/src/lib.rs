//! # Catalog Picker
//!
//! Interactive category tree picker: a pure reducer over [`PickerState`] plus
//! an async [`PickerController`] that talks to the catalog service.
//!
//! ```text
//! host event ──> PickerController::dispatch
//!                    │
//!                    ├──> reduce(state, event) -> (state', effects)
//!                    │
//!                    └──> effects
//!                           ├─ FetchTree       -> CategorySource::fetch_tree      ─┐
//!                           ├─ CreateCategory  -> CategorySource::create_category ─┤ result fed back
//!                           ├─ EmitChange      -> on_change(id)                     │ as an event
//!                           └─ Notify          -> log::warn                         │
//!                    ▲                                                              │
//!                    └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod controller;
mod error;
mod reducer;
mod source;
mod state;

pub use config::{IdCoercion, PickerConfig};
pub use controller::{ChangeCallback, PickerController};
pub use error::{PickerError, Result};
pub use reducer::{reduce, Effect, PickerEvent, Transition};
pub use source::{next_numeric_id, prepare_new_category, CategorySource, StaticSource};
pub use state::{LoadPhase, PickerState};
