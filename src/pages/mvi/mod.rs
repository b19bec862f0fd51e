//! Model-View-Intent primitives for page models.
//!
//! Pages keep their state in plain values and change it only through a
//! reducer, so every transition is a pure function that tests can drive
//! directly.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ rendered lines
//! ```
//!
//! Data arrives as intents too: a fetch settling into success or failure
//! is reduced like any user action.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::PageState;
