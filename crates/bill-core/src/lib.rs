//! Core state management for the bill counter.
//!
//! The [`OrderStateManager`] owns the menu catalog, the order ledger and the
//! order being entered, and drives the three-screen flow: catalog editor,
//! order entry and summary. Mutations are mirrored to a storage backend and
//! announced on an [`EventBus`] so front-ends can re-render.

pub mod builder;
pub mod event_bus;
pub mod persistence;
pub mod state;
pub mod summary;

pub use builder::{BuilderError, StateBuilder, StateFactories};
pub use event_bus::EventBus;
pub use persistence::Persistence;
pub use state::{NavigationAction, NavigationError, Navigator, OrderStateManager};
pub use summary::{Summary, SummaryInputs};
