//! # alloy-ui
//!
//! A behaviour-composed, declarative component engine over a retained DOM.
//!
//! A [`ComponentSpec`](spec::ComponentSpec) describes an element, its
//! children and a set of named behaviours. [`World::build`](world::World::build)
//! turns it into a live component whose DOM and event handlers are merged from
//! every behaviour. A [`Gui`](system::Gui) takes over a root component,
//! registers the tree and routes native and simulated events through it.
//!
//! ## Core Systems
//!
//! - **[`schema`]**: runtime validation for specs arriving as data
//! - **[`dom`]**: slotmap-backed DOM arena with queries and html rendering
//! - **[`spec`]**: component specs, DOM definitions, uids, JSON decoding
//! - **[`behaviour`]**: the `Behaviour` trait, behaviour sets, the data registry
//! - **[`behaviours`]**: built-in Toggling, Disabling, Receiving and AddEvents
//! - **[`event`]**: simulated events, handlers, ordering, dispatch, native input
//! - **[`component`]**: the builder and DOM reconciliation
//! - **[`system`]**: Gui roots, the uid registry, attachment, native wiring
//! - **[`world`]**: the owner of every DOM node, component and system
//! - **[`schedule`]**: throttled callbacks on tokio timers
//! - **[`testing`]**: headless Pilot and snapshot helpers

// Foundation
pub mod error;
pub mod schedule;
pub mod schema;

// Core systems
pub mod dom;
pub mod spec;

// Behaviours and events
pub mod behaviour;
pub mod behaviours;
pub mod event;

// Components and systems
pub mod component;
pub mod system;
pub mod world;

// Testing
pub mod testing;

pub use error::{AlloyError, Result};
pub use world::World;

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use alloy_ui_macros::sketch;
