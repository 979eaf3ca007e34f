//! Deferred construction for process-wide statics.
//!
//! Globals declared with [`static_global!`] register themselves while the
//! program loads, but their values are only constructed when the program calls
//! [`StaticGlobals::init`], in registration order, and destroyed by
//! [`StaticGlobals::fini`] in reverse order. Registration is cheap and order
//! independent; construction is explicit and sequenced.
//!
//! # Modules
//!
//! - [`lifecycle`] - Type-erased construct/destruct contract and [`Storage`]
//! - [`node`] - Intrusive list node carried by each global
//! - [`registry`] - The lock-protected list and its passes
//! - [`global`] - Typed wrapper and the process-wide facade
//!
//! # Ordering
//!
//! There is no dependency resolution. A global may read another global from
//! its constructor only if that global was registered earlier.

pub mod error;
pub mod global;
pub mod lifecycle;
mod macros;
pub mod node;
pub mod registry;

#[doc(hidden)]
pub use inventory;

pub use error::RegistryError;
pub use global::{StaticGlobal, StaticGlobals, StaticNodeReg};
pub use lifecycle::{Lifecycle, State, Storage};
pub use node::StaticNode;
pub use registry::{DuplicatePolicy, Registry};
