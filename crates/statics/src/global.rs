//! Typed globals and the process-wide registry.
//!
//! Each [`static_global!`](crate::static_global) invocation creates a
//! [`StaticGlobal`] and submits its node via `inventory::submit!`. The first
//! call into [`StaticGlobals`] links every submitted node into the process
//! registry, after which [`StaticGlobals::init`] and [`StaticGlobals::fini`]
//! sequence construction and destruction.

use std::fmt;
use std::ops::Deref;
use std::sync::Once;

use crate::error::RegistryError;
use crate::lifecycle::Storage;
use crate::node::StaticNode;
use crate::registry::Registry;

/// A named global whose value is built by [`StaticGlobals::init`] and torn
/// down by [`StaticGlobals::fini`].
///
/// Reading it outside that window panics through `Deref`; use
/// [`try_get`](Self::try_get) to check first.
pub struct StaticGlobal<T: 'static> {
	node: StaticNode,
	storage: &'static Storage<T>,
}

impl<T: Send + Sync + 'static> StaticGlobal<T> {
	/// Pairs `storage` with a node named `name`. Does not register anything;
	/// see [`static_global!`](crate::static_global).
	pub const fn new(name: &'static str, module: &'static str, storage: &'static Storage<T>) -> Self {
		Self {
			node: StaticNode::new(name, module, storage),
			storage,
		}
	}
}

impl<T: 'static> StaticGlobal<T> {
	/// The node that represents this global in a registry.
	pub const fn node(&self) -> &StaticNode {
		&self.node
	}

	pub fn name(&self) -> &'static str {
		self.node.name()
	}

	/// Returns the value if it is constructed.
	pub fn try_get(&self) -> Option<&T> {
		self.storage.get()
	}

	pub fn is_live(&self) -> bool {
		self.storage.get().is_some()
	}
}

impl<T: 'static> Deref for StaticGlobal<T> {
	type Target = T;

	fn deref(&self) -> &T {
		match self.storage.get() {
			Some(value) => value,
			None => panic!("static global {:?} read while not initialised", self.node.name()),
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for StaticGlobal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StaticGlobal")
			.field("name", &self.node.name())
			.field("value", &self.storage.get())
			.finish()
	}
}

/// Static node registration entry collected via `inventory`.
pub struct StaticNodeReg(pub &'static StaticNode);

inventory::collect!(StaticNodeReg);

static GLOBALS: Registry = Registry::new();
static ADOPT: Once = Once::new();

/// Links every node submitted through `inventory` into [`GLOBALS`], in
/// submission order.
fn registry() -> &'static Registry {
	ADOPT.call_once(|| {
		// `inventory` yields the most recently submitted entry first.
		let submitted: Vec<&'static StaticNode> = inventory::iter::<StaticNodeReg>
			.into_iter()
			.map(|reg| reg.0)
			.collect();
		for node in submitted.into_iter().rev() {
			if let Err(e) = GLOBALS.link(node) {
				tracing::error!(module = node.module(), "static global registration failed: {}", e);
			}
		}
		tracing::trace!(count = GLOBALS.len(), "adopted submitted static globals");
	});
	&GLOBALS
}

/// Orchestration and diagnostic surface over the process-wide registry.
///
/// Call [`init`](Self::init) once before any registered global is read and
/// [`fini`](Self::fini) once after the last read.
#[derive(Debug, Clone, Copy)]
pub struct StaticGlobals;

impl StaticGlobals {
	/// Constructs every registered global in registration order.
	pub fn init() {
		registry().init_all();
	}

	/// Destroys every registered global in reverse registration order.
	///
	/// # Safety
	///
	/// No reference into any registered global may be alive, and none may be
	/// used afterwards until [`init`](Self::init) runs again.
	pub unsafe fn fini() {
		// SAFETY: forwarded from the caller.
		unsafe { registry().fini_all() }
	}

	/// Registers a node that was not submitted at load time.
	///
	/// # Errors
	///
	/// See [`Registry::link`].
	pub fn link(node: &'static StaticNode) -> Result<(), RegistryError> {
		registry().link(node)
	}

	pub fn find(name: &str) -> Option<&'static StaticNode> {
		registry().find(name)
	}

	/// See [`Registry::remove`].
	pub fn remove(node: &'static StaticNode) -> bool {
		registry().remove(node)
	}

	/// See [`Registry::each`].
	pub fn each<F>(visit: F) -> bool
	where
		F: FnMut(&'static StaticNode) -> bool,
	{
		registry().each(visit)
	}

	pub fn len() -> usize {
		registry().len()
	}
}
