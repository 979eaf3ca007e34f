//! Intrusive list node carried by every registered global.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::lifecycle::Lifecycle;
use crate::registry::Registry;

/// One registered global: a name, a lifecycle handle and the list links.
///
/// Nodes are only ever linked by `&'static` reference, so a registry can never
/// observe a node whose storage has been released. Declare them as `static`
/// items (block-scope `static`s are fine) or leak them.
pub struct StaticNode {
	name: &'static str,
	module: &'static str,
	handle: &'static dyn Lifecycle,
	next: Cell<Option<&'static StaticNode>>,
	prev: Cell<Option<&'static StaticNode>>,
	owner: AtomicUsize,
}

/// Owner id of a node that is not linked anywhere.
const UNLINKED: usize = 0;

// SAFETY: `next` and `prev` are only read or written by the registry whose id
// is recorded in `owner`, while it holds its list lock. Ids are never reused
// and travel with the registry when it moves, so at most one registry ever
// matches. `owner` itself is atomic and
// `handle` is `Sync` by the `Lifecycle` bound.
unsafe impl Sync for StaticNode {}

impl StaticNode {
	/// Creates an unlinked node. Does not allocate and does not log, so it is
	/// usable in `static` initialisers.
	pub const fn new(name: &'static str, module: &'static str, handle: &'static dyn Lifecycle) -> Self {
		Self {
			name,
			module,
			handle,
			next: Cell::new(None),
			prev: Cell::new(None),
			owner: AtomicUsize::new(UNLINKED),
		}
	}

	/// Identifier used for lookup. Compared by exact string equality.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Module path that declared the node.
	pub fn module(&self) -> &'static str {
		self.module
	}

	/// Constructs the wrapped value.
	pub fn init(&self) {
		self.handle.init();
	}

	/// Destroys the wrapped value in place.
	///
	/// # Safety
	///
	/// Same contract as [`Lifecycle::fini`].
	pub unsafe fn fini(&self) {
		// SAFETY: forwarded from the caller.
		unsafe { self.handle.fini() }
	}

	/// Whether the wrapped value is currently constructed.
	pub fn is_live(&self) -> bool {
		self.handle.is_live()
	}

	/// Whether the node is linked into any registry.
	pub fn is_linked(&self) -> bool {
		self.owner.load(Ordering::Acquire) != UNLINKED
	}

	pub(crate) fn is_linked_to(&self, registry: &Registry) -> bool {
		self.owner.load(Ordering::Acquire) == registry.id()
	}

	/// Claims the node for `registry`. Fails if another registry (or this one)
	/// already owns it.
	pub(crate) fn claim(&self, registry: &Registry) -> bool {
		self.owner
			.compare_exchange(UNLINKED, registry.id(), Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
	}

	/// Drops ownership and clears the links. Caller holds the owner's lock.
	pub(crate) fn release(&self) {
		self.next.set(None);
		self.prev.set(None);
		self.owner.store(UNLINKED, Ordering::Release);
	}

	pub(crate) fn next(&self) -> Option<&'static StaticNode> {
		self.next.get()
	}

	pub(crate) fn prev(&self) -> Option<&'static StaticNode> {
		self.prev.get()
	}

	pub(crate) fn set_next(&self, next: Option<&'static StaticNode>) {
		self.next.set(next);
	}

	pub(crate) fn set_prev(&self, prev: Option<&'static StaticNode>) {
		self.prev.set(prev);
	}
}

impl fmt::Debug for StaticNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StaticNode")
			.field("name", &self.name)
			.field("module", &self.module)
			.field("live", &self.is_live())
			.field("linked", &self.is_linked())
			.finish()
	}
}
