//! Intrusive registry of static globals.
//!
//! # Role
//!
//! A [`Registry`] is a doubly linked list threaded through the
//! [`StaticNode`]s themselves, guarded by a single lock. It sequences the
//! construction pass (head to tail) and the destruction pass (tail to head),
//! and supports lookup, removal and lock-dropping iteration.
//!
//! # Invariants
//!
//! - `head` is `None` iff `tail` is `None` iff `len == 0`.
//! - For every linked node `a` with a successor, `a.next.prev == a`.
//! - A node's links are only touched by the registry that owns it, under that
//!   registry's lock.
//!
//! Ownership is tracked by a process-unique registry id, assigned on first use
//! and carried along when the registry is moved. A registry that takes another
//! one's place in memory never inherits its nodes.

mod policy;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, MutexGuard};
pub use policy::DuplicatePolicy;
use tracing::{debug, trace};

use crate::error::RegistryError;
use crate::node::StaticNode;

struct Ends {
	head: Option<&'static StaticNode>,
	tail: Option<&'static StaticNode>,
	len: usize,
}

impl Ends {
	fn find(&self, name: &str) -> Option<&'static StaticNode> {
		let mut cursor = self.head;
		while let Some(node) = cursor {
			if node.name() == name {
				return Some(node);
			}
			cursor = node.next();
		}
		None
	}
}

/// Next registry id. Zero is reserved for unlinked nodes.
static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Ordered set of registered globals.
pub struct Registry {
	ends: Mutex<Ends>,
	policy: DuplicatePolicy,
	id: AtomicUsize,
}

impl Registry {
	/// Creates an empty registry that permits duplicate names.
	pub const fn new() -> Self {
		Self::with_policy(DuplicatePolicy::Allow)
	}

	/// Creates an empty registry with the given duplicate-name policy.
	pub const fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			ends: Mutex::new(Ends {
				head: None,
				tail: None,
				len: 0,
			}),
			policy,
			id: AtomicUsize::new(0),
		}
	}

	/// Identity recorded in the nodes this registry owns.
	pub(crate) fn id(&self) -> usize {
		let id = self.id.load(Ordering::Acquire);
		if id != 0 {
			return id;
		}
		let fresh = NEXT_ID.fetch_add(1, Ordering::Relaxed);
		match self.id.compare_exchange(0, fresh, Ordering::AcqRel, Ordering::Acquire) {
			Ok(_) => fresh,
			Err(current) => current,
		}
	}

	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Appends `node` at the tail.
	///
	/// Never allocates or logs.
	///
	/// # Errors
	///
	/// - [`RegistryError::AlreadyLinked`] if the node is a member of any registry.
	/// - [`RegistryError::DuplicateName`] under [`DuplicatePolicy::Reject`] when
	///   the name is already linked here.
	pub fn link(&self, node: &'static StaticNode) -> Result<(), RegistryError> {
		let mut ends = self.ends.lock();
		let name = node.name();

		if node.is_linked() {
			return Err(RegistryError::AlreadyLinked { name });
		}
		if self.policy == DuplicatePolicy::Reject && ends.find(name).is_some() {
			return Err(RegistryError::DuplicateName { name });
		}
		if !node.claim(self) {
			return Err(RegistryError::AlreadyLinked { name });
		}

		node.set_prev(ends.tail);
		match ends.tail {
			Some(tail) => tail.set_next(Some(node)),
			None => ends.head = Some(node),
		}
		ends.tail = Some(node);
		ends.len += 1;
		Ok(())
	}

	/// Constructs every linked global, head to tail.
	///
	/// The lock is held for the whole pass, so constructors must not call back
	/// into this registry.
	pub fn init_all(&self) {
		let ends = self.ends.lock();
		let mut cursor = ends.head;
		while let Some(node) = cursor {
			debug!(name = node.name(), module = node.module(), "init static global");
			node.init();
			cursor = node.next();
		}
		trace!(count = ends.len, "static globals initialised");
	}

	/// Destroys every linked global, tail to head.
	///
	/// # Safety
	///
	/// No reference into any linked global may be alive, and none may be used
	/// afterwards until the globals are initialised again.
	pub unsafe fn fini_all(&self) {
		let ends = self.ends.lock();
		let mut cursor = ends.tail;
		while let Some(node) = cursor {
			debug!(name = node.name(), module = node.module(), "fini static global");
			// SAFETY: forwarded from the caller.
			unsafe { node.fini() };
			cursor = node.prev();
		}
		trace!(count = ends.len, "static globals finalised");
	}

	/// Returns the first linked node named `name`.
	pub fn find(&self, name: &str) -> Option<&'static StaticNode> {
		self.ends.lock().find(name)
	}

	/// Unlinks `node`. Returns `false`, changing nothing, if the node is not
	/// linked into this registry.
	///
	/// A removed node is skipped by later passes and may be linked again.
	pub fn remove(&self, node: &'static StaticNode) -> bool {
		let mut ends = self.ends.lock();
		if !node.is_linked_to(self) {
			return false;
		}

		let (prev, next) = (node.prev(), node.next());
		match next {
			Some(next) => next.set_prev(prev),
			None => ends.tail = prev,
		}
		match prev {
			Some(prev) => prev.set_next(next),
			None => ends.head = next,
		}
		ends.len -= 1;
		node.release();
		true
	}

	/// Visits linked nodes head to tail until `visit` returns `false`.
	///
	/// The lock is released around every call to `visit`, so the visitor may
	/// link, find or remove nodes. There is no snapshot: after each visit the
	/// walk resumes from the visited node's current successor. If the visitor
	/// removed that node, the walk resumes after the most recently visited node
	/// that is still linked, or from the head if none is. Nodes appended during
	/// the walk are reached; a node removed and linked again counts as appended.
	///
	/// Returns `false` if the visitor stopped the walk, `true` once no linked
	/// successor remains.
	pub fn each<F>(&self, mut visit: F) -> bool
	where
		F: FnMut(&'static StaticNode) -> bool,
	{
		let mut ends = self.ends.lock();
		let mut visited: Vec<&'static StaticNode> = Vec::new();
		let mut cursor = ends.head;
		while let Some(node) = cursor {
			if !MutexGuard::unlocked(&mut ends, || visit(node)) {
				return false;
			}
			cursor = if node.is_linked_to(self) {
				visited.push(node);
				node.next()
			} else {
				loop {
					match visited.last() {
						Some(last) if last.is_linked_to(self) => break last.next(),
						Some(_) => {
							visited.pop();
						}
						None => break ends.head,
					}
				}
			};
		}
		true
	}

	/// Number of linked nodes.
	pub fn len(&self) -> usize {
		self.ends.lock().len
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Drop for Registry {
	fn drop(&mut self) {
		let ends = self.ends.get_mut();
		let mut cursor = ends.head.take();
		ends.tail = None;
		ends.len = 0;
		while let Some(node) = cursor {
			cursor = node.next();
			node.release();
		}
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("policy", &self.policy)
			.field("len", &self.len())
			.finish()
	}
}
