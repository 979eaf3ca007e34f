//! Type-erased construction and destruction of deferred values.
//!
//! A [`Storage`] reserves room for a `T` without constructing it. The value is
//! built by [`Lifecycle::init`] and torn down in place by [`Lifecycle::fini`],
//! both driven by the registry's orchestrated passes. Because every
//! constructor argument is captured when the storage is declared, both entry
//! points take no arguments and can be dispatched through `&dyn Lifecycle`.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU8, Ordering};

/// Construct/destruct capability over caller-owned storage.
pub trait Lifecycle: Sync {
	/// Constructs the value in its reserved storage.
	fn init(&self);

	/// Destroys the value in place without releasing its storage.
	///
	/// # Safety
	///
	/// No reference obtained from the storage may be alive when this runs, and
	/// none may be used afterwards until the value is constructed again.
	unsafe fn fini(&self);

	/// Returns `true` while the value is constructed.
	fn is_live(&self) -> bool;
}

const UNINIT: u8 = 0;
const CONSTRUCTING: u8 = 1;
const LIVE: u8 = 2;
const DESTROYING: u8 = 3;

/// Observable phase of a [`Storage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
	/// No value; storage is reserved but untouched.
	Uninit,
	/// The constructor is running.
	Constructing,
	/// The value is constructed and readable.
	Live,
	/// The value is being dropped.
	Destroying,
}

impl State {
	fn from_raw(raw: u8) -> Self {
		match raw {
			CONSTRUCTING => Self::Constructing,
			LIVE => Self::Live,
			DESTROYING => Self::Destroying,
			_ => Self::Uninit,
		}
	}
}

/// Pre-reserved storage for a `T` that is constructed on demand.
///
/// `Storage::new` is `const`, so a storage can be a `static` item with no
/// dynamic initialisation. The constructor runs only when [`Lifecycle::init`]
/// is called.
pub struct Storage<T> {
	value: UnsafeCell<MaybeUninit<T>>,
	state: AtomicU8,
	ctor: fn() -> T,
}

// SAFETY: the value is written once under the `CONSTRUCTING` claim, published
// with a release store of `LIVE`, and only shared as `&T` after an acquire load
// observes `LIVE`. Dropping requires the `DESTROYING` claim and, through
// `Lifecycle::fini`'s contract, the absence of outstanding borrows. `T: Send`
// covers construction and destruction happening on different threads.
unsafe impl<T: Send + Sync> Sync for Storage<T> {}

impl<T> Storage<T> {
	/// Reserves storage that will be filled by `ctor` on [`Lifecycle::init`].
	pub const fn new(ctor: fn() -> T) -> Self {
		Self {
			value: UnsafeCell::new(MaybeUninit::uninit()),
			state: AtomicU8::new(UNINIT),
			ctor,
		}
	}

	/// Current phase of the storage.
	pub fn state(&self) -> State {
		State::from_raw(self.state.load(Ordering::Acquire))
	}

	/// Returns the value if it is constructed.
	pub fn get(&self) -> Option<&T> {
		if self.state.load(Ordering::Acquire) != LIVE {
			return None;
		}
		// SAFETY: `LIVE` is only stored after the value was fully written.
		Some(unsafe { (*self.value.get()).assume_init_ref() })
	}

	fn construct(&self) -> bool {
		if self
			.state
			.compare_exchange(UNINIT, CONSTRUCTING, Ordering::Acquire, Ordering::Acquire)
			.is_err()
		{
			return false;
		}

		// Restores `UNINIT` if the constructor unwinds.
		struct Reset<'a>(&'a AtomicU8);
		impl Drop for Reset<'_> {
			fn drop(&mut self) {
				self.0.store(UNINIT, Ordering::Release);
			}
		}

		let reset = Reset(&self.state);
		let value = (self.ctor)();
		std::mem::forget(reset);

		// SAFETY: the `CONSTRUCTING` claim gives this thread exclusive access.
		unsafe { (*self.value.get()).write(value) };
		self.state.store(LIVE, Ordering::Release);
		true
	}

	/// # Safety
	///
	/// See [`Lifecycle::fini`].
	unsafe fn destroy(&self) -> bool {
		if self
			.state
			.compare_exchange(LIVE, DESTROYING, Ordering::Acquire, Ordering::Acquire)
			.is_err()
		{
			return false;
		}

		// SAFETY: the value is live and the `DESTROYING` claim is exclusive;
		// the caller guarantees no outstanding borrows.
		unsafe { (*self.value.get()).assume_init_drop() };
		self.state.store(UNINIT, Ordering::Release);
		true
	}
}

impl<T: Send + Sync> Lifecycle for Storage<T> {
	fn init(&self) {
		if !self.construct() {
			let state = self.state();
			debug_assert!(state == State::Uninit, "storage initialised while {state:?}");
			tracing::warn!(?state, "ignoring init of storage that is not empty");
		}
	}

	unsafe fn fini(&self) {
		// SAFETY: forwarded from the caller.
		if !unsafe { self.destroy() } {
			let state = self.state();
			debug_assert!(state == State::Live, "storage finalised while {state:?}");
			tracing::warn!(?state, "ignoring fini of storage that is not live");
		}
	}

	fn is_live(&self) -> bool {
		self.state.load(Ordering::Acquire) == LIVE
	}
}

impl<T> Drop for Storage<T> {
	fn drop(&mut self) {
		if *self.state.get_mut() == LIVE {
			// SAFETY: `&mut self` rules out outstanding borrows.
			unsafe { self.value.get_mut().assume_init_drop() };
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Storage<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("Storage");
		s.field("state", &self.state());
		if let Some(value) = self.get() {
			s.field("value", value);
		}
		s.finish()
	}
}
