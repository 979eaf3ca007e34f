//! Process-wide registry behaviour for globals declared with `static_global!`.
//!
//! Every test touches the shared registry, so all of them run serially and
//! leave every global finalised.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serial_test::serial;
use xeno_statics::{StaticGlobal, StaticGlobals, Storage, static_global};

static JOURNAL: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Value that journals its construction and destruction.
#[derive(Debug)]
struct Tracked {
	name: &'static str,
	value: u32,
}

impl Tracked {
	fn new(name: &'static str, value: u32) -> Self {
		JOURNAL.lock().push(format!("init {name}"));
		Self { name, value }
	}
}

impl Drop for Tracked {
	fn drop(&mut self) {
		JOURNAL.lock().push(format!("fini {}", self.name));
	}
}

static_global! {
	/// First journaled global.
	static ALPHA: Tracked = "tests.alpha" => || Tracked::new("alpha", 1);
	static BETA: Tracked = "tests.beta" => || Tracked::new("beta", 2);
	static GAMMA: Tracked = "tests.gamma" => || Tracked::new("gamma", 3);
	static REMOVABLE: Tracked = "tests.removable" => || Tracked::new("removable", 4);
}

fn scoped_counter() -> &'static StaticGlobal<u64> {
	static_global! {
		static COUNTER: u64 = "tests.scoped_counter" => || 41 + 1;
	}
	&COUNTER
}

fn drain_journal() -> Vec<String> {
	JOURNAL.lock().drain(..).collect()
}

fn cycle<R>(body: impl FnOnce() -> R) -> R {
	StaticGlobals::init();
	let result = body();
	unsafe { StaticGlobals::fini() };
	result
}

#[test]
#[serial]
fn submitted_globals_are_registered() {
	for name in ["tests.alpha", "tests.beta", "tests.gamma", "tests.scoped_counter"] {
		let node = StaticGlobals::find(name).unwrap_or_else(|| panic!("{name} not registered"));
		assert_eq!(node.name(), name);
		assert!(node.is_linked());
		assert!(!node.is_live());
	}
	assert_eq!(StaticGlobals::find("tests.alpha").unwrap().module(), module_path!());
	assert!(StaticGlobals::find("tests.missing").is_none());
	assert!(StaticGlobals::len() >= 4);
}

#[test]
#[serial]
fn values_live_between_init_and_fini() {
	assert!(ALPHA.try_get().is_none());
	drain_journal();

	let sum = cycle(|| {
		assert!(ALPHA.is_live() && BETA.is_live() && GAMMA.is_live());
		ALPHA.value + BETA.value + GAMMA.value
	});
	assert_eq!(sum, 6);
	assert!(!ALPHA.is_live());

	let journal = drain_journal();
	let (inits, finis): (Vec<_>, Vec<_>) = journal.iter().partition(|entry| entry.starts_with("init "));
	assert_eq!(inits.len(), finis.len());
	assert!(journal[..inits.len()].iter().all(|entry| entry.starts_with("init ")));

	let constructed: Vec<_> = inits.iter().map(|entry| &entry[5..]).collect();
	let mut destroyed: Vec<_> = finis.iter().map(|entry| &entry[5..]).collect();
	destroyed.reverse();
	assert_eq!(constructed, destroyed);
}

#[test]
#[serial]
fn block_scope_global_is_registered() {
	let counter = scoped_counter();
	assert!(counter.try_get().is_none());
	assert!(StaticGlobals::find("tests.scoped_counter").is_some());

	let value = cycle(|| **counter);
	assert_eq!(value, 42);
}

#[test]
#[serial]
fn removed_global_is_skipped() {
	let node = REMOVABLE.node();
	assert!(StaticGlobals::remove(node));
	assert!(StaticGlobals::find("tests.removable").is_none());

	drain_journal();
	cycle(|| assert!(!REMOVABLE.is_live()));
	assert!(!drain_journal().iter().any(|entry| entry.ends_with("removable")));

	StaticGlobals::link(node).expect("removed node links again");
	assert!(StaticGlobals::find("tests.removable").is_some());
}

#[test]
#[serial]
fn runtime_linked_global_joins_the_passes() {
	static STORAGE: Storage<&'static str> = Storage::new(|| "late value");
	static LATE: StaticGlobal<&'static str> = StaticGlobal::new("tests.late", module_path!(), &STORAGE);

	StaticGlobals::link(LATE.node()).unwrap();
	assert!(StaticGlobals::link(LATE.node()).is_err());

	let value = cycle(|| *LATE);
	assert_eq!(value, "late value");
	assert!(StaticGlobals::remove(LATE.node()));
}

#[test]
#[serial]
fn each_enumerates_every_global() {
	let mut names = Vec::new();
	assert!(StaticGlobals::each(|node| {
		names.push(node.name());
		true
	}));
	for name in ["tests.alpha", "tests.beta", "tests.gamma"] {
		assert!(names.contains(&name), "{name} missing from {names:?}");
	}

	let mut visited = 0;
	assert!(!StaticGlobals::each(|_| {
		visited += 1;
		false
	}));
	assert_eq!(visited, 1);
}

#[test]
#[serial]
#[should_panic(expected = "read while not initialised")]
fn reading_before_init_panics() {
	let _value = ALPHA.value;
}
