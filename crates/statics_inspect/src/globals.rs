//! Globals owned by the inspector itself, so a bare run has something to list.

use std::collections::BTreeMap;

use xeno_statics::{StaticGlobal, static_global};

static_global! {
	/// Facts about the running process, shown in the report header.
	pub static HOST: BTreeMap<&'static str, String> = "inspect.host" => host_facts;
}

fn host_facts() -> BTreeMap<&'static str, String> {
	BTreeMap::from([
		("os", std::env::consts::OS.to_owned()),
		("arch", std::env::consts::ARCH.to_owned()),
		("pid", std::process::id().to_string()),
	])
}

/// Report title, declared at block scope.
pub fn banner() -> &'static StaticGlobal<String> {
	static_global! {
		static BANNER: String = "inspect.banner" => || format!("xeno-statics {}", env!("CARGO_PKG_VERSION"));
	}
	&BANNER
}
