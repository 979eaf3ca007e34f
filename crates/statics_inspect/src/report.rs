//! Status rows for registered globals and their text/JSON renderings.

use std::fmt::Write as _;

use serde::Serialize;
use xeno_statics::{StaticGlobals, StaticNode};

/// One registered global as seen by the inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalStatus {
	pub name: &'static str,
	pub module: &'static str,
	pub live: bool,
}

impl GlobalStatus {
	pub fn from_node(node: &StaticNode) -> Self {
		Self {
			name: node.name(),
			module: node.module(),
			live: node.is_live(),
		}
	}

	/// Substring match on the name; no filter matches everything.
	pub fn matches(&self, filter: Option<&str>) -> bool {
		filter.is_none_or(|text| self.name.contains(text))
	}

	fn state(&self) -> &'static str {
		if self.live { "live" } else { "pending" }
	}
}

/// Snapshots every registered global in registration order.
pub fn collect(filter: Option<&str>) -> Vec<GlobalStatus> {
	let mut rows = Vec::new();
	StaticGlobals::each(|node| {
		let row = GlobalStatus::from_node(node);
		if row.matches(filter) {
			rows.push(row);
		}
		true
	});
	rows
}

/// Renders an aligned table, optionally preceded by a header line.
pub fn render_text(header: Option<&str>, rows: &[GlobalStatus]) -> String {
	let width = rows.iter().map(|row| row.name.len()).max().unwrap_or(0).max("NAME".len());

	let mut out = String::new();
	if let Some(header) = header {
		let _ = writeln!(out, "{header}");
	}
	let _ = writeln!(out, "{:<width$}  {:<7}  MODULE", "NAME", "STATE");
	for row in rows {
		let _ = writeln!(out, "{:<width$}  {:<7}  {}", row.name, row.state(), row.module);
	}
	out
}

pub fn render_json(rows: &[GlobalStatus]) -> serde_json::Result<String> {
	serde_json::to_string_pretty(rows)
}

/// Full report as printed, ending in exactly one newline. The header is only
/// shown in the text form.
pub fn render(json: bool, header: Option<&str>, rows: &[GlobalStatus]) -> serde_json::Result<String> {
	if json {
		Ok(render_json(rows)? + "\n")
	} else {
		Ok(render_text(header, rows))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn rows() -> Vec<GlobalStatus> {
		vec![
			GlobalStatus {
				name: "inspect.host",
				module: "app::globals",
				live: true,
			},
			GlobalStatus {
				name: "fonts",
				module: "app::render",
				live: false,
			},
		]
	}

	#[test]
	fn filter_matches_name_substring() {
		let rows = rows();
		assert!(rows[0].matches(None));
		assert!(rows[0].matches(Some("host")));
		assert!(!rows[1].matches(Some("host")));
	}

	#[test]
	fn text_report_aligns_columns() {
		let text = render_text(Some("title"), &rows());
		assert_eq!(
			text,
			"title\n\
			 NAME          STATE    MODULE\n\
			 inspect.host  live     app::globals\n\
			 fonts         pending  app::render\n"
		);
	}

	#[test]
	fn empty_text_report_has_only_headings() {
		assert_eq!(render_text(None, &[]), "NAME  STATE    MODULE\n");
	}

	#[test]
	fn json_report_lists_rows() {
		let json = render_json(&rows()).unwrap();
		let value: serde_json::Value = serde_json::from_str(&json).unwrap();
		assert_eq!(value[0]["name"], "inspect.host");
		assert_eq!(value[0]["live"], true);
		assert_eq!(value[1]["module"], "app::render");
		assert_eq!(value.as_array().map(Vec::len), Some(2));
	}

	#[test]
	fn printed_report_ends_with_a_single_newline() {
		for json in [false, true] {
			let out = render(json, Some("title"), &rows()).unwrap();
			assert!(out.ends_with('\n') && !out.ends_with("\n\n"), "{out:?}");
		}
		assert_eq!(render(false, None, &[]).unwrap(), "NAME  STATE    MODULE\n");
	}
}
