//! Static globals inspector.
//!
//! Runs the startup pass over every registered global, lists them with their
//! state, then runs the shutdown pass. With `--no-init` it only lists what is
//! registered.

mod globals;
mod report;

use clap::Parser;
use tracing::info;
use xeno_statics::StaticGlobals;

/// Inspector command line arguments.
#[derive(Parser, Debug)]
#[command(name = "statics-inspect")]
#[command(about = "List registered static globals and their state")]
#[command(version)]
struct Args {
	/// Only list globals whose name contains this text
	#[arg(short, long, value_name = "TEXT")]
	filter: Option<String>,

	/// Print JSON instead of a table
	#[arg(long)]
	json: bool,

	/// List registrations without running the startup pass
	#[arg(long)]
	no_init: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	info!(count = StaticGlobals::len(), "registered static globals");

	if args.no_init {
		let rows = report::collect(args.filter.as_deref());
		return emit(&args, None, &rows);
	}

	StaticGlobals::init();

	let host = |key: &str| globals::HOST.get(key).cloned().unwrap_or_default();
	let header = format!(
		"{} ({}/{}, pid {})",
		globals::banner().as_str(),
		host("os"),
		host("arch"),
		host("pid")
	);
	let rows = report::collect(args.filter.as_deref());

	// SAFETY: `header` and `rows` own copies; nothing borrows a global past here.
	unsafe { StaticGlobals::fini() };

	emit(&args, Some(&header), &rows)
}

fn emit(args: &Args, header: Option<&str>, rows: &[report::GlobalStatus]) -> anyhow::Result<()> {
	print!("{}", report::render(args.json, header, rows)?);
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("xeno_statics=trace,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	// stderr keeps stdout machine readable for --json
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
