use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use snipsync_cli::Commands;
use snipsync_cli::SnipsyncCli;
use snipsync_core::Snipsync;
use snipsync_core::SnipsyncConfig;
use snipsync_core::SnipsyncError;
use snipsync_core::SyncReport;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SnipsyncCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match args.command {
		Some(Commands::Run { dry_run }) => run_sync(&args, dry_run),
		None => run_sync(&args, false),
		Some(Commands::Clear) => run_clear(&args),
		Some(Commands::Check { diff }) => run_check(&args, diff),
	};

	if let Err(e) = result {
		match e.downcast::<SnipsyncError>() {
			Ok(error) => {
				let report: miette::Report = (*error).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Warnings from the core are emitted through `tracing`. `RUST_LOG` takes
/// precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn resolve_root(args: &SnipsyncCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> Result<SnipsyncConfig, SnipsyncError> {
	SnipsyncConfig::load(root)?
		.ok_or_else(|| SnipsyncError::MissingConfig(root.display().to_string()))
}

fn run_sync(args: &SnipsyncCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let sync = Snipsync::new(&config, &root);
	let report = if dry_run { sync.check()? } else { sync.run()? };
	print_warning_summary(&report);

	if report.is_clean() {
		println!("All targets are already up to date.");
		return Ok(());
	}

	if dry_run {
		println!(
			"Dry run: would update {} region(s) in {} file(s):",
			report.region_count(),
			report.changes.len()
		);
		print_changed_paths(&report, &root);
	} else {
		println!("Updated {} file(s).", report.changes.len());
		if args.verbose {
			print_changed_paths(&report, &root);
		}
	}

	Ok(())
}

fn run_clear(args: &SnipsyncCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let report = Snipsync::new(&config, &root).clear()?;
	print_warning_summary(&report);

	println!("Cleared {} file(s).", report.changes.len());
	if args.verbose {
		print_changed_paths(&report, &root);
	}

	Ok(())
}

fn run_check(args: &SnipsyncCli, show_diff: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let report = Snipsync::new(&config, &root).check()?;
	print_warning_summary(&report);

	if report.is_clean() {
		println!("{}", colored!("Check passed", green));
		return Ok(());
	}

	eprintln!("Check failed.");
	eprintln!("  stale files: {}", report.changes.len());
	eprintln!("  stale regions: {}", report.region_count());
	eprintln!();
	for change in &report.changes {
		let rel = make_relative(&change.path, &root);
		eprintln!("{} {rel} is out of date", colored!("stale:", red));
		if show_diff {
			print_diff(&change.original, &change.updated);
			eprintln!();
		}
	}
	eprintln!();
	eprintln!("Run `snipsync run` to update.");
	process::exit(1);
}

fn print_changed_paths(report: &SyncReport, root: &Path) {
	for change in &report.changes {
		println!("  {}", make_relative(&change.path, root));
	}
}

fn print_warning_summary(report: &SyncReport) {
	if report.has_warnings() {
		eprintln!(
			"{} {} problem(s) reported; affected regions were left unchanged",
			colored!("warning:", yellow),
			report.diagnostics.len()
		);
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
