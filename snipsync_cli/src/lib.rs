use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Keep code snippets in your documentation in sync with their source.",
	long_about = "snipsync extracts regions of code delimited by `@@@SNIPSTART id` and \
	              `@@@SNIPEND` comments from the configured origins and splices them into \
	              every matching `<!--SNIPSTART id-->` / `<!--SNIPEND-->` (or `{/* SNIPSTART id \
	              */}` / `{/* SNIPEND */}`) marker pair in your documentation.\n\nQuick \
	              start:\n  snipsync run    Splice snippets into all targets\n  snipsync clear  \
	              Erase spliced snippets, keeping the markers\n  snipsync check  Verify every \
	              target is up to date"
)]
pub struct SnipsyncCli {
	/// Defaults to `run` when omitted.
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Splice the latest snippets into every target document.
	///
	/// Fetches every origin listed in `snipsync.config.yaml`, collects the
	/// snippets they define, and replaces the content between each pair of
	/// target markers with the rendered snippet. Only documents whose content
	/// changes are written.
	Run {
		/// Preview changes without writing files. Prints which files would
		/// be modified.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Erase the content of every snippet region, leaving the markers.
	Clear,
	/// Check that every target document is up to date.
	///
	/// Computes what `run` would write and exits with a non-zero status code
	/// if any document would change. Nothing is written.
	Check {
		/// Show a unified diff for each stale document.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}
