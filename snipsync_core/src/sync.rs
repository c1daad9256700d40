use std::path::Path;
use std::path::PathBuf;

use crate::DiagnosticKind;
use crate::RenderOptions;
use crate::SnipsyncConfig;
use crate::SnipsyncResult;
use crate::SnippetRegistry;
use crate::SyncDiagnostic;
use crate::origin::GitFetcher;
use crate::origin::OriginFetcher;
use crate::origin::cleanup_extraction;
use crate::origin::collect_sources;
use crate::origin::collect_targets;
use crate::registry::build_registry;
use crate::splice::SpliceMode;
use crate::splice::splice_document;

/// A target document whose content changed (or would change).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
	pub path: PathBuf,
	/// Content read from disk.
	pub original: String,
	/// Content after splicing.
	pub updated: String,
	/// Number of regions that changed.
	pub regions: usize,
}

/// Summary of a `run`, `clear`, or `check`.
#[derive(Debug, Default)]
pub struct SyncReport {
	/// Documents that changed. For `check` nothing is written.
	pub changes: Vec<FileChange>,
	/// Every non-fatal problem found along the way.
	pub diagnostics: Vec<SyncDiagnostic>,
	/// Number of snippet ids in the registry.
	pub snippet_count: usize,
	/// Number of target documents considered, after extension filtering.
	pub target_count: usize,
}

impl SyncReport {
	/// Total regions changed across all documents.
	pub fn region_count(&self) -> usize {
		self.changes.iter().map(|change| change.regions).sum()
	}

	/// Returns true when no document changed.
	pub fn is_clean(&self) -> bool {
		self.changes.is_empty()
	}

	/// Returns true when any problem was reported.
	pub fn has_warnings(&self) -> bool {
		!self.diagnostics.is_empty()
	}
}

/// Synchronizes snippets from configured origins into target documents.
///
/// The registry is built completely before any target is touched, and each
/// target is read, spliced in memory, and written with a single write only
/// when its content changed.
pub struct Snipsync<'a> {
	config: &'a SnipsyncConfig,
	root: PathBuf,
	fetcher: Box<dyn OriginFetcher + 'a>,
}

impl<'a> Snipsync<'a> {
	/// Create a sync for the project at `root` using [`GitFetcher`] for remote
	/// origins.
	pub fn new(config: &'a SnipsyncConfig, root: impl Into<PathBuf>) -> Self {
		Self {
			config,
			root: root.into(),
			fetcher: Box::new(GitFetcher),
		}
	}

	/// Replace the fetcher used for remote origins.
	#[must_use]
	pub fn with_fetcher(mut self, fetcher: impl OriginFetcher + 'a) -> Self {
		self.fetcher = Box::new(fetcher);
		self
	}

	/// Splice every snippet into every eligible target and write the changed
	/// documents.
	pub fn run(&self) -> SnipsyncResult<SyncReport> {
		self.process(SpliceMode::Run, true)
	}

	/// Erase the content of every resolvable region, leaving the markers in
	/// place.
	pub fn clear(&self) -> SnipsyncResult<SyncReport> {
		self.process(SpliceMode::Clear, true)
	}

	/// Compute what [`Snipsync::run`] would change without writing anything.
	pub fn check(&self) -> SnipsyncResult<SyncReport> {
		self.process(SpliceMode::Run, false)
	}

	/// Fetch origins and build the registry. The extraction directory is
	/// removed once every source has been read.
	pub fn build_registry(&self) -> SnipsyncResult<(SnippetRegistry, Vec<SyncDiagnostic>)> {
		let collected = collect_sources(&self.root, self.config, self.fetcher.as_ref());
		let built = collected.map(|(sources, mut diagnostics)| {
			let (registry, scan_diagnostics) = build_registry(&sources);
			diagnostics.extend(scan_diagnostics);
			(registry, diagnostics)
		});
		cleanup_extraction(&self.root)?;
		built
	}

	fn process(&self, mode: SpliceMode, write: bool) -> SnipsyncResult<SyncReport> {
		let options = self.config.render_options();
		let (registry, mut diagnostics) = self.build_registry()?;
		if registry.is_empty() {
			tracing::warn!("no snippets were found in any origin");
		}
		let (targets, target_diagnostics) = collect_targets(&self.root, self.config);
		diagnostics.extend(target_diagnostics);

		let mut report = SyncReport {
			snippet_count: registry.len(),
			..SyncReport::default()
		};

		for target in targets {
			if !is_eligible(&target, &options) {
				tracing::debug!(
					file = %target.display(),
					"skipping target with disallowed extension"
				);
				continue;
			}

			let original = match std::fs::read_to_string(&target) {
				Ok(content) => content,
				Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
					tracing::debug!(file = %target.display(), "skipping non UTF-8 target");
					continue;
				}
				Err(e) => {
					diagnostics.push(SyncDiagnostic::warn(
						&target,
						0,
						DiagnosticKind::Io {
							reason: format!("failed to read target: {e}"),
						},
					));
					continue;
				}
			};
			report.target_count += 1;

			let outcome = splice_document(&original, &registry, &options, mode, &target);
			diagnostics.extend(outcome.diagnostics);
			if outcome.changed_regions == 0 || outcome.content == original {
				continue;
			}

			if write {
				if let Err(e) = write_atomic(&target, &outcome.content) {
					diagnostics.push(SyncDiagnostic::warn(
						&target,
						0,
						DiagnosticKind::Io {
							reason: format!("failed to write target: {e}"),
						},
					));
					continue;
				}
				tracing::debug!(
					file = %target.display(),
					regions = outcome.changed_regions,
					"wrote target"
				);
			}

			report.changes.push(FileChange {
				path: target,
				original,
				updated: outcome.content,
				regions: outcome.changed_regions,
			});
		}

		tracing::info!(
			snippets = report.snippet_count,
			targets = report.target_count,
			changed = report.changes.len(),
			"sync finished"
		);
		report.diagnostics = diagnostics;
		Ok(report)
	}
}

fn is_eligible(target: &Path, options: &RenderOptions) -> bool {
	options.allows_extension(target.extension().and_then(|ext| ext.to_str()))
}

/// Write `content` to `path` in one step by writing a sibling temporary file
/// and renaming it over the destination.
///
/// A symbolic link is resolved first so the link itself survives, and the
/// permissions of an existing file carry over to the new content.
pub fn write_atomic(path: &Path, content: &str) -> SnipsyncResult<()> {
	let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
	let file_name = target
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default();
	let temp_path =
		target.with_file_name(format!(".{file_name}.snipsync-{}.tmp", std::process::id()));

	let result = std::fs::write(&temp_path, content)
		.and_then(|()| match std::fs::metadata(&target) {
			Ok(metadata) => std::fs::set_permissions(&temp_path, metadata.permissions()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e),
		})
		.and_then(|()| std::fs::rename(&temp_path, &target));

	if let Err(e) = result {
		let _ = std::fs::remove_file(&temp_path);
		return Err(e.into());
	}

	Ok(())
}
