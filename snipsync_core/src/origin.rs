use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use globset::GlobBuilder;
use globset::GlobMatcher;
use ignore::WalkBuilder;

use crate::DiagnosticKind;
use crate::FilePath;
use crate::SnipsyncError;
use crate::SnipsyncResult;
use crate::SourceFile;
use crate::SyncDiagnostic;
use crate::config::EXTRACTION_DIR;
use crate::config::FilesOrigin;
use crate::config::OriginConfig;
use crate::config::RemoteOrigin;
use crate::config::SnipsyncConfig;

/// Acquires a working copy of a remote origin.
///
/// The registry builder only ever sees local files; implementations decide
/// how a repository gets onto disk.
pub trait OriginFetcher {
	/// Place a checkout of `remote` at `dest`. `dest` does not exist when this
	/// is called.
	fn fetch(&self, remote: &RemoteOrigin, dest: &Path) -> SnipsyncResult<()>;
}

/// Fetches origins with a shallow `git clone` from GitHub.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitFetcher;

impl OriginFetcher for GitFetcher {
	fn fetch(&self, remote: &RemoteOrigin, dest: &Path) -> SnipsyncResult<()> {
		let url = format!("https://github.com/{}/{}", remote.owner, remote.repo);
		let mut command = Command::new("git");
		command.arg("clone").arg("--depth").arg("1");
		if let Some(r#ref) = remote.r#ref.as_deref().filter(|r| !r.is_empty()) {
			command.arg("--branch").arg(r#ref);
		}
		let output = command.arg(&url).arg(dest).output()?;

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
			let reason = if stderr.is_empty() {
				format!(
					"git exited with status {}",
					output
						.status
						.code()
						.map_or_else(|| "unknown".to_string(), |code| code.to_string())
				)
			} else {
				stderr
			};

			return Err(SnipsyncError::OriginFetch {
				owner: remote.owner.clone(),
				repo: remote.repo.clone(),
				reason,
			});
		}

		Ok(())
	}
}

/// Check if a file can hold snippets.
pub fn is_source_file(path: &Path) -> bool {
	if path.file_name().and_then(|n| n.to_str()) == Some("Makefile") {
		return true;
	}

	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	matches!(
		ext,
		"ts" | "tsx"
			| "js" | "jsx"
			| "mjs" | "go"
			| "py" | "rs"
			| "java" | "kt"
			| "swift" | "c"
			| "cpp" | "h"
			| "cs" | "php"
			| "rb" | "md"
			| "mdx" | "yaml"
			| "yml" | "toml"
			| "json" | "sh"
			| "make" | "mk"
			| "diff"
	)
}

/// Join the normal components of a relative path with `/`.
fn slash_path(path: &Path) -> String {
	path.components()
		.filter_map(|component| {
			match component {
				Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
				_ => None,
			}
		})
		.collect::<Vec<_>>()
		.join("/")
}

/// Build the logical path of `file` relative to `base`, with `checkout` as
/// the leading segment that gets stripped from public links.
fn logical_path(checkout: &str, base: &Path, file: &Path) -> FilePath {
	let relative = file.strip_prefix(base).unwrap_or(file);
	let name = relative
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_default();
	let parent = relative.parent().map(slash_path).unwrap_or_default();
	let directory = if parent.is_empty() {
		checkout.to_string()
	} else {
		format!("{checkout}/{parent}")
	};

	FilePath::new(directory, name)
}

/// The directory part of a glob before its first wildcard.
fn literal_base(pattern: &str) -> PathBuf {
	let mut base = PathBuf::new();
	let components: Vec<&str> = pattern.split('/').collect();
	let Some((_, directories)) = components.split_last() else {
		return base;
	};

	for part in directories {
		if part.contains(['*', '?', '[', '{']) {
			break;
		}
		if part.is_empty() && base.as_os_str().is_empty() {
			base.push("/");
			continue;
		}
		base.push(part);
	}

	base
}

fn build_matcher(pattern: &str) -> SnipsyncResult<GlobMatcher> {
	GlobBuilder::new(pattern)
		.literal_separator(true)
		.build()
		.map(|glob| glob.compile_matcher())
		.map_err(|e| {
			SnipsyncError::InvalidGlob {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})
}

/// Source files found for an origin, plus the walk errors that were skipped.
pub type CollectedSources = (Vec<SourceFile>, Vec<SyncDiagnostic>);

fn walk_error(base: &Path, error: &ignore::Error) -> SyncDiagnostic {
	SyncDiagnostic::warn(
		base,
		0,
		DiagnosticKind::Io {
			reason: format!("failed to read source entry: {error}"),
		},
	)
}

/// Resolve a local `files` origin into source files.
///
/// Symbolic links are followed. Entries that cannot be read are reported and
/// skipped.
pub fn collect_local_sources(
	root: &Path,
	files: &FilesOrigin,
) -> SnipsyncResult<CollectedSources> {
	let pattern = files.pattern.trim_start_matches("./");
	let absolute = Path::new(pattern).is_absolute();
	let matcher = build_matcher(pattern)?;
	let base = root.join(literal_base(pattern));
	let origin = files.identity();
	let mut sources = Vec::new();
	let mut diagnostics = Vec::new();

	if !base.exists() {
		tracing::warn!(pattern = %files.pattern, "file pattern matched no directory");
		return Ok((sources, diagnostics));
	}

	let walker = WalkBuilder::new(&base)
		.hidden(true)
		.git_ignore(false)
		.follow_links(true)
		.filter_entry(|entry| entry.file_name() != EXTRACTION_DIR)
		.build();

	for entry in walker {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) => {
				diagnostics.push(walk_error(&base, &e));
				continue;
			}
		};
		let path = entry.path();
		if !path.is_file() {
			continue;
		}

		let candidate = if absolute {
			path.to_path_buf()
		} else {
			path.strip_prefix(root).unwrap_or(path).to_path_buf()
		};
		if !matcher.is_match(&candidate) {
			continue;
		}

		let anchor = if path.starts_with(root) {
			root
		} else {
			base.as_path()
		};
		sources.push(SourceFile {
			path: path.to_path_buf(),
			logical: logical_path(".", anchor, path),
			origin: origin.clone(),
		});
	}

	sources.sort_by(|a, b| a.path.cmp(&b.path));
	Ok((sources, diagnostics))
}

/// Fetch a remote origin into the extraction directory and list its source
/// files. The checkout directory name becomes the stripped leading segment
/// of each logical path.
pub fn collect_remote_sources(
	root: &Path,
	remote: &RemoteOrigin,
	fetcher: &dyn OriginFetcher,
) -> SnipsyncResult<CollectedSources> {
	let extraction = root.join(EXTRACTION_DIR);
	let checkout = format!("{}-{}", remote.owner, remote.repo);
	let dest = extraction.join(&checkout);

	if dest.exists() {
		std::fs::remove_dir_all(&dest)?;
	}
	std::fs::create_dir_all(&extraction)?;
	fetcher.fetch(remote, &dest)?;

	let origin = remote.identity();
	let mut sources = Vec::new();
	let mut diagnostics = Vec::new();

	for entry in WalkBuilder::new(&dest).hidden(true).build() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) => {
				diagnostics.push(walk_error(&dest, &e));
				continue;
			}
		};
		let path = entry.path();
		if !path.is_file() || !is_source_file(path) {
			continue;
		}

		sources.push(SourceFile {
			path: path.to_path_buf(),
			logical: logical_path(&checkout, &dest, path),
			origin: origin.clone(),
		});
	}

	sources.sort_by(|a, b| a.path.cmp(&b.path));
	tracing::debug!(
		owner = %remote.owner,
		repo = %remote.repo,
		files = sources.len(),
		"fetched origin"
	);
	Ok((sources, diagnostics))
}

/// Resolve every configured origin into source files, in configuration order
/// so later origins win snippet id collisions.
pub fn collect_sources(
	root: &Path,
	config: &SnipsyncConfig,
	fetcher: &dyn OriginFetcher,
) -> SnipsyncResult<CollectedSources> {
	let mut sources = Vec::new();
	let mut diagnostics = Vec::new();

	for origin in &config.origins {
		let (found, skipped) = match origin {
			OriginConfig::Files { files } => collect_local_sources(root, files)?,
			OriginConfig::Remote(remote) => collect_remote_sources(root, remote, fetcher)?,
		};
		sources.extend(found);
		diagnostics.extend(skipped);
	}

	Ok((sources, diagnostics))
}

/// Remove the extraction directory left behind by remote origins.
pub fn cleanup_extraction(root: &Path) -> SnipsyncResult<()> {
	let extraction = root.join(EXTRACTION_DIR);
	if extraction.exists() {
		std::fs::remove_dir_all(extraction)?;
	}
	Ok(())
}

/// Expand configured targets into the list of documents to process.
///
/// A target may be a file or a directory; directories are walked respecting
/// `.gitignore` and skipping hidden entries and the extraction directory.
/// Missing targets are reported and skipped.
pub fn collect_targets(
	root: &Path,
	config: &SnipsyncConfig,
) -> (Vec<PathBuf>, Vec<SyncDiagnostic>) {
	let mut targets = Vec::new();
	let mut diagnostics = Vec::new();

	for target in &config.targets {
		let path = root.join(target);
		if path.is_file() {
			targets.push(path);
			continue;
		}

		if !path.is_dir() {
			diagnostics.push(SyncDiagnostic::warn(
				&path,
				0,
				DiagnosticKind::Io {
					reason: "target path does not exist".to_string(),
				},
			));
			continue;
		}

		let walker = WalkBuilder::new(&path)
			.hidden(true)
			.filter_entry(|entry| {
				entry.file_name() != EXTRACTION_DIR && entry.file_name() != "node_modules"
			})
			.build();

		for entry in walker {
			match entry {
				Ok(entry) if entry.path().is_file() => targets.push(entry.into_path()),
				Ok(_) => {}
				Err(e) => {
					diagnostics.push(SyncDiagnostic::warn(
						&path,
						0,
						DiagnosticKind::Io {
							reason: e.to_string(),
						},
					));
				}
			}
		}
	}

	targets.sort();
	targets.dedup();
	(targets, diagnostics)
}
