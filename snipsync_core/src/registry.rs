use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::DiagnosticKind;
use crate::FilePath;
use crate::OriginIdentity;
use crate::Snippet;
use crate::SyncDiagnostic;
use crate::markers::is_source_close;
use crate::markers::is_source_delimiter;
use crate::markers::parse_source_open;

/// A readable local file handed to the registry builder by an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
	/// Where the file can be read on disk.
	pub path: PathBuf,
	/// The logical location used for source links.
	pub logical: FilePath,
	/// The repository that owns the file.
	pub origin: OriginIdentity,
}

impl SourceFile {
	/// The fence language for snippets from this file: the extension without
	/// its dot, or the whole file name for extensionless files like
	/// `Makefile`.
	pub fn extension(&self) -> String {
		let name = Path::new(&self.logical.name);
		name.extension()
			.and_then(|ext| ext.to_str())
			.unwrap_or(&self.logical.name)
			.to_string()
	}
}

/// All snippets discovered across every origin, keyed by id, plus a whole-file
/// entry for each scanned source file.
#[derive(Debug, Clone, Default)]
pub struct SnippetRegistry {
	snippets: HashMap<String, Snippet>,
	files: Vec<Snippet>,
}

impl SnippetRegistry {
	/// Insert a snippet. A snippet with the same id is replaced and returned;
	/// the most recently scanned definition wins.
	pub fn insert(&mut self, snippet: Snippet) -> Option<Snippet> {
		self.snippets.insert(snippet.id.clone(), snippet)
	}

	/// Register the full content of a source file for `filePath` lookups.
	pub fn insert_file(&mut self, file: Snippet) {
		self.files.push(file);
	}

	pub fn get(&self, id: &str) -> Option<&Snippet> {
		self.snippets.get(id)
	}

	pub fn len(&self) -> usize {
		self.snippets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snippets.is_empty()
	}

	/// Find a scanned file by its public path (checkout root removed). When
	/// `origin` is given, files from that repository are preferred.
	pub fn find_file(&self, origin: Option<&OriginIdentity>, path: &str) -> Option<&Snippet> {
		let path = path.trim_start_matches("./").trim_start_matches('/');
		let mut matches = self
			.files
			.iter()
			.rev()
			.filter(|file| file.file_path.public_path() == path);

		match origin {
			Some(origin) => {
				let candidates: Vec<&Snippet> = matches.collect();
				candidates
					.iter()
					.find(|file| file.origin.same_repository(origin))
					.or_else(|| candidates.first())
					.copied()
			}
			None => matches.next(),
		}
	}
}

/// Scan the content of one source file for delimited snippets.
///
/// Returns the snippets in file order, the whole-file entry, and a diagnostic
/// for every region that was opened but never closed.
pub fn scan_source(
	content: &str,
	source: &SourceFile,
) -> (Vec<Snippet>, Snippet, Vec<SyncDiagnostic>) {
	let extension = source.extension();
	let mut snippets = Vec::new();
	let mut diagnostics = Vec::new();
	let mut pending: Option<(Snippet, usize)> = None;
	let mut whole = Snippet::new(
		source.logical.public_path(),
		extension.as_str(),
		source.origin.clone(),
		source.logical.clone(),
	);

	for (index, line) in content.lines().enumerate() {
		if !is_source_delimiter(line) {
			whole.lines.push(line.to_string());
		}

		if let Some(id) = parse_source_open(line) {
			if let Some((unclosed, open_line)) = pending.take() {
				diagnostics.push(SyncDiagnostic::warn(
					&source.path,
					open_line,
					DiagnosticKind::MalformedSource { id: unclosed.id },
				));
			}

			if id.is_empty() {
				diagnostics.push(SyncDiagnostic::warn(
					&source.path,
					index + 1,
					DiagnosticKind::MalformedSource { id },
				));
				continue;
			}

			let snippet = Snippet::new(
				id,
				extension.as_str(),
				source.origin.clone(),
				source.logical.clone(),
			);
			pending = Some((snippet, index + 1));
			continue;
		}

		if is_source_close(line) {
			if let Some((snippet, _)) = pending.take() {
				snippets.push(snippet);
			}
			continue;
		}

		if let Some((snippet, _)) = &mut pending {
			snippet.lines.push(line.to_string());
		}
	}

	if let Some((unclosed, open_line)) = pending {
		diagnostics.push(SyncDiagnostic::warn(
			&source.path,
			open_line,
			DiagnosticKind::MalformedSource { id: unclosed.id },
		));
	}

	(snippets, whole, diagnostics)
}

/// Build the snippet registry from every source file.
///
/// Files are scanned in the given order and later definitions of an id
/// replace earlier ones. Unreadable files are reported and skipped. Source
/// files are never written.
pub fn build_registry(sources: &[SourceFile]) -> (SnippetRegistry, Vec<SyncDiagnostic>) {
	let mut registry = SnippetRegistry::default();
	let mut diagnostics = Vec::new();

	for source in sources {
		let content = match std::fs::read_to_string(&source.path) {
			Ok(content) => content,
			Err(e) => {
				diagnostics.push(SyncDiagnostic::warn(
					&source.path,
					0,
					DiagnosticKind::Io {
						reason: format!("failed to read source file: {e}"),
					},
				));
				continue;
			}
		};

		let (snippets, whole, file_diagnostics) = scan_source(&content, source);
		tracing::debug!(
			file = %source.path.display(),
			snippets = snippets.len(),
			"scanned source file"
		);

		for snippet in snippets {
			if let Some(previous) = registry.insert(snippet) {
				tracing::debug!(id = %previous.id, "snippet redefined by a later source file");
			}
		}
		registry.insert_file(whole);
		diagnostics.extend(file_diagnostics);
	}

	(registry, diagnostics)
}
