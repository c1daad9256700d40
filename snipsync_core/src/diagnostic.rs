use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::MarkerStyle;

/// The kind of non-fatal problem found while building the registry or
/// splicing a document. None of these stop a run; the affected region or
/// snippet is skipped and left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// A source `@@@SNIPSTART` had no `@@@SNIPEND` before the next open or the
	/// end of the file.
	MalformedSource { id: String },
	/// A target marker referenced a snippet id missing from the registry.
	UnknownSnippet { id: String },
	/// A target region was opened in one style and closed in another.
	StyleMismatch {
		id: String,
		open: MarkerStyle,
		close: MarkerStyle,
	},
	/// A target region was still open at the end of the document.
	UnterminatedRegion { id: String },
	/// A second opening marker appeared while a region was still open. The
	/// second marker is ignored.
	NestedOpen { id: String, pending: String },
	/// Marker options could not be parsed or applied.
	InvalidSelection { id: String, reason: String },
	/// A `filePath` override named a file that no origin provided.
	MissingFile { id: String, path: String },
	/// Reading or writing a file failed.
	Io { reason: String },
}

/// A non-fatal problem tied to a file and a 1-indexed line (0 when the
/// problem concerns the whole file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncDiagnostic {
	pub file: PathBuf,
	pub line: usize,
	pub kind: DiagnosticKind,
}

impl SyncDiagnostic {
	/// Create a diagnostic and emit it as a `tracing` warning.
	pub fn warn(file: &Path, line: usize, kind: DiagnosticKind) -> Self {
		let diagnostic = Self {
			file: file.to_path_buf(),
			line,
			kind,
		};
		tracing::warn!(
			file = %diagnostic.file.display(),
			line = diagnostic.line,
			"{}",
			diagnostic.message()
		);
		diagnostic
	}

	/// Human-readable message for this diagnostic.
	pub fn message(&self) -> String {
		match &self.kind {
			DiagnosticKind::MalformedSource { id } => {
				format!("snippet `{id}` has no closing `@@@SNIPEND` and was skipped")
			}
			DiagnosticKind::UnknownSnippet { id } => {
				format!("no snippet named `{id}` was found in any origin")
			}
			DiagnosticKind::StyleMismatch { id, open, close } => {
				format!(
					"snippet `{id}` was opened with a {open} marker but closed with a {close} \
					 marker; region left unchanged"
				)
			}
			DiagnosticKind::UnterminatedRegion { id } => {
				format!("snippet `{id}` has no closing marker; region left unchanged")
			}
			DiagnosticKind::NestedOpen { id, pending } => {
				format!("opening marker for `{id}` ignored while `{pending}` is still open")
			}
			DiagnosticKind::InvalidSelection { id, reason } => {
				format!("invalid options for snippet `{id}`: {reason}")
			}
			DiagnosticKind::MissingFile { id, path } => {
				format!("file `{path}` requested by snippet `{id}` was not found")
			}
			DiagnosticKind::Io { reason } => reason.clone(),
		}
	}
}
