use std::path::Path;

use crate::DiagnosticKind;
use crate::MarkerStyle;
use crate::RenderOptions;
use crate::SelectionSpec;
use crate::Snippet;
use crate::SnippetRegistry;
use crate::SyncDiagnostic;
use crate::markers::MarkerLine;
use crate::markers::classify_line;
use crate::render::render;
use crate::selection::select;

/// Whether a splice writes rendered snippets or erases them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceMode {
	/// Replace region content with the rendered snippet.
	Run,
	/// Remove all region content, leaving the two markers adjacent.
	Clear,
}

/// An opening marker found in a target document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMarker {
	/// 0-indexed line of the marker.
	pub line: usize,
	pub style: MarkerStyle,
	pub id: String,
	/// Raw option text after the id, if any.
	pub options: Option<String>,
}

/// A valid open/close pair of the same style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
	pub open: OpenMarker,
	/// 0-indexed line of the closing marker. Always greater than
	/// `open.line`.
	pub close_line: usize,
}

/// What the marker scanner found, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerEvent {
	/// A region that may be spliced.
	Pair(MarkerPair),
	/// A region closed with a marker of a different style. It is never
	/// modified.
	Mismatch {
		open: OpenMarker,
		close_line: usize,
		close_style: MarkerStyle,
	},
	/// An opening marker seen while another region was still open. The
	/// pending region is unaffected.
	NestedOpen {
		pending: String,
		line: usize,
		id: String,
	},
	/// A region still open at the end of the document.
	Unterminated(OpenMarker),
}

enum ScanState {
	SearchingOpen,
	SearchingClose(OpenMarker),
}

/// Pair up the markers in a document.
///
/// Regions do not nest. A closing marker of the wrong style ends the pending
/// region as a mismatch and scanning resumes on the next line. Closing
/// markers with no pending region are ignored.
pub fn scan_markers<S: AsRef<str>>(lines: &[S]) -> Vec<MarkerEvent> {
	let mut events = Vec::new();
	let mut state = ScanState::SearchingOpen;

	for (index, line) in lines.iter().enumerate() {
		let marker = classify_line(line.as_ref());

		state = match (state, marker) {
			(ScanState::SearchingOpen, MarkerLine::Open { style, id, options }) => {
				ScanState::SearchingClose(OpenMarker {
					line: index,
					style,
					id,
					options,
				})
			}
			(ScanState::SearchingOpen, _) => ScanState::SearchingOpen,
			(ScanState::SearchingClose(open), MarkerLine::Close { style }) => {
				if style == open.style {
					events.push(MarkerEvent::Pair(MarkerPair {
						open,
						close_line: index,
					}));
				} else {
					events.push(MarkerEvent::Mismatch {
						open,
						close_line: index,
						close_style: style,
					});
				}
				ScanState::SearchingOpen
			}
			(ScanState::SearchingClose(open), MarkerLine::Open { id, .. }) => {
				events.push(MarkerEvent::NestedOpen {
					pending: open.id.clone(),
					line: index,
					id,
				});
				ScanState::SearchingClose(open)
			}
			(state @ ScanState::SearchingClose(_), MarkerLine::Text) => state,
		};
	}

	if let ScanState::SearchingClose(open) = state {
		events.push(MarkerEvent::Unterminated(open));
	}

	events
}

/// The result of splicing one document in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceOutcome {
	/// The new document content. Identical to the input when nothing changed.
	pub content: String,
	/// Number of regions whose content changed.
	pub changed_regions: usize,
	pub diagnostics: Vec<SyncDiagnostic>,
}

impl SpliceOutcome {
	pub fn is_changed(&self) -> bool {
		self.changed_regions > 0
	}
}

/// Resolve the snippet and options for a marker. A `filePath` option swaps
/// the snippet for the whole named file from the same repository.
fn resolve<'a>(
	open: &OpenMarker,
	registry: &'a SnippetRegistry,
) -> Result<(&'a Snippet, SelectionSpec), DiagnosticKind> {
	let spec = match open.options.as_deref() {
		Some(raw) => {
			SelectionSpec::parse(raw).map_err(|e| {
				DiagnosticKind::InvalidSelection {
					id: open.id.clone(),
					reason: e.to_string(),
				}
			})?
		}
		None => SelectionSpec::default(),
	};

	let snippet = registry.get(&open.id);

	if let Some(path) = spec.file_path.as_deref() {
		let file = registry
			.find_file(snippet.map(|s| &s.origin), path)
			.ok_or_else(|| {
				DiagnosticKind::MissingFile {
					id: open.id.clone(),
					path: path.to_string(),
				}
			})?;
		return Ok((file, spec));
	}

	let snippet = snippet.ok_or_else(|| DiagnosticKind::UnknownSnippet { id: open.id.clone() })?;
	Ok((snippet, spec))
}

fn replacement_for(
	open: &OpenMarker,
	registry: &SnippetRegistry,
	options: &RenderOptions,
	mode: SpliceMode,
) -> Result<Vec<String>, DiagnosticKind> {
	let (snippet, spec) = resolve(open, registry)?;

	match mode {
		SpliceMode::Clear => Ok(Vec::new()),
		SpliceMode::Run => {
			let selection = select(&snippet.lines, &spec).map_err(|e| {
				DiagnosticKind::InvalidSelection {
					id: open.id.clone(),
					reason: e.to_string(),
				}
			})?;
			Ok(render(snippet, &selection, options))
		}
	}
}

/// A document line without its `\n` or `\r\n` terminator.
fn strip_line_ending(line: &str) -> &str {
	let line = line.strip_suffix('\n').unwrap_or(line);
	line.strip_suffix('\r').unwrap_or(line)
}

/// Splice or clear every valid marker pair in a document.
///
/// Only the lines strictly between a valid pair's markers are replaced.
/// Mismatched, unterminated, and unresolved regions are left byte for byte
/// unchanged and reported. Text outside the regions is copied verbatim,
/// including its line endings. Inserted lines use the line ending of their
/// opening marker.
pub fn splice_document(
	content: &str,
	registry: &SnippetRegistry,
	options: &RenderOptions,
	mode: SpliceMode,
	file: &Path,
) -> SpliceOutcome {
	let raw: Vec<&str> = content.split_inclusive('\n').collect();
	let lines: Vec<&str> = raw.iter().map(|line| strip_line_ending(line)).collect();
	let mut output = String::with_capacity(content.len());
	let mut diagnostics = Vec::new();
	let mut changed_regions = 0;
	let mut cursor = 0;

	for event in scan_markers(&lines) {
		let pair = match event {
			MarkerEvent::Pair(pair) => pair,
			MarkerEvent::Mismatch {
				open,
				close_line,
				close_style,
			} => {
				diagnostics.push(SyncDiagnostic::warn(
					file,
					close_line + 1,
					DiagnosticKind::StyleMismatch {
						id: open.id,
						open: open.style,
						close: close_style,
					},
				));
				continue;
			}
			MarkerEvent::NestedOpen { pending, line, id } => {
				diagnostics.push(SyncDiagnostic::warn(
					file,
					line + 1,
					DiagnosticKind::NestedOpen { id, pending },
				));
				continue;
			}
			MarkerEvent::Unterminated(open) => {
				diagnostics.push(SyncDiagnostic::warn(
					file,
					open.line + 1,
					DiagnosticKind::UnterminatedRegion { id: open.id },
				));
				continue;
			}
		};

		let inner = &lines[pair.open.line + 1..pair.close_line];
		let replacement = match replacement_for(&pair.open, registry, options, mode) {
			Ok(replacement) => replacement,
			Err(kind) => {
				diagnostics.push(SyncDiagnostic::warn(file, pair.open.line + 1, kind));
				continue;
			}
		};

		if replacement.iter().map(String::as_str).eq(inner.iter().copied()) {
			continue;
		}

		let open_line = raw[pair.open.line];
		let newline = if open_line.ends_with("\r\n") { "\r\n" } else { "\n" };
		output.extend(raw[cursor..=pair.open.line].iter().copied());
		for line in &replacement {
			output.push_str(line);
			output.push_str(newline);
		}
		cursor = pair.close_line;
		changed_regions += 1;
	}

	if changed_regions == 0 {
		return SpliceOutcome {
			content: content.to_string(),
			changed_regions,
			diagnostics,
		};
	}

	output.extend(raw[cursor..].iter().copied());

	SpliceOutcome {
		content: output,
		changed_regions,
		diagnostics,
	}
}
