use serde::Deserialize;
use serde::Serialize;

use crate::Selection;
use crate::Snippet;
use crate::dedent::dedent;
use crate::dedent::is_indent_sensitive;

/// Markdown fence used around rendered snippets.
pub const CODE_FENCE: &str = "```";

/// Global rendering switches shared by every target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
	/// Prepend a `[path](url)` link to the snippet's source.
	pub enable_source_link: bool,
	/// Wrap the snippet in a fenced code block tagged with its extension.
	pub enable_code_block: bool,
	/// Strip the indentation shared by every line of the snippet.
	pub enable_code_dedenting: bool,
	/// Target extensions eligible for rewriting. Empty allows every file.
	pub allowed_target_extensions: Vec<String>,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			enable_source_link: true,
			enable_code_block: true,
			enable_code_dedenting: false,
			allowed_target_extensions: Vec::new(),
		}
	}
}

impl RenderOptions {
	/// Whether a target file with this extension (without the dot) may be
	/// rewritten. Configured extensions may be written with or without a
	/// leading dot.
	pub fn allows_extension(&self, extension: Option<&str>) -> bool {
		if self.allowed_target_extensions.is_empty() {
			return true;
		}

		let Some(extension) = extension else {
			return false;
		};

		self.allowed_target_extensions
			.iter()
			.any(|allowed| allowed.trim_start_matches('.') == extension)
	}
}

/// The opening fence for a snippet, e.g. `` ```go `` or `` ```go {1-3} ``.
pub fn opening_fence(extension: &str, highlights: Option<&str>) -> String {
	match highlights.map(str::trim).filter(|h| !h.is_empty()) {
		Some(highlights) => format!("{CODE_FENCE}{extension} {{{highlights}}}"),
		None => format!("{CODE_FENCE}{extension}"),
	}
}

/// Produce the exact lines to place between a pair of target markers.
///
/// Steps run in order: dedent, fence, then the source link above the fence.
/// The snippet itself is not modified.
pub fn render(snippet: &Snippet, selection: &Selection, options: &RenderOptions) -> Vec<String> {
	let mut lines = if options.enable_code_dedenting && !is_indent_sensitive(&snippet.extension) {
		dedent(&selection.lines)
	} else {
		selection.lines.clone()
	};

	if options.enable_code_block {
		lines.insert(
			0,
			opening_fence(&snippet.extension, selection.highlights.as_deref()),
		);
		lines.push(CODE_FENCE.to_string());
	}

	if options.enable_source_link {
		lines.insert(0, snippet.source_link());
	}

	lines
}
