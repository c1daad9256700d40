use std::sync::LazyLock;

use regex::Regex;

/// Snippet extensions whose leading whitespace is significant and must never
/// be stripped.
pub const INDENT_SENSITIVE_EXTENSIONS: [&str; 4] = ["make", "mk", "Makefile", "diff"];

/// Lines made only of block terminators, e.g. `}`, `});`, `]`, `),` or `end`.
/// These usually sit one level left of the body they close.
static CLOSING_ONLY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(?:[\]\)\}]+[;,]?|end)$").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// Whether an extension is listed in [`INDENT_SENSITIVE_EXTENSIONS`].
pub fn is_indent_sensitive(extension: &str) -> bool {
	INDENT_SENSITIVE_EXTENSIONS.contains(&extension)
}

fn is_closing_only(line: &str) -> bool {
	CLOSING_ONLY.is_match(line.trim())
}

fn leading_whitespace(line: &str) -> &str {
	let end = line
		.find(|c: char| c != ' ' && c != '\t')
		.unwrap_or(line.len());
	&line[..end]
}

/// Compute the longest leading whitespace shared by the lines that define the
/// snippet's indentation.
///
/// Blank lines never count. Closing-only lines are skipped as long as at least
/// one other non-blank line remains. Tabs and spaces are compared character by
/// character, so a tab never matches a run of spaces.
pub fn common_indent_prefix(lines: &[String]) -> String {
	let non_blank: Vec<&str> = lines
		.iter()
		.map(String::as_str)
		.filter(|line| !line.trim().is_empty())
		.collect();

	let candidates: Vec<&str> = non_blank
		.iter()
		.copied()
		.filter(|line| !is_closing_only(line))
		.collect();
	let pool = if candidates.is_empty() {
		&non_blank
	} else {
		&candidates
	};

	let mut iter = pool.iter().map(|line| leading_whitespace(line));
	let Some(mut prefix) = iter.next() else {
		return String::new();
	};

	for other in iter {
		let shared = prefix
			.bytes()
			.zip(other.bytes())
			.take_while(|(a, b)| a == b)
			.count();
		prefix = &prefix[..shared];
		if prefix.is_empty() {
			break;
		}
	}

	prefix.to_string()
}

/// Remove the common leading whitespace from a snippet body while keeping the
/// relative indentation of nested lines.
///
/// Lines that do not start with the common prefix (for example a closing brace
/// that sits further left than the body) are returned unmodified. The result
/// is always a fresh vector.
pub fn dedent(lines: &[String]) -> Vec<String> {
	let prefix = common_indent_prefix(lines);
	if prefix.is_empty() {
		return lines.to_vec();
	}

	lines
		.iter()
		.map(|line| {
			line.strip_prefix(prefix.as_str())
				.map_or_else(|| line.clone(), ToString::to_string)
		})
		.collect()
}
