use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::SnipsyncError;
use crate::SnipsyncResult;

/// Per-marker options controlling which part of a snippet is rendered.
///
/// Written as a JSON object after the id in an opening marker:
///
/// ```md
/// <!--SNIPSTART workflow {"selectedLines": ["1-3", "7"], "highlightedLines": "2"}-->
/// <!--SNIPEND-->
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSpec {
	/// Inclusive 1-indexed line ranges to keep, in the order listed.
	#[serde(default)]
	pub selected_lines: Vec<LineRange>,
	/// The first line matching this pattern starts the kept slice.
	#[serde(default)]
	pub start_pattern: Option<String>,
	/// The first line after the start that matches this pattern ends the
	/// kept slice and is itself excluded.
	#[serde(default)]
	pub end_pattern: Option<String>,
	/// Lines to highlight, counted within the selected body, e.g. `"1,3-4"`.
	#[serde(default)]
	pub highlighted_lines: Option<String>,
	/// Render this whole file from the snippet's repository instead of the
	/// delimited region.
	#[serde(default)]
	pub file_path: Option<String>,
}

impl SelectionSpec {
	/// Parse the raw option text that follows the id in an opening marker.
	pub fn parse(raw: &str) -> SnipsyncResult<Self> {
		serde_json::from_str(raw).map_err(|e| {
			SnipsyncError::InvalidMarkerConfig {
				raw: raw.to_string(),
				reason: e.to_string(),
			}
		})
	}
}

/// An inclusive, 1-indexed range of lines written as `"N"` or `"N-M"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeValue", into = "String")]
pub struct LineRange {
	pub start: usize,
	pub end: usize,
}

impl LineRange {
	pub fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}
}

impl FromStr for LineRange {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let parse = |text: &str| {
			text.trim()
				.parse::<usize>()
				.map_err(|_| format!("invalid line number `{}` in range `{value}`", text.trim()))
		};

		let range = match value.split_once('-') {
			Some((start, end)) => Self::new(parse(start)?, parse(end)?),
			None => {
				let line = parse(value)?;
				Self::new(line, line)
			}
		};

		if range.start > range.end {
			return Err(format!("line range `{value}` ends before it starts"));
		}

		Ok(range)
	}
}

impl From<LineRange> for String {
	fn from(range: LineRange) -> Self {
		if range.start == range.end {
			range.start.to_string()
		} else {
			format!("{}-{}", range.start, range.end)
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeValue {
	Number(usize),
	Text(String),
}

impl TryFrom<RangeValue> for LineRange {
	type Error = String;

	fn try_from(value: RangeValue) -> Result<Self, Self::Error> {
		match value {
			RangeValue::Number(line) => Ok(Self::new(line, line)),
			RangeValue::Text(text) => text.parse(),
		}
	}
}

/// The lines picked out of a snippet together with the highlight metadata
/// that travels with them to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
	pub lines: Vec<String>,
	pub highlights: Option<String>,
}

impl Selection {
	/// Select every line unchanged.
	pub fn all(lines: &[String]) -> Self {
		Self {
			lines: lines.to_vec(),
			highlights: None,
		}
	}
}

fn compile(pattern: &str) -> SnipsyncResult<Regex> {
	Regex::new(pattern).map_err(|e| {
		SnipsyncError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		}
	})
}

/// Keep the lines covered by `ranges`, clamping each range to the body.
pub fn select_ranges(lines: &[String], ranges: &[LineRange]) -> Vec<String> {
	let mut selected = Vec::new();

	for range in ranges {
		let start = range.start.max(1);
		let end = range.end.min(lines.len());
		if start > end {
			continue;
		}
		selected.extend_from_slice(&lines[start - 1..end]);
	}

	selected
}

/// Slice `lines` from the first line matching `start` up to, but not
/// including, the first later line matching `end`.
///
/// When `start` never matches the lines are returned unchanged. When `end` is
/// missing or never matches the slice runs to the end of the body.
pub fn slice_by_patterns(lines: &[String], start: &Regex, end: Option<&Regex>) -> Vec<String> {
	let Some(first) = lines.iter().position(|line| start.is_match(line)) else {
		return lines.to_vec();
	};

	let last = end
		.and_then(|end| {
			lines[first + 1..]
				.iter()
				.position(|line| end.is_match(line))
				.map(|offset| first + 1 + offset)
		})
		.unwrap_or(lines.len());

	lines[first..last].to_vec()
}

/// Apply a [`SelectionSpec`] to a snippet body.
///
/// Line ranges are applied first, against the original body. Pattern slicing
/// then runs on the range-limited lines. Highlights are passed through.
pub fn select(lines: &[String], spec: &SelectionSpec) -> SnipsyncResult<Selection> {
	let mut selected = if spec.selected_lines.is_empty() {
		lines.to_vec()
	} else {
		select_ranges(lines, &spec.selected_lines)
	};

	if let Some(start) = &spec.start_pattern {
		let start = compile(start)?;
		let end = spec.end_pattern.as_deref().map(compile).transpose()?;
		selected = slice_by_patterns(&selected, &start, end.as_ref());
	}

	Ok(Selection {
		lines: selected,
		highlights: spec.highlighted_lines.clone(),
	})
}
