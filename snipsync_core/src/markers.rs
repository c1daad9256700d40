use serde::Deserialize;
use serde::Serialize;

/// Token that opens a snippet region inside a source file. The token is
/// matched anywhere on the line so it can live inside any comment syntax.
pub const SOURCE_OPEN_TOKEN: &str = "@@@SNIPSTART";

/// Token that closes a snippet region inside a source file.
pub const SOURCE_CLOSE_TOKEN: &str = "@@@SNIPEND";

/// The comment syntaxes recognized for markers in target documents.
///
/// A region opened in one style can only be closed by the closing marker of
/// the same style:
///
/// ```md
/// <!--SNIPSTART my-snippet -->
/// <!--SNIPEND-->
///
/// {/* SNIPSTART my-snippet */}
/// {/* SNIPEND */}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MarkerStyle {
	/// `<!--SNIPSTART id -->` / `<!--SNIPEND-->`
	Html,
	/// `{/* SNIPSTART id */}` / `{/* SNIPEND */}`
	Jsx,
}

impl MarkerStyle {
	/// Every recognized style, in the order they are tried when classifying a
	/// line.
	pub const ALL: [Self; 2] = [Self::Html, Self::Jsx];

	/// The token that starts an opening marker.
	pub fn open_token(self) -> &'static str {
		match self {
			Self::Html => "<!--SNIPSTART",
			Self::Jsx => "{/* SNIPSTART",
		}
	}

	/// The token that terminates an opening (and closing) marker.
	pub fn terminator(self) -> &'static str {
		match self {
			Self::Html => "-->",
			Self::Jsx => "*/}",
		}
	}

	/// The token that starts a closing marker.
	pub fn close_token(self) -> &'static str {
		match self {
			Self::Html => "<!--SNIPEND",
			Self::Jsx => "{/* SNIPEND",
		}
	}
}

impl std::fmt::Display for MarkerStyle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Html => write!(f, "HTML comment"),
			Self::Jsx => write!(f, "MDX/JSX comment"),
		}
	}
}

/// How a single line of a target document reads to the marker scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerLine {
	/// An opening marker with the snippet id and any raw option text that
	/// followed the id.
	Open {
		style: MarkerStyle,
		id: String,
		options: Option<String>,
	},
	/// A closing marker.
	Close { style: MarkerStyle },
	/// Any other line.
	Text,
}

/// Classify one line of a target document.
///
/// Markers must be the first non-whitespace text on their line.
pub fn classify_line(line: &str) -> MarkerLine {
	let trimmed = line.trim_start();

	for style in MarkerStyle::ALL {
		if let Some(rest) = trimmed.strip_prefix(style.open_token()) {
			let inner = rest
				.rfind(style.terminator())
				.map_or(rest, |end| &rest[..end])
				.trim();
			let (id, options) = match inner.split_once(char::is_whitespace) {
				Some((id, options)) => {
					let options = options.trim();
					(id, (!options.is_empty()).then(|| options.to_string()))
				}
				None => (inner, None),
			};

			return MarkerLine::Open {
				style,
				id: id.to_string(),
				options,
			};
		}

		if trimmed.starts_with(style.close_token()) {
			return MarkerLine::Close { style };
		}
	}

	MarkerLine::Text
}

/// Extract the snippet id from a source line containing [`SOURCE_OPEN_TOKEN`].
///
/// Returns `None` when the line holds no open token. The id is the first
/// whitespace-delimited word after the token, which keeps trailing comment
/// closers like `*/` or `-->` out of the id.
pub fn parse_source_open(line: &str) -> Option<String> {
	let start = line.find(SOURCE_OPEN_TOKEN)?;
	let rest = &line[start + SOURCE_OPEN_TOKEN.len()..];
	Some(rest.split_whitespace().next().unwrap_or_default().to_string())
}

/// Whether a source line contains [`SOURCE_CLOSE_TOKEN`].
pub fn is_source_close(line: &str) -> bool {
	line.contains(SOURCE_CLOSE_TOKEN)
}

/// Whether a source line contains either source delimiter token.
pub fn is_source_delimiter(line: &str) -> bool {
	line.contains(SOURCE_OPEN_TOKEN) || line.contains(SOURCE_CLOSE_TOKEN)
}
