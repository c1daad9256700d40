use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SnipsyncError {
	#[error(transparent)]
	#[diagnostic(code(snipsync::io_error))]
	Io(#[from] std::io::Error),

	#[error("no configuration file found in `{0}`")]
	#[diagnostic(
		code(snipsync::missing_config),
		help("create a `snipsync.config.yaml` with `origins`, `targets`, and `features`")
	)]
	MissingConfig(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(snipsync::config_parse),
		help("check that snipsync.config.yaml is valid YAML with `origins` and `targets` lists")
	)]
	ConfigParse(String),

	#[error("invalid file pattern `{pattern}`: {reason}")]
	#[diagnostic(code(snipsync::invalid_glob))]
	InvalidGlob { pattern: String, reason: String },

	#[error("invalid regular expression `{pattern}`: {reason}")]
	#[diagnostic(
		code(snipsync::invalid_pattern),
		help("`startPattern` and `endPattern` use Rust `regex` syntax")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("invalid marker configuration `{raw}`: {reason}")]
	#[diagnostic(
		code(snipsync::invalid_marker_config),
		help(
			"marker options must be a JSON object, e.g. `{{\"selectedLines\": [\"1-3\"]}}`"
		)
	)]
	InvalidMarkerConfig { raw: String, reason: String },

	#[error("failed to fetch origin `{owner}/{repo}`: {reason}")]
	#[diagnostic(
		code(snipsync::origin_fetch),
		help("check that `git` is installed and the repository is reachable")
	)]
	OriginFetch {
		owner: String,
		repo: String,
		reason: String,
	},
}

pub type SnipsyncResult<T> = Result<T, SnipsyncError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
