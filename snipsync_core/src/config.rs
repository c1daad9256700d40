use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::OriginIdentity;
use crate::RenderOptions;
use crate::SnipsyncError;
use crate::SnipsyncResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"snipsync.config.yaml",
	"snipsync.config.yml",
	".config/snipsync.yaml",
];

/// Directory, relative to the project root, that remote origins are checked
/// out into for the duration of a run.
pub const EXTRACTION_DIR: &str = "sync_repos";

/// A source of snippets.
///
/// Remote origins name a GitHub repository:
///
/// ```yaml
/// origins:
///   - owner: temporalio
///     repo: samples-typescript
///     ref: main
/// ```
///
/// Local origins match files in the project with a glob and attach the
/// repository identity used for links:
///
/// ```yaml
/// origins:
///   - files:
///       pattern: "./snippets/**/*.go"
///       owner: temporalio
///       repo: snipsync
///       ref: main
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum OriginConfig {
	Files { files: FilesOrigin },
	Remote(RemoteOrigin),
}

/// A GitHub repository to fetch snippets from.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteOrigin {
	pub owner: String,
	pub repo: String,
	#[serde(default, rename = "ref")]
	pub r#ref: Option<String>,
}

impl RemoteOrigin {
	/// The repository identity attached to snippets from this origin.
	pub fn identity(&self) -> OriginIdentity {
		OriginIdentity::new(&self.owner, &self.repo, self.r#ref.clone().unwrap_or_default())
	}
}

/// Local files matched by a glob pattern relative to the project root.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FilesOrigin {
	pub pattern: String,
	pub owner: String,
	pub repo: String,
	#[serde(default, rename = "ref")]
	pub r#ref: Option<String>,
}

impl FilesOrigin {
	/// The repository identity attached to snippets matched by the pattern.
	pub fn identity(&self) -> OriginIdentity {
		OriginIdentity::new(&self.owner, &self.repo, self.r#ref.clone().unwrap_or_default())
	}
}

/// Feature switches from the `features` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Features {
	/// Defaults to `true`.
	#[serde(default = "default_true")]
	pub enable_source_link: bool,
	/// Defaults to `true`.
	#[serde(default = "default_true")]
	pub enable_code_block: bool,
	#[serde(default)]
	pub enable_code_dedenting: bool,
	/// Extensions such as `.md` or `mdx`. Empty allows every target.
	#[serde(default)]
	pub allowed_target_extensions: Vec<String>,
}

impl Default for Features {
	fn default() -> Self {
		Self {
			enable_source_link: true,
			enable_code_block: true,
			enable_code_dedenting: false,
			allowed_target_extensions: Vec::new(),
		}
	}
}

impl From<&Features> for RenderOptions {
	fn from(features: &Features) -> Self {
		Self {
			enable_source_link: features.enable_source_link,
			enable_code_block: features.enable_code_block,
			enable_code_dedenting: features.enable_code_dedenting,
			allowed_target_extensions: features.allowed_target_extensions.clone(),
		}
	}
}

fn default_true() -> bool {
	true
}

/// Configuration loaded from `snipsync.config.yaml`.
///
/// ```yaml
/// origins:
///   - owner: temporalio
///     repo: samples-typescript
/// targets:
///   - docs
/// features:
///   enable_source_link: true
///   enable_code_block: true
///   enable_code_dedenting: false
///   allowed_target_extensions: [".md", ".mdx"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SnipsyncConfig {
	#[serde(default)]
	pub origins: Vec<OriginConfig>,
	/// Files or directories (relative to the project root) to splice into.
	#[serde(default)]
	pub targets: Vec<PathBuf>,
	#[serde(default)]
	pub features: Features,
}

impl SnipsyncConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SnipsyncResult<Option<Self>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		Self::from_yaml(&content).map(Some)
	}

	/// Parse a config from YAML text.
	pub fn from_yaml(content: &str) -> SnipsyncResult<Self> {
		serde_yaml_ng::from_str(content).map_err(|e| SnipsyncError::ConfigParse(e.to_string()))
	}

	/// The rendering options derived from `features`.
	pub fn render_options(&self) -> RenderOptions {
		RenderOptions::from(&self.features)
	}
}
