use serde::Deserialize;
use serde::Serialize;

/// Ref used in source links when an origin does not name one.
pub const DEFAULT_REF: &str = "master";

/// The repository a snippet was extracted from, used for building links back
/// to the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginIdentity {
	pub owner: String,
	pub repo: String,
	/// Branch, tag, or commit. Empty means [`DEFAULT_REF`].
	#[serde(default)]
	pub r#ref: String,
}

impl OriginIdentity {
	pub fn new(
		owner: impl Into<String>,
		repo: impl Into<String>,
		r#ref: impl Into<String>,
	) -> Self {
		Self {
			owner: owner.into(),
			repo: repo.into(),
			r#ref: r#ref.into(),
		}
	}

	/// The ref to link against, falling back to [`DEFAULT_REF`].
	pub fn link_ref(&self) -> &str {
		if self.r#ref.is_empty() {
			DEFAULT_REF
		} else {
			&self.r#ref
		}
	}

	/// Whether two identities point at the same repository, ignoring the ref.
	pub fn same_repository(&self, other: &Self) -> bool {
		self.owner == other.owner && self.repo == other.repo
	}
}

/// Logical location of a source file: a `/`-separated directory and a file
/// name.
///
/// The first segment of `directory` is the root of the local checkout (for
/// example `sync_repos` or `.`) and is dropped from public paths and URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilePath {
	pub directory: String,
	pub name: String,
}

impl FilePath {
	pub fn new(directory: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			directory: directory.into(),
			name: name.into(),
		}
	}

	/// The repository-relative path with the checkout root removed, e.g.
	/// `hello-world/src/activities.ts`.
	pub fn public_path(&self) -> String {
		let mut parts: Vec<&str> = self.directory.split('/').skip(1).collect();
		parts.push(&self.name);
		parts.join("/")
	}
}

/// A named region of code extracted from one source file.
///
/// The stored `lines` are never mutated after extraction. Rendering always
/// works on a copy so several targets can select different parts of the same
/// snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
	pub id: String,
	/// File extension without the dot, used as the fence language.
	pub extension: String,
	pub origin: OriginIdentity,
	pub file_path: FilePath,
	/// Raw lines between the delimiters, delimiters excluded.
	pub lines: Vec<String>,
}

impl Snippet {
	pub fn new(
		id: impl Into<String>,
		extension: impl Into<String>,
		origin: OriginIdentity,
		file_path: FilePath,
	) -> Self {
		Self {
			id: id.into(),
			extension: extension.into(),
			origin,
			file_path,
			lines: Vec::new(),
		}
	}

	/// `https://github.com/{owner}/{repo}/blob/{ref}/{path}`
	pub fn source_url(&self) -> String {
		format!(
			"https://github.com/{}/{}/blob/{}/{}",
			self.origin.owner,
			self.origin.repo,
			self.origin.link_ref(),
			self.file_path.public_path()
		)
	}

	/// Markdown link to the snippet's source, e.g.
	/// `[src/main.go](https://github.com/acme/app/blob/main/src/main.go)`.
	pub fn source_link(&self) -> String {
		format!("[{}]({})", self.file_path.public_path(), self.source_url())
	}
}
