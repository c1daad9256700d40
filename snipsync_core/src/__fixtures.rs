use std::path::Path;
use std::path::PathBuf;

use crate::FilePath;
use crate::OriginIdentity;
use crate::SnipsyncResult;
use crate::Snippet;
use crate::SourceFile;
use crate::config::RemoteOrigin;
use crate::origin::OriginFetcher;

pub fn acme() -> OriginIdentity {
	OriginIdentity::new("acme", "app", "main")
}

pub fn lines(text: &str) -> Vec<String> {
	text.lines().map(ToString::to_string).collect()
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

pub fn read_file(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read: {e}"))
}

/// A source file under `./src` of the `acme/app` repository.
pub fn local_source(path: PathBuf, name: &str) -> SourceFile {
	SourceFile {
		path,
		logical: FilePath::new("./src", name),
		origin: acme(),
	}
}

/// A `go` snippet from `acme/app` at `src/main.go`.
pub fn go_snippet(id: &str, body: &str) -> Snippet {
	let mut snippet = Snippet::new(id, "go", acme(), FilePath::new("./src", "main.go"));
	snippet.lines = lines(body);
	snippet
}

pub const GREET_SOURCE: &str = "package main\n\n// @@@SNIPSTART greet\nfunc Greet() \
                                string {\n\treturn \"hi\"\n}\n// @@@SNIPEND\n";

/// Fetches a remote origin by copying a prepared local directory.
pub struct DirectoryFetcher {
	pub source: PathBuf,
}

impl OriginFetcher for DirectoryFetcher {
	fn fetch(&self, _remote: &RemoteOrigin, dest: &Path) -> SnipsyncResult<()> {
		copy_dir(&self.source, dest)
	}
}

fn copy_dir(from: &Path, to: &Path) -> SnipsyncResult<()> {
	std::fs::create_dir_all(to)?;
	for entry in std::fs::read_dir(from)? {
		let entry = entry?;
		let target = to.join(entry.file_name());
		if entry.file_type()?.is_dir() {
			copy_dir(&entry.path(), &target)?;
		} else {
			std::fs::copy(entry.path(), target)?;
		}
	}
	Ok(())
}
