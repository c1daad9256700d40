#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

pub const GREET_SOURCE: &str = "package main\n\n// @@@SNIPSTART greet\nfunc Greet() \
                                string {\n\treturn \"hi\"\n}\n// @@@SNIPEND\n";

pub const GUIDE: &str = "# Guide\n\n<!--SNIPSTART greet-->\n<!--SNIPEND-->\n";

pub const GUIDE_SYNCED: &str = "# Guide\n\n<!--SNIPSTART \
                                greet-->\n[snippets/main.go](https://github.com/acme/app/blob/\
                                main/snippets/main.go)\n```go\nfunc Greet() string \
                                {\n\treturn \"hi\"\n}\n```\n<!--SNIPEND-->\n";

pub const CONFIG: &str = r#"origins:
  - files:
      pattern: "snippets/*.go"
      owner: acme
      repo: app
      ref: main
targets:
  - docs
features:
  allowed_target_extensions: [".md"]
"#;

pub fn snipsync_cmd() -> Command {
	let mut cmd = Command::cargo_bin("snipsync").unwrap_or_else(|e| panic!("binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn write(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

pub fn read(root: &Path, relative: &str) -> String {
	std::fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("read: {e}"))
}

/// A project with one local origin, one markdown target, and one text file
/// that the extension filter excludes.
pub fn project(guide: &str) -> tempfile::TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write(tmp.path(), "snipsync.config.yaml", CONFIG);
	write(tmp.path(), "snippets/main.go", GREET_SOURCE);
	write(tmp.path(), "docs/guide.md", guide);
	write(tmp.path(), "docs/notes.txt", guide);
	tmp
}
