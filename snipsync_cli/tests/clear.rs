mod common;

use common::*;
use snipsync_core::AnyEmptyResult;

#[test]
fn clear_empties_regions() -> AnyEmptyResult {
	let tmp = project(GUIDE_SYNCED);

	snipsync_cmd()
		.arg("clear")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Cleared 1 file(s)."));

	assert_eq!(read(tmp.path(), "docs/guide.md"), GUIDE);
	assert_eq!(read(tmp.path(), "docs/notes.txt"), GUIDE_SYNCED);

	Ok(())
}

#[test]
fn clear_then_run_restores_targets() -> AnyEmptyResult {
	let tmp = project(GUIDE_SYNCED);

	snipsync_cmd()
		.arg("clear")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();
	snipsync_cmd()
		.arg("run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(read(tmp.path(), "docs/guide.md"), GUIDE_SYNCED);

	Ok(())
}

#[test]
fn clear_leaves_mismatched_regions() -> AnyEmptyResult {
	let guide = "<!--SNIPSTART greet-->\nold\n{/* SNIPEND */}\n";
	let tmp = project(guide);

	snipsync_cmd()
		.arg("clear")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Cleared 0 file(s)."))
		.stderr(predicates::str::contains("closed with a MDX/JSX comment marker"));

	assert_eq!(read(tmp.path(), "docs/guide.md"), guide);

	Ok(())
}
