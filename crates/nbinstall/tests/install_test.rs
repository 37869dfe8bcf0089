use std::fs;
use std::path::{Path, PathBuf};

use nbinstall::{InstallError, InstallSettings, install};
use tempfile::TempDir;

fn write_text(path: &Path, txt: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, txt).expect("write text");
}

fn settings(dir_source: &Path, dir_destination: &Path, if_force: bool) -> InstallSettings {
    InstallSettings {
        app_name: "smartcam".to_string(),
        dir_source: dir_source.to_path_buf(),
        dir_destination: dir_destination.to_path_buf(),
        if_force,
    }
}

/// Relative paths of every entry below `path_root`, links not followed.
fn list_tree(path_root: &Path) -> Vec<String> {
    fn walk(path_root: &Path, path_dir: &Path, l_out: &mut Vec<String>) {
        for entry in fs::read_dir(path_dir).expect("read dir") {
            let path_entry = entry.expect("entry").path();
            l_out.push(
                path_entry
                    .strip_prefix(path_root)
                    .expect("relative")
                    .to_string_lossy()
                    .to_string(),
            );
            if fs::symlink_metadata(&path_entry).expect("metadata").is_dir() {
                walk(path_root, &path_entry, l_out);
            }
        }
    }
    let mut l_out = Vec::new();
    walk(path_root, path_root, &mut l_out);
    l_out.sort();
    l_out
}

fn sample_source(path_root: &Path) -> PathBuf {
    let src = path_root.join("share/notebooks/smartcam");
    write_text(&src.join("a.ipynb"), r#"{"cells": []}"#);
    write_text(&src.join(".ipynb_checkpoints/a-checkpoint.ipynb"), "{}");
    write_text(&src.join("b.pyc"), "bytecode");
    write_text(&src.join("c~"), "backup");
    src
}

#[test]
fn fresh_install_copies_all_but_excluded() {
    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let dst = tmp.path().join("home/notebooks/smartcam");

    let report = install::run(&settings(&src, &dst, false)).expect("install");

    assert_eq!(list_tree(&dst), vec!["a.ipynb".to_string()]);
    assert_eq!(
        fs::read_to_string(dst.join("a.ipynb")).expect("read"),
        r#"{"cells": []}"#
    );
    assert_eq!(report.cnt_ignored, 3);
    assert!(report.is_success());
}

#[test]
fn nested_tree_is_copied_with_exclusions_at_every_level() {
    let tmp = TempDir::new().expect("tempdir");
    let src = tmp.path().join("src");
    write_text(&src.join("app.ipynb"), "{}");
    write_text(&src.join("utils/helpers.py"), "def f(): pass");
    write_text(&src.join("utils/helpers.pyc"), "bc");
    write_text(&src.join("utils/.ipynb_checkpoints/x.ipynb"), "{}");
    write_text(&src.join("images/overview.png"), "png");
    write_text(&src.join("images/overview.png~"), "old");
    let dst = tmp.path().join("dst");

    install::run(&settings(&src, &dst, false)).expect("install");

    assert_eq!(
        list_tree(&dst),
        vec![
            "app.ipynb".to_string(),
            "images".to_string(),
            "images/overview.png".to_string(),
            "utils".to_string(),
            "utils/helpers.py".to_string(),
        ]
    );
}

#[test]
fn relative_destination_is_resolved() {
    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let dst = tmp.path().join("home/./x/../notebooks");

    install::run(&settings(&src, &dst, false)).expect("install");

    assert!(tmp.path().join("home/notebooks/a.ipynb").exists());
    assert!(!tmp.path().join("home/x").exists());
}

#[test]
fn destination_file_is_fatal_and_untouched() {
    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let dst = tmp.path().join("smartcam");
    write_text(&dst, "not a directory");

    for if_force in [false, true] {
        let err = install::run(&settings(&src, &dst, if_force)).expect_err("must fail");
        assert!(matches!(err, InstallError::DestinationIsFile(_)));
        assert_eq!(
            fs::read_to_string(&dst).expect("read"),
            "not a directory"
        );
    }
}

#[test]
fn existing_directory_without_force_is_left_untouched() {
    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let dst = tmp.path().join("smartcam");
    write_text(&dst.join("mine.ipynb"), "user work");

    let err = install::run(&settings(&src, &dst, false)).expect_err("must fail");

    assert!(matches!(err, InstallError::DestinationExistsNoForce(_)));
    assert!(err.to_string().contains("'--force'"));
    assert_eq!(list_tree(&dst), vec!["mine.ipynb".to_string()]);
}

#[test]
fn force_replaces_existing_directory() {
    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let dst = tmp.path().join("smartcam");
    write_text(&dst.join("mine.ipynb"), "user work");
    write_text(&dst.join("old/stale.txt"), "stale");

    install::run(&settings(&src, &dst, true)).expect("install");

    assert_eq!(list_tree(&dst), vec!["a.ipynb".to_string()]);
}

#[test]
fn force_twice_is_idempotent() {
    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let dst = tmp.path().join("smartcam");

    install::run(&settings(&src, &dst, true)).expect("first install");
    let l_first = list_tree(&dst);
    install::run(&settings(&src, &dst, true)).expect("second install");

    assert_eq!(list_tree(&dst), l_first);
    assert_eq!(l_first, vec!["a.ipynb".to_string()]);
}

#[test]
fn missing_source_is_fatal_without_mutation() {
    let tmp = TempDir::new().expect("tempdir");
    let src = tmp.path().join("share/notebooks/smartcam");
    let dst_new = tmp.path().join("fresh");
    let dst_existing = tmp.path().join("existing");
    write_text(&dst_existing.join("mine.ipynb"), "user work");

    let err = install::run(&settings(&src, &dst_new, false)).expect_err("must fail");
    assert!(matches!(err, InstallError::SourceMissing(_)));
    assert!(!dst_new.exists());

    let err = install::run(&settings(&src, &dst_existing, true)).expect_err("must fail");
    assert!(matches!(err, InstallError::SourceMissing(_)));
    assert_eq!(list_tree(&dst_existing), vec!["mine.ipynb".to_string()]);
}

#[test]
fn source_that_is_a_file_counts_as_missing() {
    let tmp = TempDir::new().expect("tempdir");
    let src = tmp.path().join("smartcam");
    write_text(&src, "file");

    let err = install::run(&settings(&src, &tmp.path().join("dst"), false))
        .expect_err("must fail");
    assert!(matches!(err, InstallError::SourceMissing(_)));
}

#[test]
fn destination_checks_take_precedence_over_source_check() {
    let tmp = TempDir::new().expect("tempdir");
    let src = tmp.path().join("missing");
    let dst = tmp.path().join("smartcam");
    fs::create_dir_all(&dst).expect("mkdir");

    let err = install::run(&settings(&src, &dst, false)).expect_err("must fail");
    assert!(matches!(err, InstallError::DestinationExistsNoForce(_)));
}

#[test]
fn destination_inside_source_is_refused_before_removal() {
    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let dst = src.join("copy");
    fs::create_dir_all(&dst).expect("mkdir");

    let err = install::run(&settings(&src, &dst, true)).expect_err("must fail");
    assert!(matches!(err, InstallError::CopyFailure(_)));
    assert!(dst.exists());
}

#[cfg(unix)]
#[test]
fn destination_aliasing_source_through_symlink_keeps_source() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().expect("tempdir");
    let share = tmp.path().join("share");
    let src = share.join("smartcam");
    write_text(&src.join("a.ipynb"), "{}");
    fs::create_dir_all(tmp.path().join("home")).expect("mkdir home");
    symlink(&share, tmp.path().join("home/nb")).expect("link home/nb to share");
    let dst = tmp.path().join("home/nb/smartcam");

    let err = install::run(&settings(&src, &dst, true)).expect_err("must fail");

    assert!(matches!(err, InstallError::CopyFailure(_)));
    assert!(err.to_string().contains("overlap"));
    assert_eq!(list_tree(&src), vec!["a.ipynb".to_string()]);
}

#[cfg(unix)]
#[test]
fn symlinks_are_preserved_as_links() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    write_text(&src.join("data/video.mp4"), "frames");
    symlink("a.ipynb", src.join("start-here.ipynb")).expect("file symlink");
    symlink("data", src.join("media")).expect("dir symlink");
    let dst = tmp.path().join("dst");

    let report = install::run(&settings(&src, &dst, false)).expect("install");

    assert_eq!(report.cnt_symlinks, 2);
    assert!(dst.join("start-here.ipynb").is_symlink());
    assert_eq!(
        fs::read_link(dst.join("start-here.ipynb")).expect("read link"),
        PathBuf::from("a.ipynb")
    );
    assert!(dst.join("media").is_symlink());
    assert_eq!(
        list_tree(&dst),
        vec![
            "a.ipynb".to_string(),
            "data".to_string(),
            "data/video.mp4".to_string(),
            "media".to_string(),
            "start-here.ipynb".to_string(),
        ]
    );
}

#[cfg(unix)]
#[test]
fn per_entry_failure_is_a_copy_failure() {
    use std::os::unix::net::UnixListener;

    let tmp = TempDir::new().expect("tempdir");
    let src = sample_source(tmp.path());
    let _listener = UnixListener::bind(src.join("s.sock")).expect("bind socket");
    let dst = tmp.path().join("dst");

    let err = install::run(&settings(&src, &dst, false)).expect_err("must fail");

    assert!(matches!(err, InstallError::CopyFailure(_)));
    assert!(err.to_string().starts_with("An exception occurred: "));
    assert!(err.to_string().contains("s.sock"));
    // No cleanup of what was already copied.
    assert!(dst.join("a.ipynb").exists());
}
