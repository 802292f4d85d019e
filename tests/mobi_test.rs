//! MOBI export tests.
//!
//! A fake compiler stands in for kindlegen so the tests can see which file
//! it was given and whether the intermediate EPUB is cleaned up.

use booksmith::{Chapter, Error};
use booksmith::export::{MobiConfig, MobiExporter};
use tempfile::TempDir;

fn exporter(compiler: &str) -> MobiExporter {
    MobiExporter::new().with_config(MobiConfig {
        compiler: compiler.to_string(),
        quiet: true,
    })
}

fn sample() -> Chapter {
    Chapter::new("Story")
        .with_author("Teller")
        .with_content("<p>Once upon a time</p>")
        .with_sub_chapter(Chapter::new("The End"))
}

#[test]
fn test_missing_compiler_is_ignored() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("story");

    let written = exporter("booksmith-no-such-compiler")
        .to_mobi(&sample(), target.to_str().unwrap())
        .unwrap();

    assert_eq!(written, format!("{}.mobi", target.display()));
    // Intermediate EPUB is always removed
    assert!(!dir.path().join("story.epub").exists());
}

#[cfg(unix)]
#[test]
fn test_failing_compiler_status_is_ignored() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("story.mobi");

    let written = exporter("false")
        .to_mobi(&sample(), target.to_str().unwrap())
        .unwrap();

    assert_eq!(written, target.to_str().unwrap());
    assert!(!dir.path().join("story.epub").exists());
}

#[cfg(unix)]
#[test]
fn test_compiler_receives_intermediate_epub() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let script = dir.path().join("fake-kindlegen");
    std::fs::write(
        &script,
        "#!/bin/sh\ntest -f \"$1\" || exit 2\ncp \"$1\" \"${1%.epub}.mobi\"\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let target = dir.path().join("book.txt");
    let written = exporter(script.to_str().unwrap())
        .to_mobi(&sample(), target.to_str().unwrap())
        .unwrap();

    assert_eq!(written, format!("{}.mobi", target.display()));
    // The compiler saw book.txt.epub and produced book.txt.mobi from it
    let mobi = dir.path().join("book.txt.mobi");
    assert!(mobi.exists());
    let bytes = std::fs::read(mobi).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert!(!dir.path().join("book.txt.epub").exists());
}

#[cfg(unix)]
#[test]
fn test_intermediate_delete_failure_is_an_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let script = dir.path().join("eager-kindlegen");
    std::fs::write(&script, "#!/bin/sh\nrm -f \"$1\"\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let target = dir.path().join("gone.mobi");
    let err = exporter(script.to_str().unwrap())
        .to_mobi(&sample(), target.to_str().unwrap())
        .unwrap_err();

    assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}
