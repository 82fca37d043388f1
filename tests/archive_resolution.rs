mod support;

use std::fs;

use course_admin::{
    AdminError,
    archive::{ArchiveResolver, is_zip_archive, zip_directory},
    constants::{COURSE_INFO, SECTIONS},
};
use support::{entries, sample_course, temp_root, write_archive, write_wrapped_zip};

#[test]
fn single_wrapping_directory_is_peeled() {
    let root = temp_root("peel");
    let tmp = root.join("tmp");
    fs::create_dir_all(&tmp).expect("tmp");
    let zip = write_wrapped_zip(&sample_course(), &root, &root.join("cs1323.zip"));
    assert!(is_zip_archive(&zip));

    let resolver = ArchiveResolver::with_temp_root(&tmp);
    let resolved = resolver.resolve(&zip).expect("resolve wrapped zip");
    assert!(resolved.is_temporary());
    assert!(resolved.path().ends_with("wrapper"));
    assert!(resolved.path().join(COURSE_INFO).is_file());
    assert!(resolved.path().join(SECTIONS).join("001").is_dir());
    assert_eq!(entries(&tmp), 1);

    resolved.close().expect("close");
    assert_eq!(entries(&tmp), 0);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn flat_zip_resolves_to_the_extraction_root() {
    let root = temp_root("flat");
    let tmp = root.join("tmp");
    fs::create_dir_all(&tmp).expect("tmp");
    let tree = write_archive(&sample_course(), &root.join("tree"), true);
    let zip = zip_directory(&tree, &root.join("flat.zip")).expect("zip");

    let resolved = ArchiveResolver::with_temp_root(&tmp)
        .resolve(&zip)
        .expect("resolve flat zip");
    assert_eq!(Some(resolved.path()), resolved.temp_root());
    assert!(resolved.path().join(COURSE_INFO).is_file());

    drop(resolved);
    assert_eq!(entries(&tmp), 0, "dropping removes the extraction");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn directories_are_used_in_place() {
    let root = temp_root("dir");
    let tmp = root.join("tmp");
    fs::create_dir_all(&tmp).expect("tmp");
    let tree = write_archive(&sample_course(), &root.join("tree"), true);

    let resolved = ArchiveResolver::with_temp_root(&tmp)
        .resolve(&tree)
        .expect("resolve directory");
    assert_eq!(resolved.path(), tree.as_path());
    assert!(!resolved.is_temporary());
    assert_eq!(entries(&tmp), 0);

    resolved.close().expect("close");
    assert!(tree.join(COURSE_INFO).is_file(), "directories are never removed");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn non_archives_are_rejected_without_leaking() {
    let root = temp_root("bad");
    let tmp = root.join("tmp");
    fs::create_dir_all(&tmp).expect("tmp");
    let text = root.join("notes.txt");
    fs::write(&text, "not a zip").expect("write");

    let resolver = ArchiveResolver::with_temp_root(&tmp);
    let err = resolver.resolve(&text).expect_err("text is not an archive");
    assert!(matches!(err, AdminError::InvalidArchive { .. }), "{err:?}");
    assert_eq!(err.kind(), "InvalidArchiveError");
    assert!(!is_zip_archive(&text));

    let err = resolver
        .resolve(&root.join("missing.zip"))
        .expect_err("missing file");
    assert!(matches!(err, AdminError::InvalidArchive { .. }), "{err:?}");
    assert_eq!(entries(&tmp), 0);

    let _ = fs::remove_dir_all(root);
}
