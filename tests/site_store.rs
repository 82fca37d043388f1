mod support;

use std::fs;

use course_admin::{
    CourseRef, SiteRegistry,
    model::{Course, Site, Storage},
    roles::{CourseRole, grant_role},
    store::SiteStore,
};
use support::temp_root;

#[test]
fn missing_file_loads_an_empty_registry() {
    let root = temp_root("store-empty");
    let store = SiteStore::new(root.join("site.json"), "janux.ou.edu");

    let registry = store.load().expect("load");
    assert_eq!(registry.default_site(), "janux.ou.edu");
    assert_eq!(registry.sites().count(), 1);
    assert_eq!(registry.site(None).expect("default").courses().count(), 0);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn registry_survives_a_save_and_load() {
    let root = temp_root("store-roundtrip");
    let store = SiteStore::new(root.join("nested").join("site.json"), "platform.ou.edu");

    let mut registry = SiteRegistry::default();
    registry.add_site(Site::new("janux.ou.edu"));
    let course = registry
        .site_mut(None)
        .expect("default site")
        .ensure_level("Fall2015")
        .insert(Course::new("Fall2015", "CS1323", "tag:cs1323"))
        .expect("insert");
    course.content.insert("syllabus.pdf", b"%PDF".to_vec(), Storage::Durable);
    course.add_section("001", "tag:cs1323_001");
    grant_role(course, CourseRole::Editor, "asmith");

    store.save(&registry).expect("save");
    let loaded = store.load().expect("load");
    assert_eq!(loaded, registry);

    let section = loaded
        .resolve(&"Fall2015/CS1323/Sections/001".parse::<CourseRef>().expect("ref"))
        .expect("section");
    assert_eq!(section.catalog.ntiid(), "tag:cs1323_001");

    let leftovers: Vec<_> = fs::read_dir(root.join("nested"))
        .expect("read dir")
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, ["site.json"], "no temporary files remain");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn corrupt_files_are_reported() {
    let root = temp_root("store-corrupt");
    let path = root.join("site.json");
    fs::write(&path, "{ nope").expect("write");

    let err = SiteStore::new(&path, "platform.ou.edu")
        .load()
        .expect_err("corrupt");
    assert_eq!(err.kind(), "IOError");

    let _ = fs::remove_dir_all(root);
}
