mod support;

use std::fs;

use course_admin::{
    AdminError, CourseRef, ImportOptions, SiteRegistry,
    constants::COURSE_OUTLINE,
    create_course,
    events::ContentEvent,
    locking::locked_ntiids,
    model::Site,
    permissions::Principal,
    requests::{CreateCourse, CreateCourseRequest},
};
use support::{context, entries, sample_course, temp_root, write_archive, write_wrapped_zip};

fn registry_with_level() -> SiteRegistry {
    let mut registry = SiteRegistry::default();
    registry
        .site_mut(None)
        .expect("default site")
        .ensure_level("Fall2015");
    registry
}

#[test]
fn lockout_scenario_creates_a_locked_course() {
    let root = temp_root("create-lockout");
    let tmp = root.join("tmp");
    fs::create_dir_all(&tmp).expect("tmp");
    let zip = write_wrapped_zip(&sample_course(), &root, &root.join("cs1323.zip"));
    let (ctx, _) = context(&tmp);
    let mut registry = registry_with_level();

    let request = CreateCourse::builder()
        .admin_level("Fall2015")
        .key("CS1323")
        .archive(&zip)
        .options(ImportOptions::builder().lockout(true).build())
        .build();
    let course = create_course(&ctx, &mut registry, &request).expect("create");

    assert_eq!(course.key, "CS1323");
    assert_eq!(course.admin_level, "Fall2015");
    assert!(
        course
            .outline
            .iter()
            .filter(|n| !n.container)
            .all(|n| n.locked),
        "every outline node is locked"
    );
    assert!(!locked_ntiids(course).is_empty());
    assert_eq!(entries(&tmp), 0, "extraction removed");

    let course = registry
        .resolve(&CourseRef::path("Fall2015", "CS1323"))
        .expect("registered");
    assert_eq!(course.catalog.title, "Introduction to Programming");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn sections_are_provisioned_from_the_archive() {
    let root = temp_root("create-sections");
    let archive = write_archive(&sample_course(), &root.join("archive"), true);
    let (ctx, sink) = context(&root);
    let mut registry = registry_with_level();

    let request = CreateCourseRequest {
        admin_level: Some("Fall2015".into()),
        key: Some("CS1323".into()),
        archive: Some(archive.display().to_string()),
        ..Default::default()
    }
    .validate()
    .expect("valid request");
    let course = create_course(&ctx, &mut registry, &request).expect("create");

    let ntiid = course.catalog.ntiid().to_string();
    assert_eq!(
        ntiid,
        "tag:courses.example.org,2015:platform.ou.edu-CourseInfo-Fall2015_CS1323"
    );
    assert_eq!(course.sections.keys().collect::<Vec<_>>(), ["001", "002"]);
    let section = &course.sections["001"];
    assert_eq!(section.catalog.ntiid(), format!("{ntiid}_SubInstances_001"));
    assert_eq!(section.catalog.title, "Section 001");
    assert!(section.content.contains("001.txt"));

    let created: Vec<ContentEvent> = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, ContentEvent::CourseCreated { .. }))
        .collect();
    assert_eq!(created.len(), 3, "course plus two sections");

    let section_ref: CourseRef = "Fall2015/CS1323/Sections/002".parse().expect("ref");
    assert!(registry.resolve(&section_ref).is_ok());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn catalog_and_level_must_exist() {
    let root = temp_root("create-missing");
    let archive = write_archive(&sample_course(), &root.join("archive"), true);
    let (ctx, _) = context(&root);
    let mut registry = registry_with_level();

    let request = CreateCourse::builder()
        .admin_level("Fall2015")
        .key("CS1323")
        .archive(&archive)
        .catalog("elsewhere.edu")
        .build();
    let err = create_course(&ctx, &mut registry, &request).expect_err("unknown site");
    assert!(matches!(err, AdminError::InvalidSite(ref s) if s == "elsewhere.edu"), "{err:?}");

    let request = CreateCourse::builder()
        .admin_level("Spring2016")
        .key("CS1323")
        .archive(&archive)
        .build();
    let err = create_course(&ctx, &mut registry, &request).expect_err("unknown level");
    assert!(matches!(err, AdminError::InvalidAdminLevel(_)), "{err:?}");

    let request = request.with_create_level(true);
    create_course(&ctx, &mut registry, &request).expect("level created on demand");

    registry.add_site(Site::new("elsewhere.edu"));
    let request = CreateCourse::builder()
        .admin_level("Fall2015")
        .key("CS1323")
        .archive(&archive)
        .catalog("elsewhere.edu")
        .create_level(true)
        .build();
    let course = create_course(&ctx, &mut registry, &request).expect("other site");
    assert!(course.catalog.ntiid().contains("elsewhere.edu"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn duplicate_keys_are_rejected() {
    let root = temp_root("create-duplicate");
    let archive = write_archive(&sample_course(), &root.join("archive"), true);
    let (ctx, _) = context(&root);
    let mut registry = registry_with_level();

    let request = CreateCourse::builder()
        .admin_level("Fall2015")
        .key("CS1323")
        .archive(&archive)
        .build();
    create_course(&ctx, &mut registry, &request).expect("first");
    let err = create_course(&ctx, &mut registry, &request).expect_err("second");
    assert!(
        matches!(err, AdminError::CourseAlreadyExists { ref key, .. } if key == "CS1323"),
        "{err:?}"
    );
    assert_eq!(err.kind(), "CourseAlreadyExistsError");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn failed_import_keeps_the_created_course() {
    let root = temp_root("create-fail");
    let tmp = root.join("tmp");
    fs::create_dir_all(&tmp).expect("tmp");
    let archive = write_archive(&sample_course(), &root.join("archive"), true);
    fs::write(archive.join(COURSE_OUTLINE), "[]").expect("corrupt");
    let (ctx, _) = context(&tmp);
    let mut registry = registry_with_level();

    let request = CreateCourse::builder()
        .admin_level("Fall2015")
        .key("CS1323")
        .archive(&archive)
        .build();
    create_course(&ctx, &mut registry, &request).expect_err("bad outline");

    let course = registry
        .resolve(&CourseRef::path("Fall2015", "CS1323"))
        .expect("course stays");
    assert_eq!(course.sections.len(), 2);
    assert_eq!(entries(&tmp), 0);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn request_validation_precedes_creation() {
    let request = CreateCourseRequest {
        admin_level: Some("Fall2015".into()),
        key: Some("  ".into()),
        archive: Some("/archives/cs1323.zip".into()),
        ..Default::default()
    };
    let err = request.validate().expect_err("blank key");
    assert!(matches!(err, AdminError::MissingCourseKey));
    assert_eq!(err.kind(), "MissingCourseKeyError");

    let request = CreateCourseRequest {
        admin_level: None,
        ..request
    };
    assert!(matches!(request.validate(), Err(AdminError::MissingAdminLevel)));
}

#[test]
fn catalog_ntiids_stay_unique_when_keys_sanitize_alike() {
    let root = temp_root("create-unique-ntiid");
    let archive = write_archive(&sample_course(), &root.join("archive"), true);
    let (ctx, _) = context(&root);
    let mut registry = registry_with_level();

    let mut ntiids = Vec::new();
    for (level, key) in [
        ("Fall2015", "CS 1323"),
        ("Fall2015", "CS_1323"),
        ("Fall2015", "A_B"),
        ("Fall2015_A", "B"),
    ] {
        let request = CreateCourse::builder()
            .admin_level(level)
            .key(key)
            .archive(&archive)
            .create_level(true)
            .build();
        let course = create_course(&ctx, &mut registry, &request).expect("create");
        ntiids.push((key, course.catalog.ntiid().to_string()));
    }

    assert_ne!(ntiids[0].1, ntiids[1].1);
    assert_ne!(ntiids[2].1, ntiids[3].1);
    assert_eq!(ntiids[1].1, format!("{}-2", ntiids[0].1));
    for (key, ntiid) in &ntiids {
        let found = registry
            .resolve(&CourseRef::Ntiid(ntiid.clone()))
            .expect("resolve by ntiid");
        assert_eq!(found.key, *key);
    }

    let all = registry.catalog_ntiids();
    assert_eq!(all.len(), 4 * 3, "four courses with two sections each");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn only_site_admins_create_courses() {
    let root = temp_root("create-denied");
    let archive = write_archive(&sample_course(), &root.join("archive"), true);
    let (ctx, _) = context(&root);
    let ctx = ctx.acting_as(Principal::user("jdoe"));
    let mut registry = registry_with_level();

    let request = CreateCourse::builder()
        .admin_level("Fall2015")
        .key("CS1323")
        .archive(&archive)
        .build();
    let err = create_course(&ctx, &mut registry, &request).expect_err("not an admin");
    assert_eq!(err.kind(), "PermissionDeniedError");
    assert!(
        registry
            .resolve(&CourseRef::path("Fall2015", "CS1323"))
            .is_err(),
        "nothing created"
    );

    let (ctx, _) = context(&root);
    let ctx = ctx.acting_as(Principal::admin("root"));
    create_course(&ctx, &mut registry, &request).expect("admin may create");

    let _ = fs::remove_dir_all(root);
}
