#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use tracing::{debug, info};

use crate::{
    constants::SECTIONS,
    context::AdminContext,
    error::{AdminError, AdminResult},
    events::ContentEvent,
    importer::import_into,
    model::{Course, SiteRegistry},
    ntiid::disambiguate,
    permissions::require_admin,
    requests::CreateCourse,
    util::child_directories,
};

/// Creates a course under an administrative level and populates it from the
/// request's archive.
///
/// The course gets a catalog NTIID unique across the registry, and one
/// section shell per directory under `Sections/` in the archive, before the
/// import runs. A failed import leaves the created course in place.
///
/// Fails with `InvalidSite` for an unknown catalog, `PermissionDenied` when
/// the context's principal is not a site administrator, `InvalidAdminLevel` for
/// an unknown administrative level (unless the request creates it),
/// `CourseAlreadyExists` when the key is taken and `InvalidArchive` when the
/// archive cannot be read.
pub fn create_course<'r>(
    ctx: &AdminContext,
    registry: &'r mut SiteRegistry,
    request: &CreateCourse,
) -> AdminResult<&'r mut Course> {
    let mut taken = registry.catalog_ntiids();
    let site = registry.site_mut(request.catalog())?;
    require_admin(ctx.principal(), "create courses in", &site.name)?;
    let site_name = site.name.clone();
    let level = if request.create_level() {
        site.ensure_level(request.admin_level())
    } else {
        site.level_mut(request.admin_level())
            .ok_or_else(|| AdminError::InvalidAdminLevel(request.admin_level().to_string()))?
    };
    if level.contains(request.key()) {
        return Err(AdminError::CourseAlreadyExists {
            admin_level: request.admin_level().to_string(),
            key:         request.key().to_string(),
        });
    }

    let ntiid = disambiguate(
        ctx.ntiids()
            .course(&site_name, request.admin_level(), request.key()),
        |id| taken.contains(id),
    );
    taken.insert(ntiid.clone());
    let course = level.insert(Course::new(request.admin_level(), request.key(), ntiid))?;
    ctx.events().notify(&ContentEvent::CourseCreated {
        ntiid: course.catalog.ntiid().to_string(),
    });
    info!(
        "Created {} under {}/{}",
        course.catalog.ntiid(),
        site_name,
        request.admin_level()
    );

    let resolved = ctx.resolver().resolve(request.archive())?;
    for dir in child_directories(&resolved.path().join(SECTIONS))? {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let section_ntiid = disambiguate(
            ctx.ntiids().section(course.catalog.ntiid(), name),
            |id| taken.contains(id),
        );
        taken.insert(section_ntiid.clone());
        let section = course.add_section(name, section_ntiid);
        debug!("Created section {}", section.catalog.ntiid());
        ctx.events().notify(&ContentEvent::CourseCreated {
            ntiid: section.catalog.ntiid().to_string(),
        });
    }

    import_into(ctx, course, resolved.path(), request.options())?;
    resolved.discard();
    Ok(course)
}
