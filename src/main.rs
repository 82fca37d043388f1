#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # course-admin
//!
//! Command-line front end for creating, importing, exporting, locking and
//! staffing courses. The site registry is read from and written back to the
//! JSON file named by `COURSE_ADMIN_SITE_FILE`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use course_admin::{
    AdminContext, CourseRef, ExportOptions, ImportOptions,
    config,
    create_course, export_course_ref, import_course, lock_course_tree,
    permissions::{Principal, authorize, editing_policy, require_admin},
    report::{course_rows, courses_table, roles_table},
    requests::{CreateCourseRequest, ImportCourseRequest},
    roles::{CourseRole, grant_role, revoke_role},
    store::SiteStore,
};
use dotenvy::dotenv;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Role subcommands.
#[derive(Debug, Clone)]
enum RolesCmd {
    /// Grant a role
    Grant(CourseRef, CourseRole, String),
    /// Revoke a role
    Revoke(CourseRef, CourseRole, String),
    /// List role assignments
    List(CourseRef),
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Create a course from an archive
    Create {
        /// Site to create the course in
        catalog:      Option<String>,
        /// Create the administrative level when missing
        create_level: bool,
        /// Import switches
        options:      ImportOptions,
        /// Administrative level
        admin_level:  String,
        /// Course key
        key:          String,
        /// Archive path
        archive:      String,
    },
    /// Import an archive into a course
    Import {
        /// Import switches
        options: ImportOptions,
        /// Course reference
        course:  String,
        /// Archive path
        archive: String,
    },
    /// Export a course to a zip file
    Export {
        /// Keep identifiers and roles verbatim
        backup: bool,
        /// Salt for identifiers
        salt:   Option<String>,
        /// Output directory
        out:    Option<PathBuf>,
        /// Course reference
        course: CourseRef,
    },
    /// Lock the content of a course and its sections
    Lock(CourseRef),
    /// Manage instructor and editor roles
    Roles(RolesCmd),
    /// List the courses of a site
    List(Option<String>),
}

/// Parsed command line.
#[derive(Debug, Clone)]
struct Opts {
    /// Acting user; permission checks are skipped when absent
    user:       Option<String>,
    /// Whether the acting user is a site administrator
    site_admin: bool,
    /// Command to run
    cmd:        Cmd,
}

/// Parse the command line arguments and return the acting user and command
fn options() -> Opts {
    /// parses a course reference
    fn c() -> impl Parser<CourseRef> {
        positional::<String>("COURSE")
            .help("Course NTIID or [site::]admin/key[/Sections/name]")
            .parse(|s| s.parse::<CourseRef>())
    }

    /// parses a course role
    fn r() -> impl Parser<CourseRole> {
        positional::<String>("ROLE")
            .help("instructor or editor")
            .parse(|s| s.parse::<CourseRole>())
    }

    /// parses a username
    fn p() -> impl Parser<String> {
        positional("PRINCIPAL").help("Username")
    }

    /// parses an archive path
    fn a() -> impl Parser<String> {
        positional("ARCHIVE").help("Archive directory or zip file")
    }

    /// parses the import switches
    fn flags() -> impl Parser<ImportOptions> {
        let writeout = long("writeout")
            .help("Mark imported files durable")
            .switch();
        let lockout = long("lockout")
            .help("Lock imported content")
            .switch();
        let clear = long("clear")
            .help("Erase the course content folder before importing")
            .switch();
        construct!(ImportOptions {
            writeout,
            lockout,
            clear
        })
    }

    let create = {
        let catalog = long("catalog")
            .help("Site to create the course in")
            .argument::<String>("SITE")
            .optional();
        let create_level = long("create-level")
            .help("Create the administrative level if it does not exist")
            .switch();
        let options = flags();
        let admin_level = positional::<String>("ADMIN").help("Administrative level");
        let key = positional::<String>("KEY").help("Course key");
        let archive = a();
        construct!(Cmd::Create {
            catalog,
            create_level,
            options,
            admin_level,
            key,
            archive
        })
        .to_options()
        .command("create")
        .help("Create a course and import an archive into it")
    };

    let import = {
        let options = flags();
        let course = positional::<String>("COURSE")
            .help("Course NTIID or [site::]admin/key[/Sections/name]");
        let archive = a();
        construct!(Cmd::Import {
            options,
            course,
            archive
        })
        .to_options()
        .command("import")
        .help("Import an archive into an existing course")
    };

    let export = {
        let backup = long("backup")
            .help("Keep identifiers and role assignments")
            .switch();
        let salt = long("salt")
            .help("Salt mixed into identifiers")
            .argument::<String>("SALT")
            .optional();
        let out = long("out")
            .short('o')
            .help("Directory to write the zip file to")
            .argument::<PathBuf>("DIR")
            .optional();
        let course = c();
        construct!(Cmd::Export {
            backup,
            salt,
            out,
            course
        })
        .to_options()
        .command("export")
        .help("Export a course to a zip file")
    };

    let lock = construct!(Cmd::Lock(c()))
        .to_options()
        .command("lock")
        .help("Lock the content of a course and its sections");

    let roles = {
        let grant = construct!(RolesCmd::Grant(c(), r(), p()))
            .to_options()
            .command("grant")
            .help("Grant a role on a course");
        let revoke = construct!(RolesCmd::Revoke(c(), r(), p()))
            .to_options()
            .command("revoke")
            .help("Revoke a role on a course");
        let list = construct!(RolesCmd::List(c()))
            .to_options()
            .command("list")
            .help("List role assignments of a course");
        construct!([grant, revoke, list])
            .to_options()
            .command("roles")
            .help("Manage instructor and editor roles")
            .map(Cmd::Roles)
    };

    let list = {
        let site = long("site")
            .help("Site to list; the default site when omitted")
            .argument::<String>("SITE")
            .optional();
        construct!(Cmd::List(site))
            .to_options()
            .command("list")
            .help("List the courses of a site")
    };

    let user = long("as")
        .help("Act as this user and enforce course permissions")
        .argument::<String>("USER")
        .optional();
    let site_admin = long("site-admin")
        .help("The acting user is a site administrator")
        .switch();
    let cmd = construct!([create, import, export, lock, roles, list]);

    construct!(Opts {
        user,
        site_admin,
        cmd
    })
    .to_options()
        .descr("Course administration: create, import, export, lock and staff courses")
        .run()
}

fn main() -> Result<()> {
    dotenv().ok();
    let cfg = config::ensure_initialized().context("Failed to read configuration")?;

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    tracing_subscriber::registry()
        .with(fmt)
        .with(cfg.log_level())
        .init();

    let Opts {
        user,
        site_admin,
        cmd,
    } = options();
    let mut ctx = AdminContext::from_config(&cfg);
    if let Some(user) = user {
        let principal = if site_admin {
            Principal::admin(user)
        } else {
            Principal::user(user)
        };
        ctx = ctx.acting_as(principal);
    }
    let store = SiteStore::new(cfg.site_file(), cfg.default_site());
    let mut registry = store
        .load()
        .with_context(|| format!("Failed to load {}", store.path().display()))?;

    let dirty = match cmd {
        Cmd::Create {
            catalog,
            create_level,
            options,
            admin_level,
            key,
            archive,
        } => {
            let request = CreateCourseRequest {
                admin_level: Some(admin_level),
                key: Some(key),
                archive: Some(archive),
                catalog,
                ..Default::default()
            }
            .validate()?
            .with_options(options)
            .with_create_level(create_level);
            let course = create_course(&ctx, &mut registry, &request)?;
            println!(
                "{} {} ({} sections)",
                "Created".green().bold(),
                course.catalog.ntiid(),
                course.sections.len()
            );
            true
        }
        Cmd::Import {
            options,
            course,
            archive,
        } => {
            let mut request = ImportCourseRequest {
                course: Some(course),
                archive: Some(archive),
                ..Default::default()
            }
            .validate()?;
            request.options = options;
            let course = import_course(
                &ctx,
                &mut registry,
                &request.course,
                &request.archive,
                request.options,
            )?;
            println!("{} {}", "Imported into".green().bold(), course.catalog.ntiid());
            true
        }
        Cmd::Export {
            backup,
            salt,
            out,
            course,
        } => {
            let options = ExportOptions::builder()
                .backup(backup)
                .maybe_salt(salt)
                .maybe_output_dir(out)
                .build();
            let path = export_course_ref(&ctx, &registry, &course, &options)?;
            println!("{} {}", "Exported to".green().bold(), path.display());
            false
        }
        Cmd::Lock(course) => {
            let course = registry.resolve_mut(&course)?;
            authorize(ctx.principal(), &editing_policy(), course, "lock")?;
            let report = lock_course_tree(course, ctx.events());
            println!(
                "{} {} of {} nodes",
                "Locked".green().bold(),
                report.locked.len(),
                report.visited
            );
            !report.locked.is_empty()
        }
        Cmd::Roles(roles) => match roles {
            RolesCmd::Grant(course, role, principal) => {
                let course = registry.resolve_mut(&course)?;
                require_admin(ctx.principal(), "manage roles on", course.catalog.ntiid())?;
                if !grant_role(course, role, &principal) {
                    eprintln!("{} already holds {role}", principal.yellow());
                }
                true
            }
            RolesCmd::Revoke(course, role, principal) => {
                let course = registry.resolve_mut(&course)?;
                require_admin(ctx.principal(), "manage roles on", course.catalog.ntiid())?;
                if !revoke_role(course, role, &principal) {
                    eprintln!("{} does not hold {role}", principal.yellow());
                }
                true
            }
            RolesCmd::List(course) => {
                println!("{}", roles_table(registry.resolve(&course)?));
                false
            }
        },
        Cmd::List(site) => {
            println!("{}", courses_table(&course_rows(&registry, site.as_deref())?));
            false
        }
    };

    if dirty {
        store
            .save(&registry)
            .with_context(|| format!("Failed to save {}", store.path().display()))?;
    }

    Ok(())
}
