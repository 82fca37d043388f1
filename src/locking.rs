#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use crate::{
    events::{ContentEvent, EventSink},
    model::{Course, LessonItem, LessonOverview, Lockable, OutlineNode},
};

/// Outcome of a locking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockReport {
    /// Nodes visited, whether or not they were locked.
    pub visited: usize,
    /// NTIIDs locked by this pass, in visiting order.
    pub locked:  Vec<String>,
}

impl LockReport {
    /// Folds another report into this one.
    fn absorb(&mut self, other: LockReport) {
        self.visited += other.visited;
        self.locked.extend(other.locked);
    }
}

/// Depth-first walker locking recordable, non-media content of a course.
///
/// Outline nodes other than the outline container are locked, then the
/// lesson overview each node presents, then every asset and nested item
/// container of that lesson. Nodes that are already locked are left alone,
/// so a second pass locks nothing and fires nothing.
pub struct LockingWalker<'a> {
    /// Receiver of `Modified` notifications.
    events: &'a dyn EventSink,
    /// Report being accumulated.
    report: LockReport,
}

impl<'a> LockingWalker<'a> {
    /// Walker notifying `events`.
    pub fn new(events: &'a dyn EventSink) -> Self {
        Self {
            events,
            report: LockReport::default(),
        }
    }

    /// Locks `course` (not its sections) and returns what was done.
    pub fn walk(mut self, course: &mut Course) -> LockReport {
        let Course {
            outline, lessons, ..
        } = course;
        self.visit_outline(outline, lessons);
        self.report
    }

    /// Locks `node` when it is recordable, not media, and not yet locked.
    fn lock(&mut self, node: &mut dyn Lockable) {
        self.report.visited += 1;
        if !node.is_recordable() || node.is_media() || node.is_locked() {
            return;
        }
        node.set_locked(true);
        self.events.notify(&ContentEvent::Modified {
            ntiid: node.ntiid().to_string(),
            tag:   node.tag(),
        });
        self.report.locked.push(node.ntiid().to_string());
    }

    /// Visits an outline node, its lesson, then its children.
    fn visit_outline(
        &mut self,
        node: &mut OutlineNode,
        lessons: &mut BTreeMap<String, LessonOverview>,
    ) {
        if !node.container {
            self.lock(node);
        }
        if let Some(lesson) = node.lesson.as_deref().and_then(|id| lessons.get_mut(id)) {
            self.visit_lesson(lesson);
        }
        for child in node.children.iter_mut() {
            self.visit_outline(child, lessons);
        }
    }

    /// Visits a lesson overview and its items.
    fn visit_lesson(&mut self, lesson: &mut LessonOverview) {
        self.lock(lesson);
        self.visit_items(&mut lesson.items);
    }

    /// Visits assets and containers, recursing into containers.
    fn visit_items(&mut self, items: &mut [LessonItem]) {
        for item in items {
            match item {
                LessonItem::Asset(asset) => self.lock(asset),
                LessonItem::Container(container) => {
                    self.lock(container);
                    self.visit_items(&mut container.items);
                }
            }
        }
    }
}

/// Locks the content of `course` itself.
pub fn lock_course(course: &mut Course, events: &dyn EventSink) -> LockReport {
    let report = LockingWalker::new(events).walk(course);
    info!(
        "Locked {} of {} nodes in {}",
        report.locked.len(),
        report.visited,
        course.catalog.ntiid()
    );
    report
}

/// Locks `course` and, recursively, every one of its sections.
pub fn lock_course_tree(course: &mut Course, events: &dyn EventSink) -> LockReport {
    let mut report = lock_course(course, events);
    for section in course.sections.values_mut() {
        report.absorb(lock_course_tree(section, events));
    }
    report
}

/// NTIIDs of every locked outline node, lesson, asset and container of
/// `course` (sections excluded).
pub fn locked_ntiids(course: &Course) -> BTreeSet<String> {
    /// Collects locked items recursively.
    fn collect_items(out: &mut BTreeSet<String>, items: &[LessonItem]) {
        for item in items {
            match item {
                LessonItem::Asset(a) if a.locked => {
                    out.insert(a.ntiid.clone());
                }
                LessonItem::Asset(_) => {}
                LessonItem::Container(c) => {
                    if c.locked {
                        out.insert(c.ntiid.clone());
                    }
                    collect_items(out, &c.items);
                }
            }
        }
    }

    let mut out: BTreeSet<String> = course
        .outline
        .iter()
        .filter(|n| n.locked)
        .map(|n| n.ntiid.clone())
        .collect();
    for lesson in course.lessons.values() {
        if lesson.locked {
            out.insert(lesson.ntiid.clone());
        }
        collect_items(&mut out, &lesson.items);
    }
    out
}
