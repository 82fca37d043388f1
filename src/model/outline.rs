#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

/// Closed set of content node capabilities the locking walker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeTag {
    /// A node of the course outline (including the outline root).
    Outline,
    /// A lesson overview attached to an outline node.
    Lesson,
    /// A concrete asset inside a lesson.
    Asset,
    /// A nested item container (group, media roll, slide deck) inside a lesson.
    Container,
}

/// Capabilities shared by every node the locking walker may touch.
pub trait Lockable {
    /// NTIID of this node.
    fn ntiid(&self) -> &str;
    /// Which kind of node this is.
    fn tag(&self) -> NodeTag;
    /// Whether this node records a locked state at all.
    fn is_recordable(&self) -> bool;
    /// Media items are never locked.
    fn is_media(&self) -> bool {
        false
    }
    /// Current locked flag.
    fn is_locked(&self) -> bool;
    /// Sets the locked flag.
    fn set_locked(&mut self, locked: bool);
}

/// serde default for the `recordable` flags.
fn recordable() -> bool {
    true
}

/// A node of the course outline tree.
///
/// The root of a course outline is the only node with `container == true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// NTIID of this node.
    pub ntiid:      String,
    /// Display title.
    #[serde(default)]
    pub title:      String,
    /// True for the outline root only.
    #[serde(default)]
    pub container:  bool,
    /// NTIID of the lesson overview presented by this node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson:     Option<String>,
    /// Whether the node records a locked state.
    #[serde(default = "recordable")]
    pub recordable: bool,
    /// Locked flag.
    #[serde(default)]
    pub locked:     bool,
    /// Children in insertion order.
    #[serde(default)]
    pub children:   Vec<OutlineNode>,
}

impl OutlineNode {
    /// Creates an empty outline root.
    pub fn root(ntiid: impl Into<String>) -> Self {
        Self {
            ntiid:      ntiid.into(),
            title:      "Outline".into(),
            container:  true,
            lesson:     None,
            recordable: false,
            locked:     false,
            children:   Vec::new(),
        }
    }

    /// Creates a regular (non-container) outline node.
    pub fn new(ntiid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            ntiid:      ntiid.into(),
            title:      title.into(),
            container:  false,
            lesson:     None,
            recordable: true,
            locked:     false,
            children:   Vec::new(),
        }
    }

    /// Attaches a lesson overview reference.
    pub fn with_lesson(mut self, lesson: impl Into<String>) -> Self {
        self.lesson = Some(lesson.into());
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: OutlineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first, pre-order iterator over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &OutlineNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Finds a node by NTIID anywhere below (and including) this node.
    pub fn find(&self, ntiid: &str) -> Option<&OutlineNode> {
        self.iter().find(|n| n.ntiid == ntiid)
    }
}

impl Lockable for OutlineNode {
    fn ntiid(&self) -> &str {
        &self.ntiid
    }

    fn tag(&self) -> NodeTag {
        NodeTag::Outline
    }

    fn is_recordable(&self) -> bool {
        self.recordable && !self.container
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

/// Kinds of concrete lesson assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// A video; media.
    Video,
    /// An audio recording; media.
    Audio,
    /// A single presentation slide.
    Slide,
    /// A related-work reference or uploaded document.
    #[default]
    Document,
    /// An external link.
    Link,
    /// A timeline.
    Timeline,
    /// An assignment or question set reference.
    Evaluation,
}

impl AssetKind {
    /// Whether assets of this kind are media items.
    pub fn is_media(self) -> bool {
        matches!(self, AssetKind::Video | AssetKind::Audio)
    }
}

/// A concrete asset presented in a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// NTIID of the asset.
    pub ntiid:      String,
    /// Display title.
    #[serde(default)]
    pub title:      String,
    /// Asset kind.
    #[serde(default)]
    pub kind:       AssetKind,
    /// Target location, when the asset points somewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href:       Option<String>,
    /// Whether the asset records a locked state.
    #[serde(default = "recordable")]
    pub recordable: bool,
    /// Locked flag.
    #[serde(default)]
    pub locked:     bool,
}

impl Asset {
    /// Creates a recordable, unlocked asset.
    pub fn new(ntiid: impl Into<String>, title: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            ntiid: ntiid.into(),
            title: title.into(),
            kind,
            href: None,
            recordable: true,
            locked: false,
        }
    }
}

impl Lockable for Asset {
    fn ntiid(&self) -> &str {
        &self.ntiid
    }

    fn tag(&self) -> NodeTag {
        NodeTag::Asset
    }

    fn is_recordable(&self) -> bool {
        self.recordable
    }

    fn is_media(&self) -> bool {
        self.kind.is_media()
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

/// A container of lesson items: an overview group, a media roll, a slide deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemContainer {
    /// NTIID of the container.
    pub ntiid:      String,
    /// Display title.
    #[serde(default)]
    pub title:      String,
    /// Whether the container records a locked state.
    #[serde(default = "recordable")]
    pub recordable: bool,
    /// Locked flag.
    #[serde(default)]
    pub locked:     bool,
    /// Nested items in insertion order.
    #[serde(default)]
    pub items:      Vec<LessonItem>,
}

impl ItemContainer {
    /// Creates an empty recordable container.
    pub fn new(ntiid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            ntiid:      ntiid.into(),
            title:      title.into(),
            recordable: true,
            locked:     false,
            items:      Vec::new(),
        }
    }

    /// Appends an item.
    pub fn with_item(mut self, item: impl Into<LessonItem>) -> Self {
        self.items.push(item.into());
        self
    }
}

impl Lockable for ItemContainer {
    fn ntiid(&self) -> &str {
        &self.ntiid
    }

    fn tag(&self) -> NodeTag {
        NodeTag::Container
    }

    fn is_recordable(&self) -> bool {
        self.recordable
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

/// An entry of a lesson overview or of a nested item container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonItem {
    /// A concrete asset.
    Asset(Asset),
    /// A nested container.
    Container(ItemContainer),
}

impl From<Asset> for LessonItem {
    fn from(asset: Asset) -> Self {
        LessonItem::Asset(asset)
    }
}

impl From<ItemContainer> for LessonItem {
    fn from(container: ItemContainer) -> Self {
        LessonItem::Container(container)
    }
}

impl LessonItem {
    /// NTIID of the wrapped node.
    pub fn ntiid(&self) -> &str {
        match self {
            LessonItem::Asset(a) => &a.ntiid,
            LessonItem::Container(c) => &c.ntiid,
        }
    }
}

/// The lesson presented by an outline node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonOverview {
    /// NTIID of the lesson overview.
    pub ntiid:      String,
    /// Display title.
    #[serde(default)]
    pub title:      String,
    /// Whether the lesson records a locked state.
    #[serde(default = "recordable")]
    pub recordable: bool,
    /// Locked flag.
    #[serde(default)]
    pub locked:     bool,
    /// Top-level items, usually overview groups.
    #[serde(default)]
    pub items:      Vec<LessonItem>,
}

impl LessonOverview {
    /// Creates an empty recordable lesson overview.
    pub fn new(ntiid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            ntiid:      ntiid.into(),
            title:      title.into(),
            recordable: true,
            locked:     false,
            items:      Vec::new(),
        }
    }

    /// Appends an item.
    pub fn with_item(mut self, item: impl Into<LessonItem>) -> Self {
        self.items.push(item.into());
        self
    }
}

impl Lockable for LessonOverview {
    fn ntiid(&self) -> &str {
        &self.ntiid
    }

    fn tag(&self) -> NodeTag {
        NodeTag::Lesson
    }

    fn is_recordable(&self) -> bool {
        self.recordable
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_iter_is_depth_first_in_insertion_order() {
        let outline = OutlineNode::root("root")
            .with_child(
                OutlineNode::new("u1", "Unit 1")
                    .with_child(OutlineNode::new("l1", "Lesson 1"))
                    .with_child(OutlineNode::new("l2", "Lesson 2")),
            )
            .with_child(OutlineNode::new("u2", "Unit 2"));

        let order: Vec<_> = outline.iter().map(|n| n.ntiid.as_str()).collect();
        assert_eq!(order, ["root", "u1", "l1", "l2", "u2"]);
        assert!(outline.find("l2").is_some());
        assert!(!outline.is_recordable());
    }

    #[test]
    fn lesson_items_round_trip_through_tagged_json() {
        let lesson = LessonOverview::new("lesson", "Week 1").with_item(
            ItemContainer::new("group", "Readings")
                .with_item(Asset::new("video", "Intro", AssetKind::Video)),
        );
        let json = serde_json::to_value(&lesson).expect("serialize lesson");
        assert_eq!(json["items"][0]["type"], "container");
        assert_eq!(json["items"][0]["items"][0]["kind"], "video");

        let back: LessonOverview = serde_json::from_value(json).expect("deserialize lesson");
        assert_eq!(back, lesson);
    }
}
