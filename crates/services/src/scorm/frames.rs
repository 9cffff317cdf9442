//! Window hierarchy the content runs in.
//!
//! Content is launched inside nested frames, possibly in a pop-up window
//! whose opener holds the LMS. [`FrameHost`] exposes exactly the lookups
//! discovery needs so the hierarchy can be injected instead of read from
//! ambient globals.

use std::sync::Arc;

use selector_core::scorm::{Scorm12Api, Scorm2004Api};

/// Opaque handle to one window or frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Read-only view of a window hierarchy.
pub trait FrameHost: Send + Sync {
    /// Frame the content itself runs in.
    fn current(&self) -> FrameId;

    /// Enclosing frame, or `None` for a top-level window. A frame that is its
    /// own parent is also treated as top-level.
    fn parent(&self, frame: FrameId) -> Option<FrameId>;

    /// Window that opened `frame`'s window, if any.
    fn opener(&self, frame: FrameId) -> Option<FrameId>;

    /// `API_1484_11` bound on this frame.
    fn api_2004(&self, frame: FrameId) -> Option<Arc<dyn Scorm2004Api>>;

    /// `API` bound on this frame.
    fn api_12(&self, frame: FrameId) -> Option<Arc<dyn Scorm12Api>>;
}

#[derive(Default, Clone)]
struct FrameNode {
    parent: Option<FrameId>,
    opener: Option<FrameId>,
    api_12: Option<Arc<dyn Scorm12Api>>,
    api_2004: Option<Arc<dyn Scorm2004Api>>,
}

/// In-memory window hierarchy.
///
/// Starts with a single top-level window that is also the current frame.
#[derive(Clone)]
pub struct FrameTree {
    frames: Vec<FrameNode>,
    current: FrameId,
}

impl Default for FrameTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![FrameNode::default()],
            current: FrameId(0),
        }
    }

    /// The window created by [`FrameTree::new`].
    #[must_use]
    pub fn top(&self) -> FrameId {
        FrameId(0)
    }

    /// Add a frame nested inside `parent`.
    pub fn add_child(&mut self, parent: FrameId) -> FrameId {
        self.push(FrameNode {
            parent: Some(parent),
            ..FrameNode::default()
        })
    }

    /// Add a new top-level window.
    pub fn add_window(&mut self) -> FrameId {
        self.push(FrameNode::default())
    }

    /// Add a chain of `depth` nested frames below `root` and return the innermost.
    pub fn add_chain(&mut self, root: FrameId, depth: usize) -> FrameId {
        (0..depth).fold(root, |parent, _| self.add_child(parent))
    }

    /// Re-point a frame's parent. Allows building cycles.
    pub fn set_parent(&mut self, frame: FrameId, parent: Option<FrameId>) {
        if let Some(node) = self.frames.get_mut(frame.0) {
            node.parent = parent;
        }
    }

    pub fn set_opener(&mut self, frame: FrameId, opener: FrameId) {
        if let Some(node) = self.frames.get_mut(frame.0) {
            node.opener = Some(opener);
        }
    }

    pub fn set_current(&mut self, frame: FrameId) {
        if frame.0 < self.frames.len() {
            self.current = frame;
        }
    }

    pub fn bind_12(&mut self, frame: FrameId, api: Arc<dyn Scorm12Api>) {
        if let Some(node) = self.frames.get_mut(frame.0) {
            node.api_12 = Some(api);
        }
    }

    pub fn bind_2004(&mut self, frame: FrameId, api: Arc<dyn Scorm2004Api>) {
        if let Some(node) = self.frames.get_mut(frame.0) {
            node.api_2004 = Some(api);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn push(&mut self, node: FrameNode) -> FrameId {
        self.frames.push(node);
        FrameId(self.frames.len() - 1)
    }

    fn node(&self, frame: FrameId) -> Option<&FrameNode> {
        self.frames.get(frame.0)
    }
}

impl FrameHost for FrameTree {
    fn current(&self) -> FrameId {
        self.current
    }

    fn parent(&self, frame: FrameId) -> Option<FrameId> {
        self.node(frame).and_then(|node| node.parent)
    }

    fn opener(&self, frame: FrameId) -> Option<FrameId> {
        self.node(frame).and_then(|node| node.opener)
    }

    fn api_2004(&self, frame: FrameId) -> Option<Arc<dyn Scorm2004Api>> {
        self.node(frame).and_then(|node| node.api_2004.clone())
    }

    fn api_12(&self, frame: FrameId) -> Option<Arc<dyn Scorm12Api>> {
        self.node(frame).and_then(|node| node.api_12.clone())
    }
}
