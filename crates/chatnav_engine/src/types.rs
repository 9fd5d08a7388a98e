/// A synthetic bounding box in document coordinates (pixels, y grows
/// downward). Produced by the flow layout pass, consumed by dedup and
/// scroll math.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

/// Element identity as the child-element index path from the document
/// root. The path neither owns nor pins the element: after a re-parse it
/// resolves to whatever now sits at that position, and to nothing when
/// the branch is gone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodePath(Vec<u32>);

impl NodePath {
    pub fn new(segments: Vec<u32>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }
}

/// One scanner finding, before any dedup decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit {
    pub path: NodePath,
    /// Raw element text; display normalization is the tracker's business.
    pub text: String,
    pub bounds: BoundingBox,
    /// The element is, or contains, a text-input control.
    pub editable: bool,
}

/// Everything one scan pass produced: new findings plus refreshed
/// geometry for elements the caller already tracks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanOutcome {
    pub hits: Vec<ScanHit>,
    pub refreshed: Vec<(NodePath, BoundingBox)>,
}

/// Which net a scan pass casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPass {
    /// Startup (or post-switch) pass: platform selectors inside
    /// conversation containers, falling back to the heuristic walk.
    Startup,
    /// Mutation sweep: heuristic classification over container-like
    /// elements across the whole document.
    Sweep,
}
