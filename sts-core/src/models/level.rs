/// The depth of a node in the hierarchy, supplier being the root and article
/// the leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Level {
    /// Root level, one node per supplier
    Supplier,
    /// A supplier's brand
    Brand,
    /// A brand's product type
    Type,
    /// A single product (leaf)
    Article,
}

impl Level {
    /// All levels from the root down to the leaves.
    pub const ORDERED: [Level; 4] = [Level::Supplier, Level::Brand, Level::Type, Level::Article];

    /// The level whose ids have `segments` path segments.
    pub fn from_segments(segments: usize) -> Option<Self> {
        segments
            .checked_sub(1)
            .and_then(|depth| Self::ORDERED.get(depth))
            .copied()
    }

    /// The level of a node id, determined by its number of colon separators.
    pub fn of(id: &str) -> Option<Self> {
        Self::ORDERED
            .get(id.bytes().filter(|&b| b == b':').count())
            .copied()
    }

    /// Zero-based depth, also the index of this level's segment in a node id.
    pub fn depth(&self) -> usize {
        *self as usize
    }

    /// The level directly above this one.
    pub fn parent(&self) -> Option<Self> {
        self.depth()
            .checked_sub(1)
            .map(|depth| Self::ORDERED[depth])
    }

    /// The level directly below this one.
    pub fn child(&self) -> Option<Self> {
        Self::ORDERED.get(self.depth() + 1).copied()
    }

    /// A human-readable label for the hierarchy column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Supplier => "Supplier",
            Self::Brand => "Brand",
            Self::Type => "Type",
            Self::Article => "Article",
        }
    }
}
