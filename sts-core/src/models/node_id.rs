use super::Level;
use std::{borrow::Borrow, fmt};

/// The separator between path segments of a node id.
const SEPARATOR: char = ':';

/// A hierarchy node id: the colon-joined path from the supplier down to the
/// node, e.g. `supplier`, `supplier:brand`, `supplier:brand:type` or
/// `supplier:brand:type:article`.
///
/// The number of segments is the node's [`Level`]. Each distinct path prefix
/// maps to exactly one id, so ids double as the keys of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(transparent))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct NodeId(String);

impl NodeId {
    /// Join path segments into an id.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let mut id = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                id.push(SEPARATOR);
            }
            id.push_str(segment.as_ref());
        }
        Self(id)
    }

    /// The id of the child of this node named `segment`.
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}{SEPARATOR}{segment}", self.0))
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The level of the node, or None if the id has more than four segments.
    pub fn level(&self) -> Option<Level> {
        Level::of(&self.0)
    }

    /// The id of the node directly above this one.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once(SEPARATOR)
            .map(|(parent, _)| Self(parent.to_owned()))
    }

    /// The path segments of the id, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// The display name of the node at `level`, i.e. the segment at that
    /// level's depth. Defaults to the node's own level. Returns an empty
    /// string when the id is too shallow.
    pub fn name(&self, level: Option<Level>) -> &str {
        let Some(level) = level.or_else(|| self.level()) else {
            return "";
        };
        self.segments().nth(level.depth()).unwrap_or("")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_segments() {
        let id = NodeId::from_segments(&["acme", "zen", "shoes", "A-1"]);
        assert_eq!(id.as_str(), "acme:zen:shoes:A-1");
        assert_eq!(id.level(), Some(Level::Article));
        assert_eq!(NodeId::from_segments(&["acme"]).level(), Some(Level::Supplier));
    }

    #[test]
    fn test_parent_chain() {
        let id = NodeId::from("acme:zen:shoes");
        let parent = id.parent().unwrap();
        assert_eq!(parent.as_str(), "acme:zen");
        assert_eq!(parent.parent().unwrap().as_str(), "acme");
        assert_eq!(NodeId::from("acme").parent(), None);
        assert_eq!(parent.child("shoes"), id);
    }

    #[test]
    fn test_name() {
        let id = NodeId::from("acme:zen:shoes:A-1");
        assert_eq!(id.name(None), "A-1");
        assert_eq!(id.name(Some(Level::Brand)), "zen");
        assert_eq!(NodeId::from("acme").name(Some(Level::Type)), "");
    }

    #[test]
    fn test_empty_segments_keep_their_level() {
        let id = NodeId::from_segments(&["acme", "", "shoes"]);
        assert_eq!(id.as_str(), "acme::shoes");
        assert_eq!(id.level(), Some(Level::Type));
        assert_eq!(id.name(Some(Level::Brand)), "");
    }
}
