use serde::{Deserialize, Serialize};

/// A possibly dotted name such as `Outer.Inner.Leaf`.
///
/// The chain leans right: the head segment is the outermost namespace and the
/// terminal link (the one without `right`) is the identifier actually referenced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub segment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<QualifiedName>>,
}

impl QualifiedName {
    /// A single-segment name.
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            right: None,
        }
    }

    /// Build a chain from its segments, head first. Returns `None` for an empty list.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        segments.into_iter().rev().fold(None, |right, segment| {
            Some(Self {
                segment: segment.into(),
                right: right.map(Box::new),
            })
        })
    }

    /// Parse dotted text. Empty segments are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Self::from_segments(parts)
    }

    pub fn is_qualified(&self) -> bool {
        self.right.is_some()
    }

    pub fn segments(&self) -> Segments<'_> {
        Segments { next: Some(self) }
    }

    /// The rightmost segment, i.e. the referenced identifier.
    pub fn leaf(&self) -> &str {
        let mut current = self;
        while let Some(right) = &current.right {
            current = right;
        }
        &current.segment
    }

    /// Render the chain as a slash separated path (`Outer/Inner/Leaf`).
    pub fn to_path(&self) -> String {
        self.segments().collect::<Vec<_>>().join("/")
    }
}

/// Iterator over the segments of a [`QualifiedName`], head first.
pub struct Segments<'a> {
    next: Option<&'a QualifiedName>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.right.as_deref();
        Some(&current.segment)
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segment)?;
        if let Some(right) = &self.right {
            write!(f, ".{}", right)?;
        }
        Ok(())
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| Self::new(s))
    }
}
