use serde::{Deserialize, Serialize};

/// Immediate relatives of one contour within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Index of the enclosing contour, if any.
    pub parent: Option<usize>,
    /// Index of the first directly nested contour, if any.
    pub first_child: Option<usize>,
}

/// Parent/child relations between nested contours of a single frame.
///
/// Supplied by the upstream contour extractor alongside the contour list and
/// indexed the same way. Read-only; lives for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourHierarchy {
    nodes: Vec<HierarchyNode>,
}

impl ContourHierarchy {
    pub fn new(nodes: Vec<HierarchyNode>) -> Self {
        Self { nodes }
    }

    /// Hierarchy with `len` unrelated contours.
    pub fn flat(len: usize) -> Self {
        Self {
            nodes: vec![HierarchyNode::default(); len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First child of contour `index`, or `None` when it has no children or
    /// the index is out of range.
    pub fn first_child(&self, index: usize) -> Option<usize> {
        self.nodes.get(index)?.first_child
    }

    /// Parent of contour `index`, if any.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.nodes.get(index)?.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_respect_bounds() {
        let h = ContourHierarchy::new(vec![
            HierarchyNode {
                parent: None,
                first_child: Some(1),
            },
            HierarchyNode {
                parent: Some(0),
                first_child: None,
            },
        ]);
        assert_eq!(h.first_child(0), Some(1));
        assert_eq!(h.parent(1), Some(0));
        assert_eq!(h.first_child(1), None);
        assert_eq!(h.first_child(5), None);
    }

    #[test]
    fn flat_hierarchy_has_no_relations() {
        let h = ContourHierarchy::flat(3);
        assert_eq!(h.len(), 3);
        for i in 0..3 {
            assert_eq!(h.first_child(i), None);
            assert_eq!(h.parent(i), None);
        }
    }
}
