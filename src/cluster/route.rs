use crate::cluster::{BBox, Detection};

///
/// A cluster of detections judged to form one coherent real-world grouping,
/// e.g. same-color holds forming a path up the wall. A route has no identity
/// beyond its membership and is never empty.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    members: Vec<Detection>,
}

impl Route {
    /// `members` must be non-empty; both clustering strategies only ever
    /// emit non-empty groups.
    pub(crate) fn new(members: Vec<Detection>) -> Self {
        debug_assert!(!members.is_empty());
        Self { members }
    }

    #[inline]
    pub fn members(&self) -> &[Detection] {
        self.members.as_slice()
    }

    #[inline]
    pub fn into_members(self) -> Vec<Detection> {
        self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Class of the first member. Color-grouped routes are single-class, so
    /// for them this is the class of every member; density-based routes may
    /// mix classes and this is only the first one encountered.
    #[inline]
    pub fn class_id(&self) -> u32 {
        self.members[0].class_id
    }

    /// Smallest box covering every member.
    pub fn bounding_box(&self) -> BBox {
        self.members
            .iter()
            .skip(1)
            .fold(self.members[0].bbox, |acc, det| acc.merge(&det.bbox))
    }
}
