//! HIR node identity.

use jacy_resolve::DefId;

/// Index of a node within its owner. The owner's own node is always
/// child 0.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ChildId(pub u32);

impl ChildId {
    /// The owner's own slot.
    pub const OWNER: ChildId = ChildId(0);

    pub fn is_owner(self) -> bool {
        self == Self::OWNER
    }
}

/// Identity of a HIR node: owning definition plus child index.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HirId {
    pub owner: DefId,
    pub child: ChildId,
}

impl HirId {
    /// Sentinel for "not yet assigned". Distinct from any owner's
    /// child 0 and never inserted into any map.
    pub const DUMMY: HirId = HirId {
        owner: DefId::DUMMY,
        child: ChildId::OWNER,
    };

    pub fn new(owner: DefId, child: ChildId) -> Self {
        Self { owner, child }
    }

    /// The id of an owner's own node.
    pub fn owner_of(owner: DefId) -> Self {
        Self {
            owner,
            child: ChildId::OWNER,
        }
    }

    pub fn is_dummy(self) -> bool {
        self.owner.is_dummy()
    }
}

impl std::fmt::Debug for HirId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_dummy() {
            write!(f, "HirId(DUMMY)")
        } else {
            write!(f, "HirId({:?}.{})", self.owner, self.child.0)
        }
    }
}

/// Handle to a body stored in its owner's body map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BodyId(pub HirId);

impl BodyId {
    pub fn hir_id(self) -> HirId {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_child_is_zero_and_distinct_from_dummy() {
        let owner = HirId::owner_of(DefId::ROOT);
        assert!(owner.child.is_owner());
        assert!(!owner.is_dummy());
        assert!(HirId::DUMMY.is_dummy());
        assert_ne!(owner, HirId::DUMMY);
    }
}
