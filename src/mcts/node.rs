use crate::game::Board;

/// Handle of a [`Node`] in the [`super::SearchTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) u32);

impl NodeId {
    pub(super) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One board state in the search tree.
///
/// Statistics are always kept from the perspective of the first player:
/// `wins` counts playouts won by [`crate::Player::First`], `total` counts all
/// playouts (ties included) that went through the node.
#[derive(Clone, Debug)]
pub struct Node {
    state: Board,
    /// Column played from the parent's board to reach this one. `None` for a
    /// node created as a root.
    column: Option<u8>,
    wins: u32,
    total: u32,
    children: Vec<NodeId>,
    /// Non-owning link used for backpropagation only.
    parent: Option<NodeId>,
}

impl Node {
    pub(super) fn new(state: Board, column: Option<u8>, parent: Option<NodeId>) -> Self {
        Self {
            state,
            column,
            wins: 0,
            total: 0,
            children: Vec::new(),
            parent,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn state(&self) -> &Board {
        &self.state
    }

    /// Column that leads from the parent's board to this one.
    #[must_use]
    pub const fn column(&self) -> Option<u8> {
        self.column
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns `true` once at least one backpropagation went through the
    /// node.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.total > 0
    }

    /// Fraction of playouts through this node won by the first player, 0 for
    /// an unvisited node.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visited() {
            f64::from(self.wins) / f64::from(self.total)
        } else {
            0.0
        }
    }

    pub(super) fn add_win(&mut self) {
        self.wins += 1;
        self.total += 1;
    }

    pub(super) fn add_loss(&mut self) {
        self.total += 1;
    }

    pub(super) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(super) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(super) fn replace_children(&mut self, children: Vec<NodeId>) {
        self.children = children;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::game::Dimensions;

    #[test]
    fn statistics() {
        let mut node = Node::new(Board::new(Dimensions::STANDARD), None, None);
        assert!(!node.visited());
        assert!(node.win_rate().abs() < 1e-9);

        node.add_win();
        node.add_loss();
        node.add_loss();
        node.add_win();
        assert_eq!(node.wins(), 2);
        assert_eq!(node.total(), 4);
        assert!(node.visited());
        assert!((node.win_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn links() {
        let mut node = Node::new(Board::new(Dimensions::STANDARD), Some(3), Some(NodeId(0)));
        assert_eq!(node.column(), Some(3));
        assert_eq!(node.parent(), Some(NodeId(0)));
        node.push_child(NodeId(5));
        node.push_child(NodeId(6));
        assert_eq!(node.children(), &[NodeId(5), NodeId(6)]);
        node.set_parent(None);
        assert_eq!(node.parent(), None);
    }
}
