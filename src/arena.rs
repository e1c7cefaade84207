//! Slot storage for the nodes of a skip list.
//!
//! Nodes link to each other through [`NodeId`] handles instead of pointers.
//! A node is owned by its slot until it is freed, so unlinking a node and
//! releasing it can never leave a dangling reference behind: the worst a stale
//! handle can do is hit an empty slot, which is caught by a panic in debug and
//! release builds alike.

use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    slots_: Vec<Option<Node<K, V>>>,
    // Slots released by `free`, reused before the vector grows.
    free_: Vec<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Arena<K, V> {
        Arena {
            slots_: Vec::new(),
            free_: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free_.pop() {
            Some(id) => {
                debug_assert!(self.slots_[id.index()].is_none());
                self.slots_[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::new(self.slots_.len());
                self.slots_.push(Some(node));
                id
            }
        }
    }

    /// Takes the node out of its slot and makes the slot available again.
    pub fn free(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots_[id.index()]
            .take()
            .unwrap_or_else(|| panic!("node {} freed twice", id.index()));
        self.free_.push(id);
        node
    }

    pub fn get(&self, id: NodeId) -> &Node<K, V> {
        match self.slots_[id.index()] {
            Some(ref node) => node,
            None => panic!("dangling node handle {}", id.index()),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots_[id.index()] {
            Some(ref mut node) => node,
            None => panic!("dangling node handle {}", id.index()),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots_.len() - self.free_.len()
    }

    pub fn clear(&mut self) {
        self.slots_.clear();
        self.free_.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_get() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, "a", 0));
        let b = arena.alloc(Node::new(2, "b", 3));
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(*arena.get(a).value(), "a");
        assert_eq!(arena.get(b).level(), 3);

        *arena.get_mut(b).value_mut() = "c";
        assert_eq!(*arena.get(b).value(), "c");
    }

    #[test]
    fn free_recycles_slot() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, 10, 0));
        let _b = arena.alloc(Node::new(2, 20, 0));

        let freed = arena.free(a);
        assert_eq!(freed.into_parts(), (1, 10));
        assert_eq!(arena.len(), 1);

        let c = arena.alloc(Node::new(3, 30, 1));
        assert_eq!(c, a);
        assert_eq!(arena.len(), 2);
        assert_eq!(*arena.get(c).value(), 30);
    }

    #[test]
    #[should_panic]
    fn get_freed_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, 10, 0));
        arena.free(a);
        arena.get(a);
    }

    #[test]
    fn clear() {
        let mut arena = Arena::new();
        for i in 0..10 {
            arena.alloc(Node::new(i, i, 0));
        }
        arena.clear();
        assert_eq!(arena.len(), 0);
    }
}
