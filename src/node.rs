use std::borrow::Borrow;

use crate::arena::NodeId;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    forward_: Vec<Option<NodeId>>,
    key_: K,
    value_: V,
}

impl<K, V> Node<K, V> {
    // Node of level 0 means it has only one link to the next node, node of
    // level 1 means it keeps a link to the next node, and to the next level 1
    // node, and so on and so forth.
    pub fn new(key: K, value: V, level: usize) -> Node<K, V> {
        Node {
            forward_: vec![None; level + 1],
            key_: key,
            value_: value,
        }
    }

    pub fn level(&self) -> usize {
        self.forward_.len() - 1
    }

    /// Returns the handle of the next node at the given level, if any.
    pub fn next(&self, level: usize) -> Option<NodeId> {
        self.forward_.get(level).copied().flatten()
    }

    pub fn link_to(&mut self, level: usize, destination: Option<NodeId>) {
        debug_assert!(level <= self.level());
        self.forward_[level] = destination;
    }

    pub fn key<Q>(&self) -> &Q
    where
        K: Borrow<Q>,
        Q: ?Sized,
    {
        self.key_.borrow()
    }

    pub fn value(&self) -> &V {
        &self.value_
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value_
    }

    pub fn key_value(&self) -> (&K, &V) {
        (&self.key_, &self.value_)
    }

    pub fn replace_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value_, value)
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key_, self.value_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let key = 3;
        let value = 12;
        let level = 5;
        let node = Node::new(key, value, level);
        assert_eq!(*node.key::<i32>(), key);
        assert_eq!(*node.value(), value);
        assert_eq!(node.level(), level);
    }

    #[test]
    fn level_zero_has_one_slot() {
        let node = Node::new(1, 1, 0);
        assert_eq!(node.level(), 0);
        assert!(node.next(0).is_none());
    }

    #[test]
    fn next_out_of_bounds() {
        let node = Node::new(3, 12, 5);
        assert!(node.next(10).is_none());
    }

    #[test]
    fn next_empty() {
        let level = 5;
        let node = Node::new(3, 42, level);
        for level in 0..=level {
            assert!(node.next(level).is_none());
        }
    }

    #[test]
    fn link_singleton() {
        let mut node = Node::new(4, 12312, 5);
        let target = NodeId::new(7);
        node.link_to(2, Some(target));

        for level in 0..=node.level() {
            if level == 2 {
                assert_eq!(node.next(level), Some(target));
            } else {
                assert!(node.next(level).is_none());
            }
        }

        node.link_to(2, None);
        assert!(node.next(2).is_none());
    }

    #[test]
    fn replace_value() {
        let mut node = Node::new("k", 1, 0);
        assert_eq!(node.replace_value(2), 1);
        *node.value_mut() += 1;
        assert_eq!(node.into_parts(), ("k", 3));
    }
}
