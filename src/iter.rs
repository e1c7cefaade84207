use crate::arena::{Arena, NodeId};
use crate::map::SkipListMap;

/// Iterator over the entries linked at one level of a [`SkipListMap`], in
/// ascending key order. Level 0 holds every entry.
pub struct Iter<'a, K, V> {
    nodes: &'a Arena<K, V>,
    current: Option<NodeId>,
    level: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(
        nodes: &'a Arena<K, V>,
        first: Option<NodeId>,
        level: usize,
        remaining: usize,
    ) -> Iter<'a, K, V> {
        Iter {
            nodes,
            current: first,
            level,
            remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.current?);
        self.current = node.next(self.level);
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.key_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.level == 0 {
            (self.remaining, Some(self.remaining))
        } else {
            (0, Some(self.remaining))
        }
    }
}

impl<'a, K, V> IntoIterator for &'a SkipListMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
