//! Red-black tree whose order is given by the caller rather than by a key.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Every node also carries
//! `previous`/`next` links so in-order neighbors are O(1). The only insertion primitive
//! is "insert as successor of node N", which is what the beachline needs: an arc's
//! position is a geometric quantity computed by the caller at insertion time.
//!
//! Passing an id that is not currently linked into the tree is not checked.

/// Handle to a node in an [`RbTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    value: T,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    previous: Option<NodeId>,
    next: Option<NodeId>,
    red: bool,
}

#[derive(Clone, Debug)]
pub struct RbTree<T> {
    nodes: Vec<Node<T>>,
    // Released slots, reused by `alloc`.
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl<T> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RbTree<T> {
    pub fn new() -> Self {
        RbTree {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RbTree {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.node(id).red)
    }

    /// Stores `value` in a detached node, reusing a released slot when possible.
    pub fn alloc(&mut self, value: T) -> NodeId {
        let fresh = Node {
            value,
            parent: None,
            left: None,
            right: None,
            previous: None,
            next: None,
            red: false,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = fresh;
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(fresh);
                id
            }
        }
    }

    /// Returns a node that has been removed from the tree to the arena.
    pub fn release(&mut self, id: NodeId) {
        self.free.push(id);
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &T {
        &self.node(id).value
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.node_mut(id).value
    }

    #[inline]
    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).previous
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    /// Leftmost descendant of `id`.
    pub fn first(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    /// Rightmost descendant of `id`.
    #[cfg(test)]
    pub fn last(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    /// Iterates the values in sequence order by following the `next` chain.
    #[cfg(test)]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            cursor: self.root.map(|root| self.first(root)),
        }
    }

    /// Links `successor` right after `node` in the sequence. With `node == None` the
    /// successor becomes the first element (or the only one if the tree is empty).
    pub fn insert_successor(&mut self, node: Option<NodeId>, successor: NodeId) {
        let parent = if let Some(node) = node {
            let next = self.node(node).next;
            {
                let s = self.node_mut(successor);
                s.previous = Some(node);
                s.next = next;
            }
            if let Some(next) = next {
                self.node_mut(next).previous = Some(successor);
            }
            self.node_mut(node).next = Some(successor);

            if let Some(right) = self.node(node).right {
                let first = self.first(right);
                self.node_mut(first).left = Some(successor);
                Some(first)
            } else {
                self.node_mut(node).right = Some(successor);
                Some(node)
            }
        } else if let Some(root) = self.root {
            let first = self.first(root);
            {
                let s = self.node_mut(successor);
                s.previous = None;
                s.next = Some(first);
            }
            let f = self.node_mut(first);
            f.previous = Some(successor);
            f.left = Some(successor);
            Some(first)
        } else {
            let s = self.node_mut(successor);
            s.previous = None;
            s.next = None;
            self.root = Some(successor);
            None
        };

        {
            let s = self.node_mut(successor);
            s.left = None;
            s.right = None;
            s.parent = parent;
            s.red = true;
        }
        self.len += 1;

        // Recolor and rotate (at most twice) back up to the root.
        let mut node = successor;
        let mut parent = parent;
        while let Some(mut p) = parent {
            if !self.node(p).red {
                break;
            }
            let Some(grandpa) = self.node(p).parent else {
                break;
            };

            if self.node(grandpa).left == Some(p) {
                let uncle = self.node(grandpa).right;
                if let Some(uncle) = uncle.filter(|&u| self.node(u).red) {
                    self.node_mut(p).red = false;
                    self.node_mut(uncle).red = false;
                    self.node_mut(grandpa).red = true;
                    node = grandpa;
                } else {
                    if self.node(p).right == Some(node) {
                        self.rotate_left(p);
                        std::mem::swap(&mut node, &mut p);
                    }
                    self.node_mut(p).red = false;
                    self.node_mut(grandpa).red = true;
                    self.rotate_right(grandpa);
                }
            } else {
                let uncle = self.node(grandpa).left;
                if let Some(uncle) = uncle.filter(|&u| self.node(u).red) {
                    self.node_mut(p).red = false;
                    self.node_mut(uncle).red = false;
                    self.node_mut(grandpa).red = true;
                    node = grandpa;
                } else {
                    if self.node(p).left == Some(node) {
                        self.rotate_right(p);
                        std::mem::swap(&mut node, &mut p);
                    }
                    self.node_mut(p).red = false;
                    self.node_mut(grandpa).red = true;
                    self.rotate_left(grandpa);
                }
            }
            parent = self.node(node).parent;
        }

        if let Some(root) = self.root {
            self.node_mut(root).red = false;
        }
    }

    /// Unlinks `node` from the sequence and the tree. The slot is not released.
    pub fn remove_node(&mut self, node: NodeId) {
        let (previous, next) = (self.node(node).previous, self.node(node).next);
        if let Some(next) = next {
            self.node_mut(next).previous = previous;
        }
        if let Some(previous) = previous {
            self.node_mut(previous).next = next;
        }
        {
            let n = self.node_mut(node);
            n.previous = None;
            n.next = None;
        }
        self.len -= 1;

        let mut parent = self.node(node).parent;
        let left = self.node(node).left;
        let right = self.node(node).right;
        let replacement = match (left, right) {
            (None, _) => right,
            (Some(_), None) => left,
            (Some(_), Some(right)) => Some(self.first(right)),
        };

        match parent {
            Some(p) if self.node(p).left == Some(node) => self.node_mut(p).left = replacement,
            Some(p) => self.node_mut(p).right = replacement,
            None => self.root = replacement,
        }

        // `child` ends up as the sole child of the spliced position, `parent` as its parent.
        let removed_red;
        let child;
        if let (Some(left), Some(right), Some(succ)) = (left, right, replacement) {
            removed_red = self.node(succ).red;
            let node_red = self.node(node).red;
            self.node_mut(succ).red = node_red;
            self.node_mut(succ).left = Some(left);
            self.node_mut(left).parent = Some(succ);

            if succ != right {
                parent = self.node(succ).parent;
                let node_parent = self.node(node).parent;
                self.node_mut(succ).parent = node_parent;
                child = self.node(succ).right;
                if let Some(p) = parent {
                    self.node_mut(p).left = child;
                }
                self.node_mut(succ).right = Some(right);
                self.node_mut(right).parent = Some(succ);
            } else {
                self.node_mut(succ).parent = parent;
                parent = Some(succ);
                child = self.node(succ).right;
            }
        } else {
            removed_red = self.node(node).red;
            child = replacement;
        }

        if let Some(c) = child {
            self.node_mut(c).parent = parent;
        }

        if removed_red {
            return;
        }
        if let Some(c) = child.filter(|&c| self.node(c).red) {
            self.node_mut(c).red = false;
            return;
        }

        let mut node = child;
        loop {
            if node == self.root {
                break;
            }
            let Some(p) = parent else {
                break;
            };

            let sibling = if self.node(p).left == node {
                let Some(mut sibling) = self.node(p).right else {
                    break;
                };
                if self.node(sibling).red {
                    self.node_mut(sibling).red = false;
                    self.node_mut(p).red = true;
                    self.rotate_left(p);
                    match self.node(p).right {
                        Some(s) => sibling = s,
                        None => break,
                    }
                }
                if self.is_red(self.node(sibling).left) || self.is_red(self.node(sibling).right) {
                    if !self.is_red(self.node(sibling).right) {
                        if let Some(sl) = self.node(sibling).left {
                            self.node_mut(sl).red = false;
                        }
                        self.node_mut(sibling).red = true;
                        self.rotate_right(sibling);
                        match self.node(p).right {
                            Some(s) => sibling = s,
                            None => break,
                        }
                    }
                    let parent_red = self.node(p).red;
                    self.node_mut(sibling).red = parent_red;
                    self.node_mut(p).red = false;
                    if let Some(sr) = self.node(sibling).right {
                        self.node_mut(sr).red = false;
                    }
                    self.rotate_left(p);
                    node = self.root;
                    break;
                }
                sibling
            } else {
                let Some(mut sibling) = self.node(p).left else {
                    break;
                };
                if self.node(sibling).red {
                    self.node_mut(sibling).red = false;
                    self.node_mut(p).red = true;
                    self.rotate_right(p);
                    match self.node(p).left {
                        Some(s) => sibling = s,
                        None => break,
                    }
                }
                if self.is_red(self.node(sibling).left) || self.is_red(self.node(sibling).right) {
                    if !self.is_red(self.node(sibling).left) {
                        if let Some(sr) = self.node(sibling).right {
                            self.node_mut(sr).red = false;
                        }
                        self.node_mut(sibling).red = true;
                        self.rotate_left(sibling);
                        match self.node(p).left {
                            Some(s) => sibling = s,
                            None => break,
                        }
                    }
                    let parent_red = self.node(p).red;
                    self.node_mut(sibling).red = parent_red;
                    self.node_mut(p).red = false;
                    if let Some(sl) = self.node(sibling).left {
                        self.node_mut(sl).red = false;
                    }
                    self.rotate_right(p);
                    node = self.root;
                    break;
                }
                sibling
            };

            self.node_mut(sibling).red = true;
            node = Some(p);
            parent = self.node(p).parent;
            if self.is_red(node) {
                break;
            }
        }

        if let Some(n) = node {
            self.node_mut(n).red = false;
        }
    }

    pub fn rotate_left(&mut self, p: NodeId) {
        let Some(q) = self.node(p).right else {
            return;
        };
        let parent = self.node(p).parent;
        match parent {
            Some(par) if self.node(par).left == Some(p) => self.node_mut(par).left = Some(q),
            Some(par) => self.node_mut(par).right = Some(q),
            None => self.root = Some(q),
        }
        self.node_mut(q).parent = parent;
        self.node_mut(p).parent = Some(q);
        let inner = self.node(q).left;
        self.node_mut(p).right = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(p);
        }
        self.node_mut(q).left = Some(p);
    }

    pub fn rotate_right(&mut self, p: NodeId) {
        let Some(q) = self.node(p).left else {
            return;
        };
        let parent = self.node(p).parent;
        match parent {
            Some(par) if self.node(par).left == Some(p) => self.node_mut(par).left = Some(q),
            Some(par) => self.node_mut(par).right = Some(q),
            None => self.root = Some(q),
        }
        self.node_mut(q).parent = parent;
        self.node_mut(p).parent = Some(q);
        let inner = self.node(q).right;
        self.node_mut(p).left = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(p);
        }
        self.node_mut(q).right = Some(p);
    }
}

#[cfg(test)]
pub struct Iter<'a, T> {
    tree: &'a RbTree<T>,
    cursor: Option<NodeId>,
}

#[cfg(test)]
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.tree.next(id);
        Some(self.tree.get(id))
    }
}
