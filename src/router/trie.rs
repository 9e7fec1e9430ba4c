//! Segment trie backing each per-method route table.
//!
//! Every [`Node`] stands for one `/`-delimited segment. Shared prefixes share
//! ancestors, and a node whose `pattern` is non-empty terminates a registered route.
//!
//! Insertion and search are deliberately asymmetric. [`Node::insert`] descends into
//! the *first* child that is either an exact match or wild, so a literal registered
//! after a wild sibling at the same depth lands on that wild node. [`Node::search`]
//! instead tries *every* eligible child in insertion order and backtracks, which is
//! what lets `/a/b` and `/a/:id` coexist when the literal is registered first.

use std::fmt;

use tracing::warn;

/// One segment level of a route trie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pattern: String,
    part: String,
    children: Vec<Node>,
    is_wild: bool,
}

impl Node {
    fn new(part: &str) -> Self {
        Self {
            pattern: String::new(),
            part: part.to_owned(),
            children: Vec::new(),
            is_wild: part.starts_with(':') || part.starts_with('*'),
        }
    }

    /// The full registered pattern, or `""` for purely structural nodes.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The segment this node represents. Empty only at a root.
    pub fn part(&self) -> &str {
        &self.part
    }

    /// `true` if the segment is a `:param` or `*wildcard`.
    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Record `pattern` at the node reached by walking `parts[height..]`.
    ///
    /// Re-inserting the same pattern is idempotent; inserting a different pattern that
    /// resolves to the same node overwrites the stored one.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = pattern.to_owned();
            return;
        }

        let part = parts[height];
        let index = match self.match_child(part) {
            Some(index) => {
                let child = &self.children[index];
                if child.part != part {
                    warn!(
                        pattern,
                        segment = part,
                        absorbed_by = %child.part,
                        "segment folded into existing wild node"
                    );
                }
                index
            }
            None => {
                self.children.push(Node::new(part));
                self.children.len() - 1
            }
        };

        self.children[index].insert(pattern, parts, height + 1);
    }

    /// Find the terminal node matching `parts[height..]`, backtracking across siblings.
    pub(crate) fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            if !self.pattern.is_empty() {
                return Some(self);
            }
            if parts.len() == height {
                // A trailing `*name` may capture zero segments.
                return self
                    .children
                    .iter()
                    .find(|child| child.part.starts_with('*') && !child.pattern.is_empty());
            }
            return None;
        }

        let part = parts[height];
        self.match_children(part)
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Append every terminal node of this subtree to `out`, depth-first pre-order.
    pub(crate) fn travel<'a>(&'a self, out: &mut Vec<&'a Node>) {
        if !self.pattern.is_empty() {
            out.push(self);
        }
        for child in &self.children {
            child.travel(out);
        }
    }

    // Index of the first child that matches `part` exactly or is wild.
    fn match_child(&self, part: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.part == part || child.is_wild)
    }

    // All children that match `part` exactly or are wild, in insertion order.
    fn match_children<'a, 'p>(&'a self, part: &'p str) -> impl Iterator<Item = &'a Node> {
        self.children
            .iter()
            .filter(move |child| child.part == part || child.is_wild)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node{{pattern={}, part={}, is_wild={}}}",
            self.pattern, self.part, self.is_wild
        )
    }
}
