//! Syntax tree for rule expressions.
//!
//! Every node remembers the span of source characters it was parsed from
//! and shares a handle to that source, so a tree can always be traced back
//! to the text the user typed.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Character range `[pos, pos + len)` within a node's source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub pos: usize,
    pub len: usize,
}

impl Span {
    pub fn new(pos: usize, len: usize) -> Self {
        Self { pos, len }
    }

    pub fn end(&self) -> usize {
        self.pos + self.len
    }
}

/// The angle of a turn as written in the grammar.
///
/// A bare `+` or `-` stays symbolic until flattening, so the default angle
/// can change without re-parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnAngle {
    Degrees(f64),
    DefaultPositive,
    DefaultNegative,
}

impl TurnAngle {
    pub fn resolve(self, default_angle: f64) -> f64 {
        match self {
            TurnAngle::Degrees(deg) => deg,
            TurnAngle::DefaultPositive => default_angle,
            TurnAngle::DefaultNegative => -default_angle,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Term(Arc<str>),
    Turn(TurnAngle),
    Concat(Box<Node>, Box<Node>),
    Save,
    Restore,
    End,
}

/// A syntax tree node.
///
/// `Clone` is a deep structural copy: children are owned through `Box`, so a
/// cloned rule tree never aliases the tree it was copied from.
///
/// Parsed trees are left-deep chains as long as the token count, so clone,
/// equality and drop all walk the tree with an explicit stack.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub source: Arc<str>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span, source: Arc<str>) -> Self {
        Self { kind, span, source }
    }

    /// The empty tree for `source`, positioned at its end.
    pub fn end(source: Arc<str>) -> Self {
        let pos = source.chars().count();
        Self::new(NodeKind::End, Span::new(pos, 0), source)
    }

    /// Sequential composition. `End` is the identity on either side.
    pub fn concat(left: Node, right: Node) -> Node {
        if left.is_end() {
            return right;
        }
        if right.is_end() {
            return left;
        }
        let span = Span::new(left.span.pos, left.span.len + right.span.len);
        let source = left.source.clone();
        Node::new(
            NodeKind::Concat(Box::new(left), Box::new(right)),
            span,
            source,
        )
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, NodeKind::End)
    }

    /// The source characters this node was parsed from.
    pub fn source_text(&self) -> String {
        self.source
            .chars()
            .skip(self.span.pos)
            .take(self.span.len)
            .collect()
    }

    /// Rebuild the tree bottom-up, replacing every non-`Concat` node with
    /// `leaf(node)`. `Concat` nodes keep their span and source.
    pub fn map_leaves(&self, mut leaf: impl FnMut(&Node) -> Node) -> Node {
        enum Step<'a> {
            Visit(&'a Node),
            Join(&'a Node),
        }

        let mut steps = vec![Step::Visit(self)];
        let mut built: Vec<Node> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => match &node.kind {
                    NodeKind::Concat(left, right) => {
                        steps.push(Step::Join(node));
                        steps.push(Step::Visit(right));
                        steps.push(Step::Visit(left));
                    }
                    _ => built.push(leaf(node)),
                },
                Step::Join(node) => {
                    let right = built.pop();
                    let left = built.pop();
                    let (Some(left), Some(right)) = (left, right) else {
                        unreachable!("both children are built before their concat");
                    };
                    built.push(Node::new(
                        NodeKind::Concat(Box::new(left), Box::new(right)),
                        node.span,
                        node.source.clone(),
                    ));
                }
            }
        }

        built
            .pop()
            .unwrap_or_else(|| Node::end(self.source.clone()))
    }

    /// In-order walk over every node that is not a `Concat` or `End`.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Number of instructions flattening this tree emits.
    pub fn instruction_count(&self) -> usize {
        self.leaves().count()
    }

    /// Names of all `Term` nodes in the tree.
    pub fn term_names(&self) -> BTreeSet<String> {
        self.leaves()
            .filter_map(|node| match &node.kind {
                NodeKind::Term(name) => Some(name.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        self.map_leaves(|node| Node::new(node.kind.clone(), node.span, node.source.clone()))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((a, b)) = pairs.pop() {
            if a.span != b.span || a.source != b.source {
                return false;
            }
            match (&a.kind, &b.kind) {
                (NodeKind::Concat(al, ar), NodeKind::Concat(bl, br)) => {
                    pairs.push((&**ar, &**br));
                    pairs.push((&**al, &**bl));
                }
                (NodeKind::Concat(..), _) | (_, NodeKind::Concat(..)) => return false,
                (ka, kb) => {
                    if ka != kb {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let NodeKind::Concat(left, right) = std::mem::replace(&mut self.kind, NodeKind::End) {
            pending.push(left);
            pending.push(right);
        }
        // each node is emptied before it goes out of scope
        while let Some(mut node) = pending.pop() {
            if let NodeKind::Concat(left, right) = std::mem::replace(&mut node.kind, NodeKind::End) {
                pending.push(left);
                pending.push(right);
            }
        }
    }
}

/// Iterator returned by [`Node::leaves`].
pub struct Leaves<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        while let Some(node) = self.stack.pop() {
            match &node.kind {
                NodeKind::Concat(left, right) => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
                NodeKind::End => {}
                _ => return Some(node),
            }
        }
        None
    }
}

impl fmt::Display for TurnAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnAngle::DefaultPositive => write!(f, "+"),
            TurnAngle::DefaultNegative => write!(f, "-"),
            TurnAngle::Degrees(deg) if deg.is_sign_negative() => write!(f, "-{}", -deg),
            TurnAngle::Degrees(deg) => write!(f, "+{deg}"),
        }
    }
}

/// Canonical grammar text: tokens separated by single spaces.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, leaf) in self.leaves().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match &leaf.kind {
                NodeKind::Term(name) => write!(f, "{name}")?,
                NodeKind::Turn(angle) => write!(f, "{angle}")?,
                NodeKind::Save => write!(f, "[")?,
                NodeKind::Restore => write!(f, "]")?,
                NodeKind::Concat(..) | NodeKind::End => unreachable!("leaves skips inner nodes"),
            }
        }
        Ok(())
    }
}

/// A parsed rule expression and the symbols it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub tree: Node,
    /// Every symbol appearing as a `Term` in `tree`, collected while parsing.
    pub terms: BTreeSet<String>,
}

impl Expression {
    pub fn empty() -> Self {
        Self {
            tree: Node::end(Arc::from("")),
            terms: BTreeSet::new(),
        }
    }

    /// The text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.tree.source
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str, pos: usize, src: &Arc<str>) -> Node {
        Node::new(
            NodeKind::Term(Arc::from(name)),
            Span::new(pos, name.len()),
            src.clone(),
        )
    }

    #[test]
    fn resolve_turn_angles() {
        assert_eq!(TurnAngle::Degrees(-45.0).resolve(30.0), -45.0);
        assert_eq!(TurnAngle::DefaultPositive.resolve(30.0), 30.0);
        assert_eq!(TurnAngle::DefaultNegative.resolve(30.0), -30.0);
    }

    #[test]
    fn end_is_positioned_at_source_end() {
        let end = Node::end(Arc::from("F F"));
        assert_eq!(end.span, Span::new(3, 0));
        assert!(end.is_end());
        assert_eq!(end.instruction_count(), 0);
    }

    #[test]
    fn concat_sums_lengths() {
        let src: Arc<str> = Arc::from("AB CD");
        let node = Node::concat(term("AB", 0, &src), term("CD", 3, &src));
        assert_eq!(node.span, Span::new(0, 4));
        assert!(matches!(node.kind, NodeKind::Concat(..)));
    }

    #[test]
    fn concat_with_end_is_identity() {
        let src: Arc<str> = Arc::from("F");
        let f = term("F", 0, &src);
        assert_eq!(Node::concat(Node::end(src.clone()), f.clone()), f);
        assert_eq!(Node::concat(f.clone(), Node::end(src)), f);
    }

    #[test]
    fn leaves_walk_in_order() {
        let src: Arc<str> = Arc::from("A B C");
        let tree = Node::concat(
            Node::concat(term("A", 0, &src), term("B", 2, &src)),
            term("C", 4, &src),
        );
        let names: Vec<String> = tree.leaves().map(|n| n.source_text()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(tree.instruction_count(), 3);
    }

    #[test]
    fn clone_does_not_alias() {
        let src: Arc<str> = Arc::from("A B");
        let tree = Node::concat(term("A", 0, &src), term("B", 2, &src));
        let mut copy = tree.clone();
        if let NodeKind::Concat(left, _) = &mut copy.kind {
            left.kind = NodeKind::Save;
        }
        assert_eq!(tree.to_string(), "A B");
        assert_eq!(copy.to_string(), "[ B");
    }

    #[test]
    fn long_chains_clone_compare_and_drop() {
        let src: Arc<str> = Arc::from("F");
        let mut tree = term("F", 0, &src);
        for _ in 0..200_000 {
            tree = Node::concat(tree, term("F", 0, &src));
        }
        let copy = tree.clone();
        assert_eq!(copy, tree);
        assert_eq!(copy.instruction_count(), 200_001);

        let mut other = copy.clone();
        other.span.len += 1;
        assert_ne!(other, tree);
    }

    #[test]
    fn map_leaves_keeps_shape() {
        let src: Arc<str> = Arc::from("A B");
        let tree = Node::concat(term("A", 0, &src), term("B", 2, &src));
        let saved = tree.map_leaves(|node| Node::new(NodeKind::Save, node.span, node.source.clone()));
        assert_eq!(saved.to_string(), "[ [");
        assert_eq!(saved.span, tree.span);
        assert_eq!(Node::end(src.clone()).map_leaves(|n| n.clone()), Node::end(src));
    }

    #[test]
    fn display_turns() {
        assert_eq!(TurnAngle::Degrees(90.0).to_string(), "+90");
        assert_eq!(TurnAngle::Degrees(-22.5).to_string(), "-22.5");
        assert_eq!(TurnAngle::DefaultNegative.to_string(), "-");
    }

    #[test]
    fn term_names_collects_unique() {
        let src: Arc<str> = Arc::from("A B A");
        let tree = Node::concat(
            Node::concat(term("A", 0, &src), term("B", 2, &src)),
            term("A", 4, &src),
        );
        let names: Vec<String> = tree.term_names().into_iter().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn empty_expression() {
        let expr = Expression::empty();
        assert!(expr.tree.is_end());
        assert!(expr.terms.is_empty());
        assert_eq!(expr.source(), "");
    }
}
