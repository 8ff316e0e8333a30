//! Tree-node layout: box sizes, subtree extents, and initial positions.
//!
//! A `TreeNode` is built bottom-up from an `SExpr`. Each child is fully
//! built (own size and subtree extent) before its parent measures itself,
//! so extents are always available by the time `init_positions` walks the
//! tree top-down.
//!
//! Local coordinates: a node's origin sits at the left edge of its box,
//! on the box's vertical center. The box spans `[0, width] × [-height/2,
//! height/2]`. Child positions are relative to the parent's origin.

use crate::config::LayoutConfig;
use crate::measure::TextMeasure;
use crate::model::SExpr;
use crate::scene::SceneNode;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

// ─── Body segments ──────────────────────────────────────────────────────

/// Index into a node's `children`. Only minted while the node is being
/// built, so every `ChildIndex` in a body is in range for that node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex(usize);

impl ChildIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// One item of a node's body, drawn left to right.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Atom label and its measured width.
    Text { text: String, width: f64 },
    /// Link to a child subtree.
    Child(ChildIndex),
}

/// Path from a root to one of its descendants, as child indices.
/// The empty path is the root itself.
pub type NodePath = SmallVec<[usize; 8]>;

// ─── Tree node ──────────────────────────────────────────────────────────

/// One visual AST node and the subtree below it.
#[derive(Debug)]
pub struct TreeNode {
    scene: SceneNode,
    body: SmallVec<[Segment; 4]>,
    children: Vec<TreeNode>,
    text_width: f64,
    width: f64,
    height: f64,
    tree_width: f64,
    tree_height: f64,
    connector_size: f64,
    segment_spacing: f64,
    active: bool,
    selected: bool,
}

impl TreeNode {
    /// Build the layout tree for `expr`. Lists become nodes whose body
    /// mirrors their items; a bare atom becomes a single-label leaf.
    pub fn build(expr: &SExpr, measure: &dyn TextMeasure, config: &LayoutConfig) -> Self {
        match expr {
            SExpr::List(items) => Self::from_items(items, measure, config),
            SExpr::Atom(_) => Self::from_items(std::slice::from_ref(expr), measure, config),
        }
    }

    fn from_items(items: &[SExpr], measure: &dyn TextMeasure, config: &LayoutConfig) -> Self {
        let mut body = SmallVec::with_capacity(items.len());
        let mut children = Vec::new();
        let mut text_width = 0.0;

        for (i, item) in items.iter().enumerate() {
            match item {
                SExpr::List(sub) => {
                    body.push(Segment::Child(ChildIndex(children.len())));
                    children.push(Self::from_items(sub, measure, config));
                    text_width += config.connector_size;
                }
                SExpr::Atom(atom) => {
                    let text = atom.to_string();
                    let width = measure.measure_text(&text);
                    text_width += width;
                    body.push(Segment::Text { text, width });
                }
            }
            if i + 1 < items.len() {
                text_width += config.segment_spacing;
            }
        }

        let width = config.min_node_width.max(text_width + config.padding);
        let height = config.min_node_height;

        let mut node = Self {
            scene: SceneNode::new(),
            body,
            children,
            text_width,
            width,
            height,
            tree_width: width,
            tree_height: height,
            connector_size: config.connector_size,
            segment_spacing: config.segment_spacing,
            active: false,
            selected: false,
        };
        node.compute_extents(config);
        node
    }

    /// Subtree extents from the children's. Children must already have
    /// theirs, which construction order guarantees.
    fn compute_extents(&mut self, config: &LayoutConfig) {
        debug_assert!(
            self.children.iter().all(|c| c.tree_width >= c.width),
            "child extents must be computed before the parent's"
        );
        self.tree_width = self.width.max(self.children_tree_width(config));
        self.tree_height = self
            .children
            .iter()
            .map(|c| c.tree_height + config.child_spacing)
            .fold(self.height, f64::max);
    }

    /// Combined width of the child subtrees laid side by side.
    pub fn children_tree_width(&self, config: &LayoutConfig) -> f64 {
        if self.children.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.children.iter().map(|c| c.tree_width).sum();
        sum + config.neighbor_spacing * (self.children.len() - 1) as f64
    }

    /// Place every descendant relative to its parent. Centers this node
    /// over its subtree and lays children out left to right.
    pub fn init_positions(&mut self, config: &LayoutConfig) {
        let mut offset_x = -self.tree_width / 2.0 + self.width / 2.0;
        for child in &mut self.children {
            child.init_positions(config);
            let target = Point::new(
                offset_x + child.tree_width / 2.0 - child.width / 2.0,
                config.child_spacing,
            );
            child.scene.glide_to(target, config.glide_velocity);
            offset_x += child.tree_width + config.neighbor_spacing;
        }
    }

    // ─── Hit testing ────────────────────────────────────────────────────

    /// Whether `local` (in this node's own space) falls inside its box.
    /// Edges count as inside.
    pub fn box_contains(&self, local: Point) -> bool {
        let half = self.height / 2.0;
        (0.0..=self.width).contains(&local.x) && (-half..=half).contains(&local.y)
    }

    /// The node box in local space.
    pub fn local_box(&self) -> Rect {
        Rect::new(0.0, -self.height / 2.0, self.width, self.height / 2.0)
    }

    /// Node under `point`, given in the parent's space. A node's own box
    /// wins over any child box that overlaps it; children are then tried
    /// in document order.
    pub fn contains_pos(&self, point: Point) -> Option<&TreeNode> {
        let local = self.scene.local_transform().inverse() * point;
        if self.box_contains(local) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.contains_pos(local))
    }

    /// Like `contains_pos`, but returns the path to the hit node.
    pub fn hit_path(&self, point: Point) -> Option<NodePath> {
        let local = self.scene.local_transform().inverse() * point;
        if self.box_contains(local) {
            return Some(NodePath::new());
        }
        self.children.iter().enumerate().find_map(|(i, c)| {
            c.hit_path(local).map(|mut path| {
                path.insert(0, i);
                path
            })
        })
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&TreeNode> {
        path.iter().try_fold(self, |node, &i| node.children.get(i))
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut TreeNode> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    // ─── Highlight state ────────────────────────────────────────────────

    /// Set `active` on this node and every descendant.
    pub fn set_active(&mut self, active: bool) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.active = active;
            stack.extend(node.children.iter_mut());
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark this node alone as selected.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn scene(&self) -> &SceneNode {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneNode {
        &mut self.scene
    }

    pub fn position(&self) -> Point {
        self.scene.position()
    }

    pub fn set_position(&mut self, position: Point) {
        self.scene.set_position(position);
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [TreeNode] {
        &mut self.children
    }

    /// Child referenced by `index`. `None` if the index came from a
    /// different node.
    pub fn child(&self, index: ChildIndex) -> Option<&TreeNode> {
        self.children.get(index.0)
    }

    /// Width of the body content, excluding padding.
    pub fn text_width(&self) -> f64 {
        self.text_width
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn tree_width(&self) -> f64 {
        self.tree_width
    }

    pub fn tree_height(&self) -> f64 {
        self.tree_height
    }

    /// Width reserved for each child link in the body.
    pub fn connector_size(&self) -> f64 {
        self.connector_size
    }

    /// Gap between adjacent body segments.
    pub fn segment_spacing(&self) -> f64 {
        self.segment_spacing
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Source-like text of this subtree: labels verbatim, children in
    /// parentheses.
    pub fn to_source(&self) -> String {
        let mut out = String::from("(");
        for (i, segment) in self.body.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match segment {
                Segment::Text { text, .. } => out.push_str(text),
                Segment::Child(index) => {
                    if let Some(child) = self.child(*index) {
                        out.push_str(&child.to_source());
                    }
                }
            }
        }
        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MonospaceMeasure;
    use crate::parser::parse_sexpr;
    use pretty_assertions::assert_eq;

    const MEASURE: MonospaceMeasure = MonospaceMeasure { char_width: 6.0 };

    fn build(src: &str) -> TreeNode {
        let config = LayoutConfig::default();
        let expr = parse_sexpr(src).unwrap();
        let mut tree = TreeNode::build(&expr, &MEASURE, &config);
        tree.init_positions(&config);
        tree
    }

    fn labels(node: &TreeNode) -> Vec<String> {
        node.body()
            .iter()
            .map(|s| match s {
                Segment::Text { text, .. } => text.clone(),
                Segment::Child(i) => i.get().to_string(),
            })
            .collect()
    }

    #[test]
    fn body_mirrors_items() {
        let tree = build("(a (b) (c))");
        assert_eq!(labels(&tree), vec!["a", "0", "1"]);
        assert_eq!(tree.children().len(), 2);
        assert_eq!(labels(&tree.children()[0]), vec!["b"]);
        assert_eq!(labels(&tree.children()[1]), vec!["c"]);
    }

    #[test]
    fn own_width_sums_segments() {
        let config = LayoutConfig::default();
        // "define"=36, connector 5, "xyz"=18, two gaps of 3.
        let tree = build("(define (q) xyz)");
        assert_eq!(tree.text_width(), 36.0 + 5.0 + 18.0 + 2.0 * 3.0);
        assert_eq!(tree.width(), tree.text_width() + config.padding);
        assert_eq!(tree.height(), config.min_node_height);
    }

    #[test]
    fn small_nodes_use_min_width() {
        let tree = build("(a)");
        assert_eq!(tree.width(), 25.0);
        let empty = build("()");
        assert_eq!(empty.width(), 25.0);
        assert_eq!(empty.tree_width(), 25.0);
    }

    #[test]
    fn tree_width_covers_children() {
        let config = LayoutConfig::default();
        let tree = build("(a (bbbbbbbbbb) (cccccccccc))");
        let b = &tree.children()[0];
        let c = &tree.children()[1];
        assert!(tree.tree_width() >= tree.width());
        assert_eq!(
            tree.tree_width(),
            b.tree_width() + c.tree_width() + config.neighbor_spacing
        );
    }

    #[test]
    fn tree_height_adds_child_spacing_per_level() {
        let tree = build("(a (b (c)))");
        assert_eq!(tree.tree_height(), 25.0 + 2.0 * 37.5);
        assert_eq!(tree.children()[0].tree_height(), 25.0 + 37.5);
    }

    #[test]
    fn extents_never_smaller_than_box() {
        fn check(node: &TreeNode, config: &LayoutConfig) {
            assert!(node.tree_width() >= node.width());
            assert!(node.tree_height() >= node.height());
            if !node.children().is_empty() {
                assert!(node.tree_width() >= node.children_tree_width(config));
            }
            for child in node.children() {
                check(child, config);
            }
        }
        let tree = build(
            "(script_file (namespace name: (identifier) body: (namespace_body (context (a) (b) (c)))))",
        );
        check(&tree, &LayoutConfig::default());
    }

    #[test]
    fn children_sit_below_and_side_by_side() {
        let config = LayoutConfig::default();
        let tree = build("(a (bbbbbbbbbb) (cccccccccc))");
        let b = &tree.children()[0];
        let c = &tree.children()[1];
        assert_eq!(b.position().y, config.child_spacing);
        assert_eq!(c.position().y, config.child_spacing);

        let expected_b = -tree.tree_width() / 2.0 + tree.width() / 2.0;
        assert_eq!(b.position().x, expected_b);
        // Right edge of b's subtree plus the gap is where c's subtree starts.
        let c_left = c.position().x + c.width() / 2.0 - c.tree_width() / 2.0;
        let b_right = b.position().x + b.width() / 2.0 + b.tree_width() / 2.0;
        assert!((c_left - (b_right + config.neighbor_spacing)).abs() < 1e-9);
    }

    #[test]
    fn parent_is_centered_over_children() {
        let tree = build("(x (aaaaaaaaaaaa) (bbbbbbbbbbbb))");
        let first = &tree.children()[0];
        let last = &tree.children()[1];
        let left = first.position().x + first.width() / 2.0 - first.tree_width() / 2.0;
        let right = last.position().x + last.width() / 2.0 + last.tree_width() / 2.0;
        let middle = (left + right) / 2.0;
        assert!((middle - tree.width() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn atom_root_is_a_leaf() {
        let config = LayoutConfig::default();
        let tree = TreeNode::build(&SExpr::symbol("lonely"), &MEASURE, &config);
        assert_eq!(labels(&tree), vec!["lonely"]);
        assert!(tree.children().is_empty());
    }

    #[test]
    fn numbers_and_strings_label_like_source() {
        let tree = build("(f -2 3.5 \"two words\")");
        assert_eq!(labels(&tree), vec!["f", "-2", "3.5", "two words"]);
    }

    #[test]
    fn hit_self_first() {
        let tree = build("(a (b) (c))");
        // Root sits at the origin; its box spans [0, w] × [-h/2, h/2].
        let hit = tree.contains_pos(Point::new(1.0, 0.0)).unwrap();
        assert!(std::ptr::eq(hit, &tree));
        assert_eq!(tree.hit_path(Point::new(1.0, 0.0)).unwrap().as_slice(), &[] as &[usize]);
    }

    #[test]
    fn hit_descends_into_children() {
        let tree = build("(a (b) (c))");
        let c = &tree.children()[1];
        let inside_c = c.position() + kurbo::Vec2::new(c.width() / 2.0, 0.0);
        let path = tree.hit_path(inside_c).unwrap();
        assert_eq!(path.as_slice(), &[1]);
        let hit = tree.contains_pos(inside_c).unwrap();
        assert!(std::ptr::eq(hit, c));
    }

    #[test]
    fn hit_respects_root_position() {
        let mut tree = build("(a (b))");
        tree.set_position(Point::new(-100.0, -50.0));
        assert!(tree.contains_pos(Point::new(1.0, 0.0)).is_none());
        assert!(tree.contains_pos(Point::new(-99.0, -50.0)).is_some());
    }

    #[test]
    fn hit_is_total_inside_root_box() {
        let tree = build("(root (a) (b) (c))");
        let w = tree.width();
        let h = tree.height();
        for i in 1..10 {
            for j in 1..10 {
                let p = Point::new(w * i as f64 / 10.0, -h / 2.0 + h * j as f64 / 10.0);
                assert!(tree.contains_pos(p).is_some(), "miss at {p:?}");
            }
        }
    }

    #[test]
    fn miss_returns_none() {
        let tree = build("(a (b))");
        assert!(tree.contains_pos(Point::new(-500.0, 500.0)).is_none());
        assert!(tree.hit_path(Point::new(-500.0, 500.0)).is_none());
    }

    #[test]
    fn box_edges_are_inclusive() {
        let tree = build("(a)");
        assert!(tree.box_contains(Point::new(tree.width(), tree.height() / 2.0)));
        assert!(tree.box_contains(Point::new(0.0, -tree.height() / 2.0)));
        assert!(!tree.box_contains(Point::new(tree.width() + 0.01, 0.0)));
    }

    #[test]
    fn set_active_cascades() {
        let mut tree = build("(a (b (c) (d)) (e))");
        tree.children_mut()[0].set_active(true);
        assert!(!tree.is_active());
        let b = &tree.children()[0];
        assert!(b.is_active());
        assert!(b.children().iter().all(TreeNode::is_active));
        assert!(!tree.children()[1].is_active());

        tree.set_active(true);
        tree.set_active(false);
        fn none_active(node: &TreeNode) -> bool {
            !node.is_active() && node.children().iter().all(none_active)
        }
        assert!(none_active(&tree));
    }

    #[test]
    fn node_lookup_by_path() {
        let mut tree = build("(a (b (c)) (d))");
        assert_eq!(tree.node_at(&[0, 0]).unwrap().to_source(), "(c)");
        assert!(tree.node_at(&[5]).is_none());
        tree.node_at_mut(&[1]).unwrap().set_selected(true);
        assert!(tree.children()[1].is_selected());
    }

    #[test]
    fn to_source_and_count() {
        let tree = build("(a  (b   c) \"d\")");
        assert_eq!(tree.to_source(), "(a (b c) d)");
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn glide_velocity_defers_placement() {
        let config = LayoutConfig {
            glide_velocity: 0.1,
            ..LayoutConfig::default()
        };
        let expr = parse_sexpr("(a (b))").unwrap();
        let mut tree = TreeNode::build(&expr, &MEASURE, &config);
        tree.init_positions(&config);
        let child = &tree.children()[0];
        assert_eq!(child.position(), Point::ORIGIN);
        assert!(child.scene().target().is_some());
    }

    #[test]
    fn foreign_child_index_is_none() {
        let wide = build("(a (b) (c) (d))");
        let leaf = build("(x)");
        let Some(Segment::Child(last)) = wide.body().last() else {
            panic!("expected a child segment");
        };
        assert_eq!(wide.child(*last).unwrap().to_source(), "(d)");
        assert!(leaf.child(*last).is_none());
    }
}
