//! Hit testing: point → node lookup.
//!
//! Points are given in AST space, the space the root tree's position is
//! expressed in. A node's own box is tested before its children, and
//! children are tried in document order.

use kurbo::{Affine, Point, Rect};
use sx_core::{NodePath, TreeNode};

/// Find the node at `point`. Returns its path from `root`, or `None` if
/// the point misses every box.
pub fn hit_test(root: &TreeNode, point: Point) -> Option<NodePath> {
    let hit = root.hit_path(point);
    log::trace!("hit test at ({}, {}) → {hit:?}", point.x, point.y);
    hit
}

/// AST space ← local space of the node at `path`.
pub fn node_transform(root: &TreeNode, path: &[usize]) -> Option<Affine> {
    let mut node = root;
    let mut affine = root.scene().local_transform();
    for &i in path {
        node = node.children().get(i)?;
        affine *= node.scene().local_transform();
    }
    Some(affine)
}

/// Axis-aligned box of the node at `path`, in AST space.
pub fn node_bounds(root: &TreeNode, path: &[usize]) -> Option<Rect> {
    let node = root.node_at(path)?;
    let affine = node_transform(root, path)?;
    Some(affine.transform_rect_bbox(node.local_box()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sx_core::{LayoutConfig, MonospaceMeasure, parse_sexpr};

    fn tree(src: &str) -> TreeNode {
        let config = LayoutConfig::default();
        let expr = parse_sexpr(src).unwrap();
        let mut tree = TreeNode::build(&expr, &MonospaceMeasure::default(), &config);
        tree.init_positions(&config);
        tree
    }

    #[test]
    fn hit_center_of_each_node() {
        let root = tree("(a (b (c)) (d))");
        let paths: [&[usize]; 4] = [&[], &[0], &[0, 0], &[1]];
        for path in paths {
            let bounds = node_bounds(&root, path).unwrap();
            assert_eq!(hit_test(&root, bounds.center()).unwrap().as_slice(), path);
        }
    }

    #[test]
    fn miss_returns_none() {
        let root = tree("(a (b))");
        assert_eq!(hit_test(&root, Point::new(1000.0, 1000.0)), None);
    }

    #[test]
    fn bounds_follow_root_position() {
        let mut root = tree("(a)");
        root.set_position(Point::new(-12.5, -8.0));
        let bounds = node_bounds(&root, &[]).unwrap();
        assert_eq!(bounds, Rect::new(-12.5, -20.5, 12.5, 4.5));
    }

    #[test]
    fn bad_path_has_no_bounds() {
        let root = tree("(a (b))");
        assert_eq!(node_bounds(&root, &[3]), None);
        assert_eq!(node_transform(&root, &[0, 0]), None);
    }
}
