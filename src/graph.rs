//! Process Graph Layout
//!
//! Breadth-first leveling of the process dependency graph into left-to-right
//! columns, plus geometry helpers for drawing it.

use std::collections::{HashMap, HashSet, VecDeque};

use leptos_pan::Bounds;

use crate::config::GraphConfig;
use crate::models::ProcessEdge;

/// Top-left corner of a node box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Assign each node a level (column).
///
/// Roots are nodes without incoming edges, or the first node when every node
/// has one. A node's level is the longest path found to it from a root; a
/// longer path re-enqueues the node, but each node is expanded at most once,
/// so cycles terminate (a back edge can still raise an already-expanded
/// node's level). Nodes unreachable from any root land on level 0.
///
/// Returns `(node, level)` in first-assignment order.
pub fn assign_levels(nodes: &[u32], edges: &[ProcessEdge]) -> Vec<(u32, usize)> {
    let known: HashSet<u32> = nodes.iter().copied().collect();
    let mut outputs: HashMap<u32, Vec<u32>> = HashMap::new();
    let mut in_degree: HashMap<u32, usize> = nodes.iter().map(|id| (*id, 0)).collect();

    for edge in edges {
        if known.contains(&edge.from_process_id) && known.contains(&edge.to_process_id) {
            outputs.entry(edge.from_process_id).or_default().push(edge.to_process_id);
            *in_degree.entry(edge.to_process_id).or_default() += 1;
        }
    }

    let mut roots: Vec<u32> = nodes.iter().copied().filter(|id| in_degree[id] == 0).collect();
    if roots.is_empty() {
        roots.extend(nodes.first().copied());
    }

    let mut levels: HashMap<u32, usize> = HashMap::new();
    let mut order: Vec<u32> = Vec::new();
    for root in &roots {
        if levels.insert(*root, 0).is_none() {
            order.push(*root);
        }
    }

    let mut queue: VecDeque<u32> = roots.into_iter().collect();
    let mut visited: HashSet<u32> = HashSet::new();

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        let next_level = levels.get(&current).copied().unwrap_or(0) + 1;
        for &out in outputs.get(&current).map(Vec::as_slice).unwrap_or(&[]) {
            match levels.get(&out) {
                Some(&level) if level >= next_level => {}
                Some(_) => {
                    levels.insert(out, next_level);
                    queue.push_back(out);
                }
                None => {
                    levels.insert(out, next_level);
                    order.push(out);
                    queue.push_back(out);
                }
            }
        }
    }

    for id in nodes {
        if !levels.contains_key(id) {
            levels.insert(*id, 0);
            order.push(*id);
        }
    }

    order.into_iter().map(|id| (id, levels[&id])).collect()
}

/// Position every node: one column per level, same-level nodes stacked and
/// centered on the canvas mid-line.
pub fn auto_layout(nodes: &[u32], edges: &[ProcessEdge], cfg: &GraphConfig) -> HashMap<u32, Position> {
    let levels = assign_levels(nodes, edges);

    // Group by level, keeping first-assignment order within a level
    let mut groups: Vec<(usize, Vec<u32>)> = Vec::new();
    for (id, level) in &levels {
        match groups.iter_mut().find(|(l, _)| l == level) {
            Some((_, members)) => members.push(*id),
            None => groups.push((*level, vec![*id])),
        }
    }
    if groups.is_empty() {
        return HashMap::new();
    }

    let total_width = (groups.len() - 1) as f64 * cfg.level_width;
    let start_x = cfg.margin_x.max((cfg.canvas_width - total_width) / 2.0);

    let mut positions = HashMap::with_capacity(levels.len());
    for (level, members) in &groups {
        let center = (members.len() as f64 - 1.0) / 2.0;
        for (index, id) in members.iter().enumerate() {
            positions.insert(
                *id,
                Position {
                    x: start_x + *level as f64 * cfg.level_width,
                    y: cfg.canvas_height / 2.0 + (index as f64 - center) * cfg.node_spacing,
                },
            );
        }
    }
    positions
}

/// Pan limits: node extents grown by `pan_padding` on every side
pub fn pan_bounds<'a>(positions: impl IntoIterator<Item = &'a Position>, cfg: &GraphConfig) -> Bounds {
    let (hw, hh) = (cfg.node_width / 2.0, cfg.node_height / 2.0);
    let mut iter = positions.into_iter().peekable();
    if iter.peek().is_none() {
        return Bounds::default();
    }
    let mut b = Bounds {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for p in iter {
        b.min_x = b.min_x.min(p.x - hw);
        b.max_x = b.max_x.max(p.x + hw);
        b.min_y = b.min_y.min(p.y - hh);
        b.max_y = b.max_y.max(p.y + hh);
    }
    Bounds {
        min_x: b.min_x - cfg.pan_padding,
        max_x: b.max_x + cfg.pan_padding,
        min_y: b.min_y - cfg.pan_padding,
        max_y: b.max_y + cfg.pan_padding,
    }
}

/// Horizontal shift that re-centers a layout computed for the configured
/// canvas width onto the actual one (assumes a three-column layout).
pub fn home_offset_x(actual_width: f64, cfg: &GraphConfig) -> f64 {
    let span = 2.0 * cfg.level_width;
    let assumed = cfg.margin_x.max((cfg.canvas_width - span) / 2.0);
    let actual = cfg.margin_x.max((actual_width - span) / 2.0);
    actual - assumed
}

/// Quadratic curve from the right edge of `from` to the left edge of `to`
pub fn edge_path(from: Position, to: Position, cfg: &GraphConfig) -> String {
    let from_x = from.x + cfg.node_width;
    let from_y = from.y + cfg.node_height / 2.0;
    let to_x = to.x;
    let to_y = to.y + cfg.node_height / 2.0;
    let mid_x = (from_x + to_x) / 2.0;
    format!("M {} {} Q {} {} {} {}", from_x, from_y, mid_x, from_y, to_x, to_y)
}

/// Shorten a label to fit a node (~7px per glyph, 10px inner margin each side).
/// Returns `None` when it already fits.
pub fn truncate_label(name: &str, node_width: f64) -> Option<String> {
    let max_chars = ((node_width - 20.0) / 7.0).floor().max(1.0) as usize;
    if name.chars().count() > max_chars {
        Some(format!("{}...", name.chars().take(max_chars).collect::<String>()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: u32, b: u32) -> ProcessEdge {
        ProcessEdge { from_process_id: a, to_process_id: b }
    }

    fn level_of(levels: &[(u32, usize)], id: u32) -> usize {
        levels.iter().find(|(n, _)| *n == id).map(|(_, l)| *l).unwrap()
    }

    #[test]
    fn test_linear_chain_levels() {
        let levels = assign_levels(&[1, 2, 3], &[edge(1, 2), edge(2, 3)]);
        assert_eq!(levels, vec![(1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn test_longest_path_wins() {
        // 1 -> 2 -> 3 and a shortcut 1 -> 3
        let levels = assign_levels(&[1, 2, 3], &[edge(1, 3), edge(1, 2), edge(2, 3)]);
        assert_eq!(level_of(&levels, 3), 2);
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let edges = [edge(1, 2), edge(2, 1)];
        let first = assign_levels(&[1, 2], &edges);
        let second = assign_levels(&[1, 2], &edges);
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        // 1 is the fallback root, then raised by the back edge without re-expansion
        assert_eq!(level_of(&first, 1), 2);
        assert_eq!(level_of(&first, 2), 1);
    }

    #[test]
    fn test_disconnected_and_unknown_edges() {
        // 4 sits in a cycle nobody reaches; edge to 99 is ignored
        let levels = assign_levels(&[1, 2, 4, 5], &[edge(1, 2), edge(4, 5), edge(5, 4), edge(2, 99)]);
        assert_eq!(levels.len(), 4);
        assert_eq!(level_of(&levels, 2), 1);
        assert_eq!(level_of(&levels, 4), 0);
        assert_eq!(level_of(&levels, 5), 0);
    }

    #[test]
    fn test_layout_columns_and_distinct_slots() {
        let cfg = GraphConfig::default();
        // Diamond: 1 -> {2, 3} -> 4
        let positions = auto_layout(&[1, 2, 3, 4], &[edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4)], &cfg);
        let (p1, p2, p3, p4) = (positions[&1], positions[&2], positions[&3], positions[&4]);

        assert!(p1.x < p2.x && p2.x < p4.x);
        assert_eq!(p2.x, p3.x);
        assert_ne!(p2.y, p3.y);
        assert_eq!((p2.y + p3.y) / 2.0, cfg.canvas_height / 2.0);
        assert_eq!(p4.x - p1.x, 2.0 * cfg.level_width);
        assert_eq!(p1.x, (cfg.canvas_width - 2.0 * cfg.level_width) / 2.0);
    }

    #[test]
    fn test_layout_empty() {
        assert!(auto_layout(&[], &[], &GraphConfig::default()).is_empty());
    }

    #[test]
    fn test_pan_bounds_pads_extent() {
        let cfg = GraphConfig::default();
        let pts = [Position { x: 0.0, y: 0.0 }, Position { x: 250.0, y: 60.0 }];
        let b = pan_bounds(pts.iter(), &cfg);
        assert_eq!(b.min_x, -60.0 - 500.0);
        assert_eq!(b.max_x, 310.0 + 500.0);
        assert_eq!(b.min_y, -25.0 - 500.0);
        assert_eq!(b.max_y, 85.0 + 500.0);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Intake", 120.0), None);
        assert_eq!(truncate_label("Document classification", 120.0).as_deref(), Some("Document class..."));
    }

    #[test]
    fn test_edge_path_connects_sides() {
        let cfg = GraphConfig::default();
        let path = edge_path(Position { x: 0.0, y: 0.0 }, Position { x: 250.0, y: 0.0 }, &cfg);
        assert_eq!(path, "M 120 25 Q 185 25 250 25");
    }
}
