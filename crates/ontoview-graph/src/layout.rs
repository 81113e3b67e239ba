//! Geometric layout and viewport state.
//!
//! Rendered coordinates are `zoom * model + pan`. The concentric layout
//! places nodes on rings by level, with higher levels closer to the center,
//! which is what the star relayout and the subontology connectivity display
//! use.

use crate::collection::ElementSet;
use crate::graph::OntoGraph;
use crate::node::Point;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.02;
pub const MAX_ZOOM: f64 = 7.0;

/// Zoom and pan of one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
    /// Canvas extent used by fit and center computations.
    #[serde(skip, default = "default_extent")]
    pub extent: Point,
}

fn default_extent() -> Point {
    Point::new(1280.0, 720.0)
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::default(),
            extent: default_extent(),
        }
    }
}

impl Viewport {
    /// Sets the zoom, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Pans so the given model point lands in the middle of the canvas.
    pub fn center_on(&mut self, point: Point) {
        self.pan = Point::new(
            self.extent.x / 2.0 - self.zoom * point.x,
            self.extent.y / 2.0 - self.zoom * point.y,
        );
    }

    /// Zooms and pans so the bounding box of the given positions fills the
    /// canvas minus padding. Does nothing for an empty slice.
    pub fn fit(&mut self, positions: &[Point], padding: f64) {
        let Some(first) = positions.first() else {
            return;
        };
        let mut min = *first;
        let mut max = *first;
        for p in positions {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let width = (max.x - min.x).max(1.0);
        let height = (max.y - min.y).max(1.0);
        let zoom = ((self.extent.x - 2.0 * padding) / width)
            .min((self.extent.y - 2.0 * padding) / height);
        self.set_zoom(zoom);
        self.center_on(Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0));
    }
}

/// Options for the concentric ring layout.
#[derive(Debug, Clone)]
pub struct ConcentricOptions {
    /// Minimum distance between nodes on a ring and between rings.
    pub min_spacing: f64,
    /// Whether to fit the viewport to the laid-out nodes afterwards.
    pub fit: bool,
    pub padding: f64,
}

impl Default for ConcentricOptions {
    fn default() -> Self {
        Self {
            min_spacing: 175.0,
            fit: true,
            padding: 30.0,
        }
    }
}

impl OntoGraph {
    /// Places the given nodes on concentric rings. `level` assigns each
    /// node a ring level; higher levels are closer to the center. The ring
    /// order of nodes follows the order of the input slice.
    pub fn concentric_layout<F>(&mut self, order: &[NodeIndex], options: &ConcentricOptions, mut level: F)
    where
        F: FnMut(NodeIndex) -> u32,
    {
        let mut rings: Vec<(u32, Vec<NodeIndex>)> = Vec::new();
        for &node in order {
            let l = level(node);
            match rings.iter_mut().find(|(rl, _)| *rl == l) {
                Some((_, members)) => members.push(node),
                None => rings.push((l, vec![node])),
            }
        }
        rings.sort_by(|a, b| b.0.cmp(&a.0));

        let mut radius = 0.0;
        for (i, (_, members)) in rings.iter().enumerate() {
            let needed = members.len() as f64 * options.min_spacing / (2.0 * std::f64::consts::PI);
            if i == 0 && members.len() == 1 {
                radius = 0.0;
            } else {
                radius = (radius + options.min_spacing).max(needed);
            }
            for (j, &node) in members.iter().enumerate() {
                let angle = 2.0 * std::f64::consts::PI * j as f64 / members.len() as f64;
                if let Some(data) = self.node_mut(node) {
                    data.position = Point::new(radius * angle.cos(), radius * angle.sin());
                }
            }
        }

        if options.fit {
            let laid_out: ElementSet = order.iter().copied().collect();
            self.fit(&laid_out, options.padding);
        }
    }

    /// Positions the nodes in a circle of the given radius around the
    /// first node.
    pub fn move_nodes_circle(&mut self, nodes: &[NodeIndex], distance: f64) {
        let Some(&anchor) = nodes.first() else {
            return;
        };
        let Some(center) = self.node(anchor).map(|n| n.position) else {
            return;
        };
        let count = nodes.len();
        for (j, &node) in nodes.iter().enumerate().skip(1) {
            let angle = 2.0 * std::f64::consts::PI * j as f64 / (count - 1) as f64;
            if let Some(data) = self.node_mut(node) {
                data.position = Point::new(
                    center.x + distance * angle.cos(),
                    center.y + distance * angle.sin(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;

    fn distance(a: Point, b: Point) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn test_concentric_levels() {
        let mut g = OntoGraph::new();
        let center = g.add_node(NodeData::new("center")).unwrap();
        let outer: Vec<_> = (0..4)
            .map(|i| g.add_node(NodeData::new(format!("o{i}"))).unwrap())
            .collect();
        let mut order = vec![center];
        order.extend(&outer);

        let options = ConcentricOptions {
            fit: false,
            ..Default::default()
        };
        g.concentric_layout(&order, &options, |n| if n == center { 2 } else { 1 });

        let origin = Point::default();
        assert_eq!(g.node(center).unwrap().position, origin);
        let radii: Vec<f64> = outer
            .iter()
            .map(|&n| distance(g.node(n).unwrap().position, origin))
            .collect();
        assert!(radii.iter().all(|&r| r > 0.0));
        // all outer nodes share one ring
        for r in &radii {
            assert!((r - radii[0]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_move_nodes_circle() {
        let mut g = OntoGraph::new();
        let nodes: Vec<_> = (0..4)
            .map(|i| g.add_node(NodeData::new(format!("n{i}"))).unwrap())
            .collect();
        g.move_nodes_circle(&nodes, 10.0);
        let anchor = g.node(nodes[0]).unwrap().position;
        for &n in &nodes[1..] {
            let d = distance(g.node(n).unwrap().position, anchor);
            assert!((d - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_clamps_zoom() {
        let mut viewport = Viewport::default();
        viewport.fit(&[Point::new(0.0, 0.0), Point::new(0.1, 0.1)], 0.0);
        assert!(viewport.zoom <= MAX_ZOOM);
        viewport.fit(&[Point::new(0.0, 0.0), Point::new(1e9, 1e9)], 0.0);
        assert!(viewport.zoom >= MIN_ZOOM);
    }
}
