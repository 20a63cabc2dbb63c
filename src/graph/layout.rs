//! Coordinate layout: layers → pixel positions and canvas size.

use serde::{Deserialize, Serialize};

// Box and gap sizes (in logical pixels).
const NODE_WIDTH: f64 = 200.0;
const NODE_HEIGHT: f64 = 60.0;
const HORIZONTAL_GAP: f64 = 30.0;
const VERTICAL_GAP: f64 = 100.0;
const MIN_CANVAS_WIDTH: f64 = 800.0;
const MIN_CANVAS_HEIGHT: f64 = 600.0;

/// Node box dimensions, gaps and the minimum canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            horizontal_gap: HORIZONTAL_GAP,
            vertical_gap: VERTICAL_GAP,
            min_width: MIN_CANVAS_WIDTH,
            min_height: MIN_CANVAS_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Cubic connector from a dependency's bottom edge to a dependent's top edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    /// SVG path data for the same curve.
    pub d: String,
}

impl LayoutConfig {
    /// Width of a layer holding `count` boxes.
    #[must_use]
    pub fn layer_width(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        n * self.node_width + (n - 1.0) * self.horizontal_gap
    }

    /// Canvas width: the widest layer, floored at `min_width`.
    #[must_use]
    pub fn canvas_width(&self, layer_sizes: &[usize]) -> f64 {
        let widest = layer_sizes
            .iter()
            .map(|&count| self.layer_width(count))
            .fold(0.0, f64::max);
        widest.max(self.min_width)
    }

    /// Canvas height for `layer_count` stacked layers, floored at `min_height`.
    #[must_use]
    pub fn canvas_height(&self, layer_count: usize) -> f64 {
        if layer_count == 0 {
            return self.min_height;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = layer_count as f64;
        (n * self.node_height + (n - 1.0) * self.vertical_gap).max(self.min_height)
    }

    /// Top-left corner of box `slot` in layer `layer` of `layer_len` boxes.
    #[must_use]
    pub fn position(&self, canvas_width: f64, layer: usize, layer_len: usize, slot: usize) -> Point {
        let start_x = (canvas_width - self.layer_width(layer_len)) / 2.0;
        #[allow(clippy::cast_precision_loss)]
        let x = start_x + slot as f64 * (self.node_width + self.horizontal_gap);
        #[allow(clippy::cast_precision_loss)]
        let y = layer as f64 * (self.node_height + self.vertical_gap);
        Point { x, y }
    }

    /// Connector between the boxes whose top-left corners are `source` and `target`.
    #[must_use]
    pub fn connector(&self, source: Point, target: Point) -> Connector {
        let start = Point { x: source.x + self.node_width / 2.0, y: source.y + self.node_height };
        let end = Point { x: target.x + self.node_width / 2.0, y: target.y };
        let dy = end.y - start.y;
        let control1 = Point { x: start.x, y: start.y + dy / 2.0 };
        let control2 = Point { x: end.x, y: end.y - dy / 2.0 };
        let d = format!(
            "M {} {} C {} {}, {} {}, {} {}",
            start.x, start.y, control1.x, control1.y, control2.x, control2.y, end.x, end.y
        );
        Connector { start, control1, control2, end, d }
    }
}
