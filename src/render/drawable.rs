use crate::graph::node::Node;

/// Anything with a pixel size that draw nodes and pivot points can measure.
pub trait SizedDrawable: Node {
    fn width(&self) -> f64;

    fn height(&self) -> f64;
}
