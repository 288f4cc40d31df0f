//! Map widget contract.
//!
//! The map is an external collaborator consumed one-way: the session tells
//! it where to look, it renders. At most one marker exists at a time;
//! placing a marker replaces the previous one.

/// One-way interface to the map widget.
pub trait MapWidget: Send {
    /// Center the viewport on a coordinate.
    fn recenter(&mut self, lat: f64, lon: f64, zoom: u8);

    /// Place the marker, replacing any previous one.
    fn place_marker(&mut self, lat: f64, lon: f64, label: &str);

    /// Let the widget recompute its size after becoming visible.
    fn resize_if_needed(&mut self);
}

/// Map that ignores every instruction (headless hosts).
#[derive(Debug, Default)]
pub struct NoopMap;

impl MapWidget for NoopMap {
    fn recenter(&mut self, _lat: f64, _lon: f64, _zoom: u8) {}

    fn place_marker(&mut self, _lat: f64, _lon: f64, _label: &str) {}

    fn resize_if_needed(&mut self) {}
}
