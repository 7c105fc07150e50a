use std::fmt;

use crate::event::router::Hit;
use crate::foundation::core::{ObjectId, Point, Rect, Size};
use crate::foundation::math::Vec3;

/// Pointer event kinds the router dispatches. Touch input is mapped onto these by the host.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    DblClick,
    MouseMove,
    ContextMenu,
    MouseDown,
    MouseUp,
    MouseOver,
    MouseOut,
    Wheel,
}

impl EventKind {
    pub const ALL: [Self; 9] = [
        Self::Click,
        Self::DblClick,
        Self::MouseMove,
        Self::ContextMenu,
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseOver,
        Self::MouseOut,
        Self::Wheel,
    ];

    /// Case-insensitive parse of the DOM-style name; `None` for unknown types.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::MouseMove => "mousemove",
            Self::ContextMenu => "contextmenu",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::Wheel => "wheel",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch pass: `Down` visits hits nearest-first, `Up` farthest-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Down,
    Up,
}

impl Phase {
    /// `"down"` (case-insensitive) is [`Phase::Down`]; anything else is [`Phase::Up`].
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("down") {
            Self::Down
        } else {
            Self::Up
        }
    }
}

/// Raw pointer input as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: EventKind,
    /// Pointer position in client (page) pixels.
    pub client: Point,
    /// Bounding rectangle of the surface element in client pixels.
    pub target_rect: Rect,
    /// Surface size in pixels.
    pub surface_size: Size,
    /// Wheel delta, for [`EventKind::Wheel`].
    pub delta_y: Option<f64>,
}

impl PointerEvent {
    pub fn new(kind: EventKind, client: Point, target_rect: Rect, surface_size: Size) -> Self {
        Self {
            kind,
            client,
            target_rect,
            surface_size,
            delta_y: None,
        }
    }

    /// Event over a surface placed at the client origin with a matching rect.
    pub fn at(kind: EventKind, x: f64, y: f64, surface_size: Size) -> Self {
        Self::new(
            kind,
            Point::new(x, y),
            Rect::from_origin_size(Point::ORIGIN, surface_size),
            surface_size,
        )
    }

    pub fn with_delta_y(mut self, delta_y: f64) -> Self {
        self.delta_y = Some(delta_y);
        self
    }

    /// Surface pixel position with the y axis pointing up.
    pub fn surface_position(&self) -> Point {
        let x = self.client.x - self.target_rect.x0;
        let y = self.surface_size.height - (self.client.y - self.target_rect.y0);
        Point::new(x, y)
    }

    /// Clip-space position in `[-1, 1]` on both axes.
    pub fn clip_position(&self) -> Point {
        let p = self.surface_position();
        Point::new(
            2.0 * p.x / self.surface_size.width - 1.0,
            2.0 * p.y / self.surface_size.height - 1.0,
        )
    }
}

/// Payload handed to event handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct EventInfo {
    pub kind: EventKind,
    pub object_id: ObjectId,
    pub phase: Phase,
    pub u: f64,
    pub v: f64,
    /// Surface pixel position, y up.
    pub position: Point,
    /// Hit point in clip space.
    pub coord: Vec3,
    pub delta_y: Option<f64>,
    stop: bool,
    cursor: Option<String>,
}

impl EventInfo {
    pub(crate) fn new(
        kind: EventKind,
        phase: Phase,
        hit: &Hit,
        event: &PointerEvent,
    ) -> Self {
        Self {
            kind,
            object_id: hit.id.clone(),
            phase,
            u: hit.u,
            v: hit.v,
            position: event.surface_position(),
            coord: hit.point,
            delta_y: event.delta_y,
            stop: false,
            cursor: None,
        }
    }

    /// Skip the remaining objects of this pass, and the `up` pass if called during `down`.
    pub fn stop_propagation(&mut self) {
        self.stop = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stop
    }

    /// Ask the host to show `cursor` (CSS cursor name).
    pub fn set_cursor(&mut self, cursor: impl Into<String>) {
        self.cursor = Some(cursor.into());
    }

    pub(crate) fn take_cursor(&mut self) -> Option<String> {
        self.cursor.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/event/input.rs"]
mod tests;
