use std::collections::BTreeMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::event::geometry::{RouterConfig, TrianglePair};
use crate::event::input::{EventInfo, EventKind, Phase, PointerEvent};
use crate::foundation::core::ObjectId;
use crate::foundation::error::PageResult;
use crate::foundation::math::Vec3;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind};

/// Event handler. Runs while the router is borrowed, so it must not touch the router itself.
pub type EventHandler = Rc<dyn Fn(&mut EventInfo)>;

/// One object under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub id: ObjectId,
    pub u: f64,
    pub v: f64,
    /// Intersection point in clip space; `point.z` is the depth used for ordering.
    pub point: Vec3,
}

pub type HitList = SmallVec<[Hit; 4]>;

/// Result of one [`EventRouter::dispatch`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Objects hit by the primary event, in registry order.
    pub hits: Vec<Hit>,
    /// The primary event's propagation was stopped.
    pub stopped: bool,
    /// Ids that received `mouseover` (mouse moves only).
    pub entered: Vec<ObjectId>,
    /// Ids that received `mouseout` (mouse moves only).
    pub left: Vec<ObjectId>,
    /// Last cursor requested by a handler.
    pub cursor: Option<String>,
    /// Handler invocations across all passes.
    pub handlers_run: usize,
}

#[derive(Clone, Debug)]
struct Target {
    tombstone: bool,
    triangles: TrianglePair,
}

type HandlerTable = BTreeMap<(EventKind, Phase), BTreeMap<ObjectId, Vec<EventHandler>>>;

#[derive(Clone, Debug, Default)]
pub struct RouterParams {
    pub config: RouterConfig,
}

/// Routes pointer input to logical objects by hit-testing their registered quads.
///
/// Registrations are refreshed every frame. The router's update hook is a mark-and-sweep pass:
/// an object that is not re-registered survives exactly one more frame.
pub struct EventRouter {
    base: NodeBase,
    config: RouterConfig,
    targets: BTreeMap<ObjectId, Target>,
    handlers: HandlerTable,
    hovered: Vec<Hit>,
}

impl NodeKind for EventRouter {
    type Params = RouterParams;
    const TYPE_NAME: &'static str = "event";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        Ok(Self {
            base,
            config: params.config,
            targets: BTreeMap::new(),
            handlers: BTreeMap::new(),
            hovered: Vec::new(),
        })
    }
}

impl EventRouter {
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RouterConfig) {
        self.config = config;
    }

    /// Register or refresh the quad of `id` for this frame.
    pub fn register(&mut self, id: impl Into<ObjectId>, triangles: TrianglePair) {
        self.targets.insert(
            id.into(),
            Target {
                tombstone: false,
                triangles,
            },
        );
    }

    /// Evict everything marked by the previous pass, then mark what remains.
    pub fn collect_garbage(&mut self) {
        let before = self.targets.len();
        self.targets.retain(|_, t| !t.tombstone);
        for target in self.targets.values_mut() {
            target.tombstone = true;
        }
        let evicted = before - self.targets.len();
        if evicted > 0 {
            tracing::trace!(router = %self.base.id(), evicted, "hit targets evicted");
        }
    }

    pub fn is_registered(&self, id: &ObjectId) -> bool {
        self.targets.contains_key(id)
    }

    pub fn registered_len(&self) -> usize {
        self.targets.len()
    }

    /// Add `handler` for `event` / `phase` on each target id.
    ///
    /// Returns `false` for an unknown event type. Phase `"down"` is case-insensitive; every other
    /// phase string means `up`.
    pub fn on<I, T>(&mut self, event: &str, phase: &str, targets: I, handler: EventHandler) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectId>,
    {
        let Some(kind) = EventKind::parse(event) else {
            tracing::debug!(event, "unknown event type, handler not registered");
            return false;
        };
        self.on_kind(kind, Phase::parse(phase), targets, handler);
        true
    }

    pub fn on_kind<I, T>(&mut self, kind: EventKind, phase: Phase, targets: I, handler: EventHandler)
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectId>,
    {
        let table = self.handlers.entry((kind, phase)).or_default();
        for id in targets {
            let set = table.entry(id.into()).or_default();
            if !set.iter().any(|h| Rc::ptr_eq(h, &handler)) {
                set.push(Rc::clone(&handler));
            }
        }
    }

    /// Remove `handler` from `event` / `phase` on each target id. Returns `true` if anything
    /// was removed.
    pub fn off<I, T>(&mut self, event: &str, phase: &str, targets: I, handler: &EventHandler) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectId>,
    {
        let Some(kind) = EventKind::parse(event) else {
            return false;
        };
        let Some(table) = self.handlers.get_mut(&(kind, Phase::parse(phase))) else {
            return false;
        };
        let mut removed = false;
        for id in targets {
            if let Some(set) = table.get_mut(&id.into()) {
                let before = set.len();
                set.retain(|h| !Rc::ptr_eq(h, handler));
                removed |= set.len() != before;
            }
        }
        removed
    }

    /// Every registered object under clip position `(x, y)`, in id order.
    pub fn hit_test(&self, x: f64, y: f64) -> HitList {
        self.targets
            .iter()
            .filter_map(|(id, target)| {
                target.triangles.intersect(x, y, &self.config).map(|h| Hit {
                    id: id.clone(),
                    u: h.u,
                    v: h.v,
                    point: h.point,
                })
            })
            .collect()
    }

    /// Hit-test `event` and run the matching handlers.
    ///
    /// Mouse moves first synthesize `mouseout` for objects no longer hit, then `mouseover` for
    /// newly hit ones, then run `mousemove`; each pass has its own propagation flag.
    #[tracing::instrument(skip(self, event), fields(router = %self.base.id(), kind = %event.kind))]
    pub fn dispatch(&mut self, event: &PointerEvent) -> DispatchOutcome {
        let clip = event.clip_position();
        let hits = self.hit_test(clip.x, clip.y);
        let mut outcome = DispatchOutcome::default();

        if event.kind == EventKind::MouseMove {
            let left: Vec<Hit> = self
                .hovered
                .iter()
                .filter(|h| !hits.iter().any(|n| n.id == h.id))
                .cloned()
                .collect();
            let entered: Vec<Hit> = hits
                .iter()
                .filter(|h| !self.hovered.iter().any(|p| p.id == h.id))
                .cloned()
                .collect();
            self.run(EventKind::MouseOut, left.clone(), event, &mut outcome);
            self.run(EventKind::MouseOver, entered.clone(), event, &mut outcome);
            outcome.left = left.into_iter().map(|h| h.id).collect();
            outcome.entered = entered.into_iter().map(|h| h.id).collect();
            self.hovered = hits.to_vec();
        }

        outcome.stopped = self.run(event.kind, hits.to_vec(), event, &mut outcome);
        outcome.hits = hits.into_vec();
        tracing::debug!(
            hits = outcome.hits.len(),
            stopped = outcome.stopped,
            handlers = outcome.handlers_run,
            "dispatched"
        );
        outcome
    }

    /// One down+up pass over `objects`. Returns whether propagation was stopped.
    fn run(
        &self,
        kind: EventKind,
        mut objects: Vec<Hit>,
        event: &PointerEvent,
        outcome: &mut DispatchOutcome,
    ) -> bool {
        objects.sort_by(|a, b| a.point.z.total_cmp(&b.point.z));
        if self.run_phase(kind, Phase::Down, &objects, event, outcome) {
            return true;
        }
        objects.sort_by(|a, b| b.point.z.total_cmp(&a.point.z));
        self.run_phase(kind, Phase::Up, &objects, event, outcome)
    }

    fn run_phase(
        &self,
        kind: EventKind,
        phase: Phase,
        objects: &[Hit],
        event: &PointerEvent,
        outcome: &mut DispatchOutcome,
    ) -> bool {
        let Some(table) = self.handlers.get(&(kind, phase)) else {
            return false;
        };
        for hit in objects {
            let Some(set) = table.get(&hit.id) else {
                continue;
            };
            let mut info = EventInfo::new(kind, phase, hit, event);
            for handler in set {
                handler(&mut info);
                outcome.handlers_run += 1;
            }
            if let Some(cursor) = info.take_cursor() {
                outcome.cursor = Some(cursor);
            }
            if info.is_stopped() {
                return true;
            }
        }
        false
    }
}

impl Node for EventRouter {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update(&mut self, _ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        self.collect_garbage();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/event/router.rs"]
mod tests;
