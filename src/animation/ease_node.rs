use crate::animation::ease::Ease;
use crate::foundation::core::Value;
use crate::foundation::error::PageResult;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind};

#[derive(Clone, Debug)]
pub struct EaseParams {
    pub ease: Value<String>,
    pub start_value: Value<f64>,
    pub end_value: Value<f64>,
    /// Seconds per iteration.
    pub duration: Value<f64>,
    /// Seconds to wait after `start` before the first iteration.
    pub delay: Value<f64>,
    pub count: Value<u32>,
    /// Run every second iteration backwards.
    pub reverse: Value<bool>,
}

impl Default for EaseParams {
    fn default() -> Self {
        Self {
            ease: "linear".into(),
            start_value: Value::Literal(0.0),
            end_value: Value::Literal(0.0),
            duration: Value::Literal(0.0),
            delay: Value::Literal(0.0),
            count: Value::Literal(1),
            reverse: Value::Literal(false),
        }
    }
}

impl EaseParams {
    pub fn tween(start: f64, end: f64, duration_secs: f64) -> Self {
        Self {
            start_value: start.into(),
            end_value: end.into(),
            duration: duration_secs.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EaseState {
    Stopped,
    Delay,
    Running,
    Paused,
}

impl EaseState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stop",
            Self::Delay => "delay",
            Self::Running => "iteration",
            Self::Paused => "pause",
        }
    }
}

/// Frame-driven tween between two values.
///
/// Emits `start`, `startIteration`, `iteration`, `stopIteration`, `pause`, `resume`, `stop` and
/// `clear` with a status payload. Listeners run while the node is borrowed and must read the
/// payload instead of the node.
pub struct EaseNode {
    base: NodeBase,
    params: EaseParams,
    state: EaseState,
    paused_from: EaseState,
    iteration: u32,
    elapsed: f64,
    value: f64,
    progress: f64,
}

impl NodeKind for EaseNode {
    type Params = EaseParams;
    const TYPE_NAME: &'static str = "ease";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let value = params.start_value.resolve();
        Ok(Self {
            base,
            params,
            state: EaseState::Stopped,
            paused_from: EaseState::Stopped,
            iteration: 0,
            elapsed: 0.0,
            value,
            progress: 0.0,
        })
    }
}

impl EaseNode {
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Un-eased progress of the current iteration, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> EaseState {
        self.state
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn start(&mut self) {
        self.reset();
        self.emit("start");
        if self.params.delay.resolve() > 0.0 {
            self.state = EaseState::Delay;
        } else {
            self.begin_iteration(0.0);
        }
    }

    pub fn stop(&mut self) {
        self.state = EaseState::Stopped;
        self.emit("stop");
    }

    /// Stop and rewind to the start value.
    pub fn clear(&mut self) {
        self.reset();
        self.state = EaseState::Stopped;
        self.emit("clear");
    }

    pub fn pause(&mut self) {
        if matches!(self.state, EaseState::Delay | EaseState::Running) {
            self.paused_from = self.state;
            self.state = EaseState::Paused;
            self.emit("pause");
        }
    }

    pub fn resume(&mut self) {
        if self.state == EaseState::Paused {
            self.state = self.paused_from;
            self.emit("resume");
        }
    }

    /// Advance the tween by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        match self.state {
            EaseState::Stopped | EaseState::Paused => {}
            EaseState::Delay => {
                self.elapsed += dt;
                let delay = self.params.delay.resolve();
                if self.elapsed >= delay {
                    self.begin_iteration(self.elapsed - delay);
                }
            }
            EaseState::Running => {
                self.elapsed += dt;
                let duration = self.params.duration.resolve();
                let p = if duration > 0.0 {
                    self.elapsed / duration
                } else {
                    1.0
                };
                if p >= 1.0 {
                    self.calc(1.0);
                    self.emit("stopIteration");
                    if self.iteration >= self.params.count.resolve() {
                        self.stop();
                    } else {
                        let overshoot = if duration > 0.0 {
                            self.elapsed - duration
                        } else {
                            0.0
                        };
                        self.begin_iteration(overshoot);
                    }
                } else {
                    self.calc(p);
                    self.emit("iteration");
                }
            }
        }
    }

    fn reset(&mut self) {
        self.value = self.params.start_value.resolve();
        self.progress = 0.0;
        self.iteration = 0;
        self.elapsed = 0.0;
    }

    /// `carried` is time already spent past the previous boundary; it counts toward this iteration.
    fn begin_iteration(&mut self, carried: f64) {
        if self.iteration >= self.params.count.resolve() {
            self.stop();
            return;
        }
        self.iteration += 1;
        self.elapsed = carried;
        self.calc(0.0);
        self.state = EaseState::Running;
        self.emit("startIteration");
    }

    fn calc(&mut self, p: f64) {
        let ease = Ease::parse(&self.params.ease.resolve());
        let mut eased = ease.apply(p);
        if self.params.reverse.resolve() && self.iteration.is_multiple_of(2) {
            eased = 1.0 - eased;
        }
        let start = self.params.start_value.resolve();
        let end = self.params.end_value.resolve();
        self.value = start + eased * (end - start);
        self.progress = p;
    }

    fn emit(&self, event: &str) {
        let status = serde_json::json!({
            "iterationNumber": self.iteration,
            "state": self.state.as_str(),
            "value": self.value,
            "parametricValue": self.progress,
        });
        self.base.events().trigger(event, &status);
    }
}

impl Node for EaseNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if self.base.should_update() {
            self.advance(ctx.dt_secs);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease_node.rs"]
mod tests;
