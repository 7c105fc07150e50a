use crate::foundation::core::Value;
use crate::foundation::error::PageResult;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Hook, Node, NodeBase, NodeKind};

#[derive(Clone)]
pub struct FuncParams {
    pub code: Option<Hook>,
    /// Also call once at construction (when enabled).
    pub instant_call: Value<bool>,
}

impl Default for FuncParams {
    fn default() -> Self {
        Self {
            code: None,
            instant_call: Value::Literal(false),
        }
    }
}

impl FuncParams {
    pub fn new(code: impl Fn() + 'static) -> Self {
        Self {
            code: Some(std::rc::Rc::new(code)),
            ..Self::default()
        }
    }

    pub fn instant(mut self) -> Self {
        self.instant_call = Value::Literal(true);
        self
    }
}

/// Runs a callback on its turn in the frame.
pub struct FuncNode {
    base: NodeBase,
    code: Option<Hook>,
}

impl NodeKind for FuncNode {
    type Params = FuncParams;
    const TYPE_NAME: &'static str = "func";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let node = Self {
            base,
            code: params.code,
        };
        if node.base.enabled() && params.instant_call.resolve() {
            node.call();
        }
        Ok(node)
    }
}

impl FuncNode {
    pub fn call(&self) {
        if let Some(code) = &self.code {
            code();
        }
    }

    pub fn set_code(&mut self, code: impl Fn() + 'static) {
        self.code = Some(std::rc::Rc::new(code));
    }
}

impl Node for FuncNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update(&mut self, _ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if self.base.should_update() {
            self.call();
        }
        Ok(())
    }
}
