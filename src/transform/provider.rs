use crate::foundation::core::{NodeId, Value};
use crate::foundation::math::Mat4;
use crate::graph::node::{Node, TransformLink};

/// Capability of nodes that produce a 4x4 matrix.
pub trait TransformProvider: Node {
    /// Current matrix, honouring the node's enable pass-through rule.
    fn matrix(&self) -> Mat4;
}

/// Optional upstream of a transform node: another provider or a literal matrix.
///
/// When both are set the node reference wins.
#[derive(Clone, Debug, Default)]
pub struct Upstream {
    pub node: Option<TransformLink>,
    pub matrix: Option<Value<Mat4>>,
}

impl Upstream {
    pub fn node(node: TransformLink) -> Self {
        Self {
            node: Some(node),
            matrix: None,
        }
    }

    pub fn matrix(matrix: impl Into<Value<Mat4>>) -> Self {
        Self {
            node: None,
            matrix: Some(matrix.into()),
        }
    }

    /// Upstream matrix, if any.
    pub fn resolve(&self) -> Option<Mat4> {
        if let Some(node) = &self.node {
            return Some(node.borrow().matrix());
        }
        self.matrix.as_ref().map(Value::resolve)
    }

    /// `local * upstream`, or `local` alone without an upstream.
    pub fn compose(&self, local: Mat4) -> Mat4 {
        match self.resolve() {
            Some(up) => local * up,
            None => local,
        }
    }

    /// What a disabled node reports: the upstream matrix, or identity.
    pub fn pass_through(&self) -> Mat4 {
        self.resolve().unwrap_or(Mat4::IDENTITY)
    }

    pub fn linked(&self) -> Option<NodeId> {
        self.node.as_ref().map(|n| n.id())
    }
}

/// Cached output of a transform node plus its upstream.
#[derive(Debug)]
pub(crate) struct TransformCache {
    upstream: Upstream,
    matrix: Mat4,
}

impl TransformCache {
    pub(crate) fn new(upstream: Upstream) -> Self {
        Self {
            upstream,
            matrix: Mat4::IDENTITY,
        }
    }

    pub(crate) fn upstream(&self) -> &Upstream {
        &self.upstream
    }

    pub(crate) fn set_upstream(&mut self, upstream: Upstream) {
        self.upstream = upstream;
    }

    pub(crate) fn store(&mut self, local: Mat4) {
        self.matrix = self.upstream.compose(local);
    }

    pub(crate) fn cached(&self) -> Mat4 {
        self.matrix
    }

    pub(crate) fn matrix(&self, enabled: bool) -> Mat4 {
        if enabled {
            self.matrix
        } else {
            self.upstream.pass_through()
        }
    }

    pub(crate) fn linked(&self) -> Vec<NodeId> {
        self.upstream.linked().into_iter().collect()
    }
}
