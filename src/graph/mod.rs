pub(crate) mod emitter;
pub(crate) mod frame;
pub(crate) mod func;
pub(crate) mod node;
pub(crate) mod page;
pub(crate) mod scheduler;
