pub(crate) mod ease;
pub(crate) mod ease_node;
