pub(crate) mod geometry;
pub(crate) mod input;
pub(crate) mod router;
