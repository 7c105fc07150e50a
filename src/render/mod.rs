pub(crate) mod blend;
pub(crate) mod drawable;
pub(crate) mod image;
pub(crate) mod programs;
pub(crate) mod quad;
pub(crate) mod rect;
pub(crate) mod surface;
