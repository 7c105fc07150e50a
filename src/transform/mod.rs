pub(crate) mod forest;
pub(crate) mod forest_def;
pub(crate) mod matrix;
pub(crate) mod pivot;
pub(crate) mod provider;
pub(crate) mod rotate;
pub(crate) mod scale;
pub(crate) mod translate;
