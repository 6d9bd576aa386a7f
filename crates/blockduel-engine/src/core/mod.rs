pub use self::{board::*, line_catalog::*, shape::*};

pub(crate) mod board;
pub(crate) mod line_catalog;
pub(crate) mod shape;
