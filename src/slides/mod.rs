pub(crate) mod color;
pub(crate) mod row;
pub(crate) mod theme;
