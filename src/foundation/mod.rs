pub(crate) mod core;
pub(crate) mod digest;
pub(crate) mod error;
