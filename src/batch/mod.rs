pub(crate) mod orchestrator;
pub(crate) mod outcome;
pub(crate) mod spec;
pub(crate) mod store;
