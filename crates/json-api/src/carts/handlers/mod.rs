pub(crate) mod add;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod merge;
pub(crate) mod update;
