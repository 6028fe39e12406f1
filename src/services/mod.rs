pub(crate) mod access;
pub(crate) mod statistics;
pub(crate) mod storage;
