pub(crate) mod admin;
pub(crate) mod assignments;
pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod files;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod router;
pub(crate) mod subjects;
pub(crate) mod submissions;
pub(crate) mod users;
pub(crate) mod validation;
