pub(crate) mod assignment_files;
pub(crate) mod assignments;
pub(crate) mod health;
pub(crate) mod submissions;
pub(crate) mod subjects;
pub(crate) mod users;
