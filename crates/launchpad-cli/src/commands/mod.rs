pub(crate) mod blog;
pub(crate) mod feedback;
pub(crate) mod keys;
pub(crate) mod theme;
pub(crate) mod waitlist;
