pub(crate) mod questions;
pub(crate) mod sessions;
pub(crate) mod submissions;
