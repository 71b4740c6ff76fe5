mod commands;
mod queries;
mod types;

pub(crate) use commands::{insert, override_score};
pub(crate) use queries::{find_by_id, list_by_user};
pub(crate) use types::{HistoryFilter, NewSubmission};
