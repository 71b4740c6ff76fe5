pub(crate) mod grading;
pub(crate) mod judge_client;
