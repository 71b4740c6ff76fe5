pub(crate) const fn default_limit() -> i64 {
    50
}
