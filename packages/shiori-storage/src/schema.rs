/// Schema for the read-side store. Mirrors the tables the external
/// ingestion process writes, so an empty store (first run, tests) gets
/// the same shape, including the junction indexes the tag lookups rely
/// on.
pub const INIT_SQL: &str = include_str!("../sql/init.sql");
