pub mod paths;
pub mod query;
