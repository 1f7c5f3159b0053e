pub mod dom_model;
pub mod error;
pub mod query;
