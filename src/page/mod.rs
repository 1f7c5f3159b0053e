pub mod page_model;
pub mod runtime;
pub mod timers;
