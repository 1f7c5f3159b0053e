pub mod annotations;
pub mod caret;
pub mod collector;
pub mod controller;
pub mod error;
pub mod form_model;
pub mod gateway;
pub mod notifier;
pub mod validator;
