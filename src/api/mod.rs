pub mod client;
pub mod convert;
pub mod endpoints;
pub mod models;
