pub mod extract;
pub mod handlers;
pub mod operations;
pub mod schema;
