pub mod guard;
pub mod token;

pub use guard::{Decision, Guard, Operation};
pub use token::{Claims, TokenKeys};
