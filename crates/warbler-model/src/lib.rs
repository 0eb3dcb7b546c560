pub mod error;
pub mod message;
pub mod user;

mod time;

pub use error::ModelError;
pub use message::{Like, Message};
pub use user::{Follow, User};
