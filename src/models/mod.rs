pub mod user;
pub mod webhook_event;

pub use user::*;
pub use webhook_event::*;
