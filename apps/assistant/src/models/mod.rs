pub mod conversation;
pub mod weather;
