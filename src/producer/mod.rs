//! The `producer` module holds the publishing side of the client: the
//! `Message` type, topic validation and the buffering `Producer` handle.

pub mod engine;
pub mod message;
pub mod topic;

pub use engine::Producer;
pub use message::Message;

#[cfg(test)]
mod tests;
