//! Internal canonical types for request and stream representation
//!
//! These types are provider-agnostic; every wire format converts to and
//! from them.

pub mod message;
pub mod request;
pub mod stream;

pub use message::{Content, ContentPart, ImageUrl, Message, Role};
pub use request::{ImageData, NormalizedRequest, Turn, TurnRole};
pub use stream::{FramedEvent, Increment};
