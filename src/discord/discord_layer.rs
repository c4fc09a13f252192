// Discord layer - event handlers and the data shared between them.

#[path = "bot_data.rs"]
pub mod bot_data;

#[path = "events/message_events.rs"]
pub mod message_events;

#[path = "presence.rs"]
pub mod presence;

pub use bot_data::{Data, Error};
