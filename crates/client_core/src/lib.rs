//! Client side of the cultural storytelling service.
//!
//! [`StoryController`] owns the session state, talks to the service through a
//! [`StoryBackend`] and paints results through a [`Renderer`].

pub mod backend;
pub mod controller;
pub mod error;
pub mod media;
pub mod render;
pub mod session;

pub use backend::{HttpStoryBackend, StoryBackend};
pub use controller::{Outcome, StoryController};
pub use error::ClientError;
pub use render::{Control, Element, Player, Renderer, ScrollAlign};
pub use session::SessionState;
