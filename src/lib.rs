//! Chat client for a retrieval-augmented-generation backend.
//!
//! The [`gateway`] performs HTTP exchanges, the [`session`] holds the chat
//! state, and the [`controller`] ties the two together.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod gateway;
pub mod models;
pub mod paths;
pub mod session;
pub mod upload;

pub use controller::ChatController;
pub use gateway::{Exchange, ExchangeBody, ExchangeError, HttpGateway, RequestGateway};
pub use models::{Message, Sender, Toggles, Transcript};
pub use session::ChatSession;
