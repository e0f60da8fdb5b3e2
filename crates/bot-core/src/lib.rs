//! # bot-core
//!
//! Front-end agnostic conversation plumbing.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  InputEvent   ┌──────────────┐  dispatch  ┌──────────────┐
//! │  Front end   │──────────────▶│  Authorizer  │───────────▶│ State machine│
//! │ (HTTP, chat) │◀──────────────│   (guard)    │            │ + Session    │
//! └──────────────┘  Vec<Reply>   └──────────────┘            └──────────────┘
//! ```
//!
//! The front end only ever sees `InputEvent`s going in and `Reply`s coming
//! out; sessions are keyed per `UserId` so several identities never share
//! flow state.

pub mod auth;
pub mod error;
pub mod message;
pub mod session;

pub use auth::Authorizer;
pub use error::{BotError, Result, DENIAL_MESSAGE};
pub use message::{Choice, IncomingEvent, InputEvent, Reply, UserId};
pub use session::{ConversationState, MemorySessionStore, Session, SessionHandle, SessionStore};
