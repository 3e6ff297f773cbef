//! Live submission results for the arbitre grading service.
//!
//! Opens the push channel of an exercise, folds the incremental test results
//! it streams into an identifier-keyed map, and derives a renderable summary
//! of the grading progress.
//!
//! ```rust,no_run
//! use arbitre_live::channel::{ChannelEndpoint, ChannelTarget};
//! use arbitre_live::session::ResultSession;
//!
//! # async fn example() -> arbitre_live::prelude::Result<()> {
//! let endpoint = ChannelEndpoint::new("localhost:8000", false);
//! let mut session = ResultSession::new(endpoint, Some(20.0));
//! session.open(ChannelTarget::own(12), Some("access-token")).await?;
//!
//! while session.next_event().await.is_some() {
//!     print!("{}", session.view());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod api;
pub mod channel;
pub mod config;
pub mod error;
pub mod models;
pub mod notification;
pub mod prelude;
pub mod result_map;
pub mod session;
pub mod state;
pub mod view;
pub mod ws_message;
