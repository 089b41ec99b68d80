//! A session engine for the CMPP 3.0 (China Mobile Peer-to-Peer) short-message protocol.
//!
//! This crate owns the hard part of talking to a CMPP gateway: authenticating, keeping a
//! bounded number of submissions in flight, correlating asynchronous responses back to the
//! caller that sent them, splitting long text into concatenated SMS fragments, recovering from
//! link failures, and dispatching mobile-originated messages and delivery reports.
//!
//! It does not implement the byte-level framing of a particular transport: that is the
//! [`Transport`] trait. A minimal TCP implementation is provided in [`transport::TcpTransport`]
//! for convenience.
//!
//! ```no_run
//! use cmpp::{ClientConfigBuilder, MessageSink, Session};
//! use cmpp::transport::TcpTransport;
//!
//! struct Logger;
//! impl MessageSink for Logger {
//!     fn on_message_receive(&self, content: &str, source: &str, message_id: i64, destination: &str) {
//!         println!("MO from {source} to {destination}: {content} ({message_id})");
//!     }
//!     fn on_message_report(&self, message_id: i64, status_text: &str, destination: &str) {
//!         println!("report for {message_id} to {destination}: {status_text}");
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfigBuilder::new()
//!     .sp_code("106575")
//!     .gateway_username("600001")
//!     .gateway_password("password")
//!     .service_id("SP001")
//!     .build()?;
//!
//! let transport = TcpTransport::new("127.0.0.1:7890");
//! let session = Session::start(config, Box::new(transport), Box::new(Logger))?;
//! let (status, message_ids) = session.send("001", &["13800000000"], "hello", false);
//! println!("{status:?} {message_ids:?}");
//! session.stop();
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

mod auth;
mod config;
mod error;
mod fragment;
mod pending;
mod sequence;
mod session;
mod status;
mod timing;
mod window;

pub mod events;
pub mod protocol;
pub mod transport;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{CmppError, ConfigError};
pub use events::MessageSink;
pub use session::{Session, SessionState};
pub use status::SendStatus;
pub use timing::SessionTiming;
pub use transport::Transport;
