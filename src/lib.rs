//! Typed client for the admin console backend.
//!
//! The backend wraps every response in a `{code, data, msg}` envelope; this
//! crate owns the client side of that contract:
//!
//! - [`http::Client`] — synchronous HTTP wrapper with the bearer-token
//!   lifecycle (attach, rotate from `x-renewed-token`, forced logout on the
//!   token-invalid code).
//! - [`api`] — one typed module per backend resource (auth, config,
//!   dashboard, platform user management).
//! - [`dict::DictStore`] — process-wide dictionary cache, bulk-fetched and
//!   persisted to disk.
//! - [`utils`] — pure formatting helpers.
//! - [`config`] — layered client configuration and session persistence for
//!   the `adminctl` binary.
//!
//! ```rust,no_run
//! use admin_client::{config, http::Client};
//!
//! let client = Client::new(&config::load());
//! client.set_token("eyJ...");
//! let me = client.platform().me()?;
//! println!("logged in as {}", me.username);
//! # Ok::<(), admin_client::http::Error>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod dict;
pub mod http;
pub mod utils;
