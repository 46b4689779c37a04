//! Client-side building blocks for talking to REST APIs.
//!
//! This crate provides three independent pieces:
//!
//!   * A [`Cookie`] type with an RFC 6265(bis) `Set-Cookie` parser, and a
//!     [`CookieJar`] that stores cookies received from servers and selects
//!     the ones to send with each request.
//!   * An RFC 5988 `Link` header parser producing [`Links`].
//!   * A [`Formats`] registry mapping `Content-Type` values to body
//!     [`Format`]s such as JSON, newline-delimited JSON and URL-encoded forms.
//!
//! # Usage
//!
//! Add the following to the `[dependencies]` section of your `Cargo.toml`:
//!
//! ```toml
//! webrest = "0.4"
//! ```
//!
//! A typical request/response cycle:
//!
//! ```rust
//! use url::Url;
//! use webrest::{CookieJar, Formats, Links};
//!
//! let mut jar = CookieJar::new();
//! let formats = Formats::defaults();
//!
//! // Response to GET https://api.example.com/users
//! let uri = Url::parse("https://api.example.com/users").unwrap();
//! jar.store(vec!["session=0x6100; Path=/; Secure; HttpOnly"], &uri);
//! let links = Links::from_header(Some(r#"<https://api.example.com/users?page=2>; rel="next""#)).unwrap();
//! let format = formats.named(Some("application/json; charset=utf-8"));
//! let users = format.deserialize(&mut &br#"[{"id": 1}]"#[..]).unwrap();
//! assert_eq!(users[0]["id"], 1);
//!
//! // Next request
//! let next = links.uri("next").unwrap();
//! assert_eq!(jar.header_for(next, None).as_deref(), Some("session=0x6100"));
//! ```
//!
//! # Features
//!
//! This crate can be configured at compile-time through the following Cargo
//! features:
//!
//! * **serde** (disabled by default)
//!
//!   Implements `Serialize` and `Deserialize` for [`Link`], [`Links`] and
//!   [`SameSite`].
//!
//! # Logging
//!
//! Cookies that are rejected while parsing `Set-Cookie` headers are dropped
//! silently; the reason is reported through the [`log`] facade at `debug`
//! level.

pub mod cookie;
pub mod error;
pub mod format;
mod jar;
mod link;

#[doc(inline)]
pub use crate::cookie::{prefix, Cookie, CookieBuilder, PlainCookie, SameSite};
#[doc(inline)]
pub use crate::error::{CodecError, Direction, FormatError, ParseError};
#[doc(inline)]
pub use crate::format::{Format, Formats};
pub use crate::jar::{CookieJar, CookieUpdate, IntoUrl, Iter, SharedCookieJar, ValidFor};
pub use crate::link::{All, Link, Links, Search};
