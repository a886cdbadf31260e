//! An incremental parser for `multipart` bodies, with an async stream of parts
//! on top.
//!
//! The core is [`Parser`], a state machine that takes the body in chunks of any
//! size and reports header names, header values and part data to a [`Handler`]
//! as soon as they are seen, without buffering the body. [`Consumer`] joins the
//! fragmented callbacks back into whole headers and part bodies, and
//! [`Multipart`] drives the whole thing from a `Stream` of [`Bytes`] yielding
//! owned [`Part`]s.
//!
//! # Examples
//!
//! ```
//! use multiparse::{coalesce, Event, Parser};
//!
//! let body = b"--X-BOUNDARY\r\nContent-Type: text/plain\r\n\r\nabcd\r\n--X-BOUNDARY--";
//!
//! let mut parser = Parser::new("X-BOUNDARY", Vec::new());
//! for chunk in body.chunks(5) {
//!     assert_eq!(parser.execute(chunk), chunk.len());
//! }
//!
//! let events = coalesce(parser.into_handler());
//! assert_eq!(events[4], Event::PartData("abcd".into()));
//! ```
//!
//! ```
//! use multiparse::Multipart;
//! use bytes::Bytes;
//! use std::convert::Infallible;
//! use futures_util::stream::once;
//!
//! # async fn run() {
//! let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
//! let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
//! let mut multipart = Multipart::new(stream, "X-BOUNDARY");
//!
//! while let Some(part) = multipart.next_part().await.unwrap() {
//!     assert_eq!(part.name(), Some("my_text_field"));
//!     assert_eq!(part.text(), "abcd");
//! }
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(run());
//! ```
//!
//! # Optional features
//!
//! | Feature     | Description |
//! | ----------- | ----------- |
//! | `json`      | [`Part::json`] |
//! | `tokio-io`  | [`Multipart::with_reader`] for any `tokio::io::AsyncRead` |
//! | `log`       | debug and trace records through the `log` facade |
//! | `all`       | `json` and `tokio-io` |

#[cfg(feature = "log")]
macro_rules! trace {
    ($($t:tt)*) => (::log::trace!($($t)*));
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($t:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($t:tt)*) => (::log::debug!($($t)*));
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($t:tt)*) => {};
}

pub use bytes;
pub use consumer::{Consumer, Receiver};
pub use error::{Error, ParseError, ParseErrorKind};
pub use event::{coalesce, Event};
pub use handler::Handler;
pub use multipart::Multipart;
pub use parser::Parser;
pub use part::Part;
pub use size_limit::SizeLimit;
pub use state::State;

mod collector;
mod constants;
mod consumer;
mod content_disposition;
mod error;
mod event;
mod handler;
mod helpers;
mod lookbehind;
mod multipart;
mod parser;
mod part;
mod size_limit;
mod state;

/// A Result type often returned from methods that can have `multiparse` errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parses the `Content-Type` header to extract the boundary value.
///
/// # Examples
///
/// ```
/// # fn run(){
/// let content_type = "multipart/form-data; boundary=ABCDEFG";
///
/// assert_eq!(multiparse::parse_boundary(content_type), Ok("ABCDEFG".to_owned()));
/// # }
/// # run();
/// ```
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if !(m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA) {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}
