use std::ops::ControlFlow;

/// Receives the events produced by a [`Parser`](crate::Parser).
///
/// Every method defaults to continuing, so implementors only override what they
/// care about. Returning [`ControlFlow::Break`] stops the current
/// [`execute`](crate::Parser::execute) call at the byte being processed.
///
/// Data slices are borrowed from the chunk being parsed (or from the parser's
/// lookbehind buffer) and are only valid for the duration of the call. A single
/// header name, header value or body segment may arrive in several consecutive
/// calls when it spans a chunk boundary or contains a `CR`.
///
/// # Examples
///
/// ```
/// use std::ops::ControlFlow;
/// use multiparse::{Handler, Parser};
///
/// #[derive(Default)]
/// struct BodySize(usize);
///
/// impl Handler for BodySize {
///     fn on_part_data(&mut self, data: &[u8]) -> ControlFlow<()> {
///         self.0 += data.len();
///         ControlFlow::Continue(())
///     }
/// }
///
/// let body = b"--X\r\nContent-Type: text/plain\r\n\r\nhello\r\n--X--";
/// let mut parser = Parser::new("X", BodySize::default());
///
/// assert_eq!(parser.execute(body), body.len());
/// assert_eq!(parser.handler().0, 5);
/// ```
pub trait Handler {
    /// A new part starts; its headers follow.
    fn on_part_data_begin(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// A fragment of a header name, without the `:`.
    fn on_header_field(&mut self, _field: &[u8]) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// A fragment of a header value, without leading spaces or the `CR LF`.
    fn on_header_value(&mut self, _value: &[u8]) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// The blank line ending the current part's header block was seen.
    fn on_headers_complete(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// A fragment of part data. Never empty.
    fn on_part_data(&mut self, _data: &[u8]) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// The delimiter closing the current part was matched.
    fn on_part_data_end(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// The terminal `--boundary--` was matched.
    fn on_body_end(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_part_data_begin(&mut self) -> ControlFlow<()> {
        (**self).on_part_data_begin()
    }

    fn on_header_field(&mut self, field: &[u8]) -> ControlFlow<()> {
        (**self).on_header_field(field)
    }

    fn on_header_value(&mut self, value: &[u8]) -> ControlFlow<()> {
        (**self).on_header_value(value)
    }

    fn on_headers_complete(&mut self) -> ControlFlow<()> {
        (**self).on_headers_complete()
    }

    fn on_part_data(&mut self, data: &[u8]) -> ControlFlow<()> {
        (**self).on_part_data(data)
    }

    fn on_part_data_end(&mut self) -> ControlFlow<()> {
        (**self).on_part_data_end()
    }

    fn on_body_end(&mut self) -> ControlFlow<()> {
        (**self).on_body_end()
    }
}

/// Ignores every event. Useful to validate a body without looking at it.
impl Handler for () {}
