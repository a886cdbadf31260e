/// Where the parser stands in the multipart grammar.
///
/// The parser keeps one of these across [`execute`](crate::Parser::execute)
/// calls so that a body can be fed in arbitrary fragments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Nothing consumed yet.
    #[default]
    Start,
    /// Matching the leading `--boundary` and its `CR LF`.
    StartBoundary,
    /// At the first byte of a header line.
    HeaderFieldStart,
    /// Inside a header name.
    HeaderField,
    /// Saw the `CR` of the blank line that ends the header block.
    HeadersAlmostDone,
    /// After `:`, skipping leading spaces.
    HeaderValueStart,
    /// Inside a header value.
    HeaderValue,
    /// Saw the `CR` that ends a header value.
    HeaderValueAlmostDone,
    /// Header block done, first body byte pending.
    PartDataStart,
    /// Inside part data.
    PartData,
    /// Saw a `CR` in part data which may open a boundary.
    PartDataAlmostBoundary,
    /// Matching `--boundary` after `CR LF` in part data.
    PartDataBoundary,
    /// A full boundary matched; deciding between `--` and `CR LF`.
    PartDataAlmostEnd,
    /// Saw the `CR` after a boundary, `LF` must follow.
    PartDataEnd,
    /// Saw the first `-` of the closing `--`.
    PartDataFinalHyphen,
    /// Body finished; anything further is ignored.
    End,
}

impl State {
    /// Returns `true` while bytes are held in the lookbehind buffer as a
    /// possible boundary.
    pub fn is_matching_boundary(self) -> bool {
        matches!(self, State::PartDataAlmostBoundary | State::PartDataBoundary)
    }
}
