use crate::constants;

/// Bytes consumed while testing whether the stream has reached a boundary.
///
/// Holds the `CR LF` that opened the candidate plus the boundary bytes matched
/// so far. If the candidate turns out to be ordinary data these bytes are handed
/// back to the handler as part data. Capacity is fixed at construction.
#[derive(Debug)]
pub(crate) struct Lookbehind {
    buf: Box<[u8]>,
}

impl Lookbehind {
    pub fn new(boundary_len: usize) -> Self {
        Lookbehind {
            buf: vec![0; boundary_len + constants::LOOKBEHIND_EXTRA].into_boxed_slice(),
        }
    }

    pub fn open(&mut self) {
        self.buf[0] = constants::CR;
    }

    pub fn confirm_line_feed(&mut self) {
        self.buf[1] = constants::LF;
    }

    pub fn push_boundary_byte(&mut self, index: usize, c: u8) {
        self.buf[constants::LOOKBEHIND_EXTRA + index] = c;
    }

    /// The lone `CR` that turned out not to start a line break.
    pub fn carriage_return(&self) -> &[u8] {
        &self.buf[..1]
    }

    /// `CR LF` followed by the first `matched` boundary bytes.
    pub fn matched(&self, matched: usize) -> &[u8] {
        &self.buf[..constants::LOOKBEHIND_EXTRA + matched]
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookbehind_replay() {
        let mut lb = Lookbehind::new(6);
        assert_eq!(lb.capacity(), 8);

        lb.open();
        assert_eq!(lb.carriage_return(), b"\r");

        lb.confirm_line_feed();
        assert_eq!(lb.matched(0), b"\r\n");

        for (idx, c) in b"--ab".iter().copied().enumerate() {
            lb.push_boundary_byte(idx, c);
        }
        assert_eq!(lb.matched(4), b"\r\n--ab");
    }
}
