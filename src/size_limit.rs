use crate::constants;

/// Represents size limit of the stream to prevent DDoS attack.
///
/// Both limits default to [`u64::MAX`].
///
/// # Examples
///
/// ```
/// use multiparse::SizeLimit;
///
/// let limit = SizeLimit::new().whole_stream(15 * 1024 * 1024).per_part(10 * 1024 * 1024);
/// # drop(limit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimit {
    pub(crate) whole_stream: u64,
    pub(crate) per_part: u64,
}

impl SizeLimit {
    /// Creates a default size limit which is [`u64::MAX`] for the whole stream
    /// and for each part.
    pub fn new() -> SizeLimit {
        SizeLimit::default()
    }

    /// Sets size limit for the whole stream.
    pub fn whole_stream(mut self, limit: u64) -> SizeLimit {
        self.whole_stream = limit;
        self
    }

    /// Sets size limit for the data of each part.
    ///
    /// Parts are held in memory until complete, so this bounds the memory a
    /// single part can take.
    pub fn per_part(mut self, limit: u64) -> SizeLimit {
        self.per_part = limit;
        self
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        SizeLimit {
            whole_stream: constants::DEFAULT_WHOLE_STREAM_SIZE_LIMIT,
            per_part: constants::DEFAULT_PER_PART_SIZE_LIMIT,
        }
    }
}
