use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How many leading bytes of a file are inspected. Large enough for every
/// registered prefix plus the ISO-BMFF `ftyp` probe.
pub const HEADER_WINDOW_LEN: usize = 64;

/// The leading bytes of a candidate file.
///
/// Files shorter than [`HEADER_WINDOW_LEN`] yield a shorter window; a short
/// window is valid and simply fails to match longer signatures.
#[derive(Debug, Clone, Copy)]
pub struct HeaderWindow {
    buf: [u8; HEADER_WINDOW_LEN],
    len: usize,
}

impl HeaderWindow {
    /// Reads up to [`HEADER_WINDOW_LEN`] bytes from the start of `path`.
    ///
    /// Loops on short reads; a file smaller than the window is not an error.
    pub fn read_from(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buf = [0u8; HEADER_WINDOW_LEN];
        let mut len = 0;

        while len < HEADER_WINDOW_LEN {
            let n = file.read(&mut buf[len..])?;
            if n == 0 {
                break;
            }
            len += n;
        }

        Ok(Self { buf, len })
    }

    /// A window over in-memory bytes, truncated to the window length.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(HEADER_WINDOW_LEN);
        let mut buf = [0u8; HEADER_WINDOW_LEN];
        buf[..len].copy_from_slice(&bytes[..len]);
        Self { buf, len }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for HeaderWindow {
    fn as_ref(&self) -> &[u8] {
        self.bytes()
    }
}
