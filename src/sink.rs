use crate::Error;
use core::convert::Infallible;

/// Where a transform puts its bytes.
pub(crate) trait Output {
    type Error;

    /// Claim the next `n` bytes of the destination.
    ///
    /// Returns `None` when only measuring, there is nothing to write to.
    fn claim(&mut self, n: usize) -> Result<Option<&mut [u8]>, Self::Error>;

    /// The number of bytes produced so far.
    fn produced(&self) -> usize;

    fn push(&mut self, byte: u8) -> Result<(), Self::Error> {
        if let Some(slot) = self.claim(1)? {
            slot[0] = byte;
        }
        Ok(())
    }

    fn fill(&mut self, byte: u8, count: usize) -> Result<(), Self::Error> {
        if let Some(run) = self.claim(count)? {
            run.iter_mut().for_each(|b| *b = byte);
        }
        Ok(())
    }
}

/// A caller provided destination.
///
/// Every claim is checked against the buffer's capacity.
pub(crate) struct Sink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> Sink<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Sink { buf, len: 0 }
    }
}

impl Output for Sink<'_> {
    type Error = Error;

    fn claim(&mut self, n: usize) -> Result<Option<&mut [u8]>, Error> {
        let start = self.len;
        let end = start.saturating_add(n);
        if end > self.buf.len() {
            return Err(Error::BufferTooSmall {
                needed: end,
                available: self.buf.len(),
            });
        }
        self.len = end;
        Ok(Some(&mut self.buf[start..end]))
    }

    fn produced(&self) -> usize {
        self.len
    }
}

/// Measure mode, counts bytes and writes nothing.
#[derive(Default)]
pub(crate) struct Counter(usize);

impl Output for Counter {
    type Error = Infallible;

    fn claim(&mut self, n: usize) -> Result<Option<&mut [u8]>, Infallible> {
        self.0 = self.0.saturating_add(n);
        Ok(None)
    }

    fn produced(&self) -> usize {
        self.0
    }
}

/// Grows as needed and thus never fails.
impl Output for Vec<u8> {
    type Error = Infallible;

    fn claim(&mut self, n: usize) -> Result<Option<&mut [u8]>, Infallible> {
        let start = self.len();
        self.resize(start + n, 0);
        Ok(Some(&mut self[start..]))
    }

    fn produced(&self) -> usize {
        self.len()
    }
}

pub(crate) fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
