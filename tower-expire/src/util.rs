use std::{error::Error, fmt, iter};

pub(crate) trait ErrorExt {
    fn display_chain(&self) -> DisplayChain<'_>;
}

impl<E> ErrorExt for E
where
    E: Error + 'static,
{
    /// Returns an object that implements [`Display`] for printing the
    /// whole error chain.
    ///
    /// [`Display`]: std::fmt::Display
    fn display_chain(&self) -> DisplayChain<'_> {
        DisplayChain { inner: self }
    }
}

pub(crate) struct DisplayChain<'a> {
    inner: &'a (dyn Error + 'static),
}

impl fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)?;

        for error in iter::successors(Some(self.inner), |err| (*err).source()).skip(1) {
            write!(f, ": {}", error)?;
        }

        Ok(())
    }
}
