use std::{
    fmt,
    fmt::{Debug, Display},
};

/// Wrapper for sensitive values (API secrets, webhook signing keys). The inner value is only reachable through
/// [`Secret::reveal`]; both `Debug` and `Display` render as `****`, so a `Secret` caught in a log line or error
/// message never exposes its contents.
#[derive(Clone, Default)]
pub struct Secret<T: Clone + Default>(T);

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn reveal(&self) -> &T {
        &self.0
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
