//! A value that remembers whether the caller assigned it.
//!
//! Every optional field of a [`ProgramConfig`](crate::ProgramConfig) is an
//! [`Opt`]. The seed passed to [`Opt::new`] is the supervisor default and does
//! not count as an assignment; only [`Opt::set`] does. The render engine relies
//! on this to tell "left alone" apart from "explicitly set to the default".

/// A value plus an explicit-set flag.
///
/// ```
/// use supervisorgen::Opt;
///
/// let mut retries = Opt::new(3);
/// assert!(!retries.is_set());
///
/// retries.set(3);
/// assert!(retries.is_set());
/// assert_eq!(*retries.get(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Opt<T> {
    value: T,
    set: bool,
}

impl<T> Opt<T> {
    /// Seed with a default. The result reports `is_set() == false`.
    pub fn new(value: T) -> Self {
        Self { value, set: false }
    }

    /// The current value, whether assigned or seeded.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and mark it as explicitly set. The flag never reverts.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.set = true;
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
