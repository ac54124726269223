//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is installed for the current thread through the
//! [`CANCELLATION`](crate::settings::CANCELLATION) setting. Long-running operations poll it with
//! [`check_cancelled`] (once per simplifier round, once per Newton seed, once per branch of the
//! system solver) and abort with a [`Cancelled`] error once it trips. The token itself is shared,
//! so any thread holding a clone can trip it.

use crate::error::Cancelled;
use crate::settings::CANCELLATION;
use cas_error::Error;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A shared flag that requests cancellation of the computations polling it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been tripped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Visible to every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Returns [`Cancelled`] if the current thread's token was tripped.
pub fn check_cancelled() -> Result<(), Error> {
    match CANCELLATION.get() {
        Some(token) if token.is_cancelled() => Err(Error::from(Cancelled)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_token_never_cancels() {
        assert!(check_cancelled().is_ok());
    }

    #[test]
    fn tripped_token() {
        let token = CancellationToken::new();
        let _guard = CANCELLATION.set(Some(token.clone()));
        assert!(check_cancelled().is_ok());

        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        let err = check_cancelled().unwrap_err();
        assert!(err.is::<Cancelled>());
    }
}
