//! Lease time windows.
//!
//! Times are integer Unix seconds supplied by the caller; the kernel never
//! reads a clock itself.

/// Fixed lifetime of every lease, in seconds
pub const LEASE_DURATION_SECS: i64 = 300;

/// The half-open interval `[issued_at, expires_at)` in which a lease is valid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaseWindow {
    issued_at: i64,
    expires_at: i64,
}

impl LeaseWindow {
    /// Open a window of [`LEASE_DURATION_SECS`] at `issued_at`.
    ///
    /// Returns `None` for negative times or if the expiry overflows.
    #[must_use]
    pub fn starting_at(issued_at: i64) -> Option<Self> {
        if issued_at < 0 {
            return None;
        }
        let expires_at = issued_at.checked_add(LEASE_DURATION_SECS)?;
        Some(Self {
            issued_at,
            expires_at,
        })
    }

    /// Rebuild a window from stored bounds.
    ///
    /// Returns `None` unless `expires_at == issued_at + LEASE_DURATION_SECS`.
    #[must_use]
    pub fn from_bounds(issued_at: i64, expires_at: i64) -> Option<Self> {
        Self::starting_at(issued_at).filter(|w| w.expires_at == expires_at)
    }

    /// Issue time
    #[must_use]
    pub const fn issued_at(&self) -> i64 {
        self.issued_at
    }

    /// Expiry time (exclusive)
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Check whether `now` falls inside the window.
    ///
    /// A lease is no longer valid at its exact expiry second.
    #[must_use]
    pub const fn contains(&self, now: i64) -> bool {
        self.issued_at <= now && now < self.expires_at
    }
}
