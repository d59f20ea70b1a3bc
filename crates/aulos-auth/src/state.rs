/// Outcome of the build-authorization check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorizationState {
    /// No lookup has completed yet.
    Pending,
    /// The build identifier is on the allow-list.
    Authorized,
    /// The lookup could not complete (no route, DNS error, timeout).
    /// Cleared by `reset_transient` or simply retried on the next check.
    FailedTransient,
    /// The allow-list answered and this build is not on it. Sticky: no
    /// automatic retry will ever overwrite this.
    FailedPermanent,
}

impl AuthorizationState {
    #[must_use]
    pub fn is_authorized(self) -> bool {
        self == Self::Authorized
    }

    /// Terminal states are cacheable; `Pending` and `FailedTransient`
    /// always trigger a fresh lookup.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Authorized | Self::FailedPermanent)
    }

    #[must_use]
    pub fn is_permanent_failure(self) -> bool {
        self == Self::FailedPermanent
    }
}
