//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::TwoFactorCodeId;

use crate::domain::entities::TwoFactorCode;
use crate::domain::value_objects::{CodePurpose, Email};
use crate::error::TwoFactorResult;

/// Two-factor code repository trait
#[trait_variant::make(TwoFactorCodeRepository: Send)]
pub trait LocalTwoFactorCodeRepository {
    /// Store `code` after marking every unused, unexpired code for the same
    /// email as used, as one atomic step.
    ///
    /// `purpose` narrows the invalidation to that purpose; `None` covers all.
    /// Returns how many codes were invalidated.
    async fn replace_outstanding(
        &self,
        code: &TwoFactorCode,
        purpose: Option<CodePurpose>,
        now: DateTime<Utc>,
    ) -> TwoFactorResult<u64>;

    /// Most recently stored code for the pair, in any state
    ///
    /// Ordered by storage order, not `created_at`: concurrent issuers read the
    /// clock before they serialise, so timestamps can disagree with it.
    async fn find_latest(
        &self,
        email: &Email,
        purpose: CodePurpose,
    ) -> TwoFactorResult<Option<TwoFactorCode>>;

    async fn find_by_id(&self, id: TwoFactorCodeId) -> TwoFactorResult<Option<TwoFactorCode>>;

    /// Count one attempt if the code is unused, unexpired at `now` and below
    /// `max_attempts`. Returns the updated record, or `None` when nothing matched.
    async fn record_attempt(
        &self,
        id: TwoFactorCodeId,
        now: DateTime<Utc>,
        max_attempts: u8,
    ) -> TwoFactorResult<Option<TwoFactorCode>>;

    /// Set `is_used` if it is not set yet. Returns false when already used or gone.
    async fn mark_used(&self, id: TwoFactorCodeId, now: DateTime<Utc>) -> TwoFactorResult<bool>;

    /// Delete every code whose `expires_at` is before `cutoff`, used or not
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> TwoFactorResult<u64>;
}
