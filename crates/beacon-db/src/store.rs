use beacon_types::{CampaignWithMeta, CommentWithMeta, NewClick, RedirectTarget, User};
use thiserror::Error;

/// Errors surfaced by store implementations.
///
/// `Conflict` means a storage unique constraint rejected the write — the
/// authoritative guard behind any pre-check the caller may have done.
/// Everything else is an opaque backend failure; handlers log the cause and
/// answer with a generic 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violation")]
    Conflict,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Credential store: owns user rows and email uniqueness.
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// Insert a new user. `password_digest` is already hashed; plaintext
    /// never reaches the store.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_digest: &str,
        subscription: bool,
    ) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    /// Stamp the last-login time. Fire-and-forget: an id that matches no row
    /// updates nothing and is not an error.
    async fn update_login_time(&self, user_id: i64) -> Result<(), StoreError>;

    async fn update_logout_time(&self, user_id: i64) -> Result<(), StoreError>;

    /// All users, newest signup first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

/// Campaign/backlink store: transactional creation, listing, redirect
/// resolution, click recording and the comment ledger.
#[trait_variant::make(CampaignStore: Send)]
pub trait LocalCampaignStore {
    /// Create a campaign and its backlink as one atomic unit: either both
    /// rows become visible together or neither does. The backlink gets a
    /// fresh random slug and the given destination URL.
    async fn create_campaign(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        destination_url: &str,
    ) -> Result<CampaignWithMeta, StoreError>;

    /// One campaign by id, or all campaigns newest-created-first. Each row
    /// carries the author name and a live comment count.
    async fn list_campaigns(
        &self,
        campaign_id: Option<i64>,
    ) -> Result<Vec<CampaignWithMeta>, StoreError>;

    /// Campaign→Backlink join for the redirect pipeline. `None` when the
    /// campaign does not exist.
    async fn resolve_redirect(
        &self,
        campaign_id: i64,
    ) -> Result<Option<RedirectTarget>, StoreError>;

    /// Append one click fact. Callers must not redirect if this fails.
    async fn record_click(&self, click: &NewClick) -> Result<(), StoreError>;

    /// Comments under a campaign, oldest first, each with the author name.
    async fn list_comments(&self, campaign_id: i64) -> Result<Vec<CommentWithMeta>, StoreError>;

    async fn create_comment(
        &self,
        campaign_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<CommentWithMeta, StoreError>;
}
