use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;
use beacon_types::{
    Backlink, BacklinkClick, Campaign, CampaignComment, CampaignWithMeta, CommentWithMeta,
    NewClick, RedirectTarget, User,
};
use chrono::Utc;

use crate::slug;
use crate::store::{CampaignStore, StoreError, UserStore};

/// In-memory store with the same observable semantics as the Postgres
/// implementation (unique email, atomic campaign+backlink creation, join
/// behavior). Backs the HTTP test suite so no test needs a live database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    campaign_insert_fault: Arc<AtomicBool>,
    click_insert_fault: Arc<AtomicBool>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    backlinks: Vec<Backlink>,
    campaigns: Vec<Campaign>,
    clicks: Vec<BacklinkClick>,
    comments: Vec<CampaignComment>,
    user_seq: i64,
    backlink_seq: i64,
    campaign_seq: i64,
    click_seq: i64,
    comment_seq: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot fault that fires after the backlink insert but before
    /// the campaign insert, for atomicity tests.
    pub fn fail_next_campaign_insert(&self) {
        self.campaign_insert_fault.store(true, Ordering::SeqCst);
    }

    /// Arm a one-shot fault on the next click insert.
    pub fn fail_next_click_insert(&self) {
        self.click_insert_fault.store(true, Ordering::SeqCst);
    }

    // Inspection helpers for tests.

    pub fn backlink_count(&self) -> usize {
        self.read().backlinks.len()
    }

    pub fn campaign_count(&self) -> usize {
        self.read().campaigns.len()
    }

    pub fn clicks(&self) -> Vec<BacklinkClick> {
        self.read().clicks.clone()
    }

    pub fn backlinks(&self) -> Vec<Backlink> {
        self.read().backlinks.clone()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Backend(anyhow!("store lock poisoned: {e}")))
    }

    fn read(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_digest: &str,
        subscription: bool,
    ) -> Result<User, StoreError> {
        let mut inner = self.lock()?;

        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        inner.user_seq += 1;
        let user = User {
            user_id: inner.user_seq,
            name: name.to_owned(),
            email: email.to_owned(),
            password: password_digest.to_owned(),
            subscription,
            signup: now,
            login: None,
            logout: None,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn update_login_time(&self, user_id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(user) = inner.users.iter_mut().find(|u| u.user_id == user_id) {
            user.login = Some(Utc::now());
        }
        Ok(())
    }

    async fn update_logout_time(&self, user_id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(user) = inner.users.iter_mut().find(|u| u.user_id == user_id) {
            user.logout = Some(Utc::now());
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.lock()?;
        let mut users = inner.users.clone();
        users.sort_by(|a, b| {
            b.signup
                .cmp(&a.signup)
                .then(b.user_id.cmp(&a.user_id))
        });
        Ok(users)
    }
}

impl CampaignStore for MemoryStore {
    async fn create_campaign(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        destination_url: &str,
    ) -> Result<CampaignWithMeta, StoreError> {
        let mut inner = self.lock()?;

        let slug = slug::generate();
        if inner.backlinks.iter().any(|b| b.slug == slug) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let backlink = Backlink {
            backlink_id: inner.backlink_seq + 1,
            user_id,
            destination_url: destination_url.to_owned(),
            slug,
            created_at: now,
        };

        // Fires between the two inserts; nothing staged above may remain
        // visible when it does.
        if self.campaign_insert_fault.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend(anyhow!(
                "injected campaign insert failure"
            )));
        }

        let author_name = inner
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.name.clone())
            .ok_or_else(|| StoreError::Backend(anyhow!("user {user_id} not found")))?;

        let campaign = Campaign {
            campaign_id: inner.campaign_seq + 1,
            user_id,
            title: title.to_owned(),
            description: description.to_owned(),
            backlink_id: backlink.backlink_id,
            status: "active".to_owned(),
            created_at: now,
            updated_at: now,
        };

        // Commit point: both rows become visible together.
        inner.backlink_seq += 1;
        inner.campaign_seq += 1;
        inner.backlinks.push(backlink);
        inner.campaigns.push(campaign.clone());

        Ok(CampaignWithMeta {
            campaign,
            author_name,
            comment_count: 0,
        })
    }

    async fn list_campaigns(
        &self,
        campaign_id: Option<i64>,
    ) -> Result<Vec<CampaignWithMeta>, StoreError> {
        let inner = self.lock()?;
        let mut rows: Vec<CampaignWithMeta> = inner
            .campaigns
            .iter()
            .filter(|c| campaign_id.map_or(true, |id| c.campaign_id == id))
            .filter_map(|c| with_meta(&inner, c))
            .collect();
        rows.sort_by(|a, b| {
            b.campaign
                .created_at
                .cmp(&a.campaign.created_at)
                .then(b.campaign.campaign_id.cmp(&a.campaign.campaign_id))
        });
        Ok(rows)
    }

    async fn resolve_redirect(
        &self,
        campaign_id: i64,
    ) -> Result<Option<RedirectTarget>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .campaigns
            .iter()
            .find(|c| c.campaign_id == campaign_id)
            .and_then(|c| {
                inner
                    .backlinks
                    .iter()
                    .find(|b| b.backlink_id == c.backlink_id)
                    .map(|b| RedirectTarget {
                        campaign_id: c.campaign_id,
                        backlink_id: c.backlink_id,
                        destination_url: b.destination_url.clone(),
                    })
            }))
    }

    async fn record_click(&self, click: &NewClick) -> Result<(), StoreError> {
        let mut inner = self.lock()?;

        if self.click_insert_fault.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend(anyhow!("injected click insert failure")));
        }

        inner.click_seq += 1;
        let row = BacklinkClick {
            click_id: inner.click_seq,
            backlink_id: click.backlink_id,
            campaign_id: click.campaign_id,
            referrer_url: click.referrer_url.clone(),
            ip_address: click.ip_address.clone(),
            user_agent: click.user_agent.clone(),
            country_code: click.country_code.clone(),
            created_at: Utc::now(),
        };
        inner.clicks.push(row);
        Ok(())
    }

    async fn list_comments(&self, campaign_id: i64) -> Result<Vec<CommentWithMeta>, StoreError> {
        let inner = self.lock()?;
        let mut rows: Vec<CommentWithMeta> = inner
            .comments
            .iter()
            .filter(|c| c.campaign_id == campaign_id)
            .filter_map(|c| {
                inner
                    .users
                    .iter()
                    .find(|u| u.user_id == c.user_id)
                    .map(|u| CommentWithMeta {
                        comment: c.clone(),
                        author_name: u.name.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.comment
                .created_at
                .cmp(&b.comment.created_at)
                .then(a.comment.comment_id.cmp(&b.comment.comment_id))
        });
        Ok(rows)
    }

    async fn create_comment(
        &self,
        campaign_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<CommentWithMeta, StoreError> {
        let mut inner = self.lock()?;

        let author_name = inner
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.name.clone())
            .ok_or_else(|| StoreError::Backend(anyhow!("user {user_id} not found")))?;

        let now = Utc::now();
        inner.comment_seq += 1;
        let comment = CampaignComment {
            comment_id: inner.comment_seq,
            campaign_id,
            user_id,
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
        };
        inner.comments.push(comment.clone());

        Ok(CommentWithMeta {
            comment,
            author_name,
        })
    }
}

/// Mirrors the Postgres listing join: campaigns whose author row is missing
/// are dropped, and the comment count is computed live.
fn with_meta(inner: &Inner, campaign: &Campaign) -> Option<CampaignWithMeta> {
    let author_name = inner
        .users
        .iter()
        .find(|u| u.user_id == campaign.user_id)
        .map(|u| u.name.clone())?;
    let comment_count = inner
        .comments
        .iter()
        .filter(|c| c.campaign_id == campaign.campaign_id)
        .count() as i64;
    Some(CampaignWithMeta {
        campaign: campaign.clone(),
        author_name,
        comment_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(store: &MemoryStore, name: &str, email: &str) -> User {
        store
            .create_user(name, email, "$2b$10$digest", false)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        seed_user(&store, "Ada", "ada@example.com").await;

        let err = store
            .create_user("Ada Again", "ada@example.com", "$2b$10$other", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn campaign_creation_is_atomic_under_injected_failure() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "Ada", "ada@example.com").await;

        store.fail_next_campaign_insert();
        let err = store
            .create_campaign(user.user_id, "Launch", "Spring launch", "http://x/campaigns/redirect")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        // Neither the backlink nor the campaign may be visible.
        assert_eq!(store.backlink_count(), 0);
        assert_eq!(store.campaign_count(), 0);

        // The fault is one-shot: the next attempt succeeds.
        let created = store
            .create_campaign(user.user_id, "Launch", "Spring launch", "http://x/campaigns/redirect")
            .await
            .unwrap();
        assert_eq!(created.comment_count, 0);
        assert_eq!(store.backlink_count(), 1);
        assert_eq!(store.campaign_count(), 1);
    }

    #[tokio::test]
    async fn listing_orders_newest_first_with_live_comment_counts() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "Ada", "ada@example.com").await;

        let first = store
            .create_campaign(user.user_id, "First", "d", "http://x/campaigns/redirect")
            .await
            .unwrap();
        let second = store
            .create_campaign(user.user_id, "Second", "d", "http://x/campaigns/redirect")
            .await
            .unwrap();

        store
            .create_comment(first.campaign.campaign_id, user.user_id, "one")
            .await
            .unwrap();
        store
            .create_comment(first.campaign.campaign_id, user.user_id, "two")
            .await
            .unwrap();

        let rows = store.list_campaigns(None).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].campaign.campaign_id, second.campaign.campaign_id);
        assert_eq!(rows[1].campaign.campaign_id, first.campaign.campaign_id);
        assert_eq!(rows[0].comment_count, 0);
        assert_eq!(rows[1].comment_count, 2);
    }

    #[tokio::test]
    async fn resolve_redirect_unknown_campaign_is_none() {
        let store = MemoryStore::new();
        assert!(store.resolve_redirect(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resolve_redirect_returns_the_owned_backlink() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "Ada", "ada@example.com").await;
        let created = store
            .create_campaign(user.user_id, "Launch", "d", "http://x/campaigns/redirect")
            .await
            .unwrap();

        let target = store
            .resolve_redirect(created.campaign.campaign_id)
            .await
            .unwrap()
            .expect("campaign should resolve");
        assert_eq!(target.backlink_id, created.campaign.backlink_id);
        assert_eq!(target.destination_url, "http://x/campaigns/redirect");
    }

    #[tokio::test]
    async fn users_list_newest_signup_first() {
        let store = MemoryStore::new();
        seed_user(&store, "First", "first@example.com").await;
        seed_user(&store, "Second", "second@example.com").await;

        let users = store.list_users().await.unwrap();
        assert_eq!(users[0].email, "second@example.com");
        assert_eq!(users[1].email, "first@example.com");
    }
}
