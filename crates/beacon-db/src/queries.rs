use beacon_types::{Campaign, CampaignWithMeta, CommentWithMeta, NewClick, RedirectTarget, User};

use crate::Database;
use crate::slug;
use crate::store::{CampaignStore, StoreError, UserStore};

impl UserStore for Database {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_digest: &str,
        subscription: bool,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, subscription, password, signup)
             VALUES ($1, $2, $3, $4, NOW())
             RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(subscription)
        .bind(password_digest)
        .fetch_one(self.pool())
        .await
        .map_err(write_err)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(backend)
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await
            .map_err(backend)
    }

    async fn update_login_time(&self, user_id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET login = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn update_logout_time(&self, user_id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET logout = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY signup DESC")
            .fetch_all(self.pool())
            .await
            .map_err(backend)
    }
}

impl CampaignStore for Database {
    async fn create_campaign(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        destination_url: &str,
    ) -> Result<CampaignWithMeta, StoreError> {
        let slug = slug::generate();

        // All-or-nothing: the transaction rolls back on drop if any step
        // below fails before the commit.
        let mut tx = self.pool().begin().await.map_err(backend)?;

        let backlink_id: i64 = sqlx::query_scalar(
            "INSERT INTO backlinks (user_id, destination_url, slug)
             VALUES ($1, $2, $3)
             RETURNING backlink_id",
        )
        .bind(user_id)
        .bind(destination_url)
        .bind(&slug)
        .fetch_one(&mut *tx)
        .await
        .map_err(write_err)?;

        let campaign: Campaign = sqlx::query_as(
            "INSERT INTO campaigns (user_id, title, description, backlink_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(backlink_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(backend)?;

        let author_name: String = sqlx::query_scalar("SELECT name FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(backend)?;

        tx.commit().await.map_err(backend)?;

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
        match campaign_id {
            Some(id) => sqlx::query_as::<_, CampaignWithMeta>(
                "SELECT c.*, u.name AS author_name,
                    (SELECT COUNT(*) FROM campaign_comments cc
                     WHERE cc.campaign_id = c.campaign_id) AS comment_count
                 FROM campaigns c
                 JOIN users u ON c.user_id = u.user_id
                 WHERE c.campaign_id = $1",
            )
            .bind(id)
            .fetch_all(self.pool())
            .await
            .map_err(backend),
            None => sqlx::query_as::<_, CampaignWithMeta>(
                "SELECT c.*, u.name AS author_name,
                    (SELECT COUNT(*) FROM campaign_comments cc
                     WHERE cc.campaign_id = c.campaign_id) AS comment_count
                 FROM campaigns c
                 JOIN users u ON c.user_id = u.user_id
                 ORDER BY c.created_at DESC",
            )
            .fetch_all(self.pool())
            .await
            .map_err(backend),
        }
    }

    async fn resolve_redirect(
        &self,
        campaign_id: i64,
    ) -> Result<Option<RedirectTarget>, StoreError> {
        sqlx::query_as::<_, RedirectTarget>(
            "SELECT c.campaign_id, c.backlink_id, b.destination_url
             FROM campaigns c
             JOIN backlinks b ON c.backlink_id = b.backlink_id
             WHERE c.campaign_id = $1",
        )
        .bind(campaign_id)
        .fetch_optional(self.pool())
        .await
        .map_err(backend)
    }

    async fn record_click(&self, click: &NewClick) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO backlink_clicks
                (backlink_id, campaign_id, referrer_url, ip_address, user_agent, country_code)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(click.backlink_id)
        .bind(click.campaign_id)
        .bind(&click.referrer_url)
        .bind(&click.ip_address)
        .bind(&click.user_agent)
        .bind(&click.country_code)
        .execute(self.pool())
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn list_comments(&self, campaign_id: i64) -> Result<Vec<CommentWithMeta>, StoreError> {
        sqlx::query_as::<_, CommentWithMeta>(
            "SELECT cc.*, u.name AS author_name
             FROM campaign_comments cc
             JOIN users u ON cc.user_id = u.user_id
             WHERE cc.campaign_id = $1
             ORDER BY cc.created_at ASC",
        )
        .bind(campaign_id)
        .fetch_all(self.pool())
        .await
        .map_err(backend)
    }

    async fn create_comment(
        &self,
        campaign_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<CommentWithMeta, StoreError> {
        sqlx::query_as::<_, CommentWithMeta>(
            "INSERT INTO campaign_comments (campaign_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING *,
             (SELECT name FROM users WHERE user_id = $2) AS author_name",
        )
        .bind(campaign_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(self.pool())
        .await
        .map_err(backend)
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

/// Write-path mapping: unique-constraint violations become `Conflict`,
/// everything else stays an opaque backend error.
fn write_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Backend(err.into()),
    }
}
