use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row as stored. `password` is the bcrypt digest; rows must be
/// converted to [`PublicUser`] before they leave the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub subscription: bool,
    pub signup: DateTime<Utc>,
    pub login: Option<DateTime<Utc>>,
    pub logout: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// User shape returned to clients: every field except the password digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub subscription: bool,
    pub signup: DateTime<Utc>,
    pub login: Option<DateTime<Utc>>,
    pub logout: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            subscription: user.subscription,
            signup: user.signup,
            login: user.login,
            logout: user.logout,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Campaign {
    pub campaign_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub backlink_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The tracked redirect link a campaign owns. Created only inside the
/// campaign-creation transaction, never on its own.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Backlink {
    pub backlink_id: i64,
    pub user_id: i64,
    pub destination_url: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// One recorded redirect traversal. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BacklinkClick {
    pub click_id: i64,
    pub backlink_id: i64,
    pub campaign_id: i64,
    pub referrer_url: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
    pub country_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignComment {
    pub comment_id: i64,
    pub campaign_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campaign annotated with its author's display name and a live comment
/// count. This is the shape campaign listings and creation return.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignWithMeta {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub campaign: Campaign,
    pub author_name: String,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentWithMeta {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub comment: CampaignComment,
    pub author_name: String,
}

/// Campaign→Backlink join row the redirect resolver needs before it can
/// record a click and send the visitor on.
#[derive(Debug, Clone, FromRow)]
pub struct RedirectTarget {
    pub campaign_id: i64,
    pub backlink_id: i64,
    pub destination_url: String,
}

/// Attribution captured for one click, ready to insert.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub backlink_id: i64,
    pub campaign_id: i64,
    pub referrer_url: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
    pub country_code: String,
}
