use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

pub async fn run(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id       BIGSERIAL PRIMARY KEY,
            name          TEXT NOT NULL,
            email         VARCHAR(60) NOT NULL UNIQUE,
            password      TEXT NOT NULL,
            subscription  BOOLEAN NOT NULL DEFAULT FALSE,
            signup        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            login         TIMESTAMPTZ,
            logout        TIMESTAMPTZ,
            updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );

        CREATE TABLE IF NOT EXISTS backlinks (
            backlink_id      BIGSERIAL PRIMARY KEY,
            user_id          BIGINT NOT NULL REFERENCES users(user_id),
            destination_url  TEXT NOT NULL,
            slug             VARCHAR(10) NOT NULL UNIQUE,
            created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );

        CREATE TABLE IF NOT EXISTS campaigns (
            campaign_id  BIGSERIAL PRIMARY KEY,
            user_id      BIGINT NOT NULL REFERENCES users(user_id),
            title        TEXT NOT NULL,
            description  TEXT NOT NULL,
            backlink_id  BIGINT NOT NULL REFERENCES backlinks(backlink_id),
            status       TEXT NOT NULL DEFAULT 'active',
            created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );

        CREATE INDEX IF NOT EXISTS idx_campaigns_created
            ON campaigns(created_at DESC);

        CREATE TABLE IF NOT EXISTS backlink_clicks (
            click_id      BIGSERIAL PRIMARY KEY,
            backlink_id   BIGINT NOT NULL REFERENCES backlinks(backlink_id),
            campaign_id   BIGINT NOT NULL REFERENCES campaigns(campaign_id),
            referrer_url  TEXT,
            ip_address    TEXT NOT NULL,
            user_agent    TEXT NOT NULL,
            country_code  VARCHAR(2) NOT NULL,
            created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );

        CREATE INDEX IF NOT EXISTS idx_clicks_backlink
            ON backlink_clicks(backlink_id, created_at);

        CREATE TABLE IF NOT EXISTS campaign_comments (
            comment_id   BIGSERIAL PRIMARY KEY,
            campaign_id  BIGINT NOT NULL REFERENCES campaigns(campaign_id),
            user_id      BIGINT NOT NULL REFERENCES users(user_id),
            content      TEXT NOT NULL,
            created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );

        CREATE INDEX IF NOT EXISTS idx_comments_campaign
            ON campaign_comments(campaign_id, created_at);
        ",
    )
    .execute(pool)
    .await?;

    info!("Database migrations complete");
    Ok(())
}
