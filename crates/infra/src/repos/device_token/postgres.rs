use super::IDeviceTokenRepo;

use nudge_domain::{DeviceToken, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::warn;

pub struct PostgresDeviceTokenRepo {
    pool: PgPool,
}

impl PostgresDeviceTokenRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DeviceTokenRaw {
    user_uid: Uuid,
    device_id: String,
    platform: String,
    token: String,
    token_type: String,
    updated: i64,
}

impl TryFrom<DeviceTokenRaw> for DeviceToken {
    type Error = anyhow::Error;

    fn try_from(raw: DeviceTokenRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: raw.user_uid.into(),
            device_id: raw.device_id,
            platform: raw.platform.parse().map_err(anyhow::Error::msg)?,
            token: raw.token,
            token_type: raw.token_type.parse().map_err(anyhow::Error::msg)?,
            updated: raw.updated,
        })
    }
}

#[async_trait::async_trait]
impl IDeviceTokenRepo for PostgresDeviceTokenRepo {
    async fn upsert(&self, token: &DeviceToken) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO device_tokens
            (user_uid, device_id, platform, token, token_type, updated)
            VALUES($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_uid, token)
            DO UPDATE SET
                device_id = excluded.device_id,
                platform = excluded.platform,
                token_type = excluded.token_type,
                updated = excluded.updated
            "#,
        )
        .bind(token.user_id.inner())
        .bind(&token.device_id)
        .bind(token.platform.as_str())
        .bind(&token.token)
        .bind(token.token_type.as_str())
        .bind(token.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<DeviceToken>> {
        let tokens = sqlx::query_as::<_, DeviceTokenRaw>(
            r#"
            SELECT * FROM device_tokens
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner())
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens
            .into_iter()
            .filter_map(|raw| match DeviceToken::try_from(raw) {
                Ok(token) => Some(token),
                Err(e) => {
                    warn!("Skipping malformed device token row: {:?}", e);
                    None
                }
            })
            .collect())
    }
}
