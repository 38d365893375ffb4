use crate::shared::usecase::UseCase;
use nudge_domain::{DeviceToken, ID};
use nudge_infra::NudgeContext;
use tracing::{error, info, warn};

/// Requests notification permission, fetches the delivery token and
/// persists it for this (user, device). Every step short-circuits to
/// `None`: a denied permission or a token-less device is a normal
/// outcome, not an error.
#[derive(Debug)]
pub struct RegisterTokenUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait]
impl UseCase for RegisterTokenUseCase {
    type Response = Option<DeviceToken>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Errors> {
        let granted = match ctx.platform.push.request_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                warn!("Unable to request notification permission: {:?}", e);
                return Ok(None);
            }
        };
        if !granted {
            info!("Notification permission denied, skipping token registration");
            return Ok(None);
        }

        let push_token = match ctx.platform.push.get_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                info!("Device has no delivery token, skipping token registration");
                return Ok(None);
            }
            Err(e) => {
                warn!("Unable to fetch delivery token: {:?}", e);
                return Ok(None);
            }
        };

        let token = DeviceToken {
            user_id: self.user_id,
            device_id: ctx.config.device_id.clone(),
            platform: ctx.config.platform,
            token: push_token.token,
            token_type: push_token.token_type,
            updated: ctx.sys.get_timestamp_millis(),
        };
        if let Err(e) = ctx.repos.device_tokens.upsert(&token).await {
            // The token is still live on the device, re-registration on
            // the next startup retries the persistence
            error!("Unable to persist device token: {:?}", e);
        }

        Ok(Some(token))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use nudge_domain::TokenType;
    use nudge_infra::{InMemoryPushTokenProvider, Platform};
    use std::sync::Arc;

    fn setup_with_push(push: InMemoryPushTokenProvider) -> NudgeContext {
        let mut ctx = NudgeContext::create_inmemory();
        ctx.platform = Platform {
            scheduler: ctx.platform.scheduler.clone(),
            push: Arc::new(push),
        };
        ctx
    }

    #[tokio::test]
    async fn registers_and_persists_the_token() {
        let ctx = setup_with_push(InMemoryPushTokenProvider::new());
        let user_id = ID::new();

        let token = execute(RegisterTokenUseCase { user_id }, &ctx)
            .await
            .unwrap()
            .expect("a token to be registered");

        assert_eq!(token.user_id, user_id);
        assert_eq!(token.device_id, ctx.config.device_id);
        assert_eq!(token.token_type, TokenType::Apns);
        let stored = ctx.repos.device_tokens.find_by_user(&user_id).await.unwrap();
        assert_eq!(stored, vec![token]);
    }

    #[tokio::test]
    async fn registration_is_idempotent_per_token() {
        let ctx = setup_with_push(InMemoryPushTokenProvider::new());
        let user_id = ID::new();

        execute(RegisterTokenUseCase { user_id }, &ctx).await.unwrap();
        execute(RegisterTokenUseCase { user_id }, &ctx).await.unwrap();

        let stored = ctx.repos.device_tokens.find_by_user(&user_id).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn denied_permission_skips_registration() {
        let push = InMemoryPushTokenProvider::new();
        push.deny_permission();
        let ctx = setup_with_push(push);
        let user_id = ID::new();

        let token = execute(RegisterTokenUseCase { user_id }, &ctx).await.unwrap();

        assert!(token.is_none());
        let stored = ctx.repos.device_tokens.find_by_user(&user_id).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn tokenless_device_skips_registration() {
        let push = InMemoryPushTokenProvider::new();
        push.set_token(None);
        let ctx = setup_with_push(push);

        let token = execute(RegisterTokenUseCase { user_id: ID::new() }, &ctx)
            .await
            .unwrap();

        assert!(token.is_none());
    }
}
