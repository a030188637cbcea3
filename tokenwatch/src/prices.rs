use async_trait::async_trait;
use battlenet::{BattleNetClient, PriceSnapshot};

#[async_trait]
pub(crate) trait PriceSource: Send + Sync + 'static {
    /// Latest price, or `None` when it couldn't be fetched
    async fn wow_token_price(&self) -> Option<PriceSnapshot>;
}

#[async_trait]
impl PriceSource for BattleNetClient {
    async fn wow_token_price(&self) -> Option<PriceSnapshot> {
        BattleNetClient::wow_token_price(self).await
    }
}
