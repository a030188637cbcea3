use crate::{
    broadcast::notification::{price_text, PRICE_UNAVAILABLE},
    prices::PriceSource,
};

pub(crate) const PRICE_COMMAND: &str = "!precio";

/// Exact match after trimming, no arguments, never from bots
pub(crate) fn is_price_command(content: &str, author_is_bot: bool) -> bool {
    !author_is_bot && content.trim() == PRICE_COMMAND
}

/// Reply text for a chat message, or `None` if the message isn't the price command.
pub(crate) async fn price_reply<P: PriceSource + ?Sized>(
    prices: &P,
    content: &str,
    author_is_bot: bool,
) -> Option<String> {
    if !is_price_command(content, author_is_bot) {
        return None;
    }
    Some(match prices.wow_token_price().await {
        Some(snapshot) => price_text(&snapshot),
        None => PRICE_UNAVAILABLE.to_string(),
    })
}
