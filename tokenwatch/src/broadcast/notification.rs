use battlenet::PriceSnapshot;
use chrono::{DateTime, Utc};

/// Embed colour used for range alerts
pub(crate) const GOLD: u32 = 0xFFD700;
pub(crate) const EMBED_FOOTER: &str = "Battle.net API";
pub(crate) const PRICE_UNAVAILABLE: &str = "⚠️ No se pudo obtener el precio. Inténtalo más tarde.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotificationKind {
    PriceUpdate,
    RangeAlert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AlertEmbed {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) color: u32,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) footer: String,
}

/// Payload delivered to a destination's target channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notification {
    pub(crate) kind: NotificationKind,
    pub(crate) text: String,
    pub(crate) embed: Option<AlertEmbed>,
}

pub(crate) fn price_text(snapshot: &PriceSnapshot) -> String {
    format!(
        "💰 **Precio Actual del WoW Token (US):** {} oro\n⏱ **Última Actualización:** {}",
        snapshot.price, snapshot.observed_at
    )
}

impl Notification {
    pub(crate) fn price_update(snapshot: &PriceSnapshot) -> Self {
        Self {
            kind: NotificationKind::PriceUpdate,
            text: price_text(snapshot),
            embed: None,
        }
    }

    /// `sent_at` stamps the embed; the price and update time come from `snapshot`.
    pub(crate) fn range_alert(snapshot: &PriceSnapshot, sent_at: DateTime<Utc>) -> Self {
        let PriceSnapshot { price, observed_at } = snapshot;
        Self {
            kind: NotificationKind::RangeAlert,
            text: format!(
                "🎉🎉 **¡ALERTA!** 🎉🎉\n💰 **El precio del WoW Token está en el rango establecido:**\n**Precio:** {price} oro\n⏱ **Última Actualización:** {observed_at}"
            ),
            embed: Some(AlertEmbed {
                title: "¡El precio del WoW Token está dentro del rango!".to_string(),
                description: format!("El precio actual es **{price} oro**."),
                color: GOLD,
                timestamp: sent_at,
                footer: EMBED_FOOTER.to_string(),
            }),
        }
    }
}
