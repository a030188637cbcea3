pub(crate) mod notification;

use async_trait::async_trait;
use futures::future;
use tracing::{error, instrument, warn};

use self::notification::Notification;

/// A connected chat server
#[derive(Hash, Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct DestinationId(pub u64);

#[derive(Hash, Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct ChannelId(pub u64);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ChannelKind {
    Text,
    Other,
}

#[derive(Clone, Debug)]
pub(crate) struct ChannelInfo {
    pub(crate) id: ChannelId,
    pub(crate) name: String,
    pub(crate) kind: ChannelKind,
}

/// What the fan-out needs from the chat platform
#[async_trait]
pub(crate) trait ChatGateway: Send + Sync + 'static {
    /// Destinations connected right now
    async fn destinations(&self) -> Vec<DestinationId>;

    async fn channels(&self, destination: DestinationId) -> anyhow::Result<Vec<ChannelInfo>>;

    async fn deliver(&self, channel: ChannelId, notification: &Notification) -> anyhow::Result<()>;
}

pub(crate) fn find_target_channel<'a>(
    channels: &'a [ChannelInfo],
    name: &str,
) -> Option<&'a ChannelInfo> {
    channels
        .iter()
        .find(|c| c.kind == ChannelKind::Text && c.name == name)
}

/// Delivers to the destination's target channel. Returns whether the message went out;
/// every failure is logged here.
#[instrument(skip(gateway, notification), fields(kind = ?notification.kind))]
pub(crate) async fn notify_destination<G: ChatGateway + ?Sized>(
    gateway: &G,
    destination: DestinationId,
    channel_name: &str,
    notification: &Notification,
) -> bool {
    let channels = match gateway.channels(destination).await {
        Ok(channels) => channels,
        Err(e) => {
            error!("Error listing channels {e:?}");
            return false;
        }
    };
    let Some(target) = find_target_channel(&channels, channel_name) else {
        warn!("Channel {channel_name} not found");
        return false;
    };
    match gateway.deliver(target.id, notification).await {
        Ok(()) => true,
        Err(e) => {
            error!("Error delivering to {:?} {e:?}", target.id);
            false
        }
    }
}

/// Sends `notification` to every connected destination, returning how many received it.
pub(crate) async fn notify_all<G: ChatGateway + ?Sized>(
    gateway: &G,
    channel_name: &str,
    notification: &Notification,
) -> usize {
    let destinations = gateway.destinations().await;
    future::join_all(
        destinations
            .into_iter()
            .map(|destination| notify_destination(gateway, destination, channel_name, notification)),
    )
    .await
    .into_iter()
    .filter(|delivered| *delivered)
    .count()
}
