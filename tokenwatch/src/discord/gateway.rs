use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, ChannelType, Colour, CreateEmbed, CreateEmbedFooter, CreateMessage,
    GuildChannel, Timestamp,
};

use crate::broadcast::{
    notification::{AlertEmbed, Notification},
    ChannelId, ChannelInfo, ChannelKind, ChatGateway, DestinationId,
};

/// Guilds the bot is in, as seen through serenity's cache and http client
pub(crate) struct SerenityGateway {
    ctx: serenity::Context,
}

impl SerenityGateway {
    pub(crate) fn new(ctx: serenity::Context) -> Self {
        Self { ctx }
    }
}

fn channel_info(channel: &GuildChannel) -> ChannelInfo {
    ChannelInfo {
        id: ChannelId(channel.id.get()),
        name: channel.name.clone(),
        kind: match channel.kind {
            ChannelType::Text => ChannelKind::Text,
            _ => ChannelKind::Other,
        },
    }
}

fn create_embed(embed: &AlertEmbed) -> CreateEmbed {
    let builder = CreateEmbed::new()
        .title(&embed.title)
        .description(&embed.description)
        .colour(Colour::new(embed.color))
        .footer(CreateEmbedFooter::new(&embed.footer));
    match Timestamp::from_unix_timestamp(embed.timestamp.timestamp()) {
        Ok(timestamp) => builder.timestamp(timestamp),
        Err(_) => builder,
    }
}

#[async_trait]
impl ChatGateway for SerenityGateway {
    async fn destinations(&self) -> Vec<DestinationId> {
        self.ctx
            .cache
            .guilds()
            .into_iter()
            .map(|guild| DestinationId(guild.get()))
            .collect()
    }

    async fn channels(&self, destination: DestinationId) -> anyhow::Result<Vec<ChannelInfo>> {
        let guild_id = serenity::GuildId::new(destination.0);
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.channels.values().map(channel_info).collect::<Vec<_>>());
        if let Some(channels) = cached {
            return Ok(channels);
        }
        let channels = guild_id.channels(&self.ctx.http).await?;
        Ok(channels.values().map(channel_info).collect())
    }

    async fn deliver(&self, channel: ChannelId, notification: &Notification) -> anyhow::Result<()> {
        let mut message = CreateMessage::new().content(&notification.text);
        if let Some(embed) = &notification.embed {
            message = message.embed(create_embed(embed));
        }
        serenity::ChannelId::new(channel.0)
            .send_message(&self.ctx.http, message)
            .await?;
        Ok(())
    }
}
