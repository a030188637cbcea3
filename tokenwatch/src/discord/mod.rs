mod gateway;
pub(crate) mod price_command;

use std::sync::Arc;

use battlenet::BattleNetClient;
use poise::serenity_prelude as serenity;
use tracing::info;

use crate::alerts::alert_manager::{AlertManager, AlertSettings};

use self::gateway::SerenityGateway;
use self::price_command::price_reply;

type Error = Box<dyn std::error::Error + Send + Sync>;

// User data, which is stored and accessible in all event handlers
pub(crate) struct Data {
    prices: Arc<BattleNetClient>,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if let Some(reply) = price_reply(
            data.prices.as_ref(),
            &new_message.content,
            new_message.author.bot,
        )
        .await
        {
            new_message.channel_id.say(&ctx.http, reply).await?;
        }
    }
    Ok(())
}

/// Logs in and runs until the gateway connection fails for good.
pub(crate) async fn start_discord(
    discord_token: String,
    prices: Arc<BattleNetClient>,
    settings: AlertSettings,
) -> anyhow::Result<()> {
    let framework: poise::Framework<Data, Error> = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx: &serenity::Context, ready, _framework| {
            Box::pin(async move {
                info!("Bot conectado como {}", ready.user.tag());
                // start the price checks once we know which guilds we're in
                let gateway = Arc::new(SerenityGateway::new(ctx.clone()));
                tokio::spawn(AlertManager::new(prices.clone(), gateway, settings).start_manager());
                Ok(Data { prices })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::ClientBuilder::new(discord_token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
