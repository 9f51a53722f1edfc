use crate::commands::{Command, COMMANDS, MODEL_OPTION};
use crate::relay::{InboundMessage, MessageOutcome, Relay};
use serenity::all::{
    ChannelId, CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, EventHandler,
    GatewayIntents, GuildId, Http, Interaction, Message, Ready,
};
use serenity::async_trait;
use serenity::Client;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct DiscordService {
    relay: Arc<Relay>,
    guild_id: GuildId,
}

impl DiscordService {
    pub fn new(relay: Arc<Relay>, guild_id: u64) -> Self {
        Self {
            relay,
            guild_id: GuildId::new(guild_id),
        }
    }

    pub async fn run(self, token: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(token, intents).event_handler(self).await?;
        client.start().await?;
        Ok(())
    }

    async fn respond(&self, ctx: &Context, command: &CommandInteraction) {
        let option = command
            .data
            .options
            .iter()
            .find(|option| option.name == MODEL_OPTION)
            .and_then(|option| option.value.as_str());
        let parsed = Command::parse(&command.data.name, option);
        let reply = self.relay.handle_command(command.user.id.get(), parsed).await;

        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(reply),
        );
        if let Err(e) = command.create_response(&ctx.http, response).await {
            error!("Failed to answer /{}: {}", command.data.name, e);
        }
    }
}

fn slash_commands() -> Vec<CreateCommand> {
    COMMANDS
        .iter()
        .map(|spec| {
            let command = CreateCommand::new(spec.name).description(spec.description);
            match spec.option {
                Some((name, description)) => command.add_option(
                    CreateCommandOption::new(CommandOptionType::String, name, description)
                        .required(true),
                ),
                None => command,
            }
        })
        .collect()
}

pub async fn post_message(
    http: &Http,
    channel_id: ChannelId,
    content: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = CreateMessage::new().content(content);
    channel_id.send_message(http, builder).await?;
    Ok(())
}

#[async_trait]
impl EventHandler for DiscordService {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}!", ready.user.name);

        info!("Started refreshing application (/) commands.");
        match self.guild_id.set_commands(&ctx.http, slash_commands()).await {
            Ok(installed) => info!("Installed {} commands.", installed.len()),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            debug!("Interaction: /{} from {}", command.data.name, command.user.id);
            self.respond(&ctx, &command).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let author_id = msg.author.id.get();
        if self.relay.is_enabled() && self.relay.responds_to(author_id) {
            if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
                debug!("Could not show typing indicator: {}", e);
            }
        }

        let outcome = self
            .relay
            .handle_message(InboundMessage {
                channel_id: msg.channel_id.to_string(),
                author: msg.author.name.clone(),
                author_id,
                content: msg.content.clone(),
            })
            .await;

        if let MessageOutcome::Suppressed(e) = &outcome {
            debug!("No reply for channel {}: {}", msg.channel_id, e);
            return;
        }

        match outcome.render() {
            Some(reply) if reply.trim().is_empty() => {
                warn!("Completion came back empty; nothing to send");
            }
            Some(reply) => {
                if let Err(e) = post_message(&ctx.http, msg.channel_id, &reply).await {
                    error!("Discord connection lost: {}", e);
                }
            }
            None => {}
        }
    }
}
