use crate::commands::{self, PanelAction};
use crate::settings::Settings;
use anyhow::Result;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Shown as the bot's "watching" activity.
const ACTIVITY: &str = "les alertes et notifications";

/// Shared, read-only bot data. Settings are never mutated after startup.
pub struct Data {
    pub settings: Arc<Settings>,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub async fn run(settings: Settings) -> Result<()> {
    let settings = Arc::new(settings);

    let options = poise::FrameworkOptions {
        commands: vec![
            commands::ping(),
            commands::hello(),
            commands::help(),
            commands::buttons(),
            commands::alert(),
        ],
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(settings.prefix.clone()),
            case_insensitive_commands: true,
            ..Default::default()
        },
        on_error: |error| Box::pin(on_error(error)),
        pre_command: |ctx| {
            Box::pin(async move {
                log::info!(
                    "Got command '{}' by user '{}'",
                    ctx.command().qualified_name,
                    ctx.author().tag()
                );
            })
        },
        event_handler: |ctx, event, framework, data| {
            Box::pin(handle_event(ctx, event, framework, data))
        },
        ..Default::default()
    };

    let data_settings = Arc::clone(&settings);
    let framework = poise::Framework::builder()
        .options(options)
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                log::info!("Connected as {}", ready.user.name);

                // Slash commands are synced globally at every startup;
                // the alert button re-registers through its stable id.
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                log::info!("Synced {} command(s)", framework.options().commands.len());

                ctx.set_presence(
                    Some(serenity::ActivityData::watching(ACTIVITY)),
                    serenity::OnlineStatus::Online,
                );

                Ok(Data {
                    settings: data_settings,
                })
            })
        })
        .build();

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&settings.token, intents)
        .framework(framework)
        .await?;

    Ok(client.start().await?)
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Resume { .. } => {
            log::info!("Connection to discord resumed.");
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            log::info!(
                "Component interaction from {}: {}",
                component.user.tag(),
                component.data.custom_id
            );
            if let Some(action) = PanelAction::from_custom_id(&component.data.custom_id) {
                commands::handle_panel_action(ctx, component, action, data).await?;
            }
        }
        _ => {}
    }

    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            log::error!("Failed to setup framework: {:?}", error)
        }
        poise::FrameworkError::UnknownCommand { ctx, msg, .. } => {
            let _ = msg
                .channel_id
                .say(
                    &ctx.http,
                    "❌ Commande non trouvée. Utilisez `/help` pour voir les commandes disponibles.",
                )
                .await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            let _ = ctx
                .say("❌ Vous n'avez pas les permissions nécessaires pour cette commande.")
                .await;
        }
        poise::FrameworkError::MissingBotPermissions { ctx, .. } => {
            let _ = ctx
                .say("❌ Le bot n'a pas les permissions nécessaires pour exécuter cette commande.")
                .await;
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            log::error!(
                "Unexpected error in '{}': {:#}",
                ctx.command().qualified_name,
                error
            );
            let _ = ctx.say("❌ Une erreur inattendue s'est produite.").await;
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                log::warn!("Error while handling error: {}", e);
            }
        }
    }
}
