use crate::checks::DenyReason;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::{
    ChannelId, ChannelType, Colour, CreateEmbed, CreateEmbedFooter, CreateMessage, HttpError,
    Mentionable, Permissions, RoleId, Timestamp, UserId,
};

/// The user who triggered the interaction, captured at the boundary.
#[derive(Clone, Debug)]
pub struct Requester {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: String,
}

/// One alert to deliver. Built per interaction, dropped after handling.
#[derive(Clone, Debug)]
pub struct DispatchRequest {
    pub target_channel: ChannelId,
    pub body: String,
    pub success_label: String,
    pub requester: Requester,
}

/// Everything a dispatch attempt can end in. Exactly one of these is
/// rendered back to the requester as an ephemeral reply; only [`Sent`]
/// also produced a public message.
///
/// [`Sent`]: DispatchOutcome::Sent
#[derive(Clone, Debug)]
pub enum DispatchOutcome {
    Sent {
        channel_name: String,
        channel_mention: String,
        link: String,
        success_label: String,
    },
    Denied(DenyReason),
    ChannelNotFound,
    NotATextChannel,
    BotLacksPermission { channel_mention: String },
    TransportError { detail: String },
    UnexpectedError { detail: String },
}

/// Ephemeral feedback for the requester.
pub enum Feedback {
    Success(CreateEmbed),
    Failure(String),
}

/// The percepteur alert body: who raised it and which role should defend.
pub fn alert_body(requester: UserId, defender_role: RoleId) -> String {
    format!(
        "🚨 **ATTAQUE PERCEPTEUR**\n\n{} a déclenché l'alerte ! {} si vous le pouvez venez défendre !",
        requester.mention(),
        defender_role.mention()
    )
}

/// Sends the alert embed to the target channel.
///
/// Each step can exit early with its own outcome; the send itself maps
/// transport failures to [`DispatchOutcome::TransportError`] and anything
/// else to [`DispatchOutcome::UnexpectedError`]. Never panics the task.
pub async fn dispatch(ctx: &serenity::Context, request: DispatchRequest) -> DispatchOutcome {
    let channel = match request.target_channel.to_channel(ctx).await {
        Ok(channel) => channel,
        Err(serenity::Error::Http(HttpError::UnsuccessfulRequest(response)))
            if response.status_code == serenity::StatusCode::NOT_FOUND =>
        {
            log::error!("Channel {} not found", request.target_channel);
            return DispatchOutcome::ChannelNotFound;
        }
        Err(serenity::Error::Http(error)) => {
            log::error!("Failed to resolve channel {}: {}", request.target_channel, error);
            return DispatchOutcome::TransportError {
                detail: error.to_string(),
            };
        }
        Err(error) => {
            log::error!("Failed to resolve channel {}: {}", request.target_channel, error);
            return DispatchOutcome::UnexpectedError {
                detail: error.to_string(),
            };
        }
    };

    let channel = match channel.guild() {
        Some(channel) if is_postable(channel.kind) => channel,
        _ => return DispatchOutcome::NotATextChannel,
    };

    // Check our own send permission upfront when the guild is cached.
    // If it is not, the send below reports the failure instead.
    let bot_id = ctx.cache.current_user().id;
    let permissions: Option<Permissions> = ctx
        .cache
        .guild(channel.guild_id)
        .and_then(|guild| {
            guild
                .members
                .get(&bot_id)
                .map(|me| guild.user_permissions_in(&channel, me))
        });
    if let Some(permissions) = permissions {
        if !permissions.send_messages() {
            return DispatchOutcome::BotLacksPermission {
                channel_mention: channel.id.mention().to_string(),
            };
        }
    }

    let embed = CreateEmbed::new()
        .description(request.body.as_str())
        .colour(Colour::BLUE)
        .timestamp(Timestamp::now())
        .footer(
            CreateEmbedFooter::new(format!("Envoyé par {}", request.requester.display_name))
                .icon_url(request.requester.avatar_url.as_str()),
        );

    match channel.send_message(ctx, CreateMessage::new().embed(embed)).await {
        Ok(message) => {
            log::info!(
                "Alert sent by {} to channel {} ({})",
                request.requester.display_name,
                channel.name,
                channel.id
            );
            DispatchOutcome::Sent {
                channel_name: channel.name.clone(),
                channel_mention: channel.id.mention().to_string(),
                link: message.link(),
                success_label: request.success_label,
            }
        }
        Err(serenity::Error::Http(HttpError::UnsuccessfulRequest(response)))
            if response.status_code == serenity::StatusCode::FORBIDDEN =>
        {
            log::error!("Forbidden: cannot send message to channel {}", channel.id);
            DispatchOutcome::TransportError {
                detail: "permission refusée par l'API".to_string(),
            }
        }
        Err(serenity::Error::Http(error)) => {
            log::error!("HTTP error sending message: {}", error);
            DispatchOutcome::TransportError {
                detail: error.to_string(),
            }
        }
        Err(error) => {
            log::error!("Unexpected error sending message: {}", error);
            DispatchOutcome::UnexpectedError {
                detail: error.to_string(),
            }
        }
    }
}

fn is_postable(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::Text | ChannelType::News)
}

impl DispatchOutcome {
    /// Maps the outcome to the requester-facing reply. Called exactly once
    /// per interaction.
    pub fn feedback(&self) -> Feedback {
        match self {
            DispatchOutcome::Sent {
                channel_name,
                channel_mention,
                link,
                success_label,
            } => Feedback::Success(
                CreateEmbed::new()
                    .title("✅ Succès")
                    .description(format!(
                        "{}\n**Channel:** {}\n**Message:** [Voir le message]({})",
                        success_label, channel_mention, link
                    ))
                    .footer(CreateEmbedFooter::new(format!("#{}", channel_name)))
                    .colour(Colour::DARK_GREEN),
            ),
            DispatchOutcome::Denied(reason) => Feedback::Failure(reason.message().to_string()),
            DispatchOutcome::ChannelNotFound => Feedback::Failure(
                "❌ Channel non trouvé ! Vérifiez la configuration.".to_string(),
            ),
            DispatchOutcome::NotATextChannel => Feedback::Failure(
                "❌ Le channel configuré n'est pas un channel de texte !".to_string(),
            ),
            DispatchOutcome::BotLacksPermission { channel_mention } => Feedback::Failure(format!(
                "❌ Le bot n'a pas la permission d'envoyer des messages dans {}",
                channel_mention
            )),
            DispatchOutcome::TransportError { detail } => Feedback::Failure(format!(
                "❌ Erreur lors de l'envoi du message: {}",
                detail
            )),
            DispatchOutcome::UnexpectedError { .. } => Feedback::Failure(
                "❌ Une erreur inattendue s'est produite.".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::DenyReason;

    fn failure_text(outcome: DispatchOutcome) -> String {
        match outcome.feedback() {
            Feedback::Failure(text) => text,
            Feedback::Success(_) => panic!("expected failure feedback"),
        }
    }

    #[test]
    fn alert_body_names_the_attack_and_the_requester() {
        let body = alert_body(UserId::new(42), RoleId::new(77));
        assert!(body.contains("ATTAQUE PERCEPTEUR"));
        assert!(body.contains("<@42>"));
        assert!(body.contains("<@&77>"));
    }

    #[test]
    fn channel_errors_name_the_misconfiguration() {
        assert!(failure_text(DispatchOutcome::ChannelNotFound).contains("configuration"));
        assert!(failure_text(DispatchOutcome::NotATextChannel).contains("texte"));
    }

    #[test]
    fn permission_failure_references_the_channel() {
        let text = failure_text(DispatchOutcome::BotLacksPermission {
            channel_mention: "<#99>".to_string(),
        });
        assert!(text.contains("<#99>"));
    }

    #[test]
    fn transport_failure_carries_the_detail() {
        let text = failure_text(DispatchOutcome::TransportError {
            detail: "503".to_string(),
        });
        assert!(text.contains("503"));
    }

    #[test]
    fn unexpected_failure_stays_generic() {
        let text = failure_text(DispatchOutcome::UnexpectedError {
            detail: "secret internals".to_string(),
        });
        assert!(!text.contains("secret internals"));
    }

    #[test]
    fn denial_renders_the_reason() {
        let text = failure_text(DispatchOutcome::Denied(DenyReason::MissingAllowedRole));
        assert!(text.contains("permissions"));
    }

    #[test]
    fn only_sent_renders_a_success() {
        let outcome = DispatchOutcome::Sent {
            channel_name: "alertes".to_string(),
            channel_mention: "<#4>".to_string(),
            link: "https://discord.com/channels/1/4/9".to_string(),
            success_label: "Attaque Percepteur signalée!".to_string(),
        };
        assert!(matches!(outcome.feedback(), Feedback::Success(_)));
    }

    #[test]
    fn postable_kinds() {
        assert!(is_postable(ChannelType::Text));
        assert!(is_postable(ChannelType::News));
        assert!(!is_postable(ChannelType::Voice));
        assert!(!is_postable(ChannelType::Category));
        assert!(!is_postable(ChannelType::Forum));
    }
}
