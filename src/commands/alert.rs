use crate::checks::{self, Access};
use crate::confirm::{self, ConfirmState};
use crate::discord::{Context, Data, Error};
use crate::dispatch::{self, DispatchOutcome, DispatchRequest, Feedback, Requester};
use crate::settings::Settings;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::{
    ButtonStyle, Colour, ComponentInteraction, CreateActionRow, CreateButton, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage,
};

/// Stable component id. Re-registered at every startup, so presses on
/// panels posted before a restart still route here.
pub const ALERT_BUTTON_ID: &str = "alert_button";

const SUCCESS_LABEL: &str = "Attaque Percepteur signalée!";

/// Panel components decoded at the gateway boundary, before any
/// business logic runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelAction {
    Alert,
}

impl PanelAction {
    pub fn from_custom_id(id: &str) -> Option<Self> {
        match id {
            ALERT_BUTTON_ID => Some(PanelAction::Alert),
            _ => None,
        }
    }
}

/// Affiche les boutons interactifs
#[poise::command(slash_command)]
pub async fn buttons(ctx: Context<'_>) -> Result<(), Error> {
    let embed = CreateEmbed::new()
        .title("🚨 Alerte Percepteur🚨")
        .description(
            "😎 Ce Bot vous permet de ping rapidement les niveaux 200 en cas d'attaque ! 😎",
        )
        .colour(Colour::ORANGE);

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .components(vec![panel_row()]),
    )
    .await?;

    Ok(())
}

/// Déclenche l'alerte percepteur (avec confirmation)
#[poise::command(slash_command)]
pub async fn alert(ctx: Context<'_>) -> Result<(), Error> {
    let settings = &ctx.data().settings;
    let member = ctx.author_member().await;

    let outcome = match checks::member_access(member.as_deref(), settings.allowed_roles()) {
        Access::Denied(reason) => {
            log::warn!(
                "User {} attempted to trigger the alert without permission",
                ctx.author().tag()
            );
            DispatchOutcome::Denied(reason)
        }
        Access::Allowed => {
            match confirm::ask(ctx, "🚨 Déclencher l'alerte percepteur ?").await? {
                ConfirmState::Confirmed => {
                    let requester = requester(ctx.author(), member.as_deref());
                    dispatch::dispatch(ctx.serenity_context(), alert_request(settings, requester))
                        .await
                }
                // Cancelled or expired, the prompt edit already told the user.
                _ => return Ok(()),
            }
        }
    };

    let reply = match outcome.feedback() {
        Feedback::Success(embed) => poise::CreateReply::default().embed(embed),
        Feedback::Failure(text) => poise::CreateReply::default().content(text),
    }
    .ephemeral(true);
    ctx.send(reply).await?;

    Ok(())
}

/// Handles a press on the persistent alert panel.
pub async fn handle_panel_action(
    ctx: &serenity::Context,
    component: &ComponentInteraction,
    action: PanelAction,
    data: &Data,
) -> Result<(), Error> {
    match action {
        PanelAction::Alert => {
            let settings = &data.settings;
            let outcome =
                match checks::member_access(component.member.as_ref(), settings.allowed_roles()) {
                    Access::Denied(reason) => {
                        log::warn!(
                            "User {} attempted to use the alert button without permission",
                            component.user.tag()
                        );
                        DispatchOutcome::Denied(reason)
                    }
                    Access::Allowed => {
                        let requester = requester(&component.user, component.member.as_ref());
                        dispatch::dispatch(ctx, alert_request(settings, requester)).await
                    }
                };

            let message = match outcome.feedback() {
                Feedback::Success(embed) => CreateInteractionResponseMessage::new().embed(embed),
                Feedback::Failure(text) => CreateInteractionResponseMessage::new().content(text),
            }
            .ephemeral(true);
            component
                .create_response(&ctx.http, CreateInteractionResponse::Message(message))
                .await?;
        }
    }

    Ok(())
}

fn panel_row() -> CreateActionRow {
    CreateActionRow::Buttons(vec![CreateButton::new(ALERT_BUTTON_ID)
        .style(ButtonStyle::Danger)
        .label("🚨 Attaque Percepteur🚨")])
}

fn requester(user: &serenity::User, member: Option<&serenity::Member>) -> Requester {
    let display_name = match member {
        Some(member) => member.display_name().to_string(),
        None => user
            .global_name
            .clone()
            .unwrap_or_else(|| user.name.clone()),
    };
    Requester {
        id: user.id,
        display_name,
        avatar_url: user.face(),
    }
}

fn alert_request(settings: &Settings, requester: Requester) -> DispatchRequest {
    DispatchRequest {
        target_channel: settings.alert_channel(),
        body: dispatch::alert_body(requester.id, settings.defender_role()),
        success_label: SUCCESS_LABEL.to_string(),
        requester,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_alert_button_id_decodes() {
        assert_eq!(
            PanelAction::from_custom_id(ALERT_BUTTON_ID),
            Some(PanelAction::Alert)
        );
    }

    #[test]
    fn foreign_custom_ids_are_ignored() {
        assert_eq!(PanelAction::from_custom_id("confirm_123"), None);
        assert_eq!(PanelAction::from_custom_id(""), None);
    }
}
