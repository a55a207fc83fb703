use crate::discord::{Context, Error};
use poise::serenity_prelude::{
    ButtonStyle, ComponentInteractionCollector, CreateActionRow, CreateButton,
    CreateInteractionResponse,
};
use std::time::Duration;

/// Bounded wait before an unanswered confirmation expires.
const CHOICE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Confirm,
    Cancel,
}

/// Lifecycle of one confirmation view. Settled states ignore further
/// input, so a press arriving after the timeout is inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmState {
    WaitingForChoice,
    Confirmed,
    Cancelled,
    TimedOut,
}

impl ConfirmState {
    pub fn on_choice(self, choice: Choice) -> Self {
        match self {
            ConfirmState::WaitingForChoice => match choice {
                Choice::Confirm => ConfirmState::Confirmed,
                Choice::Cancel => ConfirmState::Cancelled,
            },
            settled => settled,
        }
    }

    pub fn on_timeout(self) -> Self {
        match self {
            ConfirmState::WaitingForChoice => ConfirmState::TimedOut,
            settled => settled,
        }
    }
}

/// Asks the invoking user to confirm or cancel, with a bounded wait.
///
/// The prompt is ephemeral; its buttons are scoped to this interaction
/// via unique custom ids and removed once the view settles, so stale
/// presses have nothing left to hit.
pub async fn ask(ctx: Context<'_>, prompt: &str) -> Result<ConfirmState, Error> {
    let confirm_id = format!("confirm_{}", ctx.id());
    let cancel_id = format!("cancel_{}", ctx.id());

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(confirm_id.as_str())
            .style(ButtonStyle::Success)
            .label("✅ Confirmer"),
        CreateButton::new(cancel_id.as_str())
            .style(ButtonStyle::Danger)
            .label("❌ Annuler"),
    ]);
    let handle = ctx
        .send(
            poise::CreateReply::default()
                .content(prompt)
                .components(vec![buttons])
                .ephemeral(true),
        )
        .await?;

    let state = ConfirmState::WaitingForChoice;
    let filter_confirm = confirm_id.clone();
    let filter_cancel = cancel_id.clone();
    let press = ComponentInteractionCollector::new(ctx)
        .author_id(ctx.author().id)
        .channel_id(ctx.channel_id())
        .timeout(CHOICE_TIMEOUT)
        .filter(move |press| {
            press.data.custom_id == filter_confirm || press.data.custom_id == filter_cancel
        })
        .await;

    let state = match press {
        Some(press) => {
            press
                .create_response(ctx.serenity_context(), CreateInteractionResponse::Acknowledge)
                .await?;
            if press.data.custom_id == confirm_id {
                state.on_choice(Choice::Confirm)
            } else {
                state.on_choice(Choice::Cancel)
            }
        }
        None => state.on_timeout(),
    };

    let content = match state {
        ConfirmState::Confirmed | ConfirmState::WaitingForChoice => prompt.to_string(),
        ConfirmState::Cancelled => "❌ Action annulée.".to_string(),
        ConfirmState::TimedOut => "⏱️ Temps écoulé, action annulée.".to_string(),
    };
    handle
        .edit(
            ctx,
            poise::CreateReply::default()
                .content(content)
                .components(Vec::new()),
        )
        .await?;

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_settle_the_view() {
        let state = ConfirmState::WaitingForChoice;
        assert_eq!(state.on_choice(Choice::Confirm), ConfirmState::Confirmed);
        assert_eq!(state.on_choice(Choice::Cancel), ConfirmState::Cancelled);
    }

    #[test]
    fn timeout_settles_the_view() {
        assert_eq!(
            ConfirmState::WaitingForChoice.on_timeout(),
            ConfirmState::TimedOut
        );
    }

    #[test]
    fn presses_after_timeout_are_inert() {
        let state = ConfirmState::WaitingForChoice.on_timeout();
        assert_eq!(state.on_choice(Choice::Confirm), ConfirmState::TimedOut);
        assert_eq!(state.on_choice(Choice::Cancel), ConfirmState::TimedOut);
    }

    #[test]
    fn settled_states_do_not_time_out_again() {
        assert_eq!(ConfirmState::Confirmed.on_timeout(), ConfirmState::Confirmed);
        assert_eq!(ConfirmState::Cancelled.on_timeout(), ConfirmState::Cancelled);
    }
}
