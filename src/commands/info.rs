use crate::discord::Context;
use crate::discord::Error;
use poise::serenity_prelude::{Colour, CreateEmbed, Mentionable};

/// Teste la latence du bot
#[poise::command(slash_command, prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;

    let embed = CreateEmbed::new()
        .title("🏓 Pong!")
        .description(format!("Latence: {}ms", latency.as_millis()))
        .colour(Colour::DARK_GREEN);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Salue l'utilisateur
#[poise::command(slash_command, prefix_command)]
pub async fn hello(ctx: Context<'_>) -> Result<(), Error> {
    let embed = CreateEmbed::new()
        .title("👋 Salut!")
        .description(format!(
            "Bonjour {} ! Comment allez-vous ?",
            ctx.author().mention()
        ))
        .colour(Colour::BLUE);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
