use crate::discord::Context;
use crate::discord::Error;
use poise::serenity_prelude::{Colour, CreateEmbed, CreateEmbedFooter};

/// Affiche l'aide du bot
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = &ctx.data().settings.prefix;

    let embed = CreateEmbed::new()
        .title("📚 Aide - Alerte Percepteur")
        .description("Voici les commandes disponibles:")
        .field(
            "Commandes Slash",
            "`/ping` - Teste la latence\n\
             `/hello` - Salue l'utilisateur\n\
             `/buttons` - Affiche les boutons interactifs\n\
             `/alert` - Déclenche l'alerte percepteur (avec confirmation)\n\
             `/help` - Affiche cette aide",
            false,
        )
        .field(
            "Commandes Préfixe",
            format!(
                "`{prefix}ping` - Teste la latence\n`{prefix}hello` - Salue l'utilisateur"
            ),
            false,
        )
        .footer(CreateEmbedFooter::new("Alerte Percepteur"))
        .colour(Colour::PURPLE);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
