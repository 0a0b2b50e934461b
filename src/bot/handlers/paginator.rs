//! Button paginator for embeds.
//!
//! Sends the first page with `◀`/`▶` buttons and flips pages on presses until
//! the timeout expires, then removes the buttons. Single-page content is sent
//! without buttons.

use crate::{bot::Context, core::pagination::Pager, errors::Result};
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::debug;

/// Whether a button press belongs to the message sent for invocation `ctx_id`.
fn is_own_button(custom_id: &str, ctx_id: u64) -> bool {
    custom_id.starts_with(&ctx_id.to_string())
}

fn page_embed(title: &str, color: u32, pager: &Pager) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .title(title)
        .description(pager.current())
        .color(color);
    if pager.is_paginated() {
        embed.footer(serenity::CreateEmbedFooter::new(pager.footer()))
    } else {
        embed
    }
}

/// Sends `pager` as an embed titled `title`, with navigation buttons when
/// it has more than one page.
pub async fn paginate(
    ctx: Context<'_>,
    title: &str,
    color: u32,
    mut pager: Pager,
    ephemeral: bool,
) -> Result<()> {
    let reply = poise::CreateReply::default()
        .embed(page_embed(title, color, &pager))
        .ephemeral(ephemeral);

    if !pager.is_paginated() {
        ctx.send(reply).await?;
        return Ok(());
    }

    let ctx_id = ctx.id();
    let prev_button_id = format!("{ctx_id}prev");
    let next_button_id = format!("{ctx_id}next");
    let buttons = serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(&prev_button_id).emoji('◀'),
        serenity::CreateButton::new(&next_button_id).emoji('▶'),
    ]);

    let handle = ctx.send(reply.components(vec![buttons])).await?;
    let timeout = Duration::from_secs(ctx.data().settings.pagination.timeout_secs);

    while let Some(press) = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
        .filter(move |press| is_own_button(&press.data.custom_id, ctx_id))
        .timeout(timeout)
        .await
    {
        if press.data.custom_id == next_button_id {
            pager.next();
        } else if press.data.custom_id == prev_button_id {
            pager.previous();
        } else {
            continue;
        }
        debug!(page = pager.current_index(), "Paginator page changed");

        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(page_embed(title, color, &pager)),
                ),
            )
            .await?;
    }

    handle
        .edit(
            ctx,
            poise::CreateReply::default()
                .embed(page_embed(title, color, &pager))
                .components(Vec::new()),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_own_button() {
        assert!(is_own_button("42next", 42));
        assert!(is_own_button("42prev", 42));
        assert!(!is_own_button("43next", 42));
        assert!(!is_own_button("next", 42));
    }
}
