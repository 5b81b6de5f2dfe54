use super::{short_id, Session};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Section id or unique id prefix
    pub id: String,

    /// Unpublish instead
    #[arg(long)]
    pub off: bool,
}

pub async fn publish(args: PublishArgs, session: &Session) -> Result<()> {
    let id = session.resolve(&args.id)?;
    let value = !args.off;
    let changed = session.engine.toggle_published(&id, value).await?;

    let state = if value { "published" } else { "unpublished" };
    if changed {
        println!("  {} {} {}", "✓".green(), short_id(&id).bright_white(), state);
    } else {
        println!(
            "  {} {} was already {}",
            "•".dimmed(),
            short_id(&id).bright_white(),
            state
        );
    }
    Ok(())
}
