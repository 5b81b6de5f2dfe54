use super::{short_id, Session};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Section id or unique id prefix
    pub id: String,
}

pub async fn remove(args: RemoveArgs, session: &Session) -> Result<()> {
    let id = session.resolve(&args.id)?;
    session.engine.remove(&id).await?;

    println!("  {} Removed {}", "✓".green(), short_id(&id).bright_white());
    Ok(())
}
