use super::{short_id, Session};
use anyhow::Result;
use casework_common::{SectionEdit, SectionKind};
use clap::Args;
use colored::Colorize;
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Section type (introduction, alignment, carousel, fourParagraphs)
    #[arg(value_parser = SectionKind::from_str)]
    pub kind: SectionKind,

    /// Title instead of the type's default
    #[arg(short, long)]
    pub title: Option<String>,

    /// Body text
    #[arg(short, long)]
    pub content: Option<String>,
}

pub async fn add(args: AddArgs, session: &Session) -> Result<()> {
    let id = session.engine.add(args.kind).await?;

    let edit = SectionEdit {
        title: args.title,
        content: args.content,
        ..Default::default()
    };
    if !edit.is_empty() {
        session.engine.edit(&id, edit).await?;
    }

    let order = session
        .engine
        .view()
        .section(&id)
        .map(|s| s.order)
        .unwrap_or_default();
    println!(
        "  {} Added {} section {} at position {}",
        "✓".green(),
        args.kind.as_str().cyan(),
        short_id(&id).bright_white(),
        order
    );
    Ok(())
}
