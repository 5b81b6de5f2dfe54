use super::{short_id, Session};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the section list as JSON
    #[arg(long)]
    pub json: bool,

    /// Show full section ids
    #[arg(long)]
    pub full_ids: bool,
}

pub async fn list(args: ListArgs, session: &Session) -> Result<()> {
    let view = session.engine.view();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.sections)?);
        return Ok(());
    }

    println!(
        "📄 {} {}",
        "Document".bright_blue().bold(),
        session.document.to_string().bright_white()
    );

    if view.sections.is_empty() {
        println!("   {}", "No sections yet".dimmed());
        return Ok(());
    }

    for section in &view.sections {
        let id = if args.full_ids {
            section.id.as_str()
        } else {
            short_id(&section.id)
        };
        let state = if section.published {
            "published".green()
        } else {
            "draft".yellow()
        };
        println!(
            "   {:>2}. {} {:<15} {:<9} {}",
            section.order,
            id.dimmed(),
            section.kind.as_str().cyan(),
            state,
            section.title
        );
    }
    println!();
    println!("   {} sections", view.sections.len());

    Ok(())
}
