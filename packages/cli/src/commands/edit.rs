use super::{short_id, Session};
use anyhow::{anyhow, Result};
use casework_common::{SectionEdit, SectionPayload};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Section id or unique id prefix
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub content: Option<String>,

    /// Type-specific payload as JSON, e.g. '{"kind":"introduction","subtitle":"Why"}'
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Opaque image reference
    #[arg(long, conflicts_with = "clear_image")]
    pub image_ref: Option<String>,

    /// Remove the image reference
    #[arg(long)]
    pub clear_image: bool,
}

impl EditArgs {
    fn to_edit(&self) -> Result<SectionEdit> {
        let payload = match &self.payload {
            Some(raw) => Some(
                serde_json::from_str::<SectionPayload>(raw)
                    .map_err(|e| anyhow!("Invalid payload: {}", e))?,
            ),
            None => None,
        };
        let image_ref = if self.clear_image {
            Some(None)
        } else {
            self.image_ref.clone().map(Some)
        };

        Ok(SectionEdit {
            title: self.title.clone(),
            content: self.content.clone(),
            payload,
            image_ref,
        })
    }
}

pub async fn edit(args: EditArgs, session: &Session) -> Result<()> {
    let edit = args.to_edit()?;
    if edit.is_empty() {
        return Err(anyhow!(
            "Nothing to change; pass --title, --content, --payload or an image flag"
        ));
    }

    let id = session.resolve(&args.id)?;
    session.engine.edit(&id, edit).await?;

    println!("  {} Updated {}", "✓".green(), short_id(&id).bright_white());
    Ok(())
}
