use super::{short_id, Session};
use anyhow::Result;
use casework_common::Direction;
use clap::{Args, ValueEnum};
use colored::Colorize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Section id or unique id prefix
    pub id: String,

    /// Towards the start (up) or end (down) of the document
    #[arg(value_enum)]
    pub direction: MoveDirection,
}

pub async fn reorder(args: MoveArgs, session: &Session) -> Result<()> {
    let id = session.resolve(&args.id)?;
    let moved = session.engine.reorder(&id, args.direction.into()).await?;

    if moved {
        println!(
            "  {} Moved {} {:?}",
            "✓".green(),
            short_id(&id).bright_white(),
            args.direction
        );
    } else {
        println!(
            "  {} {} is already at the {}",
            "⚠️".yellow(),
            short_id(&id).bright_white(),
            match args.direction {
                MoveDirection::Up => "top",
                MoveDirection::Down => "bottom",
            }
        );
    }
    Ok(())
}
