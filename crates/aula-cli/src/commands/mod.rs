//! Command handlers.

pub mod auth;
pub mod dashboard;
pub mod professor;
pub mod selection;
pub mod student;
pub mod subject;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, ctx, flags).await,
        Commands::Student { action } => student::handle(&action, ctx, flags).await,
        Commands::Subject { action } => subject::handle(&action, ctx, flags).await,
        Commands::Professor { action } => professor::handle(&action, ctx, flags).await,
        Commands::Selection { action } => selection::handle(&action, ctx, flags).await,
        Commands::Dashboard => dashboard::handle(ctx, flags).await,
    }
}
