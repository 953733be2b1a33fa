//! `aula selection` handlers.

mod draft;
mod screen;

use serde::Serialize;

use aula_core::errors::CoreError;

pub use draft::DraftStore;
pub use screen::{SaveOutcome, SelectionScreen, ToggleAction};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SelectionCommands;
use crate::context::AppContext;
use crate::output;

/// One catalog row on the selection screen.
#[derive(Serialize)]
struct SelectionRow {
    id: String,
    name: String,
    credits: u32,
    professor_id: String,
    schedule: String,
    seats: String,
    selected: bool,
}

pub async fn handle(
    action: &SelectionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let student_id = ctx.require_login()?;
    let drafts = DraftStore::for_student(&student_id)?;

    match action {
        SelectionCommands::Show => {
            let screen =
                SelectionScreen::enter(&ctx.service, ctx.limits(), &student_id, drafts.load()?)
                    .await?;
            print_screen(&screen, flags)
        }
        SelectionCommands::Toggle { subject_id } => {
            let mut screen =
                SelectionScreen::enter(&ctx.service, ctx.limits(), &student_id, drafts.load()?)
                    .await?;

            match screen.toggle(subject_id)? {
                Ok(ToggleAction::Added) => {
                    drafts.save(screen.draft())?;
                    if !flags.quiet {
                        eprintln!("added {subject_id} to the draft");
                    }
                }
                Ok(ToggleAction::Removed) => {
                    drafts.save(screen.draft())?;
                    if !flags.quiet {
                        eprintln!("removed {subject_id} from the draft");
                    }
                }
                Err(rejection) => {
                    let code = rejection.code();
                    return Err(anyhow::Error::new(CoreError::from(rejection))
                        .context(format!("toggle rejected ({code})")));
                }
            }
            print_screen(&screen, flags)
        }
        SelectionCommands::Save => {
            let mut screen =
                SelectionScreen::enter(&ctx.service, ctx.limits(), &student_id, drafts.load()?)
                    .await?;
            let mut catalog_feed = ctx.service.watch().subscribe_subjects();

            match screen.save(&ctx.service).await? {
                SaveOutcome::Saved(student) => {
                    drafts.clear()?;
                    screen.pump_snapshots(&mut catalog_feed);
                    if !flags.quiet {
                        eprintln!("selection saved: {}", screen.summary());
                    }
                    output::output(&student, flags.format)
                }
                SaveOutcome::Rejected(rejection) => {
                    let code = rejection.code();
                    Err(anyhow::Error::new(CoreError::from(rejection))
                        .context(format!("selection rejected ({code}); the draft is unchanged")))
                }
            }
        }
        SelectionCommands::Refresh => {
            drafts.clear()?;
            let screen =
                SelectionScreen::enter(&ctx.service, ctx.limits(), &student_id, None).await?;
            if !flags.quiet {
                eprintln!("draft discarded; showing the persisted selection");
            }
            print_screen(&screen, flags)
        }
    }
}

fn print_screen(screen: &SelectionScreen, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rows: Vec<SelectionRow> = screen
        .rows()
        .into_iter()
        .map(|(subject, selected)| SelectionRow {
            seats: format!("{}/{}", subject.enrolled, subject.capacity),
            id: subject.id,
            name: subject.name,
            credits: subject.credits,
            professor_id: subject.professor_id,
            schedule: subject.schedule,
            selected,
        })
        .collect();

    output::output(&rows, flags.format)?;
    if !flags.quiet {
        eprintln!("{}", screen.summary());
    }
    Ok(())
}
