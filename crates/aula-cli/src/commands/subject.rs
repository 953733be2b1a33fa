//! `aula subject` handlers.

use aula_core::entities::CreateSubjectRequest;
use aula_core::enums::EntityType;
use aula_core::errors::CoreError;
use aula_db::updates::subject::SubjectUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SubjectCommands;
use crate::context::AppContext;
use crate::output;

pub async fn handle(
    action: &SubjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SubjectCommands::List {
            active,
            available,
            professor,
            search,
        } => {
            let subjects = if *available {
                ctx.service.list_available_subjects().await?
            } else if *active {
                ctx.service.list_active_subjects().await?
            } else if let Some(professor_id) = professor {
                ctx.service.list_subjects_by_professor(professor_id).await?
            } else if let Some(term) = search {
                ctx.service.search_subjects(term).await?
            } else {
                ctx.service.list_subjects().await?
            };
            output::output(&subjects, flags.format)
        }
        SubjectCommands::Get { id } => {
            let subject = ctx
                .service
                .get_subject(id)
                .await?
                .ok_or_else(|| CoreError::not_found(EntityType::Subject, id))?;
            output::output(&subject, flags.format)
        }
        SubjectCommands::Create {
            name,
            professor,
            credits,
            schedule,
            capacity,
            description,
        } => {
            let subject = ctx
                .service
                .create_subject(&CreateSubjectRequest {
                    name: name.clone(),
                    credits: *credits,
                    professor_id: professor.clone(),
                    schedule: schedule.clone(),
                    capacity: *capacity,
                    description: description.clone(),
                    prerequisites: Vec::new(),
                })
                .await?;
            output::output(&subject, flags.format)
        }
        SubjectCommands::Update {
            id,
            name,
            professor,
            schedule,
            capacity,
            description,
        } => {
            let mut builder = SubjectUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(professor_id) = professor {
                builder = builder.professor_id(professor_id);
            }
            if let Some(schedule) = schedule {
                builder = builder.schedule(schedule);
            }
            if let Some(capacity) = capacity {
                builder = builder.capacity(*capacity);
            }
            if let Some(description) = description {
                builder = builder.description(description);
            }

            let subject = ctx.service.update_subject(id, builder.build()).await?;
            output::output(&subject, flags.format)
        }
        SubjectCommands::Deactivate { id } => {
            let subject = ctx.service.deactivate_subject(id).await?;
            if !flags.quiet {
                eprintln!("deactivated subject {id}; existing enrollments kept");
            }
            output::output(&subject, flags.format)
        }
        SubjectCommands::Delete { id } => {
            ctx.service.delete_subject(id).await?;
            if !flags.quiet {
                eprintln!("deleted subject {id}");
            }
            Ok(())
        }
    }
}
