//! `aula professor` handlers.

use aula_core::entities::CreateProfessorRequest;
use aula_core::enums::EntityType;
use aula_core::errors::CoreError;
use aula_db::updates::professor::ProfessorUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProfessorCommands;
use crate::context::AppContext;
use crate::output;

pub async fn handle(
    action: &ProfessorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProfessorCommands::List => {
            let professors = ctx.service.list_professors().await?;
            output::output(&professors, flags.format)
        }
        ProfessorCommands::Get { id } => {
            let professor = ctx
                .service
                .get_professor(id)
                .await?
                .ok_or_else(|| CoreError::not_found(EntityType::Professor, id))?;
            output::output(&professor, flags.format)
        }
        ProfessorCommands::Create {
            name,
            email,
            max_subjects,
        } => {
            let professor = ctx
                .service
                .create_professor(&CreateProfessorRequest {
                    name: name.clone(),
                    email: email.clone(),
                    max_subjects: *max_subjects,
                })
                .await?;
            output::output(&professor, flags.format)
        }
        ProfessorCommands::Update {
            id,
            name,
            email,
            max_subjects,
            active,
        } => {
            let mut builder = ProfessorUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(email) = email {
                builder = builder.email(email);
            }
            if let Some(max_subjects) = max_subjects {
                builder = builder.max_subjects(*max_subjects);
            }
            if let Some(active) = active {
                builder = builder.is_active(*active);
            }

            let professor = ctx.service.update_professor(id, builder.build()).await?;
            output::output(&professor, flags.format)
        }
        ProfessorCommands::Delete { id } => {
            ctx.service.delete_professor(id).await?;
            if !flags.quiet {
                eprintln!("deleted professor {id}");
            }
            Ok(())
        }
    }
}
