//! `aula student` handlers.

use aula_core::enums::{EntityType, Semester};
use aula_core::errors::CoreError;
use aula_db::updates::student::StudentUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudentCommands;
use crate::context::AppContext;
use crate::output;

pub async fn handle(
    action: &StudentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        StudentCommands::List {
            subject,
            professor,
            search,
        } => {
            let students = match (subject, professor, search) {
                (Some(subject_id), _, _) => {
                    ctx.service.list_students_by_subject(subject_id).await?
                }
                (None, Some(professor_id), _) => {
                    ctx.service.list_students_by_professor(professor_id).await?
                }
                (None, None, Some(term)) => ctx.service.search_students(term).await?,
                (None, None, None) => ctx.service.list_students().await?,
            };
            output::output(&students, flags.format)
        }
        StudentCommands::Get { id } => {
            let student = ctx
                .service
                .get_student(id)
                .await?
                .ok_or_else(|| CoreError::not_found(EntityType::Student, id))?;
            output::output(&student, flags.format)
        }
        StudentCommands::Update {
            id,
            name,
            email,
            phone,
            semester,
            gpa,
        } => {
            let mut builder = StudentUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(email) = email {
                builder = builder.email(email);
            }
            if let Some(phone) = phone {
                builder = builder.phone(phone);
            }
            if let Some(semester) = semester {
                let semester = Semester::try_from(*semester)
                    .map_err(|message| anyhow::anyhow!("invalid --semester: {message}"))?;
                builder = builder.semester(semester);
            }
            if let Some(gpa) = gpa {
                builder = builder.gpa(*gpa);
            }

            let student = ctx.service.update_student(id, builder.build()).await?;
            output::output(&student, flags.format)
        }
        StudentCommands::Delete { id } => {
            ctx.service.delete_student(id).await?;
            if !flags.quiet {
                eprintln!("deleted student {id}");
            }
            Ok(())
        }
    }
}
