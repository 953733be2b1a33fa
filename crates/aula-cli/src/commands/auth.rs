//! `aula auth` handlers.

use anyhow::bail;
use serde::Serialize;

use aula_core::entities::CreateStudentRequest;
use aula_core::enums::Semester;
use aula_core::errors::CoreError;
use aula_db::error::DatabaseError;
use aula_store::AuthSession;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;
use crate::output;

#[derive(Serialize)]
struct SessionStatus {
    logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Register {
            name,
            email,
            phone,
            semester,
        } => {
            let semester = Semester::try_from(*semester)
                .map_err(|message| anyhow::anyhow!("invalid --semester: {message}"))?;
            let req = CreateStudentRequest {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                semester,
            };
            req.validate()?;

            // The gateway only sees the UNIQUE constraint; to the user a
            // duplicate email is bad form input.
            let student = match ctx.service.create_student(&req).await {
                Ok(student) => student,
                Err(DatabaseError::Conflict(message)) => {
                    return Err(CoreError::Validation(message).into());
                }
                Err(other) => return Err(anyhow::Error::new(other).context("registration failed")),
            };

            ctx.sessions.save(&AuthSession::new(&student.id))?;
            if !flags.quiet {
                eprintln!("registered and logged in as {}", student.id);
            }
            output::output(&student, flags.format)
        }
        AuthCommands::Login { email } => {
            let students = ctx.service.list_students().await?;
            let Some(student) = students
                .into_iter()
                .find(|s| s.email.eq_ignore_ascii_case(email))
            else {
                bail!("no student registered with email '{email}'");
            };

            ctx.sessions.save(&AuthSession::new(&student.id))?;
            if !flags.quiet {
                eprintln!("logged in as {}", student.id);
            }
            output::output(&student, flags.format)
        }
        AuthCommands::Logout => {
            ctx.sessions.clear()?;
            if !flags.quiet {
                eprintln!("logged out");
            }
            Ok(())
        }
        AuthCommands::Status => {
            let status = match ctx.sessions.load()? {
                Some(session) => {
                    // The id may be dangling if the student was deleted.
                    let student = ctx.service.get_student(&session.student_id).await?;
                    SessionStatus {
                        logged_in: true,
                        student_id: Some(session.student_id),
                        name: student.as_ref().map(|s| s.name.clone()),
                        email: student.map(|s| s.email),
                    }
                }
                None => SessionStatus {
                    logged_in: false,
                    student_id: None,
                    name: None,
                    email: None,
                },
            };
            output::output(&status, flags.format)
        }
    }
}
