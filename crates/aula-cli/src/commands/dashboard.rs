//! `aula dashboard` handler.

use serde::Serialize;

use aula_core::limits::EnrollmentLimits;
use aula_core::rules::{Selection, SelectionSummary};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output;

#[derive(Serialize)]
struct Dashboard {
    students: usize,
    professors: usize,
    subjects: usize,
    active_subjects: usize,
    available_subjects: usize,
    enrollments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    my_selection: Option<SelectionSummary>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let students = ctx.service.list_students().await?;
    let professors = ctx.service.list_professors().await?;
    let subjects = ctx.service.list_subjects().await?;
    let enrollments = ctx.service.list_enrollments().await?;

    let active = subjects.iter().filter(|s| s.is_active).count();
    let available = subjects
        .iter()
        .filter(|s| s.is_active && s.has_capacity())
        .count();

    // The enrollment summary when logged in; the dashboard works without it.
    let my_selection = match ctx.sessions.load()? {
        Some(session) => students
            .iter()
            .find(|s| s.id == session.student_id)
            .map(|student| {
                let selection: Selection = student.subjects.iter().cloned().collect();
                SelectionSummary::compute(
                    EnrollmentLimits::for_student(student),
                    &student.subjects,
                    &selection,
                    &subjects,
                )
            }),
        None => None,
    };

    let dashboard = Dashboard {
        students: students.len(),
        professors: professors.len(),
        subjects: subjects.len(),
        active_subjects: active,
        available_subjects: available,
        enrollments: enrollments.len(),
        my_selection,
    };
    output::output(&dashboard, flags.format)
}
