//! Selection screen controller.
//!
//! State machine: entering the screen loads the active catalog and the
//! student's persisted selection (Loading -> Ready). Toggles mutate only the
//! draft after rule evaluation; a rejection leaves the draft untouched. Save
//! re-validates against authoritative data and persists the whole diff in one
//! gateway transaction; the screen stays usable after a rejection or failure.

use anyhow::Context;

use aula_core::entities::{Student, Subject};
use aula_core::limits::EnrollmentLimits;
use aula_core::rules::{
    self, AddOutcome, Rejection, Selection, SelectionSummary,
};
use aula_db::service::AulaService;
use aula_store::{ActionFsm, EntityStore, LoadState};

/// What a toggle did to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Added,
    Removed,
}

/// Outcome of a save attempt that reached the gateway decision point.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved(Student),
    /// A rule rejected the selection against fresh data. The draft and the
    /// screen survive; the caller reports the reason code.
    Rejected(Rejection),
}

pub struct SelectionScreen {
    limits: EnrollmentLimits,
    store: EntityStore,
    save_action: ActionFsm,
    student_id: String,
    persisted: Vec<String>,
    draft: Selection,
}

impl SelectionScreen {
    /// Enter the screen: load the active catalog and the student's persisted
    /// selection. The draft starts from `draft` when given (a previous
    /// session's unsaved work), otherwise from the persisted selection.
    pub async fn enter(
        service: &AulaService,
        limits: EnrollmentLimits,
        student_id: &str,
        draft: Option<Selection>,
    ) -> anyhow::Result<Self> {
        let mut store = EntityStore::new();
        store.set_subjects_load(LoadState::Loading);

        let student = service
            .get_student(student_id)
            .await?
            .with_context(|| format!("no student with id '{student_id}'"))?;

        match service.list_active_subjects().await {
            Ok(subjects) => {
                for subject in subjects {
                    store.apply_confirmed_subject(subject);
                }
                store.set_subjects_load(LoadState::Ready);
            }
            Err(error) => {
                store.set_subjects_load(LoadState::Failed(error.to_string()));
                return Err(error).context("failed to load the subject catalog");
            }
        }

        let persisted = student.subjects.clone();
        let draft = draft.unwrap_or_else(|| persisted.iter().cloned().collect());

        Ok(Self {
            limits,
            store,
            save_action: ActionFsm::new("save-selection"),
            student_id: student.id,
            persisted,
            draft,
        })
    }

    #[must_use]
    pub const fn draft(&self) -> &Selection {
        &self.draft
    }

    #[must_use]
    pub fn persisted(&self) -> &[String] {
        &self.persisted
    }

    fn catalog(&self) -> Vec<Subject> {
        self.store.subjects().into_iter().cloned().collect()
    }

    /// The catalog with each subject's draft membership.
    #[must_use]
    pub fn rows(&self) -> Vec<(Subject, bool)> {
        self.catalog()
            .into_iter()
            .map(|subject| {
                let selected = self.draft.contains(&subject.id);
                (subject, selected)
            })
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary::compute(self.limits, &self.persisted, &self.draft, &self.catalog())
    }

    /// Toggle a subject in the draft. Removing is always accepted; adding
    /// runs the full rule chain. A rejection leaves the draft unchanged.
    ///
    /// The outer error is an unknown subject id; the inner `Err` is a rule
    /// rejection the caller reports by code.
    pub fn toggle(
        &mut self,
        subject_id: &str,
    ) -> anyhow::Result<Result<ToggleAction, Rejection>> {
        if self.draft.contains(subject_id) {
            self.draft = rules::evaluate_remove(&self.draft, subject_id);
            return Ok(Ok(ToggleAction::Removed));
        }

        let catalog = self.catalog();
        let Some(candidate) = catalog.iter().find(|s| s.id == subject_id) else {
            anyhow::bail!("no active subject with id '{subject_id}'");
        };

        match rules::evaluate_add(self.limits, candidate, &self.draft, &catalog) {
            Ok(AddOutcome::Added(next)) => {
                self.draft = next;
                Ok(Ok(ToggleAction::Added))
            }
            Ok(AddOutcome::AlreadySelected) => Ok(Ok(ToggleAction::Added)),
            Err(rejection) => Ok(Err(rejection)),
        }
    }

    /// Save the draft: re-fetch the authoritative student and fresh subjects,
    /// re-run the rule chain over every addition, then persist the diff in
    /// one transaction. The gateway is never called for a rejected save.
    pub async fn save(&mut self, service: &AulaService) -> anyhow::Result<SaveOutcome> {
        let guard = self
            .save_action
            .begin()
            .context("a save is already in flight")?;

        let result = self.validate_and_persist(service).await;
        match result {
            Ok(SaveOutcome::Saved(student)) => {
                self.save_action.complete(guard);
                self.persisted = student.subjects.clone();
                Ok(SaveOutcome::Saved(student))
            }
            Ok(SaveOutcome::Rejected(rejection)) => {
                // Rule rejection is a completed evaluation, not a failure of
                // the action machinery; the screen stays Ready.
                self.save_action.complete(guard);
                Ok(SaveOutcome::Rejected(rejection))
            }
            Err(error) => {
                self.save_action.fail(guard, error.to_string());
                Err(error)
            }
        }
    }

    async fn validate_and_persist(
        &mut self,
        service: &AulaService,
    ) -> anyhow::Result<SaveOutcome> {
        // Authoritative state, not the store's copy.
        let student = service
            .get_student(&self.student_id)
            .await?
            .with_context(|| format!("no student with id '{}'", self.student_id))?;
        let fresh_subjects = service.list_subjects().await?;

        // Replay every addition through the rule chain against fresh data.
        // Already-persisted picks form the base: the student holds those
        // seats, so they are not re-checked for capacity.
        let persisted_now: Selection = student.subjects.iter().cloned().collect();
        let mut accepted: Selection = self
            .draft
            .intersection(&persisted_now)
            .cloned()
            .collect();
        let limits = EnrollmentLimits::for_student(&student);

        for subject_id in self.draft.difference(&persisted_now) {
            let Some(candidate) = fresh_subjects.iter().find(|s| s.id == *subject_id) else {
                anyhow::bail!("subject '{subject_id}' no longer exists; refresh the selection");
            };
            match rules::evaluate_add(limits, candidate, &accepted, &fresh_subjects) {
                Ok(outcome) => accepted = outcome.into_selection(&accepted),
                Err(rejection) => return Ok(SaveOutcome::Rejected(rejection)),
            }
        }

        let saved = service.save_selection(&student.id, &self.draft).await?;
        Ok(SaveOutcome::Saved(saved))
    }

    /// Apply any pending catalog snapshots from the watch hub. Stale
    /// sequences are discarded by the store.
    pub fn pump_snapshots(
        &mut self,
        subscription: &mut aula_db::watch::Subscription<
            aula_db::watch::CollectionSnapshot<Subject>,
        >,
    ) {
        while let Some(snapshot) = subscription.try_recv() {
            self.store.apply_subjects_snapshot(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::entities::{CreateProfessorRequest, CreateStudentRequest, CreateSubjectRequest};
    use aula_core::enums::Semester;
    use pretty_assertions::assert_eq;

    async fn test_service() -> AulaService {
        AulaService::new_local(":memory:").await.unwrap()
    }

    async fn seed_student(service: &AulaService) -> String {
        service
            .create_student(&CreateStudentRequest {
                name: "Luz".into(),
                email: "luz@aula.edu".into(),
                phone: String::new(),
                semester: Semester::Fifth,
            })
            .await
            .unwrap()
            .id
    }

    /// n subjects spread over ceil(n/2) professors, 3 credits each.
    async fn seed_subjects(service: &AulaService, n: usize) -> Vec<String> {
        let mut ids = Vec::new();
        for chunk in 0..n.div_ceil(2) {
            let professor = service
                .create_professor(&CreateProfessorRequest {
                    name: format!("Prof {chunk}"),
                    email: format!("prof{chunk}@aula.edu"),
                    max_subjects: 2,
                })
                .await
                .unwrap();
            for i in 0..2.min(n - chunk * 2) {
                let subject = service
                    .create_subject(&CreateSubjectRequest {
                        name: format!("Subject {chunk}-{i}"),
                        credits: 3,
                        professor_id: professor.id.clone(),
                        schedule: String::new(),
                        capacity: 30,
                        description: String::new(),
                        prerequisites: Vec::new(),
                    })
                    .await
                    .unwrap();
                ids.push(subject.id);
            }
        }
        ids
    }

    #[tokio::test]
    async fn enter_starts_from_persisted_selection() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        let subjects = seed_subjects(&service, 2).await;
        let persisted: Selection = [subjects[0].clone()].into_iter().collect();
        service.save_selection(&student_id, &persisted).await.unwrap();

        let screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();

        assert_eq!(*screen.draft(), persisted);
        let summary = screen.summary();
        assert_eq!(summary.credits, 3);
        assert!(!summary.unsaved_changes);
    }

    #[tokio::test]
    async fn toggle_add_then_remove_is_identity() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        let subjects = seed_subjects(&service, 1).await;

        let mut screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();

        assert_eq!(screen.toggle(&subjects[0]).unwrap(), Ok(ToggleAction::Added));
        assert!(screen.summary().unsaved_changes);
        assert_eq!(
            screen.toggle(&subjects[0]).unwrap(),
            Ok(ToggleAction::Removed)
        );
        assert!(!screen.summary().unsaved_changes);
    }

    #[tokio::test]
    async fn toggle_rejects_duplicate_professor_and_keeps_draft() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        // Both subjects share one professor.
        let subjects = seed_subjects(&service, 2).await;

        let mut screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();

        screen.toggle(&subjects[0]).unwrap().unwrap();
        let rejection = screen.toggle(&subjects[1]).unwrap().unwrap_err();
        assert!(matches!(rejection, Rejection::DuplicateProfessor { .. }));
        assert_eq!(screen.draft().len(), 1);
    }

    #[tokio::test]
    async fn toggle_unknown_subject_is_an_error_not_a_rejection() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        seed_subjects(&service, 1).await;

        let mut screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();
        assert!(screen.toggle("sub-missing").is_err());
    }

    #[tokio::test]
    async fn save_persists_draft_and_clears_unsaved_flag() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        let subjects = seed_subjects(&service, 3).await;

        let mut screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();

        screen.toggle(&subjects[0]).unwrap().unwrap();
        screen.toggle(&subjects[2]).unwrap().unwrap();

        let outcome = screen.save(&service).await.unwrap();
        let SaveOutcome::Saved(student) = outcome else {
            panic!("save should be accepted");
        };
        assert_eq!(student.credits, 6);
        assert!(!screen.summary().unsaved_changes);

        let persisted = service.persisted_selection(&student_id).await.unwrap();
        assert_eq!(persisted, *screen.draft());
    }

    #[tokio::test]
    async fn save_rejects_against_fresh_data_without_writing() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        let subjects = seed_subjects(&service, 1).await;

        let mut screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();
        screen.toggle(&subjects[0]).unwrap().unwrap();

        // The subject fills up after the toggle but before the save.
        let rival = service
            .create_student(&CreateStudentRequest {
                name: "Rival".into(),
                email: "rival@aula.edu".into(),
                phone: String::new(),
                semester: Semester::First,
            })
            .await
            .unwrap();
        service
            .update_subject(
                &subjects[0],
                aula_db::updates::subject::SubjectUpdateBuilder::new()
                    .capacity(1)
                    .build(),
            )
            .await
            .unwrap();
        let rival_pick: Selection = [subjects[0].clone()].into_iter().collect();
        service.save_selection(&rival.id, &rival_pick).await.unwrap();

        let outcome = screen.save(&service).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Rejected(Rejection::SubjectFull)));
        // Nothing was written for the rejected student.
        let persisted = service.persisted_selection(&student_id).await.unwrap();
        assert!(persisted.is_empty());
        // The screen survives and can save again after a change.
        screen.toggle(&subjects[0]).unwrap().unwrap();
        assert!(screen.draft().is_empty());
    }

    #[tokio::test]
    async fn save_keeps_held_seats_when_subject_is_full() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        let subjects = seed_subjects(&service, 3).await;

        // The student already holds the only seat.
        service
            .update_subject(
                &subjects[0],
                aula_db::updates::subject::SubjectUpdateBuilder::new()
                    .capacity(1)
                    .build(),
            )
            .await
            .unwrap();
        let held: Selection = [subjects[0].clone()].into_iter().collect();
        service.save_selection(&student_id, &held).await.unwrap();

        let mut screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();
        // Adding a second subject must not re-check the held seat's capacity.
        screen.toggle(&subjects[2]).unwrap().unwrap();

        let outcome = screen.save(&service).await.unwrap();
        let SaveOutcome::Saved(student) = outcome else {
            panic!("held seat must not be re-checked for capacity");
        };
        assert_eq!(student.subjects.len(), 2);
    }

    #[tokio::test]
    async fn snapshot_pump_refreshes_catalog_counts() {
        let service = test_service().await;
        let student_id = seed_student(&service).await;
        let subjects = seed_subjects(&service, 1).await;

        let mut screen = SelectionScreen::enter(
            &service,
            EnrollmentLimits::default(),
            &student_id,
            None,
        )
        .await
        .unwrap();
        let mut feed = service.watch().subscribe_subjects();

        screen.toggle(&subjects[0]).unwrap().unwrap();
        screen.save(&service).await.unwrap();
        screen.pump_snapshots(&mut feed);

        let (subject, selected) = screen
            .rows()
            .into_iter()
            .find(|(s, _)| s.id == subjects[0])
            .unwrap();
        assert!(selected);
        assert_eq!(subject.enrolled, 1);
    }
}
