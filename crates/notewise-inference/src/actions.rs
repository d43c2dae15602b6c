//! Note-level AI actions: authenticate, load, generate, persist.

use tracing::{debug, info, instrument};
use uuid::Uuid;

use notewise_core::{
    AiErrorInfo, AiStatusTracker, Error, GenerationBackend, Note, NoteRepository, Principal,
    ProcessType, Result,
};

use crate::processor::{record_failure, AiProcessor};

/// AI actions a signed-in user runs against one of their notes.
pub struct NoteActions<B, R> {
    processor: AiProcessor<B>,
    repository: R,
}

impl<B: GenerationBackend, R: NoteRepository> NoteActions<B, R> {
    pub fn new(processor: AiProcessor<B>, repository: R) -> Self {
        Self {
            processor,
            repository,
        }
    }

    pub fn processor(&self) -> &AiProcessor<B> {
        &self.processor
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Generate and store a summary for `note_id`.
    #[instrument(skip(self, principal, tracker), fields(subsystem = "inference", component = "actions", op = "generate_summary", note_id = %note_id))]
    pub async fn generate_summary(
        &self,
        principal: Option<&Principal>,
        note_id: Uuid,
        tracker: &mut AiStatusTracker,
    ) -> std::result::Result<String, AiErrorInfo> {
        tracker.set_loading(ProcessType::Summary, None);
        match self.summary_flow(principal, note_id).await {
            Ok(summary) => {
                tracker.set_success(ProcessType::Summary, None);
                Ok(summary)
            }
            Err(err) => Err(record_failure(tracker, ProcessType::Summary, &err)),
        }
    }

    /// Generate and store tags for `note_id`.
    #[instrument(skip(self, principal, tracker), fields(subsystem = "inference", component = "actions", op = "generate_tags", note_id = %note_id))]
    pub async fn generate_tags(
        &self,
        principal: Option<&Principal>,
        note_id: Uuid,
        tracker: &mut AiStatusTracker,
    ) -> std::result::Result<Vec<String>, AiErrorInfo> {
        tracker.set_loading(ProcessType::Tags, None);
        match self.tags_flow(principal, note_id).await {
            Ok(tags) => {
                tracker.set_success(ProcessType::Tags, None);
                Ok(tags)
            }
            Err(err) => Err(record_failure(tracker, ProcessType::Tags, &err)),
        }
    }

    async fn summary_flow(&self, principal: Option<&Principal>, note_id: Uuid) -> Result<String> {
        let note = self.authorized_note(principal, note_id).await?;
        let summary = self
            .processor
            .summarize_inner(&note.title, &note.content)
            .await?;
        self.repository
            .update_summary(note.id, &summary)
            .await
            .map_err(into_database_error)?;
        info!(note_id = %note.id, "Summary stored");
        Ok(summary)
    }

    async fn tags_flow(&self, principal: Option<&Principal>, note_id: Uuid) -> Result<Vec<String>> {
        let note = self.authorized_note(principal, note_id).await?;
        let tags = self.processor.tag_inner(&note.title, &note.content).await?;
        self.repository
            .set_tags(note.id, &tags)
            .await
            .map_err(into_database_error)?;
        info!(note_id = %note.id, tag_count = tags.len(), "Tags stored");
        Ok(tags)
    }

    async fn authorized_note(&self, principal: Option<&Principal>, note_id: Uuid) -> Result<Note> {
        let principal = principal
            .ok_or_else(|| Error::Unauthorized("Sign-in required for AI actions".to_string()))?;

        let note = match self.repository.fetch(note_id).await {
            Ok(note) => note,
            Err(err @ (Error::NoteNotFound(_) | Error::NotFound(_))) => return Err(err),
            Err(err) => return Err(into_database_error(err)),
        };

        debug!(user_id = %principal.user_id, note_id = %note_id, "Checking note ownership");
        if !note.is_owned_by(principal) {
            return Err(Error::Forbidden(format!(
                "User {} does not own note {}",
                principal.user_id, note_id
            )));
        }
        Ok(note)
    }
}

/// Storage failures surface as database errors whatever the repository's
/// own variant was.
fn into_database_error(err: Error) -> Error {
    match err {
        Error::Database(_) => err,
        other => Error::Database(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::mock::MockGenerationBackend;
    use async_trait::async_trait;
    use notewise_core::{AiErrorKind, AiStatus};
    use std::collections::HashMap;
    use std::sync::Mutex;

    const CONTENT: &str = "주말 부산 여행 계획: 해운대 숙소 예약, 기차표 구매, 맛집 목록 정리.";

    #[derive(Default)]
    struct InMemoryNotes {
        notes: Mutex<HashMap<Uuid, Note>>,
        fail_writes: bool,
    }

    impl InMemoryNotes {
        fn with_note(note: Note) -> Self {
            let repo = Self::default();
            repo.notes.lock().unwrap().insert(note.id, note);
            repo
        }

        fn get(&self, id: Uuid) -> Note {
            self.notes.lock().unwrap()[&id].clone()
        }
    }

    #[async_trait]
    impl NoteRepository for InMemoryNotes {
        async fn fetch(&self, id: Uuid) -> Result<Note> {
            self.notes
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(Error::NoteNotFound(id))
        }

        async fn update_summary(&self, id: Uuid, summary: &str) -> Result<()> {
            if self.fail_writes {
                return Err(Error::Internal("connection pool closed".into()));
            }
            let mut notes = self.notes.lock().unwrap();
            let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
            note.summary = Some(summary.to_string());
            Ok(())
        }

        async fn set_tags(&self, id: Uuid, tags: &[String]) -> Result<()> {
            if self.fail_writes {
                return Err(Error::Database("deadlock detected".into()));
            }
            let mut notes = self.notes.lock().unwrap();
            let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
            note.tags = tags.to_vec();
            Ok(())
        }
    }

    fn actions(
        backend: MockGenerationBackend,
        repo: InMemoryNotes,
    ) -> NoteActions<MockGenerationBackend, InMemoryNotes> {
        NoteActions::new(AiProcessor::new(backend, ProcessingConfig::default()), repo)
    }

    #[tokio::test]
    async fn test_generate_summary_persists() {
        let owner = Principal::new(Uuid::new_v4());
        let note = Note::new(owner.user_id, "여행", CONTENT);
        let id = note.id;
        let actions = actions(
            MockGenerationBackend::new().with_response("부산 여행 준비 목록."),
            InMemoryNotes::with_note(note),
        );
        let mut tracker = AiStatusTracker::new();

        let summary = actions
            .generate_summary(Some(&owner), id, &mut tracker)
            .await
            .unwrap();

        assert_eq!(summary, "부산 여행 준비 목록.");
        assert_eq!(actions.repository().get(id).summary.as_deref(), Some(summary.as_str()));
        assert_eq!(tracker.status(), AiStatus::Success);
    }

    #[tokio::test]
    async fn test_generate_tags_persists() {
        let owner = Principal::new(Uuid::new_v4());
        let note = Note::new(owner.user_id, "여행", CONTENT);
        let id = note.id;
        let actions = actions(
            MockGenerationBackend::new().with_response(r#"{"tags":["여행","부산"]}"#),
            InMemoryNotes::with_note(note),
        );
        let mut tracker = AiStatusTracker::new();

        let tags = actions
            .generate_tags(Some(&owner), id, &mut tracker)
            .await
            .unwrap();

        assert_eq!(tags, vec!["여행", "부산"]);
        assert_eq!(actions.repository().get(id).tags, tags);
        assert_eq!(tracker.state().message, "태그 생성 완료");
    }

    #[tokio::test]
    async fn test_missing_principal_is_authentication() {
        let note = Note::new(Uuid::new_v4(), "t", CONTENT);
        let id = note.id;
        let backend = MockGenerationBackend::new();
        let actions = actions(backend.clone(), InMemoryNotes::with_note(note));
        let mut tracker = AiStatusTracker::new();

        let info = actions.generate_summary(None, id, &mut tracker).await.unwrap_err();

        assert_eq!(info.kind, AiErrorKind::Authentication);
        assert!(!info.retryable);
        assert_eq!(tracker.status(), AiStatus::Error);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_note_is_authorization() {
        let note = Note::new(Uuid::new_v4(), "t", CONTENT);
        let id = note.id;
        let stranger = Principal::new(Uuid::new_v4());
        let actions = actions(MockGenerationBackend::new(), InMemoryNotes::with_note(note));
        let mut tracker = AiStatusTracker::new();

        let info = actions
            .generate_tags(Some(&stranger), id, &mut tracker)
            .await
            .unwrap_err();

        assert_eq!(info.kind, AiErrorKind::Authorization);
        assert_eq!(tracker.state().process_type, Some(ProcessType::Tags));
    }

    #[tokio::test]
    async fn test_unknown_note_is_validation() {
        let owner = Principal::new(Uuid::new_v4());
        let actions = actions(MockGenerationBackend::new(), InMemoryNotes::default());
        let mut tracker = AiStatusTracker::new();

        let info = actions
            .generate_summary(Some(&owner), Uuid::new_v4(), &mut tracker)
            .await
            .unwrap_err();

        assert_eq!(info.kind, AiErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_storage_failure_is_database() {
        let owner = Principal::new(Uuid::new_v4());
        let note = Note::new(owner.user_id, "t", CONTENT);
        let id = note.id;
        let repo = InMemoryNotes {
            fail_writes: true,
            ..InMemoryNotes::with_note(note)
        };
        let actions = actions(MockGenerationBackend::new().with_response("요약"), repo);
        let mut tracker = AiStatusTracker::new();

        let info = actions
            .generate_summary(Some(&owner), id, &mut tracker)
            .await
            .unwrap_err();

        assert_eq!(info.kind, AiErrorKind::Database);
        assert!(info.message.contains("connection pool closed"));
        assert!(actions.repository().get(id).summary.is_none());
    }
}
