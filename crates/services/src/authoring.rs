use std::sync::Arc;

use gaps_core::model::{Question, QuestionDraft, QuestionId};

use crate::api::QuizBackend;
use crate::error::AuthoringError;

/// Option inputs shown by the authoring form.
pub const AUTHOR_OPTION_SLOTS: usize = 4;

/// Local working copy of the question bank while a teacher edits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
    next_id: u64,
    editing: Option<QuestionId>,
}

impl Default for QuestionSet {
    fn default() -> Self {
        Self::from_questions(Vec::new())
    }
}

impl QuestionSet {
    /// Start from the questions already on the server.
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let next_id = questions
            .iter()
            .map(|q| q.id().value())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self {
            questions,
            next_id,
            editing: None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Id of the question currently loaded into the form, if any.
    #[must_use]
    pub fn editing(&self) -> Option<QuestionId> {
        self.editing
    }

    /// Validate `draft` and append it. A question pulled out by `edit` keeps
    /// its id.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Question` if the draft is incomplete; the set
    /// is unchanged.
    pub fn add(&mut self, draft: QuestionDraft) -> Result<&Question, AuthoringError> {
        let id = self.editing.unwrap_or(QuestionId::new(self.next_id));
        let question = draft.validate(id)?;
        if self.editing.take().is_none() {
            self.next_id = self.next_id.saturating_add(1);
        }
        self.questions.push(question);
        Ok(&self.questions[self.questions.len() - 1])
    }

    /// Remove a question and hand it back as a draft for the form.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` for an unknown id.
    pub fn edit(&mut self, id: QuestionId) -> Result<QuestionDraft, AuthoringError> {
        let question = self.take(id)?;
        self.editing = Some(id);
        Ok(QuestionDraft::from_question(&question))
    }

    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` for an unknown id.
    pub fn delete(&mut self, id: QuestionId) -> Result<Question, AuthoringError> {
        self.take(id)
    }

    /// Blank form. Abandons an edit in progress; the question stays removed.
    pub fn clear_form(&mut self) -> QuestionDraft {
        self.editing = None;
        QuestionDraft::blank(AUTHOR_OPTION_SLOTS)
    }

    fn take(&mut self, id: QuestionId) -> Result<Question, AuthoringError> {
        let index = self
            .questions
            .iter()
            .position(|q| q.id() == id)
            .ok_or(AuthoringError::NotFound(id))?;
        Ok(self.questions.remove(index))
    }
}

/// Loads and saves the question bank.
#[derive(Clone)]
pub struct AuthoringService {
    backend: Arc<dyn QuizBackend>,
}

impl AuthoringService {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>) -> Self {
        Self { backend }
    }

    /// # Errors
    ///
    /// Returns `AuthoringError::Api` if the questions cannot be fetched.
    pub async fn load(&self) -> Result<QuestionSet, AuthoringError> {
        let questions = self.backend.fetch_questions().await.map_err(|err| {
            tracing::error!(error = %err, "failed to load question bank");
            err
        })?;
        Ok(QuestionSet::from_questions(questions))
    }

    /// Replace the bank with `set`.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::EmptyQuestionList` without calling the
    /// backend, or `Api` if the save fails.
    pub async fn save(&self, set: &QuestionSet) -> Result<usize, AuthoringError> {
        if set.is_empty() {
            return Err(AuthoringError::EmptyQuestionList);
        }
        self.backend
            .save_questions(set.questions())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to save question bank");
                err
            })?;
        tracing::info!(count = set.len(), "question bank saved");
        Ok(set.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryBackend;
    use gaps_core::model::QuestionError;

    fn draft(text: &str) -> QuestionDraft {
        QuestionDraft {
            text: text.into(),
            concept: "Fractions".into(),
            options: vec!["1/2".into(), "1/3".into(), "2/3".into(), "3/4".into()],
            correct_answer: Some(0),
        }
    }

    fn existing() -> Vec<Question> {
        vec![
            draft("first").validate(QuestionId::new(3)).unwrap(),
            draft("second").validate(QuestionId::new(7)).unwrap(),
        ]
    }

    #[test]
    fn next_id_follows_the_highest() {
        let mut set = QuestionSet::from_questions(existing());
        let added = set.add(draft("third")).unwrap();
        assert_eq!(added.id(), QuestionId::new(8));

        let mut empty = QuestionSet::default();
        assert_eq!(empty.add(draft("only")).unwrap().id(), QuestionId::new(1));
    }

    #[test]
    fn edit_removes_and_readd_keeps_id() {
        let mut set = QuestionSet::from_questions(existing());
        let mut form = set.edit(QuestionId::new(3)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(form.text, "first");

        form.text = "first, revised".into();
        let readded = set.add(form).unwrap();
        assert_eq!(readded.id(), QuestionId::new(3));
        assert_eq!(set.editing(), None);
        assert_eq!(set.add(draft("new")).unwrap().id(), QuestionId::new(8));
    }

    #[test]
    fn invalid_draft_leaves_set_unchanged() {
        let mut set = QuestionSet::from_questions(existing());
        let mut bad = draft("bad");
        bad.options[1] = String::new();
        assert!(matches!(
            set.add(bad),
            Err(AuthoringError::Question(QuestionError::EmptyOption { index: 1 }))
        ));
        assert_eq!(set.len(), 2);
        assert_eq!(set.add(draft("good")).unwrap().id(), QuestionId::new(8));
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let mut set = QuestionSet::from_questions(existing());
        assert!(set.delete(QuestionId::new(3)).is_ok());
        assert!(matches!(
            set.delete(QuestionId::new(3)),
            Err(AuthoringError::NotFound(_))
        ));
    }

    #[test]
    fn clear_form_has_four_blank_options() {
        let mut set = QuestionSet::default();
        let form = set.clear_form();
        assert_eq!(form.options.len(), AUTHOR_OPTION_SLOTS);
        assert!(form.correct_answer.is_none());
    }

    #[tokio::test]
    async fn saving_an_empty_set_is_rejected() {
        let backend = InMemoryBackend::new();
        let service = AuthoringService::new(Arc::new(backend.clone()));
        let err = service.save(&QuestionSet::default()).await.unwrap_err();
        assert!(matches!(err, AuthoringError::EmptyQuestionList));
        assert!(backend.saved_question_sets().is_empty());
    }

    #[tokio::test]
    async fn load_then_save_round_trips_through_backend() {
        let backend = InMemoryBackend::new().with_questions(existing());
        let service = AuthoringService::new(Arc::new(backend.clone()));
        let mut set = service.load().await.unwrap();
        set.add(draft("third")).unwrap();

        assert_eq!(service.save(&set).await.unwrap(), 3);
        let saved = backend.saved_question_sets();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].len(), 3);
    }
}
