use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::domain::Role;
use super::report_id::{generate_report_id, is_valid_report_id};
use super::responses::{Completeness, RawResponses, ResponseError, ResponseSet};
use super::result::{CombinedResult, QuestionnaireResult};
use super::store::{
    self, QuestionnaireProgress, ReportIndexEntry, ResultStore, StoreError, StoreKey,
};

/// Attempts at drawing an unused report id before giving up.
pub const REPORT_ID_ATTEMPTS: usize = 5;

/// Outcome of completing a questionnaire.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub result: QuestionnaireResult,
    /// Present once both the student and the parent have completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined: Option<CombinedResult>,
}

/// Result addressed by a report id, with the combined report it heads if any.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLookup {
    pub entry: ReportIndexEntry,
    pub result: QuestionnaireResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined: Option<CombinedResult>,
}

/// Service composing validation, the scoring pipeline and the result store.
pub struct AssessmentService<S> {
    store: Arc<S>,
    generate_id: fn() -> String,
}

impl<S> AssessmentService<S>
where
    S: ResultStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_id_generator(store, generate_report_id)
    }

    pub(crate) fn with_id_generator(store: Arc<S>, generate_id: fn() -> String) -> Self {
        Self { store, generate_id }
    }

    /// Persist partially answered questionnaire state.
    pub fn save_progress(
        &self,
        role: Role,
        user_id: &str,
        current_question: usize,
        raw: &RawResponses,
    ) -> Result<QuestionnaireProgress, AssessmentServiceError> {
        let user_id = require_user_id(user_id)?;
        let responses = ResponseSet::validate(raw, role, Completeness::Partial)?;

        let progress = QuestionnaireProgress {
            user_id: user_id.to_string(),
            role,
            current_question,
            responses,
            updated_at: Utc::now(),
        };
        store::write(&*self.store, &StoreKey::progress(role, user_id), &progress)?;
        Ok(progress)
    }

    pub fn load_progress(
        &self,
        role: Role,
        user_id: &str,
    ) -> Result<Option<QuestionnaireProgress>, AssessmentServiceError> {
        let user_id = require_user_id(user_id)?;
        Ok(store::read(&*self.store, &StoreKey::progress(role, user_id))?)
    }

    /// Score a fully answered questionnaire, store the result and clear progress.
    ///
    /// When the other role has already completed, the combined report is
    /// rebuilt under the student's report id.
    pub fn complete(
        &self,
        role: Role,
        user_id: &str,
        raw: &RawResponses,
    ) -> Result<Completion, AssessmentServiceError> {
        let user_id = require_user_id(user_id)?;
        let responses = ResponseSet::validate(raw, role, Completeness::Complete)?;

        let report_id = self.allocate_report_id()?;
        let now = Utc::now();
        let result =
            QuestionnaireResult::assemble(report_id, user_id.to_string(), role, responses, now);

        store::write(&*self.store, &StoreKey::result(role, user_id), &result)?;
        let entry = ReportIndexEntry {
            report_id: result.report_id.clone(),
            user_id: user_id.to_string(),
            role,
            created_at: now,
        };
        store::write(&*self.store, &StoreKey::report(&entry.report_id), &entry)?;
        self.append_to_history(entry)?;
        self.store.delete(&StoreKey::progress(role, user_id))?;

        tracing::info!(
            report_id = %result.report_id,
            role = %role,
            motivation_type = %result.motivation_type.id,
            "questionnaire completed"
        );

        let combined = self.combine_if_ready(role, user_id, &result)?;

        Ok(Completion { result, combined })
    }

    pub fn result(
        &self,
        role: Role,
        user_id: &str,
    ) -> Result<Option<QuestionnaireResult>, AssessmentServiceError> {
        let user_id = require_user_id(user_id)?;
        Ok(store::read(&*self.store, &StoreKey::result(role, user_id))?)
    }

    pub fn combined(
        &self,
        user_id: &str,
    ) -> Result<Option<CombinedResult>, AssessmentServiceError> {
        let user_id = require_user_id(user_id)?;
        Ok(store::read(&*self.store, &StoreKey::combined(user_id))?)
    }

    /// Resolve a report id through the report index.
    pub fn report(
        &self,
        report_id: &str,
    ) -> Result<Option<ReportLookup>, AssessmentServiceError> {
        if !is_valid_report_id(report_id) {
            return Err(AssessmentServiceError::InvalidReportId(
                report_id.to_string(),
            ));
        }

        let Some(entry) =
            store::read::<_, ReportIndexEntry>(&*self.store, &StoreKey::report(report_id))?
        else {
            return Ok(None);
        };

        // A retake replaces the stored result, leaving the old id dangling.
        let result = match store::read::<_, QuestionnaireResult>(
            &*self.store,
            &StoreKey::result(entry.role, &entry.user_id),
        )? {
            Some(result) if result.report_id == report_id => result,
            _ => return Ok(None),
        };

        let combined = store::read::<_, CombinedResult>(
            &*self.store,
            &StoreKey::combined(&entry.user_id),
        )?
        .filter(|combined| combined.report_id == report_id);

        Ok(Some(ReportLookup {
            entry,
            result,
            combined,
        }))
    }

    /// Every issued report id, newest first.
    ///
    /// Ids superseded by a retake stay listed; resolving them through
    /// [`Self::report`] yields `None`.
    pub fn reports(&self) -> Result<Vec<ReportIndexEntry>, AssessmentServiceError> {
        let mut entries = self.history()?;
        // Equal timestamps keep reverse issue order.
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    fn history(&self) -> Result<Vec<ReportIndexEntry>, AssessmentServiceError> {
        Ok(store::read(&*self.store, &StoreKey::report_index())?.unwrap_or_default())
    }

    fn append_to_history(&self, entry: ReportIndexEntry) -> Result<(), AssessmentServiceError> {
        let mut entries = self.history()?;
        entries.push(entry);
        store::write(&*self.store, &StoreKey::report_index(), &entries)?;
        Ok(())
    }

    fn allocate_report_id(&self) -> Result<String, AssessmentServiceError> {
        for _ in 0..REPORT_ID_ATTEMPTS {
            let candidate = (self.generate_id)();
            if self.store.get(&StoreKey::report(&candidate))?.is_none() {
                return Ok(candidate);
            }
            tracing::warn!(report_id = %candidate, "report id collision, regenerating");
        }
        Err(AssessmentServiceError::ReportIdExhausted(REPORT_ID_ATTEMPTS))
    }

    fn combine_if_ready(
        &self,
        role: Role,
        user_id: &str,
        latest: &QuestionnaireResult,
    ) -> Result<Option<CombinedResult>, AssessmentServiceError> {
        let other_role = match role {
            Role::Student => Role::Parent,
            Role::Parent => Role::Student,
        };
        let Some(other) = store::read::<_, QuestionnaireResult>(
            &*self.store,
            &StoreKey::result(other_role, user_id),
        )?
        else {
            return Ok(None);
        };

        let (student, parent) = match role {
            Role::Student => (latest.clone(), other),
            Role::Parent => (other, latest.clone()),
        };
        let combined = CombinedResult::new(student, parent, Utc::now());
        store::write(&*self.store, &StoreKey::combined(user_id), &combined)?;

        tracing::info!(
            report_id = %combined.report_id,
            consistency = combined.comparison.consistency.label(),
            "combined report created"
        );

        Ok(Some(combined))
    }
}

fn require_user_id(user_id: &str) -> Result<&str, AssessmentServiceError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        Err(AssessmentServiceError::BlankUserId)
    } else {
        Ok(trimmed)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Responses(#[from] ResponseError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("user id must not be blank")]
    BlankUserId,
    #[error("'{0}' is not a valid report id")]
    InvalidReportId(String),
    #[error("no unused report id after {0} attempts")]
    ReportIdExhausted(usize),
}
