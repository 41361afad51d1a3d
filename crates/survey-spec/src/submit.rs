use crate::error::SurveyError;
use crate::intake::parse_submission;
use crate::progress::SurveyProgress;
use crate::record::{ResponseRecord, StoredMeta};
use crate::store::ResponseStore;
use crate::validate::{required_fields_for, validate};

/// Hands finished answer sets to the store and reads stored responses back.
#[derive(Debug)]
pub struct SubmissionClient<S> {
    store: S,
}

impl<S: ResponseStore> SubmissionClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Gate, serialize, check on the receiving side, persist, then mark the wizard submitted.
    ///
    /// On any failure the wizard state is left untouched so the respondent can fix and retry.
    pub fn submit(&mut self, progress: &mut SurveyProgress) -> Result<StoredMeta, SurveyError> {
        let section = progress.current_section();
        if !section.is_final() {
            return Err(SurveyError::NotSubmittable(section));
        }
        if progress.is_submitted() {
            return Err(SurveyError::malformed("Survey already submitted"));
        }

        let required = required_fields_for(progress);
        validate(progress.answers(), &required)?;

        let body = serde_json::to_string(progress.answers())
            .map_err(|err| SurveyError::malformed(err.to_string()))?;
        let document = parse_submission(&body)?;
        let meta = self
            .store
            .insert(&document)
            .map_err(SurveyError::Persistence)?;
        tracing::info!(id = %meta.id, section = %section, "survey response stored");

        progress.advance();
        Ok(meta)
    }

    /// Full, unpaginated list of stored responses.
    pub fn fetch(&self) -> Result<Vec<ResponseRecord>, SurveyError> {
        self.store.fetch_all().map_err(|err| {
            tracing::warn!(error = %err, "failed to fetch stored responses");
            SurveyError::Fetch(err)
        })
    }
}
