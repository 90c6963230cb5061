//! Wizard session orchestrator
//!
//! One value owns the whole state of a registration in progress: the
//! locale bundle, the navigation cursor, the document ledger and the person
//! registry, plus the injected collaborators (validator, summarizer,
//! store). Every mutation ends in a best-effort snapshot save; a failing
//! save is traced, never surfaced, so the user's in-memory progress is
//! not blocked on the backing store.

use crate::error::SessionError;
use base64::Engine as _;
use padron_ai::{DocumentValidator, ProcedureSummarizer, ProcedureSummary};
use padron_flow::{
    breadcrumb_trail, required_documents, Breadcrumb, DocumentRequirement, FlowCursor, FlowError,
    Step, StepKind, FINAL_REVIEW_STEP,
};
use padron_ledger::{
    ApplyOutcome, DocumentLedger, FileId, NewUpload, PersonRegistry, ValidationStatus,
    ValidationUpdate,
};
use padron_locale::{LocaleBundle, LocaleLoader};
use padron_store::{ProgressStore, SessionSnapshot};

/// Explicit session context, no ambient globals
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Persistence key for this user's progress
    pub user_id: String,
    /// Requested language (falls back to the loader's default)
    pub lang: String,
}

impl SessionConfig {
    /// Config for a user in a language
    #[must_use]
    pub fn new(user_id: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            lang: lang.into(),
        }
    }
}

/// A registration wizard in progress
pub struct WizardSession<V, S, P> {
    config: SessionConfig,
    loader: LocaleLoader,
    bundle: LocaleBundle,
    cursor: FlowCursor,
    ledger: DocumentLedger,
    people: PersonRegistry,
    registration_address: Option<String>,
    selected_procedure: Option<String>,
    validator: V,
    summarizer: S,
    store: P,
}

impl<V, S, P> WizardSession<V, S, P>
where
    V: DocumentValidator,
    S: ProcedureSummarizer,
    P: ProgressStore,
{
    /// Start a session: load the locale bundle, then resume stored progress
    /// if the user has any
    pub async fn start(
        config: SessionConfig,
        loader: LocaleLoader,
        validator: V,
        summarizer: S,
        store: P,
    ) -> Result<Self, SessionError> {
        let bundle = loader.load_or_default(&config.lang)?;
        let cursor = FlowCursor::new(&bundle.flow);
        let mut session = Self {
            config,
            loader,
            bundle,
            cursor,
            ledger: DocumentLedger::new(),
            people: PersonRegistry::new(),
            registration_address: None,
            selected_procedure: None,
            validator,
            summarizer,
            store,
        };

        match session.store.load(&session.config.user_id).await {
            Ok(Some(snapshot)) => session.restore(snapshot),
            Ok(None) => {}
            Err(err) => {
                tracing::error!(user_id = %session.config.user_id, error = %err, "stored progress unavailable, starting fresh");
            }
        }
        Ok(session)
    }

    /// Current step
    pub fn current_step(&self) -> Result<&Step, SessionError> {
        self.bundle
            .flow
            .step(self.cursor.current())
            .ok_or_else(|| FlowError::UnknownStep(self.cursor.current().clone()).into())
    }

    /// Language of the active bundle
    #[inline]
    #[must_use]
    pub fn lang(&self) -> &str {
        &self.bundle.lang
    }

    /// People to register, in insertion order
    #[inline]
    #[must_use]
    pub fn people(&self) -> &PersonRegistry {
        &self.people
    }

    /// Uploaded documents
    #[inline]
    #[must_use]
    pub fn ledger(&self) -> &DocumentLedger {
        &self.ledger
    }

    /// Registration address, once known
    #[inline]
    #[must_use]
    pub fn registration_address(&self) -> Option<&str> {
        self.registration_address.as_deref()
    }

    /// Label of the root-question answer
    #[inline]
    #[must_use]
    pub fn selected_procedure(&self) -> Option<&str> {
        self.selected_procedure.as_deref()
    }

    /// Document requirements accumulated along the taken path
    #[must_use]
    pub fn required_documents(&self) -> Vec<DocumentRequirement> {
        required_documents(self.cursor.history(), self.cursor.current(), &self.bundle.flow)
    }

    /// Localized breadcrumb trail for the current path
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumb_trail(
            self.cursor.history(),
            self.cursor.current(),
            &self.bundle.flow,
            self.bundle.messages.breadcrumb_home(),
            self.bundle.messages.summary_title(),
        )
    }

    /// Whether every requirement of the current step is fully validated
    #[must_use]
    pub fn is_step_satisfied(&self) -> bool {
        let names = self
            .current_step()
            .map(|step| {
                step.documents()
                    .iter()
                    .map(|d| d.name.clone())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        self.ledger
            .is_fully_satisfied(names.iter().map(String::as_str))
    }

    /// Answer the current question by option index
    ///
    /// The root question's chosen label is recorded as the selected
    /// procedure. Entering an info block opens ledger slots for its
    /// requirements.
    pub async fn answer(&mut self, option_index: usize) -> Result<&Step, SessionError> {
        let (label, next) = {
            let step = self.current_step()?;
            let StepKind::Question { options, .. } = &step.kind else {
                return Err(SessionError::NotAQuestion(step.id.clone()));
            };
            let option = options
                .get(option_index)
                .ok_or_else(|| FlowError::NoSuchOption {
                    step: step.id.clone(),
                    index: option_index,
                })?;
            (option.label.clone(), option.next.clone())
        };

        if self.cursor.current() == self.bundle.flow.root() {
            tracing::info!(procedure = %label, "procedure selected");
            self.selected_procedure = Some(label);
        }
        self.cursor.advance(next, &self.bundle.flow)?;
        self.open_slots_for_current();
        self.save().await;
        self.current_step()
    }

    /// Continue past the current info block
    ///
    /// When its requirements are not fully validated, continuing takes the
    /// explicit confirmation flag; without it the outstanding names are
    /// rejected back to the caller.
    pub async fn continue_after_docs(
        &mut self,
        confirmed_without_validation: bool,
    ) -> Result<&Step, SessionError> {
        let next = {
            let step = self.current_step()?;
            if !matches!(step.kind, StepKind::InfoBlock { .. }) {
                return Err(SessionError::NotAnInfoBlock(step.id.clone()));
            }
            let missing = self.outstanding(step.documents());
            if !missing.is_empty() && !confirmed_without_validation {
                return Err(SessionError::DocumentsOutstanding { missing });
            }
            step.next()
                .cloned()
                .ok_or_else(|| SessionError::NoContinuation(step.id.clone()))?
        };

        self.cursor.advance(next, &self.bundle.flow)?;
        self.open_slots_for_current();
        self.save().await;
        self.current_step()
    }

    /// Step back to the previous step
    ///
    /// Ledger entries of the abandoned branch are retained; the requirement
    /// set is recomputed from the path, so they simply stop being owed.
    pub async fn back(&mut self) -> Result<&Step, SessionError> {
        self.cursor.retreat()?;
        self.save().await;
        self.current_step()
    }

    /// Jump from the final review to the summary screen
    ///
    /// Same confirmation rule as [`continue_after_docs`], but against every
    /// requirement accumulated along the path.
    ///
    /// [`continue_after_docs`]: WizardSession::continue_after_docs
    pub async fn proceed_to_summary(
        &mut self,
        confirmed_without_validation: bool,
    ) -> Result<&Step, SessionError> {
        let missing = self.outstanding(&self.required_documents());
        if !missing.is_empty() && !confirmed_without_validation {
            return Err(SessionError::DocumentsOutstanding { missing });
        }
        self.cursor.jump_to_summary(&self.bundle.flow)?;
        self.save().await;
        self.current_step()
    }

    /// Attach uploaded files to a requirement
    ///
    /// Single-file requirements replace their list, multi-file requirements
    /// append, following the requirement's flag in the flow data.
    pub async fn attach_files(
        &mut self,
        requirement: &str,
        files: Vec<NewUpload>,
    ) -> Result<Vec<FileId>, SessionError> {
        let multiple = self
            .find_requirement(requirement)
            .is_some_and(|d| d.multiple_files);
        let ids = self.ledger.attach(requirement, files, multiple);
        self.save().await;
        Ok(ids)
    }

    /// Validate one uploaded file through the document validator
    ///
    /// The outcome is applied by stable file id; if the file was removed
    /// while the call was in flight the completion is discarded. A valid
    /// outcome on an id-extractable requirement feeds the person registry.
    pub async fn validate_file(
        &mut self,
        requirement: &str,
        id: FileId,
    ) -> Result<ApplyOutcome, SessionError> {
        let payload = {
            let entry = self
                .ledger
                .entry(requirement, id)
                .ok_or_else(|| SessionError::UnknownFile {
                    requirement: requirement.to_owned(),
                    id,
                })?;
            entry.payload.clone().or_else(|| {
                entry
                    .encoded
                    .as_ref()
                    .and_then(|e| base64::engine::general_purpose::STANDARD.decode(e).ok())
            })
        };

        let update = match payload {
            Some(bytes) => {
                let outcome = self.validator.validate(&bytes, requirement).await;
                ValidationUpdate {
                    status: if outcome.is_valid {
                        ValidationStatus::Valid
                    } else {
                        ValidationStatus::Invalid
                    },
                    message: outcome.reason,
                    extracted: outcome.extracted,
                    encoded: outcome.encoded_payload,
                }
            }
            None => ValidationUpdate {
                status: ValidationStatus::Invalid,
                message: self.bundle.messages.file_read_error().to_owned(),
                extracted: Vec::new(),
                encoded: None,
            },
        };

        let is_valid = update.status == ValidationStatus::Valid;
        let extracted = update.extracted.clone();
        let applied = self.ledger.apply_validation(requirement, id, update);

        if applied == ApplyOutcome::Applied {
            let id_extractable = self
                .find_requirement(requirement)
                .is_some_and(|d| d.id_extractable);
            self.people
                .absorb_validation(id_extractable, is_valid, &extracted);
        }
        self.save().await;
        Ok(applied)
    }

    /// Remove one uploaded file
    ///
    /// If the removed entry carried the last reference to an id number, the
    /// matching person leaves the registry with it.
    pub async fn remove_file(&mut self, requirement: &str, id: FileId) -> Result<(), SessionError> {
        let removed =
            self.ledger
                .remove(requirement, id)
                .ok_or_else(|| SessionError::UnknownFile {
                    requirement: requirement.to_owned(),
                    id,
                })?;
        self.people.reconcile_removal(&removed, &self.ledger);
        self.save().await;
        Ok(())
    }

    /// Remove a person by id number
    pub async fn remove_person(&mut self, id_number: &str) {
        self.people.remove(id_number);
        self.save().await;
    }

    /// Set the registration address
    pub async fn set_address(&mut self, address: impl Into<String>) {
        self.registration_address = Some(address.into());
        self.save().await;
    }

    /// Ask the summarizer for address and people suggestions
    ///
    /// Pure read: nothing is applied until [`apply_summary`].
    ///
    /// [`apply_summary`]: WizardSession::apply_summary
    pub async fn generate_summary(&self) -> Result<ProcedureSummary, SessionError> {
        let procedure = self.selected_procedure.clone().unwrap_or_default();
        let compiled = self.ledger.compile_extracted().to_string();
        Ok(self.summarizer.summarize(&procedure, &compiled).await?)
    }

    /// Apply an AI summary: overwrite the address and replace the people
    pub async fn apply_summary(&mut self, summary: ProcedureSummary) {
        if let Some(address) = summary.registration_address {
            if !address.trim().is_empty() {
                self.registration_address = Some(address);
            }
        }
        self.people.replace_all(summary.people_to_register);
        self.save().await;
    }

    /// Switch to another language
    ///
    /// The path is kept (same step ids, new labels); if the new graph does
    /// not know the current step the cursor resets to the root.
    pub async fn switch_language(&mut self, lang: &str) -> Result<(), SessionError> {
        let bundle = self.loader.load_or_default(lang)?;
        match FlowCursor::from_parts(
            self.cursor.current().clone(),
            self.cursor.history().to_vec(),
            &bundle.flow,
        ) {
            Ok(cursor) => self.cursor = cursor,
            Err(err) => {
                tracing::warn!(lang, error = %err, "current path not in new flow, resetting to root");
                self.cursor = FlowCursor::new(&bundle.flow);
            }
        }
        self.bundle = bundle;
        self.save().await;
        Ok(())
    }

    /// Full-state snapshot of this session
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_step: self.cursor.current().clone(),
            history: self.cursor.history().to_vec(),
            ledger: self.ledger.clone(),
            people: self.people.clone(),
            registration_address: self.registration_address.clone(),
            breadcrumbs: self.breadcrumbs(),
            selected_procedure: self.selected_procedure.clone(),
            saved_at: chrono::Utc::now(),
        }
    }

    /// Restore from a snapshot
    ///
    /// A saved step that no longer exists in the active graph falls back to
    /// the root; ledger and people are restored either way.
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        match FlowCursor::from_parts(
            snapshot.current_step.clone(),
            snapshot.history.clone(),
            &self.bundle.flow,
        ) {
            Ok(cursor) => self.cursor = cursor,
            Err(err) => {
                tracing::warn!(step = %snapshot.current_step, error = %err, "saved step not in flow, resuming at root");
                self.cursor = FlowCursor::new(&self.bundle.flow);
            }
        }
        self.ledger = snapshot.ledger;
        self.people = snapshot.people;
        self.registration_address = snapshot.registration_address;
        self.selected_procedure = snapshot.selected_procedure;
        tracing::info!(user_id = %self.config.user_id, step = %self.cursor.current(), "session restored");
    }

    /// Final submission payload (the wire shape the backend expects)
    #[must_use]
    pub fn submission_payload(&self) -> serde_json::Value {
        let mut documents = serde_json::Map::new();
        for (name, files) in self.ledger.iter() {
            documents.insert(
                name.to_owned(),
                serde_json::to_value(files).unwrap_or_default(),
            );
        }
        serde_json::json!({
            "userId": self.config.user_id,
            "procedure": self.selected_procedure,
            "registrationAddress": self.registration_address,
            "people": self.people.people(),
            "documents": documents,
            "flowPath": self.breadcrumbs(),
        })
    }

    /// Requirement names with missing or not-yet-valid files
    fn outstanding(&self, requirements: &[DocumentRequirement]) -> Vec<String> {
        requirements
            .iter()
            .filter(|d| !self.ledger.is_fully_satisfied([d.name.as_str()]))
            .map(|d| d.name.clone())
            .collect()
    }

    /// Find a requirement by name, preferring the taken path
    fn find_requirement(&self, name: &str) -> Option<DocumentRequirement> {
        if let Some(found) = self
            .required_documents()
            .into_iter()
            .find(|d| d.name == name)
        {
            return Some(found);
        }
        self.bundle
            .flow
            .steps()
            .flat_map(|step| step.documents().iter())
            .find(|d| d.name == name)
            .cloned()
    }

    /// Open ledger slots for the requirements the current step presents
    fn open_slots_for_current(&mut self) {
        let names: Vec<String> = if self.cursor.current().as_str() == FINAL_REVIEW_STEP {
            self.required_documents()
                .into_iter()
                .map(|d| d.name)
                .collect()
        } else {
            self.current_step()
                .map(|step| step.documents().iter().map(|d| d.name.clone()).collect())
                .unwrap_or_default()
        };
        for name in names {
            self.ledger.ensure_slot(&name);
        }
    }

    /// Best-effort persistence; failures are traced, not surfaced
    async fn save(&self) {
        let snapshot = self.snapshot();
        if let Err(err) = self.store.save(&self.config.user_id, &snapshot).await {
            tracing::error!(user_id = %self.config.user_id, error = %err, "progress save failed");
        }
    }
}
