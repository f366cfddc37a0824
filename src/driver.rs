//! Timed input driver
//!
//! Types a word into the page's on-screen keyboard one key at a time, then
//! clicks submit. Each key press is an independent task scheduled at
//! `start + i * inter_key_delay`; submit follows at `start + len * inter_key_delay`.
//! The call itself returns as soon as everything is scheduled.
//!
//! Only one word may be in flight at a time. A second call before the first
//! word's last task has fired is rejected with [`DriverError::Busy`], so key
//! sequences never interleave.

use crate::core::PuzzleState;
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::error::{DriverError, ExtractError};
use crate::extract::Extractor;
use crate::schedule::{Scheduler, Task};
use crate::surface::{KEY_ATTR, NodeId, Selector, Surface, keyboard_root};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_INTER_KEY_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_SUBMIT_KEY: &str = "↵";

/// How letters are mapped to key labels before lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CaseNormalization {
    /// The live keyboard labels its keys in lowercase
    #[default]
    Lower,
    Upper,
    Preserve,
}

impl CaseNormalization {
    #[must_use]
    pub fn apply(self, word: &str) -> String {
        match self {
            Self::Lower => word.to_lowercase(),
            Self::Upper => word.to_uppercase(),
            Self::Preserve => word.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    #[serde(rename = "inter_key_delay_ms", with = "crate::config::millis")]
    pub inter_key_delay: Duration,
    pub submit_key: String,
    pub case: CaseNormalization,
    /// Extra wait after submit before the board is read back
    #[serde(rename = "settle_delay_ms", with = "crate::config::millis")]
    pub settle_delay: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            inter_key_delay: DEFAULT_INTER_KEY_DELAY,
            submit_key: DEFAULT_SUBMIT_KEY.to_string(),
            case: CaseNormalization::default(),
            settle_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Click the key labelled with this string
    Press(String),
    /// Click the submit key
    Submit(String),
    /// Read the board back
    Observe,
}

impl Action {
    /// Key label to click, if this action clicks one
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Press(key) | Self::Submit(key) => Some(key),
            Self::Observe => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Press(key) => write!(f, "press {key}"),
            Self::Submit(key) => write!(f, "submit {key}"),
            Self::Observe => write!(f, "observe"),
        }
    }
}

/// One scheduled step, relative to the start of typing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub offset: Duration,
    pub action: Action,
}

/// The full timeline for one word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPlan {
    word: String,
    activations: Vec<Activation>,
}

impl KeyPlan {
    /// Key presses at `i * inter_key_delay`, submit at `len * inter_key_delay`
    ///
    /// An empty word yields a lone submit at offset zero.
    #[must_use]
    pub fn build(word: &str, config: &DriverConfig) -> Self {
        let word = config.case.apply(word);
        let step = |i: usize| {
            config
                .inter_key_delay
                .saturating_mul(u32::try_from(i).unwrap_or(u32::MAX))
        };

        let mut activations: Vec<Activation> = word
            .chars()
            .enumerate()
            .map(|(i, ch)| Activation {
                offset: step(i),
                action: Action::Press(ch.to_string()),
            })
            .collect();
        activations.push(Activation {
            offset: step(activations.len()),
            action: Action::Submit(config.submit_key.clone()),
        });

        Self { word, activations }
    }

    /// Append a board read at submit time plus `settle`
    #[must_use]
    pub fn with_observation(mut self, settle: Duration) -> Self {
        let offset = self.submit_offset() + settle;
        self.activations.push(Activation {
            offset,
            action: Action::Observe,
        });
        self
    }

    /// The word after case normalization
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    #[must_use]
    pub fn offsets(&self) -> Vec<Duration> {
        self.activations.iter().map(|a| a.offset).collect()
    }

    #[must_use]
    pub fn submit_offset(&self) -> Duration {
        self.activations
            .iter()
            .find(|a| matches!(a.action, Action::Submit(_)))
            .map_or(Duration::ZERO, |a| a.offset)
    }

    /// Offset of the last activation
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.activations
            .iter()
            .map(|a| a.offset)
            .max()
            .unwrap_or_default()
    }
}

/// Handle for a word whose key presses have been scheduled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typing {
    word: String,
    started_at: Duration,
    completes_at: Duration,
}

impl Typing {
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Scheduler time at which the first key was due
    #[must_use]
    pub const fn started_at(&self) -> Duration {
        self.started_at
    }

    /// Scheduler time of the last scheduled task
    #[must_use]
    pub const fn completes_at(&self) -> Duration {
        self.completes_at
    }

    /// Time left until the last task, as seen from `now`
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.completes_at.saturating_sub(now)
    }
}

type ObservationResult = Result<PuzzleState, ExtractError>;

/// A board read that will happen after submit
pub struct Observation {
    typing: Typing,
    receiver: mpsc::Receiver<ObservationResult>,
}

impl Observation {
    #[must_use]
    pub const fn typing(&self) -> &Typing {
        &self.typing
    }

    /// The observed state, if the read has run
    ///
    /// `None` while it is still pending.
    pub fn try_take(&self) -> Option<Result<PuzzleState, DriverError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result.map_err(DriverError::from)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DriverError::ObservationDropped)),
        }
    }

    /// Block until the read has run
    ///
    /// # Errors
    /// Returns `ObservationDropped` if the scheduler discarded the task, or
    /// the extraction error if the board could not be read.
    pub fn wait(self) -> Result<PuzzleState, DriverError> {
        self.receiver
            .recv()
            .map_err(|_| DriverError::ObservationDropped)?
            .map_err(DriverError::from)
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("typing", &self.typing)
            .finish_non_exhaustive()
    }
}

/// Schedules key clicks against a shared [`Surface`]
pub struct InputDriver<S, C: ?Sized> {
    surface: Arc<Mutex<S>>,
    scheduler: Arc<C>,
    config: DriverConfig,
    extractor: Extractor,
    in_flight: Arc<AtomicBool>,
    diagnostics: DiagnosticLog,
}

impl<S, C> InputDriver<S, C>
where
    S: Surface + Send + 'static,
    C: Scheduler + ?Sized,
{
    pub fn new(surface: Arc<Mutex<S>>, scheduler: Arc<C>, config: DriverConfig) -> Self {
        Self {
            surface,
            scheduler,
            config,
            extractor: Extractor::default(),
            in_flight: Arc::new(AtomicBool::new(false)),
            diagnostics: DiagnosticLog::new(),
        }
    }

    /// Use `extractor` for reads, including scheduled observations
    #[must_use]
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub const fn surface(&self) -> &Arc<Mutex<S>> {
        &self.surface
    }

    pub const fn scheduler(&self) -> &Arc<C> {
        &self.scheduler
    }

    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub const fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Missing-key reports from scheduled presses
    pub const fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// A word is scheduled and its last task has not fired yet
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The timeline `type_word` would schedule
    pub fn plan(&self, word: &str) -> KeyPlan {
        KeyPlan::build(word, &self.config)
    }

    /// Read the board now
    ///
    /// # Errors
    /// Returns `ExtractError` if the board structure is missing.
    pub fn extract(&self) -> Result<PuzzleState, ExtractError> {
        self.extractor.extract(&*self.surface.lock())
    }

    /// Schedule the key presses for `word` followed by submit
    ///
    /// Returns immediately. Characters with no matching key are skipped and
    /// reported through [`diagnostics`](Self::diagnostics) when their turn comes.
    ///
    /// # Errors
    /// `Busy` if a previous word is still in flight, or `StructureNotFound` if
    /// the keyboard cannot be resolved. Nothing is scheduled in either case.
    pub fn type_word(&self, word: &str) -> Result<Typing, DriverError> {
        let plan = self.plan(word);
        self.start(&plan, None)
    }

    /// Like [`type_word`](Self::type_word), then read the board once submit
    /// has fired and the settle delay has passed
    ///
    /// # Errors
    /// Same as [`type_word`](Self::type_word).
    pub fn type_and_observe(&self, word: &str) -> Result<Observation, DriverError> {
        let plan = self.plan(word).with_observation(self.config.settle_delay);
        let (sender, receiver) = mpsc::channel();
        let typing = self.start(&plan, Some(sender))?;
        Ok(Observation { typing, receiver })
    }

    fn start(
        &self,
        plan: &KeyPlan,
        mut observer: Option<mpsc::Sender<ObservationResult>>,
    ) -> Result<Typing, DriverError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(word = plan.word(), "rejected; previous word still in flight");
            return Err(DriverError::Busy);
        }

        let keyboard = match keyboard_root(&*self.surface.lock()) {
            Ok(keyboard) => keyboard,
            Err(err) => {
                self.in_flight.store(false, Ordering::Release);
                return Err(err.into());
            }
        };

        let started_at = self.scheduler.now();
        let last = plan.activations().len().saturating_sub(1);
        for (i, activation) in plan.activations().iter().enumerate() {
            let release = (i == last).then(|| Arc::clone(&self.in_flight));
            let task = self.task_for(activation, keyboard, release, &mut observer);
            self.scheduler.schedule_at(started_at + activation.offset, task);
        }

        info!(
            word = plan.word(),
            keys = plan.activations().len(),
            duration = ?plan.duration(),
            "scheduled word"
        );
        Ok(Typing {
            word: plan.word().to_string(),
            started_at,
            completes_at: started_at + plan.duration(),
        })
    }

    fn task_for(
        &self,
        activation: &Activation,
        keyboard: NodeId,
        release: Option<Arc<AtomicBool>>,
        observer: &mut Option<mpsc::Sender<ObservationResult>>,
    ) -> Task {
        let surface = Arc::clone(&self.surface);
        match &activation.action {
            Action::Press(key) | Action::Submit(key) => {
                let key = key.clone();
                let offset = activation.offset;
                let diagnostics = self.diagnostics.clone();
                Box::new(move || {
                    press_key(&surface, keyboard, &key, offset, &diagnostics);
                    release_flag(release.as_deref());
                })
            }
            Action::Observe => {
                let extractor = self.extractor.clone();
                let sender = observer.take();
                Box::new(move || {
                    let result = extractor.extract(&*surface.lock());
                    // Free the driver before the caller can see the result
                    release_flag(release.as_deref());
                    if let Some(sender) = sender
                        && sender.send(result).is_err()
                    {
                        debug!("observation receiver dropped");
                    }
                })
            }
        }
    }
}

fn press_key<S: Surface>(
    surface: &Mutex<S>,
    keyboard: NodeId,
    key: &str,
    offset: Duration,
    diagnostics: &DiagnosticLog,
) {
    let mut surface = surface.lock();
    match surface.query(keyboard, &Selector::attribute(KEY_ATTR, key)) {
        Some(node) => {
            debug!(key, ?offset, "key activation");
            surface.click(node);
        }
        None => diagnostics.record(Diagnostic::KeyNotFound {
            key: key.to_string(),
            offset,
        }),
    }
}

fn release_flag(flag: Option<&AtomicBool>) {
    if let Some(flag) = flag {
        flag.store(false, Ordering::Release);
    }
}
