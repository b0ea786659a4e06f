//! The bot service: one explicitly constructed instance per process
//!
//! [`PlaylistBot`] owns the session store, the extractor, and the delivery
//! pipeline. A transport hands it `(user, text)` pairs through
//! [`PlaylistBot::handle_message`]; everything the user should see goes out
//! through the [`MessageSink`] in order.

use crate::config::Config;
use crate::conversation::{ExtractionJob, PlaylistUrlMatcher, SessionStore, Transition};
use crate::delivery::{DeliveryPipeline, MessageSink, Pacer};
use crate::error::Result;
use crate::extractor::PlaylistExtractor;
use crate::messages;
use crate::types::{Event, ExtractionOutcome, FlowKind, UserId};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Fixed command triggers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/start`: greeting
    Start,
    /// `/help`: usage
    Help,
    /// `/quick`: URL only
    Quick,
    /// `/configure`: collect every parameter
    Configure,
}

impl Command {
    /// Recognise a command message
    ///
    /// Accepts the Telegram `/cmd@BotName` form and ignores trailing arguments.
    ///
    /// ```
    /// use playlist_slicer::Command;
    ///
    /// assert_eq!(Command::parse("/quick"), Some(Command::Quick));
    /// assert_eq!(Command::parse("/start@SlicerBot"), Some(Command::Start));
    /// assert_eq!(Command::parse("quick"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "quick" => Some(Command::Quick),
            "configure" | "config" => Some(Command::Configure),
            _ => None,
        }
    }
}

/// Playlist slicing bot
#[derive(Clone)]
pub struct PlaylistBot {
    config: Arc<Config>,
    sessions: SessionStore,
    urls: PlaylistUrlMatcher,
    extractor: Arc<dyn PlaylistExtractor>,
    sink: Arc<dyn MessageSink>,
    delivery: DeliveryPipeline,
    event_tx: broadcast::Sender<Event>,
}

impl PlaylistBot {
    /// Create a bot
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) when `config` fails validation.
    pub fn new(
        config: Config,
        extractor: Arc<dyn PlaylistExtractor>,
        sink: Arc<dyn MessageSink>,
        pacer: Arc<dyn Pacer>,
    ) -> Result<Self> {
        config.validate()?;
        let urls = PlaylistUrlMatcher::from_config(&config)?;

        // Subscribers that fall more than 256 events behind lose the oldest ones
        let (event_tx, _rx) = broadcast::channel(256);

        let delivery = DeliveryPipeline::new(
            sink.clone(),
            pacer,
            config.delivery.clone(),
            event_tx.clone(),
        );

        tracing::info!(extractor = extractor.name(), "playlist bot initialized");

        Ok(Self {
            config: Arc::new(config),
            sessions: SessionStore::new(),
            urls,
            extractor,
            sink,
            delivery,
            event_tx,
        })
    }

    /// Subscribe to service events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Session storage (read access for transports and tests)
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle one inbound message
    ///
    /// Commands are recognised first; anything else is applied to the user's
    /// session. When a reply completes the settings, extraction and delivery
    /// run before this returns, and the session is Idle again afterwards
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// Only transport failures are returned. The session is reset before the
    /// error is handed back.
    pub async fn handle_message(&self, user: UserId, text: &str) -> Result<()> {
        match Command::parse(text) {
            Some(command) => self.handle_command(user, command).await,
            None => self.handle_text(user, text).await,
        }
    }

    /// Handle a command trigger
    pub async fn handle_command(&self, user: UserId, command: Command) -> Result<()> {
        tracing::debug!(user = %user, command = ?command, "command received");
        match command {
            Command::Start => self.say(user, messages::GREETING).await,
            Command::Help => self.say(user, messages::USAGE).await,
            Command::Quick => self.start_flow(user, FlowKind::Quick).await,
            Command::Configure => self.start_flow(user, FlowKind::Configured).await,
        }
    }

    async fn start_flow(&self, user: UserId, kind: FlowKind) -> Result<()> {
        if !self.sessions.start_flow(user, kind).await {
            return self.say(user, messages::BUSY).await;
        }
        self.event_tx.send(Event::FlowStarted { user, kind }).ok();
        self.say(user, messages::ASK_URL).await
    }

    async fn handle_text(&self, user: UserId, text: &str) -> Result<()> {
        let transition = self
            .sessions
            .apply(
                user,
                text,
                &self.urls,
                self.config.conversation.default_batch_size,
            )
            .await;

        match transition {
            Transition::Prompt(question) => self.say(user, question).await,
            Transition::Reprompt(error) => {
                tracing::debug!(user = %user, error = %error, "reply rejected");
                self.say(user, &messages::reprompt(&error)).await
            }
            Transition::Busy => self.say(user, messages::BUSY).await,
            Transition::Usage => self.say(user, messages::USAGE).await,
            Transition::Extract(job) => self.run_job(user, job).await,
        }
    }

    /// Run extraction and delivery, then reset the session unconditionally
    async fn run_job(&self, user: UserId, job: ExtractionJob) -> Result<()> {
        let reset = SessionReset::new(self.sessions.clone(), self.event_tx.clone(), user);
        let result = self.extract_and_deliver(user, &job).await;
        reset.finish().await;

        if let Err(ref e) = result {
            tracing::warn!(user = %user, error = %e, "delivery aborted");
            // Best effort: the transport just failed, this may fail too
            self.sink
                .send(user, messages::DELIVERY_FAILED.to_string())
                .await
                .ok();
        }
        result
    }

    async fn extract_and_deliver(&self, user: UserId, job: &ExtractionJob) -> Result<()> {
        if job.kind == FlowKind::Configured {
            self.say(user, &messages::settings_summary(&job.settings))
                .await?;
        }
        self.say(user, messages::FETCHING).await?;

        let timeout = self.config.tool.timeout_for(job.kind);
        tracing::info!(
            user = %user,
            url = %job.url,
            settings = ?job.settings,
            timeout = ?timeout,
            "starting extraction"
        );
        self.event_tx
            .send(Event::ExtractionStarted {
                user,
                url: job.url.clone(),
                settings: job.settings,
            })
            .ok();

        let started = Instant::now();
        let outcome = self
            .extractor
            .extract(&job.url, &job.settings, timeout)
            .await;
        let elapsed = started.elapsed();

        tracing::info!(user = %user, outcome = ?outcome.kind(), elapsed = ?elapsed, "extraction finished");
        self.event_tx
            .send(Event::ExtractionFinished {
                user,
                outcome: outcome.kind(),
                elapsed,
            })
            .ok();

        match outcome {
            ExtractionOutcome::Success(entries) => {
                let report = self
                    .delivery
                    .deliver(user, &entries, job.settings.batch_size)
                    .await?;
                tracing::info!(
                    user = %user,
                    delivered = report.delivered,
                    batches = report.batches,
                    "playlist delivered"
                );
                Ok(())
            }
            ExtractionOutcome::ToolUnavailable => {
                self.say(user, messages::TOOL_UNAVAILABLE).await
            }
            ExtractionOutcome::ProcessFailed(diagnostic) => {
                self.say(user, &messages::process_failed(&diagnostic)).await
            }
            ExtractionOutcome::TimedOut => self.say(user, messages::TIMED_OUT).await,
        }
    }

    async fn say(&self, user: UserId, text: &str) -> Result<()> {
        self.sink.send(user, text.to_string()).await
    }
}

/// Returns a user's session to Idle, even if the turn is cancelled
///
/// Armed when extraction begins. [`SessionReset::finish`] clears the session
/// on the normal path; if the turn's future is dropped first (aborted task,
/// caller timeout, panicking sink) `Drop` clears it instead.
struct SessionReset {
    sessions: SessionStore,
    event_tx: broadcast::Sender<Event>,
    user: UserId,
    armed: bool,
}

impl SessionReset {
    fn new(sessions: SessionStore, event_tx: broadcast::Sender<Event>, user: UserId) -> Self {
        Self {
            sessions,
            event_tx,
            user,
            armed: true,
        }
    }

    async fn finish(mut self) {
        self.sessions.clear(self.user).await;
        self.armed = false;
        self.event_tx
            .send(Event::SessionCleared { user: self.user })
            .ok();
    }
}

impl Drop for SessionReset {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let user = self.user;
        tracing::warn!(user = %user, "turn cancelled during extraction, resetting session");

        if self.sessions.try_clear(user) {
            self.event_tx.send(Event::SessionCleared { user }).ok();
            return;
        }

        // Store lock is held elsewhere; finish on the runtime
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let sessions = self.sessions.clone();
                let event_tx = self.event_tx.clone();
                handle.spawn(async move {
                    sessions.clear(user).await;
                    event_tx.send(Event::SessionCleared { user }).ok();
                });
            }
            Err(e) => {
                tracing::error!(user = %user, error = %e, "could not reset session outside a runtime")
            }
        }
    }
}
