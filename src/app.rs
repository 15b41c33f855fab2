//! Dashboard session context.
//!
//! [`Dashboard`] owns every piece of session state (activity log,
//! connection state, dispatcher, counters, badges, notifications, timers)
//! and is handed to whichever front end drives it: the web server or the
//! terminal console. Dropping it ends the session and discards pending
//! timers.

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::activity::{LogEntry, LogKind, LogObserver, LogStore, export};
use crate::backend::{self, ToolDescriptor, ToolKind, Transport, TransportMode};
use crate::config::DashConfig;
use crate::console::{Command, HELP_TEXT};
use crate::diagnostics::Diagnostics;
use crate::dispatch::{DispatchResult, Dispatcher};
use crate::error::DashError;
use crate::monitor::{self, ConnectionState};
use crate::notify::{Level, Notification, Notifications};
use crate::scheduler::{Clock, Job, Scheduler, SystemClock, TaskHandle};
use crate::scoreboard::{BadgeState, Badges, Scoreboard};

/// Delay before the `test` command reports its result.
const TEST_ECHO_DELAY: Duration = Duration::from_secs(1);

/// Tools and lines cycled through by the background activity timer.
const ACTIVITY_TOOLS: [ToolKind; 3] = [ToolKind::Click, ToolKind::Campaign, ToolKind::Safety];
const ACTIVITY_LINES: [&str; 4] = [
    "Processing traffic data...",
    "Analyzing competitor patterns...",
    "Updating security protocols...",
    "Optimizing transaction schedules...",
];

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Serializable view of the whole dashboard, served to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub mode: TransportMode,
    pub mode_label: &'static str,
    pub connection: ConnectionState,
    pub paused: bool,
    pub scoreboard: Scoreboard,
    pub tools: Vec<ToolCard>,
    pub notifications: Vec<Notification>,
    pub logs: Vec<LogEntry>,
}

/// One tool card: static descriptor plus live badge and availability.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCard {
    #[serde(flatten)]
    pub descriptor: ToolDescriptor,
    pub badge: BadgeState,
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard {
    log: LogStore,
    connection: ConnectionState,
    dispatcher: Dispatcher,
    scoreboard: Scoreboard,
    badges: Badges,
    notifications: Notifications,
    scheduler: Scheduler,
    clock: Rc<dyn Clock>,
    diagnostics: Diagnostics,
    poll_interval: Duration,
    poll_task: Option<TaskHandle>,
    activity_interval: Duration,
    activity_task: Option<TaskHandle>,
    activity_turn: usize,
    badge_reset: Duration,
    export_dir: PathBuf,
}

impl Dashboard {
    /// Build a session around an explicit transport and clock.
    pub fn new(
        config: &DashConfig,
        transport: Box<dyn Transport>,
        clock: Rc<dyn Clock>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            log: LogStore::with_capacity(config.log.capacity),
            connection: ConnectionState::default(),
            dispatcher: Dispatcher::new(transport, &config.backend.platform, diagnostics.clone()),
            scoreboard: Scoreboard::default(),
            badges: Badges::default(),
            notifications: Notifications::new(Duration::from_secs(config.dashboard.notification_secs)),
            scheduler: Scheduler::new(),
            clock,
            diagnostics,
            poll_interval: Duration::from_secs(config.monitor.interval_secs.max(1)),
            poll_task: None,
            activity_interval: Duration::from_secs(config.monitor.activity_secs.max(1)),
            activity_task: None,
            activity_turn: 0,
            badge_reset: Duration::from_secs(config.dashboard.badge_reset_secs),
            export_dir: PathBuf::from(&config.log.export_dir),
        }
    }

    /// Build a session with the configured transport and the wall clock.
    pub fn from_config(config: &DashConfig) -> Self {
        Self::new(
            config,
            backend::from_config(config),
            Rc::new(SystemClock::new()),
            Diagnostics::from_config(config.log.diagnostics),
        )
    }

    /// Attach the display-refresh collaborator of the activity log.
    pub fn set_log_observer(&mut self, observer: Box<dyn LogObserver>) {
        self.log.set_observer(observer);
    }

    /// Log the startup lines, poll once, and arm the periodic timers.
    pub fn start(&mut self) {
        let mode = self.dispatcher.mode();
        self.diagnostics.record(&format!("session start mode={mode}"));
        self.log.append(
            LogKind::System,
            format!("Dashboard initialized ({})", mode.label()),
        );
        self.log.append(
            LogKind::System,
            concat!("seodash v", env!("CARGO_PKG_VERSION")),
        );
        self.log.append(
            LogKind::Info,
            format!("All {} automation tools are ready", ToolKind::ALL.len()),
        );
        self.poll_connection();

        let now = self.now();
        self.poll_task = Some(
            self.scheduler
                .schedule_every(now, self.poll_interval, Job::PollConnection),
        );
        self.activity_task = Some(
            self.scheduler
                .schedule_every(now, self.activity_interval, Job::Activity),
        );
    }

    /// Cancel the periodic timers. Pending one-shot timers still fire.
    pub fn stop(&mut self) {
        for handle in [self.poll_task.take(), self.activity_task.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
    }

    /// Run every timer that is due and expire old notifications.
    ///
    /// Returns the number of jobs executed.
    pub fn tick(&mut self) -> usize {
        let now = self.now();
        let jobs = self.scheduler.take_due(now);
        let count = jobs.len();

        for job in jobs {
            match job {
                Job::PollConnection => {
                    if !self.log.is_paused() {
                        self.poll_connection();
                    }
                }
                Job::Activity => self.log_activity(),
                Job::ResetBadge(tool) => self.badges.reset(tool),
                Job::Echo { kind, message } => self.log.append(kind, message),
            }
        }

        self.notifications.expire(now);
        count
    }

    /// Time until the next timer is due, if any.
    pub fn until_next_timer(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.now()))
    }

    // -- Operations --

    /// Probe the backend now. Background polls never notify.
    pub fn poll_connection(&mut self) -> bool {
        monitor::poll(
            self.dispatcher.transport(),
            &mut self.connection,
            &mut self.log,
            &self.diagnostics,
        )
    }

    /// User-initiated tool start.
    pub fn start_tool(&mut self, key: &str, url: &str) -> DispatchResult {
        let result = self
            .dispatcher
            .start_tool(&mut self.log, &self.connection, key, url);
        let now = self.now();

        match (&result.error, result.tool) {
            (Some(error), _) => {
                let level = match error.log_kind() {
                    LogKind::Warning => Level::Warning,
                    _ => Level::Error,
                };
                self.notifications.push(now, level, error.notice());
            }
            (None, Some(tool)) if result.outcome.is_started() => {
                if let Some(level) = self.scoreboard.apply(tool, result.payload.as_ref()) {
                    self.log
                        .append(LogKind::Info, format!("Risk level updated: {level}"));
                }
                self.mark_running(tool, now);
                self.notifications.push(
                    now,
                    Level::Success,
                    format!("{} started successfully!", tool.display_name()),
                );
            }
            (None, Some(tool)) => {
                self.notifications.push(
                    now,
                    Level::Error,
                    format!("Failed to start {}", tool.display_name()),
                );
            }
            (None, None) => {}
        }

        result
    }

    pub fn clear_logs(&mut self) {
        self.log.clear();
        let now = self.now();
        self.notifications
            .push(now, Level::Info, "Logs cleared successfully");
    }

    pub fn pause_logs(&mut self) {
        self.log.pause();
        let now = self.now();
        self.notifications.push(now, Level::Info, "Log updates paused");
    }

    pub fn resume_logs(&mut self) {
        self.log.resume();
        let now = self.now();
        self.notifications.push(now, Level::Info, "Log updates resumed");
    }

    pub fn toggle_pause(&mut self) {
        if self.log.is_paused() {
            self.resume_logs();
        } else {
            self.pause_logs();
        }
    }

    /// Render the export artifact in memory: `(file name, body)`.
    ///
    /// On an empty log this records a warning and returns `None`.
    pub fn export_logs(&mut self) -> Option<(String, String)> {
        let now = self.now();
        match self.log.export_text() {
            Ok(body) => {
                let name = export::export_file_name(Utc::now().date_naive());
                self.log.append(LogKind::System, "Logs exported successfully");
                self.notifications
                    .push(now, Level::Success, "Logs exported to file");
                Some((name, body))
            }
            Err(error) => {
                self.report(now, &error);
                None
            }
        }
    }

    /// Write the export artifact into the configured export directory.
    pub fn export_logs_to_disk(&mut self) -> Option<PathBuf> {
        let now = self.now();
        let date = Utc::now().date_naive();
        match export::write_export(&self.log, &self.export_dir, date) {
            Ok(path) => {
                self.log.append(LogKind::System, "Logs exported successfully");
                self.notifications
                    .push(now, Level::Success, "Logs exported to file");
                Some(path)
            }
            Err(err) => {
                match err.downcast_ref::<DashError>() {
                    Some(error) => self.report(now, error),
                    None => {
                        self.diagnostics.record(&format!("export failed: {err:#}"));
                        self.log
                            .append(LogKind::Error, format!("Log export failed: {err}"));
                        self.notifications.push(now, Level::Error, "Log export failed");
                    }
                }
                None
            }
        }
    }

    /// Execute one line of console input.
    pub fn run_command(&mut self, input: &str) {
        let Some(command) = Command::parse(input) else {
            return;
        };
        self.log
            .append(LogKind::System, format!("Command: {}", input.trim()));

        match command {
            Command::Status => {
                let mode = self.dispatcher.mode().label();
                let backend = self.connection.label();
                let score = self.scoreboard.security_score;
                self.log.append(LogKind::Info, format!("Mode: {mode}"));
                self.log.append(LogKind::Info, format!("Backend: {backend}"));
                self.log
                    .append(LogKind::Info, format!("Security score: {score}%"));
            }
            Command::Help => self.log.append(LogKind::Info, HELP_TEXT),
            Command::Test => {
                self.log.append(LogKind::Info, "Testing all tools...");
                let now = self.now();
                self.scheduler.schedule_once(
                    now,
                    TEST_ECHO_DELAY,
                    Job::Echo {
                        kind: LogKind::Success,
                        message: "All tools test passed".to_string(),
                    },
                );
            }
            Command::Refresh => {
                self.poll_connection();
                self.log.append(LogKind::Info, "Refreshing dashboard...");
            }
            Command::Clear => self.clear_logs(),
            Command::Pause => self.pause_logs(),
            Command::Resume => self.resume_logs(),
            Command::Export => {
                self.export_logs_to_disk();
            }
            Command::Start { tool, url } => {
                self.start_tool(&tool, &url);
            }
            Command::Unknown(raw) => {
                self.log
                    .append(LogKind::Warning, format!("Unknown command: {raw}"));
            }
        }
    }

    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        self.notifications.dismiss(id)
    }

    // -- Views --

    pub fn snapshot(&self) -> Snapshot {
        let mode = self.dispatcher.mode();
        let transport = self.dispatcher.transport();
        Snapshot {
            mode,
            mode_label: mode.label(),
            connection: self.connection.clone(),
            paused: self.log.is_paused(),
            scoreboard: self.scoreboard.clone(),
            tools: self
                .badges
                .snapshot()
                .into_iter()
                .map(|(tool, badge)| ToolCard {
                    descriptor: tool.descriptor(),
                    badge,
                    available: transport.supports(tool),
                })
                .collect(),
            notifications: self.notifications.active().to_vec(),
            logs: self.log.entries().cloned().collect(),
        }
    }

    pub fn log(&self) -> &LogStore {
        &self.log
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn badge(&self, tool: ToolKind) -> BadgeState {
        self.badges.state(tool)
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    pub fn mode(&self) -> TransportMode {
        self.dispatcher.mode()
    }

    // -- Internal --

    /// Background tool activity, only while connected and not paused.
    fn log_activity(&mut self) {
        if self.log.is_paused() || !self.connection.connected {
            return;
        }
        let turn = self.activity_turn;
        self.activity_turn += 1;
        let tool = ACTIVITY_TOOLS[turn % ACTIVITY_TOOLS.len()];
        let line = ACTIVITY_LINES[turn % ACTIVITY_LINES.len()];
        self.log
            .append(LogKind::Tool, format!("{}: {line}", tool.display_name()));
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    fn mark_running(&mut self, tool: ToolKind, now: Duration) {
        let reset = self
            .scheduler
            .schedule_once(now, self.badge_reset, Job::ResetBadge(tool));
        if let Some(previous) = self.badges.mark_running(tool, reset) {
            self.scheduler.cancel(previous);
        }
    }

    fn report(&mut self, now: Duration, error: &DashError) {
        self.log.append(error.log_kind(), error.to_string());
        let level = match error.log_kind() {
            LogKind::Warning => Level::Warning,
            _ => Level::Error,
        };
        self.notifications.push(now, level, error.notice());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
