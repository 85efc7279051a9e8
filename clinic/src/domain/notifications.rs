//! Background counter of unread notifications for the signed-in user.
//!
//! The counter fetches once on start, then on a fixed period and whenever
//! the view regains focus. A change of signed-in user clears the count,
//! fetches at once and restarts the period. The latest count is published
//! through a `watch` channel. A failed or slow fetch keeps the previous
//! value; nothing is retried until the next trigger.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::domain::ports::{NotificationSource, SessionContext};
use crate::domain::{SessionState, UserId};

/// Highest count shown verbatim on the badge.
pub const BADGE_MAX: u32 = 99;

/// Badge text for `count`: empty for zero, `99+` above [`BADGE_MAX`].
///
/// # Examples
/// ```
/// use clinic::domain::badge_label;
///
/// assert_eq!(badge_label(0), "");
/// assert_eq!(badge_label(12), "12");
/// assert_eq!(badge_label(250), "99+");
/// ```
pub fn badge_label(count: u32) -> String {
    match count {
        0 => String::new(),
        n if n > BADGE_MAX => format!("{BADGE_MAX}+"),
        n => n.to_string(),
    }
}

/// Timing for the background refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSettings {
    /// Period between timer refreshes.
    pub refresh_interval: Duration,
    /// Upper bound for a single fetch.
    pub fetch_timeout: Duration,
}

impl CounterSettings {
    /// Default refresh period.
    pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30);
    /// Default fetch bound.
    pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Self::DEFAULT_REFRESH,
            fetch_timeout: Self::DEFAULT_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Start,
    Timer,
    Focus,
    IdentityChanged,
}

fn signed_in_user(state: &SessionState) -> Option<UserId> {
    state.identity().map(|identity| identity.id().clone())
}

/// Sources that wake the refresher between fetches.
struct Wakeups {
    ticker: Interval,
    refocus: Arc<Notify>,
    sessions: watch::Receiver<SessionState>,
    watching: bool,
    signed_in: Option<UserId>,
}

impl Wakeups {
    fn new(
        refresh_interval: Duration,
        refocus: Arc<Notify>,
        mut sessions: watch::Receiver<SessionState>,
    ) -> Self {
        let mut ticker = time::interval_at(Instant::now() + refresh_interval, refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let signed_in = signed_in_user(&sessions.borrow_and_update());
        Self {
            ticker,
            refocus,
            sessions,
            watching: true,
            signed_in,
        }
    }

    async fn next(&mut self) -> Trigger {
        loop {
            tokio::select! {
                biased;
                changed = self.sessions.changed(), if self.watching => {
                    if changed.is_err() {
                        debug!("session publisher gone; unread counter keeps timer and focus only");
                        self.watching = false;
                        continue;
                    }
                    let user = signed_in_user(&self.sessions.borrow_and_update());
                    if user != self.signed_in {
                        self.signed_in = user;
                        self.ticker.reset();
                        return Trigger::IdentityChanged;
                    }
                }
                _ = self.ticker.tick() => return Trigger::Timer,
                () = self.refocus.notified() => return Trigger::Focus,
            }
        }
    }
}

struct Refresher {
    source: Arc<dyn NotificationSource>,
    session: Arc<dyn SessionContext>,
    fetch_timeout: Duration,
    count: watch::Sender<u32>,
}

impl Refresher {
    async fn refresh(&self, trigger: Trigger) {
        let Some(identity) = self.session.current_identity() else {
            debug!(?trigger, "skipping unread refresh: nobody signed in");
            return;
        };

        match time::timeout(self.fetch_timeout, self.source.unread_count(identity.id())).await {
            Ok(Ok(count)) => {
                debug!(?trigger, user_id = %identity.id(), count, "unread count refreshed");
                self.count.send_replace(count);
            }
            Ok(Err(err)) => {
                warn!(
                    ?trigger,
                    user_id = %identity.id(),
                    error = %err,
                    "unread count fetch failed"
                );
            }
            Err(_) => {
                warn!(
                    ?trigger,
                    user_id = %identity.id(),
                    timeout = ?self.fetch_timeout,
                    "unread count fetch timed out"
                );
            }
        }
    }

    async fn run(self, mut wakeups: Wakeups, mut shutdown: oneshot::Receiver<()>) {
        let mut trigger = Trigger::Start;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                () = self.refresh(trigger) => {}
            }

            trigger = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                next = wakeups.next() => next,
            };
            if matches!(trigger, Trigger::IdentityChanged) {
                // The previous user's count must not outlive their session.
                self.count.send_if_modified(|count| std::mem::take(count) != 0);
            }
        }
        debug!("unread counter stopped");
    }
}

/// Handle to the running counter task.
///
/// Call [`NotificationCounter::shutdown`] to stop it and wait; dropping the
/// handle aborts the task instead.
pub struct NotificationCounter {
    count: watch::Receiver<u32>,
    refocus: Arc<Notify>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl NotificationCounter {
    /// Start the counter on the current tokio runtime. It follows the
    /// session published by `session`, refetching when the signed-in user
    /// changes.
    pub fn spawn(
        source: Arc<dyn NotificationSource>,
        session: Arc<dyn SessionContext>,
        settings: CounterSettings,
    ) -> Self {
        let (count_tx, count) = watch::channel(0);
        let refocus = Arc::new(Notify::new());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let wakeups = Wakeups::new(
            settings.refresh_interval,
            Arc::clone(&refocus),
            session.subscribe(),
        );
        let refresher = Refresher {
            source,
            session,
            fetch_timeout: settings.fetch_timeout,
            count: count_tx,
        };
        let task = tokio::spawn(refresher.run(wakeups, shutdown_rx));
        Self {
            count,
            refocus,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Latest unread count.
    pub fn count(&self) -> u32 {
        *self.count.borrow()
    }

    /// Receiver notified whenever a fetch publishes a count.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.count.clone()
    }

    /// Badge text for the latest count.
    pub fn badge(&self) -> String {
        badge_label(self.count())
    }

    /// Request a refresh because the view regained focus. Repeated calls
    /// before the task wakes collapse into one fetch.
    pub fn refocus(&self) {
        self.refocus.notify_one();
    }

    /// Stop the timer and focus listener, cancel any in-flight fetch and
    /// wait for the task to finish.
    pub async fn shutdown(mut self) {
        if let Some(signal) = self.shutdown.take() {
            // The task may already have exited.
            drop(signal.send(()));
        }
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(err) = task.await {
            warn!(error = %err, "unread counter task ended abnormally");
        }
    }
}

impl Drop for NotificationCounter {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
