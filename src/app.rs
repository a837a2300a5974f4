//! Session state and the event loop.
//!
//! All mutation happens on the loop task through [`App::update`]. Simulated
//! delays (search, location post-processing, refresh) run as spawned tasks
//! whose only effect is sending a completion [`Action`] back over the
//! channel, so the one-second clock tick keeps firing while they are in
//! flight.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tokio::task;
use tokio::time::{interval, sleep, timeout, MissedTickBehavior};
use tracing::debug;

use crate::directory;
use crate::geo::{self, GeoError, Locator, Position};
use crate::ui;
use crate::weather::WeatherRecord;

/// Shown when the environment has no geolocation capability.
pub const GEO_UNSUPPORTED_MSG: &str = "Geolocation is not supported in this environment.";

/// Shown when a position request fails (denied, timed out, unavailable).
pub const GEO_FAILED_MSG: &str = "Unable to retrieve your location. Please search manually.";

/// Fixed simulated delays standing in for real I/O.
#[derive(Debug, Clone, Copy)]
pub struct Delays {
    /// Directory lookup latency after a search submit.
    pub search: Duration,
    /// Post-processing after a successful position request.
    pub locate: Duration,
    /// Refresh spinner duration.
    pub refresh: Duration,
}

impl Delays {
    /// Immediate resolution, for tests.
    pub const ZERO: Delays = Delays {
        search: Duration::ZERO,
        locate: Duration::ZERO,
        refresh: Duration::ZERO,
    };
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            search: Duration::from_millis(1000),
            locate: Duration::from_millis(1500),
            refresh: Duration::from_millis(1000),
        }
    }
}

/// Everything the view needs to render one frame.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Replaced on every clock tick.
    pub now: DateTime<Local>,

    /// The record on display. Swapped wholesale, never edited in place.
    pub selected: WeatherRecord,

    /// Search box contents. Cleared on a hit, untouched on a miss.
    pub search_query: String,

    /// A search or location request is in flight; input is disabled.
    pub is_loading: bool,

    /// A refresh is in flight; independent of `is_loading`.
    pub is_refreshing: bool,

    /// Most recent user-facing error, or empty. Cleared at the start of
    /// each new attempt.
    pub location_error: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            now: Local::now(),
            selected: directory::default_record().clone(),
            search_query: String::new(),
            is_loading: false,
            is_refreshing: false,
            location_error: String::new(),
        }
    }
}

/// State transitions, either from a key press or from a finished effect.
#[derive(Debug)]
pub enum Action {
    /// One-second clock tick.
    Tick,

    /// Append a character to the search box.
    QueryPush(char),

    /// Delete the last character of the search box.
    QueryPop,

    /// Submit the search box contents.
    SearchSubmit,

    /// Search delay elapsed; resolve `raw` against the directory.
    SearchDidResolve { raw: String },

    /// Ask the platform for the current position.
    LocateRequest,

    /// Position request finished (and, on success, the post-processing
    /// delay elapsed).
    LocateDidFinish(Result<Position, GeoError>),

    /// Start the refresh spinner.
    RefreshRequest,

    /// Refresh delay elapsed.
    RefreshDidFinish,

    /// Leave the application.
    Quit,
}

pub struct App {
    pub state: AppState,
    actions: mpsc::UnboundedSender<Action>,
    delays: Delays,
    locator: Arc<dyn Locator>,
}

impl App {
    pub fn new(
        actions: mpsc::UnboundedSender<Action>,
        delays: Delays,
        locator: Arc<dyn Locator>,
    ) -> Self {
        Self {
            state: AppState::default(),
            actions,
            delays,
            locator,
        }
    }

    /// Apply one action. Returns whether the frame needs redrawing.
    pub fn update(&mut self, action: Action) -> bool {
        debug!(?action, "dispatch");
        match action {
            Action::Tick => {
                self.state.now = Local::now();
                true
            }

            Action::QueryPush(c) => {
                if self.state.is_loading {
                    return false;
                }
                self.state.search_query.push(c);
                true
            }

            Action::QueryPop => {
                if self.state.is_loading {
                    return false;
                }
                self.state.search_query.pop().is_some()
            }

            Action::SearchSubmit => self.submit_search(),
            Action::SearchDidResolve { raw } => self.resolve_search(&raw),
            Action::LocateRequest => self.request_location(),
            Action::LocateDidFinish(result) => self.finish_location(result),
            Action::RefreshRequest => self.start_refresh(),

            Action::RefreshDidFinish => {
                self.state.is_refreshing = false;
                true
            }

            // Handled by the run loop.
            Action::Quit => false,
        }
    }

    /// Search submits are dropped while one is already in flight
    /// (ignore-while-busy), and empty queries are silently ignored.
    fn submit_search(&mut self) -> bool {
        if self.state.is_loading {
            return false;
        }
        if self.state.search_query.trim().is_empty() {
            return false;
        }
        self.state.is_loading = true;
        self.state.location_error.clear();

        // The miss message must echo the query exactly as typed.
        let raw = self.state.search_query.clone();
        let tx = self.actions.clone();
        let delay = self.delays.search;
        task::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(Action::SearchDidResolve { raw });
        });
        true
    }

    fn resolve_search(&mut self, raw: &str) -> bool {
        match directory::lookup(raw) {
            Some(record) => {
                self.state.selected = record.clone();
                self.state.search_query.clear();
            }
            None => {
                self.state.location_error = format!(
                    "Weather data not found for \"{raw}\". \
                     Try \"San Francisco\", \"New York\", or \"London\"."
                );
            }
        }
        self.state.is_loading = false;
        true
    }

    fn request_location(&mut self) -> bool {
        if self.state.is_loading {
            return false;
        }
        self.state.is_loading = true;
        self.state.location_error.clear();

        if !self.locator.supported() {
            self.state.location_error = GEO_UNSUPPORTED_MSG.to_string();
            self.state.is_loading = false;
            return true;
        }

        let locator = Arc::clone(&self.locator);
        let tx = self.actions.clone();
        let delay = self.delays.locate;
        task::spawn(async move {
            let request = task::spawn_blocking(move || locator.current_position());
            let outcome = match timeout(geo::POSITION_TIMEOUT, request).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => {
                    debug!(%join_error, "position request aborted");
                    Err(GeoError::Unavailable)
                }
                Err(_) => Err(GeoError::Timeout),
            };
            if outcome.is_ok() {
                // Stands in for reverse geocoding and a weather fetch.
                sleep(delay).await;
            }
            let _ = tx.send(Action::LocateDidFinish(outcome));
        });
        true
    }

    fn finish_location(&mut self, result: Result<Position, GeoError>) -> bool {
        match result {
            // The coordinates are deliberately unused: coordinate-to-weather
            // resolution is a placeholder, and the default record stands in.
            Ok(_position) => {
                self.state.selected = directory::default_record().clone();
            }
            Err(error) => {
                debug!(%error, "position request failed");
                self.state.location_error = GEO_FAILED_MSG.to_string();
            }
        }
        self.state.is_loading = false;
        true
    }

    /// Refresh only animates the spinner; the selected record is untouched.
    fn start_refresh(&mut self) -> bool {
        if self.state.is_refreshing {
            return false;
        }
        self.state.is_refreshing = true;
        let tx = self.actions.clone();
        let delay = self.delays.refresh;
        task::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(Action::RefreshDidFinish);
        });
        true
    }
}

/// Forward crossterm events into the action loop from a blocking task.
fn spawn_event_poller() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    task::spawn_blocking(move || loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            match event::read() {
                Ok(evt) => {
                    if tx.send(evt).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        } else if tx.is_closed() {
            break;
        }
    });
    rx
}

/// Translate a terminal event into an action, if any.
fn map_event(evt: &Event) -> Option<Action> {
    let Event::Key(key) = evt else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('l') => Some(Action::LocateRequest),
            KeyCode::Char('r') => Some(Action::RefreshRequest),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::SearchSubmit),
        KeyCode::F(5) => Some(Action::RefreshRequest),
        KeyCode::Backspace => Some(Action::QueryPop),
        KeyCode::Char(c) => Some(Action::QueryPush(c)),
        _ => None,
    }
}

/// Drive the dashboard until the user quits.
///
/// The tick interval and the event poller channel live on this stack frame,
/// so both are released on every exit path.
pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    initial: Option<WeatherRecord>,
) -> io::Result<()> {
    let (tx, mut actions) = mpsc::unbounded_channel();
    let mut app = App::new(tx, Delays::default(), Arc::new(geo::TerminalLocator));
    if let Some(record) = initial {
        app.state.selected = record;
    }

    let mut events = spawn_event_poller();
    let mut tick = interval(Duration::from_secs(1));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|f| ui::render(f, &app.state))?;
            dirty = false;
        }

        let action = tokio::select! {
            _ = tick.tick() => Some(Action::Tick),
            evt = events.recv() => match evt {
                Some(evt) => map_event(&evt),
                // Poller gone; nothing further can arrive from the user.
                None => Some(Action::Quit),
            },
            action = actions.recv() => action,
        };

        let Some(action) = action else { continue };
        if matches!(action, Action::Quit) {
            return Ok(());
        }
        dirty = app.update(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoError, Locator, Position};

    struct FixedLocator(Result<Position, GeoError>);

    impl Locator for FixedLocator {
        fn supported(&self) -> bool {
            true
        }

        fn current_position(&self) -> Result<Position, GeoError> {
            self.0.clone()
        }
    }

    fn test_app() -> (App, mpsc::UnboundedReceiver<Action>) {
        test_app_with(Arc::new(geo::TerminalLocator))
    }

    fn test_app_with(locator: Arc<dyn Locator>) -> (App, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(tx, Delays::ZERO, locator), rx)
    }

    fn type_query(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(Action::QueryPush(c));
        }
    }

    #[test]
    fn fresh_state_shows_san_francisco() {
        let (app, _rx) = test_app();
        assert_eq!(app.state.selected.location, "San Francisco, CA");
        assert!(app.state.search_query.is_empty());
        assert!(!app.state.is_loading);
        assert!(!app.state.is_refreshing);
        assert!(app.state.location_error.is_empty());
    }

    #[tokio::test]
    async fn empty_and_whitespace_submits_are_noops() {
        let (mut app, mut rx) = test_app();

        assert!(!app.update(Action::SearchSubmit));
        type_query(&mut app, "   ");
        assert!(!app.update(Action::SearchSubmit));

        assert!(!app.state.is_loading);
        assert!(app.state.location_error.is_empty());
        assert_eq!(app.state.selected.location, "San Francisco, CA");
        assert!(rx.try_recv().is_err(), "no effect should have been spawned");
    }

    #[tokio::test]
    async fn search_hit_swaps_record_and_clears_query() {
        let (mut app, mut rx) = test_app();
        app.state.location_error = "stale error".to_string();

        type_query(&mut app, "london");
        assert!(app.update(Action::SearchSubmit));
        assert!(app.state.is_loading);
        assert!(app.state.location_error.is_empty());

        let resolved = rx.recv().await.unwrap();
        app.update(resolved);

        assert_eq!(app.state.selected.location, "London");
        assert_eq!(app.state.search_query, "");
        assert_eq!(app.state.location_error, "");
        assert!(!app.state.is_loading);
    }

    #[tokio::test]
    async fn search_normalizes_case_and_whitespace() {
        let (mut app, mut rx) = test_app();

        type_query(&mut app, "  NEW YORK  ");
        app.update(Action::SearchSubmit);
        let resolved = rx.recv().await.unwrap();
        app.update(resolved);

        assert_eq!(app.state.selected.location, "New York, NY");
    }

    #[tokio::test]
    async fn search_miss_names_term_and_suggestions() {
        let (mut app, mut rx) = test_app();

        type_query(&mut app, "Atlantis");
        app.update(Action::SearchSubmit);
        let resolved = rx.recv().await.unwrap();
        app.update(resolved);

        let msg = app.state.location_error.clone();
        assert!(msg.contains("Atlantis"), "message must echo the raw query");
        for suggestion in ["San Francisco", "New York", "London"] {
            assert!(msg.contains(suggestion), "message must suggest {suggestion}");
        }
        // The query stays put so the user can correct it.
        assert_eq!(app.state.search_query, "Atlantis");
        assert!(!app.state.is_loading);
        assert_eq!(app.state.selected.location, "San Francisco, CA");
    }

    #[tokio::test]
    async fn submits_are_ignored_while_busy() {
        let (mut app, mut rx) = test_app();

        type_query(&mut app, "london");
        assert!(app.update(Action::SearchSubmit));

        // Typing and re-submitting while loading must change nothing.
        assert!(!app.update(Action::QueryPush('x')));
        assert!(!app.update(Action::QueryPop));
        assert!(!app.update(Action::SearchSubmit));
        assert_eq!(app.state.search_query, "london");

        let resolved = rx.recv().await.unwrap();
        app.update(resolved);
        assert_eq!(app.state.selected.location, "London");
        assert!(
            rx.try_recv().is_err(),
            "only the first submit may spawn an effect"
        );
    }

    #[tokio::test]
    async fn locate_without_capability_fails_fast() {
        let (mut app, mut rx) = test_app();

        assert!(app.update(Action::LocateRequest));
        assert_eq!(app.state.location_error, GEO_UNSUPPORTED_MSG);
        assert!(!app.state.is_loading);
        assert!(rx.try_recv().is_err(), "no position request may be issued");
    }

    #[tokio::test]
    async fn locate_success_substitutes_the_default_record() {
        let position = Position {
            latitude: 51.5,
            longitude: -0.12,
        };
        let (mut app, mut rx) = test_app_with(Arc::new(FixedLocator(Ok(position))));
        app.state.selected = directory::lookup("london").unwrap().clone();

        assert!(app.update(Action::LocateRequest));
        assert!(app.state.is_loading);

        let finished = rx.recv().await.unwrap();
        app.update(finished);

        // Coordinates are discarded; the built-in default stands in.
        assert_eq!(app.state.selected.location, "San Francisco, CA");
        assert!(!app.state.is_loading);
        assert!(app.state.location_error.is_empty());
    }

    #[tokio::test]
    async fn locate_failure_surfaces_the_fixed_message() {
        let (mut app, mut rx) = test_app_with(Arc::new(FixedLocator(Err(GeoError::Denied))));

        app.update(Action::LocateRequest);
        let finished = rx.recv().await.unwrap();
        app.update(finished);

        assert_eq!(app.state.location_error, GEO_FAILED_MSG);
        assert!(!app.state.is_loading);
        assert_eq!(app.state.selected.location, "San Francisco, CA");
    }

    #[tokio::test]
    async fn refresh_toggles_its_flag_and_nothing_else() {
        let (mut app, mut rx) = test_app();
        let before = app.state.selected.clone();

        assert!(app.update(Action::RefreshRequest));
        assert!(app.state.is_refreshing);
        assert!(!app.state.is_loading);

        // Second request while spinning is dropped.
        assert!(!app.update(Action::RefreshRequest));

        let finished = rx.recv().await.unwrap();
        app.update(finished);
        assert!(!app.state.is_refreshing);
        assert_eq!(app.state.selected, before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn tick_restamps_the_clock() {
        let (mut app, _rx) = test_app();
        assert!(app.update(Action::Tick));
    }

    #[test]
    fn keys_map_to_the_expected_actions() {
        use crossterm::event::KeyEvent;

        let esc = Event::Key(KeyEvent::from(KeyCode::Esc));
        assert!(matches!(map_event(&esc), Some(Action::Quit)));

        let enter = Event::Key(KeyEvent::from(KeyCode::Enter));
        assert!(matches!(map_event(&enter), Some(Action::SearchSubmit)));

        let ctrl_l = Event::Key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert!(matches!(map_event(&ctrl_l), Some(Action::LocateRequest)));

        let ctrl_r = Event::Key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(matches!(map_event(&ctrl_r), Some(Action::RefreshRequest)));

        let plain = Event::Key(KeyEvent::from(KeyCode::Char('r')));
        assert!(matches!(map_event(&plain), Some(Action::QueryPush('r'))));
    }
}
