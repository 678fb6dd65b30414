use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::api::TripApi;
use crate::model::FieldConfig;

use super::action::Action;
use super::error::AppError;
use super::screens::{
    HelpState, TripCreateState, TripListState, draw_help, draw_trip_create, draw_trip_list,
};
use super::task::{ApiEvent, SubmitOutcome, Tasks};
use super::widgets::{Notifications, draw_notification};

/// How long the loop waits for a key before checking backend results.
const TICK: Duration = Duration::from_millis(100);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Existing trips.
    TripList,
    /// The new-trip form.
    TripCreate,
    /// Show keybinding help.
    Help,
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    trip_list: TripListState,
    trip_create: TripCreateState,
    help: HelpState,
    notifications: Notifications,
    tasks: Tasks,
    events: UnboundedReceiver<ApiEvent>,
    /// Number of times the create form has been opened.
    visits: u64,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` on the [`Screen::TripList`] screen.
    ///
    /// Backend requests are spawned on `runtime`; nothing is fetched until
    /// [`App::run`] starts.
    pub fn new(fields: FieldConfig, api: TripApi, runtime: Handle, ttl: Duration) -> Self {
        let (tasks, events) = Tasks::new(api, runtime);
        Self {
            screen: Screen::TripList,
            trip_list: TripListState::new(&fields),
            trip_create: TripCreateState::new(fields),
            help: HelpState::new(),
            notifications: Notifications::new(ttl),
            tasks,
            events,
            visits: 0,
            should_quit: false,
        }
    }

    /// Main event loop: draw → poll key → dispatch → drain backend results.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        self.navigate(Screen::TripList);
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }
            self.drain_events();
            self.notifications.expire(Instant::now());
        }
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let [main, bar] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        match self.screen {
            Screen::TripList => draw_trip_list(&self.trip_list, frame, main),
            Screen::TripCreate => draw_trip_create(&self.trip_create, frame, main),
            Screen::Help => draw_help(&self.help, frame, main),
        }
        draw_notification(&self.notifications, frame, bar);
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::F(1) {
            if self.screen != Screen::Help {
                self.help.open(self.screen);
                self.screen = Screen::Help;
            }
            return;
        }

        let action = match self.screen {
            Screen::TripList => self.trip_list.handle_key(key),
            Screen::TripCreate => self.trip_create.handle_key(key),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => self.navigate(screen),
            Action::SubmitTrip(payload) => {
                info!(fields = payload.len(), "submitting trip");
                self.tasks.submit_trip(payload);
            }
            Action::ReloadTrips => self.reload_trips(),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Switches screens. Leaving help returns to its origin untouched; any
    /// other arrival starts that screen afresh.
    fn navigate(&mut self, screen: Screen) {
        let leaving_help = self.screen == Screen::Help;
        self.screen = screen;
        if leaving_help {
            return;
        }
        match screen {
            Screen::TripList => self.reload_trips(),
            Screen::TripCreate => {
                self.visits += 1;
                self.trip_create.reset(self.visits);
                self.tasks.load_routes(self.visits);
            }
            Screen::Help => {}
        }
    }

    fn reload_trips(&mut self) {
        self.trip_list.begin_loading();
        self.tasks.load_trips();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_api_event(event);
        }
    }

    fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::RoutesLoaded { visit, result } => match result {
                Ok(routes) => {
                    if !self.trip_create.set_routes(visit, routes) {
                        debug!(visit, current = self.visits, "dropping stale routes");
                    }
                }
                Err(_) => debug!(visit, "route selector left empty"),
            },
            ApiEvent::TripsLoaded(result) => self.trip_list.set_trips(result),
            ApiEvent::TripSubmitted(outcome) => {
                self.notifications.push(outcome.notification());
                if outcome == SubmitOutcome::Created {
                    self.screen = Screen::TripList;
                    self.reload_trips();
                }
            }
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
