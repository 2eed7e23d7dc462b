use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::config::{EARTH_WINDOW_DAYS, MARS_MAX_ATTEMPTS};
use crate::feed::{FeedOutcome, FeedRequest, PhotoRecord};
use crate::worker::{FetchJob, FetchMsg};

/// The three screens, in tab-bar order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Tab {
    Earth,
    Apod,
    Mars,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Earth, Tab::Apod, Tab::Mars];

    pub fn index(self) -> usize {
        match self {
            Tab::Earth => 0,
            Tab::Apod => 1,
            Tab::Mars => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Earth => "EarthPhoto",
            Tab::Apod => "APOD",
            Tab::Mars => "Rover",
        }
    }

    /// Parse the command-line name of a tab.
    pub fn from_arg(arg: &str) -> Option<Tab> {
        match arg.to_ascii_lowercase().as_str() {
            "earth" => Some(Tab::Earth),
            "apod" => Some(Tab::Apod),
            "mars" | "rover" => Some(Tab::Mars),
            _ => None,
        }
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// What a screen currently shows.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PaneView {
    /// Never shown, nothing requested yet.
    Idle,
    Loading,
    Photo(PhotoRecord),
    /// The fetch worked but found nothing to show.
    Empty,
    /// The fetch failed; holds the error text for the status bar.
    Failed(String),
}

#[derive(Debug)]
pub struct Pane {
    pub view: PaneView,
    /// Generation of the one fetch whose result this pane will accept.
    in_flight: Option<u64>,
}

impl Pane {
    fn new() -> Self {
        Self {
            view: PaneView::Idle,
            in_flight: None,
        }
    }
}

pub struct App {
    pub tab: Tab,
    panes: [Pane; 3],
    /// Local calendar date; the APOD screen can't go past it.
    pub today: NaiveDate,
    /// UTC calendar date, which EPIC dates its listings by. Anchors the
    /// Earth window.
    pub utc_today: NaiveDate,
    /// Date the APOD screen is showing.
    pub apod_date: NaiveDate,
    /// Whether the APOD explanation is shown in full.
    pub show_full: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last fetch status message.
    pub status: String,
    next_generation: u64,
    /// Fetches requested since the main loop last collected them.
    jobs: Vec<FetchJob>,
}

impl App {
    /// Create the app on `tab` and request that tab's data.
    pub fn new(tab: Tab, today: NaiveDate) -> Self {
        let mut app = Self {
            tab,
            panes: [Pane::new(), Pane::new(), Pane::new()],
            today,
            utc_today: today,
            apod_date: today,
            show_full: false,
            quit: false,
            status: "Starting…".into(),
            next_generation: 0,
            jobs: Vec::new(),
        };
        app.select_tab(tab);
        app
    }

    pub fn pane(&self, tab: Tab) -> &Pane {
        &self.panes[tab.index()]
    }

    fn pane_mut(&mut self, tab: Tab) -> &mut Pane {
        &mut self.panes[tab.index()]
    }

    /// Hand over the fetches requested since the last call.
    pub fn take_jobs(&mut self) -> Vec<FetchJob> {
        std::mem::take(&mut self.jobs)
    }

    /// Keep the local and UTC dates in step with the wall clock across
    /// midnight.
    pub fn set_today(&mut self, local: NaiveDate, utc: NaiveDate) {
        self.today = local;
        self.utc_today = utc;
    }

    // -- fetching ------------------------------------------------------------

    fn request(&mut self, tab: Tab) {
        self.next_generation += 1;
        let generation = self.next_generation;

        let request = match tab {
            Tab::Apod => FeedRequest::Apod { date: self.apod_date },
            Tab::Earth => FeedRequest::Earth { today: self.utc_today },
            Tab::Mars => FeedRequest::Mars,
        };

        let pane = self.pane_mut(tab);
        pane.view = PaneView::Loading;
        pane.in_flight = Some(generation);

        self.status = format!("Fetching {}…", tab.label());
        self.jobs.push(FetchJob {
            tab,
            generation,
            request,
        });
    }

    /// Apply a finished fetch.
    ///
    /// Returns `false` and leaves everything untouched if the result belongs
    /// to a fetch that has since been superseded.
    pub fn apply(&mut self, msg: FetchMsg) -> bool {
        let pane = self.pane_mut(msg.tab);
        if pane.in_flight != Some(msg.generation) {
            debug!(
                "Dropping stale {} result (generation {}, expecting {:?})",
                msg.tab.label(),
                msg.generation,
                pane.in_flight
            );
            return false;
        }
        pane.in_flight = None;

        let (view, status) = match msg.result {
            Ok(FeedOutcome::Photo(record)) => {
                let status = format!("Loaded {} for {}", msg.tab.label(), record.date);
                (PaneView::Photo(record), status)
            }
            Ok(FeedOutcome::Empty) => {
                let status = match msg.tab {
                    Tab::Earth => format!("No Earth imagery in the last {EARTH_WINDOW_DAYS} days"),
                    Tab::Mars => format!("No usable rover photo in {MARS_MAX_ATTEMPTS} sols"),
                    Tab::Apod => unreachable!("APOD fetches fail or return a photo"),
                };
                (PaneView::Empty, status)
            }
            Err(e) => {
                let text = e.to_string();
                (PaneView::Failed(text.clone()), format!("Error: {text}"))
            }
        };

        self.pane_mut(msg.tab).view = view;
        self.status = status;
        true
    }

    // -- navigation ----------------------------------------------------------

    /// Switch screens; a screen fetches the first time it is shown.
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if self.pane(tab).view == PaneView::Idle {
            self.request(tab);
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.tab.previous());
    }

    /// Start a new fetch for the current screen.
    pub fn refresh(&mut self) {
        self.request(self.tab);
    }

    pub fn previous_day(&mut self) {
        if self.tab != Tab::Apod {
            return;
        }
        self.apod_date -= Duration::days(1);
        self.show_full = false;
        self.request(Tab::Apod);
    }

    /// Move the APOD screen a day forward, unless it is already on today.
    pub fn next_day(&mut self) {
        if self.tab != Tab::Apod || self.is_on_today() {
            return;
        }
        self.apod_date += Duration::days(1);
        self.show_full = false;
        self.request(Tab::Apod);
    }

    pub fn is_on_today(&self) -> bool {
        self.apod_date >= self.today
    }

    pub fn toggle_explanation(&mut self) {
        if self.tab == Tab::Apod {
            self.show_full = !self.show_full;
        }
    }
}
