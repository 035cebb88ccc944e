//! The interactive session as a finite-state dispatcher.
//!
//! Each call to [`Session::handle`] takes one line of user input, runs at
//! most one resolver call, and returns the new screen plus the lines to
//! show. The session owns the cache store and flushes it exactly once, on
//! the first exit (an `exit` command or end of input).

use tracing::{debug, warn};

use crate::api::{PlacesLookup, SiteDirectory};
use crate::cache::CacheStore;
use crate::models::{NearbyPlace, SiteRecord, StateName};
use crate::resolver::{ResolveError, Resolver, Source};

const EXIT_COMMAND: &str = "exit";
const BACK_COMMAND: &str = "back";

const STATE_PROMPT: &str = "Enter a state name (e.g. Michigan, michigan) or \"exit\": ";
const SITE_PROMPT: &str = "Choose the number for detail search or \"exit\" or \"back\": ";

/// Width of the rule around the site list header
const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    ChoosingState,
    ViewingSiteList { state: StateName },
    ViewingSiteDetail { state: StateName, ordinal: usize },
    Exited,
}

impl Screen {
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Screen::ChoosingState => Some(STATE_PROMPT),
            Screen::ViewingSiteList { .. } | Screen::ViewingSiteDetail { .. } => Some(SITE_PROMPT),
            Screen::Exited => None,
        }
    }
}

/// Result of handling one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub screen: Screen,
    pub lines: Vec<String>,
    /// True only for the transition that wrote the cache to disk.
    pub flushed: bool,
}

pub struct Session<D, P> {
    store: CacheStore,
    resolver: Resolver<D, P>,
    screen: Screen,
}

impl<D: SiteDirectory, P: PlacesLookup> Session<D, P> {
    pub fn new(store: CacheStore, resolver: Resolver<D, P>) -> Self {
        Self {
            store,
            resolver,
            screen: Screen::ChoosingState,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn resolver(&self) -> &Resolver<D, P> {
        &self.resolver
    }

    /// Resolve the state index up front. Failure is reported, not fatal;
    /// the next state name entered retries it.
    pub async fn start(&mut self) -> Vec<String> {
        match self.resolver.state_index(&mut self.store).await {
            Ok(resolved) => vec![source_line(resolved.source).to_string()],
            Err(e) => vec![error_line(&e)],
        }
    }

    pub async fn handle(&mut self, input: &str) -> Transition {
        if self.screen == Screen::Exited {
            return self.stay(Vec::new());
        }

        let command = input.trim().to_lowercase();
        if command == EXIT_COMMAND {
            return self.exit();
        }

        match self.screen.clone() {
            Screen::ChoosingState => self.choose_state(&command).await,
            Screen::ViewingSiteList { state } | Screen::ViewingSiteDetail { state, .. } => {
                self.choose_site(state, &command).await
            }
            Screen::Exited => self.stay(Vec::new()),
        }
    }

    /// End of input. Behaves like `exit`.
    pub fn finish(&mut self) -> Transition {
        if self.screen == Screen::Exited {
            return self.stay(Vec::new());
        }
        self.exit()
    }

    async fn choose_state(&mut self, name: &str) -> Transition {
        let index = match self.resolver.state_index(&mut self.store).await {
            Ok(resolved) => resolved.value,
            Err(e) => return self.stay(vec![error_line(&e)]),
        };

        let state = StateName::new(name);
        if !index.contains(&state) {
            debug!(input = name, "Unknown state name");
            return self.stay(vec!["[Error] Enter proper state name".to_string()]);
        }

        match self.resolver.sites(&mut self.store, &state).await {
            Ok(resolved) => {
                let mut lines = vec![source_line(resolved.source).to_string()];
                lines.extend(render_sites(&state, &resolved.value));
                self.move_to(Screen::ViewingSiteList { state }, lines)
            }
            Err(e) => self.stay(vec![error_line(&e)]),
        }
    }

    async fn choose_site(&mut self, state: StateName, command: &str) -> Transition {
        if command == BACK_COMMAND {
            return self.move_to(Screen::ChoosingState, Vec::new());
        }

        let len = self.store.sites(&state).map_or(0, <[SiteRecord]>::len);
        let Some(ordinal) = parse_ordinal(command, len) else {
            return self.stay(vec!["[Error] Invalid input".to_string()]);
        };

        match self.resolver.nearby(&mut self.store, &state, ordinal).await {
            Ok(resolved) => {
                let mut lines = vec![source_line(resolved.source).to_string()];
                lines.extend(render_places(&resolved.value));
                self.move_to(Screen::ViewingSiteDetail { state, ordinal }, lines)
            }
            Err(e) => self.stay(vec![error_line(&e)]),
        }
    }

    /// Flush once and move to `Exited`. A failed flush is reported as a
    /// warning; the session exits regardless.
    fn exit(&mut self) -> Transition {
        let mut lines = Vec::new();
        let flushed = match self.store.flush() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Cache flush failed on exit");
                lines.push(format!("[Warning] Could not save cache: {}", e));
                false
            }
        };
        self.screen = Screen::Exited;
        Transition {
            screen: Screen::Exited,
            lines,
            flushed,
        }
    }

    fn move_to(&mut self, screen: Screen, lines: Vec<String>) -> Transition {
        debug!(from = ?self.screen, to = ?screen, "Screen transition");
        self.screen = screen;
        self.stay(lines)
    }

    fn stay(&self, lines: Vec<String>) -> Transition {
        Transition {
            screen: self.screen.clone(),
            lines,
            flushed: false,
        }
    }
}

/// Accept exactly the strings "1" through `len`.
fn parse_ordinal(command: &str, len: usize) -> Option<usize> {
    let ordinal: usize = command.parse().ok()?;
    (ordinal.to_string() == command && (1..=len).contains(&ordinal)).then_some(ordinal)
}

fn source_line(source: Source) -> &'static str {
    match source {
        Source::Cache => "Using cache",
        Source::Fetched => "Fetching",
    }
}

fn error_line(err: &ResolveError) -> String {
    match err {
        ResolveError::Gateway(_) => {
            format!("[Error] {}. Try again or choose another option.", err)
        }
        _ => format!("[Error] {}", err),
    }
}

pub fn render_sites(state: &StateName, sites: &[SiteRecord]) -> Vec<String> {
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        format!("List of national sites in {}", state),
        rule,
    ];
    lines.extend(
        sites
            .iter()
            .enumerate()
            .map(|(i, site)| format!("[{}] {}", i + 1, site.info())),
    );
    lines
}

pub fn render_places(places: &[NearbyPlace]) -> Vec<String> {
    places.iter().map(NearbyPlace::info).collect()
}
