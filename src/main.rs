//! flightlist - search flights from the terminal

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flightlist::action::Action;
use flightlist::api::SearchClient;
use flightlist::compare::ComparisonProvider;
use flightlist::components::{
    AirlineFilterOverlay, AirlineFilterOverlayProps, AppLayout, Component, ResultsList,
    ResultsListProps, SearchFormPanel, SearchFormPanelProps, app_view, render_collapsed,
    render_status_bar,
};
use flightlist::config::{self, Settings};
use flightlist::effect::Effect;
use flightlist::form::SearchForm;
use flightlist::logging;
use flightlist::reducer::reducer;
use flightlist::state::{AppState, Focus, LOADING_TICK_MS, Viewport};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{error, info, warn};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

static CLIENT: OnceLock<SearchClient> = OnceLock::new();

/// flightlist - flight search TUI
#[derive(Parser, Debug)]
#[command(name = "flightlist")]
#[command(about = "Search flights from the terminal")]
struct Args {
    /// Origin: airport, city or country code
    #[arg(long, short)]
    from: Option<String>,

    /// Destination: airport, city or country code
    #[arg(long, short)]
    to: Option<String>,

    /// Country code used when the origin is empty
    #[arg(long)]
    country: Option<String>,

    /// Currency the search starts with
    #[arg(long)]
    currency: Option<String>,

    /// Config file (defaults to <config dir>/flightlist/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comparison link shown with each flight
    #[arg(long, value_enum)]
    comparison: Option<ComparisonProvider>,

    /// Search as soon as the app starts
    #[arg(long)]
    search: bool,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum FlightComponentId {
    Form,
    Results,
    Filter,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum FlightContext {
    Form,
    Results,
    Filter,
}

impl EventRoutingState<FlightComponentId, FlightContext> for AppState {
    fn focused(&self) -> Option<FlightComponentId> {
        if self.filter_open {
            return Some(FlightComponentId::Filter);
        }
        match self.focus {
            Focus::Form => Some(FlightComponentId::Form),
            Focus::Results => Some(FlightComponentId::Results),
        }
    }

    fn modal(&self) -> Option<FlightComponentId> {
        if self.filter_open {
            Some(FlightComponentId::Filter)
        } else {
            None
        }
    }

    fn binding_context(&self, id: FlightComponentId) -> FlightContext {
        match id {
            FlightComponentId::Form => FlightContext::Form,
            FlightComponentId::Results => FlightContext::Results,
            FlightComponentId::Filter => FlightContext::Filter,
        }
    }

    fn default_context(&self) -> FlightContext {
        FlightContext::Form
    }
}

/// Settings file, then environment, then command line
fn resolve_settings(args: &Args) -> io::Result<Settings> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => config::config_path().map_err(io::Error::other)?,
    };
    let mut settings = config::load_settings(&path).with_env_overrides();

    if let Some(country) = &args.country {
        settings.country = Some(country.trim().to_ascii_uppercase());
    }
    if let Some(currency) = &args.currency {
        settings.currency = Some(currency.trim().to_ascii_uppercase());
    }
    if let Some(comparison) = args.comparison {
        settings.comparison = comparison;
    }
    settings.autostart |= args.search;

    if settings.api_key.is_empty() {
        warn!(
            "No API key configured; set {} or api_key in the config file",
            config::API_KEY_ENV
        );
    }
    Ok(settings)
}

fn initial_state(args: &Args, settings: &Settings, client: &SearchClient) -> AppState {
    let today = chrono::Local::now().date_naive();
    let mut form = SearchForm::new(
        today,
        settings.initial_currency(),
        settings.currencies.clone(),
    );
    if let Some(from) = &args.from {
        form.from = from.trim().to_string();
    }
    if let Some(to) = &args.to {
        form.to = to.trim().to_string();
    }

    let mut state = AppState::new(today, form);
    state.country = settings.country.clone();
    state.comparison = settings.comparison;
    state.notify_pages = client.can_notify();
    if let Ok((width, height)) = crossterm::terminal::size() {
        state.viewport = Viewport { width, height };
    }
    state
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let log_path = logging::init()?;
    info!("flightlist starting, logging to {:?}", log_path);

    let settings = resolve_settings(&args)?;
    info!("Searching against {}", settings.api_url);
    let client = SearchClient::new(
        settings.api_url.clone(),
        settings.api_key.clone(),
        settings.generate_url.clone(),
    );
    let state = initial_state(&args, &settings, &client);
    if CLIENT.set(client).is_err() {
        warn!("Search client was already initialised");
    }
    let init_action = settings.autostart.then_some(Action::SearchSubmit);

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move { Ok::<AppState, io::Error>(state) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, init_action, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    info!("flightlist exiting");
    Ok(())
}

struct FlightUi {
    form: SearchFormPanel,
    results: ResultsList,
    filter: AirlineFilterOverlay,
}

impl FlightUi {
    fn new() -> Self {
        Self {
            form: SearchFormPanel,
            results: ResultsList,
            filter: AirlineFilterOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<FlightComponentId>,
    ) {
        let layout = AppLayout::new(area, state);
        let focused = render_ctx.is_focused() && !state.filter_open;

        event_ctx.set_component_area(FlightComponentId::Form, layout.form);
        if layout.form_collapsed(state) {
            render_collapsed(frame, layout.form, "Search", app_view::form_summary(state));
        } else {
            let props = SearchFormPanelProps {
                form: &state.form,
                cursor: state.form_cursor,
                today: state.today,
                is_focused: focused && state.focus == Focus::Form,
            };
            self.form.render(frame, layout.form, props);
        }

        event_ctx.set_component_area(FlightComponentId::Results, layout.results);
        if layout.results_collapsed(state) {
            render_collapsed(
                frame,
                layout.results,
                "Flights",
                app_view::results_summary(state),
            );
        } else {
            let props = ResultsListProps {
                state,
                is_focused: focused && state.focus == Focus::Results,
            };
            self.results.render(frame, layout.results, props);
        }

        render_status_bar(frame, layout.status, state);

        self.filter.set_open(state.filter_open);
        if state.filter_open {
            event_ctx.set_component_area(FlightComponentId::Filter, area);
            let props = AirlineFilterOverlayProps {
                filter: &state.filter,
                cursor: state.filter_cursor,
                is_focused: render_ctx.is_focused(),
            };
            self.filter.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&FlightComponentId::Filter);
        }
    }

    fn handle_form_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = SearchFormPanelProps {
            form: &state.form,
            cursor: state.form_cursor,
            today: state.today,
            is_focused: true,
        };
        let actions: Vec<_> = self.form.handle_event(event, props).into_iter().collect();
        respond(actions)
    }

    fn handle_results_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = ResultsListProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .results
            .handle_event(event, props)
            .into_iter()
            .collect();
        respond(actions)
    }

    fn handle_filter_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.filter.set_open(state.filter_open);
        let props = AirlineFilterOverlayProps {
            filter: &state.filter,
            cursor: state.filter_cursor,
            is_focused: true,
        };
        let actions: Vec<_> = self.filter.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

/// Keys that work everywhere, plus terminal resizes
fn global_event(event: &EventKind) -> HandlerResponse<Action> {
    let action = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Tab => Some(Action::UiFocusNext),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            _ => None,
        },
        EventKind::Resize(width, height) => Some(Action::UiTerminalResize(*width, *height)),
        _ => None,
    };
    match action {
        Some(action) => respond(vec![action]),
        None => HandlerResponse::ignored(),
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    init_action: Option<Action>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(FlightUi::new()));
    let mut bus: EventBus<AppState, Action, FlightComponentId, FlightContext> = EventBus::new();
    let keybindings: Keybindings<FlightContext> = Keybindings::new();

    let ui_form = Rc::clone(&ui);
    bus.register(FlightComponentId::Form, move |event, state| {
        ui_form.borrow_mut().handle_form_event(&event.kind, state)
    });

    let ui_results = Rc::clone(&ui);
    bus.register(FlightComponentId::Results, move |event, state| {
        ui_results
            .borrow_mut()
            .handle_results_event(&event.kind, state)
    });

    let ui_filter = Rc::clone(&ui);
    bus.register(FlightComponentId::Filter, move |event, state| {
        ui_filter
            .borrow_mut()
            .handle_filter_event(&event.kind, state)
    });

    bus.register_global(|event, _state| global_event(&event.kind));

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            init_action,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    let Some(client) = CLIENT.get() else {
        error!("Search client is not initialised, dropping {:?}", effect);
        return;
    };

    match effect {
        Effect::SearchFlights { id, criteria } => {
            // A newer search replaces the one in flight
            ctx.tasks().spawn("search", async move {
                match client.search(&criteria).await {
                    Ok(response) => Action::SearchDidLoad { id, response },
                    Err(e) => Action::SearchDidError {
                        id,
                        error: e.to_string(),
                    },
                }
            });
        }
        Effect::LoadLogos { codes } => {
            for code in codes {
                let key = format!("logo_{code}");
                ctx.tasks().spawn(TaskKey::new(key), async move {
                    match client.fetch_logo(&code).await {
                        Ok(tile) => Action::LogoDidLoad { code, tile },
                        Err(e) => Action::LogoDidError {
                            code,
                            error: e.to_string(),
                        },
                    }
                });
            }
        }
        Effect::NotifyPage { page } => {
            ctx.tasks().spawn("notify", async move {
                match client.notify_page(&page).await {
                    Ok(filename) => Action::PageNotifyDidComplete(filename),
                    Err(e) => Action::PageNotifyDidError(e.to_string()),
                }
            });
        }
    }
}
