//! Terminal event loop for the navigator driver.
//!
//! Everything is message-driven: stdin commands, timer expiries, and the
//! frame tick all end up as `Msg` dispatches against the pure core, the
//! same way the browser side would feed DOM events in. The loop is the
//! only place state is touched.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use chatnav_core::{
    update, ElementKey, Msg, NavigatorSettings, NavigatorState, PanelViewModel,
};
use clap::Parser;
use nav_logging::{nav_info, nav_warn};

use super::commands::{self, Command};
use super::effects::{profile_settings, EffectRunner};
use super::logging::{self, LogDestination};
use super::session::PageSession;
use super::ui;

/// Frame pulse driving timer checks and render batching.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// How often the session URL is re-read, like the in-page location poller.
const URL_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Sent-message navigator over chat page snapshots.
#[derive(Parser)]
#[command(name = "chatnav")]
#[command(about = "Sent-message navigator over chat page snapshots")]
#[command(version)]
struct Cli {
    /// HTML snapshot of the chat page to open.
    page: PathBuf,

    /// Page URL; picks the platform rule set by hostname.
    #[arg(long, default_value = "https://chat.example.com/session")]
    url: String,

    /// Simulated viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    viewport: f32,

    /// Positional dedup tolerance in pixels.
    #[arg(long, default_value_t = 5.0)]
    position_tolerance: f32,

    /// Directory holding the persisted panel state file.
    #[arg(long, default_value = ".")]
    state_dir: PathBuf,

    /// Where log lines go.
    #[arg(long, value_enum, default_value = "file")]
    log: LogDestination,

    /// Log at debug level instead of info.
    #[arg(long)]
    verbose: bool,
}

enum DriverEvent {
    Core(Msg),
    Command(Command),
}

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    let html = fs::read_to_string(&cli.page)
        .with_context(|| format!("reading page snapshot {:?}", cli.page))?;
    chatnav_engine::ensure_state_dir(&cli.state_dir)
        .with_context(|| format!("preparing state directory {:?}", cli.state_dir))?;
    let session = PageSession::open(cli.url, html, cli.state_dir, cli.viewport);

    let settings = NavigatorSettings {
        position_tolerance: cli.position_tolerance,
        ..NavigatorSettings::default()
    };
    let state = NavigatorState::with_settings(profile_settings(session.profile()), settings);

    let (event_tx, event_rx) = mpsc::channel::<DriverEvent>();
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_ticker(event_tx.clone());
    spawn_input_reader(event_tx);

    let mut driver = Driver::new(state, EffectRunner::new(session, msg_tx), msg_rx);
    driver.bootstrap();

    loop {
        match event_rx.recv() {
            Ok(DriverEvent::Core(msg)) => driver.dispatch(msg),
            Ok(DriverEvent::Command(command)) => {
                if driver.handle_command(command) == Flow::Quit {
                    break;
                }
            }
            Err(_) => break,
        }
        driver.turn();
    }

    nav_info!("Driver exiting");
    Ok(())
}

struct Driver {
    state: NavigatorState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    next_url_poll: Instant,
}

impl Driver {
    fn new(state: NavigatorState, runner: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            state,
            runner,
            msg_rx,
            next_url_poll: Instant::now() + URL_POLL_INTERVAL,
        }
    }

    /// Replays the persisted panel state and announces the page, the same
    /// two steps the content side runs on injection.
    fn bootstrap(&mut self) {
        if let Some(collapsed) = self.runner.session().load_collapsed() {
            self.dispatch(Msg::CollapsedLoaded(collapsed));
        }
        let url = self.runner.session().url().to_string();
        self.dispatch(Msg::PageReady { url });
        self.turn();
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        if let Some(view) = view {
            print_lines(&ui::render::render(&view));
        }
    }

    /// One housekeeping turn: expire due timers, drain engine messages,
    /// poll the URL on cadence.
    fn turn(&mut self) {
        let tracked: Vec<ElementKey> = self
            .state
            .messages()
            .iter()
            .map(|message| message.key.clone())
            .collect();
        self.runner.run_due(&tracked);

        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }

        if Instant::now() >= self.next_url_poll {
            self.next_url_poll += URL_POLL_INTERVAL;
            let url = self.runner.session().url().to_string();
            if self.state.url().is_some_and(|current| current != url) {
                nav_info!("Conversation switched to {}", url);
            }
            self.dispatch(Msg::UrlPolled(url));
        }
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Scroll(offset) => {
                self.runner.session_mut().scroll_to(offset);
                let scroll_top = self.runner.session().scroll_top();
                let viewport_height = self.runner.session().viewport_height();
                self.dispatch(Msg::ViewportScrolled {
                    scroll_top,
                    viewport_height,
                });
            }
            Command::Click(index) => self.dispatch(Msg::RowClicked { index }),
            Command::Toggle => self.dispatch(Msg::ToggleCollapsed),
            Command::Append(path) => match fs::read_to_string(&path) {
                Ok(fragment) => {
                    self.runner.session_mut().append_fragment(&fragment);
                    self.dispatch(Msg::MutationObserved);
                }
                Err(err) => nav_warn!("Cannot read fragment {:?}: {}", path, err),
            },
            Command::Goto { url, page } => {
                let page = match page {
                    Some(path) => match fs::read_to_string(&path) {
                        Ok(html) => Some(html),
                        Err(err) => {
                            nav_warn!("Cannot read page {:?}: {}", path, err);
                            return Flow::Continue;
                        }
                    },
                    None => None,
                };
                self.runner.session_mut().navigate(url, page);
            }
            Command::Panel => print_lines(&ui::render::render(&self.state.view())),
            Command::Dump => println!("{}", dump_view(&self.state.view())),
            Command::Wait(_) => {}
            Command::Help => println!("{}", commands::HELP),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}

fn spawn_ticker(event_tx: mpsc::Sender<DriverEvent>) {
    thread::spawn(move || {
        while event_tx.send(DriverEvent::Core(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

/// Parses stdin lines into commands. `wait` is serviced here so scripted
/// input can pace itself without stalling the driver's timers. EOF quits,
/// so piped scripts terminate cleanly.
fn spawn_input_reader(event_tx: mpsc::Sender<DriverEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match commands::parse(&line) {
                Ok(Some(Command::Wait(pause))) => thread::sleep(pause),
                Ok(Some(command)) => {
                    if event_tx.send(DriverEvent::Command(command)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{message}"),
            }
        }
        let _ = event_tx.send(DriverEvent::Command(Command::Quit));
    });
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn dump_view(view: &PanelViewModel) -> String {
    let rows: Vec<_> = view
        .rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "index": row.index,
                "label": row.label,
                "path": row.key.path(),
            })
        })
        .collect();
    serde_json::json!({
        "collapsed": view.collapsed,
        "active_index": view.active_index,
        "rows": rows,
    })
    .to_string()
}
