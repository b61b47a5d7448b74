//! Terminal runtime: input handling, executing dashboard commands against
//! the API, and drawing.

use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    cursor::Show,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;

use crate::api::{ApiClient, Fetched};
use crate::dashboard::{ApiEvent, Command, Dashboard, Mutation, Payload};
use crate::error::DashError;
use crate::poll::{Endpoint, PollIntervals};
use crate::ui::{self, processes, scroll::scroll_handle_mouse, LayoutCache};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the closure when dropped.
struct OnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        (self.0)()
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "failed to leave raw mode");
    }
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen, Show) {
        tracing::warn!(error = %e, "failed to restore terminal");
    }
}

pub struct App {
    api: ApiClient,
    dash: Dashboard,
    events_tx: UnboundedSender<ApiEvent>,
    events_rx: UnboundedReceiver<ApiEvent>,
    layout: LayoutCache,
    should_quit: bool,
}

impl App {
    pub fn new(api: ApiClient, intervals: PollIntervals) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            dash: Dashboard::new(intervals),
            events_tx,
            events_rx,
            layout: LayoutCache::default(),
            should_quit: false,
        }
    }

    /// Take over the terminal until the user quits. `page` is the target
    /// marker to open first; `None` starts on the root view.
    pub async fn run(&mut self, page: Option<&str>) -> anyhow::Result<()> {
        if let Some(marker) = page {
            let cmds = self.dash.navigate(Some(marker), Instant::now());
            self.execute_all(cmds);
        }

        enable_raw_mode()?;
        // Restores on every exit, including when this future is dropped
        // mid-await (ctrl-c racing `run` in a select).
        let _restore = OnDrop(restore_terminal);
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        self.event_loop(&mut terminal).await
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        let base = self.api.base_url().to_string();
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                let now = Instant::now();
                let cmds = match event::read()? {
                    Event::Key(k) => self.dash.handle_key(k, now),
                    Event::Mouse(m) => self.on_mouse(m, now),
                    _ => Vec::new(),
                };
                self.execute_all(cmds);
            }

            // Finished requests
            while let Ok(ev) = self.events_rx.try_recv() {
                let cmds = self.dash.apply(ev, Instant::now());
                self.execute_all(cmds);
            }

            let cmds = self.dash.tick(Instant::now());
            self.execute_all(cmds);

            if self.should_quit {
                break;
            }

            let dash = &self.dash;
            let mut layout = LayoutCache::default();
            terminal.draw(|f| layout = ui::draw(f, dash, &base))?;
            if let Some(area) = layout.processes {
                self.dash.procs_viewport = processes::viewport_rows(area).max(1);
            }
            self.layout = layout;

            sleep(FRAME_INTERVAL).await;
        }
        Ok(())
    }

    fn on_mouse(&mut self, m: MouseEvent, now: Instant) -> Vec<Command> {
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match ui::hit_test(&self.layout, &self.dash, m.column, m.row) {
                    Some(target) => self.dash.handle_click(target, now),
                    None => Vec::new(),
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(area) = self.layout.processes {
                    let total = self
                        .dash
                        .metrics
                        .snapshot
                        .as_ref()
                        .map_or(0, |mm| mm.processes.len());
                    scroll_handle_mouse(
                        &mut self.dash.metrics.procs_scroll,
                        m,
                        area,
                        processes::viewport_rows(area),
                        total,
                    );
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn execute_all(&mut self, cmds: Vec<Command>) {
        for cmd in cmds {
            self.execute(cmd);
        }
    }

    /// Requests run on their own tasks and report back over the channel.
    fn execute(&mut self, cmd: Command) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        let generation = self.dash.scheduler.generation();
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::Fetch(ticket) => {
                tracing::debug!(endpoint = ?ticket.endpoint, seq = ticket.seq, "poll");
                tokio::spawn(async move {
                    let result = fetch(&api, ticket.endpoint).await;
                    let _ = tx.send(ApiEvent::Polled { ticket, result });
                });
            }
            Command::ServiceAction { name, action } => {
                tracing::info!(%name, %action, "service action");
                tokio::spawn(async move {
                    let result = api.perform_service_action(&name, action).await;
                    let mutation = Mutation::ServiceAction { name, action };
                    let _ = tx.send(ApiEvent::Mutated {
                        mutation,
                        generation,
                        result,
                    });
                });
            }
            Command::CreateTask(req) => {
                tracing::info!(description = %req.description, run_time = %req.run_time, "schedule task");
                tokio::spawn(async move {
                    let result = api.schedule_task(&req).await;
                    let _ = tx.send(ApiEvent::Mutated {
                        mutation: Mutation::CreateTask,
                        generation,
                        result,
                    });
                });
            }
            Command::DeleteTask(id) => {
                tracing::info!(id, "remove task");
                tokio::spawn(async move {
                    let result = api.remove_task(id).await;
                    let _ = tx.send(ApiEvent::Mutated {
                        mutation: Mutation::DeleteTask(id),
                        generation,
                        result,
                    });
                });
            }
        }
    }
}

pub async fn fetch(api: &ApiClient, endpoint: Endpoint) -> Result<Fetched<Payload>, DashError> {
    Ok(match endpoint {
        Endpoint::Metrics => api.metrics().await?.map(Payload::Metrics),
        Endpoint::Services => api.services().await?.map(Payload::Services),
        Endpoint::Tasks => api.tasks().await?.map(Payload::Tasks),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn guard_runs_when_its_future_is_cancelled() {
        let restored = Arc::new(AtomicBool::new(false));
        let flag = restored.clone();
        let held = async move {
            let _restore = OnDrop(move || flag.store(true, Ordering::SeqCst));
            std::future::pending::<()>().await;
        };
        tokio::select! {
            _ = held => unreachable!(),
            _ = tokio::time::sleep(Duration::from_millis(5)) => {}
        }
        assert!(restored.load(Ordering::SeqCst));
    }
}
