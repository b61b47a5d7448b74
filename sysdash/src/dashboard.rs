//! Dashboard state: the current view, the panels' data and the rules that
//! turn user input and API responses into new state plus commands.
//!
//! Nothing in here performs I/O. Requests are returned as [`Command`]s for
//! the runtime to execute, and their results come back as [`ApiEvent`]s.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::{Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::api::Fetched;
use crate::error::{handle_fetch_error, DashError, ErrorDisposition};
use crate::form::{FormField, TaskForm};
use crate::history::{push_capped, RateTracker};
use crate::notify::{Notification, Notifications};
use crate::poll::{Endpoint, PollIntervals, PollTicket, Scheduler};
use crate::router::{route, Page, Route};
use crate::types::{
    MetricsSnapshot, NewTaskRequest, ServiceAction, ServicesPayload, TasksPayload,
};
use crate::ui::processes::ProcSortBy;
use crate::ui::scroll::scroll_handle_key;
use crate::ui::services::{service_rows, ServiceRow};
use crate::ui::tasks::{task_rows, TaskRow};

const HISTORY_CAP: usize = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Root/landing view; also where expired sessions end up.
    Home,
    Page(Page),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Processes,
    Services,
    Tasks,
    TaskForm,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Processes => Focus::Services,
            Focus::Services => Focus::Tasks,
            Focus::Tasks => Focus::TaskForm,
            Focus::TaskForm => Focus::Processes,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Processes => Focus::TaskForm,
            Focus::Services => Focus::Processes,
            Focus::Tasks => Focus::Services,
            Focus::TaskForm => Focus::Tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Metrics(MetricsSnapshot),
    Services(ServicesPayload),
    Tasks(TasksPayload),
}

/// A write the user asked for; reported back once the server answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    ServiceAction { name: String, action: ServiceAction },
    CreateTask,
    DeleteTask(u64),
}

impl Mutation {
    pub fn context(&self) -> String {
        match self {
            Mutation::ServiceAction { name, action } => {
                format!("service action {action} for {name}")
            }
            Mutation::CreateTask => "new task".to_string(),
            Mutation::DeleteTask(id) => format!("remove task {id}"),
        }
    }

    /// Endpoint holding the canonical state this mutation changed.
    pub fn refreshes(&self) -> Endpoint {
        match self {
            Mutation::ServiceAction { .. } => Endpoint::Services,
            Mutation::CreateTask | Mutation::DeleteTask(_) => Endpoint::Tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(PollTicket),
    ServiceAction { name: String, action: ServiceAction },
    CreateTask(NewTaskRequest),
    DeleteTask(u64),
    Quit,
}

#[derive(Debug)]
pub enum ApiEvent {
    Polled {
        ticket: PollTicket,
        result: Result<Fetched<Payload>, DashError>,
    },
    Mutated {
        mutation: Mutation,
        /// Scheduler generation when the mutation was issued.
        generation: u64,
        result: Result<Fetched<()>, DashError>,
    },
}

/// What a mouse click landed on, as resolved by the layout hit-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Nav(Option<&'static str>),
    ServiceButton { row: usize, action: ServiceAction },
    TaskDelete { row: usize },
    FormInput(FormField),
    ScheduleButton,
    ProcessSort(ProcSortBy),
}

#[derive(Debug, Default)]
pub struct MetricsPanel {
    pub snapshot: Option<MetricsSnapshot>,
    pub cpu_hist: VecDeque<u64>,
    pub rx_hist: VecDeque<u64>,
    pub tx_hist: VecDeque<u64>,
    rx_rate: RateTracker,
    tx_rate: RateTracker,
    pub procs_scroll: usize,
    pub procs_sort: ProcSortBy,
}

impl MetricsPanel {
    /// Replace the snapshot wholesale and extend the derived histories.
    pub fn update(&mut self, m: MetricsSnapshot, now: Instant) {
        let cpu = m.cpu.usage.clamp(0.0, 100.0).round() as u64;
        push_capped(&mut self.cpu_hist, cpu, HISTORY_CAP);
        let rx = self.rx_rate.sample(m.network.bytes_recv, now);
        let tx = self.tx_rate.sample(m.network.bytes_sent, now);
        push_capped(&mut self.rx_hist, rx, HISTORY_CAP);
        push_capped(&mut self.tx_hist, tx, HISTORY_CAP);
        self.snapshot = Some(m);
    }

    fn clear(&mut self) {
        let sort = self.procs_sort;
        *self = Self::default();
        self.procs_sort = sort;
    }
}

#[derive(Debug, Default)]
pub struct ServicesPanel {
    /// `None` until the first successful poll.
    pub rows: Option<Vec<ServiceRow>>,
    pub selected: usize,
    pub action: usize,
}

impl ServicesPanel {
    fn set(&mut self, rows: Vec<ServiceRow>) {
        self.selected = self.selected.min(rows.len().saturating_sub(1));
        self.rows = Some(rows);
    }

    pub fn row(&self, idx: usize) -> Option<&ServiceRow> {
        self.rows.as_ref().and_then(|r| r.get(idx))
    }

    fn len(&self) -> usize {
        self.rows.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Default)]
pub struct TasksPanel {
    pub rows: Option<Vec<TaskRow>>,
    pub selected: usize,
}

impl TasksPanel {
    fn set(&mut self, rows: Vec<TaskRow>) {
        self.selected = self.selected.min(rows.len().saturating_sub(1));
        self.rows = Some(rows);
    }

    pub fn row(&self, idx: usize) -> Option<&TaskRow> {
        self.rows.as_ref().and_then(|r| r.get(idx))
    }

    fn len(&self) -> usize {
        self.rows.as_ref().map_or(0, Vec::len)
    }
}

pub struct Dashboard {
    pub view: View,
    pub focus: Focus,
    pub scheduler: Scheduler,
    pub notifications: Notifications,
    pub metrics: MetricsPanel,
    pub services: ServicesPanel,
    pub tasks: TasksPanel,
    pub form: TaskForm,
    /// Visible process rows, updated after each draw; used as the page size.
    pub procs_viewport: usize,
}

impl Dashboard {
    pub fn new(intervals: PollIntervals) -> Self {
        Self {
            view: View::Home,
            focus: Focus::default(),
            scheduler: Scheduler::new(intervals),
            notifications: Notifications::default(),
            metrics: MetricsPanel::default(),
            services: ServicesPanel::default(),
            tasks: TasksPanel::default(),
            form: TaskForm::default(),
            procs_viewport: 10,
        }
    }

    /// Activate the nav element carrying `marker`.
    pub fn navigate(&mut self, marker: Option<&str>, now: Instant) -> Vec<Command> {
        match route(marker) {
            Route::RedirectRoot => {
                self.go_root();
                Vec::new()
            }
            Route::Render(Page::Dashboard) => {
                self.view = View::Page(Page::Dashboard);
                self.reset_panels();
                self.scheduler.activate(now);
                self.tick(now)
            }
            Route::Render(page) => {
                self.view = View::Page(page);
                self.scheduler.deactivate();
                self.reset_panels();
                Vec::new()
            }
        }
    }

    /// Back to the landing view; anything in flight becomes stale.
    pub fn go_root(&mut self) {
        tracing::info!("returning to root view");
        self.view = View::Home;
        self.scheduler.deactivate();
        self.reset_panels();
        self.form.clear();
    }

    fn reset_panels(&mut self) {
        self.metrics.clear();
        self.services = ServicesPanel::default();
        self.tasks = TasksPanel::default();
        self.focus = Focus::default();
    }

    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        self.notifications.expire(now);
        self.scheduler
            .due(now)
            .into_iter()
            .map(Command::Fetch)
            .collect()
    }

    pub fn apply(&mut self, event: ApiEvent, now: Instant) -> Vec<Command> {
        match event {
            ApiEvent::Polled { ticket, result } => {
                let endpoint = ticket.endpoint;
                if !self.scheduler.complete(ticket) {
                    tracing::debug!(?ticket, "discarding stale response");
                    return Vec::new();
                }
                match result {
                    Ok(Fetched::Redirected) => {
                        self.go_root();
                        return Vec::new();
                    }
                    Ok(Fetched::Data(payload)) => self.render(payload, now),
                    Err(e) => {
                        if self.on_error(&e, endpoint.context(), now) {
                            return Vec::new();
                        }
                    }
                }
                self.scheduler
                    .take_queued(endpoint)
                    .map(Command::Fetch)
                    .into_iter()
                    .collect()
            }
            ApiEvent::Mutated {
                mutation,
                generation,
                result,
            } => {
                if generation != self.scheduler.generation() {
                    // Issued before the last navigation: only server rejections
                    // are reported.
                    tracing::debug!(?mutation, "mutation settled after navigation");
                    if let Err(e) = result {
                        if let ErrorDisposition::Notify(note) =
                            handle_fetch_error(&e, &mutation.context())
                        {
                            self.notifications.push(note, now);
                        }
                    }
                    return Vec::new();
                }
                match result {
                    Ok(Fetched::Redirected) => {
                        self.go_root();
                        Vec::new()
                    }
                    Ok(Fetched::Data(())) => {
                        if mutation == Mutation::CreateTask {
                            self.form.clear();
                        }
                        let note = Notification::info(format!("{} accepted", mutation.context()));
                        self.notifications.push(note, now);
                        self.scheduler
                            .request_now(mutation.refreshes())
                            .map(Command::Fetch)
                            .into_iter()
                            .collect()
                    }
                    Err(e) => {
                        self.on_error(&e, &mutation.context(), now);
                        Vec::new()
                    }
                }
            }
        }
    }

    fn render(&mut self, payload: Payload, now: Instant) {
        match payload {
            Payload::Metrics(m) => self.metrics.update(m, now),
            Payload::Services(s) => self.services.set(service_rows(&s)),
            Payload::Tasks(t) => self.tasks.set(task_rows(&t)),
        }
    }

    /// Returns `true` when the error sent us back to root.
    fn on_error(&mut self, err: &DashError, context: &str, now: Instant) -> bool {
        match handle_fetch_error(err, context) {
            ErrorDisposition::RedirectRoot => {
                self.go_root();
                true
            }
            ErrorDisposition::Notify(note) => {
                self.notifications.push(note, now);
                false
            }
        }
    }

    fn on_dashboard(&self) -> bool {
        self.view == View::Page(Page::Dashboard)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Command> {
        self.handle_key_in(key, &Local, now)
    }

    /// Key handling with an explicit time zone for the schedule input.
    pub fn handle_key_in<Tz: TimeZone>(
        &mut self,
        key: KeyEvent,
        tz: &Tz,
        now: Instant,
    ) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Command::Quit];
        }
        if self.on_dashboard() && self.focus == Focus::TaskForm {
            return self.form_key(key, tz, now);
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return vec![Command::Quit],
            KeyCode::Char('0') => return self.navigate(None, now),
            KeyCode::Char('1') => return self.navigate(Some(Page::Dashboard.marker()), now),
            KeyCode::Char('2') => return self.navigate(Some(Page::Firewall.marker()), now),
            KeyCode::Char('3') => return self.navigate(Some(Page::Settings.marker()), now),
            KeyCode::Char('x') => {
                self.notifications.dismiss();
                return Vec::new();
            }
            _ => {}
        }
        if !self.on_dashboard() {
            return Vec::new();
        }
        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Char('n') => self.focus = Focus::TaskForm,
            _ => match self.focus {
                Focus::Processes => self.processes_key(key),
                Focus::Services => return self.services_key(key),
                Focus::Tasks => return self.tasks_key(key),
                Focus::TaskForm => {}
            },
        }
        Vec::new()
    }

    fn processes_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') => self.metrics.procs_sort = ProcSortBy::CpuDesc,
            KeyCode::Char('m') => self.metrics.procs_sort = ProcSortBy::MemDesc,
            KeyCode::Char('o') => self.metrics.procs_sort = ProcSortBy::Payload,
            _ => {
                let total = self
                    .metrics
                    .snapshot
                    .as_ref()
                    .map_or(0, |m| m.processes.len());
                scroll_handle_key(
                    &mut self.metrics.procs_scroll,
                    key,
                    self.procs_viewport.max(1),
                    total,
                );
            }
        }
    }

    fn services_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let n = self.services.len();
        match key.code {
            KeyCode::Up => self.services.selected = self.services.selected.saturating_sub(1),
            KeyCode::Down => {
                self.services.selected = (self.services.selected + 1).min(n.saturating_sub(1))
            }
            KeyCode::Left => self.services.action = self.services.action.saturating_sub(1),
            KeyCode::Right => {
                self.services.action = (self.services.action + 1).min(ServiceAction::ALL.len() - 1)
            }
            KeyCode::Enter => {
                let action = ServiceAction::ALL[self.services.action];
                return self.service_command(self.services.selected, action);
            }
            _ => {}
        }
        Vec::new()
    }

    fn tasks_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let n = self.tasks.len();
        match key.code {
            KeyCode::Up => self.tasks.selected = self.tasks.selected.saturating_sub(1),
            KeyCode::Down => self.tasks.selected = (self.tasks.selected + 1).min(n.saturating_sub(1)),
            KeyCode::Char('d') | KeyCode::Delete => return self.delete_command(self.tasks.selected),
            _ => {}
        }
        Vec::new()
    }

    fn form_key<Tz: TimeZone>(&mut self, key: KeyEvent, tz: &Tz, now: Instant) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Tasks,
            KeyCode::Tab | KeyCode::BackTab => self.form.next_field(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => return self.submit_form(tz, now),
            KeyCode::Char(c) => self.form.insert_char(c),
            _ => {}
        }
        Vec::new()
    }

    /// Validate the form; only a valid form produces a request.
    pub fn submit_form<Tz: TimeZone>(&mut self, tz: &Tz, now: Instant) -> Vec<Command> {
        match self.form.validate(tz) {
            Ok(req) => vec![Command::CreateTask(req)],
            Err(e) => {
                self.notifications.push(Notification::warning(e.to_string()), now);
                Vec::new()
            }
        }
    }

    /// Delegated handler for the services panel: resolve the row's id.
    fn service_command(&self, row: usize, action: ServiceAction) -> Vec<Command> {
        match self.services.row(row) {
            Some(r) => vec![Command::ServiceAction {
                name: r.name.clone(),
                action,
            }],
            None => Vec::new(),
        }
    }

    /// Delegated handler for the tasks panel.
    fn delete_command(&self, row: usize) -> Vec<Command> {
        match self.tasks.row(row) {
            Some(r) => vec![Command::DeleteTask(r.id)],
            None => Vec::new(),
        }
    }

    pub fn handle_click(&mut self, target: ClickTarget, now: Instant) -> Vec<Command> {
        match target {
            ClickTarget::Nav(marker) => self.navigate(marker, now),
            ClickTarget::ServiceButton { row, action } => {
                self.focus = Focus::Services;
                self.services.selected = row;
                if let Some(i) = ServiceAction::ALL.iter().position(|a| *a == action) {
                    self.services.action = i;
                }
                self.service_command(row, action)
            }
            ClickTarget::TaskDelete { row } => {
                self.focus = Focus::Tasks;
                self.tasks.selected = row;
                self.delete_command(row)
            }
            ClickTarget::FormInput(field) => {
                self.focus = Focus::TaskForm;
                self.form.field = field;
                Vec::new()
            }
            ClickTarget::ScheduleButton => self.submit_form(&Local, now),
            ClickTarget::ProcessSort(sort) => {
                self.metrics.procs_sort = sort;
                Vec::new()
            }
        }
    }
}
