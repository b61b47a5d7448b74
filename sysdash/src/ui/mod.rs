//! UI module root: frame layout, panel dispatch, and click hit-testing.

pub mod cpu;
pub mod disks;
pub mod header;
pub mod interfaces;
pub mod load;
pub mod mem;
pub mod net;
pub mod pages;
pub mod processes;
pub mod scroll;
pub mod services;
pub mod tasks;
pub mod theme;
pub mod toast;
pub mod util;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::dashboard::{ClickTarget, Dashboard, Focus, View};
use crate::router::Page;
use crate::ui::util::contains;

/// Panel rectangles from the last frame, used to route mouse events.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    pub nav: Vec<(Rect, Option<&'static str>)>,
    pub processes: Option<Rect>,
    pub services: Option<Rect>,
    pub tasks: Option<Rect>,
    pub form: Option<Rect>,
}

pub fn draw(f: &mut ratatui::Frame<'_>, dash: &Dashboard, base_url: &str) -> LayoutCache {
    let area = f.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let host = dash
        .metrics
        .snapshot
        .as_ref()
        .map(|m| m.host.host_name.as_str());
    header::draw_header(f, rows[0], dash.view, host, base_url);
    let mut cache = LayoutCache {
        nav: header::nav_rects(rows[0]),
        ..Default::default()
    };

    match dash.view {
        View::Home => pages::draw_home(f, rows[1]),
        View::Page(Page::Dashboard) => draw_dashboard(f, rows[1], dash, &mut cache),
        View::Page(page) => pages::draw_placeholder(f, rows[1], page),
    }

    f.render_widget(
        Paragraph::new(footer_hint(dash)).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
    toast::draw_toasts(f, rows[1], &dash.notifications);
    cache
}

fn footer_hint(dash: &Dashboard) -> &'static str {
    match (dash.view, dash.focus) {
        (View::Page(Page::Dashboard), Focus::TaskForm) => {
            "type to edit | Tab next field | Enter schedule | Esc leave form"
        }
        (View::Page(Page::Dashboard), Focus::Services) => {
            "↑↓ service | ←→ action | Enter run | Tab next panel | q quit"
        }
        (View::Page(Page::Dashboard), Focus::Tasks) => {
            "↑↓ task | d delete | n new task | Tab next panel | q quit"
        }
        (View::Page(Page::Dashboard), Focus::Processes) => {
            "↑↓ PgUp PgDn scroll | c/m/o sort | Tab next panel | q quit"
        }
        _ => "0-3 navigate | x dismiss | q quit",
    }
}

fn draw_dashboard(f: &mut ratatui::Frame<'_>, area: Rect, dash: &Dashboard, cache: &mut LayoutCache) {
    let m = dash.metrics.snapshot.as_ref();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(8),
            Constraint::Length(9),
        ])
        .split(area);

    let gauges = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    mem::draw_mem(f, gauges[0], m);
    disks::draw_disk(f, gauges[1], m);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ])
        .split(rows[1]);
    cpu::draw_cpu(f, charts[0], &dash.metrics.cpu_hist, m);
    net::draw_net(f, charts[1], m, &dash.metrics.rx_hist, &dash.metrics.tx_hist);
    load::draw_load(f, charts[2], m);

    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(rows[2]);
    processes::draw_processes(
        f,
        mid[0],
        m,
        dash.metrics.procs_scroll,
        dash.metrics.procs_sort,
        dash.focus == Focus::Processes,
    );
    services::draw_services(f, mid[1], &dash.services, dash.focus == Focus::Services);
    interfaces::draw_interfaces(f, mid[2], m.map(|mm| &mm.network_interfaces));

    let bottom = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(rows[3]);
    tasks::draw_tasks(f, bottom[0], &dash.tasks, dash.focus == Focus::Tasks);
    tasks::draw_task_form(f, bottom[1], &dash.form, dash.focus == Focus::TaskForm);

    cache.processes = Some(mid[0]);
    cache.services = Some(mid[1]);
    cache.tasks = Some(bottom[0]);
    cache.form = Some(bottom[1]);
}

/// Resolve a left click to what it landed on.
pub fn hit_test(cache: &LayoutCache, dash: &Dashboard, column: u16, row: u16) -> Option<ClickTarget> {
    if let Some((_, marker)) = cache.nav.iter().find(|(r, _)| contains(*r, column, row)) {
        return Some(ClickTarget::Nav(*marker));
    }
    if dash.view != View::Page(Page::Dashboard) {
        return None;
    }
    if let Some(area) = cache.services.filter(|a| contains(*a, column, row)) {
        return services::button_hit(area, &dash.services, column, row)
            .map(|(row, action)| ClickTarget::ServiceButton { row, action });
    }
    if let Some(area) = cache.tasks.filter(|a| contains(*a, column, row)) {
        return tasks::delete_hit(area, &dash.tasks, column, row).map(|row| ClickTarget::TaskDelete { row });
    }
    if let Some(area) = cache.form.filter(|a| contains(*a, column, row)) {
        return tasks::form_hit(area, column, row);
    }
    if let Some(area) = cache.processes.filter(|a| contains(*a, column, row)) {
        return processes::sort_hit(area, column, row).map(ClickTarget::ProcessSort);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Fetched;
    use crate::dashboard::{ApiEvent, Command, Payload};
    use crate::poll::{Endpoint, PollIntervals};
    use crate::types::{MetricsSnapshot, ServiceEntry, ServicesPayload, TaskEntry, TasksPayload};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn buffer_text(term: &Terminal<TestBackend>) -> String {
        let buf = term.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn loaded_dashboard() -> Dashboard {
        let now = Instant::now();
        let mut d = Dashboard::new(PollIntervals::default());
        for cmd in d.navigate(Some("dashboard"), now) {
            let Command::Fetch(ticket) = cmd else { continue };
            let payload = match ticket.endpoint {
                Endpoint::Metrics => {
                    let mut m = MetricsSnapshot::default();
                    m.host.uptime = 90_061;
                    m.memory.used_percent = 42.5;
                    m.network.bytes_recv = 1536;
                    Payload::Metrics(m)
                }
                Endpoint::Services => {
                    let mut s = ServicesPayload::new();
                    s.insert(
                        "1".into(),
                        ServiceEntry {
                            name: "nginx".into(),
                            status: "STARTED".into(),
                        },
                    );
                    Payload::Services(s)
                }
                Endpoint::Tasks => {
                    let mut t = TasksPayload::new();
                    t.insert(
                        "4".into(),
                        TaskEntry {
                            id: 4,
                            description: "rotate".into(),
                            is_finished: true,
                            run_time: None,
                        },
                    );
                    Payload::Tasks(t)
                }
            };
            d.apply(
                ApiEvent::Polled {
                    ticket,
                    result: Ok(Fetched::Data(payload)),
                },
                now,
            );
        }
        d
    }

    #[test]
    fn dashboard_renders_panels() {
        let dash = loaded_dashboard();
        let mut term = Terminal::new(TestBackend::new(160, 48)).unwrap();
        term.draw(|f| {
            draw(f, &dash, "http://127.0.0.1:8080/");
        })
        .unwrap();
        let text = buffer_text(&term);
        assert!(text.contains("Service: nginx"));
        assert!(text.contains("Status: STARTED"));
        assert!(text.contains("[Install] [Start] [Stop] [Reload] [Uninstall]"));
        assert!(text.contains("Description: rotate  Finished? true"));
        assert!(text.contains("Uptime: 1d 1h 1m 1s"));
        assert!(text.contains("Bytes Received: 1.5 KB"));
        assert!(text.contains("Schedule New Task"));
    }

    #[test]
    fn placeholder_page_shows_its_text() {
        let mut dash = Dashboard::new(PollIntervals::default());
        dash.navigate(Some("firewall"), Instant::now());
        let mut term = Terminal::new(TestBackend::new(100, 20)).unwrap();
        term.draw(|f| {
            draw(f, &dash, "http://x/");
        })
        .unwrap();
        assert!(buffer_text(&term).contains("Page with firewall logic is under development"));
    }

    #[test]
    fn clicks_route_to_nav_and_buttons() {
        let dash = loaded_dashboard();
        let mut term = Terminal::new(TestBackend::new(160, 48)).unwrap();
        let mut cache = LayoutCache::default();
        term.draw(|f| cache = draw(f, &dash, "http://x/")).unwrap();

        let (home, marker) = cache.nav[0];
        assert_eq!(marker, None);
        assert_eq!(hit_test(&cache, &dash, home.x, home.y), Some(ClickTarget::Nav(None)));
        let (dash_tab, _) = cache.nav[1];
        assert_eq!(
            hit_test(&cache, &dash, dash_tab.x + 2, dash_tab.y),
            Some(ClickTarget::Nav(Some("dashboard")))
        );

        let svc = cache.services.unwrap();
        // first card's button line, first button
        let target = hit_test(&cache, &dash, svc.x + 3, svc.y + 3);
        assert!(matches!(target, Some(ClickTarget::ServiceButton { row: 0, .. })));

        let tasks = cache.tasks.unwrap();
        let x = tasks.x + tasks.width - 3;
        assert_eq!(
            hit_test(&cache, &dash, x, tasks.y + 1),
            Some(ClickTarget::TaskDelete { row: 0 })
        );
    }
}
