//! TUI module - setup, plan, focus and history screens with ratatui

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Gauge, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};
use std::io::{stdout, Stdout};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crate::db::{KeyValueStore, Theme};
use crate::exercises::BodyPart;
use crate::metronome::Metronome;
use crate::session::{DeleteRequest, SessionController, SessionEvent, TimerMode};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const BEAT_FLASH: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Setup,
    Plan,
    Focus,
    History,
}

struct Palette {
    accent: Color,
    text: Color,
    muted: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::Cyan,
                text: Color::White,
                muted: Color::DarkGray,
            },
            Theme::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                muted: Color::Gray,
            },
        }
    }
}

/// App state for TUI
pub struct App<S: KeyValueStore> {
    controller: SessionController<S>,
    events: Receiver<SessionEvent>,
    metronome: Metronome,
    view: View,
    plan_list: ListState,
    history_list: ListState,
    pending_delete: Option<DeleteRequest>,
    beat_until: Option<Instant>,
    status: String,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(mut controller: SessionController<S>) -> Self {
        let events = controller.subscribe();
        Self {
            controller,
            events,
            metronome: Metronome::new(),
            view: View::Setup,
            plan_list: ListState::default(),
            history_list: ListState::default(),
            pending_delete: None,
            beat_until: None,
            status: String::new(),
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.controller.tick(now);
            self.drive_metronome(now);
            self.drain_events();

            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn drive_metronome(&mut self, now: Instant) {
        let playing = self.view == View::Focus && self.controller.timer_state().running;
        self.metronome.follow(playing, now);
        if !self.metronome.poll(now).is_empty() {
            self.beat_until = Some(now + BEAT_FLASH);
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::PlanReady(plan) => {
                    self.status = format!("Plan ready: {} exercises", plan.len());
                    self.plan_list.select(Some(0));
                    self.view = View::Plan;
                }
                SessionEvent::SessionFinished(record) => {
                    self.status = format!("Session saved ({}% completed)", record.completed_rate);
                    self.view = View::Setup;
                }
                SessionEvent::HistoryChanged { len } => {
                    if len == 0 {
                        self.history_list.select(None);
                    } else if self.history_list.selected().is_some_and(|i| i >= len) {
                        self.history_list.select(Some(len - 1));
                    }
                }
                SessionEvent::ThemeChanged(theme) => {
                    self.status = format!("Theme: {}", theme.as_str());
                }
                SessionEvent::Focus(_) => {}
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let palette = Palette::for_theme(self.controller.theme());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = match self.view {
            View::Setup => "今日訓練",
            View::Plan => "訓練菜單",
            View::Focus => "專注模式",
            View::History => "歷史紀錄",
        };
        let header = Paragraph::new(format!("🏐 fitfocus - {}", title))
            .style(Style::default().fg(palette.accent).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        match self.view {
            View::Setup => self.render_setup(frame, chunks[1], &palette),
            View::Plan => self.render_plan(frame, chunks[1], &palette),
            View::Focus => self.render_focus(frame, chunks[1], &palette),
            View::History => self.render_history(frame, chunks[1], &palette),
        }

        let keys = match self.view {
            View::Setup => "1-6: parts | +/-: minutes | enter: generate | h: history | t: theme | q: quit",
            View::Plan => "↑↓: select | enter: focus | esc: setup | q: quit",
            View::Focus => "space: start/pause | r: rest | s: resume | c: done | x: finish | m: mute | [ ]: bpm | esc: plan",
            View::History => "↑↓: select | d: delete | esc: back",
        };
        let footer_text = if self.pending_delete.is_some() {
            "Delete this record? y: yes | n: no".to_string()
        } else if self.status.is_empty() {
            keys.to_string()
        } else {
            format!("{} | {}", self.status, keys)
        };
        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(palette.muted))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn render_setup(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let setup = self.controller.setup();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(3)])
            .split(area);

        let items: Vec<ListItem> = BodyPart::selectable()
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let selected = setup.is_selected(*part);
                let marker = if selected { "[x]" } else { "[ ]" };
                let style = if selected {
                    Style::default().fg(palette.accent).bold()
                } else {
                    Style::default().fg(palette.text)
                };
                ListItem::new(format!("{} {} {} {}", i + 1, marker, part.icon(), part.label())).style(style)
            })
            .collect();
        let parts = List::new(items).block(Block::default().borders(Borders::ALL).title("訓練部位"));
        frame.render_widget(parts, chunks[0]);

        let minutes = Paragraph::new(format!("◀ {} MINUTES ▶", setup.minutes()))
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.text).bold())
            .block(Block::default().borders(Borders::ALL).title("訓練時間"));
        frame.render_widget(minutes, chunks[1]);
    }

    fn render_plan(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let Some(plan) = self.controller.plan() else {
            return;
        };
        let rows: Vec<Row> = plan
            .exercises
            .iter()
            .enumerate()
            .map(|(i, ex)| {
                let style = if i == self.controller.active_index() {
                    Style::default().fg(palette.accent)
                } else {
                    Style::default().fg(palette.text)
                };
                Row::new(vec![
                    Cell::from(format!("{:02}", i + 1)),
                    Cell::from(format!("{} {}", ex.category.emoji(), ex.category.label())),
                    Cell::from(format!("{} {}", ex.emoji, ex.name)),
                    Cell::from(ex.prescription.unwrap_or("Duration based")),
                ])
                .style(style)
            })
            .collect();

        let title = format!("{} min · {} exercises", plan.total_duration, plan.len());
        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(12),
                Constraint::Min(24),
                Constraint::Length(14),
            ],
        )
        .header(Row::new(vec!["#", "Phase", "Exercise", "Target"]).style(Style::default().bold()))
        .row_highlight_style(Style::default().reversed())
        .block(Block::default().borders(Borders::ALL).title(title));

        let mut state = ratatui::widgets::TableState::default().with_selected(self.plan_list.selected());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_focus(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let Some(snapshot) = self.controller.snapshot() else {
            return;
        };
        let timer = snapshot.timer;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let ratio = (snapshot.index + 1) as f64 / snapshot.total.max(1) as f64;
        let progress = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(palette.accent))
            .ratio(ratio.min(1.0))
            .label(format!("{}/{}", snapshot.index + 1, snapshot.total));
        frame.render_widget(progress, chunks[0]);

        let big = match timer.lead_in {
            Some(n) => format!("{}", n),
            None => timer.clock(),
        };
        let label = if timer.resting {
            "RESTING"
        } else if timer.lead_in.is_some() {
            "GET READY"
        } else if timer.is_done() {
            "TIME UP"
        } else if timer.running {
            "WORKING"
        } else {
            "PAUSED"
        };
        let mode = match timer.mode {
            TimerMode::Countdown => "countdown",
            TimerMode::Stopwatch => "stopwatch",
        };
        let ex = snapshot.exercise;
        let body = vec![
            Line::from(format!("{} {}", ex.emoji, ex.name)).bold(),
            Line::from(format!("目標: {}", ex.prescription.unwrap_or("-"))),
            Line::from(""),
            Line::from(big).style(Style::default().fg(palette.accent).bold()),
            Line::from(format!("{} · {}", label, mode)).style(Style::default().fg(palette.muted)),
        ];
        let focus = Paragraph::new(body)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(ex.category.label()));
        frame.render_widget(focus, chunks[1]);

        let beat_on = self.beat_until.is_some_and(|until| Instant::now() < until);
        let metronome = Paragraph::new(format!(
            "{} {:.1}Hz ({} bpm){}",
            if beat_on { "●" } else { "○" },
            self.metronome.hz(),
            self.metronome.bpm(),
            if self.metronome.is_muted() { " muted" } else { "" }
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Metronome"));
        frame.render_widget(metronome, chunks[2]);

        let next = self
            .controller
            .plan()
            .and_then(|p| p.get(snapshot.index + 1))
            .map(|e| format!("Next: {} {}", e.emoji, e.name))
            .unwrap_or_else(|| "Last exercise".to_string());
        frame.render_widget(
            Paragraph::new(next)
                .style(Style::default().fg(palette.muted))
                .block(Block::default().borders(Borders::ALL)),
            chunks[3],
        );
    }

    fn render_history(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let records = self.controller.history().records();
        let rows: Vec<Row> = records
            .iter()
            .map(|r| {
                let parts: Vec<_> = r.parts.iter().map(|p| p.label()).collect();
                Row::new(vec![
                    Cell::from(r.date.format("%Y-%m-%d %H:%M").to_string()),
                    Cell::from(format!("{} min", r.duration)),
                    Cell::from(parts.join(", ")),
                    Cell::from(format!("{}%", r.completed_rate)),
                ])
                .style(Style::default().fg(palette.text))
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(17),
                Constraint::Length(8),
                Constraint::Min(20),
                Constraint::Length(6),
            ],
        )
        .header(Row::new(vec!["Date", "Time", "Parts", "Done"]).style(Style::default().bold()))
        .row_highlight_style(Style::default().reversed())
        .block(Block::default().borders(Borders::ALL).title(format!("{} sessions", records.len())));

        let mut state = ratatui::widgets::TableState::default().with_selected(self.history_list.selected());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if self.pending_delete.is_some() {
                self.handle_confirm(key.code);
                return Ok(());
            }
            match self.view {
                View::Setup => self.handle_setup(key.code),
                View::Plan => self.handle_plan(key.code),
                View::Focus => self.handle_focus(key.code),
                View::History => self.handle_history(key.code),
            }
        }
        Ok(())
    }

    fn handle_setup(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                if let Some(part) = BodyPart::selectable().get(index) {
                    self.controller.setup_mut().toggle_part(*part);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                self.controller.setup_mut().increase_minutes();
            }
            KeyCode::Char('-') | KeyCode::Left => self.controller.setup_mut().decrease_minutes(),
            KeyCode::Enter => {
                if !self.controller.setup().can_generate() {
                    self.status = "Pick at least one body part".to_string();
                } else if let Err(e) = self.controller.generate() {
                    self.status = e.to_string();
                }
            }
            KeyCode::Char('h') => self.open_history(),
            KeyCode::Char('t') => {
                self.controller.toggle_theme();
            }
            _ => {}
        }
    }

    fn handle_plan(&mut self, code: KeyCode) {
        let len = self.controller.plan().map_or(0, |p| p.len());
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => select_prev(&mut self.plan_list),
            KeyCode::Down => select_next(&mut self.plan_list, len),
            KeyCode::Enter => {
                let index = self.plan_list.selected();
                match self.controller.focus(index, Instant::now()) {
                    Ok(_) => self.view = View::Focus,
                    Err(e) => self.status = e.to_string(),
                }
            }
            KeyCode::Esc => self.view = View::Setup,
            KeyCode::Char('h') => self.open_history(),
            _ => {}
        }
    }

    fn handle_focus(&mut self, code: KeyCode) {
        let now = Instant::now();
        let result = match code {
            KeyCode::Char(' ') => self.controller.toggle_timer(now).map(|_| ()),
            KeyCode::Char('r') => self.controller.start_rest(now),
            KeyCode::Char('s') => self.controller.end_rest(now).map(|_| ()),
            KeyCode::Char('c') | KeyCode::Enter => self.controller.complete_current(now).map(|_| ()),
            KeyCode::Char('x') => self.controller.finish().map(|_| ()),
            KeyCode::Char('m') => {
                self.metronome.toggle_mute();
                Ok(())
            }
            KeyCode::Char('[') => {
                self.metronome.slower();
                Ok(())
            }
            KeyCode::Char(']') => {
                self.metronome.faster();
                Ok(())
            }
            KeyCode::Esc => {
                self.controller.leave_focus();
                self.plan_list.select(Some(self.controller.active_index()));
                self.view = View::Plan;
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.status = e.to_string();
        }
    }

    fn handle_history(&mut self, code: KeyCode) {
        let len = self.controller.history().len();
        match code {
            KeyCode::Up => select_prev(&mut self.history_list),
            KeyCode::Down => select_next(&mut self.history_list, len),
            KeyCode::Char('d') | KeyCode::Delete => {
                let id = self
                    .history_list
                    .selected()
                    .and_then(|i| self.controller.history().records().get(i))
                    .map(|r| r.id.clone());
                if let Some(id) = id {
                    self.pending_delete = self.controller.request_history_delete(&id);
                }
            }
            KeyCode::Esc => {
                self.view = if self.controller.plan().is_some() { View::Plan } else { View::Setup };
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_confirm(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(request) = self.pending_delete.take() {
                    self.controller.confirm_history_delete(request);
                    self.status = "Record deleted".to_string();
                }
            }
            _ => self.pending_delete = None,
        }
    }

    fn open_history(&mut self) {
        let len = self.controller.history().len();
        self.history_list.select(if len == 0 { None } else { Some(0) });
        self.view = View::History;
    }
}

fn select_prev(state: &mut ListState) {
    let i = state.selected().unwrap_or(0).saturating_sub(1);
    state.select(Some(i));
}

fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = state.selected().map_or(0, |i| (i + 1).min(len - 1));
    state.select(Some(i));
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app() -> App<MemoryStore> {
        let controller =
            SessionController::new(MemoryStore::new(), Box::new(StdRng::seed_from_u64(3))).unwrap();
        App::new(controller)
    }

    #[test]
    fn test_setup_keys_generate_plan() {
        let mut app = app();
        app.handle_setup(KeyCode::Enter);
        assert_eq!(app.view, View::Setup);
        assert!(app.controller.plan().is_none());

        app.handle_setup(KeyCode::Char('1'));
        app.handle_setup(KeyCode::Char('-'));
        app.handle_setup(KeyCode::Enter);
        app.drain_events();

        assert_eq!(app.view, View::Plan);
        assert_eq!(app.controller.plan().unwrap().total_duration, 40);
    }

    #[test]
    fn test_history_delete_asks_first() {
        let mut app = app();
        app.controller.create_session(&[BodyPart::Back], 20).unwrap();
        app.controller.finish().unwrap();
        app.drain_events();

        app.open_history();
        app.handle_history(KeyCode::Char('d'));
        assert!(app.pending_delete.is_some());
        app.handle_confirm(KeyCode::Char('n'));
        assert_eq!(app.controller.history().len(), 1);

        app.handle_history(KeyCode::Char('d'));
        app.handle_confirm(KeyCode::Char('y'));
        assert!(app.controller.history().is_empty());
    }

    #[test]
    fn test_select_bounds() {
        let mut state = ListState::default();
        select_next(&mut state, 3);
        select_next(&mut state, 3);
        select_next(&mut state, 3);
        select_next(&mut state, 3);
        assert_eq!(state.selected(), Some(2));
        select_prev(&mut state);
        select_prev(&mut state);
        select_prev(&mut state);
        assert_eq!(state.selected(), Some(0));
    }
}
