// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Draws the route on a braille canvas (ratatui + crossterm) and drives playback from the frame
//! clock: every loop iteration feeds the elapsed wall-clock time into the controller.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::layout::{CellMetrics, LayoutMode, LayoutOptions, LayoutState, SurfaceError};
use crate::model::Route;
use crate::playback::{PlaybackController, PlaybackPhase};
use crate::render::{build_scene, format_km, RenderMode};

mod canvas;
mod theme;

use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MIN_SPEED: f64 = 0.125;
const MAX_SPEED: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TuiOptions {
    pub layout_mode: LayoutMode,
    pub render_mode: RenderMode,
    pub layout: LayoutOptions,
    pub pad: f64,
    pub speed: f64,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::Geographic,
            render_mode: RenderMode::Progressive,
            layout: LayoutOptions::default(),
            pad: 40.0,
            speed: 1.0,
        }
    }
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(route: Route, options: TuiOptions) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut app = App::new(route, options, theme)?;
    let mut terminal = TerminalSession::new()?;

    let mut last_frame = Instant::now();
    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(FRAME_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                // The next draw notices the new canvas size and relays out.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        let now = Instant::now();
        app.tick(now.duration_since(last_frame).as_secs_f64() * 1000.0);
        last_frame = now;
    }

    Ok(())
}

struct App {
    route: Route,
    options: TuiOptions,
    theme: TuiTheme,
    metrics: CellMetrics,
    mode: LayoutMode,
    render_mode: RenderMode,
    layout: Option<LayoutState>,
    playback: PlaybackController,
    canvas_area: Rect,
    surface_error: Option<SurfaceError>,
    dragging: Option<usize>,
    toast: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(route: Route, options: TuiOptions, theme: TuiTheme) -> Result<Self, Box<dyn Error>> {
        let mut playback = PlaybackController::new(&route);
        playback.set_speed(options.speed)?;
        Ok(Self {
            mode: options.layout_mode,
            render_mode: options.render_mode,
            metrics: canvas::cell_metrics(),
            layout: None,
            playback,
            canvas_area: Rect::default(),
            surface_error: None,
            dragging: None,
            toast: None,
            should_quit: false,
            route,
            options,
            theme,
        })
    }

    /// Recomputes the layout for a new canvas size. A first call, or one after an unusable size,
    /// computes from scratch in the current mode.
    fn relayout(&mut self, area: Rect) {
        self.canvas_area = area;
        self.dragging = None;
        let surface = match canvas::surface_for(area, self.options.pad) {
            Ok(surface) => surface,
            Err(err) => {
                log::warn!("canvas {}x{} unusable: {err}", area.width, area.height);
                self.surface_error = Some(err);
                self.layout = None;
                return;
            }
        };
        self.surface_error = None;

        if let Some(layout) = self.layout.as_mut() {
            layout.resize(&self.route, surface, &self.metrics);
            return;
        }
        self.layout = Some(LayoutState::compute(
            &self.route,
            surface,
            self.mode,
            self.options.layout.clone(),
            &self.metrics,
        ));
    }

    fn tick(&mut self, dt_ms: f64) {
        if self.render_mode == RenderMode::Static {
            return;
        }
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        for event in self.playback.advance(dt_ms, layout) {
            log::debug!("playback event {event:?}");
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.toast = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                if self.render_mode == RenderMode::Static {
                    self.toast = Some("playback is off in the static view".to_owned());
                } else {
                    self.playback.toggle();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.scale_speed(2.0),
            KeyCode::Char('-') | KeyCode::Char('_') => self.scale_speed(0.5),
            KeyCode::Char('u') => self.toggle_layout(),
            KeyCode::Char('r') => self.playback.reset(),
            KeyCode::Char('v') => {
                self.render_mode = match self.render_mode {
                    RenderMode::Progressive => RenderMode::Static,
                    RenderMode::Static => RenderMode::Progressive,
                };
                self.dragging = None;
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.render_mode != RenderMode::Static {
            return;
        }
        let Some(layout) = self.layout.as_mut() else {
            return;
        };
        let point = canvas::cell_to_point(self.canvas_area, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dragging = point.and_then(|point| canvas::hit_test(layout, point));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let (Some(index), Some(point)) = (self.dragging, point) {
                    layout.drag_node(index, point);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = None,
            _ => {}
        }
    }

    fn scale_speed(&mut self, factor: f64) {
        let next = (self.playback.speed() * factor).clamp(MIN_SPEED, MAX_SPEED);
        if let Err(err) = self.playback.set_speed(next) {
            self.toast = Some(err.to_string());
        }
    }

    fn toggle_layout(&mut self) {
        self.mode = self.mode.toggled();
        if let Some(layout) = self.layout.as_mut() {
            layout.set_mode(&self.route, self.mode, &self.metrics);
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (main_area, status_area) = (rows[0], rows[1]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(canvas_title(app))
        .style(app.theme.base_style());
    let inner = block.inner(main_area);
    if inner != app.canvas_area {
        app.relayout(inner);
    }

    match app.layout.as_ref() {
        Some(layout) => {
            let scene = build_scene(&app.route, layout, &app.playback, app.render_mode);
            frame.render_widget(canvas::route_canvas(&scene, &app.theme, block), main_area);
        }
        None => {
            let message = match app.surface_error {
                Some(err) => format!("Terminal too small to draw the route: {err}"),
                None => "Preparing layout…".to_owned(),
            };
            let paragraph = Paragraph::new(message)
                .style(app.theme.error_style())
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, main_area);
        }
    }

    frame.render_widget(Paragraph::new(footer_line(app)), status_area);
}

fn canvas_title(app: &App) -> String {
    let mode = app.layout.as_ref().map_or(app.mode, LayoutState::mode);
    let stops = app.route.len();
    format!(" Tourline · {stops} stops · {} · {} ", mode.as_str(), app.render_mode.as_str())
}

fn footer_line(app: &App) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    if app.render_mode == RenderMode::Progressive {
        let phase = match app.playback.phase() {
            PlaybackPhase::Playing => "pause",
            PlaybackPhase::Finished => "done",
            PlaybackPhase::Idle | PlaybackPhase::Paused => "play",
        };
        push_footer_entry(&mut spans, phase, "space");
        push_footer_entry(&mut spans, "speed", &format!("{}x +/-", app.playback.speed()));
        push_footer_entry(&mut spans, "reset", "r");
        let traveled = app.playback.traveled_km(&app.route);
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::raw(format!(
            "{} / {}",
            format_km(traveled),
            format_km(app.route.total_km())
        )));
    } else {
        push_footer_entry(&mut spans, "drag", "mouse");
    }
    push_footer_entry(&mut spans, "uniform", "u");
    push_footer_entry(&mut spans, "view", "v");
    push_footer_entry(&mut spans, "quit", "q");

    if let Some(toast) = app.toast.as_deref() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::raw(toast.to_owned()));
    }
    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, key: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(format!("{label}:"), Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(key.to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
