use super::{AppEvent, EventHandler, InputPrompt, PromptKind, TerminalManager};
use crate::audio::{AudioConfig, AudioPlayer, MusicScanner, PlaybackState, SymphoniaDecoder};
use crate::config::Config;
use crate::error::NavigatorError;
use crate::playlist::{Navigator, NavigatorEvent, PlaylistOrder, WindowRow};
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::Path;
use std::time::Duration;
use tokio::{sync::mpsc, time::sleep};
use tracing::{debug, info, warn};

const CURSOR_COLOR: Color = Color::Rgb(0xFF, 0x80, 0x00);
const ROW_COLOR: Color = Color::Rgb(0xCE, 0xCE, 0xCE);
const PLAYING_COLOR: Color = Color::Rgb(0x00, 0xFF, 0x00);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Help,
}

pub struct App {
    config: Config,
    terminal: TerminalManager,
    event_handler: EventHandler,
    audio_player: AudioPlayer,
    decoder: SymphoniaDecoder,

    navigator: Navigator,
    navigator_events: mpsc::UnboundedReceiver<NavigatorEvent>,

    // UI state
    page: Page,
    prompt: Option<InputPrompt>,
    position: (usize, usize),
    total_duration: Option<Duration>,
    status_message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, music_directory: &Path) -> Result<Self> {
        let audio_player = AudioPlayer::new(AudioConfig::from(&config))?;
        let terminal = TerminalManager::new()?;

        let (tx, navigator_events) = mpsc::unbounded_channel();
        let viewport = config.viewport_rows(terminal.height()?);
        let mut navigator = Navigator::new(config.playlist.order, viewport);
        navigator.set_event_sender(tx);

        let scanner = MusicScanner::with_extensions(&config.playlist.extensions);
        let paths = scanner.scan_directory(music_directory)?;
        navigator.set_songs(paths, 0, config.playlist.sort_on_load);

        Ok(Self {
            config,
            terminal,
            event_handler: EventHandler::new(),
            audio_player,
            decoder: SymphoniaDecoder::new(),
            navigator,
            navigator_events,
            page: Page::Home,
            prompt: None,
            position: (0, 0),
            total_duration: None,
            status_message: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        while !self.should_quit {
            self.event_handler.pump(self.prompt.is_some())?;

            while let Some(event) = self.event_handler.try_next() {
                self.handle_event(event).await?;
            }
            self.drain_navigator_events();

            if self.audio_player.is_finished() {
                self.advance_after_finish().await;
                self.drain_navigator_events();
            }

            self.render()?;

            // ~10 FPS is plenty for a track list
            sleep(Duration::from_millis(100)).await;
        }

        self.audio_player.stop();
        Ok(())
    }

    async fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Resize(_, height) => {
                let rows = self.config.viewport_rows(height);
                debug!("terminal resized to {} rows, {} for tracks", height, rows);
                self.navigator.on_viewport_resized(rows);
            }
            AppEvent::ShowHelp => self.page = Page::Help,
            AppEvent::ShowHome => self.page = Page::Home,

            AppEvent::CursorUp => self.navigator.cursor_up(),
            AppEvent::CursorDown => self.navigator.cursor_down(),
            AppEvent::SwapUp => {
                let target = self.navigator.cursor() as isize - 1;
                self.navigator.swap(target).await;
            }
            AppEvent::SwapDown => {
                let target = self.navigator.cursor() as isize + 1;
                self.navigator.swap(target).await;
            }

            AppEvent::Play => {
                let result = self.navigator.confirm_selection().await;
                self.report_selection(result);
            }
            AppEvent::NextSong => {
                let result = self.navigator.play_next().await;
                self.report_selection(result);
            }
            AppEvent::PreviousSong => {
                let result = self.navigator.play_previous().await;
                self.report_selection(result);
            }
            AppEvent::TogglePause => self.audio_player.toggle_pause(),
            AppEvent::SeekBackward => self.navigator.cursor_left(),
            AppEvent::SeekForward => self.navigator.cursor_right(),

            AppEvent::OpenSearch => self.prompt = Some(InputPrompt::search()),
            AppEvent::OpenFilter => {
                self.prompt = Some(InputPrompt::filter(self.navigator.filter_pattern()));
            }
            AppEvent::Input(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.push(c);
                }
                self.apply_live_filter();
            }
            AppEvent::InputBackspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.pop();
                }
                self.apply_live_filter();
            }
            AppEvent::InputSubmit => {
                if let Some(prompt) = self.prompt.take() {
                    if prompt.kind() == PromptKind::Search {
                        if let Err(e) = self.navigator.search(prompt.value()) {
                            self.set_status(&format!("Search failed: {}", e));
                        }
                    }
                }
            }
            AppEvent::InputCancel => {
                if let Some(prompt) = self.prompt.take() {
                    if prompt.kind() == PromptKind::Filter {
                        self.navigator.filter(prompt.previous().unwrap_or_default());
                    }
                }
            }
        }

        Ok(())
    }

    fn apply_live_filter(&mut self) {
        if let Some(prompt) = self.prompt.as_ref().filter(|p| p.kind() == PromptKind::Filter) {
            self.navigator.filter(prompt.value());
        }
    }

    fn report_selection<T>(&mut self, result: Result<T, NavigatorError>) {
        if let Err(NavigatorError::EmptyView) = result {
            self.set_status("Nothing to play");
        }
    }

    fn handle_navigator_event(&mut self, event: NavigatorEvent) {
        match event {
            NavigatorEvent::PositionChanged { cursor, total } => {
                self.position = (cursor, total);
            }
            NavigatorEvent::TrackSelected(track) => {
                self.total_duration = None;
                if let Err(e) = self.audio_player.play_track(&track) {
                    warn!("{}", e);
                    self.set_status(&format!("Cannot play {}", track.name()));
                    return;
                }
                self.status_message = None;

                if let Some(current) = self.navigator.current_track_mut() {
                    match current.duration(&self.decoder) {
                        Ok(seconds) => self.total_duration = Some(Duration::from_secs_f64(seconds)),
                        Err(e) => warn!("No duration for {}: {}", current.name(), e),
                    }
                }
            }
            NavigatorEvent::SeekBackward => self.audio_player.seek_backward(),
            NavigatorEvent::SeekForward => self.audio_player.seek_forward(),
        }
    }

    fn drain_navigator_events(&mut self) {
        while let Ok(event) = self.navigator_events.try_recv() {
            self.handle_navigator_event(event);
        }
    }

    async fn advance_after_finish(&mut self) {
        let finished = self.audio_player.current_location().cloned();
        self.audio_player.stop();

        if let Some(finished) = finished {
            self.navigator.select(&finished);
        }
        if self.navigator.cursor() + 1 >= self.navigator.total() {
            info!("Reached the end of the playlist");
            return;
        }

        let result = self.navigator.play_next().await;
        self.report_selection(result);
    }

    fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    fn render(&mut self) -> Result<()> {
        let navigator = &self.navigator;
        let page = self.page;
        let prompt = self.prompt.as_ref();
        let footer = self.config.appearance.footer;
        let position = self.position;
        let status = self.status_message.as_deref();
        let playback = (
            self.audio_player.state(),
            self.audio_player.position(),
            self.total_duration,
        );
        let settings = (self.navigator.order(), self.audio_player.volume());

        self.terminal.draw(|f| {
            let mut constraints = vec![
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Track window or help
                Constraint::Length(3), // Now playing
            ];
            if prompt.is_some() {
                constraints.push(Constraint::Length(3));
            }
            if footer {
                constraints.push(Constraint::Length(1));
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(f.area());

            let title = match page {
                Page::Home => " Playlist",
                Page::Help => " Help",
            };
            let header = Paragraph::new(Line::from(Span::styled(
                title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )))
            .block(Block::default().borders(Borders::ALL).title("cplayer"));
            f.render_widget(header, chunks[0]);

            match page {
                Page::Home => render_track_window(f, chunks[1], &navigator.window(), position),
                Page::Help => render_help(f, chunks[1]),
            }

            let now_playing = navigator.current_track().map(|t| t.name());
            render_now_playing(f, chunks[2], now_playing, playback, settings, navigator.filter_pattern(), status);

            let mut next = 3;
            if let Some(prompt) = prompt {
                let input = Paragraph::new(prompt.value())
                    .block(Block::default().borders(Borders::ALL).title(prompt.label()));
                f.render_widget(input, chunks[next]);
                next += 1;
            }
            if footer {
                let keys = Paragraph::new(Line::from(vec![
                    Span::styled("q", Style::default().fg(Color::Yellow)),
                    Span::raw(" Quit  "),
                    Span::styled("h", Style::default().fg(Color::Yellow)),
                    Span::raw(" Home  "),
                    Span::styled("i", Style::default().fg(Color::Yellow)),
                    Span::raw(" Info"),
                ]));
                f.render_widget(keys, chunks[next]);
            }
        })
    }
}

fn render_track_window(f: &mut Frame, area: Rect, rows: &[WindowRow<'_>], position: (usize, usize)) {
    let (cursor, total) = position;
    let title = if total == 0 {
        "Tracks".to_string()
    } else {
        format!("Tracks {}/{}", cursor + 1, total)
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if rows.is_empty() {
        f.render_widget(Paragraph::new("No data.").block(block), area);
        return;
    }

    let lines: Vec<Line> = rows
        .iter()
        .map(|row| {
            let marker = if row.is_current {
                Span::styled("▶ ", Style::default().fg(PLAYING_COLOR))
            } else {
                Span::raw("  ")
            };
            let style = if row.is_cursor {
                Style::default().fg(CURSOR_COLOR).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(ROW_COLOR)
            };
            Line::from(vec![marker, Span::styled(row.track.name().to_string(), style)])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_now_playing(
    f: &mut Frame,
    area: Rect,
    track: Option<&str>,
    playback: (PlaybackState, Duration, Option<Duration>),
    settings: (PlaylistOrder, f32),
    filter: Option<&str>,
    status: Option<&str>,
) {
    let (state, elapsed, total) = playback;
    let symbol = match state {
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
        PlaybackState::Stopped => "■",
    };

    let mut spans = vec![
        Span::styled(symbol, Style::default().fg(Color::Green)),
        Span::raw(" "),
        Span::styled(
            track.unwrap_or("No track selected").to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}", format_progress(elapsed, total))),
        Span::styled(
            format!("  {}", format_settings(settings.0, settings.1)),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(pattern) = filter {
        spans.push(Span::styled(format!("  filter: {}", pattern), Style::default().fg(Color::Magenta)));
    }
    if let Some(message) = status {
        spans.push(Span::styled(format!("  {}", message), Style::default().fg(Color::Red)));
    }

    let widget = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Keyboard Controls", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  ↑ / ↓         Move cursor"),
        Line::from("  Enter         Play track under cursor"),
        Line::from("  Space         Pause / resume"),
        Line::from("  ← / →         Seek backward / forward"),
        Line::from("  n / b         Next / previous track"),
        Line::from("  J / K         Move track down / up"),
        Line::from("  /             Search"),
        Line::from("  f             Filter"),
        Line::from("  h / i         Home / this page"),
        Line::from("  q             Quit"),
    ];
    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn format_progress(elapsed: Duration, total: Option<Duration>) -> String {
    let clock = |d: Duration| format!("{}:{:02}", d.as_secs() / 60, d.as_secs() % 60);
    match total {
        Some(total) => format!("{} / {}", clock(elapsed.min(total)), clock(total)),
        None => format!("{} / --:--", clock(elapsed)),
    }
}

fn format_settings(order: PlaylistOrder, volume: f32) -> String {
    let order = match order {
        PlaylistOrder::Ascending => "ascending",
        PlaylistOrder::Descending => "descending",
        PlaylistOrder::Random => "random",
    };
    format!("{} | vol {:.0}%", order, volume * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_formats_minutes_and_seconds() {
        assert_eq!(
            format_progress(Duration::from_secs(65), Some(Duration::from_secs(190))),
            "1:05 / 3:10"
        );
        assert_eq!(format_progress(Duration::from_secs(7), None), "0:07 / --:--");
        // elapsed never runs past the total
        assert_eq!(
            format_progress(Duration::from_secs(300), Some(Duration::from_secs(60))),
            "1:00 / 1:00"
        );
    }

    #[test]
    fn settings_show_order_and_volume() {
        assert_eq!(format_settings(PlaylistOrder::Random, 0.7), "random | vol 70%");
        assert_eq!(format_settings(PlaylistOrder::Ascending, 1.0), "ascending | vol 100%");
    }
}
