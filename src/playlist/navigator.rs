use super::fuzzy::similarity;
use super::order::PlaylistOrder;
use crate::audio::Track;
use crate::error::NavigatorError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Notifications sent to whoever hosts the navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorEvent {
    /// Cursor or active view changed; the host should redraw.
    PositionChanged { cursor: usize, total: usize },
    /// A track was confirmed for playback.
    TrackSelected(Track),
    /// Left input: the host decides what seeking backward means.
    SeekBackward,
    /// Right input.
    SeekForward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    Empty,
    Populated,
    Filtered,
}

/// One visible row of the window.
#[derive(Debug, Clone, Copy)]
pub struct WindowRow<'a> {
    pub track: &'a Track,
    pub is_cursor: bool,
    pub is_current: bool,
}

/// Playlist state: the full track list, the (possibly filtered) active view,
/// the cursor and the viewport.
///
/// The visible window always starts at the cursor:
/// `active_view[cursor..cursor + viewport_length]`.
pub struct Navigator {
    master: Vec<Track>,
    // Indices into `master` while a filter is active; `None` means the view is `master`.
    view: Option<Vec<usize>>,
    filter_pattern: Option<String>,
    cursor: usize,
    viewport_length: usize,
    current: Option<PathBuf>,
    order: PlaylistOrder,
    event_sender: Option<mpsc::UnboundedSender<NavigatorEvent>>,
}

impl Navigator {
    pub fn new(order: PlaylistOrder, viewport_length: usize) -> Self {
        Self {
            master: Vec::new(),
            view: None,
            filter_pattern: None,
            cursor: 0,
            viewport_length: viewport_length.max(1),
            current: None,
            order,
            event_sender: None,
        }
    }

    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<NavigatorEvent>) {
        self.event_sender = Some(sender);
    }

    /// Replace the whole list. Duplicate locations keep their first occurrence.
    pub fn set_songs(&mut self, mut paths: Vec<PathBuf>, start_position: usize, sort: bool) {
        if sort {
            self.order.arrange(&mut paths);
        }

        let mut seen = HashSet::new();
        self.master = paths
            .into_iter()
            .filter(|path| seen.insert(path.clone()))
            .map(Track::new)
            .collect();

        // Keep the now-playing marker only if the track survived the reload
        let current = self.current.take();
        if let Some(location) = current {
            if let Some(track) = self.master.iter_mut().find(|t| t.location() == location) {
                track.select(true);
                self.current = Some(location);
            }
        }

        self.view = None;
        self.filter_pattern = None;
        self.cursor = self.clamp(start_position as isize);

        info!("Loaded {} tracks (order: {:?}, sorted: {})", self.master.len(), self.order, sort);
        self.notify_position();
    }

    /// Append tracks without touching cursor or filter.
    ///
    /// With an active filter, appended tracks that match it join the view too.
    pub fn add(&mut self, paths: Vec<PathBuf>) {
        let before = self.total();
        let mut known: HashSet<PathBuf> = self
            .master
            .iter()
            .map(|t| t.location().to_path_buf())
            .collect();

        let needle = self.filter_pattern.as_deref().map(str::to_lowercase);

        for path in paths {
            if !known.insert(path.clone()) {
                continue;
            }
            let track = Track::new(path);
            if let (Some(view), Some(needle)) = (self.view.as_mut(), needle.as_deref()) {
                if name_matches(&track, needle) {
                    view.push(self.master.len());
                }
            }
            self.master.push(track);
        }

        debug!("Added tracks, {} in list, {} visible", self.master.len(), self.total());
        if self.total() != before {
            self.notify_position();
        }
    }

    /// Move the cursor by `delta` rows, clamped to the active view.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.total() == 0 {
            return;
        }

        let target = self.clamp((self.cursor as isize).saturating_add(delta));
        if target != self.cursor {
            self.cursor = target;
            self.notify_position();
        }
    }

    pub fn cursor_down(&mut self) {
        self.move_cursor(1);
    }

    pub fn cursor_up(&mut self) {
        self.move_cursor(-1);
    }

    pub fn cursor_left(&self) {
        self.emit(NavigatorEvent::SeekBackward);
    }

    pub fn cursor_right(&self) {
        self.emit(NavigatorEvent::SeekForward);
    }

    pub fn go_to(&mut self, position: isize) {
        self.cursor = self.clamp(position);
        self.notify_position();
    }

    /// Move the cursor to `location` if it is in the active view.
    pub fn select(&mut self, location: &Path) -> bool {
        match self.locate(location) {
            Some(position) => {
                self.cursor = position;
                self.notify_position();
                true
            }
            None => false,
        }
    }

    /// Mark the track under the cursor as the one playing and hand it to the host.
    pub async fn confirm_selection(&mut self) -> Result<Track, NavigatorError> {
        let index = self.master_index(self.cursor).ok_or(NavigatorError::EmptyView)?;

        if let Some(previous) = self.current.take() {
            if let Some(track) = self.master.iter_mut().find(|t| t.location() == previous) {
                track.select(false);
            }
        }

        let track = &mut self.master[index];
        track.select(true);
        let track = track.clone();
        self.current = Some(track.location().to_path_buf());

        self.notify_position();
        self.emit(NavigatorEvent::TrackSelected(track.clone()));
        Ok(track)
    }

    pub async fn play_next(&mut self) -> Result<Track, NavigatorError> {
        self.cursor_down();
        self.confirm_selection().await
    }

    pub async fn play_previous(&mut self) -> Result<Track, NavigatorError> {
        self.cursor_up();
        self.confirm_selection().await
    }

    /// Restrict the view to tracks whose name contains `pattern` (case-insensitive).
    ///
    /// An empty pattern restores the full list. The view is always derived
    /// from the full list, never from a previous filter.
    pub fn filter(&mut self, pattern: &str) {
        if pattern.is_empty() {
            self.view = None;
            self.filter_pattern = None;
        } else {
            let needle = pattern.to_lowercase();
            let view: Vec<usize> = self
                .master
                .iter()
                .enumerate()
                .filter(|(_, track)| name_matches(track, &needle))
                .map(|(index, _)| index)
                .collect();
            self.view = Some(view);
            self.filter_pattern = Some(pattern.to_string());
        }

        self.cursor = 0;
        if let Some(position) = self.current.as_deref().and_then(|loc| self.locate(loc)) {
            self.cursor = position;
        }

        debug!("Filter {:?}: {} of {} tracks", self.filter_pattern, self.total(), self.master.len());
        self.notify_position();
    }

    /// Jump to the first track whose name contains `pattern`, or failing that
    /// to the most similar name.
    pub fn search(&mut self, pattern: &str) -> Result<(), NavigatorError> {
        if pattern.is_empty() {
            return Ok(());
        }
        if self.total() == 0 {
            return Err(NavigatorError::EmptyView);
        }

        let needle = pattern.to_lowercase();
        let position = match self.active().position(|track| name_matches(track, &needle)) {
            Some(position) => position,
            None => {
                let position = self.most_similar(pattern);
                debug!("No substring match for {:?}, fuzzy match at {}", pattern, position);
                position
            }
        };

        self.cursor = position;
        self.notify_position();
        Ok(())
    }

    /// Exchange the track under the cursor with the one at `target` (clamped);
    /// the cursor follows the moved track.
    pub async fn swap(&mut self, target: isize) {
        let total = self.total();
        if total == 0 {
            return;
        }

        let from = self.cursor;
        let to = self.clamp(target);

        match self.view.as_mut() {
            Some(view) => view.swap(from, to),
            None => self.master.swap(from, to),
        }

        self.cursor = to;
        debug!("Swapped positions {} and {}", from, to);
        self.notify_position();
    }

    /// React to the host changing the number of visible rows.
    ///
    /// Only growth moves the cursor; a smaller viewport just truncates the window.
    pub fn on_viewport_resized(&mut self, new_length: usize) {
        let new_length = new_length.max(1);
        if new_length <= self.viewport_length {
            self.viewport_length = new_length;
            return;
        }

        let growth = new_length - self.viewport_length;
        self.viewport_length = new_length;
        self.cursor = self
            .cursor
            .saturating_sub(growth)
            .min(self.total().saturating_sub(1));

        if let Some(position) = self.current.as_deref().and_then(|loc| self.locate(loc)) {
            self.cursor = position;
        }

        self.notify_position();
    }

    /// Rows currently visible, starting at the cursor.
    pub fn window(&self) -> Vec<WindowRow<'_>> {
        let end = self.cursor.saturating_add(self.viewport_length).min(self.total());
        (self.cursor..end)
            .filter_map(|position| {
                let track = self.track_at(position)?;
                Some(WindowRow {
                    track,
                    is_cursor: position == self.cursor,
                    is_current: self.current.as_deref() == Some(track.location()),
                })
            })
            .collect()
    }

    /// Tracks of the active view in order.
    pub fn active(&self) -> impl Iterator<Item = &Track> + '_ {
        (0..self.total()).filter_map(move |position| self.track_at(position))
    }

    pub fn track_at(&self, position: usize) -> Option<&Track> {
        self.master_index(position).map(|index| &self.master[index])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of tracks in the active view.
    pub fn total(&self) -> usize {
        match &self.view {
            Some(view) => view.len(),
            None => self.master.len(),
        }
    }

    /// Number of tracks in the full list.
    pub fn len(&self) -> usize {
        self.master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.master.is_empty()
    }

    pub fn state(&self) -> NavigatorState {
        if self.total() == 0 {
            NavigatorState::Empty
        } else if self.filter_pattern.is_some() {
            NavigatorState::Filtered
        } else {
            NavigatorState::Populated
        }
    }

    pub fn filter_pattern(&self) -> Option<&str> {
        self.filter_pattern.as_deref()
    }

    pub fn viewport_length(&self) -> usize {
        self.viewport_length
    }

    pub fn order(&self) -> PlaylistOrder {
        self.order
    }

    pub fn set_order(&mut self, order: PlaylistOrder) {
        self.order = order;
    }

    pub fn current_track(&self) -> Option<&Track> {
        let location = self.current.as_deref()?;
        self.master.iter().find(|t| t.location() == location)
    }

    pub fn current_track_mut(&mut self) -> Option<&mut Track> {
        let location = self.current.as_deref()?;
        self.master.iter_mut().find(|t| t.location() == location)
    }

    fn master_index(&self, position: usize) -> Option<usize> {
        match &self.view {
            Some(view) => view.get(position).copied(),
            None => (position < self.master.len()).then_some(position),
        }
    }

    fn locate(&self, location: &Path) -> Option<usize> {
        self.active().position(|t| t.location() == location)
    }

    fn clamp(&self, position: isize) -> usize {
        match self.total() {
            0 => 0,
            total => position.clamp(0, total as isize - 1) as usize,
        }
    }

    // First candidate with the highest score wins
    fn most_similar(&self, pattern: &str) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (position, track) in self.active().enumerate() {
            let score = similarity(track.name(), pattern);
            if score > best_score {
                best = position;
                best_score = score;
            }
        }
        best
    }

    fn notify_position(&self) {
        self.emit(NavigatorEvent::PositionChanged {
            cursor: self.cursor,
            total: self.total(),
        });
    }

    fn emit(&self, event: NavigatorEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}

fn name_matches(track: &Track, needle_lower: &str) -> bool {
    track.name().to_lowercase().contains(needle_lower)
}
