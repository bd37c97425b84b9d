//! Component system for the cover letter TUI.
//!
//! Components are self-contained UI elements. Their state lives on [`App`]
//! so the focus tree can be rebuilt from it; the component itself holds only
//! render bookkeeping (hit-test rectangles). Side effects are reported back
//! as [`Effect`]s rather than performed inline.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::{App, Effect, Msg};

/// A UI element that handles events and renders itself into a `Rect`.
///
/// Every handler has a no-op default so a component implements only what it
/// needs. Handlers return the effects the runtime should execute.
pub(crate) trait Component {
    /// Handle an application message (ticks, background results).
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events routed to this component.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle text pasted into the terminal (bracketed paste).
    fn handle_paste(&mut self, _app: &mut App, _text: &str) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw the component. State changes belong in the handlers, not here.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the footer while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Splits `area` into the regions this component draws into.
    fn get_preferred_layout(&self, _app: &App, _area: Rect) -> Vec<Rect> {
        Vec::new()
    }

    /// Called when the component becomes visible.
    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }
}

/// Returns the index of the rectangle under `(x, y)`, when `area` contains the point.
pub(crate) fn find_target_index_by_mouse_position(area: &Rect, rects: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = ratatui::layout::Position::new(x, y);
    if !area.contains(position) {
        return None;
    }
    rects.iter().position(|rect| rect.contains(position))
}
