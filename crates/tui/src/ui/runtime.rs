//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (alternate screen, raw mode, mouse capture,
//!   bracketed paste).
//! - Drive a single event loop that handles input, background results, and
//!   animation ticks.
//! - Route input to the [`MainView`] and execute the returned `Effect`s.
//!
//! Ticking strategy: a fast interval (100 ms) while a request is running or
//! effects are queued so the throbber animates; a slow one (5 s) when idle.
//!
//! Entry Point
//! - [`run_app`] is called from `lib::run` and performs setup, event
//!   processing, and teardown.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::app::{App, Effect, ExecOutcome, Msg, SharedCtx};
use crate::cmd;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

/// Spawn a dedicated input task that reads terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// `poll()` and `read()` stay on the same task so no events are lost.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        let mut last_mouse_move = Instant::now();
        loop {
            match event::poll(sixteen_ms) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(error) => {
                    warn!("Failed to poll terminal events: {}", error);
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    // Throttle mouse moves to once per 16 ms.
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < sixteen_ms {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if let Err(error) = sender.send(event).await {
                        warn!("Failed to send event: {}", error);
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes (mode toggles) are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Routes one terminal event to the view tree.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => main_view.handle_key_events(app, key_event),
        Event::Key(_) => Vec::new(),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Paste(text) => main_view.handle_paste(app, &text),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost => Vec::new(),
    }
}

/// Sets up the terminal, runs the event loop, and restores the terminal on exit.
pub async fn run_app(ctx: SharedCtx) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::default();
    let mut app = App::new(ctx);
    let mut terminal = setup_terminal()?;
    info!(endpoint = %app.ctx.endpoint, "tui started");

    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    let mut effects: Vec<Effect> = Vec::with_capacity(5);

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    let result = loop {
        let needs_animation = app.executing || !effects.is_empty();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break Ok(());
                };
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                needs_render = needs_animation || !effects.is_empty();
                if !effects.is_empty() {
                    // move effects out of their Vec to avoid processing new effects while processing current ones
                    let mut effects_to_process = std::mem::take(&mut effects);
                    handle_navigation_effects(&mut app, &mut main_view, &mut effects_to_process, &mut effects);
                    process_effects(&mut app, effects_to_process, &mut pending_execs);
                }
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecOutcome::TaskFailed(format!("Execution task failed: {error}")));
                effects.extend(main_view.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome))));
                app.executing = !pending_execs.is_empty();
                if !app.executing {
                    app.throbber_idx = 0;
                }
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break Ok(()); }
        }

        if app.should_quit {
            break Ok(());
        }
        if needs_render && let Err(error) = render(&mut terminal, &mut app, &mut main_view) {
            break Err(error);
        }
    };

    cleanup_terminal(&mut terminal)?;
    info!("tui stopped");
    result
}

/// Opens and closes modals. Everything else is left in `effects`.
fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: &mut Vec<Effect>, queued_effects: &mut Vec<Effect>) {
    let navigation_effects = effects
        .extract_if(.., |effect| matches!(effect, Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<Effect>>();

    for effect in navigation_effects {
        match effect {
            Effect::ShowModal(modal) => {
                main_view.set_open_modal_kind(app, Some(modal));
                if let Some((view, _)) = main_view.modal_view.as_mut() {
                    queued_effects.extend(view.on_route_enter(app));
                }
            }
            Effect::CloseModal => {
                main_view.set_open_modal_kind(app, None);
                main_view.restore_focus(app);
            }
            _ => {}
        }
    }
}

fn process_effects(app: &mut App, effects: Vec<Effect>, pending_execs: &mut FuturesUnordered<JoinHandle<ExecOutcome>>) {
    if effects.is_empty() {
        return;
    }

    let was_executing = !pending_execs.is_empty();
    let command_batch = cmd::run_from_effects(app, effects);
    if !command_batch.pending.is_empty() {
        pending_execs.extend(command_batch.pending);
        if !was_executing {
            app.throbber_idx = 0;
        }
    }
    app.executing = !pending_execs.is_empty();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Modal;
    use crate::app::test_support::app;

    #[test]
    fn navigation_effects_are_split_from_commands() {
        let mut app = app();
        app.toggle_mode();
        let mut main_view = MainView::default();
        let mut effects = vec![
            Effect::ShowModal(Modal::FilePicker(vec!["pdf"])),
            Effect::SubmitRequested,
        ];
        let mut queued = Vec::new();

        handle_navigation_effects(&mut app, &mut main_view, &mut effects, &mut queued);

        assert_eq!(effects, vec![Effect::SubmitRequested]);
        assert!(main_view.modal_view.is_some());
        assert!(queued.iter().all(|effect| matches!(effect, Effect::ListDirectoryContents(_))));

        let mut close = vec![Effect::CloseModal, Effect::ResumeSelected(None)];
        handle_navigation_effects(&mut app, &mut main_view, &mut close, &mut queued);
        assert_eq!(close, vec![Effect::ResumeSelected(None)]);
        assert!(main_view.modal_view.is_none());
        assert!(app.file_picker.is_none());
    }
}
