//! Plain-text presentation of pages and controls.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use flipbook_content::PageView;
use flipbook_core::{Controls, PresentationAdapter};
use flipbook_model::Direction;

/// Writes every page event as a line of text. The page turn is a sleep.
pub struct TerminalPresenter<W> {
    out: Mutex<W>,
    animation: Duration,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout(animation: Duration) -> Self {
        Self::new(io::stdout(), animation)
    }
}

impl<W: Write + Send + 'static> TerminalPresenter<W> {
    pub fn new(out: W, animation: Duration) -> Self {
        Self {
            out: Mutex::new(out),
            animation,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout is not worth failing a page turn over.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

impl<W: Write + Send + 'static> PresentationAdapter for TerminalPresenter<W> {
    async fn animate(&self, from: usize, to: usize, direction: Direction) {
        let arrow = match direction {
            Direction::Forward => "->",
            Direction::Backward => "<-",
        };
        self.line(&format!("~ page {from} {arrow} {to}"));
        if !self.animation.is_zero() {
            tokio::time::sleep(self.animation).await;
        }
    }

    fn render(&self, index: usize, view: &PageView) {
        match view {
            PageView::Loading => self.line(&format!("[page {index}] loading...")),
            PageView::Content(_) | PageView::Fallback { .. } => {
                self.line(&format!("[page {index}]"));
                self.line(&view.to_markup());
            }
        }
    }

    fn controls_changed(&self, controls: &Controls) {
        let prev = if controls.prev_enabled { "<prev" } else { "     " };
        let next = if controls.next_enabled { "next>" } else { "     " };
        let active = controls
            .active_section
            .as_ref()
            .map_or_else(|| "cover".to_string(), ToString::to_string);
        self.line(&format!("{prev} {} {next}  ({active})", controls.indicator()));
    }
}
