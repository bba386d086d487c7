//! Prints the chat log to stdout as the controller changes

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chat_session::{ChatController, ChatTransport, ChatView, Notice, SpeechCapture};
use colored::Colorize;

/// Something new to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Assistant(String),
    Thinking,
    Notice(String),
}

/// Tracks what has already been printed
#[derive(Debug, Default)]
pub struct Cursor {
    printed: usize,
    awaiting: bool,
    notice: Option<Notice>,
}

impl Cursor {
    /// Lines for everything that changed since the last call
    ///
    /// User messages are skipped since the user just typed them.
    pub fn advance(&mut self, view: &ChatView) -> Vec<Line> {
        let mut lines = Vec::new();

        if view.is_awaiting() && !self.awaiting {
            lines.push(Line::Thinking);
        }
        self.awaiting = view.is_awaiting();

        for message in view.messages.iter().skip(self.printed) {
            if !message.is_user() {
                lines.push(Line::Assistant(message.content.clone()));
            }
        }
        self.printed = view.messages.len();

        if view.notice != self.notice {
            if let Some(notice) = &view.notice {
                lines.push(Line::Notice(notice.to_string()));
            }
            self.notice = view.notice.clone();
        }

        lines
    }
}

fn print_line(line: &Line) {
    match line {
        Line::Assistant(text) => println!("{} {}", "assistant>".cyan().bold(), text),
        Line::Thinking => println!("{}", "AI is thinking...".dimmed()),
        Line::Notice(text) => println!("{} {}", "!".yellow().bold(), text.yellow()),
    }
}

/// Subscribe a printer to `controller`
pub fn attach<T, S>(controller: &Rc<ChatController<T, S>>)
where
    T: ChatTransport + 'static,
    S: SpeechCapture + 'static,
{
    attach_with(controller, print_line);
}

/// Subscribe `emit` to every new [`Line`]
///
/// A notice is dismissed once emitted, so raising the same notice again
/// (a second `/voice` without speech support) shows up again.
fn attach_with<T, S>(controller: &Rc<ChatController<T, S>>, emit: impl Fn(&Line) + 'static)
where
    T: ChatTransport + 'static,
    S: SpeechCapture + 'static,
{
    let weak: Weak<ChatController<T, S>> = Rc::downgrade(controller);
    let cursor = RefCell::new(Cursor::default());

    controller.subscribe(move || {
        let Some(controller) = weak.upgrade() else {
            return;
        };
        let lines = cursor.borrow_mut().advance(&controller.view());
        for line in &lines {
            emit(line);
        }
        if lines.iter().any(|line| matches!(line, Line::Notice(_))) {
            // Re-enters this listener, which sees the notice gone.
            controller.dismiss_notice();
        }
    });
}
