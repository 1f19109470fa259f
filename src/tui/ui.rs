use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::history::{MIN_TERMINAL_WIDTH, SIDEBAR_WIDTH};
use crate::tui::components::{HistorySidebar, LandingPage, MessageList, TitleBar};

/// Screen regions for one frame.
pub struct Areas {
    pub title: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub input: Rect,
}

/// Split the frame: title bar, transcript (plus history sidebar on wide
/// terminals), then the input box at its current height.
pub fn areas(frame_area: Rect, input_height: u16) -> Areas {
    use Constraint::{Length, Min};
    let [title, body, input] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(frame_area);

    if frame_area.width >= MIN_TERMINAL_WIDTH {
        let [main, sidebar] = Layout::horizontal([Min(0), Length(SIDEBAR_WIDTH)]).areas(body);
        Areas {
            title,
            main,
            sidebar: Some(sidebar),
            input,
        }
    } else {
        Areas {
            title,
            main: body,
            sidebar: None,
            input,
        }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let areas = areas(frame.area(), tui.input_box.calculate_height());

    TitleBar::new(
        &app.status_message,
        app.notice.as_deref(),
        tui.message_list.has_new_message,
        app.speech.is_recording(),
    )
    .render(frame, areas.title);

    if app.has_messages() {
        MessageList::new(&mut tui.message_list, &app.transcript, tui.pulse_value)
            .render(frame, areas.main);
    } else {
        LandingPage::new(&tui.greeting).render(frame, areas.main);
    }

    if let Some(sidebar) = areas.sidebar {
        HistorySidebar::new(&app.history).render(frame, sidebar);
    }

    tui.input_box.render(frame, areas.input);
}

/// Transcript entry under a screen position, if any.
pub fn hit_test_message(
    column: u16,
    row: u16,
    frame_area: Rect,
    input_height: u16,
    tui: &TuiState,
) -> Option<usize> {
    let main = areas(frame_area, input_height).main;
    if !main.contains(ratatui::layout::Position::new(column, row)) {
        return None;
    }
    tui.message_list.hit_test(row - main.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_sidebar_only_on_wide_terminals() {
        assert!(areas(Rect::new(0, 0, 120, 40), 3).sidebar.is_some());
        assert!(areas(Rect::new(0, 0, 60, 40), 3).sidebar.is_none());
    }

    #[test]
    fn test_areas_stack_vertically() {
        let a = areas(Rect::new(0, 0, 80, 24), 4);
        assert_eq!(a.title.height, 1);
        assert_eq!(a.input.height, 4);
        assert_eq!(a.main.height, 24 - 1 - 4);
        assert_eq!(a.input.y, 20);
    }

    #[test]
    fn test_draw_landing_then_transcript() {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        let mut app = test_app();
        let mut tui = TuiState::new();

        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();
        assert!(screen(&terminal).contains("No messages yet"));

        update(&mut app, Action::Submit("hello jarvis".into()));
        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("hello jarvis"), "{text}");
        assert!(text.contains("Thinking"), "{text}");
    }

    #[test]
    fn test_hit_test_outside_transcript_is_none() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = test_app();
        let mut tui = TuiState::new();
        update(&mut app, Action::Submit("hi".into()));
        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        let area = Rect::new(0, 0, 80, 24);
        let input_height = tui.input_box.calculate_height();
        // Title bar row.
        assert_eq!(hit_test_message(5, 0, area, input_height, &tui), None);
        // Input box row.
        assert_eq!(hit_test_message(5, 23, area, input_height, &tui), None);
    }
}
