use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, TitleBar};
use crate::tui::{InputMode, TuiState};

/// Split the frame into title, conversation and input areas.
fn main_layout(area: Rect, input_height: u16) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: Instant) {
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, main_area, input_area] = main_layout(frame.area(), input_height);

    // Conversation, guarded by the error boundary
    let show_landing = app.store.is_empty() && !app.is_loading();
    let pulse_value = tui.pulse_value;
    let spinner_frame = tui.spinner_frame;
    tui.boundary.render(frame, main_area, |f, area| {
        if show_landing {
            LandingPage.render(f, area);
            return Ok(());
        }
        MessageList {
            state: &mut tui.message_list,
            messages: app.store.messages(),
            revision: app.store.revision(),
            is_loading: app.is_loading(),
            typewriter: &mut tui.typewriter,
            now,
            pulse_value,
            spinner_frame,
        }
        .render(f, area)
    });

    TitleBar::new(
        app.backend_label.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content && !show_landing,
    )
    .render(frame, title_area);

    tui.input_box.disabled = app.is_loading();
    tui.input_box.dimmed = tui.input_mode != InputMode::Input;
    tui.input_box.render(frame, input_area);
}

/// Hit test: given a screen Y coordinate, find which message index (if any) is at that position
pub fn hit_test_message(
    screen_y: u16,
    frame_area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
    input_height: u16,
) -> Option<usize> {
    let [_title_area, main_area, _input_area] = main_layout(frame_area, input_height);

    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }

    let content_y = (screen_y - main_area.y) + scroll_offset_y;
    let index = prefix_heights.partition_point(|&end| end <= content_y);
    (index < prefix_heights.len()).then_some(index)
}
