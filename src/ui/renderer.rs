//! Top-level rendering coordinator.
//!
//! Computes the view model from state and dispatches to the list or detail
//! layout. All output goes to stdout as ANSI escape sequences, which Zellij
//! draws into the plugin pane.

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Renders the complete UI for the current state.
///
/// # Parameters
///
/// * `state` - Application state to render
/// * `rows` - Terminal height in character cells
/// * `cols` - Terminal width in character cells
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);

    render_viewmodel(&viewmodel, &state.theme, rows, cols);
}

fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    if let Some(detail) = &vm.detail {
        components::render_detail_mode(vm, detail, theme, cols, rows);
    } else {
        components::render_list_mode(vm, theme, cols, rows);
    }
}
