//! Property-based tests for surface geometry.
//!
//! The surface rectangle depends only on the window size and the chrome
//! offset, and every surface shares it, visible or not.

#[path = "../common/mod.rs"]
mod common;

use common::*;
use proptest::prelude::*;
use tabshell::ipc_handler::ChromeIntent;
use tabshell::managers::tab_manager::TabManagerTrait;
use tabshell::services::layout_controller::LayoutController;
use tabshell::types::geometry::WindowSize;

#[derive(Debug, Clone)]
enum LayoutOp {
    Resize(u32, u32),
    Metrics(u32, u32),
    Create,
    Close(usize),
}

fn arb_layout_ops() -> impl Strategy<Value = Vec<LayoutOp>> {
    prop::collection::vec(
        prop_oneof![
            (100..3000u32, 100..2000u32).prop_map(|(w, h)| LayoutOp::Resize(w, h)),
            (1..200u32, 0..100u32).prop_map(|(t, b)| LayoutOp::Metrics(t, b)),
            Just(LayoutOp::Create),
            (0..8usize).prop_map(LayoutOp::Close),
        ],
        1..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn viewport_fills_space_below_chrome(w in 1..5000u32, h in 1..5000u32, offset in 0..6000u32) {
        let rect = LayoutController::viewport_for(WindowSize::new(w, h), offset);
        prop_assert_eq!(rect.x, 0);
        prop_assert_eq!(rect.width, w);
        prop_assert_eq!(rect.y, offset.min(h));
        prop_assert_eq!(rect.y + rect.height, h);

        let mut layout = LayoutController::new(WindowSize::new(w, h), 80);
        layout.set_chrome_offset(offset);
        prop_assert_eq!(layout.chrome_rect().height, rect.y);
        prop_assert_eq!(layout.viewport(), rect);
    }

    #[test]
    fn all_surfaces_share_current_viewport(ops in arb_layout_ops()) {
        let (mut shell, world) = started_shell();
        let mut window = WINDOW;

        for op in &ops {
            match op {
                LayoutOp::Resize(w, h) => {
                    window = WindowSize::new(*w, *h);
                    shell.resize(window);
                }
                LayoutOp::Metrics(t, b) => {
                    shell.handle_intent(ChromeIntent::ChromeMetrics { toolbar_height: *t, tab_bar_height: *b });
                }
                LayoutOp::Create => {
                    shell.handle_intent(ChromeIntent::NewTab { url: None });
                }
                LayoutOp::Close(i) => {
                    let order = shell.tabs().get_tab_order().to_vec();
                    shell.handle_intent(ChromeIntent::CloseTab(order[i % order.len()]));
                }
            }
            settle(&mut shell, &world);

            let offset = shell.tabs().chrome_offset();
            prop_assert_eq!(shell.host().layout().chrome_offset(), offset);
            let expected = LayoutController::viewport_for(window, offset);
            let state = world.borrow();
            for id in state.alive() {
                prop_assert_eq!(state.record(id).bounds, expected);
            }
        }
    }
}
