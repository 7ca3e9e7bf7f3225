// input.rs — 拖拽生命周期：鼠标与单指触摸共用一个拖拽槽
//
// `ui_consumed` 只拦截按下/开始；松开、结束与移动始终生效，
// 否则在 UI 面板上松手会留下悬空的拖拽。

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragAction {
    Start(Vec2),
    Move(Vec2),
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pointer {
    Mouse,
    Touch(u64),
}

#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Option<Pointer>,
    cursor: Vec2,
}

impl DragTracker {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Cursor position is tracked even when the UI owns the event.
    pub fn cursor_moved(&mut self, point: Vec2) -> Option<DragAction> {
        self.cursor = point;
        (self.active == Some(Pointer::Mouse)).then_some(DragAction::Move(point))
    }

    pub fn mouse_button(&mut self, pressed: bool, ui_consumed: bool) -> Option<DragAction> {
        if pressed {
            self.begin(Pointer::Mouse, self.cursor, ui_consumed)
        } else {
            self.finish(Pointer::Mouse)
        }
    }

    pub fn touch_started(&mut self, id: u64, point: Vec2, ui_consumed: bool) -> Option<DragAction> {
        self.begin(Pointer::Touch(id), point, ui_consumed)
    }

    pub fn touch_moved(&mut self, id: u64, point: Vec2) -> Option<DragAction> {
        (self.active == Some(Pointer::Touch(id))).then_some(DragAction::Move(point))
    }

    /// Ended and cancelled touches both finish the drag.
    pub fn touch_ended(&mut self, id: u64) -> Option<DragAction> {
        self.finish(Pointer::Touch(id))
    }

    fn begin(&mut self, pointer: Pointer, point: Vec2, ui_consumed: bool) -> Option<DragAction> {
        if ui_consumed || self.active.is_some() {
            return None;
        }
        self.active = Some(pointer);
        Some(DragAction::Start(point))
    }

    fn finish(&mut self, pointer: Pointer) -> Option<DragAction> {
        if self.active != Some(pointer) {
            return None;
        }
        self.active = None;
        Some(DragAction::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_ending_over_ui_frees_the_slot() {
        let mut t = DragTracker::default();
        assert_eq!(t.touch_started(1, Vec2::new(5.0, 5.0), false), Some(DragAction::Start(Vec2::new(5.0, 5.0))));
        // 在状态栏上抬起：UI 消费了事件，但拖拽必须结束
        assert_eq!(t.touch_ended(1), Some(DragAction::End));
        assert!(!t.is_dragging());
        assert_eq!(t.touch_started(2, Vec2::ZERO, false), Some(DragAction::Start(Vec2::ZERO)));
    }

    #[test]
    fn mouse_release_over_ui_stops_moves() {
        let mut t = DragTracker::default();
        t.cursor_moved(Vec2::new(10.0, 10.0));
        assert_eq!(t.mouse_button(true, false), Some(DragAction::Start(Vec2::new(10.0, 10.0))));
        assert_eq!(t.mouse_button(false, true), Some(DragAction::End));
        assert_eq!(t.cursor_moved(Vec2::new(40.0, 10.0)), None);
    }

    #[test]
    fn press_on_ui_does_not_start_a_drag() {
        let mut t = DragTracker::default();
        assert_eq!(t.mouse_button(true, true), None);
        assert_eq!(t.touch_started(3, Vec2::ZERO, true), None);
        assert_eq!(t.cursor_moved(Vec2::ONE), None);
        assert_eq!(t.mouse_button(false, false), None);
    }

    #[test]
    fn start_uses_latest_cursor_even_if_ui_saw_the_move() {
        let mut t = DragTracker::default();
        t.cursor_moved(Vec2::new(1.0, 2.0));
        t.cursor_moved(Vec2::new(300.0, 200.0));
        assert_eq!(t.mouse_button(true, false), Some(DragAction::Start(Vec2::new(300.0, 200.0))));
    }

    #[test]
    fn second_finger_is_ignored() {
        let mut t = DragTracker::default();
        t.touch_started(1, Vec2::ZERO, false);
        assert_eq!(t.touch_started(2, Vec2::ONE, false), None);
        assert_eq!(t.touch_moved(2, Vec2::ONE), None);
        assert_eq!(t.touch_ended(2), None);
        assert_eq!(t.touch_moved(1, Vec2::ONE), Some(DragAction::Move(Vec2::ONE)));
        assert_eq!(t.mouse_button(false, false), None);
        assert_eq!(t.touch_ended(1), Some(DragAction::End));
    }
}
