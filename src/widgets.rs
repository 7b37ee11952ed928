//! Clickable UI components shared by every screen.
//!
//! - [`ClickableList`] pairs rendered lines with action IDs so click targets
//!   follow the lines they belong to.
//! - [`centered_rect`] places a modal dialog over the current screen.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;
use ratzilla::ratatui::widgets::{Block, Paragraph, Wrap};

use crate::input::ClickState;

// ── ClickableList ──────────────────────────────────────────────

/// Lines for a `Paragraph`, some of which are buttons.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("選択中の本"));
/// cl.push_clickable(Line::from(" [c] 完了"), PLAY_COMPLETE);
/// cl.register_targets_with_block(area, &block, &mut cs, 0, inner_width);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`.
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a line bound to `action_id`. The binding follows the line, so
    /// lines pushed before it later on never shift targets out of place.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Visual rows each line occupies at `wrap_width` (0 = no wrapping).
    /// Measured with the same word wrapper the paragraph renders with.
    fn visual_heights(&self, wrap_width: u16) -> Vec<u16> {
        self.lines
            .iter()
            .map(|line| {
                if wrap_width == 0 {
                    return 1;
                }
                let rows = Paragraph::new(line.clone())
                    .wrap(Wrap { trim: false })
                    .line_count(wrap_width);
                rows.max(1) as u16
            })
            .collect()
    }

    /// Rows the paragraph will need at `wrap_width`; for sizing layouts.
    pub fn visual_rows(&self, wrap_width: u16) -> u16 {
        self.visual_heights(wrap_width).iter().sum()
    }

    /// Register a target on every visible row of every clickable line.
    ///
    /// * `top_offset` / `bottom_offset`: rows taken by borders or padding.
    /// * `scroll`: vertical scroll in visual rows.
    /// * `wrap_width`: content width when the paragraph uses `Wrap`;
    ///   `0` means one row per line.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        wrap_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = (area.y + area.height).saturating_sub(bottom_offset);

        let heights = self.visual_heights(wrap_width);
        let mut starts = Vec::with_capacity(heights.len());
        let mut cumulative: u16 = 0;
        for h in &heights {
            starts.push(cumulative);
            cumulative += h;
        }

        for &(idx, action_id) in &self.actions {
            for r in 0..heights[idx] {
                let vr = starts[idx] + r;
                if vr < scroll {
                    continue;
                }
                let row = content_y + (vr - scroll);
                if row >= content_end {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }

    /// Same as [`register_targets`](Self::register_targets), with offsets
    /// taken from the block that will wrap the paragraph.
    pub fn register_targets_with_block(
        &self,
        area: Rect,
        block: &Block,
        cs: &mut ClickState,
        scroll: u16,
        wrap_width: u16,
    ) {
        let inner = block.inner(area);
        let top = inner.y - area.y;
        let bottom = (area.y + area.height).saturating_sub(inner.y + inner.height);
        self.register_targets(area, cs, top, bottom, scroll, wrap_width);
    }
}

// ── Layout helpers ─────────────────────────────────────────────

/// A `width` × `height` rect centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratzilla::ratatui::widgets::Borders;

    #[test]
    fn buttons_land_below_header_lines() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("選択中の本"));
        cl.push_clickable(Line::from(" [c] 完了"), 40);
        cl.push_clickable(Line::from(" [g] ガチャを回す"), 41);
        cl.push(Line::from(""));

        let area = Rect::new(0, 5, 40, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cl.into_lines().len(), 4);
        assert_eq!(cs.hit_test(3, 7), Some(40));
        assert_eq!(cs.hit_test(3, 8), Some(41));
        assert_eq!(cs.hit_test(3, 6), None);
        assert_eq!(cs.hit_test(3, 9), None);
    }

    #[test]
    fn rows_past_the_bottom_border_are_dropped() {
        let mut cl = ClickableList::new();
        for i in 0..8 {
            cl.push_clickable(Line::from(format!("book {i}")), 10 + i);
        }
        let area = Rect::new(0, 0, 40, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(1, 3), Some(12));
        assert_eq!(cs.hit_test(1, 4), None);
    }

    #[test]
    fn scrolled_out_rows_are_skipped() {
        let mut cl = ClickableList::new();
        for i in 0..4 {
            cl.push_clickable(Line::from(format!("log {i}")), 100 + i);
        }
        let area = Rect::new(0, 10, 40, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 1, 2, 0);

        assert_eq!(cs.hit_test(1, 10), Some(102));
        assert_eq!(cs.hit_test(1, 11), Some(103));
        assert_eq!(cs.targets.len(), 2);
    }

    #[test]
    fn wrapped_title_pushes_next_button_down_and_stays_clickable() {
        let mut cl = ClickableList::new();
        // 24 columns in a 10-wide paragraph: three rows.
        cl.push_clickable(Line::from("123456789012345678901234"), 10);
        cl.push_clickable(Line::from("[a] 表紙"), 20);

        let area = Rect::new(0, 0, 10, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 0, 0, 10);

        for row in 0..3 {
            assert_eq!(cs.hit_test(2, row), Some(10));
        }
        assert_eq!(cs.hit_test(2, 3), Some(20));
        assert_eq!(cs.hit_test(2, 4), None);
        assert_eq!(cl.visual_rows(10), 4);
        assert_eq!(cl.visual_rows(0), 2);
    }

    #[test]
    fn block_offsets_follow_borders() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("[y] はい"), 70);

        let area = Rect::new(2, 4, 30, 6);
        let mut cs = ClickState::new();
        cl.register_targets_with_block(area, &Block::default().borders(Borders::ALL), &mut cs, 0, 0);
        assert_eq!(cs.hit_test(5, 5), Some(70));

        let mut cs = ClickState::new();
        cl.register_targets_with_block(area, &Block::default(), &mut cs, 0, 0);
        assert_eq!(cs.hit_test(5, 4), Some(70));
    }

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 40, 30);
        assert_eq!(centered_rect(20, 10, area), Rect::new(10, 10, 20, 10));
        assert_eq!(centered_rect(60, 50, area), area);
        let narrow = Rect::new(3, 1, 11, 7);
        assert_eq!(centered_rect(9, 5, narrow), Rect::new(4, 2, 9, 5));
    }
}
