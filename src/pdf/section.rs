use super::context::{LayoutContext, SectionChunk, mm};
use super::metrics::line_height;

pub(crate) const BODY_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 11.0;
/// Card edge to the header bar and body panel, on every side.
const CARD_PAD: f32 = mm(4.0);
/// Body panel edge to the text.
const PANEL_PAD: f32 = mm(3.0);
const HEADER_H: f32 = 18.0;
const TITLE_GAP: f32 = mm(3.0);
const BLOCK_GAP: f32 = mm(6.0);

const BODY_COLOR: [u8; 3] = [0x1F, 0x29, 0x37];
const TITLE_COLOR: [u8; 3] = [255, 255, 255];
const PANEL_COLOR: [u8; 3] = [255, 255, 255];

/// A titled card of free text.
pub(crate) struct SectionBlock<'a> {
    pub(crate) title: &'a str,
    pub(crate) body: &'a str,
    /// Shown instead of a blank body.
    pub(crate) placeholder: &'a str,
}

/// Lay out a section card, splitting its wrapped lines across as many pages as needed.
///
/// Every chunk's height is known before drawing: card and panel padding on both
/// sides, the title bar on the first chunk only, and a whole number of lines. A chunk never starts
/// with zero lines, and a split block always continues at the top of a fresh page.
pub(crate) fn render_section_block(ctx: &mut LayoutContext, block: &SectionBlock) {
    let g = ctx.geometry;
    let card_x = g.content_left;
    let card_w = g.content_width();
    let panel_x = card_x + CARD_PAD;
    let panel_w = card_w - 2.0 * CARD_PAD;
    let inner_left = panel_x + PANEL_PAD;
    let inner_right = panel_x + panel_w - PANEL_PAD;

    let body = if block.body.trim().is_empty() {
        block.placeholder
    } else {
        block.body
    };
    let lines = ctx
        .fonts
        .regular
        .metrics
        .wrap(body, inner_right - inner_left, BODY_SIZE);
    let line_h = line_height(BODY_SIZE);

    let mut next = 0usize;
    let mut first = true;
    while next < lines.len() {
        let structural =
            2.0 * (CARD_PAD + PANEL_PAD) + if first { HEADER_H + TITLE_GAP } else { 0.0 };

        // Not even one line fits under the chrome of this chunk: move on.
        // At the top of a page there is nothing better to wait for.
        if !ctx.cursor.at_page_top() && ctx.ensure_space(structural + line_h) {
            continue;
        }

        let usable = ctx.cursor.available() - structural;
        let fit = ((usable / line_h).floor() as usize).max(1);
        let take = fit.min(lines.len() - next);
        let chunk = &lines[next..next + take];
        let chunk_h = structural + take as f32 * line_h;

        let top = ctx.cursor.y();
        ctx.fill_rect(card_x, top, card_w, chunk_h, ctx.theme.light);

        let mut panel_top = top + CARD_PAD;
        if first {
            ctx.fill_rect(card_x, top, card_w, CARD_PAD + HEADER_H, ctx.theme.primary);
            let baseline = top + (CARD_PAD + HEADER_H) / 2.0 + TITLE_SIZE * 0.35;
            ctx.line_at_start(
                block.title,
                panel_x,
                panel_x + panel_w,
                baseline,
                TITLE_SIZE,
                true,
                TITLE_COLOR,
            );
            panel_top += HEADER_H + TITLE_GAP;
        }
        let panel_h = take as f32 * line_h + 2.0 * PANEL_PAD;
        ctx.fill_rect(panel_x, panel_top, panel_w, panel_h, PANEL_COLOR);
        let body_top = panel_top + PANEL_PAD;

        let ascent = ctx.fonts.regular.metrics.ascent(BODY_SIZE);
        for (i, line) in chunk.iter().enumerate() {
            let baseline = body_top + i as f32 * line_h + (line_h - BODY_SIZE) / 2.0 + ascent;
            ctx.line_at_start(
                line,
                inner_left,
                inner_right,
                baseline,
                BODY_SIZE,
                false,
                BODY_COLOR,
            );
        }

        ctx.page.chunks.push(SectionChunk {
            title: block.title.to_string(),
            first,
            lines: chunk.to_vec(),
            top,
            bottom: top + chunk_h,
            text_left: inner_left,
            text_right: inner_right,
        });

        ctx.cursor.advance(chunk_h);
        next += take;
        first = false;

        if next < lines.len() {
            ctx.new_page();
        } else {
            ctx.cursor.advance(BLOCK_GAP);
        }
    }

    log::debug!(
        "Section '{}': {} lines, ends on page {} at y={:.1}",
        block.title,
        lines.len(),
        ctx.cursor.page_index() + 1,
        ctx.cursor.y(),
    );
}
