use chrono::NaiveDate;
use pdf_writer::Content;

use crate::fonts::FontSet;
use crate::labels::{Labels, labels};
use crate::model::{LaboratoryRecord, Team};
use crate::theme::resolve_theme;

use super::context::{
    ChromeAssets, GridCell, GridRow, LayoutContext, PageGeometry, PageLayout, fill_rect, mm,
    show_text,
};
use super::metrics::line_height;
use super::section::{SectionBlock, render_section_block};

const BANNER_TITLE_SIZE: f32 = 12.0;
const BANNER_SUBTITLE_SIZE: f32 = 8.0;
const BANNER_H: f32 = mm(24.0);
const BANNER_GAP: f32 = mm(6.0);
const FACULTY_SIZE: f32 = 10.0;
const NAME_SIZE: f32 = 18.0;
const GRID_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 7.5;
const COLUMN_GAP: f32 = mm(6.0);
const LABEL_GAP: f32 = 4.0;
const ROW_GAP: f32 = 4.0;
const CELL_PAD: f32 = mm(3.0);

const LABEL_COLOR: [u8; 3] = [0x37, 0x41, 0x51];
const VALUE_COLOR: [u8; 3] = [0x11, 0x18, 0x27];
const FOOTER_COLOR: [u8; 3] = [0x6B, 0x72, 0x80];
const BANNER_TEXT_COLOR: [u8; 3] = [255, 255, 255];

/// Lay out the whole sheet: title block, info grid, then the description, teams
/// and keywords cards. Returns one content stream and trace per page.
pub(crate) fn compose(
    record: &LaboratoryRecord,
    fonts: &FontSet,
    assets: &ChromeAssets,
    generated_on: NaiveDate,
) -> Vec<(Content, PageLayout)> {
    let fields = &record.fields;
    let theme = resolve_theme(&fields.faculty);
    let labels = labels(fields.language);

    let mut ctx = LayoutContext::new(fields.language, theme, fonts, assets);

    draw_banner(&mut ctx, labels);
    draw_title_block(&mut ctx, &fields.name);
    draw_info_grid(&mut ctx, &grid_fields(record, labels));

    render_section_block(
        &mut ctx,
        &SectionBlock {
            title: labels.description_title,
            body: &fields.description,
            placeholder: labels.no_description,
        },
    );
    let teams = teams_body(&fields.teams, labels);
    render_section_block(
        &mut ctx,
        &SectionBlock {
            title: labels.teams_title,
            body: &teams,
            placeholder: labels.no_teams,
        },
    );
    if !fields.keywords.trim().is_empty() {
        render_section_block(
            &mut ctx,
            &SectionBlock {
                title: labels.keywords_title,
                body: &fields.keywords,
                placeholder: labels.not_provided,
            },
        );
    }

    let geometry = ctx.geometry;
    let mut pages = ctx.finish();
    let total = pages.len();
    let date = generated_on.format("%d/%m/%Y").to_string();
    for (i, (content, _)) in pages.iter_mut().enumerate() {
        draw_footer(content, &geometry, fonts, labels, i + 1, total, &date);
    }
    pages
}

/// Directory banner heading the first page.
fn draw_banner(ctx: &mut LayoutContext, labels: &Labels) {
    let g = ctx.geometry;
    let width = g.content_width();
    ctx.ensure_space(BANNER_H);
    let top = ctx.cursor.y();
    ctx.fill_rect(g.content_left, top, width, BANNER_H, ctx.theme.primary);

    let fonts = ctx.fonts;
    let lines = [
        (labels.banner_title, BANNER_TITLE_SIZE, true, top + BANNER_H * 0.45),
        (labels.banner_subtitle, BANNER_SUBTITLE_SIZE, false, top + BANNER_H * 0.75),
    ];
    for (text, size, bold, baseline) in lines {
        let font = fonts.get(bold);
        let text_w = font.metrics.text_width(text, size);
        let x = g.content_left + (width - text_w).max(0.0) / 2.0;
        show_text(&mut ctx.content, font, g.height, text, x, baseline, size, BANNER_TEXT_COLOR);
        ctx.page.banner.push(text.to_string());
    }
    ctx.cursor.advance(BANNER_H + BANNER_GAP);
}

fn draw_title_block(ctx: &mut LayoutContext, name: &str) {
    let g = ctx.geometry;
    let width = g.content_width();
    let theme = ctx.theme;

    let faculty_lines = ctx.fonts.bold.metrics.wrap(theme.full_name, width, FACULTY_SIZE);
    let name_lines = ctx.fonts.bold.metrics.wrap(name.trim(), width, NAME_SIZE);

    for (lines, size, color) in [
        (faculty_lines, FACULTY_SIZE, theme.text),
        (name_lines, NAME_SIZE, theme.primary),
    ] {
        let line_h = line_height(size);
        let ascent = ctx.fonts.bold.metrics.ascent(size);
        for line in lines {
            ctx.ensure_space(line_h);
            let baseline = ctx.cursor.y() + (line_h - size) / 2.0 + ascent;
            ctx.line_at_start(&line, g.content_left, g.content_right, baseline, size, true, color);
            ctx.page.title_lines.push(line);
            ctx.cursor.advance(line_h);
        }
        ctx.cursor.advance(3.0);
    }

    // Accent rule under the title
    ctx.ensure_space(10.0);
    let rule_top = ctx.cursor.y() + 3.0;
    ctx.fill_rect(g.content_left, rule_top, width, 1.2, theme.primary);
    ctx.cursor.advance(12.0);
}

fn or_placeholder<'a>(value: &'a str, labels: &'a Labels) -> &'a str {
    let v = value.trim();
    if v.is_empty() { labels.not_provided } else { v }
}

fn grid_fields<'a>(record: &'a LaboratoryRecord, labels: &'a Labels) -> Vec<(&'a str, &'a str)> {
    let f = &record.fields;
    [
        (labels.director, f.director.as_str()),
        (labels.code, f.code.as_str()),
        (labels.creation_decree, f.creation_decree.as_str()),
        (labels.appointment_date, f.director_appointment_date.as_str()),
        (labels.domiciliation, f.domiciliation.as_str()),
        (labels.thematic_agency, f.thematic_agency.as_str()),
        (labels.email, f.email.as_str()),
        (labels.phone, f.phone.as_str()),
    ]
    .into_iter()
    .map(|(label, value)| (label, or_placeholder(value, labels)))
    .collect()
}

/// Two-column label/value grid. Each row is as tall as its taller cell, and every
/// cell sits on a tinted box padded by `CELL_PAD`.
fn draw_info_grid(ctx: &mut LayoutContext, fields: &[(&str, &str)]) {
    let g = ctx.geometry;
    let col_w = (g.content_width() - COLUMN_GAP) / 2.0;
    let text_w = col_w - 2.0 * CELL_PAD;
    let line_h = line_height(GRID_SIZE);
    let fonts = ctx.fonts;
    let label_font = &fonts.bold;
    let value_font = &fonts.regular;

    for pair in fields.chunks(2) {
        let cells: Vec<(String, f32, Vec<String>)> = pair
            .iter()
            .map(|&(label, value)| {
                let label = format!("{label} :");
                let label_w = label_font.metrics.text_width(&label, GRID_SIZE) + LABEL_GAP;
                let value_w = (text_w - label_w).max(text_w * 0.4);
                let lines = value_font.metrics.wrap(value, value_w, GRID_SIZE);
                (label, label_w, lines)
            })
            .collect();

        let max_lines = cells.iter().map(|(_, _, l)| l.len()).max().unwrap_or(1);
        let row_h = max_lines as f32 * line_h;
        ctx.ensure_space(row_h + 2.0 * CELL_PAD);
        let box_top = ctx.cursor.y();
        let top = box_top + CELL_PAD;
        let ascent = value_font.metrics.ascent(GRID_SIZE);

        for (col, (label, label_w, lines)) in cells.iter().enumerate() {
            // Column 0 is the leading column: left in LTR, right in RTL.
            let col_left = if g.rtl {
                g.content_right - (col as f32 + 1.0) * col_w - col as f32 * COLUMN_GAP
            } else {
                g.content_left + col as f32 * (col_w + COLUMN_GAP)
            };
            ctx.fill_rect(col_left, box_top, col_w, row_h + 2.0 * CELL_PAD, ctx.theme.light);

            let text_left = col_left + CELL_PAD;
            let text_right = col_left + col_w - CELL_PAD;
            let (value_left, value_right) = if g.rtl {
                (text_left, text_right - label_w)
            } else {
                (text_left + label_w, text_right)
            };

            let first_baseline = top + (line_h - GRID_SIZE) / 2.0 + ascent;
            ctx.line_at_start(label, text_left, text_right, first_baseline, GRID_SIZE, true, LABEL_COLOR);
            for (i, line) in lines.iter().enumerate() {
                let baseline = first_baseline + i as f32 * line_h;
                ctx.line_at_start(line, value_left, value_right, baseline, GRID_SIZE, false, VALUE_COLOR);
            }
        }

        ctx.page.rows.push(GridRow {
            top,
            height: row_h,
            cells: cells
                .into_iter()
                .map(|(label, _, value_lines)| GridCell { label, value_lines })
                .collect(),
        });
        ctx.cursor.advance(row_h + 2.0 * CELL_PAD + ROW_GAP);
    }
    ctx.cursor.advance(8.0);
}

/// Text body of the teams card. Empty when there are no teams, so the card shows its placeholder.
pub(crate) fn teams_body(teams: &[Team], labels: &Labels) -> String {
    teams
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let name = match team.name.trim() {
                "" => format!("{} {}", labels.team, i + 1),
                n => n.to_string(),
            };
            let leader = match team.leader.trim() {
                "" => labels.not_specified,
                l => l,
            };
            let mut entry = format!("{}. {name}\n{} : {leader}", i + 1, labels.team_leader);
            let description = team.description.trim();
            if !description.is_empty() {
                entry.push('\n');
                entry.push_str(description);
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn draw_footer(
    content: &mut Content,
    g: &PageGeometry,
    fonts: &FontSet,
    labels: &Labels,
    page_num: usize,
    total_pages: usize,
    date: &str,
) {
    let rule_top = g.height - mm(14.0);
    fill_rect(content, g.height, g.content_left, rule_top, g.content_width(), 0.5, FOOTER_COLOR);

    let baseline = g.height - mm(10.0);
    let caption = format!("{} · {} {date}", labels.footer_caption, labels.generated_on);
    let page = format!("{} {page_num} / {total_pages}", labels.page);
    let font = &fonts.regular;
    let caption_w = font.metrics.text_width(&caption, FOOTER_SIZE);
    let page_w = font.metrics.text_width(&page, FOOTER_SIZE);

    let (caption_x, page_x) = if g.rtl {
        (g.content_right - caption_w, g.content_left)
    } else {
        (g.content_left, g.content_right - page_w)
    };
    show_text(content, font, g.height, &caption, caption_x, baseline, FOOTER_SIZE, FOOTER_COLOR);
    show_text(content, font, g.height, &page, page_x, baseline, FOOTER_SIZE, FOOTER_COLOR);
}
