use pdf_writer::{Content, Name};

use super::context::{ChromeTrace, LayoutContext, PlacedImage, Side, mm, show_text};

const WHITE: [u8; 3] = [255, 255, 255];
// Bezier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Draw the fixed decorations of a page: colored band, faculty badge, divider,
/// and on the first page the institution logo and faculty graphic when loaded.
pub(crate) fn draw_chrome(ctx: &mut LayoutContext, first_page: bool) {
    let g = ctx.geometry;
    let theme = ctx.theme;

    ctx.fill_rect(g.band_x, 0.0, g.band_width, g.height, theme.primary);

    // Badge: white disc near the top of the band holding the short faculty code
    let cx = g.band_x + g.band_width / 2.0;
    let cy = mm(16.0);
    let radius = g.band_width / 2.0 - mm(1.2);
    fill_circle(&mut ctx.content, cx, g.height - cy, radius, WHITE);

    let font = &ctx.fonts.bold;
    let mut size = 7.0f32;
    let max_w = radius * 2.0 - 2.0;
    while size > 3.5 && font.metrics.text_width(theme.badge, size) > max_w {
        size -= 0.25;
    }
    let text_w = font.metrics.text_width(theme.badge, size);
    show_text(
        &mut ctx.content,
        font,
        g.height,
        theme.badge,
        cx - text_w / 2.0,
        cy + size * 0.35,
        size,
        theme.primary,
    );

    // Divider
    {
        let [r, gr, b] = theme.primary;
        let content = &mut ctx.content;
        content.save_state();
        content.set_stroke_rgb(r as f32 / 255.0, gr as f32 / 255.0, b as f32 / 255.0);
        content.set_line_width(0.8);
        content.move_to(g.divider_x, g.height - mm(10.0));
        content.line_to(g.divider_x, mm(10.0));
        content.stroke();
        content.restore_state();
    }

    let mut logo = false;
    let mut faculty_graphic = false;
    if first_page {
        let assets = ctx.assets;
        // Logo sits at the trailing top corner, the faculty graphic at the leading one.
        let (logo_at_right, graphic_at_right) = if g.rtl { (false, true) } else { (true, false) };
        if let Some(img) = &assets.logo {
            draw_top_image(
                &mut ctx.content,
                img,
                g.content_left,
                g.content_right,
                g.height,
                logo_at_right,
            );
            logo = true;
        }
        if let Some(img) = &assets.faculty_graphic {
            draw_top_image(
                &mut ctx.content,
                img,
                g.content_left,
                g.content_right,
                g.height,
                graphic_at_right,
            );
            faculty_graphic = true;
        }
    }

    ctx.page.chrome = Some(ChromeTrace {
        band_side: if g.rtl { Side::Right } else { Side::Left },
        badge: theme.badge.to_string(),
        logo,
        faculty_graphic,
    });
}

fn draw_top_image(
    content: &mut Content,
    img: &PlacedImage,
    left: f32,
    right: f32,
    page_height: f32,
    at_right: bool,
) {
    let (max_w, max_h) = (mm(30.0), mm(13.0));
    let (w, h) = if max_w / max_h > img.aspect {
        (max_h * img.aspect, max_h)
    } else {
        (max_w, max_w / img.aspect)
    };
    let x = if at_right { right - w } else { left };
    let top = mm(3.0);
    content.save_state();
    content.transform([w, 0.0, 0.0, h, x, page_height - top - h]);
    content.x_object(Name(img.name.as_bytes()));
    content.restore_state();
}

fn fill_circle(content: &mut Content, cx: f32, cy: f32, r: f32, [red, g, b]: [u8; 3]) {
    let k = r * KAPPA;
    content.save_state();
    content.set_fill_rgb(red as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    content.move_to(cx + r, cy);
    content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    content.close_path();
    content.fill_nonzero();
    content.restore_state();
}
