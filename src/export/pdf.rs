use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Approximate Helvetica advance, as a fraction of the font size.
const CHAR_WIDTH: f32 = 0.52;

/// Paginated table writer on the PDF base fonts.
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,
    bold_font_id: Ref,

    font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new(false)
    }
}

impl PdfManager {
    /// A4, landscape when `landscape` is set.
    pub fn new(landscape: bool) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_font_id = Ref::new(4);

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
        pdf.type1_font(bold_font_id).base_font(Name(b"Helvetica-Bold"));

        let (page_w, page_h) = if landscape {
            (842.0, 595.0)
        } else {
            (595.0, 842.0)
        };

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            page_w,
            page_h,
            margin: 40.0,
            row_h: 18.0,

            next_id: 5,
            font_id,
            bold_font_id,

            font_size: 8.5,
            title_font_size: 14.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);

        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(b"F1"), self.font_id);
        fonts.pair(Name(b"F2"), self.bold_font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn draw_text(content: &mut Content, font: &[u8], x: f32, y: f32, size: f32, text: &str) {
        let encoded = to_pdf_text(text);
        content.begin_text();
        content.set_font(Name(font), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&encoded));
        content.end_text();
    }

    fn fill_band(&self, content: &mut Content, y: f32, width: f32, rgb: (f32, f32, f32)) {
        content.save_state();
        content.set_fill_rgb(rgb.0, rgb.1, rgb.2);
        content.rect(self.margin, y, width, self.row_h);
        content.fill_nonzero();
        content.restore_state();
    }

    /// Cells are clipped to their column; columns from `numeric_from` on
    /// are right aligned.
    fn draw_row(
        &self,
        content: &mut Content,
        y: f32,
        col_widths: &[f32],
        row: &[String],
        bold: bool,
        numeric_from: usize,
    ) {
        let font: &[u8] = if bold { b"F2" } else { b"F1" };
        let mut x = self.margin;

        for (i, w) in col_widths.iter().enumerate() {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            let max_chars = ((w - 6.0) / (self.font_size * CHAR_WIDTH)).max(1.0) as usize;
            let fitted = clip(text, max_chars);

            let text_w = fitted.chars().count() as f32 * self.font_size * CHAR_WIDTH;
            let tx = if i >= numeric_from {
                x + w - 3.0 - text_w
            } else {
                x + 3.0
            };
            Self::draw_text(content, font, tx, y + 5.0, self.font_size, &fitted);

            content.save_state();
            content.set_stroke_rgb(0.65, 0.65, 0.65);
            content.rect(x, y, *w, self.row_h);
            content.stroke();
            content.restore_state();

            x += w;
        }
    }

    /// Widths from content length, scaled down to the printable width.
    fn compute_col_widths(&self, headers: &[String], rows: &[Vec<String>]) -> Vec<f32> {
        let unit = self.font_size * CHAR_WIDTH;
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| h.chars().count() as f32 * unit + 8.0)
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count() as f32 * unit + 8.0);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;
        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    fn draw_page_header_footer(&self, content: &mut Content, title: &str, subtitle: &str, page: usize) {
        Self::draw_text(
            content,
            b"F2",
            self.margin,
            self.page_h - self.margin,
            self.title_font_size,
            title,
        );
        Self::draw_text(
            content,
            b"F1",
            self.margin,
            self.page_h - self.margin - 16.0,
            self.font_size,
            subtitle,
        );
        Self::draw_text(
            content,
            b"F1",
            self.page_w - self.margin - 40.0,
            self.margin - 20.0,
            self.font_size,
            &format!("Page {}", page),
        );
    }

    /// Multi-page table; the header repeats on each page and `totals`
    /// closes the last one.
    pub fn write_report(
        &mut self,
        title: &str,
        subtitle: &str,
        headers: &[String],
        rows: &[Vec<String>],
        totals: &[String],
        numeric_from: usize,
    ) {
        let mut sizing: Vec<Vec<String>> = rows.to_vec();
        sizing.push(totals.to_vec());
        let col_widths = self.compute_col_widths(headers, &sizing);
        let table_w: f32 = col_widths.iter().sum();

        let mut remaining: &[Vec<String>] = rows;
        let mut page_idx = 1;

        loop {
            let mut content = self.new_page();
            self.draw_page_header_footer(&mut content, title, subtitle, page_idx);

            let mut y = self.page_h - self.margin - 45.0;

            self.fill_band(&mut content, y, table_w, (0.85, 0.87, 0.90));
            self.draw_row(&mut content, y, &col_widths, headers, true, usize::MAX);
            y -= self.row_h;

            let mut consumed = 0;
            for (i, row) in remaining.iter().enumerate() {
                if y - self.row_h < self.margin {
                    break;
                }
                if i % 2 == 0 {
                    self.fill_band(&mut content, y, table_w, (0.96, 0.96, 0.96));
                }
                self.draw_row(&mut content, y, &col_widths, row, false, numeric_from);
                y -= self.row_h;
                consumed += 1;
            }
            remaining = &remaining[consumed..];

            let last = remaining.is_empty() && y - self.row_h >= self.margin;
            if last {
                self.fill_band(&mut content, y, table_w, (0.85, 0.88, 0.95));
                self.draw_row(&mut content, y, &col_widths, totals, true, numeric_from);
            }

            self.finalize_page(content);
            page_idx += 1;

            if last {
                break;
            }
        }
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);

        let count = self.page_refs.len() as i32;
        self.pdf
            .pages(self.pages_id)
            .count(count)
            .kids(self.page_refs.iter().copied());

        let bytes = self.pdf.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

/// The base fonts only cover Latin-1; anything else prints as `?`.
fn to_pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut s: String = text.chars().take(keep).collect();
    s.push('.');
    s
}
