pub mod report;

use itertools::Itertools;

use crate::view::edit::EditForm;
use crate::view::pagination::PageLink;
use crate::view::table::{HeaderCell, RowView};
use crate::view::visibility::HideButton;
use crate::view::{AppView, RenderRegions};

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn class_list<'a>(classes: impl IntoIterator<Item = (&'a str, bool)>) -> String {
    classes
        .into_iter()
        .filter(|(_, on)| *on)
        .map(|(class, _)| class)
        .join(" ")
}

pub fn render_page_links(links: &[PageLink]) -> String {
    links
        .iter()
        .map(|link| {
            format!(
                r#"<div class="{}" data-page="{n}"><p>{n}</p></div>"#,
                class_list([("pages__page", true), ("active", link.active)]),
                n = link.number
            )
        })
        .join("\n")
}

pub fn render_hide_buttons(buttons: &[HideButton]) -> String {
    buttons
        .iter()
        .map(|b| {
            format!(
                r#"<button class="{}" data-column="{}">{}</button>"#,
                b.column.hide_class(),
                b.column.key(),
                escape_html(&b.label)
            )
        })
        .join("\n")
}

pub fn render_head(cells: &[HeaderCell]) -> String {
    let cells = cells
        .iter()
        .map(|h| {
            format!(
                r#"<td class="{}" data-column="{}"><p>{}</p></td>"#,
                class_list([
                    (h.column.cell_class(), true),
                    ("active", h.active),
                    ("sortedToHigh", h.sorted_to_high),
                ]),
                h.column.key(),
                escape_html(h.label)
            )
        })
        .join("");
    format!("<tr>{cells}</tr>")
}

pub fn render_row(row: &RowView) -> String {
    let cells = row
        .cells
        .iter()
        .map(|cell| {
            let swatch = cell
                .swatch()
                .map(|color| {
                    format!(
                        r#"<div style="background-color: {}"></div>"#,
                        escape_html(color)
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<td class="{}"><p>{}</p>{swatch}</td>"#,
                cell.column.cell_class(),
                escape_html(&cell.text)
            )
        })
        .join("");
    format!(r#"<tr id="{}">{cells}</tr>"#, escape_html(row.id.as_str()))
}

pub fn render_body(rows: &[RowView]) -> String {
    rows.iter().map(render_row).join("\n")
}

pub fn render_edit_form(form: &EditForm) -> String {
    let fields = form.fields();
    let input = |id: &str, label: &str, value: &str| {
        format!(
            r#"<label for="{id}">{label}</label><input id="{id}" type="text" value="{}"/>"#,
            escape_html(value)
        )
    };
    format!(
        r#"<div class="{}">
  {}
  {}
  {}
  {}
  <button class="edit__cancelBtn" type="button">Cancel</button>
  <button class="edit__editBtn" type="button">Save</button>
</div>"#,
        class_list([("edit", true), ("visible", form.is_visible())]),
        input("name", "First name", &fields.first_name),
        input("surname", "Last name", &fields.last_name),
        input("about", "About", &fields.about),
        input("eye-color", "Eye color", &fields.eye_color),
    )
}

/// Markup for the regions that changed, keyed by their container selector.
pub fn render_regions(view: &AppView, regions: &RenderRegions) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if regions.pagination {
        out.push((".pages".to_string(), render_page_links(&view.page_links)));
    }
    if regions.hide_buttons {
        out.push((".hide".to_string(), render_hide_buttons(&view.hide_buttons)));
    }
    if regions.head {
        out.push((".table__header".to_string(), render_head(&view.head)));
    }
    if regions.body {
        out.push((".table__body".to_string(), render_body(&view.body)));
    } else if let Some(id) = regions.row.as_ref() {
        if let Some(row) = view.body.iter().find(|r| &r.id == id) {
            out.push((format!(r#"tr[id="{}"]"#, escape_html(id.as_str())), render_row(row)));
        }
    }
    if regions.edit_form {
        out.push((".edit".to_string(), render_edit_form(&view.form)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, RecordId};
    use crate::view::table::CellView;

    #[test]
    fn row_escapes_text_and_paints_swatch() {
        let row = RowView {
            id: RecordId::from("7"),
            cells: vec![
                CellView {
                    column: Column::About,
                    text: "<b>bold</b> & co".to_string(),
                },
                CellView {
                    column: Column::EyeColor,
                    text: "notacolor".to_string(),
                },
            ],
        };
        let html = render_row(&row);
        assert!(html.starts_with(r#"<tr id="7">"#));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; co"));
        assert!(html.contains(r#"<div style="background-color: notacolor"></div>"#));
    }

    #[test]
    fn header_classes_follow_sort_markers() {
        let html = render_head(&[HeaderCell {
            column: Column::Name,
            label: "Name",
            active: true,
            sorted_to_high: true,
        }]);
        assert!(html.contains(r#"class="table__name active sortedToHigh""#));
    }

    #[test]
    fn page_links_mark_active() {
        let html = render_page_links(&[
            PageLink {
                number: 1,
                active: false,
            },
            PageLink {
                number: 2,
                active: true,
            },
        ]);
        assert!(html.contains(r#"<div class="pages__page active" data-page="2"><p>2</p></div>"#));
        assert!(html.contains(r#"<div class="pages__page" data-page="1">"#));
    }
}
