use crate::view::AppView;

use super::{render_body, render_edit_form, render_head, render_hide_buttons, render_page_links};

const STYLE: &str = r#"
    body { font-family: sans-serif; margin: 2rem; }
    .pages { display: flex; gap: .5rem; margin-bottom: 1rem; }
    .pages__page { cursor: pointer; padding: 0 .5rem; border: 1px solid #ccc; }
    .pages__page.active { background: #222; color: #fff; }
    .hide { display: flex; gap: .5rem; margin-bottom: 1rem; }
    .table { border-collapse: collapse; width: 100%; }
    .table td { border: 1px solid #ddd; padding: .25rem .5rem; vertical-align: top; }
    .table__header td { cursor: pointer; font-weight: bold; }
    .table__header td::after { content: " \2195"; color: #aaa; }
    .table__header td.active::after { content: " \2193"; color: #000; }
    .table__header td.active.sortedToHigh::after { content: " \2191"; }
    .table__body tr { cursor: pointer; }
    .table__about p { display: -webkit-box; -webkit-line-clamp: 2; -webkit-box-orient: vertical; overflow: hidden; }
    .table__eyeColor div { width: 1rem; height: 1rem; border-radius: 50%; }
    .edit { display: none; }
    .edit.visible { display: block; }
"#;

/// Whole page with the fixed container layout filled in.
pub fn render_document(view: &AppView, title: &str) -> String {
    let title = super::escape_html(title);
    format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
  <div class="pages">
{pages}
  </div>
  <div class="hide">
{hide}
  </div>
  <table class="table">
    <thead class="table__header">{head}</thead>
    <tbody class="table__body">
{body}
    </tbody>
  </table>
{edit}
</body>
</html>
"####,
        pages = render_page_links(&view.page_links),
        hide = render_hide_buttons(&view.hide_buttons),
        head = render_head(&view.head),
        body = render_body(&view.body),
        edit = render_edit_form(&view.form),
    )
}
