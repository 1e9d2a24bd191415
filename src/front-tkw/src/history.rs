//! History page: every request with its status and outcome, filtered locally by a search box.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlInputElement, console};

use crate::api;
use crate::models::RequestItem;
use crate::text::{HISTORY_TEXT_LIMIT, badge_class, escape_html, failure_message, matches_search, relative_time, truncate};
use crate::toast::{ToastKind, show_toast};

fn output_cell(item: &RequestItem) -> String {
    match (item.status.as_str(), item.output_link.as_deref()) {
        ("ready", Some(link)) if link.starts_with("https://") || link.starts_with("http://") => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">View Output</a>"#,
            escape_html(link)
        ),
        ("error", _) => format!(
            r#"<span class="error-marker" title="{}">Error</span>"#,
            escape_html(item.error_message.as_deref().unwrap_or_default())
        ),
        _ => r#"<span class="muted">-</span>"#.to_string(),
    }
}

/// The history table for the items matching `term`.
///
/// `age_ms` turns a stored timestamp into its age in milliseconds.
pub fn table_html(items: &[RequestItem], term: &str, age_ms: impl Fn(&str) -> f64) -> String {
    let rows: Vec<String> = items
        .iter()
        .filter(|item| matches_search(&[&item.project_name, &item.business_details, &item.website_structure], term))
        .map(|item| {
            format!(
                concat!(
                    "<tr>",
                    r#"<td title="{created}">{created_ago}</td>"#,
                    r#"<td title="{updated}">{updated_ago}</td>"#,
                    "<td>{name}</td><td>{details}</td><td>{structure}</td>",
                    r#"<td><span class="{badge}">{status}</span></td>"#,
                    "<td>{output}</td>",
                    "</tr>"
                ),
                created = escape_html(&item.created_at),
                created_ago = relative_time(age_ms(&item.created_at)),
                updated = escape_html(&item.updated_at),
                updated_ago = relative_time(age_ms(&item.updated_at)),
                name = escape_html(&item.project_name),
                details = escape_html(&truncate(&item.business_details, HISTORY_TEXT_LIMIT)),
                structure = escape_html(&truncate(&item.website_structure, HISTORY_TEXT_LIMIT)),
                badge = badge_class(&item.status),
                status = escape_html(&item.status),
                output = output_cell(item),
            )
        })
        .collect();

    if rows.is_empty() {
        return r#"<p class="empty">No requests found.</p>"#.to_string();
    }

    format!(
        concat!(
            r#"<table class="history-table"><thead><tr>"#,
            "<th>Created</th><th>Last Updated</th><th>Project Name</th><th>Business Details</th>",
            "<th>Structure</th><th>Status</th><th>Output</th>",
            "</tr></thead><tbody>{}</tbody></table>"
        ),
        rows.concat()
    )
}

fn age_in_browser(timestamp: &str) -> f64 {
    js_sys::Date::now() - js_sys::Date::parse(timestamp)
}

/// The "History" page. Fetches once when shown.
pub fn render(document: &Document, container: &Element) -> Result<(), JsValue> {
    let heading = document.create_element("h1")?;
    heading.set_text_content(Some("History"));
    container.append_child(&heading)?;

    let search = document.create_element("input")?.dyn_into::<HtmlInputElement>()?;
    search.set_type("text");
    search.set_class_name("search-input");
    search.set_placeholder("Search by project name, business details or website structure...");
    container.append_child(&search)?;

    let table = document.create_element("div")?;
    table.set_class_name("history");
    table.set_inner_html(r#"<div class="spinner" aria-label="Loading"></div>"#);
    container.append_child(&table)?;

    let items: Rc<RefCell<Vec<RequestItem>>> = Rc::new(RefCell::new(Vec::new()));

    let (view, filter, loaded) = (table.clone(), search.clone(), items.clone());
    let on_search = Closure::wrap(Box::new(move || {
        view.set_inner_html(&table_html(&loaded.borrow(), &filter.value(), age_in_browser));
    }) as Box<dyn FnMut()>);
    search.add_event_listener_with_callback("input", on_search.as_ref().unchecked_ref())?;
    on_search.forget();

    let doc = document.clone();
    spawn_local(async move {
        match api::fetch_history().await {
            Ok(list) => {
                *items.borrow_mut() = list.items;
                table.set_inner_html(&table_html(&items.borrow(), &search.value(), age_in_browser));
            }
            Err(e) => {
                console::error_1(&format!("Error fetching requests: {:?}", e).into());
                table.set_inner_html(r#"<p class="empty">Could not load the history.</p>"#);
                show_toast(&doc, &failure_message(&e), ToastKind::Error);
            }
        }
    });

    Ok(())
}
