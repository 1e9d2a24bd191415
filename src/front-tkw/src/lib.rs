use wasm_bindgen::prelude::*;
use web_sys::{Document, Window, console};

mod api;
mod form;
mod history;
pub mod models;
mod picker;
pub mod text;
mod toast;

/// The two views, selected by the URL hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    NewCopy,
    History,
}

impl Page {
    const ALL: [Page; 2] = [Page::NewCopy, Page::History];

    pub fn from_hash(hash: &str) -> Self {
        match hash.trim_start_matches('#').trim_matches('/') {
            "history" => Page::History,
            _ => Page::NewCopy,
        }
    }

    pub fn hash(self) -> &'static str {
        match self {
            Page::NewCopy => "#/",
            Page::History => "#/history",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Page::NewCopy => "Website Copy Generator",
            Page::History => "History",
        }
    }

    fn nav_id(self) -> &'static str {
        match self {
            Page::NewCopy => "nav-new-copy",
            Page::History => "nav-history",
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console::log_1(&"WASM module initialized!".into());

    let window = web_sys::window().expect("no global window exists");
    let document = window.document().expect("should have a document on window");

    create_layout(&document)?;
    show_page(&document, current_page(&window))?;

    let on_hash_change = Closure::wrap(Box::new(move || {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };
        if let Err(e) = show_page(&document, current_page(&window)) {
            console::error_1(&e);
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("hashchange", on_hash_change.as_ref().unchecked_ref())?;
    on_hash_change.forget();

    Ok(())
}

fn current_page(window: &Window) -> Page {
    Page::from_hash(&window.location().hash().unwrap_or_default())
}

/// Sidebar, main area and the toast container.
fn create_layout(document: &Document) -> Result<(), JsValue> {
    let body = document.body().expect("document should have a body");

    let layout = document.create_element("div")?;
    layout.set_class_name("layout");

    let sidebar = document.create_element("nav")?;
    sidebar.set_class_name("sidebar");

    let brand = document.create_element("div")?;
    brand.set_class_name("brand");
    brand.set_text_content(Some("Tekton Words"));
    sidebar.append_child(&brand)?;

    let links = document.create_element("ul")?;
    for page in Page::ALL {
        let item = document.create_element("li")?;
        let link = document.create_element("a")?;
        link.set_id(page.nav_id());
        link.set_attribute("href", page.hash())?;
        link.set_text_content(Some(page.label()));
        item.append_child(&link)?;
        links.append_child(&item)?;
    }
    sidebar.append_child(&links)?;

    let main = document.create_element("main")?;
    main.set_id("page");

    let toasts = document.create_element("div")?;
    toasts.set_id("toasts");

    layout.append_child(&sidebar)?;
    layout.append_child(&main)?;
    body.append_child(&layout)?;
    body.append_child(&toasts)?;

    Ok(())
}

/// Replaces the main area with `page` and highlights its link.
pub fn show_page(document: &Document, page: Page) -> Result<(), JsValue> {
    for candidate in Page::ALL {
        if let Some(link) = document.get_element_by_id(candidate.nav_id()) {
            link.set_class_name(if candidate == page { "active" } else { "" });
        }
    }

    let Some(main) = document.get_element_by_id("page") else {
        return Err(JsValue::from_str("main page container is missing"));
    };
    main.set_inner_html("");

    match page {
        Page::NewCopy => form::render(document, &main),
        Page::History => history::render(document, &main),
    }
}
