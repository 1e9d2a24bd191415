//! "Load Saved Project" dropdown: one entry per project, searchable, fills the form on selection.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement, Node, console};

use crate::api;
use crate::models::ProjectItem;
use crate::text::{PICKER_DETAILS_LIMIT, PICKER_STRUCTURE_LIMIT, escape_html, matches_search, truncate};

pub type OnSelect = Rc<dyn Fn(&ProjectItem)>;

const PLACEHOLDER: &str = "Select a saved project...";

/// List entries for the projects matching `term`. Each carries its index into `projects`.
pub fn list_html(projects: &[ProjectItem], term: &str) -> String {
    let entries: Vec<String> = projects
        .iter()
        .enumerate()
        .filter(|(_, p)| matches_search(&[&p.project_name, &p.business_details, &p.website_structure], term))
        .map(|(index, p)| {
            format!(
                r#"<li class="picker-item" data-index="{}"><strong>{}</strong><p>{}</p><p class="muted">Structure: {}</p></li>"#,
                index,
                escape_html(&p.project_name),
                escape_html(&truncate(&p.business_details, PICKER_DETAILS_LIMIT)),
                escape_html(&truncate(&p.website_structure, PICKER_STRUCTURE_LIMIT)),
            )
        })
        .collect();

    if entries.is_empty() {
        let message = if projects.is_empty() {
            "No saved projects yet."
        } else {
            "No projects match your search."
        };
        return format!(r#"<li class="picker-empty">{}</li>"#, message);
    }
    entries.concat()
}

struct Picker {
    root: Element,
    label: Element,
    panel: Element,
    search: HtmlInputElement,
    list: Element,
    projects: RefCell<Vec<ProjectItem>>,
}

impl Picker {
    fn is_open(&self) -> bool {
        !self.panel.has_attribute("hidden")
    }

    fn close(&self) {
        self.panel.set_attribute("hidden", "").ok();
        self.search.set_value("");
    }

    fn redraw(&self) {
        let html = list_html(&self.projects.borrow(), &self.search.value());
        self.list.set_inner_html(&html);
    }

    /// Shows the panel and (re)loads the projects, as they may have changed since last time.
    fn open(self: &Rc<Self>) {
        self.panel.remove_attribute("hidden").ok();
        self.list.set_inner_html(r#"<li class="picker-empty">Loading...</li>"#);

        let picker = self.clone();
        spawn_local(async move {
            match api::fetch_projects().await {
                Ok(list) => {
                    *picker.projects.borrow_mut() = list.items;
                    picker.redraw();
                }
                Err(e) => {
                    console::error_1(&format!("Error fetching projects: {:?}", e).into());
                    picker
                        .list
                        .set_inner_html(r#"<li class="picker-empty">Could not load projects.</li>"#);
                }
            }
        });
    }

    fn select_from(&self, event: &Event, on_select: &OnSelect) {
        let Some(entry) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("[data-index]").ok().flatten())
        else {
            return;
        };
        let Some(index) = entry.get_attribute("data-index").and_then(|i| i.parse::<usize>().ok()) else {
            return;
        };

        let selected = self.projects.borrow().get(index).cloned();
        if let Some(project) = selected {
            self.label.set_text_content(Some(&project.project_name));
            self.label.set_class_name("picker-label");
            on_select(&project);
            self.close();
        }
    }
}

/// Builds the dropdown into `slot`.
pub fn render(document: &Document, slot: &Element, on_select: OnSelect) -> Result<(), JsValue> {
    let root = document.create_element("div")?;
    root.set_class_name("picker");

    let toggle = document.create_element("button")?;
    toggle.set_attribute("type", "button")?;
    toggle.set_class_name("picker-toggle");
    let label = document.create_element("span")?;
    label.set_class_name("picker-label muted");
    label.set_text_content(Some(PLACEHOLDER));
    toggle.append_child(&label)?;

    let panel = document.create_element("div")?;
    panel.set_class_name("picker-panel");
    panel.set_attribute("hidden", "")?;

    let search = document.create_element("input")?.dyn_into::<HtmlInputElement>()?;
    search.set_type("text");
    search.set_placeholder("Search projects...");
    search.set_class_name("picker-search");

    let list = document.create_element("ul")?;
    list.set_class_name("picker-list");

    panel.append_child(&search)?;
    panel.append_child(&list)?;
    root.append_child(&toggle)?;
    root.append_child(&panel)?;
    slot.append_child(&root)?;

    let picker = Rc::new(Picker {
        root,
        label,
        panel,
        search,
        list,
        projects: RefCell::new(Vec::new()),
    });

    let p = picker.clone();
    let on_toggle = Closure::wrap(Box::new(move || {
        if p.is_open() {
            p.close();
        } else {
            p.open();
        }
    }) as Box<dyn FnMut()>);
    toggle.add_event_listener_with_callback("click", on_toggle.as_ref().unchecked_ref())?;
    on_toggle.forget();

    let p = picker.clone();
    let on_search = Closure::wrap(Box::new(move || p.redraw()) as Box<dyn FnMut()>);
    picker
        .search
        .add_event_listener_with_callback("input", on_search.as_ref().unchecked_ref())?;
    on_search.forget();

    let p = picker.clone();
    let on_pick = Closure::wrap(Box::new(move |event: Event| p.select_from(&event, &on_select)) as Box<dyn FnMut(_)>);
    picker
        .list
        .add_event_listener_with_callback("click", on_pick.as_ref().unchecked_ref())?;
    on_pick.forget();

    // Close when clicking anywhere outside the picker
    let p = picker.clone();
    let on_outside = Closure::wrap(Box::new(move |event: Event| {
        let inside = event
            .target()
            .and_then(|t| t.dyn_into::<Node>().ok())
            .is_some_and(|node| p.root.contains(Some(&node)));
        if !inside && p.is_open() {
            p.close();
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("mousedown", on_outside.as_ref().unchecked_ref())?;
    on_outside.forget();

    Ok(())
}
