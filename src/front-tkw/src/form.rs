use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, HtmlTextAreaElement, console};

use crate::api;
use crate::models::{ProjectItem, SubmitBody};
use crate::picker;
use crate::text::failure_message;
use crate::toast::{ToastKind, show_toast};

const HOW_IT_WORKS: &str = r#"<h3>How it works</h3>
<ol>
  <li>Load a saved project or fill out the form with your business details and website structure.</li>
  <li>Enter a unique project name for your request.</li>
  <li>Click &quot;Generate Copy&quot; to save your project and send your request.</li>
  <li>Check the <strong>History</strong> tab to see your results (usually ready in 2-3 minutes).</li>
  <li>All your projects are saved automatically and can be viewed anytime in the History section.</li>
</ol>"#;

/// Wraps `field` in a labelled form group and appends it to `parent`.
fn labelled(document: &Document, parent: &Element, text: &str, field: &Element) -> Result<(), JsValue> {
    let group = document.create_element("div")?;
    group.set_class_name("form-group");
    let label = document.create_element("label")?;
    label.set_text_content(Some(text));
    if !field.id().is_empty() {
        label.set_attribute("for", &field.id())?;
    }
    group.append_child(&label)?;
    group.append_child(field)?;
    parent.append_child(&group)?;
    Ok(())
}

fn textarea(document: &Document, id: &str, placeholder: &str) -> Result<HtmlTextAreaElement, JsValue> {
    let area = document.create_element("textarea")?.dyn_into::<HtmlTextAreaElement>()?;
    area.set_id(id);
    area.set_placeholder(placeholder);
    area.set_rows(8);
    Ok(area)
}

/// The "New Copy" page.
pub fn render(document: &Document, container: &Element) -> Result<(), JsValue> {
    let heading = document.create_element("h1")?;
    heading.set_text_content(Some("Website Copy Generator"));
    container.append_child(&heading)?;

    let form = document.create_element("div")?;
    form.set_class_name("copy-form");

    let picker_slot = document.create_element("div")?;
    labelled(document, &form, "Load Saved Project", &picker_slot)?;

    let name = document.create_element("input")?.dyn_into::<HtmlInputElement>()?;
    name.set_id("project-name");
    name.set_type("text");
    name.set_placeholder("Enter a name for your project...");
    labelled(document, &form, "Project Name *", &name)?;

    let details = textarea(
        document,
        "business-details",
        "Describe your business, target audience, tone of voice, and any specific requirements...",
    )?;
    labelled(document, &form, "Business Details *", &details)?;

    let structure = textarea(
        document,
        "website-structure",
        "List the pages you need copy for (e.g., Home, About, Services, Contact) and any specific content requirements...",
    )?;
    labelled(document, &form, "Website Structure / Pages *", &structure)?;

    let button = document.create_element("button")?.dyn_into::<HtmlButtonElement>()?;
    button.set_class_name("primary-button");
    button.set_text_content(Some("Generate Copy"));
    form.append_child(&button)?;
    container.append_child(&form)?;

    // Selecting a project fills name and details; the structure is left for the user
    let (fill_name, fill_details) = (name.clone(), details.clone());
    picker::render(
        document,
        &picker_slot,
        Rc::new(move |project: &ProjectItem| {
            fill_name.set_value(&project.project_name);
            fill_details.set_value(&project.business_details);
        }),
    )?;

    let doc = document.clone();
    let submit_button = button.clone();
    let on_generate = Closure::wrap(Box::new(move || {
        let Some(body) = SubmitBody::from_inputs(&name.value(), &details.value(), &structure.value()) else {
            show_toast(
                &doc,
                "Please fill in all fields: Project Name, Business Details, and Website Structure.",
                ToastKind::Warning,
            );
            return;
        };

        submit_button.set_disabled(true);
        submit_button.set_text_content(Some("Sending Request..."));

        let (doc, button) = (doc.clone(), submit_button.clone());
        let (name, details, structure) = (name.clone(), details.clone(), structure.clone());
        spawn_local(async move {
            match api::submit_request(&body).await {
                Ok(answer) => {
                    console::log_1(&format!("Request {} sent (reused: {})", answer.id, answer.reused).into());
                    show_toast(
                        &doc,
                        "Project saved and request sent successfully! Check the History tab for results in 2-3 minutes.",
                        ToastKind::Success,
                    );
                    name.set_value("");
                    details.set_value("");
                    structure.set_value("");
                }
                Err(e) => {
                    console::error_1(&format!("Generation failed: {:?}", e).into());
                    show_toast(&doc, &failure_message(&e), ToastKind::Error);
                }
            }
            button.set_disabled(false);
            button.set_text_content(Some("Generate Copy"));
        });
    }) as Box<dyn FnMut()>);
    button.add_event_listener_with_callback("click", on_generate.as_ref().unchecked_ref())?;
    on_generate.forget();

    let help = document.create_element("section")?;
    help.set_class_name("info-box");
    help.set_inner_html(HOW_IT_WORKS);
    container.append_child(&help)?;

    let callback = document.create_element("section")?;
    callback.set_class_name("info-box muted-box");
    callback.set_inner_html(
        r#"<h3>Callback URL</h3><p>Use this URL in your automation workflow:</p><code id="callback-url">Loading...</code>"#,
    );
    container.append_child(&callback)?;

    let doc = document.clone();
    spawn_local(async move {
        let text = match api::fetch_settings().await {
            Ok(settings) => settings.callback_url,
            Err(e) => {
                console::error_1(&format!("Error fetching settings: {:?}", e).into());
                "Unavailable".to_string()
            }
        };
        if let Some(code) = doc.get_element_by_id("callback-url") {
            code.set_text_content(Some(&text));
        }
    });

    Ok(())
}
