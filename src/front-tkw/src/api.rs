use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::models::{ProjectList, RequestFailure, RequestList, Settings, SubmitAnswer, SubmitBody};

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Runs one fetch against the API and decodes the JSON answer.
async fn call<T: DeserializeOwned>(method: &str, url: &str, body: Option<String>) -> Result<T, RequestFailure> {
    let window = web_sys::window().ok_or_else(|| RequestFailure::Network("no global window exists".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|e| RequestFailure::Network(describe(&e)))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| RequestFailure::Network(describe(&e)))?;
    }

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| RequestFailure::Network(describe(&e)))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| RequestFailure::Decode(describe(&e)))?;

    if !resp.ok() {
        let text = match resp.text() {
            Ok(promise) => JsFuture::from(promise).await.ok().and_then(|t| t.as_string()),
            Err(_) => None,
        };
        return Err(RequestFailure::Status {
            status: resp.status(),
            body: text.unwrap_or_default(),
        });
    }

    let json = JsFuture::from(resp.json().map_err(|e| RequestFailure::Decode(describe(&e)))?)
        .await
        .map_err(|e| RequestFailure::Decode(describe(&e)))?;
    serde_wasm_bindgen::from_value(json).map_err(|e| RequestFailure::Decode(e.to_string()))
}

/// Store the request and hand it to the automation system.
pub async fn submit_request(body: &SubmitBody) -> Result<SubmitAnswer, RequestFailure> {
    let encoded = serde_json::to_string(body).map_err(|e| RequestFailure::Decode(e.to_string()))?;
    call("POST", "/api/requests", Some(encoded)).await
}

pub async fn fetch_projects() -> Result<ProjectList, RequestFailure> {
    call("GET", "/api/projects", None).await
}

/// The whole history; the view filters it locally as the user types.
pub async fn fetch_history() -> Result<RequestList, RequestFailure> {
    call("GET", "/api/requests", None).await
}

pub async fn fetch_settings() -> Result<Settings, RequestFailure> {
    call("GET", "/api/settings", None).await
}
