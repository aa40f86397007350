use facility_map_core::FetchError;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn describe(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Same-origin `GET` of `location`, returning the body text.
///
/// Non-OK statuses are errors so the loader moves on to the next candidate.
pub async fn fetch_text(location: String) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(&location, &opts)
        .map_err(|e| FetchError::Network(describe(&e)))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Network(describe(&e)))?
        .dyn_into::<Response>()
        .map_err(|e| FetchError::Network(describe(&e)))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let text = response
        .text()
        .map_err(|e| FetchError::Network(describe(&e)))?;
    JsFuture::from(text)
        .await
        .map_err(|e| FetchError::Network(describe(&e)))?
        .as_string()
        .ok_or_else(|| FetchError::Parse("response body is not text".to_string()))
}
