use facility_map_core::metrics::Headline;
use web_sys::Document;

const HEADLINE_ID: &str = "headline-value";

pub fn has_headline(document: &Document) -> bool {
    let present = document.get_element_by_id(HEADLINE_ID).is_some();
    if !present {
        log::info!("no #{HEADLINE_ID} element, headline disabled");
    }
    present
}

pub fn show(document: &Document, headline: Headline) {
    if let Some(element) = document.get_element_by_id(HEADLINE_ID) {
        element.set_text_content(Some(&headline.to_string()));
    }
}
