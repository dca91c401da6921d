//! HTML form discovery.
//!
//! Login pages are parsed with a tag-soup tolerant parser, the first form
//! accepted by a matcher is picked, and its pre-filled inputs are collected.
//! Hidden CSRF/state tokens come along for free this way, so callers only
//! ever add the handful of fields a human would type.

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{SportsEngineError, SportsEngineResult};

/// Form fields in document order.
///
/// Setting a name that already exists replaces its value in place, so the
/// original field order is kept when overrides are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new() -> Self {
        FormFields(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    /// Pairs ready for `application/x-www-form-urlencoded` encoding.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// A form found on a page: where it posts to and what it would send.
#[derive(Debug, Clone)]
pub struct FormDescriptor {
    /// The form's `action`, resolved against the page URL.
    pub action: Url,
    pub fields: FormFields,
}

/// Accepts every form, so the first one on the page wins.
pub fn any_form(_form: &ElementRef<'_>) -> bool {
    true
}

/// Accepts forms containing an `<input>` with the given name.
#[cfg(test)]
pub(crate) fn has_input(name: &str) -> impl Fn(&ElementRef<'_>) -> bool + '_ {
    move |form: &ElementRef<'_>| inputs(form).any(|input| input.value().attr("name") == Some(name))
}

/// Find the first form on `document` accepted by `matcher` and collect its
/// default field values.
///
/// `page_url` is the URL the document was served from; relative actions
/// are resolved against it. Inputs without a name or without a non-empty
/// `value` are left out.
pub fn extract<F>(document: &str, page_url: &Url, matcher: F) -> SportsEngineResult<FormDescriptor>
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    let html = Html::parse_document(document);

    let form = elements(html.root_element())
        .filter(|el| el.value().name() == "form")
        .find(|form| matcher(form))
        .ok_or_else(|| SportsEngineError::FormNotFound {
            url: page_url.to_string(),
        })?;

    // A missing action submits back to the page itself
    let action = page_url.join(form.value().attr("action").unwrap_or_default())?;

    let mut fields = FormFields::new();
    for input in inputs(&form) {
        let name = input.value().attr("name").filter(|n| !n.is_empty());
        let value = input.value().attr("value").filter(|v| !v.is_empty());
        if let (Some(name), Some(value)) = (name, value) {
            fields.insert(name, value);
        }
    }

    Ok(FormDescriptor { action, fields })
}

fn elements<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().filter_map(ElementRef::wrap)
}

fn inputs<'a>(form: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    elements(*form).filter(|el| el.value().name() == "input")
}
