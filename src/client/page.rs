use serde::Serialize;

/// Name of the title field in the recommendation form.
pub const TITLE_FIELD: &str = "title";

/// Field values of a submitted form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        let mut form = Self::new();
        form.append(TITLE_FIELD, title);
        form
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get(TITLE_FIELD)
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// A form submission on its way to the handler.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    form: FormData,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: FormData) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// Stops the default full-page submission.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// The parts of a document the submission handler reads and writes: the
/// title input and the recommendations container.
pub trait Page: Send {
    fn title_value(&self) -> &str;
    fn clear_title(&mut self);
    fn clear_output(&mut self);
    fn set_output(&mut self, html: String);
    fn append_output(&mut self, html: &str);
    fn output(&self) -> &str;
}

/// In-memory document holding the form state and container markup.
#[derive(Debug, Clone, Default)]
pub struct HtmlPage {
    title: String,
    recommendations: String,
}

impl HtmlPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            recommendations: String::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Collects the form fields into a submit event, as a browser would.
    pub fn submit(&self) -> SubmitEvent {
        SubmitEvent::new(FormData::with_title(self.title.clone()))
    }
}

impl Page for HtmlPage {
    fn title_value(&self) -> &str {
        &self.title
    }

    fn clear_title(&mut self) {
        self.title.clear();
    }

    fn clear_output(&mut self) {
        self.recommendations.clear();
    }

    fn set_output(&mut self, html: String) {
        self.recommendations = html;
    }

    fn append_output(&mut self, html: &str) {
        self.recommendations.push_str(html);
    }

    fn output(&self) -> &str {
        &self.recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_serializes_urlencoded() {
        let mut form = FormData::with_title("Amélie & Co");
        form.append("extra", "1");
        let encoded = serde_urlencoded::to_string(&form).unwrap();
        assert_eq!(encoded, "title=Am%C3%A9lie+%26+Co&extra=1");
        assert_eq!(form.title(), Some("Amélie & Co"));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn test_submit_reads_title_field() {
        let page = HtmlPage::with_title("Heat");
        let mut event = page.submit();
        assert_eq!(event.form().title(), Some("Heat"));
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
