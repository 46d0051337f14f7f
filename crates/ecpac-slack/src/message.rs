//! Slack `mrkdwn` message builder.

/// A title followed by a bullet list of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    title: String,
    fields: Vec<(String, String)>,
}

impl Message {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Add a plain field.
    pub fn field(mut self, label: &str, value: impl ToString) -> Self {
        self.fields.push((label.to_string(), value.to_string()));
        self
    }

    /// Add a field rendered as inline code.
    pub fn code(mut self, label: &str, value: impl ToString) -> Self {
        self.fields
            .push((label.to_string(), format!("`{}`", value.to_string())));
        self
    }

    pub fn render(&self) -> String {
        let mut text = format!("{}:", self.title);
        for (label, value) in &self.fields {
            text.push_str(&format!("\n- {}: {}", label, value));
        }
        text
    }
}
