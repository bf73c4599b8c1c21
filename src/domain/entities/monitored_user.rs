use std::fmt;

/// A user whose presence is watched
///
/// The template is printf-style: `%s` receives the username and `%%` is a
/// literal percent sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredUser {
    pub name: String,
    pub aliases: Vec<String>,
    pub message_template: String,
}

impl MonitoredUser {
    /// Aliases are stored lower-cased
    pub fn new(
        name: impl Into<String>,
        aliases: impl IntoIterator<Item = impl AsRef<str>>,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(|a| a.as_ref().to_lowercase()).collect(),
            message_template: message_template.into(),
        }
    }

    /// `username` must already be lower-cased
    pub fn matches(&self, username: &str) -> bool {
        self.aliases.iter().any(|a| a == username)
    }

    /// Exactly one `%s` slot, not counting escaped `%%s`
    pub fn has_valid_template(&self) -> bool {
        expand(&self.message_template, "").1 == 1
    }

    pub fn render(&self, username: &str) -> String {
        expand(&self.message_template, username).0
    }
}

/// Fill every `%s` with `value` and unescape `%%`; returns the text and the slot count
fn expand(template: &str, value: &str) -> (String, usize) {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut slots = 0;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') => {
                chars.next();
                out.push_str(value);
                slots += 1;
            }
            _ => out.push('%'),
        }
    }
    (out, slots)
}

impl fmt::Display for MonitoredUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.aliases.join(", "))
    }
}
