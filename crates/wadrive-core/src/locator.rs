//! Element locators and XPath builders for the Android view hierarchy.

use serde::{Deserialize, Serialize};

/// A query that locates an on-screen UI element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    /// Android resource id, e.g. `com.whatsapp:id/fab`.
    Id(String),
    XPath(String),
    /// Content description.
    AccessibilityId(String),
    /// `new UiSelector()...` expression.
    UiAutomator(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    pub fn accessibility(value: impl Into<String>) -> Self {
        Self::AccessibilityId(value.into())
    }

    /// W3C `using` strategy understood by the Appium server.
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::XPath(_) => "xpath",
            Self::AccessibilityId(_) => "accessibility id",
            Self::UiAutomator(_) => "-android uiautomator",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::XPath(v) | Self::AccessibilityId(v) | Self::UiAutomator(v) => v,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath has no escape sequences, so a value holding both quote kinds is
/// split into a `concat()` of literals.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// `//{class}[@text='value']`
pub fn text_equals(class: &str, value: &str) -> Locator {
    Locator::XPath(format!("//{class}[@text={}]", xpath_literal(value)))
}

/// `//{class}[contains(@text, 'value')]`
pub fn text_contains(class: &str, value: &str) -> Locator {
    Locator::XPath(format!(
        "//{class}[contains(@text, {})]",
        xpath_literal(value)
    ))
}

/// `//{class}[contains(@resource-id, 'fragment')]`
pub fn resource_id_contains(class: &str, fragment: &str) -> Locator {
    Locator::XPath(format!(
        "//{class}[contains(@resource-id, {})]",
        xpath_literal(fragment)
    ))
}

/// `//{class}[contains(@content-desc, 'fragment')]`
pub fn content_desc_contains(class: &str, fragment: &str) -> Locator {
    Locator::XPath(format!(
        "//{class}[contains(@content-desc, {})]",
        xpath_literal(fragment)
    ))
}

/// Relative form of a locator for lookups inside a parent element.
///
/// Absolute XPath (`//x`) becomes `.//x`; other strategies are unchanged.
pub fn relative(locator: &Locator) -> Locator {
    match locator {
        Locator::XPath(x) if x.starts_with("//") => Locator::XPath(format!(".{x}")),
        other => other.clone(),
    }
}

/// 1-based positional form: `(expr)[n]`.
pub fn nth(locator: &Locator, position: usize) -> Locator {
    match locator {
        Locator::XPath(x) => Locator::XPath(format!("({x})[{position}]")),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies() {
        assert_eq!(Locator::id("a").strategy(), "id");
        assert_eq!(Locator::xpath("//a").strategy(), "xpath");
        assert_eq!(Locator::accessibility("Search").strategy(), "accessibility id");
        assert_eq!(
            Locator::UiAutomator("new UiSelector()".into()).strategy(),
            "-android uiautomator"
        );
    }

    #[test]
    fn test_literal_plain() {
        assert_eq!(xpath_literal("Groups"), "'Groups'");
    }

    #[test]
    fn test_literal_with_apostrophe() {
        assert_eq!(xpath_literal("Mom's"), "\"Mom's\"");
    }

    #[test]
    fn test_literal_with_both_quotes() {
        assert_eq!(
            xpath_literal("a'b\"c"),
            "concat('a', \"'\", 'b\"c')"
        );
    }

    #[test]
    fn test_text_equals() {
        let loc = text_equals("android.widget.TextView", "WhatsApp");
        assert_eq!(
            loc.value(),
            "//android.widget.TextView[@text='WhatsApp']"
        );
    }

    #[test]
    fn test_relative_and_nth() {
        let loc = resource_id_contains("android.widget.LinearLayout", "contact_row_container");
        assert_eq!(
            relative(&loc).value(),
            ".//android.widget.LinearLayout[contains(@resource-id, 'contact_row_container')]"
        );
        assert_eq!(
            nth(&loc, 3).value(),
            "(//android.widget.LinearLayout[contains(@resource-id, 'contact_row_container')])[3]"
        );
        let id = Locator::id("com.whatsapp:id/fab");
        assert_eq!(relative(&id), id);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Locator::id("com.whatsapp:id/fab").to_string(),
            "id=com.whatsapp:id/fab"
        );
    }
}
