//! Element locators for the WhatsApp UI.

use wadrive_core::config::AppVariant;
use wadrive_core::locator::{
    content_desc_contains, nth, resource_id_contains, text_contains, text_equals, xpath_literal,
    Locator,
};

const TEXT_VIEW: &str = "android.widget.TextView";
const EDIT_TEXT: &str = "android.widget.EditText";
const IMAGE_BUTTON: &str = "android.widget.ImageButton";

/// Anything that only shows on the main chats screen.
pub fn main_screen(variant: AppVariant) -> Vec<Locator> {
    vec![
        text_equals("*", "Chats"),
        text_equals("*", "WhatsApp"),
        Locator::id(variant.resource_id("fab")),
        Locator::id(variant.resource_id("menuitem_search")),
    ]
}

/// Chat row containers, most specific first.
pub fn chat_rows(variant: AppVariant) -> Vec<Locator> {
    let id = xpath_literal(&variant.resource_id("contact_row_container"));
    vec![
        Locator::xpath(format!("//android.widget.LinearLayout[@resource-id={id}]")),
        resource_id_contains("android.widget.LinearLayout", "contact_row_container"),
        Locator::xpath(format!("//android.view.ViewGroup[@resource-id={id}]")),
    ]
}

/// The row at 1-based `position`, once per container selector.
pub fn chat_row_at(variant: AppVariant, position: usize) -> Vec<Locator> {
    chat_rows(variant).iter().map(|l| nth(l, position)).collect()
}

/// Chat name inside a row container.
pub fn row_names() -> Vec<Locator> {
    vec![
        Locator::xpath(format!(
            ".//{TEXT_VIEW}[contains(@resource-id, 'conversations_row_contact_name')]"
        )),
        Locator::xpath(format!(".//{TEXT_VIEW}[contains(@resource-id, 'contact_name')]")),
        Locator::xpath(format!(".//{TEXT_VIEW}[@content-desc]")),
    ]
}

/// Chat names anywhere on screen (search results).
pub fn result_names() -> Locator {
    resource_id_contains(TEXT_VIEW, "conversations_row_contact_name")
}

/// The scraper reads the second TextView of a row.
pub fn scraped_name() -> Locator {
    Locator::xpath(format!(".//{TEXT_VIEW}[2]"))
}

pub fn unread_badge() -> Locator {
    content_desc_contains("android.view.View", "unread message")
}

pub fn groups_filter() -> Vec<Locator> {
    vec![
        text_equals("*", "Groups"),
        text_equals(TEXT_VIEW, "Groups"),
        content_desc_contains("*", "Groups filter"),
        text_contains("*", "Groups"),
        text_equals("android.widget.Button", "Groups"),
    ]
}

pub fn search_button(variant: AppVariant) -> Vec<Locator> {
    vec![
        Locator::id(variant.resource_id("menuitem_search")),
        Locator::accessibility("Search"),
    ]
}

pub fn search_input(variant: AppVariant) -> Vec<Locator> {
    vec![
        Locator::id(variant.resource_id("search_src_text")),
        Locator::id(variant.resource_id("search_input")),
        Locator::xpath(format!("//{EDIT_TEXT}")),
    ]
}

pub fn message_entry() -> Locator {
    resource_id_contains(EDIT_TEXT, "entry")
}

pub fn send_button() -> Locator {
    resource_id_contains(IMAGE_BUTTON, "send")
}

pub fn attach_button() -> Locator {
    resource_id_contains(IMAGE_BUTTON, "attach")
}

pub fn gallery() -> Locator {
    text_contains(TEXT_VIEW, "Gallery")
}

/// Most recent picture in the gallery picker.
pub fn first_gallery_photo() -> Locator {
    nth(
        &content_desc_contains("android.widget.ImageView", "Photo, date"),
        1,
    )
}

pub fn caption(variant: AppVariant) -> Locator {
    Locator::xpath(format!(
        "//{EDIT_TEXT}[@resource-id={}]",
        xpath_literal(&variant.resource_id("caption"))
    ))
}

pub fn focused_edit_text() -> Locator {
    Locator::xpath(format!("//{EDIT_TEXT}[@focused='true']"))
}

/// A launcher icon by its label.
pub fn launcher_label(label: &str) -> Vec<Locator> {
    vec![text_equals(TEXT_VIEW, label), Locator::accessibility(label)]
}

pub fn any_text() -> Locator {
    Locator::xpath(format!("//{TEXT_VIEW}"))
}
