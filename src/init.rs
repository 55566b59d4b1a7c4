//! Init wizard: writes a starter config.toml with cliclack styled prompts.

use std::path::Path;
use wadrive_core::config::{builtin_profiles, AppVariant};

/// Folders the runs expect next to the config.
const WORK_DIRS: &[&str] = &["txt", "daily_photos", "logs"];

/// Run the interactive init wizard.
pub fn run(config_path: &str) -> anyhow::Result<()> {
    cliclack::intro("wadrive init")?;

    if Path::new(config_path).exists() {
        cliclack::log::warning(format!(
            "{config_path} already exists, skipping.\nDelete it and run 'wadrive init' again to regenerate."
        ))?;
        cliclack::outro_cancel("Nothing changed")?;
        return Ok(());
    }

    let variant: AppVariant = cliclack::select("Which app should be driven?")
        .item(
            AppVariant::Business,
            "WhatsApp Business",
            AppVariant::Business.package(),
        )
        .item(
            AppVariant::Personal,
            "WhatsApp",
            AppVariant::Personal.package(),
        )
        .interact()?;

    let mut profile_select = cliclack::select("Device profile (fallback tap coordinates)");
    for (name, p) in builtin_profiles() {
        let hint = format!(
            "send ({}, {}), search ({}, {})",
            p.send_button_x, p.send_button_y, p.search_button_x, p.search_button_y
        );
        profile_select = profile_select.item(name.clone(), name, hint);
    }
    let profile: String = profile_select.interact()?;

    let server_url: String = cliclack::input("Appium server URL")
        .default_input("http://localhost:4723")
        .interact()?;

    let udid: String = cliclack::input("Device serial (adb devices)")
        .placeholder("Enter to let adb pick the only device")
        .required(false)
        .default_input("")
        .interact()?;

    let chat_prefix: String = cliclack::input("Chat name prefix typed before each search")
        .placeholder("Enter for none")
        .required(false)
        .default_input("")
        .interact()?;

    std::fs::write(
        config_path,
        generate_config(variant, &profile, &server_url, &udid, &chat_prefix),
    )?;
    cliclack::log::success(format!("Generated {config_path}"))?;

    for dir in WORK_DIRS {
        if !Path::new(dir).exists() {
            std::fs::create_dir_all(dir)?;
            cliclack::log::success(format!("{dir}/ created"))?;
        }
    }

    cliclack::note(
        "Next steps",
        "1. Write the message in daily_message.txt\n\
         2. List target chats in txt/chat_name.txt (or run: wadrive scrape)\n\
         3. Start Appium and run: wadrive check\n\
         4. Run: wadrive send",
    )?;
    cliclack::outro("Setup complete")?;
    Ok(())
}

fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Generate config.toml content from wizard inputs (pure function for testability).
pub fn generate_config(
    variant: AppVariant,
    profile: &str,
    server_url: &str,
    udid: &str,
    chat_prefix: &str,
) -> String {
    let variant = match variant {
        AppVariant::Business => "business",
        AppVariant::Personal => "personal",
    };
    let server_url = toml_string(server_url.trim());
    let udid = toml_string(udid.trim());
    let chat_prefix = toml_string(chat_prefix.trim());
    let profile = toml_string(profile);

    format!(
        r#"[wadrive]
work_dir = "."
log_level = "info"
logs_dir = "logs"

[appium]
server_url = {server_url}
udid = {udid}
max_session_retries = 3

[app]
variant = "{variant}"

[files]
message = "daily_message.txt"
chat_names = "txt/chat_name.txt"
photos_dir = "daily_photos"
txt_dir = "txt"

[campaign]
chat_prefix = {chat_prefix}
send_photo = true
unlock_swipe = true

[scrape]
groups_only = true

[device]
profile = {profile}
"#
    )
}
