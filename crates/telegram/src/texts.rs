//! User-facing texts and keyboards.
//!
//! The welcome, join, not-found and warning texts can be overridden through
//! the `messages` config table; everything else is fixed.

use uploader_config::UploaderConfig;

use crate::{
    gate::normalize_group,
    transport::{Button, Keyboard},
};

pub const GUIDE_UPLOAD_DATA: &str = "guide_upload";
pub const GUIDE_LINK_DATA: &str = "guide_link";

const WELCOME: &str = "Hi! Open a file link to download it.";
const JOIN: &str = "Please join the following channels first:";
const NOT_FOUND: &str = "File not found or the link has expired.";
const WARNING: &str = "⚠️ Videos are deleted after {delay} seconds. Save them if you need them.";

pub const GUIDE_SHORT: &str =
    "Use the buttons below to see how to upload files or how to get the download link.";

pub const LOOKUP_FAILED: &str = "Something went wrong, please try again.";
pub const LOGIN_USAGE: &str = "Usage: /login <password>";
pub const LOGIN_INVALID: &str = "Invalid password.";
pub const LOGIN_OK: &str =
    "You are now authenticated as admin. You can upload files and run admin commands.";
pub const LOGOUT_OK: &str = "Logged out from admin mode.";
pub const NOT_LOGGED_IN: &str = "You are not logged in.";
pub const SETCAPTION_USAGE: &str = "Usage: /setcaption <file_key> <new caption>";
pub const CAPTION_EMPTY: &str = "Caption cannot be empty.";
pub const CAPTION_FAILED: &str = "Failed to update caption.";
pub const SETTAG_USAGE: &str = "Usage: /settag @new_tag";
pub const PERSIST_FAILED: &str = "Failed to persist config";

pub fn welcome(cfg: &UploaderConfig) -> String {
    let greeting = cfg.messages.welcome.as_deref().unwrap_or(WELCOME);
    format!("{greeting}\n\n{GUIDE_SHORT}")
}

pub fn join(cfg: &UploaderConfig) -> &str {
    cfg.messages.join.as_deref().unwrap_or(JOIN)
}

pub fn not_found(cfg: &UploaderConfig) -> &str {
    cfg.messages.not_found.as_deref().unwrap_or(NOT_FOUND)
}

/// Notice sent after every delivered video.
pub fn warning(cfg: &UploaderConfig) -> String {
    cfg.messages
        .warning
        .as_deref()
        .unwrap_or(WARNING)
        .replace("{delay}", &cfg.delete_delay.to_string())
}

pub fn link_created(locator: &str) -> String {
    format!("File link created:\n{locator}")
}

pub fn caption_prompt(key: &str, caption: &str) -> String {
    format!(
        "Caption saved as:\n{caption}\nIf you'd like to change it before users open the link, send:\n/setcaption {key} <new caption>"
    )
}

pub fn caption_updated(key: &str) -> String {
    format!("Caption for {key} updated.")
}

pub fn tag_updated(tag: &str) -> String {
    format!("Default tag updated to {tag}")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn example_link(bot_username: &str) -> String {
    let name = escape_html(bot_username.trim_start_matches('@'));
    format!("https://t.me/{name}?start=xxx")
}

/// HTML guide for admins uploading content.
pub fn guide_upload(bot_username: &str) -> String {
    format!(
        "📤 <b>How to upload &amp; get link</b>\n\n\
         1. Send me a <b>video</b>, <b>document</b>, or <b>photo</b> (as a file).\n\
         2. Optionally add a caption (e.g. @username).\n\
         3. I will reply with a <b>link</b> (e.g. {link}).\n\
         4. Share that link with anyone; when they open it, they get the file \
         (after joining your channels if required).\n\n\
         Authenticate first with <code>/login &lt;password&gt;</code> \
         (the password is stored in the bot config).",
        link = example_link(bot_username),
    )
}

/// HTML guide for users opening a link.
pub fn guide_link(bot_username: &str) -> String {
    format!(
        "🔗 <b>How to get the file from a link</b>\n\n\
         1. Open the link you received (e.g. {link}).\n\
         2. If asked, join the required channels using the buttons, then open the link again.\n\
         3. The bot will send you the file. Videos are deleted after a short time; save them if needed.",
        link = example_link(bot_username),
    )
}

pub fn help(bot_username: &str) -> String {
    format!(
        "{GUIDE_SHORT}\n\n---\n\n{}\n\n---\n\n{}",
        guide_upload(bot_username),
        guide_link(bot_username),
    )
}

pub fn guide_keyboard() -> Keyboard {
    Keyboard::new(vec![vec![
        Button::callback("📤 How to upload", GUIDE_UPLOAD_DATA),
        Button::callback("🔗 How to get link", GUIDE_LINK_DATA),
    ]])
}

/// One URL button per gating group, labelled as configured.
pub fn join_keyboard(groups: &[String]) -> Keyboard {
    let rows = groups
        .iter()
        .filter_map(|raw| {
            let target = normalize_group(raw);
            (!target.is_empty())
                .then(|| vec![Button::url(raw.trim(), format!("https://t.me/{target}"))])
        })
        .collect();
    Keyboard::new(rows)
}
