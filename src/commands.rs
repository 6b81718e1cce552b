//! Command and callback-token resolution
//!
//! Both branches are data-driven: a token maps to a reply builder through a
//! finite table, so adding a command is a table entry, not new control flow.
//! Matching is exact and case-sensitive; unknown tokens resolve to `None` and
//! the dispatcher falls back to the plain acknowledgment.

use crate::api::webhooks::telegram::types::{ChatId, InlineKeyboardButton, SendMessageReply};

/// The start command token, matched against message text verbatim
pub const START_COMMAND: &str = "/start";

/// Callback token for the project list button
pub const SHOW_PROJECTS: &str = "show_projects";

/// Callback token for the contact details button
pub const SHOW_CONTACT: &str = "show_contact";

const GREETING: &str = "Hi, I'm Sai\nEmbedded Software Engineer";

const RESUME_URL: &str = "https://tnvsai.github.io/resume/";

/// A fixed project entry for the `show_projects` reply
struct Project {
    name: &'static str,
    description: &'static str,
    url: &'static str,
}

const PROJECTS: [Project; 3] = [
    Project {
        name: "CAN Bus Analyzer",
        description: "Real-time CAN frame capture and decoding for automotive ECUs",
        url: "https://github.com/tnvsai/can-bus-analyzer",
    },
    Project {
        name: "RTOS Task Profiler",
        description: "Cycle-accurate task timing instrumentation for FreeRTOS targets",
        url: "https://github.com/tnvsai/rtos-task-profiler",
    },
    Project {
        name: "Sensor Fusion Node",
        description: "IMU + GPS fusion firmware with a Kalman filter on STM32",
        url: "https://github.com/tnvsai/sensor-fusion-node",
    },
];

const CONTACT: &str = "*Get in touch*\n\n\
    \u{1f4e7} sai@tnvsai.dev\n\
    \u{1f4bc} https://www.linkedin.com/in/tnvsai\n\
    \u{1f419} https://github.com/tnvsai";

type MessageReplyBuilder = fn(ChatId) -> SendMessageReply;

/// Recognized message commands
const MESSAGE_COMMANDS: &[(&str, MessageReplyBuilder)] = &[(START_COMMAND, welcome)];

type CallbackTextBuilder = fn() -> String;

/// Recognized callback tokens
const CALLBACK_TOKENS: &[(&str, CallbackTextBuilder)] = &[
    (SHOW_PROJECTS, projects_text),
    (SHOW_CONTACT, contact_text),
];

/// Resolve message text to a reply, or `None` for unrecognized input
#[must_use]
pub fn resolve_message(text: &str, chat_id: ChatId) -> Option<SendMessageReply> {
    MESSAGE_COMMANDS
        .iter()
        .find(|(token, _)| *token == text)
        .map(|(_, build)| build(chat_id))
}

/// Resolve a callback token to a reply, or `None` for unmapped tokens
///
/// Callback replies are pre-authored Markdown bodies with the link preview
/// suppressed.
#[must_use]
pub fn resolve_callback(data: &str, chat_id: ChatId) -> Option<SendMessageReply> {
    CALLBACK_TOKENS
        .iter()
        .find(|(token, _)| *token == data)
        .map(|(_, build)| {
            SendMessageReply::new(chat_id, build())
                .markdown()
                .without_link_preview()
        })
}

/// The `/start` welcome: greeting plus the resume card keyboard
fn welcome(chat_id: ChatId) -> SendMessageReply {
    SendMessageReply::new(chat_id, GREETING).with_keyboard(vec![
        vec![InlineKeyboardButton::web_app(
            "\u{1f4c4} View My Resume",
            RESUME_URL,
        )],
        vec![
            InlineKeyboardButton::callback("\u{1f6e0} Projects", SHOW_PROJECTS),
            InlineKeyboardButton::callback("\u{2709} Contact", SHOW_CONTACT),
        ],
    ])
}

fn projects_text() -> String {
    let mut text = String::from("*Projects*\n");
    for project in &PROJECTS {
        text.push_str(&format!(
            "\n*{}*\n{}\n{}\n",
            project.name, project.description, project.url
        ));
    }
    text
}

fn contact_text() -> String {
    CONTACT.to_string()
}
