//! Sample interrupts raised by a tool-calling agent.
//!
//! All data in this module is hardcoded and fictional. Tool names follow the
//! `Service_Method` naming the upstream toolkits use.

use serde_json::{json, Map, Value};

use inbox_contracts::interrupt::{InterruptConfig, InterruptDescriptor};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Raw interrupt value as the upstream service emits it: a one-element list
/// of snake_case interrupt objects.
pub fn raw_send_email_interrupt() -> Value {
    json!([{
        "action_request": {
            "action": "Google_SendEmail",
            "args": {
                "recipient": "a@x.com",
                "subject": "Quarterly numbers",
                "body": "Hi, attached are the Q3 figures."
            }
        },
        "config": {
            "allow_ignore": true,
            "allow_respond": false,
            "allow_edit": true,
            "allow_accept": true
        },
        "description": "The agent wants to send an email on your behalf.",
        "args_schema": {
            "type": "object",
            "required": ["recipient", "subject", "body"],
            "properties": {
                "recipient": { "type": "string", "minLength": 3 },
                "subject": { "type": "string" },
                "body": { "type": "string" }
            }
        }
    }])
}

pub const AUTHORIZATION_URL: &str =
    "https://auth.example.com/oauth/authorize?tool=Google_SendEmail&state=demo";

/// Raw authorization prompt: a bare message string carrying the link.
pub fn raw_authorization_prompt() -> Value {
    json!(format!(
        "Please use the following link to authorize: {AUTHORIZATION_URL}"
    ))
}

/// Raw message raised when the tool runs without a user id.
pub fn raw_missing_user_message() -> Value {
    json!("user_id is required to run Google_SendEmail")
}

/// Raw tool error after a rate-limited send. Retry hints arrive
/// stringified.
pub fn raw_send_email_tool_error() -> Value {
    json!({
        "error": "Daily sending limit exceeded",
        "tool": "Google_SendEmail",
        "additional_prompt_content": "Wait before sending more email.",
        "can_retry": "True",
        "developer_message": "Gmail API returned 429 userRateLimitExceeded",
        "retry_after_ms": "60000"
    })
}

/// GitHub issue creation: every method allowed, so edit and respond combine.
pub fn create_issue_interrupt() -> InterruptDescriptor {
    InterruptDescriptor::new(
        "Github_CreateIssue",
        object(json!({
            "owner": "example-org",
            "repo": "inbox",
            "title": "Crash on startup",
            "body": "The app crashes when launched."
        })),
        InterruptConfig {
            allow_accept: true,
            allow_edit: true,
            allow_respond: true,
            allow_ignore: true,
        },
    )
    .with_description("The agent wants to open an issue in example-org/inbox.")
}

/// Posting a tweet: the reviewer may only respond or ignore.
pub fn post_tweet_interrupt() -> InterruptDescriptor {
    InterruptDescriptor::new(
        "X_PostTweet",
        object(json!({ "tweet_text": "Shipping the new inbox today!" })),
        InterruptConfig {
            allow_respond: true,
            allow_ignore: true,
            ..InterruptConfig::default()
        },
    )
    .with_description("The agent wants to post a tweet.")
}
