use std::fmt;

use askama::Template;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Notice,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level = match self {
            Level::Notice => "notice",
            Level::Error => "error",
        };

        write!(f, "{}", level)
    }
}

/// Message shown under the signup form
#[derive(Clone, Debug, Template)]
#[template(path = "general/message_block.html")]
pub struct MessageBlock {
    level: Level,
    body: String,
}

impl MessageBlock {
    pub fn empty() -> Self {
        Self {
            level: Level::Notice,
            body: "".to_owned(),
        }
    }

    pub fn notice(body: &str) -> Self {
        Self {
            level: Level::Notice,
            body: body.to_owned(),
        }
    }

    pub fn error(body: &str) -> Self {
        Self {
            level: Level::Error,
            body: body.to_owned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_escaped_body() {
        let html = MessageBlock::error("<b>Email</b> is invalid").render().unwrap();

        assert!(html.contains("message error"));
        assert!(html.contains("&lt;b&gt;Email&lt;/b&gt; is invalid"));
    }

    #[test]
    fn empty_has_no_body() {
        assert!(MessageBlock::empty().is_empty());
        assert!(!MessageBlock::notice("Sent").is_empty());
    }
}
