pub const ACCESS_DENIED: &str = "BIOS error: Access denied!";
pub const UNRECOGNIZED: &str = "ERROR: INPUT UNRECOGNIZED!";
pub const MODEL_NOT_FOUND: &str = "Model not found";

/// Name of the string option taken by `setmodel`.
pub const MODEL_OPTION: &str = "model";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Model,
    Enable,
    Disable,
    SetModel(String),
    Unknown(String),
}

impl Command {
    pub fn parse(name: &str, option: Option<&str>) -> Self {
        match name {
            "ping" => Command::Ping,
            "model" => Command::Model,
            "enable" => Command::Enable,
            "disable" => Command::Disable,
            "setmodel" => Command::SetModel(option.unwrap_or_default().to_string()),
            other => Command::Unknown(other.to_string()),
        }
    }

    pub fn is_privileged(&self) -> bool {
        !matches!(self, Command::Ping | Command::Model)
    }
}

/// Slash command as registered with the chat platform.
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Required string option as `(name, description)`.
    pub option: Option<(&'static str, &'static str)>,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "ping",
        description: "Replies with Pong!",
        option: None,
    },
    CommandSpec {
        name: "enable",
        description: "Enable Chappie",
        option: None,
    },
    CommandSpec {
        name: "disable",
        description: "Disable Chappie",
        option: None,
    },
    CommandSpec {
        name: "model",
        description: "Get Chappie's model",
        option: None,
    },
    CommandSpec {
        name: "setmodel",
        description: "Set Chappie's model",
        option: Some((MODEL_OPTION, "The model to use")),
    },
];
