use std::{fmt, str::FromStr};

use crate::error::RconError;

/// Administrative verbs understood by a Project Zomboid server console.
///
/// Arguments are not validated here; they are passed through verbatim after
/// the verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    AddItem,
    AddUser,
    AddUserToWhitelist,
    RemoveUserFromWhitelist,
    BanId,
    UnbanId,
    BanUser,
    UnbanUser,
    GrantAdmin,
    RemoveAdmin,
    KickUser,
    ServerMsg,
    SetAccessLevel,
    VoiceBan,
}

impl Command {
    pub const ALL: [Command; 14] = [
        Command::AddItem,
        Command::AddUser,
        Command::AddUserToWhitelist,
        Command::RemoveUserFromWhitelist,
        Command::BanId,
        Command::UnbanId,
        Command::BanUser,
        Command::UnbanUser,
        Command::GrantAdmin,
        Command::RemoveAdmin,
        Command::KickUser,
        Command::ServerMsg,
        Command::SetAccessLevel,
        Command::VoiceBan,
    ];

    /// The verb as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::AddItem => "additem",
            Command::AddUser => "adduser",
            Command::AddUserToWhitelist => "addusertowhitelist",
            Command::RemoveUserFromWhitelist => "removeuserfromwhitelist",
            Command::BanId => "banid",
            Command::UnbanId => "unbanid",
            Command::BanUser => "banuser",
            Command::UnbanUser => "unbanuser",
            Command::GrantAdmin => "grantadmin",
            Command::RemoveAdmin => "removeadmin",
            Command::KickUser => "kickuser",
            Command::ServerMsg => "servermsg",
            Command::SetAccessLevel => "setaccesslevel",
            Command::VoiceBan => "voiceban",
        }
    }

    /// Build the payload for this command. There is always exactly one space
    /// after the verb, so empty `args` leave a trailing space, which the
    /// server accepts.
    pub fn with_args(&self, args: &str) -> String {
        format!("{} {}", self.as_str(), args)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = RconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RconError::UnknownCommand(s.to_owned()))
    }
}
