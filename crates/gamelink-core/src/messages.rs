use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// Wire tags for the closed set of application messages.
pub const SET_SERVER_STATUS: &str = "set_server_status";
pub const ADD_GAME_CHAR: &str = "add_game_char";
pub const SEND_GAME_BALANCE: &str = "send_game_balance";
pub const GET_GAME_BALANCE: &str = "get_game_balance";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetServerStatus {
    pub name: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddGameChar {
    pub user_id: String,
    pub server_name: String,
    pub char_id: String,
    pub char_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendGameBalance {
    pub user_id: String,
    pub server_name: String,
    pub tokens: Vec<GameToken>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameToken {
    pub id: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetGameBalance {
    pub user_id: String,
    pub server_name: String,
}

/// The set of inbound message tags a session will accept for dispatch.
/// Built once at startup and shared read-only across all sessions.
#[derive(Clone, Debug)]
pub struct MessageSet {
    tags: HashSet<&'static str>,
}

impl MessageSet {
    /// The standard set: every tag this crate knows how to speak.
    pub fn standard() -> Self {
        Self {
            tags: HashSet::from([
                SET_SERVER_STATUS,
                ADD_GAME_CHAR,
                SEND_GAME_BALANCE,
                GET_GAME_BALANCE,
            ]),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for MessageSet {
    fn default() -> Self {
        Self::standard()
    }
}
