use serde::{Deserialize, Serialize};

use crate::errors::SessionError;
use crate::messages::{
    AddGameChar, GetGameBalance, SendGameBalance, SetServerStatus, ADD_GAME_CHAR,
    GET_GAME_BALANCE, SEND_GAME_BALANCE, SET_SERVER_STATUS,
};

/// Generic wire envelope: `{ "type": "<tag>", "data": <payload> }`.
///
/// Inbound traffic is decoded into this form first; the payload stays an
/// opaque `Value` until the tag has been checked, since its shape is only
/// knowable once the tag is known.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, payload: &impl Serialize) -> Result<Self, SessionError> {
        Ok(Self {
            kind: kind.into(),
            data: serde_json::to_value(payload).map_err(SessionError::Encode)?,
        })
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(SessionError::Encode)
    }

    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        serde_json::from_str(raw).map_err(SessionError::Decode)
    }
}

/// Outbound application messages over the closed tag set.
/// Serializes directly to the wire envelope shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutboundMessage {
    #[serde(rename = "set_server_status")]
    SetServerStatus(SetServerStatus),
    #[serde(rename = "add_game_char")]
    AddGameChar(AddGameChar),
    #[serde(rename = "send_game_balance")]
    SendGameBalance(SendGameBalance),
    #[serde(rename = "get_game_balance")]
    GetGameBalance(GetGameBalance),
}

impl OutboundMessage {
    /// The wire tag carried in the envelope's `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetServerStatus(_) => SET_SERVER_STATUS,
            Self::AddGameChar(_) => ADD_GAME_CHAR,
            Self::SendGameBalance(_) => SEND_GAME_BALANCE,
            Self::GetGameBalance(_) => GET_GAME_BALANCE,
        }
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(SessionError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::GameToken;

    #[test]
    fn outbound_serializes_to_envelope_shape() {
        let msg = OutboundMessage::GetGameBalance(GetGameBalance {
            user_id: "u1".into(),
            server_name: "server_name".into(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "get_game_balance");
        assert_eq!(json["data"]["user_id"], "u1");
        assert_eq!(json["data"]["server_name"], "server_name");
    }

    #[test]
    fn outbound_roundtrips_through_generic_envelope() {
        let msg = OutboundMessage::SendGameBalance(SendGameBalance {
            user_id: "u1".into(),
            server_name: "eu-west".into(),
            tokens: vec![GameToken {
                id: "gold".into(),
                amount: 12.5,
            }],
        });
        let env = Envelope::from_json(&msg.to_json().unwrap()).unwrap();
        assert_eq!(env.kind, "send_game_balance");
        assert_eq!(env.data["tokens"][0]["amount"], 12.5);

        // The payload is reinterpretable once the tag is known
        let parsed: SendGameBalance = serde_json::from_value(env.data).unwrap();
        assert_eq!(parsed.tokens.len(), 1);
        assert_eq!(parsed.tokens[0].id, "gold");
    }

    #[test]
    fn envelope_new_wraps_payload() {
        let env = Envelope::new(
            "set_server_status",
            &SetServerStatus {
                name: "us-east".into(),
                is_active: false,
            },
        )
        .unwrap();
        let wire = env.to_json().unwrap();
        let back = Envelope::from_json(&wire).unwrap();
        assert_eq!(back, env);
        assert_eq!(back.data["is_active"], false);
    }

    #[test]
    fn unknown_tag_still_decodes_generically() {
        let env = Envelope::from_json(r#"{"type":"bogus","data":{"x":1}}"#).unwrap();
        assert_eq!(env.kind, "bogus");
        assert_eq!(env.data["x"], 1);
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let err = Envelope::from_json("{not json").unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
        assert_eq!(err.kind(), "decode");

        // Valid JSON but missing the envelope fields
        let err = Envelope::from_json(r#"{"data":{}}"#).unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
    }

    #[test]
    fn kind_matches_serialized_tag() {
        let messages = [
            OutboundMessage::SetServerStatus(SetServerStatus {
                name: "n".into(),
                is_active: true,
            }),
            OutboundMessage::AddGameChar(AddGameChar {
                user_id: "u".into(),
                server_name: "s".into(),
                char_id: "c".into(),
                char_name: "cn".into(),
            }),
            OutboundMessage::SendGameBalance(SendGameBalance {
                user_id: "u".into(),
                server_name: "s".into(),
                tokens: vec![],
            }),
            OutboundMessage::GetGameBalance(GetGameBalance {
                user_id: "u".into(),
                server_name: "s".into(),
            }),
        ];
        for msg in messages {
            let json = serde_json::to_value(&msg).unwrap();
            assert_eq!(json["type"], msg.kind());
        }
    }
}
