use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CoreError;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }

            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|e| {
                    CoreError::InvalidArgument(format!(
                        "malformed {}: {e}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

uuid_id!(FogId);
uuid_id!(SceneId);
uuid_id!(PlayerId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display_roundtrip() {
        let scene = SceneId::new();
        let parsed: SceneId = scene.to_string().parse().unwrap();
        assert_eq!(scene, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        let result = "not-a-player".parse::<PlayerId>();
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = FogId::from_bytes([0xab; 16]);
        assert_eq!(format!("{id:?}"), "FogId(abababab)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let player = PlayerId::from_bytes([1; 16]);
        let json = serde_json::to_string(&player).unwrap();
        assert_eq!(json, format!("\"{player}\""));
    }
}
