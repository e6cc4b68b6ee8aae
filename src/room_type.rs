use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const QUANTITY_FIELD: &str = "quantity";

// Room type as supplied by the caller; anything besides the id is carried through untouched
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomType {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnhancedRoomType {
    #[serde(flatten)]
    pub room_type: RoomType,
    pub quantity: Option<u32>,
}

impl RoomType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

impl EnhancedRoomType {
    // Copies the room type, replacing any quantity it already carried
    pub fn new(room_type: &RoomType, quantity: Option<u32>) -> Self {
        let mut room_type = room_type.clone();
        room_type.attributes.remove(QUANTITY_FIELD);

        Self {
            room_type,
            quantity,
        }
    }

    pub fn id(&self) -> &str {
        &self.room_type.id
    }
}
