use serde::{Deserialize, Serialize};

/// Client domain model - one document per production client, owning the
/// ordered motion and still sequences shown on the site.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Client {
    pub client_id: String,
    pub name: String,
    /// Logo URL. Denormalized onto each motion at creation time.
    pub image: String,
    #[serde(default)]
    pub motions: Vec<Motion>,
    #[serde(default)]
    pub stills: Vec<Still>,
    pub created_at: String,
}

/// One motion (video) record embedded in a client document.
///
/// Field set is closed: callers pick from the enumerated optional metadata
/// rather than spreading arbitrary keys into the record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Motion {
    pub motion_id: String,
    pub client_id: String,
    pub video: String,
    /// Client logo at the time the motion was created.
    pub logo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
}

/// Still-grid entry. Position is the only address a still has, so `index`
/// is renumbered to match the sequence on every write.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Still {
    pub image: String,
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateClientPayload {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientPayload {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Reorder commit for motions: the full id sequence in its new order.
#[derive(Debug, Deserialize)]
pub struct ReorderMotionsPayload {
    pub motion_ids: Vec<String>,
}

/// Reorder commit for stills: previous positions in their new order.
#[derive(Debug, Deserialize)]
pub struct ReorderStillsPayload {
    pub order: Vec<usize>,
}
