//! The operation table.
//!
//! Every action the gateway exposes is one row in [`OPERATIONS`]: a
//! (resource, operation) pair mapped to a fixed HTTP method, a path
//! template and the parameter fields that feed the request.  The fields of
//! a row are also the only parameters that are *active* for that pair; the
//! router never reads anything else, and the node definitions advertise
//! exactly those fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZapiError};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Top-level category of gateway functionality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    #[default]
    Message,
    Instance,
    Group,
    Chat,
    Contact,
    Profile,
    Channel,
    Community,
    Status,
    Catalog,
    Event,
}

impl Resource {
    /// All resources, in the order they are presented to users.
    pub const ALL: [Resource; 11] = [
        Self::Message,
        Self::Instance,
        Self::Group,
        Self::Chat,
        Self::Contact,
        Self::Profile,
        Self::Channel,
        Self::Community,
        Self::Status,
        Self::Catalog,
        Self::Event,
    ];

    /// The wire name of the resource.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Instance => "instance",
            Self::Group => "group",
            Self::Chat => "chat",
            Self::Contact => "contact",
            Self::Profile => "profile",
            Self::Channel => "channel",
            Self::Community => "community",
            Self::Status => "status",
            Self::Catalog => "catalog",
            Self::Event => "event",
        }
    }

    /// The operation preselected when a user picks this resource.
    pub fn default_operation(self) -> &'static str {
        match self {
            Self::Message => "sendText",
            Self::Instance => "getStatus",
            Self::Group => "getMetadata",
            Self::Chat => "getChats",
            Self::Contact => "getContacts",
            Self::Profile => "getProfile",
            Self::Channel => "list",
            Self::Community => "list",
            Self::Status => "sendText",
            Self::Catalog => "sendProduct",
            Self::Event => "sendEvent",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ZapiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ZapiError::UnknownResource(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// HTTP method
// ---------------------------------------------------------------------------

/// The HTTP methods the gateway uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// How a parameter value is normalized before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Passed through as a string.
    Text,
    /// Normalized with [`crate::phone::normalize`].
    Phone,
    /// Comma-separated phones, each normalized.
    PhoneList,
    /// Comma-separated strings, each trimmed.
    List,
    /// A JSON document parsed into a value.
    Json,
    /// One of a fixed set of strings.
    Choice(&'static [&'static str]),
}

/// Where a field ends up in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A key of the JSON body.
    Body(&'static str),
    /// Substituted into the `{param}` segment of the path template.
    Path,
}

/// One active parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Parameter name as the user configures it.
    pub param: &'static str,
    pub target: Target,
    pub kind: FieldKind,
    pub required: bool,
    /// Value used when an optional parameter is not set.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    /// A required field copied into the body under `key`.
    pub const fn body(param: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            param,
            target: Target::Body(key),
            kind,
            required: true,
            default: None,
        }
    }

    /// A required field substituted into the path.
    pub const fn path(param: &'static str, kind: FieldKind) -> Self {
        Self {
            param,
            target: Target::Path,
            kind,
            required: true,
            default: None,
        }
    }

    /// Make the field optional, defaulting to the empty string.
    pub const fn optional(mut self) -> Self {
        self.required = false;
        if self.default.is_none() {
            self.default = Some("");
        }
        self
    }

    /// Make the field optional with an explicit default.
    pub const fn or(mut self, default: &'static str) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }
}

const ORDER_STATUSES: &[&str] = &["pending", "processing", "shipped", "completed", "canceled"];
const EVENT_RESPONSES: &[&str] = &["going", "not_going", "maybe"];

const PHONE: FieldSpec = FieldSpec::body("phone", "phone", FieldKind::Phone);
const MESSAGE_ID: FieldSpec = FieldSpec::body("messageId", "messageId", FieldKind::Text);
const CAPTION: FieldSpec = FieldSpec::body("caption", "caption", FieldKind::Text).optional();
const GROUP_ID: FieldSpec = FieldSpec::body("groupId", "groupId", FieldKind::Text);
const PARTICIPANTS: FieldSpec = FieldSpec::body("participants", "phones", FieldKind::PhoneList);
const COMMUNITY_ID: FieldSpec = FieldSpec::body("communityId", "communityId", FieldKind::Text);
const GROUP_TO_LINK: FieldSpec = FieldSpec::body("groupIdToLink", "groupId", FieldKind::Text);
const CHANNEL_ID: FieldSpec = FieldSpec::body("channelId", "id", FieldKind::Text);
const EVENT_GROUP: FieldSpec = FieldSpec::body("eventGroupId", "groupId", FieldKind::Text);
const EVENT_ID: FieldSpec = FieldSpec::body("eventId", "eventId", FieldKind::Text);
const EVENT_NAME: FieldSpec = FieldSpec::body("eventName", "name", FieldKind::Text);
const EVENT_DESCRIPTION: FieldSpec =
    FieldSpec::body("eventDescription", "description", FieldKind::Text).optional();
const EVENT_DATE: FieldSpec = FieldSpec::body("eventDate", "dateTime", FieldKind::Text);

/// Human-readable description of a parameter, used in node definitions.
pub fn describe_param(param: &str) -> &'static str {
    match param {
        "phone" => "Phone number with country code (e.g. 5511999999999)",
        "message" => "Text message to send",
        "imageUrl" => "URL of the image to send",
        "caption" => "Caption for the media",
        "videoUrl" => "URL of the video to send",
        "audioUrl" => "URL of the audio to send",
        "documentUrl" => "URL of the document to send",
        "documentName" => "Name of the document file",
        "latitude" => "Latitude of the location",
        "longitude" => "Longitude of the location",
        "locationName" => "Name of the location",
        "contactName" => "Name of the shared contact",
        "contactPhone" => "Phone number of the shared contact",
        "linkUrl" => "URL to share",
        "linkTitle" => "Title of the link preview",
        "linkDescription" => "Description of the link preview",
        "stickerUrl" => "URL of the sticker to send",
        "messageId" => "ID of the message",
        "reaction" => "Emoji reaction to send",
        "forwardToPhone" => "Phone number to forward the message to",
        "listTitle" => "Title of the option list",
        "listDescription" => "Description of the option list",
        "listButtonText" => "Text of the button that opens the list",
        "listSections" => "Sections array in JSON format",
        "pollQuestion" => "Question of the poll",
        "pollOptions" => "Poll options separated by commas",
        "groupId" => "ID of the group",
        "groupName" => "Name of the new group",
        "participants" => "Participant phone numbers separated by commas",
        "name" => "New profile name",
        "statusText" => "New profile status text",
        "photoUrl" => "URL of the new profile picture",
        "channelName" => "Name of the channel",
        "channelDescription" => "Description of the channel",
        "channelId" => "ID of the channel",
        "searchQuery" => "Text to search channels for",
        "communityName" => "Name of the community",
        "communityId" => "ID of the community",
        "groupIdToLink" => "ID of the group to link or unlink",
        "statusMessage" => "Text of the status update",
        "statusImageUrl" => "URL of the status image",
        "statusVideoUrl" => "URL of the status video",
        "productId" => "ID of the catalog product",
        "orderStatus" => "New status of the order",
        "eventName" => "Name of the event",
        "eventDescription" => "Description of the event",
        "eventDate" => "Date and time of the event (ISO 8601)",
        "eventGroupId" => "ID of the group hosting the event",
        "eventId" => "ID of the event",
        "eventResponse" => "Attendance response",
        _ => "",
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// One row of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub resource: Resource,
    /// Operation name as the user selects it (e.g. `sendText`).
    pub operation: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    /// Path relative to the instance base URL; may contain one `{param}`.
    pub path: &'static str,
    pub fields: &'static [FieldSpec],
}

impl OperationSpec {
    /// Whether `param` is active for this operation.
    pub fn is_active(&self, param: &str) -> bool {
        self.fields.iter().any(|f| f.param == param)
    }
}

/// Find the row for a (resource, operation) pair.
pub fn lookup(resource: Resource, operation: &str) -> Result<&'static OperationSpec> {
    OPERATIONS
        .iter()
        .find(|op| op.resource == resource && op.operation == operation)
        .ok_or_else(|| ZapiError::UnknownOperation {
            resource: resource.to_string(),
            operation: operation.to_string(),
        })
}

/// All operations of one resource, in table order.
pub fn for_resource(resource: Resource) -> impl Iterator<Item = &'static OperationSpec> {
    OPERATIONS.iter().filter(move |op| op.resource == resource)
}

/// The complete operation table.
pub static OPERATIONS: &[OperationSpec] = &[
    // -- message ------------------------------------------------------------
    OperationSpec {
        resource: Resource::Message,
        operation: "sendText",
        description: "Send a text message",
        method: HttpMethod::Post,
        path: "/send-text",
        fields: &[PHONE, FieldSpec::body("message", "message", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendImage",
        description: "Send an image by URL",
        method: HttpMethod::Post,
        path: "/send-image",
        fields: &[
            PHONE,
            FieldSpec::body("imageUrl", "image", FieldKind::Text),
            CAPTION,
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendVideo",
        description: "Send a video by URL",
        method: HttpMethod::Post,
        path: "/send-video",
        fields: &[
            PHONE,
            FieldSpec::body("videoUrl", "video", FieldKind::Text),
            CAPTION,
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendAudio",
        description: "Send an audio file by URL",
        method: HttpMethod::Post,
        path: "/send-audio",
        fields: &[PHONE, FieldSpec::body("audioUrl", "audio", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendDocument",
        description: "Send a document by URL",
        method: HttpMethod::Post,
        path: "/send-document-url",
        fields: &[
            PHONE,
            FieldSpec::body("documentUrl", "document", FieldKind::Text),
            FieldSpec::body("documentName", "fileName", FieldKind::Text).optional(),
            CAPTION,
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendLocation",
        description: "Send a location pin",
        method: HttpMethod::Post,
        path: "/send-location",
        fields: &[
            PHONE,
            FieldSpec::body("latitude", "latitude", FieldKind::Text),
            FieldSpec::body("longitude", "longitude", FieldKind::Text),
            FieldSpec::body("locationName", "name", FieldKind::Text).optional(),
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendContact",
        description: "Share a contact card",
        method: HttpMethod::Post,
        path: "/send-contact",
        fields: &[
            PHONE,
            FieldSpec::body("contactName", "contactName", FieldKind::Text),
            FieldSpec::body("contactPhone", "contactPhone", FieldKind::Text),
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendLink",
        description: "Send a link with a preview",
        method: HttpMethod::Post,
        path: "/send-link",
        fields: &[
            PHONE,
            FieldSpec::body("linkUrl", "message", FieldKind::Text),
            FieldSpec::body("linkUrl", "linkUrl", FieldKind::Text),
            FieldSpec::body("linkTitle", "title", FieldKind::Text).optional(),
            FieldSpec::body("linkDescription", "linkDescription", FieldKind::Text).optional(),
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendSticker",
        description: "Send a sticker by URL",
        method: HttpMethod::Post,
        path: "/send-sticker",
        fields: &[PHONE, FieldSpec::body("stickerUrl", "sticker", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendList",
        description: "Send an option list",
        method: HttpMethod::Post,
        path: "/send-option-list",
        fields: &[
            PHONE,
            FieldSpec::body("listTitle", "title", FieldKind::Text),
            FieldSpec::body("listDescription", "description", FieldKind::Text).optional(),
            FieldSpec::body("listButtonText", "buttonText", FieldKind::Text).or("Ver opções"),
            FieldSpec::body("listSections", "sections", FieldKind::Json).or("[]"),
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendPoll",
        description: "Send a poll",
        method: HttpMethod::Post,
        path: "/send-poll",
        fields: &[
            PHONE,
            FieldSpec::body("pollQuestion", "message", FieldKind::Text),
            FieldSpec::body("pollOptions", "options", FieldKind::List),
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "sendReaction",
        description: "React to a message with an emoji",
        method: HttpMethod::Post,
        path: "/send-reaction",
        fields: &[
            PHONE,
            MESSAGE_ID,
            FieldSpec::body("reaction", "reaction", FieldKind::Text).or("👍"),
        ],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "deleteMessage",
        description: "Delete a message",
        method: HttpMethod::Delete,
        path: "/delete-message",
        fields: &[PHONE, MESSAGE_ID],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "readMessage",
        description: "Mark a message as read",
        method: HttpMethod::Post,
        path: "/read-message",
        fields: &[PHONE, MESSAGE_ID],
    },
    OperationSpec {
        resource: Resource::Message,
        operation: "forwardMessage",
        description: "Forward a message to another phone",
        method: HttpMethod::Post,
        path: "/forward-message",
        fields: &[
            FieldSpec::body("forwardToPhone", "phone", FieldKind::Phone),
            MESSAGE_ID,
        ],
    },
    // -- instance -----------------------------------------------------------
    OperationSpec {
        resource: Resource::Instance,
        operation: "getQrCode",
        description: "Get the pairing QR code",
        method: HttpMethod::Get,
        path: "/qr-code",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Instance,
        operation: "getStatus",
        description: "Get the instance connection status",
        method: HttpMethod::Get,
        path: "/status",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Instance,
        operation: "restart",
        description: "Restart the instance",
        method: HttpMethod::Get,
        path: "/restart",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Instance,
        operation: "disconnect",
        description: "Disconnect the instance from WhatsApp",
        method: HttpMethod::Get,
        path: "/disconnect",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Instance,
        operation: "getPhoneInfo",
        description: "Get information about the connected phone",
        method: HttpMethod::Get,
        path: "/phone",
        fields: &[],
    },
    // -- group --------------------------------------------------------------
    OperationSpec {
        resource: Resource::Group,
        operation: "create",
        description: "Create a group",
        method: HttpMethod::Post,
        path: "/create-group",
        fields: &[
            FieldSpec::body("groupName", "groupName", FieldKind::Text),
            PARTICIPANTS,
        ],
    },
    OperationSpec {
        resource: Resource::Group,
        operation: "getMetadata",
        description: "Get group metadata",
        method: HttpMethod::Get,
        path: "/group-metadata/{groupId}",
        fields: &[FieldSpec::path("groupId", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Group,
        operation: "addParticipant",
        description: "Add participants to a group",
        method: HttpMethod::Post,
        path: "/add-participant",
        fields: &[GROUP_ID, PARTICIPANTS],
    },
    OperationSpec {
        resource: Resource::Group,
        operation: "removeParticipant",
        description: "Remove participants from a group",
        method: HttpMethod::Delete,
        path: "/remove-participant",
        fields: &[GROUP_ID, PARTICIPANTS],
    },
    OperationSpec {
        resource: Resource::Group,
        operation: "getInviteLink",
        description: "Get the group invite link",
        method: HttpMethod::Get,
        path: "/group-invite-link/{groupId}",
        fields: &[FieldSpec::path("groupId", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Group,
        operation: "leave",
        description: "Leave a group",
        method: HttpMethod::Post,
        path: "/leave-group",
        fields: &[GROUP_ID],
    },
    // -- chat ---------------------------------------------------------------
    OperationSpec {
        resource: Resource::Chat,
        operation: "getChats",
        description: "List chats",
        method: HttpMethod::Get,
        path: "/chats",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Chat,
        operation: "archive",
        description: "Archive a chat",
        method: HttpMethod::Post,
        path: "/archive-chat",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Chat,
        operation: "delete",
        description: "Delete a chat",
        method: HttpMethod::Delete,
        path: "/delete-chat",
        fields: &[],
    },
    // -- contact ------------------------------------------------------------
    OperationSpec {
        resource: Resource::Contact,
        operation: "getContacts",
        description: "List contacts",
        method: HttpMethod::Get,
        path: "/contacts",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Contact,
        operation: "getProfilePicture",
        description: "Get a contact's profile picture",
        method: HttpMethod::Get,
        path: "/profile-picture/{phone}",
        fields: &[FieldSpec::path("phone", FieldKind::Phone)],
    },
    OperationSpec {
        resource: Resource::Contact,
        operation: "checkWhatsApp",
        description: "Check whether a phone number has WhatsApp",
        method: HttpMethod::Get,
        path: "/phone-exists/{phone}",
        fields: &[FieldSpec::path("phone", FieldKind::Phone)],
    },
    // -- profile ------------------------------------------------------------
    OperationSpec {
        resource: Resource::Profile,
        operation: "getProfile",
        description: "Get the profile of the connected account",
        method: HttpMethod::Get,
        path: "/profile",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Profile,
        operation: "updateName",
        description: "Update the profile name",
        method: HttpMethod::Put,
        path: "/update-profile-name",
        fields: &[FieldSpec::body("name", "name", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Profile,
        operation: "updateStatus",
        description: "Update the profile status text",
        method: HttpMethod::Put,
        path: "/profile-status",
        fields: &[FieldSpec::body("statusText", "status", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Profile,
        operation: "updatePhoto",
        description: "Update the profile picture",
        method: HttpMethod::Put,
        path: "/profile-picture",
        fields: &[FieldSpec::body("photoUrl", "image", FieldKind::Text)],
    },
    // -- channel ------------------------------------------------------------
    OperationSpec {
        resource: Resource::Channel,
        operation: "create",
        description: "Create a channel",
        method: HttpMethod::Post,
        path: "/create-newsletter",
        fields: &[
            FieldSpec::body("channelName", "name", FieldKind::Text),
            FieldSpec::body("channelDescription", "description", FieldKind::Text).optional(),
        ],
    },
    OperationSpec {
        resource: Resource::Channel,
        operation: "list",
        description: "List channels",
        method: HttpMethod::Get,
        path: "/newsletters",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Channel,
        operation: "search",
        description: "Search channels",
        method: HttpMethod::Post,
        path: "/search-newsletter",
        fields: &[FieldSpec::body("searchQuery", "text", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Channel,
        operation: "follow",
        description: "Follow a channel",
        method: HttpMethod::Post,
        path: "/follow-newsletter",
        fields: &[CHANNEL_ID],
    },
    OperationSpec {
        resource: Resource::Channel,
        operation: "unfollow",
        description: "Unfollow a channel",
        method: HttpMethod::Delete,
        path: "/unfollow-newsletter",
        fields: &[CHANNEL_ID],
    },
    OperationSpec {
        resource: Resource::Channel,
        operation: "getMetadata",
        description: "Get channel metadata",
        method: HttpMethod::Get,
        path: "/newsletter-metadata/{channelId}",
        fields: &[FieldSpec::path("channelId", FieldKind::Text)],
    },
    // -- community ----------------------------------------------------------
    OperationSpec {
        resource: Resource::Community,
        operation: "create",
        description: "Create a community",
        method: HttpMethod::Post,
        path: "/create-community",
        fields: &[FieldSpec::body("communityName", "name", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Community,
        operation: "list",
        description: "List communities",
        method: HttpMethod::Get,
        path: "/communities",
        fields: &[],
    },
    OperationSpec {
        resource: Resource::Community,
        operation: "getMetadata",
        description: "Get community metadata",
        method: HttpMethod::Get,
        path: "/community-metadata/{communityId}",
        fields: &[FieldSpec::path("communityId", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Community,
        operation: "linkGroup",
        description: "Link a group to a community",
        method: HttpMethod::Post,
        path: "/link-group",
        fields: &[COMMUNITY_ID, GROUP_TO_LINK],
    },
    OperationSpec {
        resource: Resource::Community,
        operation: "unlinkGroup",
        description: "Unlink a group from a community",
        method: HttpMethod::Delete,
        path: "/unlink-group",
        fields: &[COMMUNITY_ID, GROUP_TO_LINK],
    },
    // -- status -------------------------------------------------------------
    OperationSpec {
        resource: Resource::Status,
        operation: "sendText",
        description: "Post a text status",
        method: HttpMethod::Post,
        path: "/send-text-status",
        fields: &[FieldSpec::body("statusMessage", "message", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Status,
        operation: "sendImage",
        description: "Post an image status",
        method: HttpMethod::Post,
        path: "/send-image-status",
        fields: &[FieldSpec::body("statusImageUrl", "image", FieldKind::Text)],
    },
    OperationSpec {
        resource: Resource::Status,
        operation: "sendVideo",
        description: "Post a video status",
        method: HttpMethod::Post,
        path: "/send-video-status",
        fields: &[FieldSpec::body("statusVideoUrl", "video", FieldKind::Text)],
    },
    // -- catalog ------------------------------------------------------------
    OperationSpec {
        resource: Resource::Catalog,
        operation: "sendProduct",
        description: "Send a catalog product",
        method: HttpMethod::Post,
        path: "/send-product",
        fields: &[
            PHONE,
            FieldSpec::body("productId", "productId", FieldKind::Text),
        ],
    },
    OperationSpec {
        resource: Resource::Catalog,
        operation: "sendCatalog",
        description: "Send the catalog",
        method: HttpMethod::Post,
        path: "/send-catalog",
        fields: &[PHONE],
    },
    OperationSpec {
        resource: Resource::Catalog,
        operation: "sendOrderStatus",
        description: "Send an order status update",
        method: HttpMethod::Post,
        path: "/send-order-status",
        fields: &[
            PHONE,
            FieldSpec::body("orderStatus", "status", FieldKind::Choice(ORDER_STATUSES))
                .or("pending"),
        ],
    },
    // -- event --------------------------------------------------------------
    OperationSpec {
        resource: Resource::Event,
        operation: "sendEvent",
        description: "Create an event in a group",
        method: HttpMethod::Post,
        path: "/send-event",
        fields: &[EVENT_GROUP, EVENT_NAME, EVENT_DESCRIPTION, EVENT_DATE],
    },
    OperationSpec {
        resource: Resource::Event,
        operation: "editEvent",
        description: "Edit an existing event",
        method: HttpMethod::Put,
        path: "/edit-event",
        fields: &[EVENT_GROUP, EVENT_ID, EVENT_NAME, EVENT_DESCRIPTION, EVENT_DATE],
    },
    OperationSpec {
        resource: Resource::Event,
        operation: "respondEvent",
        description: "Respond to an event invitation",
        method: HttpMethod::Post,
        path: "/respond-event",
        fields: &[
            EVENT_GROUP,
            EVENT_ID,
            FieldSpec::body("eventResponse", "response", FieldKind::Choice(EVENT_RESPONSES))
                .or("going"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn table_has_fifty_six_operations() {
        assert_eq!(OPERATIONS.len(), 56);
    }

    #[test]
    fn every_resource_has_operations_and_a_valid_default() {
        for resource in Resource::ALL {
            assert!(for_resource(resource).count() > 0, "{resource} has no operations");
            assert!(lookup(resource, resource.default_operation()).is_ok());
        }
    }

    #[test]
    fn pairs_are_unique() {
        let mut seen = HashSet::new();
        for op in OPERATIONS {
            assert!(seen.insert((op.resource, op.operation)), "{} {}", op.resource, op.operation);
        }
    }

    #[test]
    fn method_and_path_pairs_are_unique() {
        let mut seen = HashSet::new();
        for op in OPERATIONS {
            assert!(seen.insert((op.method, op.path)), "{} {}", op.method, op.path);
        }
    }

    #[test]
    fn paths_have_no_stray_whitespace() {
        for op in OPERATIONS {
            assert!(op.path.starts_with('/'));
            assert!(!op.path.contains(' '), "{}", op.path);
        }
    }

    #[test]
    fn path_templates_match_their_path_fields() {
        for op in OPERATIONS {
            let placeholders = op.path.matches('{').count();
            let path_fields = op.fields.iter().filter(|f| f.target == Target::Path).count();
            assert_eq!(placeholders, path_fields, "{} {}", op.resource, op.operation);
            for field in op.fields.iter().filter(|f| f.target == Target::Path) {
                assert!(op.path.contains(&format!("{{{}}}", field.param)));
            }
        }
    }

    #[test]
    fn every_param_has_a_description() {
        for op in OPERATIONS {
            for field in op.fields {
                assert!(!describe_param(field.param).is_empty(), "{}", field.param);
            }
        }
    }

    #[test]
    fn representative_rows() {
        let rows = [
            (Resource::Message, "sendText", HttpMethod::Post, "/send-text"),
            (Resource::Message, "sendImage", HttpMethod::Post, "/send-image"),
            (Resource::Message, "deleteMessage", HttpMethod::Delete, "/delete-message"),
            (Resource::Instance, "getStatus", HttpMethod::Get, "/status"),
            (Resource::Group, "create", HttpMethod::Post, "/create-group"),
            (Resource::Contact, "checkWhatsApp", HttpMethod::Get, "/phone-exists/{phone}"),
            (Resource::Channel, "create", HttpMethod::Post, "/create-newsletter"),
            (Resource::Community, "linkGroup", HttpMethod::Post, "/link-group"),
            (Resource::Status, "sendText", HttpMethod::Post, "/send-text-status"),
            (Resource::Catalog, "sendProduct", HttpMethod::Post, "/send-product"),
            (Resource::Event, "sendEvent", HttpMethod::Post, "/send-event"),
        ];
        for (resource, operation, method, path) in rows {
            let op = lookup(resource, operation).unwrap();
            assert_eq!(op.method, method);
            assert_eq!(op.path, path);
        }
    }

    #[test]
    fn lookup_rejects_operation_from_another_resource() {
        let err = lookup(Resource::Instance, "sendText").unwrap_err();
        assert!(matches!(err, ZapiError::UnknownOperation { .. }));
    }

    #[test]
    fn resource_round_trips_through_its_name() {
        for resource in Resource::ALL {
            assert_eq!(resource.as_str().parse::<Resource>().unwrap(), resource);
        }
        assert!("newsletter".parse::<Resource>().is_err());
    }

    #[test]
    fn optional_fields_carry_defaults() {
        let list = lookup(Resource::Message, "sendList").unwrap();
        let button = list.fields.iter().find(|f| f.param == "listButtonText").unwrap();
        assert!(!button.required);
        assert_eq!(button.default, Some("Ver opções"));
        let caption = lookup(Resource::Message, "sendImage").unwrap().fields[2];
        assert_eq!(caption.default, Some(""));
    }
}
