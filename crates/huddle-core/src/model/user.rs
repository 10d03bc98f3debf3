use serde::{Deserialize, Serialize};

/// A workspace member shown in the feed and the presence sidebar.
///
/// `id` and `name` never change after creation. `online` and `editing` are
/// presence flags that the mock generator flips over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub editing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    /// Create an offline, idle user.
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
            online: false,
            editing: false,
            role: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub const fn with_presence(mut self, online: bool, editing: bool) -> Self {
        self.online = online;
        self.editing = editing;
        self
    }

    /// Short presence label for the sidebar.
    #[must_use]
    pub const fn presence_label(&self) -> &'static str {
        match (self.online, self.editing) {
            (true, true) => "editing",
            (true, false) => "online",
            (false, _) => "offline",
        }
    }
}
