// Route names
pub const ROUTE_GET_VALUE: &str = "getValue";
pub const ROUTE_DELETE_VALUE: &str = "deleteValue";
pub const ROUTE_GET_KEYS: &str = "getKeys";
pub const ROUTE_SAVE_VALUE: &str = "saveValue";
pub const ROUTE_GET_INFOS: &str = "getInfos";

/// Routes a server refuses to start without.
pub const MANDATORY_ROUTES: [&str; 4] =
    [ROUTE_GET_VALUE, ROUTE_DELETE_VALUE, ROUTE_GET_KEYS, ROUTE_SAVE_VALUE];

pub const INFOS_PATH: &str = "/infos";

/// Environment metadata fields persisted under the domain prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentKey {
    Location,
    YamlContent,
    JsonContent,
    CreatedAt,
    UpdatedAt,
    ParamContent,
    SessionContent,
    SshPrivate,
    SshPublic,
}

impl EnvironmentKey {
    pub const ALL: [Self; 9] = [
        Self::Location,
        Self::YamlContent,
        Self::JsonContent,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::ParamContent,
        Self::SessionContent,
        Self::SshPrivate,
        Self::SshPublic,
    ];

    /// Field suffix, without any prefix.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Location => "environment_location",
            Self::YamlContent => "environment_yaml_content",
            Self::JsonContent => "environment_json_content",
            Self::CreatedAt => "environment_created_at",
            Self::UpdatedAt => "environment_updated_at",
            Self::ParamContent => "environment_param_content",
            Self::SessionContent => "environment_session_content",
            Self::SshPrivate => "environment_ssh_private",
            Self::SshPublic => "environment_ssh_public",
        }
    }

    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.field() == field)
    }
}

impl std::fmt::Display for EnvironmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}
