//! Remote environment model as returned by the cloud API.

use serde::{Deserialize, Deserializer, Serialize};

/// Status an environment reports once provisioning has finished
pub const STATUS_NORMAL: &str = "normal";

/// A cloud environment belonging to an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment identifier used in API paths
    pub id: String,
    /// Human label; for ODEs this mirrors the deploy path
    #[serde(default)]
    pub label: String,
    /// Machine name assigned by the platform
    #[serde(default)]
    pub name: String,
    /// Free-form provisioning status
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub vcs: Vcs,
}

impl Environment {
    /// Whether this environment is an on-demand environment
    pub fn is_ode(&self) -> bool {
        self.flags.ode
    }

    /// Whether provisioning has reached the terminal status
    pub fn is_ready(&self) -> bool {
        self.status == STATUS_NORMAL
    }

    /// The VCS path currently deployed, if any
    pub fn vcs_path(&self) -> Option<&str> {
        self.vcs.path.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    /// The API reports this as 0/1 on some endpoints and as a boolean on others
    #[serde(default, deserialize_with = "bool_or_int")]
    pub ode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vcs {
    #[serde(default)]
    pub path: Option<String>,
}

/// HAL collection wrapper: `{"_embedded": {"items": [...]}}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentList {
    #[serde(rename = "_embedded", default)]
    embedded: Embedded,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Embedded {
    #[serde(default)]
    items: Vec<Environment>,
}

impl EnvironmentList {
    pub fn items(&self) -> &[Environment] {
        &self.embedded.items
    }

    pub fn into_items(self) -> Vec<Environment> {
        self.embedded.items
    }
}

/// Find the first on-demand environment for which `predicate` holds.
///
/// Non-ODE environments are skipped before the predicate runs. List order
/// decides ties.
pub fn find_ode<'a, P>(envs: &'a [Environment], predicate: P) -> Option<&'a Environment>
where
    P: Fn(&Environment) -> bool,
{
    envs.iter().find(|env| env.is_ode() && predicate(env))
}

/// All on-demand environments deploying `path`, in list order.
pub fn odes_on_path<'a>(envs: &'a [Environment], path: &'a str) -> impl Iterator<Item = &'a Environment> + 'a {
    envs.iter()
        .filter(move |env| env.is_ode() && env.vcs_path() == Some(path))
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
        Str(String),
        Null(()),
    }

    Ok(match BoolOrInt::deserialize(deserializer)? {
        BoolOrInt::Bool(b) => b,
        BoolOrInt::Int(i) => i != 0,
        BoolOrInt::Str(s) => matches!(s.as_str(), "1" | "true"),
        BoolOrInt::Null(()) => false,
    })
}
