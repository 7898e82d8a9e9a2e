//! Capability tokens and their `:token:token:` wire form.

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Separator between tokens in the capability string.
pub const SEPARATOR: char = ':';

/// A single capability token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    /// Client can switch sessions without restarting.
    pub const SWITCH: Self = Self::from_static("switch");
    /// Client reports unsaved changes.
    pub const DIRTY: Self = Self::from_static("dirty");
    /// Client reports progress of long open/save operations.
    pub const PROGRESS: Self = Self::from_static("progress");
    /// Client sends status messages.
    pub const MESSAGE: Self = Self::from_static("message");
    /// Optional GUI that can be shown and hidden. Shared by both sides.
    pub const OPTIONAL_GUI: Self = Self::from_static("optional-gui");
    /// Server accepts `/nsm/server/*` control messages from clients.
    pub const SERVER_CONTROL: Self = Self::from_static("server_control");
    /// Server relays broadcast messages.
    pub const BROADCAST: Self = Self::from_static("broadcast");

    /// Token from a static string.
    #[must_use]
    pub const fn from_static(token: &'static str) -> Self {
        Self(Cow::Borrowed(token))
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Capability {
    fn from(token: &str) -> Self {
        Self(Cow::Owned(token.to_string()))
    }
}

impl From<String> for Capability {
    fn from(token: String) -> Self {
        Self(Cow::Owned(token))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered capability tokens.
///
/// Order is significant for equality and serialization; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(Vec<Capability>);

impl Capabilities {
    /// Empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a capability string. Never fails.
    ///
    /// One leading and one trailing separator are trimmed, the rest is split
    /// verbatim. An empty string (or a bare separator) yields the empty set.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.strip_prefix(SEPARATOR).unwrap_or(raw);
        let trimmed = trimmed.strip_suffix(SEPARATOR).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Self::new();
        }
        trimmed.split(SEPARATOR).map(Capability::from).collect()
    }

    /// Append a token.
    pub fn push(&mut self, cap: impl Into<Capability>) {
        self.0.push(cap.into());
    }

    /// Whether `cap` is present.
    #[must_use]
    pub fn contains(&self, cap: &Capability) -> bool {
        self.0.contains(cap)
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Capability> {
        self.0.iter()
    }
}

/// Serializes to `""` when empty, otherwise `:a:b:`.
impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        for cap in &self.0 {
            write!(f, "{SEPARATOR}{cap}")?;
        }
        write!(f, "{SEPARATOR}")
    }
}

impl FromStr for Capabilities {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<C: Into<Capability>> FromIterator<C> for Capabilities {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Capabilities {
    type Item = &'a Capability;
    type IntoIter = std::slice::Iter<'a, Capability>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
