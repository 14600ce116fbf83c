//! Per-session request filtering
//!
//! Every request a session is about to issue is classified by resource type
//! and either continued or aborted. The default crawl policy lets only the
//! top-level document through.

use std::fmt;
use url::Url;

/// Kind of resource a request loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Script,
    Font,
    Media,
    Xhr,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Stylesheet => "stylesheet",
            Self::Image => "image",
            Self::Script => "script",
            Self::Font => "font",
            Self::Media => "media",
            Self::Xhr => "xhr",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What to do with one outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Continue,
    Abort,
}

/// Stateless allow-list of resource types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter {
    allowed: Vec<ResourceType>,
}

impl RequestFilter {
    /// Allows top-level documents only
    pub fn document_only() -> Self {
        Self::allowing(&[ResourceType::Document])
    }

    /// Allows everything, the engine's behaviour without a filter
    pub fn allow_all() -> Self {
        Self::allowing(&[
            ResourceType::Document,
            ResourceType::Stylesheet,
            ResourceType::Image,
            ResourceType::Script,
            ResourceType::Font,
            ResourceType::Media,
            ResourceType::Xhr,
            ResourceType::Other,
        ])
    }

    pub fn allowing(types: &[ResourceType]) -> Self {
        Self {
            allowed: types.to_vec(),
        }
    }

    pub fn decide(&self, resource_type: ResourceType, url: &Url) -> RequestDecision {
        let decision = if self.allowed.contains(&resource_type) {
            RequestDecision::Continue
        } else {
            RequestDecision::Abort
        };
        tracing::trace!("{} request {} -> {:?}", resource_type, url, decision);
        decision
    }
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self::document_only()
    }
}
