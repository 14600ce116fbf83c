/// Stage definitions for one crawl run
///
/// A crawl advances strictly forward:
/// `Start → HierarchyFetched → ListingCollected → DetailsHarvested → Aggregated → Done`.
use crate::ScrapeError;
use std::fmt;

/// Represents how far a crawl has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrawlStage {
    /// Nothing has run yet
    Start,

    /// Category tree read from the entry page
    HierarchyFetched,

    /// Every listing page visited and product URLs collected
    ListingCollected,

    /// Every product detail page harvested
    DetailsHarvested,

    /// Hierarchy and products combined into a result
    Aggregated,

    /// Browser released; result handed back
    Done,
}

impl CrawlStage {
    /// The only stage this one may move to, `None` once done
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::HierarchyFetched),
            Self::HierarchyFetched => Some(Self::ListingCollected),
            Self::ListingCollected => Some(Self::DetailsHarvested),
            Self::DetailsHarvested => Some(Self::Aggregated),
            Self::Aggregated => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub fn can_transition_to(&self, to: CrawlStage) -> bool {
        self.next() == Some(to)
    }

    /// Moves to `to`, rejecting skips and back-edges
    pub fn transition(&mut self, to: CrawlStage) -> Result<(), ScrapeError> {
        if !self.can_transition_to(to) {
            return Err(ScrapeError::InvalidTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::HierarchyFetched => "hierarchy_fetched",
            Self::ListingCollected => "listing_collected",
            Self::DetailsHarvested => "details_harvested",
            Self::Aggregated => "aggregated",
            Self::Done => "done",
        }
    }

    pub fn all_stages() -> Vec<Self> {
        vec![
            Self::Start,
            Self::HierarchyFetched,
            Self::ListingCollected,
            Self::DetailsHarvested,
            Self::Aggregated,
            Self::Done,
        ]
    }
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
