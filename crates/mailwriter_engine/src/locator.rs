use scraper::Selector;
use serde::{Deserialize, Serialize};

use mailwriter_logging::mw_error;

use crate::constants::{
    COMPOSE_SIGNATURE_SELECTORS, EDITABLE_REGION_SELECTORS, EMAIL_BODY_SELECTORS,
    TOOLBAR_SELECTORS,
};
use crate::host::HostDocument;

/// Logical targets the controller looks up in the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Toolbar,
    EmailBody,
    EditableRegion,
    ComposeSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("invalid selector {css:?}: {message}")]
    InvalidSelector { css: String, message: String },
}

/// One structural-match rule, kept both as source text and parsed selector.
#[derive(Debug, Clone)]
pub struct Locator {
    css: String,
    selector: Selector,
}

impl Locator {
    pub fn parse(css: &str) -> Result<Self, LocatorError> {
        let selector = Selector::parse(css).map_err(|err| LocatorError::InvalidSelector {
            css: css.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            css: css.to_string(),
            selector,
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.css == other.css
    }
}

impl Eq for Locator {}

/// Ordered candidate locators for a single logical target.
///
/// Resolution walks the candidates in order and stops at the first one that
/// matches anything; there is no merging across candidates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LocatorList {
    candidates: Vec<Locator>,
}

impl LocatorList {
    pub fn parse<I, S>(candidates: I) -> Result<Self, LocatorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates = candidates
            .into_iter()
            .map(|css| Locator::parse(css.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { candidates })
    }

    /// Builds a list from compiled-in selectors, dropping (and logging) any
    /// that fail to parse.
    pub fn from_static(candidates: &[&str]) -> Self {
        let candidates = candidates
            .iter()
            .filter_map(|css| match Locator::parse(css) {
                Ok(locator) => Some(locator),
                Err(err) => {
                    mw_error!("Skipping built-in locator: {}", err);
                    None
                }
            })
            .collect();
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Locator] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// First element matched by the highest-priority candidate that matches
    /// at all, or `None` when no candidate matches.
    pub fn resolve<D>(&self, document: &D) -> Option<D::Node>
    where
        D: HostDocument + ?Sized,
    {
        self.candidates
            .iter()
            .find_map(|locator| document.query(locator))
    }

    /// Trimmed text content of the resolved element.
    pub fn read_text<D>(&self, document: &D) -> Option<String>
    where
        D: HostDocument + ?Sized,
    {
        self.resolve(document)
            .map(|node| document.text_content(&node).trim().to_string())
    }

    /// Whether `node` or one of its descendants matches any candidate.
    pub fn matches_within<D>(&self, document: &D, node: &D::Node) -> bool
    where
        D: HostDocument + ?Sized,
    {
        self.candidates
            .iter()
            .any(|locator| document.matches_within(node, locator))
    }
}

impl TryFrom<Vec<String>> for LocatorList {
    type Error = LocatorError;

    fn try_from(candidates: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(candidates)
    }
}

impl From<LocatorList> for Vec<String> {
    fn from(list: LocatorList) -> Self {
        list.candidates.into_iter().map(|locator| locator.css).collect()
    }
}

/// The full set of locator lists, one per [`TargetKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorSet {
    pub toolbar: LocatorList,
    pub email_body: LocatorList,
    pub editable_region: LocatorList,
    pub compose_signature: LocatorList,
}

impl LocatorSet {
    pub fn get(&self, kind: TargetKind) -> &LocatorList {
        match kind {
            TargetKind::Toolbar => &self.toolbar,
            TargetKind::EmailBody => &self.email_body,
            TargetKind::EditableRegion => &self.editable_region,
            TargetKind::ComposeSignature => &self.compose_signature,
        }
    }
}

impl Default for LocatorSet {
    fn default() -> Self {
        Self {
            toolbar: LocatorList::from_static(TOOLBAR_SELECTORS),
            email_body: LocatorList::from_static(EMAIL_BODY_SELECTORS),
            editable_region: LocatorList::from_static(EDITABLE_REGION_SELECTORS),
            compose_signature: LocatorList::from_static(COMPOSE_SIGNATURE_SELECTORS),
        }
    }
}
