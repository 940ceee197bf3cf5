use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{Html, Selector};

/// CSS selectors locating the pieces of a server fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSchema {
    /// Element whose text content is the numeric prediction score.
    pub score_selector: String,
    /// Container whose inner HTML is spliced into the result region.
    pub container_selector: String,
}

impl Default for FragmentSchema {
    fn default() -> Self {
        Self {
            score_selector: "#resultHeading".to_string(),
            container_selector: "#result".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFragment {
    pub score: f64,
    pub display_html: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FragmentDefect {
    #[error("selector {selector:?} is not valid CSS")]
    InvalidSelector { selector: String },
    #[error("fragment has no result container matching {selector:?}")]
    MissingContainer { selector: String },
    #[error("fragment has no score element matching {selector:?}")]
    MissingScore { selector: String },
    #[error("score text {text:?} is not a number")]
    UnparsableScore { text: String },
    #[error("score {score} is outside the [0, 1] range")]
    ScoreOutOfRange { score: f64 },
}

pub trait FragmentParser: Send + Sync {
    fn parse(&self, html: &str) -> Result<ParsedFragment, FragmentDefect>;
}

/// Selector-driven parser for the analyser service's HTML fragments.
///
/// The score element's text is parsed strictly: empty, non-numeric, or
/// out-of-range text is a defect, never a silent misclassification. Script
/// and style subtrees plus inline event handlers are dropped before the
/// display HTML is taken, so splicing it can execute nothing.
#[derive(Debug, Clone, Default)]
pub struct SelectorFragmentParser {
    schema: FragmentSchema,
}

impl SelectorFragmentParser {
    pub fn new(schema: FragmentSchema) -> Self {
        Self { schema }
    }
}

impl FragmentParser for SelectorFragmentParser {
    fn parse(&self, html: &str) -> Result<ParsedFragment, FragmentDefect> {
        let score_selector = selector(&self.schema.score_selector)?;
        let container_selector = selector(&self.schema.container_selector)?;

        let mut doc = Html::parse_document(html);
        sanitize(&mut doc);

        let score_text = doc
            .select(&score_selector)
            .next()
            .ok_or_else(|| FragmentDefect::MissingScore {
                selector: self.schema.score_selector.clone(),
            })?
            .text()
            .collect::<String>();
        let score = parse_score(&score_text)?;

        let display_html = doc
            .select(&container_selector)
            .next()
            .ok_or_else(|| FragmentDefect::MissingContainer {
                selector: self.schema.container_selector.clone(),
            })?
            .inner_html();

        Ok(ParsedFragment {
            score,
            display_html,
        })
    }
}

fn selector(css: &str) -> Result<Selector, FragmentDefect> {
    Selector::parse(css).map_err(|_| FragmentDefect::InvalidSelector {
        selector: css.to_string(),
    })
}

fn parse_score(text: &str) -> Result<f64, FragmentDefect> {
    let trimmed = text.trim();
    let score = trimmed
        .parse::<f64>()
        .map_err(|_| FragmentDefect::UnparsableScore {
            text: trimmed.to_string(),
        })?;
    if !(0.0..=1.0).contains(&score) {
        return Err(FragmentDefect::ScoreOutOfRange { score });
    }
    Ok(score)
}

/// Drop script/style subtrees and inline `on*` handlers in place.
fn sanitize(doc: &mut Html) {
    let mut dropped: Vec<NodeId> = Vec::new();
    let mut scrubbed: Vec<NodeId> = Vec::new();
    for node in doc.tree.nodes() {
        if let Node::Element(element) = node.value() {
            if element.name().eq_ignore_ascii_case("script")
                || element.name().eq_ignore_ascii_case("style")
            {
                dropped.push(node.id());
            } else if element.attrs().any(|(name, _)| is_event_handler(name)) {
                scrubbed.push(node.id());
            }
        }
    }

    for id in dropped {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    for id in scrubbed {
        if let Some(mut node) = doc.tree.get_mut(id) {
            if let Node::Element(element) = node.value() {
                element
                    .attrs
                    .retain(|name, _| !is_event_handler(name.local.as_ref()));
            }
        }
    }
}

fn is_event_handler(attribute: &str) -> bool {
    let lower = attribute.to_ascii_lowercase();
    lower.starts_with("on")
}
