//! Markdown to HTML rendering.
//!
//! This module provides markdown-to-HTML conversion with support for:
//! - GitHub Flavored Markdown (tables, strikethrough, task lists, footnotes)
//! - Heading IDs for anchor links
//! - Relative link and image resolution against the page URL
//! - Page title detection

pub mod links;

use crate::slug::SlugSet;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};

/// Options for rendering markdown to HTML.
///
/// Options are a plain value handed to every [`to_html`] call, so concurrent
/// renders never share mutable renderer state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown tables
    pub enable_tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub enable_strikethrough: bool,
    /// Enable task list items ([x] and [ ])
    pub enable_tasklists: bool,
    /// Enable footnotes ([^1])
    pub enable_footnotes: bool,
    /// Enable heading attributes ({#id .class})
    pub enable_heading_attributes: bool,
    /// Turn straight quotes and `--` into their typographic forms
    pub enable_smart_punctuation: bool,
    /// Directory URL of the page being rendered, e.g. `/docs/`.
    ///
    /// Relative link and image destinations are resolved against it; `None`
    /// leaves every destination untouched.
    pub link_base: Option<String>,
}

impl RenderOptions {
    /// GitHub Flavored Markdown.
    pub fn gfm() -> Self {
        Self {
            enable_tables: true,
            enable_strikethrough: true,
            enable_tasklists: true,
            enable_footnotes: true,
            enable_heading_attributes: true,
            enable_smart_punctuation: false,
            link_base: None,
        }
    }

    /// Returns a copy resolving relative destinations against `base`.
    pub fn with_link_base(&self, base: impl Into<String>) -> Self {
        Self {
            link_base: Some(base.into()),
            ..self.clone()
        }
    }

    fn to_pulldown_options(&self) -> Options {
        let mut options = Options::empty();
        if self.enable_tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.enable_strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.enable_tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if self.enable_footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.enable_heading_attributes {
            options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        if self.enable_smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        options
    }
}

/// Result of rendering markdown to HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// The rendered HTML content
    pub html: String,
    /// Text of the first top-most heading, if any.
    pub title: Option<String>,
}

/// Collects the plain text of a heading, given the events following its start.
fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::End(TagEnd::Heading(_)) => break,
            _ => {}
        }
    }
    text
}

/// Render markdown content to HTML.
///
/// # Example
///
/// ```
/// use mdpages_core::render::{to_html, RenderOptions};
///
/// let result = to_html("# Hello\n\nWorld", &RenderOptions::gfm());
/// assert!(result.html.contains("<h1"));
/// assert_eq!(result.title.as_deref(), Some("Hello"));
/// ```
pub fn to_html(markdown_content: &str, options: &RenderOptions) -> RenderResult {
    let parser = Parser::new_ext(markdown_content, options.to_pulldown_options());
    let events: Vec<Event> = parser.collect();

    let mut processed_events = Vec::with_capacity(events.len());
    let mut slugs = SlugSet::new();
    // (heading level, text) of the current title candidate.
    let mut page_title: Option<(usize, String)> = None;

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let text = heading_text(&events[i + 1..]);
                let rank = *level as usize;

                if page_title.as_ref().map_or(true, |(best, _)| rank < *best) {
                    page_title = Some((rank, text.clone()));
                }

                let id = id.clone().unwrap_or_else(|| slugs.unique(&text).into());

                processed_events.push(Event::Start(Tag::Heading {
                    level: *level,
                    id: Some(id),
                    classes: classes.clone(),
                    attrs: attrs.clone(),
                }));
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match &options.link_base {
                    Some(base) => CowStr::from(links::resolve_link(base, dest_url)),
                    None => dest_url.clone(),
                };
                processed_events.push(Event::Start(Tag::Link {
                    link_type: *link_type,
                    dest_url,
                    title: title.clone(),
                    id: id.clone(),
                }));
            }
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match &options.link_base {
                    Some(base) => CowStr::from(links::resolve_image(base, dest_url)),
                    None => dest_url.clone(),
                };
                processed_events.push(Event::Start(Tag::Image {
                    link_type: *link_type,
                    dest_url,
                    title: title.clone(),
                    id: id.clone(),
                }));
            }
            _ => processed_events.push(event.clone()),
        }
    }

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, processed_events.into_iter());

    RenderResult {
        html: html_output,
        title: page_title.map(|(_, text)| text).filter(|text| !text.trim().is_empty()),
    }
}
