//! Rendering interface between the controller and whatever surface shows the page.

use shared::protocol::StoryResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    ConfigWarning,
    ConfigMessage,
    LoadingSection,
    LoadingText,
    OutputSection,
    StoryTitle,
    StoryCulture,
    StoryContent,
    StoryMoral,
    MediaLoading,
    MediaLoadingText,
    AudioPanel,
    VideoPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    StoryPrompt,
    GenerateButton,
    AudioButton,
    VideoButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    Start,
    Center,
}

pub trait Renderer {
    fn set_visible(&mut self, element: Element, visible: bool);
    fn set_text(&mut self, element: Element, text: &str);
    /// `html` is markup produced by this module; text inside it is already escaped.
    fn set_html(&mut self, element: Element, html: &str);
    fn set_disabled(&mut self, control: Control, disabled: bool);
    fn focus(&mut self, control: Control);
    fn set_source(&mut self, player: Player, url: &str);
    fn scroll_into_view(&mut self, element: Element, align: ScrollAlign);
    fn alert(&mut self, message: &str);
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Paragraphs of a story body, split on blank lines with empty ones dropped.
pub fn story_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

pub fn story_content_html(text: &str) -> String {
    story_paragraphs(text)
        .into_iter()
        .map(|paragraph| format!("<p>{}</p>", escape_html(paragraph)))
        .collect()
}

pub fn moral_html(moral: Option<&str>) -> String {
    match moral.filter(|moral| !moral.is_empty()) {
        Some(moral) => format!("<strong>✨ Moral:</strong> {}", escape_html(moral)),
        None => String::new(),
    }
}

/// Writes a story into the output section and resets the media panels.
pub fn render_story<R: Renderer + ?Sized>(renderer: &mut R, story: &StoryResult) {
    renderer.set_text(Element::StoryTitle, story.display_title());
    renderer.set_text(Element::StoryCulture, story.culture.label());
    renderer.set_html(Element::StoryContent, &story_content_html(&story.story));
    renderer.set_html(Element::StoryMoral, &moral_html(story.moral_text()));

    renderer.set_visible(Element::AudioPanel, false);
    renderer.set_visible(Element::VideoPanel, false);

    renderer.set_visible(Element::OutputSection, true);
    renderer.scroll_into_view(Element::OutputSection, ScrollAlign::Start);
}
