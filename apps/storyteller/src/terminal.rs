//! Renders controller output as plain text on a terminal.

use std::{collections::HashMap, io::Write};

use client_core::{Control, Element, Player, Renderer, ScrollAlign};
use tracing::{debug, warn};

pub struct TerminalRenderer<W: Write> {
    out: W,
    visible: HashMap<Element, bool>,
    text: HashMap<Element, String>,
    html: HashMap<Element, String>,
    sources: HashMap<Player, String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            visible: HashMap::new(),
            text: HashMap::new(),
            html: HashMap::new(),
            sources: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, block: &str) {
        if let Err(err) = writeln!(self.out, "{block}").and_then(|()| self.out.flush()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }

    fn is_visible(&self, element: Element) -> bool {
        self.visible.get(&element).copied().unwrap_or(false)
    }

    fn text_of(&self, element: Element) -> &str {
        self.text.get(&element).map(String::as_str).unwrap_or("")
    }

    fn html_of(&self, element: Element) -> &str {
        self.html.get(&element).map(String::as_str).unwrap_or("")
    }

    fn story_block(&self) -> String {
        let mut block = format!(
            "\n=== {} ===\n{}\n\n{}",
            self.text_of(Element::StoryTitle),
            self.text_of(Element::StoryCulture),
            html_to_text(self.html_of(Element::StoryContent)),
        );
        let moral = html_to_text(self.html_of(Element::StoryMoral));
        if !moral.is_empty() {
            block.push_str("\n\n");
            block.push_str(&moral);
        }
        block.push('\n');
        block
    }

    fn media_line(&self, player: Player) -> String {
        let label = match player {
            Player::Audio => "🔊 Audio narration",
            Player::Video => "🎬 Story video",
        };
        let src = self.sources.get(&player).map(String::as_str).unwrap_or("");
        format!("{label}: {src}")
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn set_visible(&mut self, element: Element, visible: bool) {
        let was_visible = self.is_visible(element);
        self.visible.insert(element, visible);
        if !visible || was_visible {
            return;
        }

        match element {
            Element::OutputSection => {
                let block = self.story_block();
                self.emit(&block);
            }
            Element::AudioPanel => {
                let line = self.media_line(Player::Audio);
                self.emit(&line);
            }
            Element::VideoPanel => {
                let line = self.media_line(Player::Video);
                self.emit(&line);
            }
            _ => {}
        }
    }

    fn set_text(&mut self, element: Element, text: &str) {
        self.text.insert(element, text.to_string());
        match element {
            Element::ConfigMessage if self.is_visible(Element::ConfigWarning) => {
                self.emit(&format!("⚠️  {text}"));
            }
            Element::LoadingText | Element::MediaLoadingText => {
                self.emit(&format!("⏳ {text}"));
            }
            _ => {}
        }
    }

    fn set_html(&mut self, element: Element, html: &str) {
        self.html.insert(element, html.to_string());
    }

    fn set_disabled(&mut self, control: Control, disabled: bool) {
        debug!(?control, disabled, "control state changed");
    }

    fn focus(&mut self, control: Control) {
        debug!(?control, "focus requested");
    }

    fn set_source(&mut self, player: Player, url: &str) {
        self.sources.insert(player, url.to_string());
        let panel = match player {
            Player::Audio => Element::AudioPanel,
            Player::Video => Element::VideoPanel,
        };
        // A panel that is already open will not announce itself again.
        if self.is_visible(panel) {
            let line = self.media_line(player);
            self.emit(&line);
        }
    }

    fn scroll_into_view(&mut self, element: Element, align: ScrollAlign) {
        debug!(?element, ?align, "scroll requested");
    }

    fn alert(&mut self, message: &str) {
        self.emit(&format!("❗ {message}"));
    }
}

/// Flattens the markup produced by `client_core::render` into plain text.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = html.replace("</p>", "\n\n");

    let mut stripped = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for ch in with_breaks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim_end()
        .to_string()
}
