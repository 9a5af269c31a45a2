//! Styled text for attributed log output
//!
//! [`StyledText`] is a sequence of text runs, each carrying a [`TextStyle`].
//! Formatters produce it for destinations that can show color or emphasis
//! (an in-process UI buffer, an ANSI terminal). A plain string is a styled
//! text with a single unstyled run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

#[cfg(feature = "console")]
impl From<Color> for colored::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => colored::Color::Black,
            Color::Red => colored::Color::Red,
            Color::Green => colored::Color::Green,
            Color::Yellow => colored::Color::Yellow,
            Color::Blue => colored::Color::Blue,
            Color::Magenta => colored::Color::Magenta,
            Color::Cyan => colored::Color::Cyan,
            Color::White => colored::Color::White,
            Color::BrightBlack => colored::Color::BrightBlack,
            Color::BrightRed => colored::Color::BrightRed,
            Color::BrightGreen => colored::Color::BrightGreen,
            Color::BrightYellow => colored::Color::BrightYellow,
            Color::BrightBlue => colored::Color::BrightBlue,
            Color::BrightMagenta => colored::Color::BrightMagenta,
            Color::BrightCyan => colored::Color::BrightCyan,
            Color::BrightWhite => colored::Color::BrightWhite,
        }
    }
}

/// Visual attributes of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    pub const PLAIN: TextStyle = TextStyle {
        foreground: None,
        background: None,
        bold: false,
        italic: false,
        underline: false,
    };

    pub fn new() -> Self {
        Self::PLAIN
    }

    pub fn fg(color: Color) -> Self {
        Self::PLAIN.with_foreground(color)
    }

    #[must_use]
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }

    /// Layer `top` over `self`: colors set in `top` win, flags accumulate
    #[must_use]
    pub fn overlay(&self, top: &TextStyle) -> TextStyle {
        TextStyle {
            foreground: top.foreground.or(self.foreground),
            background: top.background.or(self.background),
            bold: self.bold || top.bold,
            italic: self.italic || top.italic,
            underline: self.underline || top.underline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSegment {
    pub text: String,
    pub style: TextStyle,
}

/// Text made of styled runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyledText {
    segments: Vec<StyledSegment>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::PLAIN)
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        let mut styled = Self::new();
        styled.push_str(&text.into(), style);
        styled
    }

    pub fn segments(&self) -> &[StyledSegment] {
        &self.segments
    }

    /// Append a run, merging it into the last one when the styles match
    pub fn push_str(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.segments.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                return;
            }
        }
        self.segments.push(StyledSegment {
            text: text.to_string(),
            style,
        });
    }

    pub fn append(&mut self, other: &StyledText) {
        for segment in &other.segments {
            self.push_str(&segment.text, segment.style);
        }
    }

    /// Byte length of the plain text
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.text.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Style of the last character, plain when empty
    pub fn trailing_style(&self) -> TextStyle {
        self.segments
            .last()
            .map(|s| s.style)
            .unwrap_or(TextStyle::PLAIN)
    }

    /// The text without any styling
    pub fn to_plain(&self) -> String {
        let mut out = String::with_capacity(self.len());
        for segment in &self.segments {
            out.push_str(&segment.text);
        }
        out
    }

    /// Copy of the byte range `range` of the plain text, keeping styles.
    ///
    /// The range must fall on character boundaries.
    pub fn slice(&self, range: Range<usize>) -> StyledText {
        let mut out = StyledText::new();
        let mut offset = 0;
        for segment in &self.segments {
            let seg_start = offset;
            let seg_end = offset + segment.text.len();
            offset = seg_end;

            let start = range.start.max(seg_start);
            let end = range.end.min(seg_end);
            if start < end {
                out.push_str(&segment.text[start - seg_start..end - seg_start], segment.style);
            }
        }
        out
    }

    /// Render as a string with ANSI escape sequences
    #[cfg(feature = "console")]
    pub fn to_ansi(&self) -> String {
        use colored::Colorize;

        let mut out = String::with_capacity(self.len());
        for segment in &self.segments {
            if segment.style.is_plain() {
                out.push_str(&segment.text);
                continue;
            }
            let mut colored = segment.text.as_str().normal();
            if let Some(fg) = segment.style.foreground {
                colored = colored.color(colored::Color::from(fg));
            }
            if let Some(bg) = segment.style.background {
                colored = colored.on_color(colored::Color::from(bg));
            }
            if segment.style.bold {
                colored = colored.bold();
            }
            if segment.style.italic {
                colored = colored.italic();
            }
            if segment.style.underline {
                colored = colored.underline();
            }
            out.push_str(&colored.to_string());
        }
        out
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}
