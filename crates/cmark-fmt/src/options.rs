//! Markdown formatting options.
//!
//! This module provides the style choices the renderer applies to the
//! document it re-serializes.

use std::fmt;
use std::str::FromStr;

use crate::error::{WriteError, WriteResult};

/// Shortest thematic break that is still recognized as one.
pub const THEMATIC_BREAK_LENGTH_MINIMUM: usize = 3;
/// Smallest multiplier of the list continuation indent.
pub const NESTED_LIST_LENGTH_MINIMUM: usize = 1;

/// How indented code blocks are indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum IndentStyle {
    /// Four spaces.
    #[default]
    Spaces,
    /// One tab.
    Tabs,
}

impl IndentStyle {
    /// The indent unit.
    pub fn as_str(self) -> &'static str {
        match self {
            IndentStyle::Spaces => "    ",
            IndentStyle::Tabs => "\t",
        }
    }
}

/// How headings are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HeadingStyle {
    /// `## Foo`
    #[default]
    Atx,
    /// `## Foo ##`
    AtxSurround,
    /// `Foo` underlined with `---` or `===`. Levels above 2 stay ATX.
    Setext,
    /// Setext with the underline as wide as the heading text.
    FullWidthSetext,
}

impl HeadingStyle {
    /// Whether this is one of the setext styles.
    pub fn is_setext(self) -> bool {
        matches!(self, HeadingStyle::Setext | HeadingStyle::FullWidthSetext)
    }
}

/// Character used for thematic breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ThematicBreakStyle {
    /// `---`
    #[default]
    Dashed,
    /// `***`
    Starred,
    /// `___`
    Underlined,
}

impl ThematicBreakStyle {
    /// The break character.
    pub fn char(self) -> char {
        match self {
            ThematicBreakStyle::Dashed => '-',
            ThematicBreakStyle::Starred => '*',
            ThematicBreakStyle::Underlined => '_',
        }
    }
}

macro_rules! style_names {
    ($ty:ident, $option:literal, { $($variant:ident => $name:literal),* $(,)? }) => {
        impl $ty {
            /// Names accepted by [`FromStr`].
            pub const NAMES: &'static [&'static str] = &[$($name),*];

            /// Kebab-case name of the style.
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)*
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = WriteError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)*
                    _ => Err(WriteError::invalid_option($option, s)),
                }
            }
        }
    };
}

style_names!(IndentStyle, "indent-style", {
    Spaces => "spaces",
    Tabs => "tabs",
});

style_names!(HeadingStyle, "heading-style", {
    Atx => "atx",
    AtxSurround => "atx-surround",
    Setext => "setext",
    FullWidthSetext => "full-width-setext",
});

style_names!(ThematicBreakStyle, "thematic-break-style", {
    Dashed => "dashed",
    Starred => "starred",
    Underlined => "underlined",
});

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct Config {
    /// Indent unit of indented code blocks.
    pub indent_style: IndentStyle,
    /// Heading style.
    pub heading_style: HeadingStyle,
    /// Thematic break character.
    pub thematic_break_style: ThematicBreakStyle,
    /// Thematic break length, never less than three when rendered.
    pub thematic_break_length: usize,
    /// Multiplier of the list item continuation indent, never less than one
    /// when rendered.
    pub nested_list_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_style: IndentStyle::Spaces,
            heading_style: HeadingStyle::Atx,
            thematic_break_style: ThematicBreakStyle::Dashed,
            thematic_break_length: THEMATIC_BREAK_LENGTH_MINIMUM,
            nested_list_length: NESTED_LIST_LENGTH_MINIMUM,
        }
    }
}

impl Config {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Thematic break length after applying the minimum.
    pub fn effective_thematic_break_length(&self) -> usize {
        self.thematic_break_length.max(THEMATIC_BREAK_LENGTH_MINIMUM)
    }

    /// Continuation indent multiplier after applying the minimum.
    pub fn effective_nested_list_length(&self) -> usize {
        self.nested_list_length.max(NESTED_LIST_LENGTH_MINIMUM)
    }

    /// Set an option by its kebab-case name, e.g. `heading-style`.
    pub fn set_option(&mut self, name: &str, value: &str) -> WriteResult<()> {
        let length = |value: &str| {
            value
                .parse::<usize>()
                .map_err(|_| WriteError::invalid_option(name, value))
        };
        match name {
            "indent-style" => self.indent_style = value.parse()?,
            "heading-style" => self.heading_style = value.parse()?,
            "thematic-break-style" => self.thematic_break_style = value.parse()?,
            "thematic-break-length" => self.thematic_break_length = length(value)?,
            "nested-list-length" => self.nested_list_length = length(value)?,
            _ => return Err(WriteError::invalid_option(name, value)),
        }
        Ok(())
    }

    /// Read a configuration from TOML text. Missing keys keep their defaults.
    #[cfg(feature = "cli")]
    pub fn from_toml(text: &str) -> WriteResult<Self> {
        toml::from_str(text).map_err(|err| WriteError::Config(err.to_string().into()))
    }
}

/// Builder for [`Config`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indent unit of indented code blocks
    pub fn indent_style(mut self, style: IndentStyle) -> Self {
        self.config.indent_style = style;
        self
    }

    /// Set the heading style
    pub fn heading_style(mut self, style: HeadingStyle) -> Self {
        self.config.heading_style = style;
        self
    }

    /// Set the thematic break character
    pub fn thematic_break_style(mut self, style: ThematicBreakStyle) -> Self {
        self.config.thematic_break_style = style;
        self
    }

    /// Set the thematic break length; lengths below three render as three
    pub fn thematic_break_length(mut self, length: usize) -> Self {
        self.config.thematic_break_length = length;
        self
    }

    /// Set the list continuation indent multiplier; zero renders as one
    pub fn nested_list_length(mut self, length: usize) -> Self {
        self.config.nested_list_length = length;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}
