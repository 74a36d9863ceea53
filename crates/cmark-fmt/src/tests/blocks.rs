use crate::{HeadingStyle, IndentStyle, ThematicBreakStyle};
use crate::tests::*;

fn headings(style: HeadingStyle, source: &str) -> String {
    conv_with(Config::builder().heading_style(style).build(), source)
}

#[test]
fn test_heading_styles() {
    assert_eq!(headings(HeadingStyle::Atx, "Foo\n---"), "## Foo\n");
    assert_eq!(headings(HeadingStyle::Setext, "## FooBar"), "FooBar\n---\n");
    assert_eq!(headings(HeadingStyle::Setext, "# Foo"), "Foo\n===\n");
    assert_eq!(
        headings(HeadingStyle::FullWidthSetext, "Foo Bar\n---"),
        "Foo Bar\n-------\n"
    );
    assert_eq!(headings(HeadingStyle::AtxSurround, "## Foo"), "## Foo ##\n");
    assert_eq!(
        headings(HeadingStyle::AtxSurround, "# *Hi*"),
        "# *Hi* #\n"
    );
}

#[test]
fn test_heading_fallbacks() {
    // empty headings only exist as ATX
    assert_eq!(headings(HeadingStyle::AtxSurround, "##"), "## ##\n");
    assert_eq!(headings(HeadingStyle::Setext, "##"), "##\n");
    // multiline headings only exist as setext
    assert_eq!(headings(HeadingStyle::Atx, "Foo\nBar\n---"), "Foo\nBar\n---\n");
    // setext has no level three
    assert_eq!(headings(HeadingStyle::Setext, "### Deep"), "### Deep\n");
}

#[test]
fn test_setext_looking_text() {
    assert_eq!(headings(HeadingStyle::Atx, "#foo\n---"), "## #foo\n");
    assert_eq!(headings(HeadingStyle::Atx, "# Foo #"), "# Foo\n");
}

#[test]
fn test_code_blocks() {
    assert_eq!(conv("    foo"), "    foo\n");
    assert_eq!(
        conv_with(
            Config::builder().indent_style(IndentStyle::Tabs).build(),
            "    foo"
        ),
        "\tfoo\n"
    );
    assert_eq!(
        conv_with(
            Config::builder().indent_style(IndentStyle::Spaces).build(),
            "\tfoo\n\tbar\n\tbaz"
        ),
        "    foo\n    bar\n    baz\n"
    );
}

#[test]
fn test_fenced_code_blocks() {
    assert_eq!(conv("```\nfoo\nbar\nbaz\n```"), "```\nfoo\nbar\nbaz\n```\n");
    assert_eq!(
        conv("```ruby\ndef foo(x)\n  return 3\nend\n```"),
        "```ruby\ndef foo(x)\n  return 3\nend\n```\n"
    );
    assert_eq!(
        conv("```\n!@#$%^&*\\[],./;'()\n```"),
        "```\n!@#$%^&*\\[],./;'()\n```\n"
    );
    assert_eq!(conv("````\n```\n````\n"), "````\n```\n````\n");
    assert_eq!(conv("~~~a`b\nx\n~~~\n"), "~~~a`b\nx\n~~~\n");
    assert_eq!(conv("```\n```\n"), "```\n```\n");
}

#[test]
fn test_paragraphs() {
    assert_eq!(conv("foo"), "foo\n");
    assert_eq!(
        conv("\\# foo \\*bar\\* \\__baz\\_\\_"),
        "\\# foo \\*bar\\* \\__baz\\_\\_\n"
    );
    let typography = "'LeftSingleQuote\nRightSingleQuote'\n\"LeftDoubleQuote\nRightDoubleQuote\"\nEnDash --\nEmDash ---\nEllipsis ...\nLeftAngleQuote <<\nRightAngleQuote >>\nApostrophe 'twas\n";
    assert_eq!(conv(typography), typography);
}

#[test]
fn test_thematic_breaks() {
    let breaks = |config: Config| conv_with(config, "---");
    assert_eq!(breaks(Config::default()), "---\n");
    assert_eq!(
        breaks(
            Config::builder()
                .thematic_break_style(ThematicBreakStyle::Underlined)
                .build()
        ),
        "___\n"
    );
    assert_eq!(
        breaks(
            Config::builder()
                .thematic_break_style(ThematicBreakStyle::Starred)
                .build()
        ),
        "***\n"
    );
    assert_eq!(
        breaks(Config::builder().thematic_break_length(0).build()),
        "---\n"
    );
    assert_eq!(
        breaks(Config::builder().thematic_break_length(10).build()),
        "----------\n"
    );
}

#[test]
fn test_html_blocks() {
    for source in [
        "<pre>\nfoo\n</pre>\n",
        "<!--\ncomment\n-->\n",
        "<?\nfoo\n?>\n",
        "<!FOO\n!>\n",
        "<![CDATA[\nfoo\n]]>\n",
        "<hr />\n",
        "</a>\n",
    ] {
        assert_eq!(conv(source), source);
    }
    assert_eq!(conv("<hr />"), "<hr />\n");
}

#[test]
fn test_block_separator() {
    assert_eq!(
        conv("## ATX Heading\nSetext Heading\n---\nparagraph\n\n--- thematic break\n"),
        "## ATX Heading\n\n## Setext Heading\n\nparagraph\n\n--- thematic break\n"
    );
    assert_eq!(conv("foo\n***\nbar\n"), "foo\n\n---\nbar\n");
}

#[test]
fn test_blockquotes() {
    assert_eq!(conv("> a\n>\n> > b\n"), "> a\n>\n> > b\n");
    assert_eq!(conv(">     code\n"), ">     code\n");
    assert_eq!(conv("> # Title\n> text\n"), "> # Title\n>\n> text\n");
}
