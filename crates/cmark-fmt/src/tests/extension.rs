use cmark_tree::{Document, Kind, NodeId, ParseOptions, STRIKETHROUGH, WalkStatus};

use crate::tests::*;

fn render(renderer: &Renderer, source: &str, options: ParseOptions) -> String {
    let doc = cmark_tree::parse_with(source, options);
    renderer.render_to_string(source.as_bytes(), &doc).unwrap()
}

fn underscores(
    ctx: &mut RenderContext<'_>,
    _doc: &Document,
    _node: NodeId,
    _entering: bool,
) -> WalkStatus {
    ctx.writer().write(b"_");
    WalkStatus::Continue
}

fn pluses(
    ctx: &mut RenderContext<'_>,
    _doc: &Document,
    _node: NodeId,
    _entering: bool,
) -> WalkStatus {
    ctx.writer().write(b"+");
    WalkStatus::Continue
}

#[test]
fn test_strikethrough() {
    let options = ParseOptions {
        strikethrough: true,
    };
    assert_eq!(
        format_with("~~gone~~ here", &Config::default(), options).unwrap(),
        "~~gone~~ here\n"
    );
    // without the parser extension the tildes are plain text
    assert_eq!(conv("~~gone~~ here"), "~~gone~~ here\n");

    // a node kind without a renderer still renders its children
    let renderer = Renderer::default();
    assert!(!renderer.has_renderer(Kind::Custom(STRIKETHROUGH)));
    assert_eq!(render(&renderer, "~~gone~~ here", options), "gone here\n");
}

#[test]
fn test_highest_priority_wins() {
    let low = |renderer: &mut Renderer| renderer.register(Kind::Emphasis, underscores);
    let high = |renderer: &mut Renderer| renderer.register(Kind::Emphasis, pluses);
    let renderer = Renderer::with_options(
        Config::default(),
        [
            RenderOption::node_renderer(high, 10),
            RenderOption::node_renderer(low, 1),
        ],
    );
    assert_eq!(
        render(&renderer, "*a* b", ParseOptions::default()),
        "+a+ b\n"
    );
}

#[test]
fn test_style_options() {
    let renderer = Renderer::with_options(
        Config::default(),
        [
            RenderOption::HeadingStyle(HeadingStyle::AtxSurround),
            RenderOption::ThematicBreakStyle(ThematicBreakStyle::Starred),
            RenderOption::ThematicBreakLength(5),
        ],
    );
    assert_eq!(renderer.config().thematic_break_length, 5);
    assert_eq!(
        render(&renderer, "# a\n\n---\n", ParseOptions::default()),
        "# a #\n\n*****\n"
    );
}

#[test]
fn test_block_override_keeps_separation() {
    fn shout(
        ctx: &mut RenderContext<'_>,
        _doc: &Document,
        _node: NodeId,
        entering: bool,
    ) -> WalkStatus {
        if entering {
            ctx.writer().write(b"BREAK");
        }
        WalkStatus::Continue
    }

    let mut renderer = Renderer::default();
    renderer.register(Kind::ThematicBreak, shout);
    assert_eq!(
        render(&renderer, "a\n\n***\n\nb\n", ParseOptions::default()),
        "a\n\nBREAK\n\nb\n"
    );
}

#[test]
fn test_chain_order() {
    let chained = chain(vec![node_fn(underscores), node_fn(pluses)]);
    let mut renderer = Renderer::default();
    renderer.register(Kind::CodeSpan, move |ctx, doc, node, entering| {
        chained(ctx, doc, node, entering)
    });
    assert_eq!(
        render(&renderer, "`x`", ParseOptions::default()),
        "_+x+_\n"
    );
}
