use crate::parsers::html;

#[test]
fn test_anchor_targets_in_document_order() {
    let page = r#"
        <html>
            <body>
                <a href="https://example.com/page1">Page 1</a>
                <p><a href="page2">Page 2</a></p>
                <a>No target</a>
                <a href="">Empty</a>
                <a href="javascript:void(0)">Script</a>
            </body>
        </html>
    "#;

    let targets = html::anchor_targets(page);
    assert_eq!(
        targets,
        vec![
            "https://example.com/page1",
            "page2",
            "",
            "javascript:void(0)",
        ]
    );
}

#[test]
fn test_anchor_targets_keep_duplicates() {
    let page = r#"<body><a href="/a">A</a><a href="/a">A again</a></body>"#;
    assert_eq!(html::anchor_targets(page), vec!["/a", "/a"]);
}

#[test]
fn test_anchor_targets_empty_page() {
    assert!(html::anchor_targets("<html><body><p>Nothing</p></body></html>").is_empty());
}

#[test]
fn test_body_text_breaks_on_blocks() {
    let page = r#"
        <html>
            <head><title>Ignored</title></head>
            <body>
                <h1>Title</h1>
                <p>Hello <b>world</b>,   again</p>
                <script>var hidden = true;</script>
                <ul><li>first</li><li>second</li></ul>
                <div>line one<br>line two</div>
            </body>
        </html>
    "#;

    let text = html::body_text(page).unwrap();
    assert_eq!(
        text,
        "Title\nHello world, again\nfirst\nsecond\nline one\nline two"
    );
}

#[test]
fn test_body_text_skips_styles_and_noscript() {
    let page = r#"<body><style>p { color: red }</style><noscript>enable js</noscript><p>Shown</p></body>"#;
    assert_eq!(html::body_text(page).unwrap(), "Shown");
}

#[test]
fn test_body_text_table_cells() {
    let page = r#"<body><table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table></body>"#;
    assert_eq!(html::body_text(page).unwrap(), "a b\nc");
}

#[test]
fn test_body_text_empty_body() {
    assert_eq!(html::body_text("<html><body></body></html>").unwrap(), "");
}
