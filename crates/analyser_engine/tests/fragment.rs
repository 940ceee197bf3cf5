use analyser_engine::{
    decode_fragment, FragmentDefect, FragmentParser, FragmentSchema, SelectorFragmentParser,
};
use pretty_assertions::assert_eq;

fn fragment_with_heading(heading: &str) -> String {
    format!(
        "<html><body><div id=\"result\" class=\"alert\">\
         <h3 id=\"resultHeading\">{heading}</h3>\
         <p>Comment: This is fake news</p>\
         </div></body></html>"
    )
}

#[test]
fn parses_score_and_display_html() {
    let parser = SelectorFragmentParser::default();

    let parsed = parser.parse(&fragment_with_heading("0.82")).expect("parse");

    assert_eq!(parsed.score, 0.82);
    assert!(parsed.display_html.contains("Comment: This is fake news"));
    assert!(parsed.display_html.contains("resultHeading"));
}

#[test]
fn score_text_is_trimmed_before_parsing() {
    let parser = SelectorFragmentParser::default();
    let parsed = parser
        .parse(&fragment_with_heading("  0.5\n"))
        .expect("parse");
    assert_eq!(parsed.score, 0.5);
}

#[test]
fn strips_scripts_from_display_html() {
    let html = "<html><body><div id=\"result\">\
                <h3 id=\"resultHeading\">0.82</h3>\
                <script>document.cookie</script>\
                <p>visible</p>\
                </div></body></html>";
    let parser = SelectorFragmentParser::default();

    let parsed = parser.parse(html).expect("parse");

    assert!(!parsed.display_html.contains("script"));
    assert!(!parsed.display_html.contains("document.cookie"));
    assert!(parsed.display_html.contains("visible"));
}

#[test]
fn strips_inline_event_handlers_from_display_html() {
    let html = "<html><body><div id=\"result\">\
                <h3 id=\"resultHeading\">0.82</h3>\
                <button onclick=\"steal()\" class=\"btn\">ok</button>\
                </div></body></html>";
    let parser = SelectorFragmentParser::default();

    let parsed = parser.parse(html).expect("parse");

    assert!(!parsed.display_html.contains("onclick"));
    assert!(!parsed.display_html.contains("steal"));
    // Unrelated attributes survive the scrub.
    assert!(parsed.display_html.contains("class=\"btn\""));
}

#[test]
fn missing_score_element_is_a_defect() {
    let html = "<html><body><div id=\"result\"><p>no heading</p></div></body></html>";
    let parser = SelectorFragmentParser::default();

    let defect = parser.parse(html).unwrap_err();

    assert_eq!(
        defect,
        FragmentDefect::MissingScore {
            selector: "#resultHeading".to_string(),
        }
    );
}

#[test]
fn empty_score_text_is_a_defect() {
    let parser = SelectorFragmentParser::default();
    let defect = parser.parse(&fragment_with_heading("")).unwrap_err();
    assert_eq!(
        defect,
        FragmentDefect::UnparsableScore {
            text: String::new(),
        }
    );
}

#[test]
fn non_numeric_score_text_is_a_defect() {
    let parser = SelectorFragmentParser::default();
    let defect = parser
        .parse(&fragment_with_heading("Misinformation"))
        .unwrap_err();
    assert_eq!(
        defect,
        FragmentDefect::UnparsableScore {
            text: "Misinformation".to_string(),
        }
    );
}

#[test]
fn out_of_range_score_is_a_defect() {
    let parser = SelectorFragmentParser::default();
    let defect = parser.parse(&fragment_with_heading("1.2")).unwrap_err();
    assert_eq!(defect, FragmentDefect::ScoreOutOfRange { score: 1.2 });
}

#[test]
fn missing_container_is_a_defect() {
    let html = "<html><body><h3 id=\"resultHeading\">0.3</h3></body></html>";
    let parser = SelectorFragmentParser::default();

    let defect = parser.parse(html).unwrap_err();

    assert_eq!(
        defect,
        FragmentDefect::MissingContainer {
            selector: "#result".to_string(),
        }
    );
}

#[test]
fn custom_schema_selectors_are_honoured() {
    let html = "<html><body><section class=\"verdict\">\
                <span class=\"score\">0.75</span>\
                </section></body></html>";
    let parser = SelectorFragmentParser::new(FragmentSchema {
        score_selector: ".score".to_string(),
        container_selector: ".verdict".to_string(),
    });

    let parsed = parser.parse(html).expect("parse");

    assert_eq!(parsed.score, 0.75);
}

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let decoded = decode_fragment(bytes, Some("text/html; charset=ISO-8859-1")).unwrap();
    assert_eq!(decoded.html, "caf\u{e9}");
    assert!(
        decoded.encoding_label.eq_ignore_ascii_case("ISO-8859-1")
            || decoded.encoding_label.eq_ignore_ascii_case("windows-1252")
    );
}

#[test]
fn decode_handles_utf8_bom() {
    let bytes = b"\xEF\xBB\xBFhello";
    let decoded = decode_fragment(bytes, Some("text/html")).unwrap();
    assert_eq!(decoded.html, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn decode_falls_back_to_detection_without_charset() {
    let bytes = "плохие новости".as_bytes();
    let decoded = decode_fragment(bytes, Some("text/html")).unwrap();
    assert_eq!(decoded.html, "плохие новости");
}
