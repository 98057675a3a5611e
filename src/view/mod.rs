use std::io::Write;

use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub mod rss_renderer;
pub mod sitemap_renderer;

const CDATA_END: &str = "]]>";

/// Writes `<tag>text</tag>` with `& < > " '` entity-escaped
pub(crate) fn push_text<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> quick_xml::Result<()> {
    push_element(writer, BytesStart::new(tag), text)
}

/// Same as [`push_text`] for a start tag that carries attributes
pub(crate) fn push_element<W: Write>(writer: &mut Writer<W>, start: BytesStart, text: &str) -> quick_xml::Result<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape(text))))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// Writes `text` unescaped inside CDATA. A `]]>` in the text would end the section
/// early, so it is split across two adjacent sections and the text survives unchanged.
/// Returns whether a split was needed.
pub(crate) fn push_cdata<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> quick_xml::Result<bool> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    let sections = cdata_sections(text);
    for section in sections.iter() {
        writer.write_event(Event::CData(BytesCData::new(*section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(sections.len() > 1)
}

fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = vec![];
    let mut rest = text;
    while let Some(pos) = rest.find(CDATA_END) {
        // "]]" closes this section, ">" opens the next one
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::str;

    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Writer<Cursor<Vec<u8>>>) -> quick_xml::Result<()>,
    {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        f(&mut writer).unwrap();
        str::from_utf8(&writer.into_inner().into_inner()).unwrap().to_string()
    }

    #[test]
    fn test_push_text_escapes() {
        let xml = render(|w| push_text(w, "title", r#"Tom & "Jerry" <3 'cheese'"#));
        assert_eq!(xml, "<title>Tom &amp; &quot;Jerry&quot; &lt;3 &apos;cheese&apos;</title>");
    }

    #[test]
    fn test_push_element_with_attributes() {
        let mut start = BytesStart::new("guid");
        start.push_attribute(("isPermaLink", "true"));
        let xml = render(|w| push_element(w, start, "https://x.y/?a=1&b=2"));
        assert_eq!(xml, r#"<guid isPermaLink="true">https://x.y/?a=1&amp;b=2</guid>"#);
    }

    #[test]
    fn test_push_cdata_keeps_raw_text() {
        let xml = render(|w| push_cdata(w, "title", "a < b & c").map(|split| assert!(!split)));
        assert_eq!(xml, "<title><![CDATA[a < b & c]]></title>");
    }

    #[test]
    fn test_push_cdata_splits_terminator() {
        let xml = render(|w| push_cdata(w, "description", "x]]>y]]>").map(|split| assert!(split)));
        assert_eq!(xml, "<description><![CDATA[x]]]]><![CDATA[>y]]]]><![CDATA[>]]></description>");
    }

    #[test]
    fn test_cdata_sections() {
        assert_eq!(cdata_sections(""), [""]);
        assert_eq!(cdata_sections("plain"), ["plain"]);
        assert_eq!(cdata_sections("a]]>b"), ["a]]", ">b"]);
        assert_eq!(cdata_sections("]]>").concat(), "]]>");
    }
}
