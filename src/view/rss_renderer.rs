use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use spdlog::warn;

use crate::config::SiteMeta;
use crate::content::Post;
use crate::path_utils::{absolute_url, post_url};
use crate::text_utils::Timestamp;
use crate::view::{push_cdata, push_element, push_text};

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:dc="http://purl.org/dc/elements/1.1/">
<channel>
  <title>DevPy Blog</title>
  <link>https://devpy.de</link>
  <description>Posts about the web</description>
  <atom:link href="https://devpy.de/rss.xml" rel="self" type="application/rss+xml"/>
  <language>en</language>
  <lastBuildDate>Sat, 01 Jun 2024 10:00:00 GMT</lastBuildDate>
  <generator>blogfeed 0.3.0</generator>
  <item>
    <title><![CDATA[Shipping a Nuxt blog]]></title>
    <description><![CDATA[Notes from the rewrite]]></description>
    <link>https://devpy.de/blog/shipping-a-nuxt-blog</link>
    <guid isPermaLink="true">https://devpy.de/blog/shipping-a-nuxt-blog</guid>
    <pubDate>Tue, 02 Jan 2024 05:06:07 GMT</pubDate>
    <dc:creator>Jane Doe</dc:creator>
    <category>nuxt</category>
  </item>
</channel>
</rss>
*/

/// Items past this count are left out of the feed
pub const MAX_RSS_ITEMS: usize = 20;
pub const RSS_FILE_NAME: &str = "rss.xml";

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

pub struct RssChannel<'a> {
    pub site: &'a SiteMeta,
    pub build_date: DateTime<Utc>,
}

impl<'a> RssChannel<'a> {
    /// Renders the first [`MAX_RSS_ITEMS`] posts in the order given.
    pub fn render(&self, posts: &[Post]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        let site = self.site;
        let now = Timestamp::from_instant(self.build_date);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:atom", ATOM_NS));
        rss.push_attribute(("xmlns:dc", DC_NS));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", &site.name)?;
        push_text(&mut writer, "link", &site.url)?;
        push_text(&mut writer, "description", &site.description)?;

        // <atom:link href="https://devpy.de/rss.xml" rel="self" type="application/rss+xml"/>
        let self_link = absolute_url(&site.url, RSS_FILE_NAME);
        let mut atom_link = BytesStart::new("atom:link");
        atom_link.push_attribute(("href", self_link.as_str()));
        atom_link.push_attribute(("rel", "self"));
        atom_link.push_attribute(("type", "application/rss+xml"));
        writer.write_event(Event::Empty(atom_link))?;

        push_text(&mut writer, "language", &site.language)?;
        push_text(&mut writer, "lastBuildDate", &now.to_rfc2822())?;
        push_text(&mut writer, "generator", &site.generator)?;

        if let Some(ref editor) = site.managing_editor {
            push_text(&mut writer, "managingEditor", editor)?;
            push_text(&mut writer, "webMaster", editor)?;
        }

        if let Some(ref image) = site.image {
            let image_url = if image.contains("://") {
                image.clone()
            } else {
                absolute_url(&site.url, image)
            };
            writer.write_event(Event::Start(BytesStart::new("image")))?;
            push_text(&mut writer, "url", &image_url)?;
            push_text(&mut writer, "title", &site.name)?;
            push_text(&mut writer, "link", &site.url)?;
            writer.write_event(Event::End(BytesEnd::new("image")))?;
        }

        let items = posts.iter()
            .filter(|post| !post.path.is_empty())
            .take(MAX_RSS_ITEMS);
        for post in items {
            self.render_item(&mut writer, post, now)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }

    fn render_item(&self, writer: &mut Writer<Cursor<Vec<u8>>>, post: &Post, now: Timestamp) -> quick_xml::Result<()> {
        writer.write_event(Event::Start(BytesStart::new("item")))?;

        let title_split = push_cdata(writer, "title", &post.title)?;
        let description_split = push_cdata(writer, "description", &post.description)?;
        if title_split || description_split {
            warn!("Post {} contains ']]>', split across CDATA sections", post.path);
        }

        let link = post_url(&self.site.url, &post.path);
        push_text(writer, "link", &link)?;

        // <guid isPermaLink="true">https://devpy.de/blog/my-post</guid>
        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        push_element(writer, guid, &link)?;

        let pub_date = post.date.unwrap_or(now);
        push_text(writer, "pubDate", &pub_date.to_rfc2822())?;

        let author = post.author.as_deref().unwrap_or(&self.site.author);
        push_text(writer, "dc:creator", author)?;

        for tag in post.tags.iter() {
            push_text(writer, "category", tag)?;
        }
        if let Some(ref category) = post.category {
            push_text(writer, "category", category)?;
        }

        writer.write_event(Event::End(BytesEnd::new("item")))?;
        Ok(())
    }
}
