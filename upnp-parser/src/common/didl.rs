//! DIDL-Lite structures for content-directory listings

use crate::common::attributes::{attr_or_empty, optional_attr, required_attr};
use crate::common::xml_decode::{self, children, optional_text, required_child, required_text};
use crate::error::ParseResult;
use crate::namespaces::{DIDL_LITE, DUBLIN_CORE, PACKET_VIDEO, UPNP_METADATA};
use serde::Serialize;
use xmltree::Element;

/// DIDL-Lite listing returned in the `Result` of a Browse action.
///
/// DIDL-Lite format example:
/// ```xml
/// <DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"
///            xmlns:dc="http://purl.org/dc/elements/1.1/"
///            xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">
///   <container id="1" parentID="0" restricted="1" childCount="4">
///     <dc:title>Music</dc:title>
///     <upnp:class>object.container.storageFolder</upnp:class>
///   </container>
///   <item id="1$7" parentID="0" restricted="1">
///     <dc:title>Song Title</dc:title>
///     <upnp:class>object.item.audioItem.musicTrack</upnp:class>
///     <res size="4512345" protocolInfo="http-get:*:audio/mpeg:*">http://host/song.mp3</res>
///   </item>
/// </DIDL-Lite>
/// ```
///
/// Only direct children of the `DIDL-Lite` root are listed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DidlLite {
    /// Browsable children, in document order
    pub containers: Vec<DidlContainer>,
    /// Playable children, in document order
    pub items: Vec<DidlItem>,
}

impl DidlLite {
    /// Parse DIDL-Lite XML content.
    ///
    /// Fails if the root is not a `DIDL-Lite` element in the DIDL-Lite
    /// namespace, or if any container or item lacks a mandatory field.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        let root = xml_decode::parse_document(xml)?;
        Self::from_element(&root)
    }

    /// Build a listing from an already parsed `DIDL-Lite` element.
    pub fn from_element(root: &Element) -> ParseResult<Self> {
        xml_decode::expect_element(root, DIDL_LITE, "DIDL-Lite")?;

        let containers = children(root, Some(DIDL_LITE), "container")
            .map(DidlContainer::from_element)
            .collect::<ParseResult<Vec<_>>>()?;

        let items = children(root, Some(DIDL_LITE), "item")
            .map(DidlItem::from_element)
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Self { containers, items })
    }

    /// Whether the listing has no children at all
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.items.is_empty()
    }
}

/// A browsable `container` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DidlContainer {
    pub id: String,
    pub parent_id: String,
    pub restricted: String,
    /// Empty when the server does not report it
    pub child_count: String,
    /// Empty when the server does not report it
    pub searchable: String,
    pub title: String,
    /// `pv:modificationTime`, empty when absent
    pub modification_time: String,
    pub class: String,
}

impl DidlContainer {
    fn from_element(el: &Element) -> ParseResult<Self> {
        Ok(Self {
            id: required_attr(el, "id")?,
            parent_id: required_attr(el, "parentID")?,
            restricted: required_attr(el, "restricted")?,
            child_count: attr_or_empty(el, "childCount"),
            searchable: attr_or_empty(el, "searchable"),
            title: required_text(el, Some(DUBLIN_CORE), "title")?,
            modification_time: text_or_empty(el, PACKET_VIDEO, "modificationTime"),
            class: required_text(el, Some(UPNP_METADATA), "class")?,
        })
    }

    /// Number of children advertised by the server, if it reported a valid count
    pub fn child_count(&self) -> Option<u32> {
        self.child_count.parse().ok()
    }

    pub fn is_restricted(&self) -> bool {
        is_true(&self.restricted)
    }

    pub fn is_searchable(&self) -> bool {
        is_true(&self.searchable)
    }
}

/// A playable `item` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DidlItem {
    pub id: String,
    /// `refID`, set when the item is a reference to another object
    pub ref_id: Option<String>,
    pub parent_id: String,
    pub restricted: String,
    pub title: String,
    pub date: String,
    pub genre: String,
    pub album: String,
    pub album_art_uri: String,
    pub extension: String,
    pub modification_time: String,
    pub added_time: String,
    pub last_updated: String,
    pub res: DidlResource,
    pub class: String,
}

impl DidlItem {
    fn from_element(el: &Element) -> ParseResult<Self> {
        let res = required_child(el, Some(DIDL_LITE), "res")?;

        Ok(Self {
            id: required_attr(el, "id")?,
            ref_id: optional_attr(el, "refID"),
            parent_id: required_attr(el, "parentID")?,
            restricted: required_attr(el, "restricted")?,
            title: required_text(el, Some(DUBLIN_CORE), "title")?,
            date: text_or_empty(el, DUBLIN_CORE, "date"),
            genre: text_or_empty(el, UPNP_METADATA, "genre"),
            album: text_or_empty(el, UPNP_METADATA, "album"),
            album_art_uri: text_or_empty(el, UPNP_METADATA, "albumArtURI"),
            extension: text_or_empty(el, PACKET_VIDEO, "extension"),
            modification_time: text_or_empty(el, PACKET_VIDEO, "modificationTime"),
            added_time: text_or_empty(el, PACKET_VIDEO, "addedTime"),
            last_updated: text_or_empty(el, PACKET_VIDEO, "lastUpdated"),
            res: DidlResource::from_element(res)?,
            class: required_text(el, Some(UPNP_METADATA), "class")?,
        })
    }

    pub fn is_restricted(&self) -> bool {
        is_true(&self.restricted)
    }
}

/// The first `res` element of an item.
///
/// `size` and `protocolInfo` are mandatory; `duration`, `resolution` and
/// `bitrate` resolve to empty strings when the server omits them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DidlResource {
    pub duration: String,
    pub size: String,
    pub resolution: String,
    pub bitrate: String,
    pub protocol_info: String,
    /// The resource URI (element text)
    pub uri: String,
}

impl DidlResource {
    fn from_element(el: &Element) -> ParseResult<Self> {
        Ok(Self {
            duration: attr_or_empty(el, "duration"),
            size: required_attr(el, "size")?,
            resolution: attr_or_empty(el, "resolution"),
            bitrate: attr_or_empty(el, "bitrate"),
            protocol_info: required_attr(el, "protocolInfo")?,
            uri: xml_decode::trimmed_text(el),
        })
    }

    /// MIME type from the third field of `protocolInfo`, e.g. `audio/mpeg`
    pub fn mime_type(&self) -> Option<&str> {
        self.protocol_info
            .split(':')
            .nth(2)
            .filter(|mime| !mime.is_empty() && *mime != "*")
    }
}

fn text_or_empty(el: &Element, namespace: &str, name: &str) -> String {
    optional_text(el, Some(namespace), name).unwrap_or_default()
}

/// DIDL-Lite boolean attribute value: `1`, `true` or `True`
pub fn is_true(value: &str) -> bool {
    matches!(value, "1" | "true" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    const HEADER: &str = r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:pv="http://www.pv.com/pvns/">"#;

    fn didl(body: &str) -> String {
        format!("{}{}</DIDL-Lite>", HEADER, body)
    }

    #[test]
    fn test_parse_container() {
        let xml = didl(
            r#"<container id="64" parentID="0" restricted="1" childCount="12" searchable="1"><dc:title>Browse Folders</dc:title><pv:modificationTime>1540000000</pv:modificationTime><upnp:class>object.container.storageFolder</upnp:class></container>"#,
        );

        let listing = DidlLite::from_xml(&xml).unwrap();
        assert_eq!(listing.containers.len(), 1);
        assert!(listing.items.is_empty());

        let c = &listing.containers[0];
        assert_eq!(c.id, "64");
        assert_eq!(c.parent_id, "0");
        assert_eq!(c.title, "Browse Folders");
        assert_eq!(c.modification_time, "1540000000");
        assert_eq!(c.class, "object.container.storageFolder");
        assert_eq!(c.child_count(), Some(12));
        assert!(c.is_restricted());
        assert!(c.is_searchable());
    }

    #[test]
    fn test_container_optional_fields_resolve_to_empty() {
        let xml = didl(
            r#"<container id="1" parentID="0" restricted="0"><dc:title>Music</dc:title><upnp:class>object.container</upnp:class></container>"#,
        );

        let c = &DidlLite::from_xml(&xml).unwrap().containers[0];
        assert_eq!(c.child_count, "");
        assert_eq!(c.child_count(), None);
        assert_eq!(c.searchable, "");
        assert_eq!(c.modification_time, "");
        assert!(!c.is_restricted());
    }

    #[test]
    fn test_parse_item_with_resource() {
        let xml = didl(
            r#"<item id="64$0$1" refID="1$4$2" parentID="64$0" restricted="1"><dc:title>Song</dc:title><dc:date>2019-01-01</dc:date><upnp:genre>Rock</upnp:genre><upnp:album>Album</upnp:album><upnp:albumArtURI>http://host/art.jpg</upnp:albumArtURI><upnp:class>object.item.audioItem.musicTrack</upnp:class><res duration="0:03:58.000" size="5712345" bitrate="24000" protocolInfo="http-get:*:audio/mpeg:*">http://host:8200/MediaItems/22.mp3</res></item>"#,
        );

        let listing = DidlLite::from_xml(&xml).unwrap();
        let item = &listing.items[0];
        assert_eq!(item.id, "64$0$1");
        assert_eq!(item.ref_id, Some("1$4$2".to_string()));
        assert_eq!(item.parent_id, "64$0");
        assert_eq!(item.date, "2019-01-01");
        assert_eq!(item.genre, "Rock");
        assert_eq!(item.album_art_uri, "http://host/art.jpg");
        assert_eq!(item.extension, "");
        assert_eq!(item.res.duration, "0:03:58.000");
        assert_eq!(item.res.size, "5712345");
        assert_eq!(item.res.bitrate, "24000");
        assert_eq!(item.res.resolution, "");
        assert_eq!(item.res.uri, "http://host:8200/MediaItems/22.mp3");
        assert_eq!(item.res.mime_type(), Some("audio/mpeg"));
    }

    #[test]
    fn test_element_text_kept_verbatim() {
        let xml = didl(
            "<item id=\" a \" parentID=\"0\" restricted=\"1\"><dc:title>  Spaced  </dc:title><upnp:class>object.item</upnp:class><res size=\"1\" protocolInfo=\"http-get:*:audio/mpeg:*\">\n  http://nas/1.mp3\n</res></item>",
        );

        let item = &DidlLite::from_xml(&xml).unwrap().items[0];
        assert_eq!(item.id, " a ");
        assert_eq!(item.title, "  Spaced  ");
        assert_eq!(item.res.uri, "http://nas/1.mp3");
    }

    #[test]
    fn test_item_missing_size_fails() {
        let xml = didl(
            r#"<item id="1" parentID="0" restricted="1"><dc:title>Song</dc:title><upnp:class>object.item</upnp:class><res protocolInfo="http-get:*:audio/mpeg:*">http://host/a.mp3</res></item>"#,
        );

        assert!(matches!(
            DidlLite::from_xml(&xml),
            Err(ParseError::MissingRequiredAttribute(_))
        ));
    }

    #[test]
    fn test_item_missing_protocol_info_fails() {
        let xml = didl(
            r#"<item id="1" parentID="0" restricted="1"><dc:title>Song</dc:title><upnp:class>object.item</upnp:class><res size="10">http://host/a.mp3</res></item>"#,
        );

        assert!(DidlLite::from_xml(&xml).is_err());
    }

    #[test]
    fn test_item_without_res_fails() {
        let xml = didl(
            r#"<item id="1" parentID="0" restricted="1"><dc:title>Song</dc:title><upnp:class>object.item</upnp:class></item>"#,
        );

        assert!(matches!(
            DidlLite::from_xml(&xml),
            Err(ParseError::MissingRequiredElement(_))
        ));
    }

    #[test]
    fn test_nested_elements_are_not_listed() {
        // Only direct children of DIDL-Lite count
        let xml = didl(
            r#"<container id="1" parentID="0" restricted="1"><dc:title>Outer</dc:title><upnp:class>object.container</upnp:class><container id="2" parentID="1" restricted="1"><dc:title>Inner</dc:title><upnp:class>object.container</upnp:class></container></container>"#,
        );

        let listing = DidlLite::from_xml(&xml).unwrap();
        assert_eq!(listing.containers.len(), 1);
        assert_eq!(listing.containers[0].title, "Outer");
    }

    #[test]
    fn test_unqualified_didl_fails() {
        let xml = r#"<DIDL-Lite><container id="1" parentID="0" restricted="1"/></DIDL-Lite>"#;
        assert!(matches!(
            DidlLite::from_xml(xml),
            Err(ParseError::NamespaceMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_listing() {
        let listing = DidlLite::from_xml(&didl("")).unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_mime_type_wildcard() {
        let res = DidlResource {
            protocol_info: "http-get:*:*:*".to_string(),
            ..Default::default()
        };
        assert_eq!(res.mime_type(), None);
    }
}
