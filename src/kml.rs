//! KML output of a [MarkerMap].
//!
//! Only the elements a marker map needs are written: one icon style per marker color and one
//! point placemark per marker, all inside a single folder. Output is streamed, and a [KmlFile]
//! closes the document when it is dropped.

use crate::{
    map::{escape, popup_html, Marker, MarkerMap},
    operator::MarkerColor,
    CapSiteResult,
};
use chrono::Utc;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use strum::IntoEnumIterator;

const ICON_URL: &str = "http://maps.google.com/mapfiles/kml/paddle/wht-blank.png";

const HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    "\n",
    r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#,
    "\n<Document>\n"
);

const FOOTER: &str = "</Document>\n</kml>\n";

pub struct KmlFile(BufWriter<File>);

impl KmlFile {
    pub fn new<P: AsRef<Path>>(pth: P) -> CapSiteResult<Self> {
        let f = File::create(pth.as_ref())?;
        let mut kfile = KmlFile(BufWriter::new(f));
        kfile.start_document()?;
        Ok(kfile)
    }
}

impl KmlWriter for KmlFile {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.0
    }
}

impl Drop for KmlFile {
    fn drop(&mut self) {
        self.finish_document();
        let _ = self.0.flush();
    }
}

/// Write a whole marker map as a KML file.
pub fn write_kml<P: AsRef<Path>>(path: P, map: &MarkerMap) -> CapSiteResult<()> {
    let mut kfile = KmlFile::new(path)?;
    kfile.write_marker_map(map)
}

fn style_id(color: MarkerColor) -> String {
    format!("marker-{}", color)
}

pub trait KmlWriter {
    fn output(&mut self) -> &mut dyn Write;

    fn start_document(&mut self) -> CapSiteResult<()> {
        self.output().write_all(HEADER.as_bytes())?;
        Ok(())
    }

    fn finish_document(&mut self) {
        let _ = self.output().write_all(FOOTER.as_bytes());
    }

    /// One shared icon style per marker color, with ids like "marker-red".
    ///
    /// KML colors are written aabbggrr.
    fn write_marker_styles(&mut self) -> CapSiteResult<()> {
        for color in MarkerColor::iter() {
            writeln!(
                self.output(),
                "<Style id=\"{}\">\n<IconStyle>\n<color>{}</color>\n<scale>1</scale>\n\
                 <Icon><href>{}</href></Icon>\n</IconStyle>\n</Style>",
                style_id(color),
                color.kml(),
                ICON_URL
            )?;
        }
        Ok(())
    }

    /// A point placemark. The popup lines become an HTML description in a CDATA section.
    fn write_placemark(&mut self, marker: &Marker) -> CapSiteResult<()> {
        // Escaped popups cannot contain "]]>".
        let description = popup_html(&marker.popup);

        writeln!(
            self.output(),
            "<Placemark>\n<name>{}</name>\n<description><![CDATA[{}]]></description>\n\
             <styleUrl>#{}</styleUrl>\n<Point><coordinates>{},{},0</coordinates></Point>\n\
             </Placemark>",
            escape(&marker.title),
            description,
            style_id(marker.color),
            marker.coord.lon,
            marker.coord.lat
        )?;
        Ok(())
    }

    /// Styles, then every marker of the map in an open folder named after the map.
    fn write_marker_map(&mut self, map: &MarkerMap) -> CapSiteResult<()> {
        self.write_marker_styles()?;

        writeln!(
            self.output(),
            "<Folder>\n<name>{}</name>\n<description>Generated {}</description>\n<open>1</open>",
            escape(&map.title),
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        for marker in &map.markers {
            self.write_placemark(marker)?;
        }

        writeln!(self.output(), "</Folder>")?;
        Ok(())
    }
}
