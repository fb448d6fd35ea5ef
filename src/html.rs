//! Write a [MarkerMap] as a self-contained interactive HTML page.
//!
//! The page pulls Leaflet and the OpenStreetMap tiles from the web, everything else (the marker
//! data included) is in the file itself. Like the KML writer this streams straight into the
//! output.

use crate::{
    map::{escape, popup_html, MarkerMap},
    operator::MarkerColor,
    CapSiteResult,
};
use chrono::Utc;
use serde::Serialize;
use std::{
    borrow::Cow,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use strum::IntoEnumIterator;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const STYLE: &str = r#"<style>
html, body { height: 100%; margin: 0; font-family: sans-serif; }
#map { height: calc(100% - 2em); }
footer { height: 2em; line-height: 2em; padding: 0 1em; font-size: 0.8em; color: gray; }
.legend { background: white; padding: 6px 8px; border-radius: 4px; line-height: 1.6em; }
.legend i { display: inline-block; width: 12px; height: 12px; border-radius: 6px; margin-right: 6px; }
</style>
"#;

const MAP_SCRIPT: &str = r#"L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
markers.forEach(function (m) {
  L.circleMarker([m.lat, m.lon], {radius: 8, weight: 2, color: m.color, fillColor: m.color, fillOpacity: 0.8})
    .bindTooltip(m.title)
    .bindPopup(m.popup)
    .addTo(map);
});
var legend = L.control({position: "bottomright"});
legend.onAdd = function () {
  var div = L.DomUtil.create("div", "legend");
  div.innerHTML = colors.map(function (c) {
    return '<i style="background:' + c.hex + '"></i>' + c.name;
  }).join("<br>");
  return div;
};
legend.addTo(map);
"#;

#[derive(Serialize)]
struct MarkerJson<'a> {
    lat: f64,
    lon: f64,
    color: &'static str,
    title: Cow<'a, str>,
    popup: String,
}

#[derive(Serialize)]
struct ColorJson {
    name: &'static str,
    hex: &'static str,
}

/// Serialize for embedding in a script element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> CapSiteResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub struct HtmlMapFile(BufWriter<File>);

impl HtmlMapFile {
    pub fn create<P: AsRef<Path>>(pth: P) -> CapSiteResult<Self> {
        let f = std::fs::File::create(pth.as_ref())?;
        Ok(HtmlMapFile(BufWriter::new(f)))
    }

    pub fn finish(mut self) -> CapSiteResult<()> {
        self.0.flush()?;
        Ok(())
    }
}

impl HtmlMapWriter for HtmlMapFile {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.0
    }
}

/// Write a whole marker map as an HTML file.
pub fn write_html<P: AsRef<Path>>(path: P, map: &MarkerMap) -> CapSiteResult<()> {
    let mut hfile = HtmlMapFile::create(path)?;
    hfile.write_marker_map(map)?;
    hfile.finish()
}

pub trait HtmlMapWriter {
    fn output(&mut self) -> &mut dyn Write;

    /// Everything up to and including the opening body tag.
    fn write_head(&mut self, title: &str) -> CapSiteResult<()> {
        writeln!(self.output(), "<!DOCTYPE html>\n<html>\n<head>")?;
        writeln!(self.output(), "<meta charset=\"utf-8\">")?;
        writeln!(
            self.output(),
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(self.output(), "<title>{}</title>", escape(title))?;
        writeln!(self.output(), "<link rel=\"stylesheet\" href=\"{}\">", LEAFLET_CSS)?;
        writeln!(self.output(), "<script src=\"{}\"></script>", LEAFLET_JS)?;
        self.output().write_all(STYLE.as_bytes())?;
        writeln!(self.output(), "</head>\n<body>")?;
        Ok(())
    }

    /// The map container and the script that fills it.
    fn write_map(&mut self, map: &MarkerMap) -> CapSiteResult<()> {
        let markers: Vec<MarkerJson> = map
            .markers
            .iter()
            .map(|m| MarkerJson {
                lat: m.coord.lat,
                lon: m.coord.lon,
                color: m.color.hex(),
                title: escape(&m.title),
                popup: popup_html(&m.popup),
            })
            .collect();

        let colors: Vec<ColorJson> = MarkerColor::iter()
            .filter(|c| map.markers.iter().any(|m| m.color == *c))
            .map(|c| ColorJson {
                name: c.into(),
                hex: c.hex(),
            })
            .collect();

        writeln!(self.output(), "<div id=\"map\"></div>")?;
        writeln!(self.output(), "<script>")?;
        writeln!(self.output(), "var markers = {};", script_json(&markers)?)?;
        writeln!(self.output(), "var colors = {};", script_json(&colors)?)?;
        writeln!(
            self.output(),
            "var map = L.map(\"map\").setView([{}, {}], {});",
            map.center.lat,
            map.center.lon,
            map.zoom
        )?;
        self.output().write_all(MAP_SCRIPT.as_bytes())?;
        writeln!(self.output(), "</script>")?;
        Ok(())
    }

    /// The footer and closing tags.
    fn write_tail(&mut self) -> CapSiteResult<()> {
        writeln!(
            self.output(),
            "<footer>Generated {}</footer>",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.output(), "</body>\n</html>")?;
        Ok(())
    }

    fn write_marker_map(&mut self, map: &MarkerMap) -> CapSiteResult<()> {
        self.write_head(&map.title)?;
        self.write_map(map)?;
        self.write_tail()
    }
}
