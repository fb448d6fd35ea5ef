/*!
 * A map as a list of colored markers.
 *
 * Views build a [MarkerMap] and hand it to the HTML or KML writers.
 */
use crate::{
    geo::{mean_center, Coord},
    location::{LocationPoint, ProposedSite},
    operator::{MarkerColor, Palette, PROPOSED_SITE_COLOR},
};
use std::borrow::Cow;

/// The zoom level every view starts at.
pub const DEFAULT_ZOOM: u8 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coord: Coord,
    pub color: MarkerColor,
    /// Short plain text name.
    pub title: String,
    /// Lines of plain text for the popup, escaped when written.
    pub popup: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerMap {
    pub title: String,
    pub center: Coord,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl MarkerMap {
    /// Start an empty map centered on a coordinate.
    pub fn new<S: Into<String>>(title: S, center: Coord) -> Self {
        MarkerMap {
            title: title.into(),
            center,
            zoom: DEFAULT_ZOOM,
            markers: vec![],
        }
    }

    /// Start an empty map centered on the mean of some points. `None` if there are no points.
    pub fn centered_on<S: Into<String>>(title: S, points: &[LocationPoint]) -> Option<Self> {
        mean_center(points.iter().map(|p| p.coord)).map(|center| Self::new(title, center))
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Add one marker per municipality, colored by the palette.
    ///
    /// With `show_weight` the popup carries the PEA, otherwise the coordinates.
    pub fn add_locations(&mut self, points: &[LocationPoint], palette: Palette, show_weight: bool) {
        for pnt in points {
            let name = match palette {
                Palette::Operators => pnt.label.trim().to_uppercase(),
                Palette::Sites => pnt.label.clone(),
            };

            let mut popup = vec![format!("Municipio: {}", name)];
            if show_weight {
                popup.push(format!("PEA: {}", pnt.weight));
            } else {
                popup.push(format!("Latitud: {}", pnt.coord.lat));
                popup.push(format!("Longitud: {}", pnt.coord.lon));
            }

            self.push(Marker {
                coord: pnt.coord,
                color: palette.color_for(&pnt.label),
                title: name,
                popup,
            });
        }
    }

    /// Add one marker per proposed site.
    pub fn add_sites(&mut self, sites: &[ProposedSite]) {
        for site in sites {
            self.push(Marker {
                coord: site.coord,
                color: PROPOSED_SITE_COLOR,
                title: site.id.clone(),
                popup: vec![
                    site.id.clone(),
                    format!("Estado: {}", site.region().unwrap_or("")),
                    format!("Municipio: {}", site.label().unwrap_or("")),
                ],
            });
        }
    }
}

/// Escape text for use inside HTML or XML.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}

/// Join popup lines into escaped HTML separated by line breaks.
pub fn popup_html(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| escape(line))
        .collect::<Vec<_>>()
        .join("<br>")
}
