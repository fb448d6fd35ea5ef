/*! Retirement fund operators and the marker colors used to tell them apart on a map. */
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/** The fund operators (AFORE) that may appear in the municipality column. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum Operator {
    #[strum(serialize = "PENSIONISSSTE")]
    Pensionissste,
    #[strum(serialize = "AZTECA")]
    Azteca,
    #[strum(serialize = "CITIBANAMEX")]
    Citibanamex,
    #[strum(serialize = "COPPEL")]
    Coppel,
    #[strum(serialize = "INBURSA")]
    Inbursa,
    #[strum(serialize = "INVERCAP")]
    Invercap,
    #[strum(serialize = "PRINCIPAL")]
    Principal,
    #[strum(serialize = "PROFUTURO")]
    Profuturo,
    #[strum(serialize = "SURA")]
    Sura,
    #[strum(serialize = "XXI-BANORTE")]
    XxiBanorte,
}

impl Operator {
    /// Recognize an operator name, ignoring surrounding whitespace and letter case.
    pub fn recognize(text: &str) -> Option<Operator> {
        Operator::from_str(&text.trim().to_uppercase()).ok()
    }
}

/** Marker colors, named the way web map icons name them. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Green,
    Blue,
    Black,
    Gray,
}

impl MarkerColor {
    /// CSS color for HTML output.
    pub fn hex(self) -> &'static str {
        use MarkerColor::*;

        match self {
            Red => "#d63e2a",
            Green => "#72b026",
            Blue => "#38aadd",
            Black => "#303030",
            Gray => "#a3a3a3",
        }
    }

    /// KML color, which is written as aabbggrr.
    pub fn kml(self) -> &'static str {
        use MarkerColor::*;

        match self {
            Red => "ff2a3ed6",
            Green => "ff26b072",
            Blue => "ffddaa38",
            Black => "ff303030",
            Gray => "ffa3a3a3",
        }
    }
}

/// The color used for suggested sites in every view.
pub const PROPOSED_SITE_COLOR: MarkerColor = MarkerColor::Blue;

/** Ways of picking a marker color from the text in the municipality column. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// PENSIONISSSTE red, other operators green, everything else black.
    Operators,
    /// Exactly "PENSIONISSSTE" red, exactly "Nuevo CAP" blue, everything else gray.
    Sites,
}

/// The municipality value used to mark new sites in a combined file.
pub const NEW_SITE_LABEL: &str = "Nuevo CAP";

impl Palette {
    pub fn color_for(self, municipality: &str) -> MarkerColor {
        match self {
            Palette::Operators => match Operator::recognize(municipality) {
                Some(Operator::Pensionissste) => MarkerColor::Red,
                Some(_) => MarkerColor::Green,
                None => MarkerColor::Black,
            },
            Palette::Sites => {
                if municipality == Into::<&'static str>::into(Operator::Pensionissste) {
                    MarkerColor::Red
                } else if municipality == NEW_SITE_LABEL {
                    PROPOSED_SITE_COLOR
                } else {
                    MarkerColor::Gray
                }
            }
        }
    }
}
