//! Normalized style declarations.
//!
//! A declaration is one layout or theme property/value pair in the exact
//! JSON shape the native engine registers, e.g.
//! `{"Layout":{"Width":{"Point":100.0}}}` or
//! `{"Theme":{"Color":{"red":51,"green":102,"blue":153,"alpha":255}}}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    Layout(LayoutDeclaration),
    Theme(ThemeDeclaration),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutDeclaration {
    AlignContent(FlexAlign),
    AlignItems(FlexAlign),
    AlignSelf(FlexAlign),
    BorderBottom(f32),
    BorderEnd(f32),
    BorderLeft(f32),
    BorderRight(f32),
    BorderStart(f32),
    BorderTop(f32),
    Bottom(StyleUnit),
    Display(Display),
    End(StyleUnit),
    Flex(f32),
    FlexBasis(StyleUnit),
    FlexDirection(FlexDirection),
    FlexGrow(f32),
    FlexShrink(f32),
    FlexWrap(FlexWrap),
    Height(StyleUnit),
    JustifyContent(FlexJustify),
    Left(StyleUnit),
    MarginBottom(StyleUnit),
    MarginEnd(StyleUnit),
    MarginLeft(StyleUnit),
    MarginRight(StyleUnit),
    MarginStart(StyleUnit),
    MarginTop(StyleUnit),
    MaxHeight(StyleUnit),
    MaxWidth(StyleUnit),
    MinHeight(StyleUnit),
    MinWidth(StyleUnit),
    Overflow(Overflow),
    PaddingBottom(StyleUnit),
    PaddingEnd(StyleUnit),
    PaddingLeft(StyleUnit),
    PaddingRight(StyleUnit),
    PaddingStart(StyleUnit),
    PaddingTop(StyleUnit),
    Position(Position),
    Right(StyleUnit),
    Start(StyleUnit),
    Top(StyleUnit),
    Width(StyleUnit),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ThemeDeclaration {
    BackgroundColor(Color),
    BorderBottomColor(Color),
    BorderBottomStyle(BorderStyle),
    BorderLeftColor(Color),
    BorderLeftStyle(BorderStyle),
    BorderRightColor(Color),
    BorderRightStyle(BorderStyle),
    BorderTopColor(Color),
    BorderTopStyle(BorderStyle),
    Color(Color),
    FontSize(FontSize),
    FontWeight(FontWeight),
}

/// Lengths reach the engine as device-independent points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StyleUnit {
    Point(f32),
}

/// Color normalized to 8-bit channels; alpha scaled to 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Display {
    Flex,
    None,
}

impl Display {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "flex" => Some(Self::Flex),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overflow {
    Visible,
    Hidden,
    Scroll,
}

impl Overflow {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "scroll" => Some(Self::Scroll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Relative,
    Absolute,
}

impl Position {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "relative" => Some(Self::Relative),
            "absolute" => Some(Self::Absolute),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexAlign {
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
    Baseline,
    SpaceBetween,
    SpaceAround,
}

impl FlexAlign {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "auto" => Some(Self::Auto),
            "flex-start" => Some(Self::FlexStart),
            "center" => Some(Self::Center),
            "flex-end" => Some(Self::FlexEnd),
            "stretch" => Some(Self::Stretch),
            "baseline" => Some(Self::Baseline),
            "space-between" => Some(Self::SpaceBetween),
            "space-around" => Some(Self::SpaceAround),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexDirection {
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

impl FlexDirection {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "column" => Some(Self::Column),
            "column-reverse" => Some(Self::ColumnReverse),
            "row" => Some(Self::Row),
            "row-reverse" => Some(Self::RowReverse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexWrap {
    NoWrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "nowrap" => Some(Self::NoWrap),
            "wrap" => Some(Self::Wrap),
            "wrap-reverse" => Some(Self::WrapReverse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexJustify {
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
}

impl FlexJustify {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "flex-start" => Some(Self::FlexStart),
            "center" => Some(Self::Center),
            "flex-end" => Some(Self::FlexEnd),
            "space-between" => Some(Self::SpaceBetween),
            "space-around" => Some(Self::SpaceAround),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderStyle {
    None,
    Solid,
    Double,
    Dotted,
    Dashed,
    Hidden,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyle {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "none" => Some(Self::None),
            "solid" => Some(Self::Solid),
            "double" => Some(Self::Double),
            "dotted" => Some(Self::Dotted),
            "dashed" => Some(Self::Dashed),
            "hidden" => Some(Self::Hidden),
            "groove" => Some(Self::Groove),
            "ridge" => Some(Self::Ridge),
            "inset" => Some(Self::Inset),
            "outset" => Some(Self::Outset),
            _ => None,
        }
    }
}

/// Font size: a keyword, or a length fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FontSize {
    System,
    Smaller,
    Larger,
    Length(StyleUnit),
}

impl FontSize {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "system" => Some(Self::System),
            "smaller" => Some(Self::Smaller),
            "larger" => Some(Self::Larger),
            _ => None,
        }
    }
}

/// Font weight: a keyword, or a numeric weight fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FontWeight {
    System,
    Normal,
    Bold,
    Bolder,
    Lighter,
    Weight(f32),
}

impl FontWeight {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "system" => Some(Self::System),
            "normal" => Some(Self::Normal),
            "bold" => Some(Self::Bold),
            "bolder" => Some(Self::Bolder),
            "lighter" => Some(Self::Lighter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declarations_serialize_in_wire_shape() {
        let width = Declaration::Layout(LayoutDeclaration::Width(StyleUnit::Point(100.0)));
        assert_eq!(
            serde_json::to_value(&width).unwrap(),
            json!({ "Layout": { "Width": { "Point": 100.0 } } }),
        );

        let color = Declaration::Theme(ThemeDeclaration::Color(Color::rgba(51, 102, 153, 255)));
        assert_eq!(
            serde_json::to_value(&color).unwrap(),
            json!({ "Theme": { "Color": { "red": 51, "green": 102, "blue": 153, "alpha": 255 } } }),
        );
    }

    #[test]
    fn keyword_tables_reject_unknown_values() {
        assert_eq!(Position::from_keyword("sticky"), None);
        assert_eq!(Overflow::from_keyword("auto"), None);
        assert_eq!(FlexWrap::from_keyword("wrap-reverse"), Some(FlexWrap::WrapReverse));
        assert_eq!(BorderStyle::from_keyword("wavy"), None);
    }
}
