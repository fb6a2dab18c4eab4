//! Rule compilation: raw selector/property pairs into [`Declaration`]s.
//!
//! Extraction runs over a fixed whitelist of recognized properties in a
//! fixed order. Anything unrecognized — an unknown property, a keyword
//! missing from its table with no numeric fallback, an unparsable color —
//! is dropped and the rest of the rule keeps compiling.

use std::collections::HashMap;

use crate::style::declarations::{
    BorderStyle, Color, Declaration, Display, FlexAlign, FlexDirection, FlexJustify, FlexWrap,
    FontSize, FontWeight, LayoutDeclaration, Overflow, Position, StyleUnit, ThemeDeclaration,
};

/// One stylesheet rule: a selector plus its property/value map.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub properties: HashMap<String, String>,
}

impl Rule {
    pub fn new(selector: impl Into<String>, properties: &[(&str, &str)]) -> Self {
        Self {
            selector: selector.into(),
            properties: properties
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

/// Longest numeric prefix of a CSS length, `parseFloat` style: `"12px"`
/// yields 12.0, `"auto"` yields nothing.
fn numeric_prefix(value: &str) -> Option<f32> {
    let value = value.trim_start();
    let bytes = value.as_bytes();

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        i += 1;
    }

    if !seen_digit {
        return None;
    }
    value[..i].parse().ok()
}

impl Color {
    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` and the basic
    /// CSS named colors. Alpha normalizes to 0–255.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if let Some(inner) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_rgb_args(inner);
        }
        Self::named(value)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let wide = |pair: &str| u8::from_str_radix(pair, 16).ok();
        let narrow = |nibble: &str| u8::from_str_radix(nibble, 16).ok().map(|v| v * 17);

        match hex.len() {
            3 => Some(Self::rgba(
                narrow(&hex[0..1])?,
                narrow(&hex[1..2])?,
                narrow(&hex[2..3])?,
                255,
            )),
            6 => Some(Self::rgba(
                wide(&hex[0..2])?,
                wide(&hex[2..4])?,
                wide(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::rgba(
                wide(&hex[0..2])?,
                wide(&hex[2..4])?,
                wide(&hex[4..6])?,
                wide(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    fn parse_rgb_args(inner: &str) -> Option<Self> {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }

        let channel = |raw: &str| raw.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
        let red = channel(parts[0])?;
        let green = channel(parts[1])?;
        let blue = channel(parts[2])?;
        let alpha = match parts.get(3) {
            Some(raw) => {
                let unit = raw.parse::<f32>().ok()?;
                (unit.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 255,
        };
        Some(Self::rgba(red, green, blue, alpha))
    }

    fn named(name: &str) -> Option<Self> {
        let (r, g, b, a) = match name {
            "transparent" => (0, 0, 0, 0),
            "black" => (0, 0, 0, 255),
            "silver" => (192, 192, 192, 255),
            "gray" | "grey" => (128, 128, 128, 255),
            "white" => (255, 255, 255, 255),
            "maroon" => (128, 0, 0, 255),
            "red" => (255, 0, 0, 255),
            "purple" => (128, 0, 128, 255),
            "fuchsia" | "magenta" => (255, 0, 255, 255),
            "green" => (0, 128, 0, 255),
            "lime" => (0, 255, 0, 255),
            "olive" => (128, 128, 0, 255),
            "yellow" => (255, 255, 0, 255),
            "navy" => (0, 0, 128, 255),
            "blue" => (0, 0, 255, 255),
            "teal" => (0, 128, 128, 255),
            "aqua" | "cyan" => (0, 255, 255, 255),
            "orange" => (255, 165, 0, 255),
            _ => return None,
        };
        Some(Self::rgba(r, g, b, a))
    }
}

struct Extractor<'a> {
    properties: &'a HashMap<String, String>,
    out: Vec<Declaration>,
}

impl<'a> Extractor<'a> {
    fn raw(&self, name: &str) -> Option<&'a str> {
        self.properties
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn layout(&mut self, declaration: LayoutDeclaration) {
        self.out.push(Declaration::Layout(declaration));
    }

    fn theme(&mut self, declaration: ThemeDeclaration) {
        self.out.push(Declaration::Theme(declaration));
    }

    /// Keyword property mapped through its fixed table; unknown values drop.
    fn keyword<T>(&mut self, name: &str, table: fn(&str) -> Option<T>, wrap: fn(T) -> LayoutDeclaration) {
        if let Some(raw) = self.raw(name) {
            match table(raw) {
                Some(value) => self.layout(wrap(value)),
                None => log::debug!("dropping unrecognized {name}: {raw}"),
            }
        }
    }

    /// Length property; non-numeric values drop.
    fn point(&mut self, name: &str, wrap: fn(StyleUnit) -> LayoutDeclaration) {
        if let Some(raw) = self.raw(name) {
            match numeric_prefix(raw) {
                Some(value) => self.layout(wrap(StyleUnit::Point(value))),
                None => log::debug!("dropping non-numeric {name}: {raw}"),
            }
        }
    }

    /// Length property elided when zero (border widths, margins, paddings).
    fn nonzero_point(&mut self, name: &str, wrap: fn(StyleUnit) -> LayoutDeclaration) {
        if let Some(value) = self.raw(name).and_then(numeric_prefix) {
            if value != 0.0 {
                self.layout(wrap(StyleUnit::Point(value)));
            }
        }
    }

    fn nonzero_width(&mut self, name: &str, wrap: fn(f32) -> LayoutDeclaration) {
        if let Some(value) = self.raw(name).and_then(numeric_prefix) {
            if value != 0.0 {
                self.layout(wrap(value));
            }
        }
    }

    fn float(&mut self, name: &str, wrap: fn(f32) -> LayoutDeclaration) {
        if let Some(value) = self.raw(name).and_then(numeric_prefix) {
            self.layout(wrap(value));
        }
    }

    /// Color property; `initial` and unparsable values drop.
    fn color(&mut self, name: &str, wrap: fn(Color) -> ThemeDeclaration) {
        if let Some(raw) = self.raw(name).filter(|raw| *raw != "initial") {
            match Color::parse(raw) {
                Some(color) => self.theme(wrap(color)),
                None => log::debug!("dropping unparsable {name}: {raw}"),
            }
        }
    }

    fn border_style(&mut self, name: &str, wrap: fn(BorderStyle) -> ThemeDeclaration) {
        if let Some(raw) = self.raw(name).filter(|raw| *raw != "initial") {
            match BorderStyle::from_keyword(raw) {
                Some(style) => self.theme(wrap(style)),
                None => log::debug!("dropping unrecognized {name}: {raw}"),
            }
        }
    }
}

/// Compile one rule's property map into declarations, in the fixed
/// whitelist order: layout properties first, then theme properties.
pub fn compile_rule(properties: &HashMap<String, String>) -> Vec<Declaration> {
    let mut ex = Extractor { properties, out: Vec::new() };

    ex.keyword("align-content", FlexAlign::from_keyword, LayoutDeclaration::AlignContent);
    ex.keyword("align-items", FlexAlign::from_keyword, LayoutDeclaration::AlignItems);
    ex.keyword("align-self", FlexAlign::from_keyword, LayoutDeclaration::AlignSelf);
    ex.nonzero_width("border-bottom-width", LayoutDeclaration::BorderBottom);
    ex.nonzero_width("border-end-width", LayoutDeclaration::BorderEnd);
    ex.nonzero_width("border-left-width", LayoutDeclaration::BorderLeft);
    ex.nonzero_width("border-right-width", LayoutDeclaration::BorderRight);
    ex.nonzero_width("border-start-width", LayoutDeclaration::BorderStart);
    ex.nonzero_width("border-top-width", LayoutDeclaration::BorderTop);
    ex.point("bottom", LayoutDeclaration::Bottom);
    // "flex" is the engine default; only deviations cross the wire.
    if let Some(raw) = ex.raw("display").filter(|raw| *raw != "flex") {
        match Display::from_keyword(raw) {
            Some(display) => ex.layout(LayoutDeclaration::Display(display)),
            None => log::debug!("dropping unrecognized display: {raw}"),
        }
    }
    ex.point("end", LayoutDeclaration::End);
    ex.float("flex", LayoutDeclaration::Flex);
    ex.point("flex-basis", LayoutDeclaration::FlexBasis);
    ex.keyword("flex-direction", FlexDirection::from_keyword, LayoutDeclaration::FlexDirection);
    ex.float("flex-grow", LayoutDeclaration::FlexGrow);
    ex.float("flex-shrink", LayoutDeclaration::FlexShrink);
    ex.keyword("flex-wrap", FlexWrap::from_keyword, LayoutDeclaration::FlexWrap);
    ex.point("height", LayoutDeclaration::Height);
    ex.keyword("justify-content", FlexJustify::from_keyword, LayoutDeclaration::JustifyContent);
    ex.point("left", LayoutDeclaration::Left);
    ex.nonzero_point("margin-bottom", LayoutDeclaration::MarginBottom);
    ex.nonzero_point("margin-end", LayoutDeclaration::MarginEnd);
    ex.nonzero_point("margin-left", LayoutDeclaration::MarginLeft);
    ex.nonzero_point("margin-right", LayoutDeclaration::MarginRight);
    ex.nonzero_point("margin-start", LayoutDeclaration::MarginStart);
    ex.nonzero_point("margin-top", LayoutDeclaration::MarginTop);
    ex.point("max-height", LayoutDeclaration::MaxHeight);
    ex.point("max-width", LayoutDeclaration::MaxWidth);
    ex.point("min-height", LayoutDeclaration::MinHeight);
    ex.point("min-width", LayoutDeclaration::MinWidth);
    ex.keyword("overflow", Overflow::from_keyword, LayoutDeclaration::Overflow);
    ex.nonzero_point("padding-bottom", LayoutDeclaration::PaddingBottom);
    ex.nonzero_point("padding-end", LayoutDeclaration::PaddingEnd);
    ex.nonzero_point("padding-left", LayoutDeclaration::PaddingLeft);
    ex.nonzero_point("padding-right", LayoutDeclaration::PaddingRight);
    ex.nonzero_point("padding-start", LayoutDeclaration::PaddingStart);
    ex.nonzero_point("padding-top", LayoutDeclaration::PaddingTop);
    ex.keyword("position", Position::from_keyword, LayoutDeclaration::Position);
    ex.point("right", LayoutDeclaration::Right);
    ex.point("start", LayoutDeclaration::Start);
    ex.point("top", LayoutDeclaration::Top);
    ex.point("width", LayoutDeclaration::Width);

    ex.color("background-color", ThemeDeclaration::BackgroundColor);
    ex.color("border-bottom-color", ThemeDeclaration::BorderBottomColor);
    ex.border_style("border-bottom-style", ThemeDeclaration::BorderBottomStyle);
    ex.color("border-left-color", ThemeDeclaration::BorderLeftColor);
    ex.border_style("border-left-style", ThemeDeclaration::BorderLeftStyle);
    ex.color("border-right-color", ThemeDeclaration::BorderRightColor);
    ex.border_style("border-right-style", ThemeDeclaration::BorderRightStyle);
    ex.color("border-top-color", ThemeDeclaration::BorderTopColor);
    ex.border_style("border-top-style", ThemeDeclaration::BorderTopStyle);
    ex.color("color", ThemeDeclaration::Color);
    if let Some(raw) = ex.raw("font-size") {
        match FontSize::from_keyword(raw).or_else(|| numeric_prefix(raw).map(|v| FontSize::Length(StyleUnit::Point(v)))) {
            Some(size) => ex.theme(ThemeDeclaration::FontSize(size)),
            None => log::debug!("dropping unrecognized font-size: {raw}"),
        }
    }
    if let Some(raw) = ex.raw("font-weight") {
        match FontWeight::from_keyword(raw).or_else(|| numeric_prefix(raw).map(FontWeight::Weight)) {
            Some(weight) => ex.theme(ThemeDeclaration::FontWeight(weight)),
            None => log::debug!("dropping unrecognized font-weight: {raw}"),
        }
    }

    ex.out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_normalizes_with_full_opacity() {
        assert_eq!(Color::parse("#336699"), Some(Color::rgba(51, 102, 153, 255)));
        assert_eq!(Color::parse("#fff"), Some(Color::rgba(255, 255, 255, 255)));
        assert_eq!(Color::parse("#33669980"), Some(Color::rgba(51, 102, 153, 128)));
    }

    #[test]
    fn rgb_function_scales_alpha_to_255() {
        assert_eq!(Color::parse("rgb(10, 20, 30)"), Some(Color::rgba(10, 20, 30, 255)));
        assert_eq!(Color::parse("rgba(10, 20, 30, 0.5)"), Some(Color::rgba(10, 20, 30, 128)));
        assert_eq!(Color::parse("rgba(10, 20, 30, 1)"), Some(Color::rgba(10, 20, 30, 255)));
    }

    #[test]
    fn unparsable_colors_are_rejected(){
        assert_eq!(Color::parse("#33669"), None);
        assert_eq!(Color::parse("rebeccapurple"), None);
        assert_eq!(Color::parse("rgb(1,2)"), None);
    }

    #[test]
    fn lengths_keep_their_numeric_prefix() {
        assert_eq!(numeric_prefix("12px"), Some(12.0));
        assert_eq!(numeric_prefix("-4.5pt"), Some(-4.5));
        assert_eq!(numeric_prefix("auto"), None);
    }

    #[test]
    fn compiles_a_typical_rule_in_fixed_order() {
        let rule = Rule::new(
            ".panel",
            &[
                ("width", "100px"),
                ("height", "40"),
                ("flex-direction", "row"),
                ("background-color", "#336699"),
                ("color", "white"),
            ],
        );
        let declarations = compile_rule(&rule.properties);

        assert_eq!(
            declarations,
            vec![
                Declaration::Layout(LayoutDeclaration::FlexDirection(FlexDirection::Row)),
                Declaration::Layout(LayoutDeclaration::Height(StyleUnit::Point(40.0))),
                Declaration::Layout(LayoutDeclaration::Width(StyleUnit::Point(100.0))),
                Declaration::Theme(ThemeDeclaration::BackgroundColor(Color::rgba(51, 102, 153, 255))),
                Declaration::Theme(ThemeDeclaration::Color(Color::rgba(255, 255, 255, 255))),
            ],
        );
    }

    #[test]
    fn zero_widths_and_initial_colors_drop() {
        let rule = Rule::new(
            "div",
            &[
                ("border-top-width", "0"),
                ("margin-left", "0px"),
                ("padding-top", "8px"),
                ("background-color", "initial"),
            ],
        );
        assert_eq!(
            compile_rule(&rule.properties),
            vec![Declaration::Layout(LayoutDeclaration::PaddingTop(StyleUnit::Point(8.0)))],
        );
    }

    #[test]
    fn unknown_keywords_drop_without_aborting_the_rule() {
        let rule = Rule::new(
            "div",
            &[
                ("position", "sticky"),
                ("overflow", "hidden"),
                ("display", "grid"),
                ("font-weight", "650"),
            ],
        );
        assert_eq!(
            compile_rule(&rule.properties),
            vec![
                Declaration::Layout(LayoutDeclaration::Overflow(Overflow::Hidden)),
                Declaration::Theme(ThemeDeclaration::FontWeight(FontWeight::Weight(650.0))),
            ],
        );
    }

    #[test]
    fn default_display_stays_off_the_wire() {
        let rule = Rule::new("div", &[("display", "flex")]);
        assert!(compile_rule(&rule.properties).is_empty());

        let rule = Rule::new("div", &[("display", "none")]);
        assert_eq!(
            compile_rule(&rule.properties),
            vec![Declaration::Layout(LayoutDeclaration::Display(Display::None))],
        );
    }
}
