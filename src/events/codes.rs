//! Numeric code tables shared with the native engine.
//!
//! Strings never cross the boundary for hot-path identifiers; key names,
//! element tags and event kinds all travel as these fixed codes. The tables
//! must stay in sync with the engine side.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Engine-synthesized event kinds, as they appear in polled events.
pub mod event_type {
    pub const KEY_DOWN: u32 = 1;
    pub const KEY_PRESS: u32 = 2;
    pub const KEY_UP: u32 = 3;

    pub const MOUSE_MOVE: u32 = 11;
    pub const MOUSE_DOWN: u32 = 12;
    pub const MOUSE_UP: u32 = 13;
    pub const AUX_CLICK: u32 = 14;
    pub const CLICK: u32 = 15;
    pub const DBL_CLICK: u32 = 16;
    pub const CONTEXT_MENU: u32 = 17;
    pub const WHEEL: u32 = 18;
    pub const SELECT: u32 = 19;

    // Synthesized from enter/leave geometry rather than forwarded input.
    pub const MOUSE_ENTER: u32 = 21;
    pub const MOUSE_LEAVE: u32 = 22;
    pub const MOUSE_OVER: u32 = 23;
    pub const MOUSE_OUT: u32 = 24;
}

lazy_static! {
    /// Listener prop name to event-type code.
    pub static ref EVENT_PROPS: HashMap<&'static str, u32> = {
        use event_type::*;
        HashMap::from([
            ("onKeyDown", KEY_DOWN),
            ("onKeyPress", KEY_PRESS),
            ("onKeyUp", KEY_UP),
            ("onMouseMove", MOUSE_MOVE),
            ("onMouseDown", MOUSE_DOWN),
            ("onMouseUp", MOUSE_UP),
            ("onAuxClick", AUX_CLICK),
            ("onClick", CLICK),
            ("onDblClick", DBL_CLICK),
            ("onContextMenu", CONTEXT_MENU),
            ("onWheel", WHEEL),
            ("onSelect", SELECT),
            ("onMouseEnter", MOUSE_ENTER),
            ("onMouseLeave", MOUSE_LEAVE),
            ("onMouseOver", MOUSE_OVER),
            ("onMouseOut", MOUSE_OUT),
        ])
    };

    /// Physical key name (UI Events `code` values) to numeric key code.
    pub static ref KEY_CODES: HashMap<&'static str, u32> = HashMap::from([
        ("Unidentified", 0),
        // Writing system keys
        ("Backquote", 1),
        ("Backslash", 2),
        ("BracketLeft", 3),
        ("BracketRight", 4),
        ("Comma", 5),
        ("Digit0", 6),
        ("Digit1", 7),
        ("Digit2", 8),
        ("Digit3", 9),
        ("Digit4", 10),
        ("Digit5", 11),
        ("Digit6", 12),
        ("Digit7", 13),
        ("Digit8", 14),
        ("Digit9", 15),
        ("Equal", 16),
        ("IntlBackslash", 17),
        ("IntlRo", 18),
        ("IntlYen", 19),
        ("KeyA", 20),
        ("KeyB", 21),
        ("KeyC", 22),
        ("KeyD", 23),
        ("KeyE", 24),
        ("KeyF", 25),
        ("KeyG", 26),
        ("KeyH", 27),
        ("KeyI", 28),
        ("KeyJ", 29),
        ("KeyK", 30),
        ("KeyL", 31),
        ("KeyM", 32),
        ("KeyN", 33),
        ("KeyO", 34),
        ("KeyP", 35),
        ("KeyQ", 36),
        ("KeyR", 37),
        ("KeyS", 38),
        ("KeyT", 39),
        ("KeyU", 40),
        ("KeyV", 41),
        ("KeyW", 42),
        ("KeyX", 43),
        ("KeyY", 44),
        ("KeyZ", 45),
        ("Minus", 46),
        ("Period", 47),
        ("Quote", 48),
        ("Semicolon", 49),
        ("Slash", 50),
        // Functional keys
        ("AltLeft", 51),
        ("AltRight", 52),
        ("Backspace", 53),
        ("CapsLock", 54),
        ("ContextMenu", 55),
        ("ControlLeft", 56),
        ("ControlRight", 57),
        ("Enter", 58),
        ("MetaLeft", 59),
        ("MetaRight", 60),
        ("ShiftLeft", 61),
        ("ShiftRight", 62),
        ("Space", 63),
        ("Tab", 64),
        // Japanese and Korean keyboards
        ("Convert", 65),
        ("KanaMode", 66),
        ("Lang1", 67),
        ("Lang2", 68),
        ("Lang3", 69),
        ("Lang4", 70),
        ("Lang5", 71),
        ("NonConvert", 72),
        // Control pad
        ("Delete", 73),
        ("End", 74),
        ("Help", 75),
        ("Home", 76),
        ("Insert", 77),
        ("PageDown", 78),
        ("PageUp", 79),
        // Arrow pad
        ("ArrowDown", 80),
        ("ArrowLeft", 81),
        ("ArrowRight", 82),
        ("ArrowUp", 83),
        // Numpad
        ("NumLock", 84),
        ("Numpad0", 85),
        ("Numpad1", 86),
        ("Numpad2", 87),
        ("Numpad3", 88),
        ("Numpad4", 89),
        ("Numpad5", 90),
        ("Numpad6", 91),
        ("Numpad7", 92),
        ("Numpad8", 93),
        ("Numpad9", 94),
        ("NumpadAdd", 95),
        ("NumpadBackspace", 96),
        ("NumpadClear", 97),
        ("NumpadClearEntry", 98),
        ("NumpadComma", 99),
        ("NumpadDecimal", 100),
        ("NumpadDivide", 101),
        ("NumpadEnter", 102),
        ("NumpadEqual", 103),
        ("NumpadHash", 104),
        ("NumpadMemoryAdd", 105),
        ("NumpadMemoryClear", 106),
        ("NumpadMemoryRecall", 107),
        ("NumpadMemoryStore", 108),
        ("NumpadMemorySubtract", 109),
        ("NumpadMultiply", 110),
        ("NumpadParenLeft", 111),
        ("NumpadParenRight", 112),
        ("NumpadStar", 113),
        ("NumpadSubtract", 114),
        // Function section
        ("Escape", 115),
        ("F1", 116),
        ("F2", 117),
        ("F3", 118),
        ("F4", 119),
        ("F5", 120),
        ("F6", 121),
        ("F7", 122),
        ("F8", 123),
        ("F9", 124),
        ("F10", 125),
        ("F11", 126),
        ("F12", 127),
        ("Fn", 128),
        ("FnLock", 129),
        ("PrintScreen", 130),
        ("ScrollLock", 131),
        ("Pause", 132),
        // Media keys
        ("BrowserBack", 133),
        ("BrowserFavorites", 134),
        ("BrowserForward", 135),
        ("BrowserHome", 136),
        ("BrowserRefresh", 137),
        ("BrowserSearch", 138),
        ("BrowserStop", 139),
        ("Eject", 140),
        ("LaunchApp1", 141),
        ("LaunchApp2", 142),
        ("LaunchMail", 143),
        ("MediaPlayPause", 144),
        ("MediaSelect", 145),
        ("MediaStop", 146),
        ("MediaTrackNext", 147),
        ("MediaTrackPrevious", 148),
        ("Power", 149),
        ("Sleep", 150),
        ("AudioVolumeDown", 151),
        ("AudioVolumeMute", 152),
        ("AudioVolumeUp", 153),
        ("WakeUp", 154),
    ]);

    /// Element tag to numeric element code. Covers HTML tags plus the
    /// component aliases hosts commonly map onto them.
    pub static ref ELEMENT_CODES: HashMap<&'static str, u32> = HashMap::from([
        ("Root", 1),
        // Content sectioning
        ("address", 10),
        ("article", 11),
        ("aside", 12),
        ("footer", 13),
        ("header", 14),
        ("nav", 15),
        ("section", 16),
        // Text sectioning
        ("hgroup", 21),
        ("h1", 22),
        ("h2", 23),
        ("h3", 24),
        ("h4", 25),
        ("h5", 26),
        ("h6", 27),
        // Text content
        ("main", 31),
        ("div", 32),
        ("span", 33),
        ("p", 34),
        ("ol", 35),
        ("ul", 36),
        ("li", 37),
        ("dl", 38),
        ("dt", 39),
        ("dd", 40),
        ("figure", 41),
        ("figcaption", 42),
        ("hr", 43),
        ("pre", 44),
        ("blockquote", 45),
        // Inline text semantics
        ("a", 51),
        ("b", 52),
        ("i", 53),
        ("u", 54),
        ("s", 55),
        ("em", 56),
        ("mark", 57),
        ("q", 58),
        ("cite", 59),
        ("code", 60),
        ("data", 61),
        ("time", 62),
        ("sub", 63),
        ("sup", 64),
        ("br", 65),
        ("wbr", 66),
        // Image and multimedia
        ("img", 71),
        ("area", 72),
        ("map", 73),
        ("audio", 74),
        ("video", 75),
        ("track", 76),
        // Forms
        ("button", 81),
        ("datalist", 82),
        ("fieldset", 83),
        ("form", 84),
        ("input", 85),
        ("label", 86),
        ("legend", 87),
        ("meter", 88),
        ("optgroup", 89),
        ("option", 90),
        ("output", 91),
        ("progress", 92),
        ("select", 93),
        ("textarea", 94),
        // Component aliases
        ("fragment", 1000),
        ("View", 1001),
        ("Text", 1002),
        ("Image", 71),
        ("TextInput", 1004),
        ("ScrollView", 1005),
        ("Button", 81),
        ("Picker", 1007),
        ("Slider", 1008),
        ("Switch", 1009),
        ("FlatList", 1010),
        ("SectionList", 1011),
    ]);
}

/// Code for a physical key name; unknown keys map to `Unidentified`.
pub fn key_code(name: &str) -> u32 {
    KEY_CODES.get(name).copied().unwrap_or(0)
}

pub fn element_code(tag: &str) -> Option<u32> {
    ELEMENT_CODES.get(tag).copied()
}

/// Event-type code for a listener prop name such as `onClick`.
pub fn event_prop_code(prop: &str) -> Option<u32> {
    EVENT_PROPS.get(prop).copied()
}
