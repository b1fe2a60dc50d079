//! Raw escape sequences the renderer assembles into frames. Kept as plain
//! string constants rather than a styling crate: the whole vocabulary is a
//! dozen fixed codes, and every one of them is reused verbatim across
//! frames.

pub const CURSOR_HIDE: &str = "\x1b[?25l";
pub const CURSOR_SHOW: &str = "\x1b[?25h";
pub const CURSOR_RESET: &str = "\x1b[H";

pub const INIT_ALT_BUF: &str = "\x1b[?1049h";
pub const KILL_ALT_BUF: &str = "\x1b[?1049l";

pub const MOUSE_TRACKING_ON: &str = "\x1b[?1002h";
pub const MOUSE_TRACKING_OFF: &str = "\x1b[?1002l";

pub const SGR_ENCODING_ON: &str = "\x1b[?1006h";
pub const SGR_ENCODING_OFF: &str = "\x1b[?1006l";

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CLEAR_RIGHT: &str = "\x1b[K";
pub const CLEAR_LEFT: &str = "\x1b[1K";
pub const CLEAR_TO_END: &str = "\x1b[0J";
pub const CLEAR_FROM_START: &str = "\x1b[1J";

pub const FONT_BOLD: &str = "\x1b[1m";
pub const FONT_RESET: &str = "\x1b[0m";

pub const COLOR_DEFAULT_LIGHT: u8 = 146;
pub const COLOR_DEFAULT_DARK: u8 = 60;
