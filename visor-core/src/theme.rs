// Surface colours and layout constants
// All colours are u32 in packed ARGB format: 0xAARRGGBB

pub const BACKGROUND: u32 = 0xFF_0A_0E_14;
pub const FOREGROUND: u32 = 0xFF_E8_EC_F0;
pub const DIM_TEXT: u32 = 0xFF_7A_84_90;
pub const ACCENT: u32 = 0xFF_4F_C3_F7;
pub const ACCENT_SOFT: u32 = 0xFF_1E_4A_60;

// Controls
pub const BUTTON_FILL: u32 = 0xFF_22_2A_34;
pub const BUTTON_EDGE: u32 = 0xFF_44_50_5E;
pub const CANCEL_FILL: u32 = 0xFF_5A_1E_24;
pub const CONFIRM_FILL: u32 = 0xFF_1E_50_2C;
pub const PILL_SELECTED: u32 = 0xFF_4F_C3_F7;
pub const PILL_IDLE: u32 = 0xFF_2A_34_40;
pub const KNOB: u32 = 0xFF_FF_FF_FF;
pub const KNOB_EDGE: u32 = 0xFF_10_10_10;

// Meditation progress dots
pub const DOT_DONE: u32 = 0xFF_4F_C3_F7;
pub const DOT_CURRENT: u32 = 0xFF_FF_D5_4F;
pub const DOT_FUTURE: u32 = 0xFF_33_3C_48;

// Calibration
pub const GRID_LINE: u32 = 0xFF_FF_FF_FF;
pub const GRID_BACKGROUND: u32 = 0xFF_00_00_00;
pub const MARKER_CORNER: u32 = 0xFF_FF_30_30;
pub const MARKER_CENTER: u32 = 0xFF_30_FF_30;
pub const SELECTED_EDGE: u32 = 0xFF_FF_E0_30;

// Layout
pub const MARGIN: i32 = 12;
pub const BAND_FRACTION: f32 = 0.22; // Cancel band height, share of surface height
pub const BRACKET_FRACTION: f32 = 0.14; // Bracket width, share of surface width
pub const TEXT_SCALE: i32 = 2;
pub const LARGE_TEXT_SCALE: i32 = 6;
pub const FLASH_MAX: f32 = 0.6; // Brightening applied at the start of a press flash
pub const FLASH_MS: u64 = 220;
