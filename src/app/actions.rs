//! Semantic action IDs for click targets.

// ── Home screen ──────────────────────────────────────────────
pub const PICK_BOOK_BASE: u16 = 10; // +index 0..3
pub const CHANGE_COVER_BASE: u16 = 20; // +index 0..3
pub const RESET_DATA: u16 = 30;

// ── Play screen ──────────────────────────────────────────────
pub const PLAY_COMPLETE: u16 = 40;
pub const PLAY_REROLL: u16 = 41;
pub const PLAY_TOGGLE: u16 = 42;
pub const PLAY_STOP: u16 = 43;
pub const PLAY_BACK: u16 = 44;

// ── Proof screen ─────────────────────────────────────────────
pub const PROOF_CHOOSE: u16 = 50;
pub const PROOF_SUBMIT: u16 = 51;

// ── Cleared screen ───────────────────────────────────────────
pub const CLEARED_HOME: u16 = 60;

// ── Dialogs ──────────────────────────────────────────────────
pub const AD_ACCEPT: u16 = 70;
pub const AD_VIP: u16 = 71;
pub const AD_ASK_BACK: u16 = 72;
pub const AD_VIEW_CLOSE: u16 = 73;
pub const DIALOG_BACKDROP: u16 = 79;
