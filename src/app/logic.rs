//! Action Gacha session logic (no rendering / IO).
//!
//! Flow: Home → Play (draw + countdown) → Proof → Cleared → Home.
//! Every draw goes through the gate: a free draw if any remain today,
//! otherwise the advertisement dialogs.

use std::mem;

use crate::catalog;
use crate::console;
use crate::store::activity::LogEntry;
use crate::thumbnail;
use crate::timer::Countdown;

use super::state::{Dialog, Phase, PickTarget, PickedFile, PlayState, ProofState, Session};

// ── Tick ─────────────────────────────────────────────────────

/// Advance every live countdown. The play countdown belongs to the play
/// phase and the ad countdown to its dialog, so only timers of the current
/// state can move. A cover received on an earlier frame is decoded here,
/// after its loading notice has been drawn.
pub fn tick(s: &mut Session, delta_ticks: u32) {
    if let Some((book_id, bytes)) = s.pending_cover.take() {
        upload_cover(s, book_id, &bytes);
    }
    if delta_ticks == 0 {
        return;
    }
    if let Phase::Play(play) = &mut s.phase {
        play.countdown.tick(delta_ticks);
    }
    let ad_done = match &mut s.dialog {
        Some(Dialog::AdView(c)) => {
            c.tick(delta_ticks);
            c.is_finished()
        }
        _ => false,
    };
    if ad_done {
        complete_ad(s);
    }
}

// ── Draw gate ────────────────────────────────────────────────

/// Replace the shown action with a fresh draw and restart the countdown.
fn roll_action(s: &mut Session) {
    let seconds = s.config.play_seconds;
    if let Phase::Play(play) = &mut s.phase {
        play.action = Some(s.gacha.draw(play.book_id));
        play.countdown.restart(seconds);
    }
}

/// Draw for the book being played. Spends a free draw if one is left;
/// otherwise opens the ad prompt and changes nothing else.
/// Returns true when an action was drawn.
pub fn request_draw(s: &mut Session) -> bool {
    if !matches!(s.phase, Phase::Play(_)) {
        return false;
    }
    if s.counter.try_consume() {
        roll_action(s);
        true
    } else {
        s.dialog = Some(Dialog::AdAsk);
        false
    }
}

pub fn accept_ad(s: &mut Session) {
    if s.dialog == Some(Dialog::AdAsk) {
        let c = s.new_countdown(s.config.ad_seconds);
        s.dialog = Some(Dialog::AdView(c));
    }
}

pub fn choose_vip(s: &mut Session) {
    if s.dialog == Some(Dialog::AdAsk) {
        s.dialog = None;
        s.notice = Some("VIPプランは準備中です".into());
        console::log("VIP 導線は未実装");
    }
}

/// Close whichever dialog is open. An unfinished ad grants nothing.
pub fn close_dialog(s: &mut Session) {
    s.dialog = None;
}

/// The ad ran to zero: grant the bonus, spend one for the pending draw,
/// and draw.
fn complete_ad(s: &mut Session) {
    s.dialog = None;
    let v = s.counter.read();
    s.counter.write((v + s.config.ad_bonus).saturating_sub(1));
    roll_action(s);
    s.notice = Some(format!("広告視聴で +{} 回！", s.config.ad_bonus));
}

// ── Phase transitions ────────────────────────────────────────

pub fn pick_book(s: &mut Session, book_id: &str) {
    if s.phase != Phase::Home {
        return;
    }
    let Some(book) = catalog::book(book_id) else {
        return;
    };
    s.notice = None;
    s.phase = Phase::Play(PlayState {
        book_id: book.id,
        action: None,
        countdown: Countdown::paused(s.config.play_seconds, s.config.ticks_per_second),
    });
    request_draw(s);
}

pub fn reroll(s: &mut Session) {
    request_draw(s);
}

pub fn toggle_pause(s: &mut Session) {
    if let Phase::Play(play) = &mut s.phase {
        play.countdown.toggle();
    }
}

pub fn stop(s: &mut Session) {
    if let Phase::Play(play) = &mut s.phase {
        play.countdown.pause();
    }
}

/// Play → Home without logging anything.
pub fn back_home(s: &mut Session) {
    if matches!(s.phase, Phase::Play(_)) {
        s.dialog = None;
        s.phase = Phase::Home;
    }
}

/// Play → Proof, carrying the action on screen.
/// Ignored until an action has been drawn.
pub fn complete(s: &mut Session) {
    if !matches!(&s.phase, Phase::Play(p) if p.action.is_some()) {
        return;
    }
    if let Phase::Play(PlayState {
        book_id,
        action: Some(action),
        ..
    }) = mem::replace(&mut s.phase, Phase::Home)
    {
        s.dialog = None;
        s.phase = Phase::Proof(ProofState {
            book_id,
            action,
            photo: None,
        });
    }
}

pub fn request_photo(s: &mut Session) {
    if matches!(s.phase, Phase::Proof(_)) {
        s.pending_pick = Some(PickTarget::ProofPhoto);
    }
}

pub fn choose_photo(s: &mut Session, name: String) {
    if let Phase::Proof(proof) = &mut s.phase {
        proof.photo = Some(name);
    }
}

/// Proof → Cleared. Appends exactly one entry at the head of the log.
pub fn submit_proof(s: &mut Session) {
    if !matches!(s.phase, Phase::Proof(_)) {
        return;
    }
    if let Phase::Proof(proof) = mem::replace(&mut s.phase, Phase::Home) {
        let title = catalog::book(proof.book_id).map(|b| b.title).unwrap_or("");
        let entry = LogEntry {
            timestamp: s.clock.now_iso(),
            book_title: title.to_string(),
            action_text: proof.action,
            proof_filename: proof.photo,
        };
        s.log.push(entry.clone());
        s.phase = Phase::Cleared(entry);
    }
}

pub fn return_home(s: &mut Session) {
    if matches!(s.phase, Phase::Cleared(_)) {
        s.phase = Phase::Home;
    }
}

// ── Covers ───────────────────────────────────────────────────

pub fn request_cover(s: &mut Session, book_id: &str) {
    if let Some(book) = catalog::book(book_id) {
        s.pending_pick = Some(PickTarget::Cover(book.id));
    }
}

pub fn upload_cover(s: &mut Session, book_id: &str, bytes: &[u8]) {
    let Some(book) = catalog::book(book_id) else {
        return;
    };
    let uri = thumbnail::normalize(bytes, &s.config.thumbnail);
    s.covers.set(book.id, uri);
    s.notice = Some(format!("「{}」の表紙を変更しました", book.title));
}

/// Route a file chosen in the page's picker. Covers are queued for the
/// next tick; decoding a phone photo takes long enough to be seen.
pub fn receive_file(s: &mut Session, file: PickedFile) {
    match file.target {
        PickTarget::Cover(id) => {
            s.pending_cover = Some((id, file.bytes));
            s.notice = Some("表紙を読み込み中…".into());
        }
        PickTarget::ProofPhoto => choose_photo(s, file.name),
    }
}

// ── Reset ────────────────────────────────────────────────────

/// Wipe logs, the counter and every cover, and return to a fresh home screen.
pub fn reset_all(s: &mut Session) {
    s.log.clear();
    s.counter.reset();
    s.covers.reset_all();
    s.dialog = None;
    s.pending_pick = None;
    s.pending_cover = None;
    s.phase = Phase::Home;
    s.notice = Some("データをリセットしました".into());
    console::log("データをリセットしました");
}
