//! Action Gacha: pick a book, draw an action, do it, log it.

pub mod actions;
pub mod logic;
pub mod render;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::catalog::BOOKS;
use crate::input::{ClickState, InputEvent};

use actions::*;
use state::{Dialog, Phase, PickTarget, PickedFile, Session};

pub struct GachaApp {
    pub session: Session,
}

impl GachaApp {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    /// Advance countdowns by `delta_ticks` discrete ticks.
    pub fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.session, delta_ticks);
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.session, f, area, click_state);
    }

    /// Hand the page shell a pending file-picker request, at most once.
    pub fn take_pick_request(&mut self) -> Option<PickTarget> {
        self.session.pending_pick.take()
    }

    pub fn on_file_picked(&mut self, file: PickedFile) {
        logic::receive_file(&mut self.session, file);
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        let s = &mut self.session;

        // Dialogs are modal: nothing underneath reacts while one is open.
        match &s.dialog {
            Some(Dialog::AdAsk) => {
                return match action_id {
                    AD_ACCEPT => {
                        logic::accept_ad(s);
                        true
                    }
                    AD_VIP => {
                        logic::choose_vip(s);
                        true
                    }
                    AD_ASK_BACK => {
                        logic::close_dialog(s);
                        true
                    }
                    _ => false,
                };
            }
            Some(Dialog::AdView(_)) => {
                return if action_id == AD_VIEW_CLOSE {
                    logic::close_dialog(s);
                    true
                } else {
                    false
                };
            }
            None => {}
        }

        match &s.phase {
            Phase::Home => match action_id {
                id if (PICK_BOOK_BASE..PICK_BOOK_BASE + BOOKS.len() as u16).contains(&id) => {
                    logic::pick_book(s, BOOKS[(id - PICK_BOOK_BASE) as usize].id);
                    true
                }
                id if (CHANGE_COVER_BASE..CHANGE_COVER_BASE + BOOKS.len() as u16).contains(&id) => {
                    logic::request_cover(s, BOOKS[(id - CHANGE_COVER_BASE) as usize].id);
                    true
                }
                RESET_DATA => {
                    logic::reset_all(s);
                    true
                }
                _ => false,
            },
            Phase::Play(_) => match action_id {
                PLAY_COMPLETE => {
                    logic::complete(s);
                    true
                }
                PLAY_REROLL => {
                    logic::reroll(s);
                    true
                }
                PLAY_TOGGLE => {
                    logic::toggle_pause(s);
                    true
                }
                PLAY_STOP => {
                    logic::stop(s);
                    true
                }
                PLAY_BACK => {
                    logic::back_home(s);
                    true
                }
                _ => false,
            },
            Phase::Proof(_) => match action_id {
                PROOF_CHOOSE => {
                    logic::request_photo(s);
                    true
                }
                PROOF_SUBMIT => {
                    logic::submit_proof(s);
                    true
                }
                _ => false,
            },
            Phase::Cleared(_) => match action_id {
                CLEARED_HOME => {
                    logic::return_home(s);
                    true
                }
                _ => false,
            },
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        let id = match (&self.session.dialog, &self.session.phase) {
            (Some(Dialog::AdAsk), _) => match key {
                'y' => AD_ACCEPT,
                'v' => AD_VIP,
                'q' => AD_ASK_BACK,
                _ => return false,
            },
            (Some(Dialog::AdView(_)), _) => match key {
                'q' => AD_VIEW_CLOSE,
                _ => return false,
            },
            (None, Phase::Home) => match key {
                '1'..='4' => PICK_BOOK_BASE + (key as u8 - b'1') as u16,
                'a'..='d' => CHANGE_COVER_BASE + (key as u8 - b'a') as u16,
                'x' => RESET_DATA,
                _ => return false,
            },
            (None, Phase::Play(_)) => match key {
                'c' => PLAY_COMPLETE,
                'g' => PLAY_REROLL,
                'p' => PLAY_TOGGLE,
                's' => PLAY_STOP,
                'q' => PLAY_BACK,
                _ => return false,
            },
            (None, Phase::Proof(_)) => match key {
                'f' => PROOF_CHOOSE,
                's' => PROOF_SUBMIT,
                _ => return false,
            },
            (None, Phase::Cleared(_)) => match key {
                'h' | 'q' => CLEARED_HOME,
                _ => return false,
            },
        };
        self.handle_click(id)
    }
}
