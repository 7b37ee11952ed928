//! Action Gacha rendering (read-only from state).

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::catalog::{self, BOOKS};
use crate::clock::display_local;
use crate::input::{is_narrow_layout, ClickState};
use crate::store::activity::LogEntry;
use crate::widgets::{centered_rect, ClickableList};

use super::actions::*;
use super::state::{Dialog, Phase, PlayState, ProofState, Session};

pub fn render(s: &Session, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let borders = if is_narrow_layout(area.width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    let header_height = if s.notice.is_some() { 4 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(6)])
        .split(area);

    render_header(s, f, chunks[0], borders);

    let block = phase_block(&s.phase, borders);
    let cl = match &s.phase {
        Phase::Home => home_lines(s),
        Phase::Play(play) => play_lines(play),
        Phase::Proof(proof) => proof_lines(proof),
        Phase::Cleared(entry) => cleared_lines(entry),
    };

    // Phase panel gets exactly what it needs; the log takes the rest.
    let inner_width = block.inner(chunks[1]).width;
    let chrome = chunks[1].height - block.inner(chunks[1]).height;
    let panel_height = cl.visual_rows(inner_width) + chrome;
    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(panel_height), Constraint::Min(3)])
        .split(chunks[1]);

    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(body[0], &block, &mut cs, 0, inner_width);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }),
        body[0],
    );

    render_log(s, f, body[1], borders);

    if let Some(dialog) = &s.dialog {
        render_dialog(s, dialog, f, area, click_state);
    }
}

// ── Shared pieces ──────────────────────────────────────────────

fn button(key: char, label: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" [{}] ", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(label.into(), Style::default().fg(Color::White)),
    ])
}

fn dim(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

fn phase_block(phase: &Phase, borders: Borders) -> Block<'static> {
    let (title, color) = match phase {
        Phase::Home => (" 本棚 ", Color::Cyan),
        Phase::Play(_) => (" ガチャ ", Color::Yellow),
        Phase::Proof(_) => (" 証拠を送る ", Color::Green),
        Phase::Cleared(_) => (" 達成 ", Color::Magenta),
    };
    Block::default()
        .borders(borders)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn proof_label(name: Option<&str>) -> String {
    match name {
        Some(n) => format!("画像: {}", n),
        None => "画像なし".to_string(),
    }
}

// ── Header ─────────────────────────────────────────────────────

fn render_header(s: &Session, f: &mut Frame, area: Rect, borders: Borders) {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            " 行動ガチャ MVP",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  本日無料ガチャ: ", Style::default().fg(Color::Gray)),
        Span::styled(
            s.free_draws().to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(notice) = &s.notice {
        lines.push(Line::from(Span::styled(
            format!(" {}", notice),
            Style::default().fg(Color::Green),
        )));
    }
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Home ───────────────────────────────────────────────────────

fn home_lines(s: &Session) -> ClickableList<'static> {
    let mut cl = ClickableList::new();
    for (i, b) in BOOKS.iter().enumerate() {
        let pick_key = (b'1' + i as u8) as char;
        let cover_key = (b'a' + i as u8) as char;
        cl.push_clickable(button(pick_key, b.title), PICK_BOOK_BASE + i as u16);
        let status = if s.covers.is_custom(b.id) {
            "設定済み"
        } else {
            "既定"
        };
        cl.push_clickable(
            button(cover_key, format!("表紙を変更（{}）", status)),
            CHANGE_COVER_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));
    cl.push_clickable(button('x', "データをリセット（履歴・表紙・ガチャ回数）"), RESET_DATA);
    cl
}

// ── Play ───────────────────────────────────────────────────────

fn play_lines(play: &PlayState) -> ClickableList<'static> {
    let title = catalog::book(play.book_id).map(|b| b.title).unwrap_or("");
    let action = play.action.clone().unwrap_or_else(|| "ガチャ準備中…".to_string());
    let mut timer = vec![
        Span::styled(" 残り時間 ", Style::default().fg(Color::Gray)),
        Span::styled(
            play.countdown.display(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    if !play.countdown.is_running() {
        timer.push(Span::styled("  停止中", Style::default().fg(Color::DarkGray)));
    }

    let mut cl = ClickableList::new();
    cl.push(dim(format!(" 選択中の本：{}", title)));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!(" {}", action),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(timer));
    cl.push(Line::from(""));
    if play.action.is_some() {
        cl.push_clickable(button('c', "完了"), PLAY_COMPLETE);
    }
    cl.push_clickable(button('g', "ガチャを回す"), PLAY_REROLL);
    let toggle = if play.countdown.is_running() {
        "一時停止"
    } else {
        "再開"
    };
    cl.push_clickable(button('p', toggle), PLAY_TOGGLE);
    cl.push_clickable(button('s', "■ 停止"), PLAY_STOP);
    cl.push_clickable(button('q', "戻る"), PLAY_BACK);
    cl
}

// ── Proof ──────────────────────────────────────────────────────

fn proof_lines(proof: &ProofState) -> ClickableList<'static> {
    let photo = match &proof.photo {
        Some(name) => name.clone(),
        None => "未選択".to_string(),
    };
    let mut cl = ClickableList::new();
    cl.push(dim(" 完了したら写真を送って記録します"));
    cl.push(Line::from(Span::styled(
        format!(" {}", proof.action),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(vec![
        Span::styled(" 証拠写真（任意）: ", Style::default().fg(Color::Gray)),
        Span::styled(photo, Style::default().fg(Color::Cyan)),
    ]));
    cl.push(Line::from(""));
    cl.push_clickable(button('f', "写真を選ぶ"), PROOF_CHOOSE);
    cl.push_clickable(button('s', "送信して完了"), PROOF_SUBMIT);
    cl
}

// ── Cleared ────────────────────────────────────────────────────

fn cleared_lines(entry: &LogEntry) -> ClickableList<'static> {
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        " ★ 達成しました！ ★",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(format!(" {} / {}", entry.book_title, entry.action_text)));
    cl.push(dim(format!(
        " {} / {}",
        display_local(&entry.timestamp),
        proof_label(entry.proof_filename.as_deref())
    )));
    cl.push(Line::from(""));
    cl.push_clickable(button('h', "ホームへ戻る"), CLEARED_HOME);
    cl
}

// ── Activity log ───────────────────────────────────────────────

fn render_log(s: &Session, f: &mut Frame, area: Rect, borders: Borders) {
    let mut lines = Vec::new();
    if s.log.is_empty() {
        lines.push(dim(" まだ達成ログがありません"));
    }
    for entry in s.log.entries() {
        lines.push(Line::from(Span::styled(
            format!(" {} / {}", entry.book_title, entry.action_text),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(dim(format!(
            "   {} / {}",
            display_local(&entry.timestamp),
            proof_label(entry.proof_filename.as_deref())
        )));
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Blue))
        .title(" 最近の達成 ");
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ── Dialogs ────────────────────────────────────────────────────

fn render_dialog(
    s: &Session,
    dialog: &Dialog,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let title = match dialog {
        Dialog::AdAsk => {
            cl.push(Line::from(" 本日の無料ガチャ回数がありません。"));
            cl.push(Line::from(vec![
                Span::raw(" 広告を視聴すると本日の残り回数が "),
                Span::styled(
                    format!("+{}", s.config.ad_bonus),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" されます。"),
            ]));
            cl.push(Line::from(""));
            cl.push_clickable(
                button('y', format!("はい（+{}してガチャ）", s.config.ad_bonus)),
                AD_ACCEPT,
            );
            cl.push_clickable(button('v', "VIP（広告なし・課金案内）"), AD_VIP);
            cl.push_clickable(button('q', "戻る"), AD_ASK_BACK);
            " 広告を見ますか？ "
        }
        Dialog::AdView(countdown) => {
            cl.push(Line::from(""));
            cl.push(Line::from(Span::styled(
                format!("動画再生中… {}s", countdown.remaining()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            cl.push(Line::from(""));
            cl.push_clickable(button('q', "閉じる"), AD_VIEW_CLOSE);
            " 広告視聴 "
        }
    };

    let width = area.width.saturating_sub(4).min(48);
    let inner_width = width.saturating_sub(2);
    let rect = centered_rect(width, cl.visual_rows(inner_width) + 2, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title)
        .title_alignment(Alignment::Center);

    f.render_widget(Clear, rect);
    let mut cs = click_state.borrow_mut();
    // Taps outside the dialog hit the backdrop and do nothing.
    cs.add_click_target(area, DIALOG_BACKDROP);
    cl.register_targets_with_block(rect, &block, &mut cs, 0, inner_width);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }),
        rect,
    );
}
