//! Static book shelf and per-book action pools.

pub struct Book {
    pub id: &'static str,
    pub title: &'static str,
    /// Served from `public/covers/`; shown until the user picks their own.
    pub default_cover: &'static str,
}

pub const BOOKS: [Book; 4] = [
    Book {
        id: "atomic",
        title: "ジェームズ・クリアー式 複利で伸びる1つの習慣",
        default_cover: "/covers/atomic.jpg",
    },
    Book {
        id: "dream_elephant",
        title: "夢をかなえるゾウ",
        default_cover: "/covers/dream_elephant.jpg",
    },
    Book {
        id: "seven_habits",
        title: "7つの習慣",
        default_cover: "/covers/seven_habits.jpg",
    },
    Book {
        id: "carnegie",
        title: "人を動かす",
        default_cover: "/covers/carnegie.jpg",
    },
];

pub fn book(id: &str) -> Option<&'static Book> {
    BOOKS.iter().find(|b| b.id == id)
}

/// Action pool for a book; empty for unknown ids.
pub fn actions_for(id: &str) -> &'static [&'static str] {
    match id {
        "atomic" => &[
            "本を3ページ読む",
            "行動のトリガーを1つ書く",
            "机に本を置く（見える化）",
            "小さな改善を1つ記録",
            "寝る前5分の読書セット",
        ],
        "dream_elephant" => &[
            "靴を磨く",
            "誰かに感謝を1つ送る",
            "財布を整理する",
            "行きたい場所を調べる",
            "やらないことを1つ決める",
        ],
        "seven_habits" => &[
            "今日の最優先を1つ書く",
            "重要タスクに5分だけ着手",
            "影響の輪の行動を1つ実行",
            "週のゴールを1行書く",
            "家族/同僚を尊重する言葉を送る",
        ],
        "carnegie" => &[
            "名前で挨拶する",
            "長所を1つ褒める",
            "3分だけ聞き役になる",
            "笑顔でありがとうを言う",
            "相手視点を1行メモ",
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_book_has_five_actions() {
        for b in &BOOKS {
            assert_eq!(actions_for(b.id).len(), 5, "{}", b.id);
        }
    }

    #[test]
    fn book_ids_are_unique() {
        for (i, a) in BOOKS.iter().enumerate() {
            for b in &BOOKS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(book("carnegie").map(|b| b.title), Some("人を動かす"));
        assert!(book("nope").is_none());
        assert!(actions_for("nope").is_empty());
    }
}
