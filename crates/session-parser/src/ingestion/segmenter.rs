//! Splits a free-text schedule cell into room, subject, teacher and notes
//!
//! Cells are written by hand and look like
//! `"305\nМатематика\nИванов И.И."` or `"412а Физика Петров П.П., Сидоров С.С. дист."`.
//! Each piece is peeled off with its own pattern, in a fixed order:
//! room prefix, remote marker, teacher suffix, and whatever remains is the subject.

use once_cell::sync::Lazy;
use regex::Regex;

/// Value stored in `notes` when a cell is marked as remote
pub const REMOTE_NOTE: &str = "дист.";

static WIDE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));

/// 2-3 digits, an optional letter, an optional `/N` suffix, then a break
static ROOM_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2,3}[а-яА-ЯёЁa-zA-Z]?(?:/[0-9]+)?)\s+").expect("valid regex")
});

static REMOTE_ANYWHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)дист").expect("valid regex"));

static REMOTE_TRAILING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*дист\.?\s*$").expect("valid regex"));

/// `Фамилия И.О.` entries, comma-joined
static TEACHER_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([А-ЯЁ][а-яё]+-?[а-яё]*\s+[А-ЯЁ]\.[А-ЯЁ]\.(?:,\s*[А-ЯЁ][а-яё]+-?[а-яё]*\s+[А-ЯЁ]\.[А-ЯЁ]\.)*)\s*(?:дист\.?)?\s*$",
    )
    .expect("valid regex")
});

/// `Фамилия И.`
static TEACHER_SHORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([А-ЯЁ][а-яё]+\s+[А-ЯЁ]\.)\s*(?:дист\.?)?\s*$").expect("valid regex")
});

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

static TRAILING_JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,.-]+$").expect("valid regex"));

/// Pieces of a segmented cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSegments {
    pub room: Option<String>,
    pub subject: Option<String>,
    pub teacher: Option<String>,
    pub notes: Option<String>,
}

/// Whether the text carries the remote-format marker anywhere
pub fn has_remote_marker(text: &str) -> bool {
    REMOTE_ANYWHERE.is_match(text)
}

/// Match a leading room number, returning the room and the byte length consumed
pub fn match_room_prefix(text: &str) -> Option<(String, usize)> {
    let caps = ROOM_PREFIX.captures(text)?;
    let whole = caps.get(0)?;
    let room = caps.get(1)?.as_str().to_string();
    Some((room, whole.end()))
}

/// Match a teacher name at the end of the text.
///
/// Returns the trimmed name and the byte offset where the match starts.
/// The full-initials form wins over the single-initial form.
pub fn match_teacher_suffix(text: &str) -> Option<(String, usize)> {
    [&*TEACHER_FULL, &*TEACHER_SHORT].iter().find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let start = caps.get(0)?.start();
        let name = caps.get(1)?.as_str().trim().to_string();
        Some((name, start))
    })
}

/// Collapse inner whitespace and drop trailing punctuation; empty becomes `None`
pub fn clean_subject(text: &str) -> Option<String> {
    let collapsed = MULTI_SPACE.replace_all(text, " ");
    let stripped = TRAILING_JUNK.replace(&collapsed, "");
    let subject = stripped.trim();
    (!subject.is_empty()).then(|| subject.to_string())
}

/// Segment one cell into room / subject / teacher / notes
pub fn segment_cell(raw: &str) -> CellSegments {
    let text = raw.trim();
    if text.is_empty() {
        return CellSegments::default();
    }

    let normalized = WIDE_SPACE.replace_all(text, "  ");

    let (room, rest) = match match_room_prefix(&normalized) {
        Some((room, consumed)) => (Some(room), normalized[consumed..].trim()),
        None => (None, &normalized[..]),
    };

    let remote = has_remote_marker(rest);
    let rest = REMOTE_TRAILING.replace(rest, "");
    let rest = rest.trim();

    let (teacher, subject_text) = match match_teacher_suffix(rest) {
        Some((name, start)) => (Some(name), rest[..start].trim()),
        None => (None, rest),
    };

    CellSegments {
        room,
        subject: clean_subject(subject_text),
        teacher,
        notes: remote.then(|| REMOTE_NOTE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_subject_teacher() {
        let seg = segment_cell("305\nМатематический анализ\nИванов И.И.");
        assert_eq!(seg.room.as_deref(), Some("305"));
        assert_eq!(seg.subject.as_deref(), Some("Математический анализ"));
        assert_eq!(seg.teacher.as_deref(), Some("Иванов И.И."));
        assert_eq!(seg.notes, None);
    }

    #[test]
    fn test_room_with_letter_and_suffix() {
        assert_eq!(match_room_prefix("412а Физика").map(|r| r.0).as_deref(), Some("412а"));
        assert_eq!(match_room_prefix("101/2 История").map(|r| r.0).as_deref(), Some("101/2"));
        assert_eq!(match_room_prefix("2024 год"), None);
        assert_eq!(match_room_prefix("305"), None);
    }

    #[test]
    fn test_multiple_teachers() {
        let seg = segment_cell("412а Физика Петров П.П., Сидорова С.С.");
        assert_eq!(seg.room.as_deref(), Some("412а"));
        assert_eq!(seg.subject.as_deref(), Some("Физика"));
        assert_eq!(seg.teacher.as_deref(), Some("Петров П.П., Сидорова С.С."));
    }

    #[test]
    fn test_single_initial_teacher() {
        let seg = segment_cell("Экономика, Смирнова А.");
        assert_eq!(seg.room, None);
        assert_eq!(seg.subject.as_deref(), Some("Экономика"));
        assert_eq!(seg.teacher.as_deref(), Some("Смирнова А."));
    }

    #[test]
    fn test_remote_marker() {
        let seg = segment_cell("210 Право Кузнецов К.К. дист.");
        assert_eq!(seg.room.as_deref(), Some("210"));
        assert_eq!(seg.subject.as_deref(), Some("Право"));
        assert_eq!(seg.teacher.as_deref(), Some("Кузнецов К.К."));
        assert_eq!(seg.notes.as_deref(), Some(REMOTE_NOTE));

        let only_marker = segment_cell("дист.");
        assert_eq!(only_marker, CellSegments { notes: Some(REMOTE_NOTE.to_string()), ..Default::default() });
    }

    #[test]
    fn test_no_teacher_keeps_whole_subject() {
        let seg = segment_cell("Иностранный   язык -");
        assert_eq!(seg.teacher, None);
        assert_eq!(seg.subject.as_deref(), Some("Иностранный язык"));
    }

    #[test]
    fn test_teacher_only() {
        let seg = segment_cell("Иванов И.И.");
        assert_eq!(seg.subject, None);
        assert_eq!(seg.teacher.as_deref(), Some("Иванов И.И."));
    }

    #[test]
    fn test_empty_cell() {
        assert_eq!(segment_cell("   "), CellSegments::default());
    }
}
