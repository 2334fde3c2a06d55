use sqlx::{Postgres, QueryBuilder};

// ==============================================================================
// Choseong table
// ==============================================================================

/// Boundary table for bare initial consonants: each consonant covers the
/// half-open syllable range [low, high) in Unicode order. The highs chain
/// into the next consonant's block; ㅎ is capped by 힣, the last Hangul
/// syllable, as an exclusive ceiling.
const CHOSEONG_RANGES: [(char, char, char); 19] = [
    ('ㄱ', '가', '까'),
    ('ㄲ', '까', '나'),
    ('ㄴ', '나', '다'),
    ('ㄷ', '다', '따'),
    ('ㄸ', '따', '라'),
    ('ㄹ', '라', '마'),
    ('ㅁ', '마', '바'),
    ('ㅂ', '바', '빠'),
    ('ㅃ', '빠', '사'),
    ('ㅅ', '사', '싸'),
    ('ㅆ', '싸', '아'),
    ('ㅇ', '아', '자'),
    ('ㅈ', '자', '짜'),
    ('ㅉ', '짜', '차'),
    ('ㅊ', '차', '카'),
    ('ㅋ', '카', '타'),
    ('ㅌ', '타', '파'),
    ('ㅍ', '파', '하'),
    ('ㅎ', '하', '힣'),
];

pub fn choseong_range(c: char) -> Option<(char, char)> {
    CHOSEONG_RANGES
        .iter()
        .find(|(consonant, _, _)| *consonant == c)
        .map(|(_, low, high)| (*low, *high))
}

#[allow(dead_code)]
pub fn is_choseong(c: char) -> bool {
    choseong_range(c).is_some()
}

// ==============================================================================
// Predicate building
// ==============================================================================

/// The columns the search endpoint may filter on. Raw column names never
/// come from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchColumn {
    Name,
    Code,
}

impl SearchColumn {
    pub fn as_sql(self) -> &'static str {
        match self {
            SearchColumn::Name => "name",
            SearchColumn::Code => "code",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(SearchColumn::Name),
            "code" => Some(SearchColumn::Code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Plain character: substring match anywhere in the column value.
    Contains(char),
    /// Bare initial consonant: the syllable at `position` (1-based) falls in
    /// [low, high).
    InitialRange {
        position: usize,
        low: char,
        high: char,
    },
}

/// One term per character of `word`, in order. An empty word produces no
/// terms, which renders as a match-everything predicate.
pub fn build_search_terms(word: &str) -> Vec<SearchTerm> {
    word.chars()
        .enumerate()
        .map(|(i, c)| match choseong_range(c) {
            Some((low, high)) => SearchTerm::InitialRange {
                position: i + 1,
                low,
                high,
            },
            None => SearchTerm::Contains(c),
        })
        .collect()
}

/// Renders the terms as an AND-joined predicate on `column`. Every
/// user-supplied value is bound as a parameter; only the column name and the
/// term position (both produced here, never by the caller) are interpolated.
pub fn push_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    column: SearchColumn,
    terms: &[SearchTerm],
) {
    if terms.is_empty() {
        builder.push("TRUE");
        return;
    }

    let col = column.as_sql();
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        match term {
            SearchTerm::Contains(c) => {
                builder.push(col);
                builder.push(" LIKE ");
                builder.push_bind(format!("%{}%", escape_like(*c)));
            }
            SearchTerm::InitialRange { position, low, high } => {
                builder.push(format!("SUBSTR({col}, {position}, 1) >= "));
                builder.push_bind(low.to_string());
                builder.push(format!(" AND SUBSTR({col}, {position}, 1) < "));
                builder.push_bind(high.to_string());
            }
        }
    }
}

/// LIKE treats %, _ and \ specially even when bound as a parameter.
fn escape_like(c: char) -> String {
    match c {
        '%' | '_' | '\\' => format!("\\{c}"),
        _ => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(column: SearchColumn, word: &str) -> String {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_predicate(&mut builder, column, &build_search_terms(word));
        builder.into_sql()
    }

    #[test]
    fn table_covers_all_19_consonants_contiguously() {
        assert_eq!(CHOSEONG_RANGES.len(), 19);
        for window in CHOSEONG_RANGES.windows(2) {
            let (_, _, high) = window[0];
            let (_, next_low, _) = window[1];
            assert_eq!(high, next_low);
        }
        for (consonant, low, high) in CHOSEONG_RANGES {
            assert!(low < high, "empty range for {consonant}");
        }
        assert_eq!(choseong_range('ㅎ'), Some(('하', '힣')));
    }

    #[test]
    fn recognizes_bare_consonants_only() {
        assert!(is_choseong('ㄱ'));
        assert!(is_choseong('ㅆ'));
        assert!(!is_choseong('가'));
        assert!(!is_choseong('s'));
        assert!(!is_choseong('3'));
    }

    #[test]
    fn plain_characters_become_contains_terms() {
        let terms = build_search_terms("삼성");
        assert_eq!(
            terms,
            vec![SearchTerm::Contains('삼'), SearchTerm::Contains('성')]
        );
    }

    #[test]
    fn consonants_become_positional_ranges() {
        let terms = build_search_terms("ㄱㅈ");
        assert_eq!(
            terms,
            vec![
                SearchTerm::InitialRange { position: 1, low: '가', high: '까' },
                SearchTerm::InitialRange { position: 2, low: '자', high: '짜' },
            ]
        );
    }

    #[test]
    fn mixed_word_keeps_character_order() {
        let terms = build_search_terms("삼ㅈ");
        assert_eq!(
            terms,
            vec![
                SearchTerm::Contains('삼'),
                SearchTerm::InitialRange { position: 2, low: '자', high: '짜' },
            ]
        );
    }

    #[test]
    fn single_consonant_renders_one_range_clause() {
        let sql = render(SearchColumn::Name, "ㄱ");
        assert_eq!(sql, "SUBSTR(name, 1, 1) >= $1 AND SUBSTR(name, 1, 1) < $2");
    }

    #[test]
    fn clauses_join_with_and_without_trailing_joiner() {
        let sql = render(SearchColumn::Name, "삼ㅈ");
        assert_eq!(
            sql,
            "name LIKE $1 AND SUBSTR(name, 2, 1) >= $2 AND SUBSTR(name, 2, 1) < $3"
        );
        assert!(!sql.ends_with("AND "));
    }

    #[test]
    fn column_choice_is_reflected_in_sql() {
        let sql = render(SearchColumn::Code, "0ㄱ");
        assert_eq!(
            sql,
            "code LIKE $1 AND SUBSTR(code, 2, 1) >= $2 AND SUBSTR(code, 2, 1) < $3"
        );
    }

    #[test]
    fn empty_word_matches_everything() {
        assert_eq!(render(SearchColumn::Name, ""), "TRUE");
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render(SearchColumn::Name, "ㄱㅈ"), render(SearchColumn::Name, "ㄱㅈ"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like('%'), "\\%");
        assert_eq!(escape_like('_'), "\\_");
        assert_eq!(escape_like('\\'), "\\\\");
        assert_eq!(escape_like('삼'), "삼");
    }

    #[test]
    fn unknown_column_names_are_rejected() {
        assert_eq!(SearchColumn::parse("name"), Some(SearchColumn::Name));
        assert_eq!(SearchColumn::parse("code"), Some(SearchColumn::Code));
        assert_eq!(SearchColumn::parse("register_date"), None);
        assert_eq!(SearchColumn::parse("name; DROP TABLE snapshots"), None);
    }
}
