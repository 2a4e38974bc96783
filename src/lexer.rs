use std::sync::Arc;

use thiserror::Error;

use crate::token::{Loc, Token, TokenKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("{file}:{line}: unterminated string literal")]
    UnterminatedString { file: String, line: u32 },
    #[error("{file}:{line}: unknown string escape ':{escape}'")]
    UnknownEscape {
        escape: char,
        file: String,
        line: u32,
    },
    #[error("{file}:{line}: integer literal '{literal}' out of range")]
    IntegerOverflow {
        literal: String,
        file: String,
        line: u32,
    },
    #[error("{file}:{line}: malformed number '{literal}'")]
    MalformedNumber {
        literal: String,
        file: String,
        line: u32,
    },
    #[error("{file}:{line}: unexpected character '{character}'")]
    UnexpectedCharacter {
        character: char,
        file: String,
        line: u32,
    },
    #[error("{file}:{line}: OBTW comment never closed by TLDR")]
    UnterminatedComment { file: String, line: u32 },
}

pub type LexResult<T> = Result<T, LexError>;

/// Keyword phrases ordered longest-first so that compound phrases win over
/// their prefixes (`R NOOB` over `R`, `ITZ LIEK A` over `ITZ A` over `ITZ`,
/// `AN YR` over `AN`). The scanner consumes as many words as the first
/// matching entry covers.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("IF U SAY SO", TokenKind::IfUSaySo),
    ("ITZ LIEK A", TokenKind::ItzLiekA),
    ("IS NOW A", TokenKind::IsNowA),
    ("IM OUTTA YR", TokenKind::ImOuttaYr),
    ("O HAI IM", TokenKind::OHaiIm),
    ("IM IN YR", TokenKind::ImInYr),
    ("QUOSHUNT OF", TokenKind::QuoshuntOf),
    ("PRODUKT OF", TokenKind::ProduktOf),
    ("BOTH SAEM", TokenKind::BothSaem),
    ("EITHER OF", TokenKind::EitherOf),
    ("SMALLR OF", TokenKind::SmallrOf),
    ("BIGGR OF", TokenKind::BiggrOf),
    ("FOUND YR", TokenKind::FoundYr),
    ("SUM OF", TokenKind::SumOf),
    ("DIFF OF", TokenKind::DiffOf),
    ("MOD OF", TokenKind::ModOf),
    ("BOTH OF", TokenKind::BothOf),
    ("WON OF", TokenKind::WonOf),
    ("ALL OF", TokenKind::AllOf),
    ("ANY OF", TokenKind::AnyOf),
    ("R NOOB", TokenKind::RNoob),
    ("ITZ A", TokenKind::ItzA),
    ("HAS A", TokenKind::HasA),
    ("AN YR", TokenKind::AnYr),
    ("O RLY?", TokenKind::ORly),
    ("YA RLY", TokenKind::YaRly),
    ("NO WAI", TokenKind::NoWai),
    ("IM LIEK", TokenKind::ImLiek),
    ("HOW IZ", TokenKind::HowIz),
    ("HAI", TokenKind::Hai),
    ("KTHXBYE", TokenKind::Kthxbye),
    ("KTHX", TokenKind::Kthx),
    ("IT", TokenKind::It),
    ("NOOB", TokenKind::NoobType),
    ("TROOF", TokenKind::TroofType),
    ("NUMBR", TokenKind::NumbrType),
    ("NUMBAR", TokenKind::NumbarType),
    ("YARN", TokenKind::YarnType),
    ("BUKKIT", TokenKind::BukkitType),
    ("ITZ", TokenKind::Itz),
    ("R", TokenKind::R),
    ("AN", TokenKind::An),
    ("NOT", TokenKind::Not),
    ("DIFFRINT", TokenKind::Diffrint),
    ("MKAY", TokenKind::Mkay),
    ("MAEK", TokenKind::Maek),
    ("A", TokenKind::A),
    ("VISIBLE", TokenKind::Visible),
    ("SMOOSH", TokenKind::Smoosh),
    ("GIMMEH", TokenKind::Gimmeh),
    ("MEBBE", TokenKind::Mebbe),
    ("OIC", TokenKind::Oic),
    ("WTF?", TokenKind::Wtf),
    ("OMGWTF", TokenKind::Omgwtf),
    ("OMG", TokenKind::Omg),
    ("GTFO", TokenKind::Gtfo),
    ("UPPIN", TokenKind::Uppin),
    ("NERFIN", TokenKind::Nerfin),
    ("YR", TokenKind::Yr),
    ("TIL", TokenKind::Til),
    ("WILE", TokenKind::Wile),
    ("IZ", TokenKind::Iz),
    ("SRS", TokenKind::Srs),
    ("!", TokenKind::Bang),
    ("'Z", TokenKind::ApostropheZ),
];

/// A whitespace-delimited unit of source, before keyword classification.
#[derive(Debug, PartialEq)]
enum Lexeme {
    /// A bare word: keyword fragment, identifier, or numeral.
    Word(String),
    /// A string literal with escapes already resolved.
    Str(String),
    /// A logical line break: physical newline or `,` soft break.
    Break,
}

pub struct Lexer<'a> {
    input: &'a str,
    file: Arc<str>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, file: &str) -> Self {
        Self {
            input,
            file: Arc::from(file),
        }
    }

    fn err_file(&self) -> String {
        self.file.to_string()
    }

    /// Phase 1: split the source into lexemes, resolving strings, comments,
    /// `…`/`...` continuations, and `,` soft breaks.
    fn lexemes(&self) -> LexResult<Vec<(Lexeme, u32)>> {
        let mut out: Vec<(Lexeme, u32)> = Vec::new();
        let mut in_comment_since: Option<u32> = None;
        let mut continuation = false;

        for (index, raw_line) in self.input.lines().enumerate() {
            let line = index as u32 + 1;
            let mut chars = raw_line.chars().peekable();
            continuation = false;

            while let Some(&c) = chars.peek() {
                if in_comment_since.is_some() {
                    // Inside OBTW .. TLDR everything is discarded word-wise.
                    if c.is_whitespace() {
                        chars.next();
                        continue;
                    }
                    let word = read_word_chars(&mut chars);
                    if word.is_empty() {
                        chars.next();
                    } else if word == "TLDR" {
                        in_comment_since = None;
                    }
                    continue;
                }

                match c {
                    ' ' | '\t' => {
                        chars.next();
                    }
                    '"' => {
                        chars.next();
                        let text = self.read_string(&mut chars, line)?;
                        out.push((Lexeme::Str(text), line));
                    }
                    ',' => {
                        chars.next();
                        out.push((Lexeme::Break, line));
                    }
                    '!' => {
                        chars.next();
                        out.push((Lexeme::Word("!".to_string()), line));
                    }
                    '\'' => {
                        chars.next();
                        if chars.peek() == Some(&'Z') {
                            chars.next();
                            out.push((Lexeme::Word("'Z".to_string()), line));
                        } else {
                            return Err(LexError::UnexpectedCharacter {
                                character: '\'',
                                file: self.err_file(),
                                line,
                            });
                        }
                    }
                    '\u{2026}' => {
                        chars.next();
                        continuation = true;
                    }
                    '.' => {
                        chars.next();
                        if chars.next() == Some('.') && chars.next() == Some('.') {
                            continuation = true;
                        } else {
                            return Err(LexError::UnexpectedCharacter {
                                character: '.',
                                file: self.err_file(),
                                line,
                            });
                        }
                    }
                    c if c == '-' || c.is_ascii_digit() || c.is_alphabetic() || c == '_' => {
                        let word = read_word_chars(&mut chars);
                        match word.as_str() {
                            "BTW" => {
                                // Line comment: drop the rest of the line.
                                break;
                            }
                            "OBTW" => {
                                in_comment_since = Some(line);
                            }
                            _ => out.push((Lexeme::Word(word), line)),
                        }
                    }
                    other => {
                        return Err(LexError::UnexpectedCharacter {
                            character: other,
                            file: self.err_file(),
                            line,
                        });
                    }
                }
            }

            // A line ending in a continuation mark keeps its logical line
            // open; the break is emitted when the continued line ends.
            if !continuation {
                out.push((Lexeme::Break, line));
            }
        }

        if let Some(line) = in_comment_since {
            return Err(LexError::UnterminatedComment {
                file: self.err_file(),
                line,
            });
        }

        Ok(out)
    }

    fn read_string(
        &self,
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        line: u32,
    ) -> LexResult<String> {
        let mut text = String::new();
        loop {
            match chars.next() {
                Some('"') => return Ok(text),
                Some(':') => match chars.next() {
                    Some(')') => text.push('\n'),
                    Some('>') => text.push('\t'),
                    Some('o') => text.push('\u{7}'),
                    Some('"') => text.push('"'),
                    Some(':') => text.push(':'),
                    Some(other) => {
                        return Err(LexError::UnknownEscape {
                            escape: other,
                            file: self.err_file(),
                            line,
                        });
                    }
                    None => {
                        return Err(LexError::UnterminatedString {
                            file: self.err_file(),
                            line,
                        });
                    }
                },
                Some(other) => text.push(other),
                None => {
                    return Err(LexError::UnterminatedString {
                        file: self.err_file(),
                        line,
                    });
                }
            }
        }
    }

    /// Phase 2: classify lexemes into tokens. Keyword phrases are matched
    /// against runs of consecutive words, longest entry first.
    fn classify(&self, lexemes: &[(Lexeme, u32)]) -> LexResult<Vec<Token>> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut i = 0;

        while i < lexemes.len() {
            let (lexeme, line) = &lexemes[i];
            let loc = Loc::new(Arc::clone(&self.file), *line);
            match lexeme {
                Lexeme::Break => {
                    // Blank lines and doubled separators collapse to one
                    // NEWLINE; a leading break is dropped entirely.
                    if matches!(
                        tokens.last(),
                        Some(Token {
                            kind: TokenKind::Newline,
                            ..
                        })
                    ) || tokens.is_empty()
                    {
                        i += 1;
                        continue;
                    }
                    tokens.push(Token::new(TokenKind::Newline, loc));
                    i += 1;
                }
                Lexeme::Str(text) => {
                    tokens.push(Token::new(TokenKind::Yarn(text.clone()), loc));
                    i += 1;
                }
                Lexeme::Word(_) => {
                    let words: Vec<&str> = lexemes[i..]
                        .iter()
                        .map_while(|(lexeme, _)| match lexeme {
                            Lexeme::Word(word) => Some(word.as_str()),
                            _ => None,
                        })
                        .collect();
                    if let Some((kind, consumed)) = match_keyword(&words) {
                        tokens.push(Token::new(kind, loc));
                        i += consumed;
                    } else {
                        tokens.push(Token::new(self.classify_word(words[0], *line)?, loc));
                        i += 1;
                    }
                }
            }
        }

        let eof_loc = Loc::new(
            Arc::clone(&self.file),
            lexemes.last().map(|(_, line)| *line).unwrap_or(1),
        );
        if !matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::Newline,
                ..
            })
        ) && !tokens.is_empty()
        {
            tokens.push(Token::new(TokenKind::Newline, eof_loc.clone()));
        }
        tokens.push(Token::new(TokenKind::Eof, eof_loc));
        Ok(tokens)
    }

    fn classify_word(&self, word: &str, line: u32) -> LexResult<TokenKind> {
        match word {
            "WIN" => return Ok(TokenKind::Troof(true)),
            "FAIL" => return Ok(TokenKind::Troof(false)),
            _ => {}
        }

        let leading = word.chars().next().unwrap_or('\0');
        let negative_numeral =
            leading == '-' && word[1..].chars().next().is_some_and(|c| c.is_ascii_digit());
        if leading.is_ascii_digit() || negative_numeral {
            if word.contains('.') {
                return word.parse::<f32>().map(TokenKind::Numbar).map_err(|_| {
                    LexError::MalformedNumber {
                        literal: word.to_string(),
                        file: self.err_file(),
                        line,
                    }
                });
            }
            return word.parse::<i64>().map(TokenKind::Numbr).map_err(|_| {
                LexError::IntegerOverflow {
                    literal: word.to_string(),
                    file: self.err_file(),
                    line,
                }
            });
        }

        if leading.is_alphabetic() || leading == '_' {
            return Ok(TokenKind::Identifier(word.to_string()));
        }

        Err(LexError::UnexpectedCharacter {
            character: leading,
            file: self.err_file(),
            line,
        })
    }
}

fn read_word_chars(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut word = String::new();
    if chars.peek() == Some(&'-') {
        word.push('-');
        chars.next();
    }
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '_' || (c == '.' && word.chars().all(is_numeric_part)) {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }
    // '?' terminates the RLY?/WTF? keyword words.
    if chars.peek() == Some(&'?') {
        word.push('?');
        chars.next();
    }
    word
}

fn is_numeric_part(c: char) -> bool {
    c.is_ascii_digit() || c == '-' || c == '.'
}

fn match_keyword(words: &[&str]) -> Option<(TokenKind, usize)> {
    for (phrase, kind) in KEYWORDS {
        let len = phrase.split(' ').count();
        if words.len() >= len
            && phrase
                .split(' ')
                .zip(words)
                .all(|(part, word)| part == *word)
        {
            return Some((kind.clone(), len));
        }
    }
    None
}

pub fn tokenize(input: &str, file: &str) -> LexResult<Vec<Token>> {
    let lexer = Lexer::new(input, file);
    let lexemes = lexer.lexemes()?;
    lexer.classify(&lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, "test.lol")
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenizes_minimal_program() {
        let input = indoc! {r#"
            HAI 1.2
            KTHXBYE
        "#};
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Hai,
                TokenKind::Numbar(1.2),
                TokenKind::Newline,
                TokenKind::Kthxbye,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn compound_keywords_win_over_prefixes() {
        assert_eq!(
            kinds("VAR R NOOB\n"),
            vec![
                TokenKind::Identifier("VAR".to_string()),
                TokenKind::RNoob,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("I HAS A X ITZ LIEK A Y\n"),
            vec![
                TokenKind::Identifier("I".to_string()),
                TokenKind::HasA,
                TokenKind::Identifier("X".to_string()),
                TokenKind::ItzLiekA,
                TokenKind::Identifier("Y".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("HOW IZ I SUM YR A AN YR B\n"),
            vec![
                TokenKind::HowIz,
                TokenKind::Identifier("I".to_string()),
                TokenKind::Identifier("SUM".to_string()),
                TokenKind::Yr,
                TokenKind::Identifier("A".to_string()),
                TokenKind::AnYr,
                TokenKind::Identifier("B".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn question_mark_keywords() {
        assert_eq!(
            kinds("O RLY?\nWTF?\n"),
            vec![
                TokenKind::ORly,
                TokenKind::Newline,
                TokenKind::Wtf,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn resolves_string_escapes() {
        assert_eq!(
            kinds("VISIBLE \"a:)b:>c:\"d:: e\"\n"),
            vec![
                TokenKind::Visible,
                TokenKind::Yarn("a\nb\tc\"d: e".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bang_splits_off_string() {
        assert_eq!(
            kinds("VISIBLE \"hi\"!\n"),
            vec![
                TokenKind::Visible,
                TokenKind::Yarn("hi".to_string()),
                TokenKind::Bang,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comma_is_a_soft_line_break() {
        assert_eq!(
            kinds("VISIBLE 1, VISIBLE 2\n"),
            vec![
                TokenKind::Visible,
                TokenKind::Numbr(1),
                TokenKind::Newline,
                TokenKind::Visible,
                TokenKind::Numbr(2),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn ellipsis_continues_the_logical_line() {
        let input = indoc! {r#"
            VISIBLE ...
            "joined"
        "#};
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Visible,
                TokenKind::Yarn("joined".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_stripped() {
        let input = indoc! {r#"
            VISIBLE 1 BTW ignored entirely
            OBTW this whole
            passage vanishes TLDR
            VISIBLE 2
        "#};
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Visible,
                TokenKind::Numbr(1),
                TokenKind::Newline,
                TokenKind::Visible,
                TokenKind::Numbr(2),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn blank_lines_collapse() {
        assert_eq!(
            kinds("VISIBLE 1\n\n\nVISIBLE 2\n"),
            vec![
                TokenKind::Visible,
                TokenKind::Numbr(1),
                TokenKind::Newline,
                TokenKind::Visible,
                TokenKind::Numbr(2),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn slot_access_lexes_as_apostrophe_z() {
        assert_eq!(
            kinds("BOX'Z SLOT\n"),
            vec![
                TokenKind::Identifier("BOX".to_string()),
                TokenKind::ApostropheZ,
                TokenKind::Identifier("SLOT".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn negative_and_float_literals() {
        assert_eq!(
            kinds("SUM OF -3 AN 1.5\n"),
            vec![
                TokenKind::SumOf,
                TokenKind::Numbr(-3),
                TokenKind::An,
                TokenKind::Numbar(1.5),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_line_numbers() {
        let tokens = tokenize("HAI 1.2\nVISIBLE 1\n", "test.lol").expect("tokenize");
        let lines: Vec<u32> = tokens.iter().map(|token| token.loc.line).collect();
        assert_eq!(lines, vec![1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(&*tokens[0].loc.file, "test.lol");
    }

    #[test]
    fn errors_on_unterminated_string() {
        let err = tokenize("VISIBLE \"abc\n", "test.lol").expect_err("expected failure");
        assert_eq!(
            err,
            LexError::UnterminatedString {
                file: "test.lol".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn errors_on_unknown_escape() {
        let err = tokenize("VISIBLE \"a:xb\"\n", "test.lol").expect_err("expected failure");
        assert_eq!(
            err,
            LexError::UnknownEscape {
                escape: 'x',
                file: "test.lol".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn errors_on_integer_overflow() {
        let err =
            tokenize("VISIBLE 99999999999999999999\n", "test.lol").expect_err("expected failure");
        assert!(matches!(err, LexError::IntegerOverflow { .. }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn errors_on_unclosed_block_comment() {
        let err = tokenize("OBTW never closed\n", "test.lol").expect_err("expected failure");
        assert_eq!(
            err,
            LexError::UnterminatedComment {
                file: "test.lol".to_string(),
                line: 1
            }
        );
    }
}
