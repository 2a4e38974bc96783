use std::fmt;
use std::sync::Arc;

/// Source position of a token: originating file name and 1-based line.
///
/// Statements never span physical lines (the scanner resolves `…`
/// continuations before tokens exist), so a line number is enough for
/// every diagnostic the frontend produces. The file name is shared, not
/// copied, across every token of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loc {
    pub file: Arc<str>,
    pub line: u32,
}

impl Loc {
    pub fn new(file: Arc<str>, line: u32) -> Self {
        Self { file, line }
    }
}

impl Default for Loc {
    fn default() -> Self {
        Self {
            file: Arc::from("<input>"),
            line: 0,
        }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Token classification produced by the scanner.
///
/// Multi-word keyword phrases (`R NOOB`, `ITZ LIEK A`, `IM OUTTA YR`, ...)
/// arrive as single tokens: the scanner matches phrases longest-first, so
/// the parser never re-merges `R` + `NOOB` or disambiguates `ITZ` prefixes
/// itself.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Numbr(i64),
    Numbar(f32),
    Yarn(String),
    Identifier(String),
    Troof(bool),

    // Structural
    Newline,
    Eof,

    // Program banner
    Hai,
    Kthxbye,

    // Implicit variable
    It,

    // Types
    NoobType,
    TroofType,
    NumbrType,
    NumbarType,
    YarnType,
    BukkitType,

    // Declarations and assignment
    HasA,
    Itz,
    ItzA,
    ItzLiekA,
    R,
    RNoob,

    // Operand separators
    An,
    AnYr,

    // Math operators
    SumOf,
    DiffOf,
    ProduktOf,
    QuoshuntOf,
    ModOf,
    BiggrOf,
    SmallrOf,

    // Boolean operators
    BothOf,
    EitherOf,
    WonOf,
    Not,
    AllOf,
    AnyOf,

    // Comparison operators
    BothSaem,
    Diffrint,

    // Casting
    Maek,
    A,
    IsNowA,

    // I/O
    Visible,
    Smoosh,
    Bang,
    Gimmeh,

    // Conditionals
    ORly,
    YaRly,
    Mebbe,
    NoWai,
    Oic,

    // Switch
    Wtf,
    Omg,
    Omgwtf,

    // Control flow
    Gtfo,
    FoundYr,

    // Loops
    ImInYr,
    Uppin,
    Nerfin,
    Yr,
    Til,
    Wile,
    ImOuttaYr,

    // Functions
    HowIz,
    Iz,
    IfUSaySo,
    Mkay,

    // Indirect identifiers and slots
    Srs,
    ApostropheZ,

    // Alternate array definition
    OHaiIm,
    ImLiek,
    Kthx,
}

impl TokenKind {
    /// The source text of this token, or a phrase describing it for the
    /// payload-carrying and structural kinds. Diagnostics use this verbatim.
    pub fn text(&self) -> String {
        match self {
            TokenKind::Numbr(value) => value.to_string(),
            TokenKind::Numbar(value) => value.to_string(),
            TokenKind::Yarn(value) => format!("\"{value}\""),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Troof(true) => "WIN".to_string(),
            TokenKind::Troof(false) => "FAIL".to_string(),
            other => other.phrase().to_string(),
        }
    }

    /// What a diagnostic calls this kind when it *expected* it: keywords by
    /// their spelling, literal kinds by their class.
    pub fn expected_text(&self) -> &'static str {
        self.phrase()
    }

    fn phrase(&self) -> &'static str {
        match self {
            TokenKind::Numbr(_) => "integer literal",
            TokenKind::Numbar(_) => "float literal",
            TokenKind::Yarn(_) => "string literal",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Troof(_) => "boolean literal",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Eof => "end of file",
            TokenKind::Hai => "HAI",
            TokenKind::Kthxbye => "KTHXBYE",
            TokenKind::It => "IT",
            TokenKind::NoobType => "NOOB",
            TokenKind::TroofType => "TROOF",
            TokenKind::NumbrType => "NUMBR",
            TokenKind::NumbarType => "NUMBAR",
            TokenKind::YarnType => "YARN",
            TokenKind::BukkitType => "BUKKIT",
            TokenKind::HasA => "HAS A",
            TokenKind::Itz => "ITZ",
            TokenKind::ItzA => "ITZ A",
            TokenKind::ItzLiekA => "ITZ LIEK A",
            TokenKind::R => "R",
            TokenKind::RNoob => "R NOOB",
            TokenKind::An => "AN",
            TokenKind::AnYr => "AN YR",
            TokenKind::SumOf => "SUM OF",
            TokenKind::DiffOf => "DIFF OF",
            TokenKind::ProduktOf => "PRODUKT OF",
            TokenKind::QuoshuntOf => "QUOSHUNT OF",
            TokenKind::ModOf => "MOD OF",
            TokenKind::BiggrOf => "BIGGR OF",
            TokenKind::SmallrOf => "SMALLR OF",
            TokenKind::BothOf => "BOTH OF",
            TokenKind::EitherOf => "EITHER OF",
            TokenKind::WonOf => "WON OF",
            TokenKind::Not => "NOT",
            TokenKind::AllOf => "ALL OF",
            TokenKind::AnyOf => "ANY OF",
            TokenKind::BothSaem => "BOTH SAEM",
            TokenKind::Diffrint => "DIFFRINT",
            TokenKind::Maek => "MAEK",
            TokenKind::A => "A",
            TokenKind::IsNowA => "IS NOW A",
            TokenKind::Visible => "VISIBLE",
            TokenKind::Smoosh => "SMOOSH",
            TokenKind::Bang => "!",
            TokenKind::Gimmeh => "GIMMEH",
            TokenKind::ORly => "O RLY?",
            TokenKind::YaRly => "YA RLY",
            TokenKind::Mebbe => "MEBBE",
            TokenKind::NoWai => "NO WAI",
            TokenKind::Oic => "OIC",
            TokenKind::Wtf => "WTF?",
            TokenKind::Omg => "OMG",
            TokenKind::Omgwtf => "OMGWTF",
            TokenKind::Gtfo => "GTFO",
            TokenKind::FoundYr => "FOUND YR",
            TokenKind::ImInYr => "IM IN YR",
            TokenKind::Uppin => "UPPIN",
            TokenKind::Nerfin => "NERFIN",
            TokenKind::Yr => "YR",
            TokenKind::Til => "TIL",
            TokenKind::Wile => "WILE",
            TokenKind::ImOuttaYr => "IM OUTTA YR",
            TokenKind::HowIz => "HOW IZ",
            TokenKind::Iz => "IZ",
            TokenKind::IfUSaySo => "IF U SAY SO",
            TokenKind::Mkay => "MKAY",
            TokenKind::Srs => "SRS",
            TokenKind::ApostropheZ => "'Z",
            TokenKind::OHaiIm => "O HAI IM",
            TokenKind::ImLiek => "IM LIEK",
            TokenKind::Kthx => "KTHX",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: Loc,
}

impl Token {
    pub fn new(kind: TokenKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}
