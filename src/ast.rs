//! Parse-tree node types shared by the parser and the interpreter.
//!
//! Every node owns its children exclusively (`Box`/`Vec`, no sharing), so
//! dropping a `Program` releases the whole tree in one post-order pass.
//! The `Display` impls render canonical source: parsing the rendering of a
//! tree yields a structurally identical tree, which the parser tests lean on.

use std::fmt;

use crate::token::Loc;

/// Root of a parse. Created after `HAI <version> NEWLINE`, closed at
/// `KTHXBYE`/end of file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Lexeme text of the version token after `HAI`; never validated.
    pub version: String,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

/// The five castable types. `BUKKIT` is deliberately absent: arrays are
/// introduced by `O HAI IM` definitions, not by type annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Noob,
    Troof,
    Numbr,
    Numbar,
    Yarn,
}

impl TypeTag {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeTag::Noob => "NOOB",
            TypeTag::Troof => "TROOF",
            TypeTag::Numbr => "NUMBR",
            TypeTag::Numbar => "NUMBAR",
            TypeTag::Yarn => "YARN",
        }
    }
}

/// A literal value. `Noob` and `Bukkit` round out the kind set shared with
/// runtime values but have no literal spelling, so the parser never emits
/// them.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Numbr(i64),
    Numbar(f32),
    Troof(bool),
    Yarn(String),
    Noob,
    Bukkit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierKind {
    /// A plain name token.
    Direct(String),
    /// `SRS <expr>`: the expression evaluates to the name at runtime.
    Indirect(Box<Expr>),
}

/// A variable reference, possibly reaching into bukkit slots via a finite
/// `'Z` chain. Carries the file and line of its first token for
/// diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub slot: Option<Box<Identifier>>,
    pub loc: Loc,
}

impl Identifier {
    pub fn direct(name: impl Into<String>, loc: Loc) -> Self {
        Self {
            kind: IdentifierKind::Direct(name.into()),
            slot: None,
            loc,
        }
    }

    /// The spelled name of a direct identifier without slots; `None` for
    /// indirect or slotted forms, whose names only exist at runtime.
    pub fn literal_name(&self) -> Option<&str> {
        match (&self.kind, &self.slot) {
            (IdentifierKind::Direct(name), None) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Max,
    Min,
    And,
    Or,
    Xor,
    Not,
    Eq,
    Neq,
    AllOf,
    AnyOf,
    Smoosh,
}

impl OpKind {
    pub fn keyword(self) -> &'static str {
        match self {
            OpKind::Add => "SUM OF",
            OpKind::Sub => "DIFF OF",
            OpKind::Mul => "PRODUKT OF",
            OpKind::Div => "QUOSHUNT OF",
            OpKind::Mod => "MOD OF",
            OpKind::Max => "BIGGR OF",
            OpKind::Min => "SMALLR OF",
            OpKind::And => "BOTH OF",
            OpKind::Or => "EITHER OF",
            OpKind::Xor => "WON OF",
            OpKind::Not => "NOT",
            OpKind::Eq => "BOTH SAEM",
            OpKind::Neq => "DIFFRINT",
            OpKind::AllOf => "ALL OF",
            OpKind::AnyOf => "ANY OF",
            OpKind::Smoosh => "SMOOSH",
        }
    }

    /// N-ary operators take an open argument list closed by `MKAY`; the
    /// rest are fixed-arity and must not see one.
    pub fn is_nary(self) -> bool {
        matches!(self, OpKind::AllOf | OpKind::AnyOf | OpKind::Smoosh)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `MAEK <expr> A <type>`
    Cast { target: Box<Expr>, ty: TypeTag },
    Constant(Constant),
    Identifier(Identifier),
    /// `<scope> IZ <name> [YR <arg> (AN YR <arg>)*] MKAY`
    FuncCall {
        scope: Identifier,
        name: Identifier,
        args: Vec<Expr>,
    },
    /// Prefix operator application; `args` holds one, two, or many
    /// operands depending on `kind`.
    Op { kind: OpKind, args: Vec<Expr> },
    /// The implicit variable `IT`.
    It,
}

/// Declaration initializer. Exactly one form may appear; the enum makes a
/// combined initializer unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// `ITZ <expr>`
    Expr(Expr),
    /// `ITZ A <type>`
    Type(TypeTag),
    /// `ITZ LIEK A <parent>`
    Liek(Identifier),
}

/// One `MEBBE <guard>` arm of an if/then/else.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub guard: Expr,
    pub block: Block,
}

/// One `OMG <guard>` arm of a switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub guard: Expr,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `<target> IS NOW A <type>`
    Cast { target: Identifier, ty: TypeTag },
    /// `VISIBLE <expr>* [!]`; the bang suppresses the trailing newline.
    Print { args: Vec<Expr>, no_newline: bool },
    /// `GIMMEH <target>`
    Input { target: Identifier },
    /// `<target> R <expr>`
    Assignment { target: Identifier, expr: Expr },
    /// `<scope> HAS A <target> [ITZ ...]`
    Declaration {
        scope: Identifier,
        target: Identifier,
        init: Option<Init>,
    },
    /// `O RLY?` over the implicit variable, with `MEBBE` arms and an
    /// optional `NO WAI` branch.
    IfThenElse {
        yes: Block,
        else_ifs: Vec<ElseIf>,
        no: Option<Block>,
    },
    /// `WTF?` over the implicit variable.
    Switch {
        cases: Vec<SwitchCase>,
        default: Option<Block>,
    },
    /// `GTFO`
    Break,
    /// `FOUND YR <expr>`
    Return { value: Expr },
    /// `IM IN YR <name> ... IM OUTTA YR <name>`. `UPPIN`/`NERFIN`/custom
    /// update operators arrive desugared: `update` holds `SUM OF var AN 1`,
    /// `DIFF OF var AN 1`, or a one-argument call; a `TIL` guard arrives
    /// wrapped in `NOT`.
    Loop {
        name: Identifier,
        var: Option<Identifier>,
        guard: Option<Expr>,
        update: Option<Expr>,
        body: Block,
    },
    /// `<target> R NOOB`
    Deallocation { target: Identifier },
    /// `HOW IZ <scope> <name> [YR <arg> (AN YR <arg>)*] ... IF U SAY SO`
    FuncDef {
        scope: Identifier,
        name: Identifier,
        args: Vec<Identifier>,
        body: Block,
    },
    /// A bare expression; evaluating it stores the result in `IT`.
    Expr(Expr),
    /// `O HAI IM <name> [IM LIEK <parent>] ... KTHX`
    AltArrayDef {
        name: Identifier,
        parent: Option<Identifier>,
        body: Block,
    },
}

// ---------------------------------------------------------------------------
// Canonical source rendering
// ---------------------------------------------------------------------------

fn escape_yarn(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str(":)"),
            '\t' => out.push_str(":>"),
            '\u{7}' => out.push_str(":o"),
            '"' => out.push_str(":\""),
            ':' => out.push_str("::"),
            other => out.push(other),
        }
    }
    out
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HAI {}\n{}KTHXBYE\n", self.version, self.block)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            writeln!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Numbr(value) => write!(f, "{value}"),
            // Debug formatting keeps the decimal point on round values so
            // the lexeme reads back as a NUMBAR.
            Constant::Numbar(value) => write!(f, "{value:?}"),
            Constant::Troof(true) => f.write_str("WIN"),
            Constant::Troof(false) => f.write_str("FAIL"),
            Constant::Yarn(text) => write!(f, "\"{}\"", escape_yarn(text)),
            Constant::Noob => f.write_str("NOOB"),
            Constant::Bukkit => f.write_str("BUKKIT"),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IdentifierKind::Direct(name) => f.write_str(name)?,
            IdentifierKind::Indirect(expr) => write!(f, "SRS {expr}")?,
        }
        if let Some(slot) = &self.slot {
            write!(f, "'Z {slot}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Cast { target, ty } => write!(f, "MAEK {target} A {ty}"),
            Expr::Constant(constant) => write!(f, "{constant}"),
            Expr::Identifier(identifier) => write!(f, "{identifier}"),
            Expr::FuncCall { scope, name, args } => {
                write!(f, "{scope} IZ {name}")?;
                for (index, arg) in args.iter().enumerate() {
                    if index == 0 {
                        write!(f, " YR {arg}")?;
                    } else {
                        write!(f, " AN YR {arg}")?;
                    }
                }
                f.write_str(" MKAY")
            }
            Expr::Op { kind, args } => {
                f.write_str(kind.keyword())?;
                for (index, arg) in args.iter().enumerate() {
                    if index == 0 {
                        write!(f, " {arg}")?;
                    } else {
                        write!(f, " AN {arg}")?;
                    }
                }
                if kind.is_nary() {
                    f.write_str(" MKAY")?;
                }
                Ok(())
            }
            Expr::It => f.write_str("IT"),
        }
    }
}

impl Stmt {
    /// Renders the loop-update clause in its surface form, undoing the
    /// parse-time desugaring so the rendering re-parses to the same tree.
    fn fmt_loop_update(update: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match update {
            Expr::Op {
                kind: OpKind::Add,
                args,
            } if matches!(args.as_slice(), [Expr::Identifier(_), Expr::Constant(Constant::Numbr(1))]) => {
                write!(f, " UPPIN YR {}", &args[0])
            }
            Expr::Op {
                kind: OpKind::Sub,
                args,
            } if matches!(args.as_slice(), [Expr::Identifier(_), Expr::Constant(Constant::Numbr(1))]) => {
                write!(f, " NERFIN YR {}", &args[0])
            }
            Expr::FuncCall { name, args, .. } if args.len() == 1 => {
                write!(f, " {} YR {}", name, &args[0])
            }
            other => write!(f, " {other}"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Cast { target, ty } => write!(f, "{target} IS NOW A {ty}"),
            Stmt::Print { args, no_newline } => {
                f.write_str("VISIBLE")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                if *no_newline {
                    f.write_str(" !")?;
                }
                Ok(())
            }
            Stmt::Input { target } => write!(f, "GIMMEH {target}"),
            Stmt::Assignment { target, expr } => write!(f, "{target} R {expr}"),
            Stmt::Declaration {
                scope,
                target,
                init,
            } => {
                write!(f, "{scope} HAS A {target}")?;
                match init {
                    Some(Init::Expr(expr)) => write!(f, " ITZ {expr}"),
                    Some(Init::Type(ty)) => write!(f, " ITZ A {ty}"),
                    Some(Init::Liek(parent)) => write!(f, " ITZ LIEK A {parent}"),
                    None => Ok(()),
                }
            }
            Stmt::IfThenElse { yes, else_ifs, no } => {
                write!(f, "O RLY?\nYA RLY\n{yes}")?;
                for arm in else_ifs {
                    write!(f, "MEBBE {}\n{}", arm.guard, arm.block)?;
                }
                if let Some(no) = no {
                    write!(f, "NO WAI\n{no}")?;
                }
                f.write_str("OIC")
            }
            Stmt::Switch { cases, default } => {
                f.write_str("WTF?\n")?;
                for case in cases {
                    write!(f, "OMG {}\n{}", case.guard, case.block)?;
                }
                if let Some(default) = default {
                    write!(f, "OMGWTF\n{default}")?;
                }
                f.write_str("OIC")
            }
            Stmt::Break => f.write_str("GTFO"),
            Stmt::Return { value } => write!(f, "FOUND YR {value}"),
            Stmt::Loop {
                name,
                var: _,
                guard,
                update,
                body,
            } => {
                write!(f, "IM IN YR {name}")?;
                if let Some(update) = update {
                    Stmt::fmt_loop_update(update, f)?;
                }
                if let Some(guard) = guard {
                    write!(f, " WILE {guard}")?;
                }
                write!(f, "\n{body}IM OUTTA YR {name}")
            }
            Stmt::Deallocation { target } => write!(f, "{target} R NOOB"),
            Stmt::FuncDef {
                scope,
                name,
                args,
                body,
            } => {
                write!(f, "HOW IZ {scope} {name}")?;
                for (index, arg) in args.iter().enumerate() {
                    if index == 0 {
                        write!(f, " YR {arg}")?;
                    } else {
                        write!(f, " AN YR {arg}")?;
                    }
                }
                write!(f, "\n{body}IF U SAY SO")
            }
            Stmt::Expr(expr) => write!(f, "{expr}"),
            Stmt::AltArrayDef { name, parent, body } => {
                write!(f, "O HAI IM {name}")?;
                if let Some(parent) = parent {
                    write!(f, " IM LIEK {parent}")?;
                }
                write!(f, "\n{body}KTHX")
            }
        }
    }
}
