//! Recursive-descent parser over the scanner's token stream.
//!
//! Grammar choices are resolved by peeking at the current token (plus the
//! single `IZ` look-ahead for function calls); the cursor never retreats.
//! The first error aborts the parse: there is no recovery and no partial
//! tree.

use std::mem::discriminant;

use thiserror::Error;

use crate::ast::{
    Block, Constant, ElseIf, Expr, Identifier, IdentifierKind, Init, OpKind, Program, Stmt,
    SwitchCase, TypeTag,
};
use crate::token::{Loc, Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("{loc}: expected {expected} but got {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        loc: Loc,
    },
    #[error("{loc}: expected {expected} but got end of file")]
    UnexpectedEof { expected: String, loc: Loc },
    #[error("{loc}: loop closed as `IM OUTTA YR {found}` but opened as `IM IN YR {expected}`")]
    LoopNameMismatch {
        expected: String,
        found: String,
        loc: Loc,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, Loc::default()));
        }
        Self { tokens, pos: 0 }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// True iff the current token has the same kind as `kind`, payloads
    /// ignored. Does not advance.
    fn peek(&self, kind: &TokenKind) -> bool {
        discriminant(&self.current().kind) == discriminant(kind)
    }

    /// Consume and return the current token. Never advances past EOF.
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    /// Advance over the current token iff it matches `kind`.
    fn accept(&mut self, kind: &TokenKind) -> bool {
        if self.peek(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance over the current token or fail the parse with a diagnostic
    /// naming the expected kind and the actual token text.
    fn require(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.peek(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(kind.expected_text()))
        }
    }

    fn expected(&self, what: &str) -> ParseError {
        let token = self.current();
        if matches!(token.kind, TokenKind::Eof) {
            ParseError::UnexpectedEof {
                expected: what.to_string(),
                loc: token.loc.clone(),
            }
        } else {
            ParseError::UnexpectedToken {
                expected: what.to_string(),
                found: token.kind.text(),
                loc: token.loc.clone(),
            }
        }
    }

    // ------------------------------------------------------------------
    // Leaf parsers
    // ------------------------------------------------------------------

    fn parse_constant(&mut self) -> ParseResult<Constant> {
        let constant = match &self.current().kind {
            TokenKind::Numbr(value) => Constant::Numbr(*value),
            TokenKind::Numbar(value) => Constant::Numbar(*value),
            TokenKind::Troof(value) => Constant::Troof(*value),
            TokenKind::Yarn(value) => Constant::Yarn(value.clone()),
            _ => return Err(self.expected("a constant")),
        };
        self.advance();
        Ok(constant)
    }

    fn parse_type(&mut self) -> ParseResult<TypeTag> {
        let tag = match self.current().kind {
            TokenKind::NoobType => TypeTag::Noob,
            TokenKind::TroofType => TypeTag::Troof,
            TokenKind::NumbrType => TypeTag::Numbr,
            TokenKind::NumbarType => TypeTag::Numbar,
            TokenKind::YarnType => TypeTag::Yarn,
            _ => return Err(self.expected("a type")),
        };
        self.advance();
        Ok(tag)
    }

    /// Direct (`name`) or indirect (`SRS <expr>`) identifier, with any
    /// trailing `'Z` slot chain attached recursively.
    fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        let loc = self.current().loc.clone();
        let kind = match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                IdentifierKind::Direct(name)
            }
            TokenKind::Srs => {
                self.advance();
                IdentifierKind::Indirect(Box::new(self.parse_expr()?))
            }
            _ => return Err(self.expected("identifier")),
        };
        let slot = if self.accept(&TokenKind::ApostropheZ) {
            Some(Box::new(self.parse_identifier()?))
        } else {
            None
        };
        Ok(Identifier { kind, slot, loc })
    }

    // ------------------------------------------------------------------
    // Expression parser
    // ------------------------------------------------------------------

    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        match &self.current().kind {
            TokenKind::Maek => self.parse_cast_expr(),
            TokenKind::Numbr(_)
            | TokenKind::Numbar(_)
            | TokenKind::Troof(_)
            | TokenKind::Yarn(_) => Ok(Expr::Constant(self.parse_constant()?)),
            TokenKind::It => {
                self.advance();
                Ok(Expr::It)
            }
            TokenKind::Identifier(_) | TokenKind::Srs => {
                // One identifier of look-ahead decides call vs. plain
                // identifier; the cursor has already committed to it
                // either way.
                let identifier = self.parse_identifier()?;
                if self.peek(&TokenKind::Iz) {
                    self.parse_func_call(identifier)
                } else {
                    Ok(Expr::Identifier(identifier))
                }
            }
            TokenKind::SumOf
            | TokenKind::DiffOf
            | TokenKind::ProduktOf
            | TokenKind::QuoshuntOf
            | TokenKind::ModOf
            | TokenKind::BiggrOf
            | TokenKind::SmallrOf
            | TokenKind::BothOf
            | TokenKind::EitherOf
            | TokenKind::WonOf
            | TokenKind::BothSaem
            | TokenKind::Diffrint
            | TokenKind::Not
            | TokenKind::AllOf
            | TokenKind::AnyOf
            | TokenKind::Smoosh => self.parse_op_expr(),
            _ => Err(self.expected("expression")),
        }
    }

    fn parse_cast_expr(&mut self) -> ParseResult<Expr> {
        self.require(&TokenKind::Maek)?;
        let target = Box::new(self.parse_expr()?);
        self.require(&TokenKind::A)?;
        let ty = self.parse_type()?;
        Ok(Expr::Cast { target, ty })
    }

    /// `<scope> IZ <name> [YR <arg> (AN YR <arg>)*] MKAY`, with `scope`
    /// already parsed by the caller.
    fn parse_func_call(&mut self, scope: Identifier) -> ParseResult<Expr> {
        self.require(&TokenKind::Iz)?;
        let name = self.parse_identifier()?;
        let mut args = Vec::new();
        if self.accept(&TokenKind::Yr) {
            args.push(self.parse_expr()?);
            while self.accept(&TokenKind::AnYr) {
                args.push(self.parse_expr()?);
            }
        }
        self.require(&TokenKind::Mkay)?;
        Ok(Expr::FuncCall { scope, name, args })
    }

    fn parse_op_expr(&mut self) -> ParseResult<Expr> {
        let kind = match self.current().kind {
            TokenKind::SumOf => OpKind::Add,
            TokenKind::DiffOf => OpKind::Sub,
            TokenKind::ProduktOf => OpKind::Mul,
            TokenKind::QuoshuntOf => OpKind::Div,
            TokenKind::ModOf => OpKind::Mod,
            TokenKind::BiggrOf => OpKind::Max,
            TokenKind::SmallrOf => OpKind::Min,
            TokenKind::BothOf => OpKind::And,
            TokenKind::EitherOf => OpKind::Or,
            TokenKind::WonOf => OpKind::Xor,
            TokenKind::BothSaem => OpKind::Eq,
            TokenKind::Diffrint => OpKind::Neq,
            TokenKind::Not => OpKind::Not,
            TokenKind::AllOf => OpKind::AllOf,
            TokenKind::AnyOf => OpKind::AnyOf,
            TokenKind::Smoosh => OpKind::Smoosh,
            _ => return Err(self.expected("expression")),
        };
        self.advance();

        let mut args = Vec::new();
        if kind == OpKind::Not {
            args.push(self.parse_expr()?);
        } else if kind.is_nary() {
            // Open argument list: `MKAY` is mandatory, and a statement
            // boundary before it is an error.
            args.push(self.parse_expr()?);
            loop {
                if self.accept(&TokenKind::Mkay) {
                    break;
                }
                if self.peek(&TokenKind::Newline) || self.peek(&TokenKind::Eof) {
                    return Err(self.expected("MKAY"));
                }
                self.accept(&TokenKind::An);
                args.push(self.parse_expr()?);
            }
        } else {
            args.push(self.parse_expr()?);
            self.accept(&TokenKind::An);
            args.push(self.parse_expr()?);
        }
        Ok(Expr::Op { kind, args })
    }

    // ------------------------------------------------------------------
    // Statement parser
    // ------------------------------------------------------------------

    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match &self.current().kind {
            TokenKind::Identifier(_) | TokenKind::Srs => self.parse_identifier_led_stmt(),
            TokenKind::Visible => self.parse_print_stmt(),
            TokenKind::Gimmeh => self.parse_input_stmt(),
            TokenKind::ORly => self.parse_if_stmt(),
            TokenKind::Wtf => self.parse_switch_stmt(),
            TokenKind::Gtfo => {
                self.advance();
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Break)
            }
            TokenKind::FoundYr => {
                self.advance();
                let value = self.parse_expr()?;
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Return { value })
            }
            TokenKind::ImInYr => self.parse_loop_stmt(),
            TokenKind::HowIz => self.parse_func_def_stmt(),
            TokenKind::OHaiIm => self.parse_alt_array_def_stmt(),
            // Anything else is an expression statement (or a syntax error
            // that the expression parser will pin to the right token).
            _ => {
                let expr = self.parse_expr()?;
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Statements opening with an identifier share a parse prefix; the
    /// token after the identifier picks the variant.
    fn parse_identifier_led_stmt(&mut self) -> ParseResult<Stmt> {
        let identifier = self.parse_identifier()?;
        match self.current().kind {
            TokenKind::IsNowA => {
                self.advance();
                let ty = self.parse_type()?;
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Cast {
                    target: identifier,
                    ty,
                })
            }
            TokenKind::R => {
                self.advance();
                let expr = self.parse_expr()?;
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Assignment {
                    target: identifier,
                    expr,
                })
            }
            TokenKind::RNoob => {
                self.advance();
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Deallocation { target: identifier })
            }
            TokenKind::HasA => {
                self.advance();
                let target = self.parse_identifier()?;
                let init = self.parse_declaration_init()?;
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Declaration {
                    scope: identifier,
                    target,
                    init,
                })
            }
            TokenKind::Iz => {
                let call = self.parse_func_call(identifier)?;
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Expr(call))
            }
            _ => {
                self.require(&TokenKind::Newline)?;
                Ok(Stmt::Expr(Expr::Identifier(identifier)))
            }
        }
    }

    /// The three initializer forms arrive as distinct longest-match tokens,
    /// so a combined initializer cannot be formed.
    fn parse_declaration_init(&mut self) -> ParseResult<Option<Init>> {
        if self.accept(&TokenKind::Itz) {
            Ok(Some(Init::Expr(self.parse_expr()?)))
        } else if self.accept(&TokenKind::ItzA) {
            Ok(Some(Init::Type(self.parse_type()?)))
        } else if self.accept(&TokenKind::ItzLiekA) {
            Ok(Some(Init::Liek(self.parse_identifier()?)))
        } else {
            Ok(None)
        }
    }

    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        self.require(&TokenKind::Visible)?;
        let mut args = vec![self.parse_expr()?];
        while !self.peek(&TokenKind::Bang)
            && !self.peek(&TokenKind::Newline)
            && !self.peek(&TokenKind::Eof)
        {
            args.push(self.parse_expr()?);
        }
        let no_newline = self.accept(&TokenKind::Bang);
        self.require(&TokenKind::Newline)?;
        Ok(Stmt::Print { args, no_newline })
    }

    fn parse_input_stmt(&mut self) -> ParseResult<Stmt> {
        self.require(&TokenKind::Gimmeh)?;
        let target = self.parse_identifier()?;
        self.require(&TokenKind::Newline)?;
        Ok(Stmt::Input { target })
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.require(&TokenKind::ORly)?;
        self.require(&TokenKind::Newline)?;
        self.require(&TokenKind::YaRly)?;
        self.require(&TokenKind::Newline)?;
        let yes = self.parse_block()?;

        let mut else_ifs = Vec::new();
        while self.accept(&TokenKind::Mebbe) {
            let guard = self.parse_expr()?;
            self.require(&TokenKind::Newline)?;
            let block = self.parse_block()?;
            else_ifs.push(ElseIf { guard, block });
        }

        let no = if self.accept(&TokenKind::NoWai) {
            self.require(&TokenKind::Newline)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        self.require(&TokenKind::Oic)?;
        self.require(&TokenKind::Newline)?;
        Ok(Stmt::IfThenElse { yes, else_ifs, no })
    }

    fn parse_switch_stmt(&mut self) -> ParseResult<Stmt> {
        self.require(&TokenKind::Wtf)?;
        self.require(&TokenKind::Newline)?;

        // At least one OMG case.
        self.require(&TokenKind::Omg)?;
        let mut cases = Vec::new();
        loop {
            let guard = self.parse_expr()?;
            self.require(&TokenKind::Newline)?;
            let block = self.parse_block()?;
            cases.push(SwitchCase { guard, block });
            if !self.accept(&TokenKind::Omg) {
                break;
            }
        }

        let default = if self.accept(&TokenKind::Omgwtf) {
            self.require(&TokenKind::Newline)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        self.require(&TokenKind::Oic)?;
        self.require(&TokenKind::Newline)?;
        Ok(Stmt::Switch { cases, default })
    }

    fn parse_loop_stmt(&mut self) -> ParseResult<Stmt> {
        self.require(&TokenKind::ImInYr)?;
        let name = self.parse_identifier()?;

        // Optional update clause. UPPIN/NERFIN desugar to SUM OF/DIFF OF
        // with 1; any other identifier names a unary function, desugared
        // to a call (the evaluator checks that the function exists and
        // takes one argument).
        let mut var = None;
        let mut update = None;
        match self.current().kind {
            TokenKind::Uppin => {
                self.advance();
                self.require(&TokenKind::Yr)?;
                let target = self.parse_identifier()?;
                update = Some(step_expr(OpKind::Add, &target));
                var = Some(target);
            }
            TokenKind::Nerfin => {
                self.advance();
                self.require(&TokenKind::Yr)?;
                let target = self.parse_identifier()?;
                update = Some(step_expr(OpKind::Sub, &target));
                var = Some(target);
            }
            TokenKind::Identifier(_) | TokenKind::Srs => {
                let func = self.parse_identifier()?;
                self.require(&TokenKind::Yr)?;
                let target = self.parse_identifier()?;
                update = Some(Expr::FuncCall {
                    scope: Identifier::direct("I", func.loc.clone()),
                    name: func,
                    args: vec![Expr::Identifier(target.clone())],
                });
                var = Some(target);
            }
            _ => {}
        }

        // Optional guard: TIL loops until the guard holds, so it parses
        // to the negated WILE form.
        let guard = if self.accept(&TokenKind::Til) {
            Some(Expr::Op {
                kind: OpKind::Not,
                args: vec![self.parse_expr()?],
            })
        } else if self.accept(&TokenKind::Wile) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.require(&TokenKind::Newline)?;
        let body = self.parse_block()?;
        let closer = self.require(&TokenKind::ImOuttaYr)?;
        let close_name = self.parse_identifier()?;
        if name.to_string() != close_name.to_string() {
            return Err(ParseError::LoopNameMismatch {
                expected: name.to_string(),
                found: close_name.to_string(),
                loc: closer.loc,
            });
        }
        self.require(&TokenKind::Newline)?;

        Ok(Stmt::Loop {
            name,
            var,
            guard,
            update,
            body,
        })
    }

    fn parse_func_def_stmt(&mut self) -> ParseResult<Stmt> {
        self.require(&TokenKind::HowIz)?;
        let scope = self.parse_identifier()?;
        let name = self.parse_identifier()?;
        let mut args = Vec::new();
        if self.accept(&TokenKind::Yr) {
            args.push(self.parse_identifier()?);
            while self.accept(&TokenKind::AnYr) {
                args.push(self.parse_identifier()?);
            }
        }
        self.require(&TokenKind::Newline)?;
        let body = self.parse_block()?;
        self.require(&TokenKind::IfUSaySo)?;
        self.require(&TokenKind::Newline)?;
        Ok(Stmt::FuncDef {
            scope,
            name,
            args,
            body,
        })
    }

    fn parse_alt_array_def_stmt(&mut self) -> ParseResult<Stmt> {
        self.require(&TokenKind::OHaiIm)?;
        let name = self.parse_identifier()?;
        let parent = if self.accept(&TokenKind::ImLiek) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        self.require(&TokenKind::Newline)?;
        let body = self.parse_block()?;
        self.require(&TokenKind::Kthx)?;
        self.require(&TokenKind::Newline)?;
        Ok(Stmt::AltArrayDef { name, parent, body })
    }

    // ------------------------------------------------------------------
    // Blocks and program assembly
    // ------------------------------------------------------------------

    /// A block runs until the closing keyword of the enclosing construct
    /// (or EOF, which the construct's `require` then reports).
    fn parse_block(&mut self) -> ParseResult<Block> {
        let mut stmts = Vec::new();
        while !self.at_block_end() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Block::new(stmts))
    }

    fn at_block_end(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Eof
                | TokenKind::Kthxbye
                | TokenKind::Oic
                | TokenKind::Mebbe
                | TokenKind::NoWai
                | TokenKind::Omg
                | TokenKind::Omgwtf
                | TokenKind::ImOuttaYr
                | TokenKind::IfUSaySo
                | TokenKind::Kthx
        )
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        self.require(&TokenKind::Hai)?;
        let version = match self.current().kind {
            TokenKind::Numbar(_) | TokenKind::Numbr(_) | TokenKind::Identifier(_) => {
                self.advance().kind.text()
            }
            _ => return Err(self.expected("a version")),
        };
        self.require(&TokenKind::Newline)?;
        let block = self.parse_block()?;
        if self.accept(&TokenKind::Kthxbye) {
            self.require(&TokenKind::Newline)?;
        }
        self.require(&TokenKind::Eof)?;
        Ok(Program { version, block })
    }
}

fn step_expr(kind: OpKind, target: &Identifier) -> Expr {
    Expr::Op {
        kind,
        args: vec![
            Expr::Identifier(target.clone()),
            Expr::Constant(Constant::Numbr(1)),
        ],
    }
}

pub fn parse_tokens(tokens: Vec<Token>) -> ParseResult<Program> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::lexer::tokenize;

    fn tok(kind: TokenKind) -> Token {
        Token::new(kind, Loc::default())
    }

    fn tok_at(kind: TokenKind, line: u32) -> Token {
        Token::new(kind, Loc::new(Arc::from("test.lol"), line))
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    fn yarn(text: &str) -> TokenKind {
        TokenKind::Yarn(text.to_string())
    }

    fn parse_kinds(kinds: Vec<TokenKind>) -> ParseResult<Program> {
        parse_tokens(kinds.into_iter().map(tok).collect())
    }

    fn parse_source(source: &str) -> Program {
        let tokens = tokenize(source, "test.lol").expect("tokenize failed");
        parse_tokens(tokens).expect("parse failed")
    }

    fn banner(kinds: Vec<TokenKind>) -> Vec<TokenKind> {
        let mut all = vec![TokenKind::Hai, TokenKind::Numbar(1.2), TokenKind::Newline];
        all.extend(kinds);
        all.extend([TokenKind::Kthxbye, TokenKind::Newline, TokenKind::Eof]);
        all
    }

    fn direct(name: &str) -> Identifier {
        Identifier::direct(name, Loc::default())
    }

    #[test]
    fn minimal_program_has_empty_block() {
        let program = parse_kinds(banner(vec![])).expect("parse failed");
        assert_eq!(program.version, "1.2");
        assert_eq!(program.block, Block::default());
    }

    #[test]
    fn program_without_kthxbye_ends_at_eof() {
        let program = parse_kinds(vec![
            TokenKind::Hai,
            TokenKind::Numbar(1.2),
            TokenKind::Newline,
            TokenKind::Eof,
        ])
        .expect("parse failed");
        assert!(program.block.stmts.is_empty());
    }

    #[test]
    fn print_with_bang_suppresses_newline() {
        let program = parse_kinds(banner(vec![
            TokenKind::Visible,
            yarn("hi"),
            TokenKind::Bang,
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        assert_eq!(
            program.block.stmts,
            vec![Stmt::Print {
                args: vec![Expr::Constant(Constant::Yarn("hi".to_string()))],
                no_newline: true,
            }]
        );
    }

    #[test]
    fn print_collects_multiple_args() {
        let program = parse_kinds(banner(vec![
            TokenKind::Visible,
            yarn("x = "),
            ident("X"),
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        assert_eq!(
            program.block.stmts,
            vec![Stmt::Print {
                args: vec![
                    Expr::Constant(Constant::Yarn("x = ".to_string())),
                    Expr::Identifier(direct("X")),
                ],
                no_newline: false,
            }]
        );
    }

    #[test]
    fn declaration_with_expression_init() {
        let program = parse_kinds(banner(vec![
            ident("I"),
            TokenKind::HasA,
            ident("VAR"),
            TokenKind::Itz,
            TokenKind::Numbr(42),
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        assert_eq!(
            program.block.stmts,
            vec![Stmt::Declaration {
                scope: direct("I"),
                target: direct("VAR"),
                init: Some(Init::Expr(Expr::Constant(Constant::Numbr(42)))),
            }]
        );
    }

    #[test]
    fn declaration_init_forms() {
        let program = parse_source(
            "HAI 1.2\n\
             I HAS A X\n\
             I HAS A Y ITZ A NUMBR\n\
             I HAS A Z ITZ LIEK A Y\n\
             KTHXBYE\n",
        );
        let inits: Vec<_> = program
            .block
            .stmts
            .iter()
            .map(|stmt| match stmt {
                Stmt::Declaration { init, .. } => init.clone(),
                other => panic!("expected declaration, got {other:?}"),
            })
            .collect();
        assert_eq!(inits[0], None);
        assert_eq!(inits[1], Some(Init::Type(TypeTag::Numbr)));
        assert!(matches!(inits[2], Some(Init::Liek(_))));
    }

    #[test]
    fn if_then_else_with_elseif_and_no_branch() {
        let program = parse_source(
            "HAI 1.2\n\
             BOTH SAEM X AN 1\n\
             O RLY?\n\
             YA RLY\n\
             VISIBLE \"a\"\n\
             MEBBE BOTH SAEM X AN 2\n\
             VISIBLE \"b\"\n\
             NO WAI\n\
             VISIBLE \"c\"\n\
             OIC\n\
             KTHXBYE\n",
        );
        assert_eq!(program.block.stmts.len(), 2);
        assert!(matches!(
            program.block.stmts[0],
            Stmt::Expr(Expr::Op {
                kind: OpKind::Eq,
                ..
            })
        ));
        let Stmt::IfThenElse { yes, else_ifs, no } = &program.block.stmts[1] else {
            panic!("expected if/then/else, got {:?}", program.block.stmts[1]);
        };
        assert_eq!(yes.stmts.len(), 1);
        assert_eq!(else_ifs.len(), 1);
        assert!(matches!(
            else_ifs[0].guard,
            Expr::Op {
                kind: OpKind::Eq,
                ..
            }
        ));
        assert_eq!(else_ifs[0].block.stmts.len(), 1);
        assert_eq!(no.as_ref().map(|block| block.stmts.len()), Some(1));
    }

    #[test]
    fn switch_with_cases_and_default() {
        let program = parse_source(
            "HAI 1.2\n\
             WTF?\n\
             OMG 1\n\
             VISIBLE \"one\"\n\
             GTFO\n\
             OMG 2\n\
             VISIBLE \"two\"\n\
             OMGWTF\n\
             VISIBLE \"other\"\n\
             OIC\n\
             KTHXBYE\n",
        );
        let Stmt::Switch { cases, default } = &program.block.stmts[0] else {
            panic!("expected switch");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].block.stmts.len(), 2);
        assert_eq!(cases[0].block.stmts[1], Stmt::Break);
        assert_eq!(default.as_ref().map(|block| block.stmts.len()), Some(1));
    }

    #[test]
    fn switch_requires_at_least_one_case() {
        let err = parse_kinds(banner(vec![
            TokenKind::Wtf,
            TokenKind::Newline,
            TokenKind::Oic,
            TokenKind::Newline,
        ]))
        .expect_err("expected failure");
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
        assert!(err.to_string().contains("expected OMG"));
    }

    #[test]
    fn loop_desugars_uppin_and_til() {
        let program = parse_source(
            "HAI 1.2\n\
             IM IN YR LOOP UPPIN YR I TIL BOTH SAEM I AN 10\n\
             VISIBLE I\n\
             IM OUTTA YR LOOP\n\
             KTHXBYE\n",
        );
        let Stmt::Loop {
            name,
            var,
            guard,
            update,
            body,
        } = &program.block.stmts[0]
        else {
            panic!("expected loop");
        };
        assert_eq!(name.to_string(), "LOOP");
        assert_eq!(var.as_ref().map(|v| v.to_string()), Some("I".to_string()));
        assert!(matches!(
            guard,
            Some(Expr::Op {
                kind: OpKind::Not,
                ..
            })
        ));
        let Some(Expr::Op {
            kind: OpKind::Add,
            args,
        }) = update
        else {
            panic!("expected desugared SUM OF update, got {update:?}");
        };
        assert_eq!(args[1], Expr::Constant(Constant::Numbr(1)));
        assert_eq!(body.stmts.len(), 1);
    }

    #[test]
    fn loop_custom_update_op_becomes_call() {
        let program = parse_source(
            "HAI 1.2\n\
             IM IN YR LOOP TWICEIFY YR X WILE WIN\n\
             GTFO\n\
             IM OUTTA YR LOOP\n\
             KTHXBYE\n",
        );
        let Stmt::Loop { update, .. } = &program.block.stmts[0] else {
            panic!("expected loop");
        };
        let Some(Expr::FuncCall { name, args, .. }) = update else {
            panic!("expected desugared call, got {update:?}");
        };
        assert_eq!(name.to_string(), "TWICEIFY");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn bare_loop_without_update_or_guard() {
        let program = parse_source(
            "HAI 1.2\n\
             IM IN YR FOREVER\n\
             GTFO\n\
             IM OUTTA YR FOREVER\n\
             KTHXBYE\n",
        );
        let Stmt::Loop {
            var,
            guard,
            update,
            ..
        } = &program.block.stmts[0]
        else {
            panic!("expected loop");
        };
        assert_eq!(*var, None);
        assert_eq!(*guard, None);
        assert_eq!(*update, None);
    }

    #[test]
    fn loop_name_mismatch_cites_closer_line() {
        let err = parse_tokens(vec![
            tok_at(TokenKind::Hai, 1),
            tok_at(TokenKind::Numbar(1.2), 1),
            tok_at(TokenKind::Newline, 1),
            tok_at(TokenKind::ImInYr, 2),
            tok_at(ident("A"), 2),
            tok_at(TokenKind::Uppin, 2),
            tok_at(TokenKind::Yr, 2),
            tok_at(ident("I"), 2),
            tok_at(TokenKind::Til, 2),
            tok_at(TokenKind::BothSaem, 2),
            tok_at(ident("I"), 2),
            tok_at(TokenKind::An, 2),
            tok_at(TokenKind::Numbr(10), 2),
            tok_at(TokenKind::Newline, 2),
            tok_at(TokenKind::Visible, 3),
            tok_at(ident("I"), 3),
            tok_at(TokenKind::Newline, 3),
            tok_at(TokenKind::ImOuttaYr, 4),
            tok_at(ident("B"), 4),
            tok_at(TokenKind::Newline, 4),
            tok_at(TokenKind::Kthxbye, 5),
            tok_at(TokenKind::Newline, 5),
            tok_at(TokenKind::Eof, 5),
        ])
        .expect_err("expected failure");
        assert_eq!(
            err,
            ParseError::LoopNameMismatch {
                expected: "A".to_string(),
                found: "B".to_string(),
                loc: Loc::new(Arc::from("test.lol"), 4),
            }
        );
    }

    #[test]
    fn nary_operator_without_mkay_cites_newline() {
        let err = parse_tokens(vec![
            tok_at(TokenKind::Hai, 1),
            tok_at(TokenKind::Numbar(1.2), 1),
            tok_at(TokenKind::Newline, 1),
            tok_at(TokenKind::Visible, 2),
            tok_at(TokenKind::AllOf, 2),
            tok_at(TokenKind::Troof(true), 2),
            tok_at(TokenKind::An, 2),
            tok_at(TokenKind::Troof(true), 2),
            tok_at(TokenKind::Newline, 2),
            tok_at(TokenKind::Kthxbye, 3),
            tok_at(TokenKind::Newline, 3),
            tok_at(TokenKind::Eof, 3),
        ])
        .expect_err("expected failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "MKAY".to_string(),
                found: "NEWLINE".to_string(),
                loc: Loc::new(Arc::from("test.lol"), 2),
            }
        );
        assert_eq!(err.to_string(), "test.lol:2: expected MKAY but got NEWLINE");
    }

    #[test]
    fn binary_op_accepts_optional_an() {
        let with_an = parse_kinds(banner(vec![
            TokenKind::SumOf,
            TokenKind::Numbr(1),
            TokenKind::An,
            TokenKind::Numbr(2),
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        let without_an = parse_kinds(banner(vec![
            TokenKind::SumOf,
            TokenKind::Numbr(1),
            TokenKind::Numbr(2),
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        assert_eq!(with_an.block, without_an.block);
    }

    #[test]
    fn operators_nest() {
        let program = parse_kinds(banner(vec![
            TokenKind::SumOf,
            TokenKind::ProduktOf,
            TokenKind::Numbr(2),
            TokenKind::An,
            TokenKind::Numbr(3),
            TokenKind::An,
            TokenKind::Numbr(4),
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        let Stmt::Expr(Expr::Op {
            kind: OpKind::Add,
            args,
        }) = &program.block.stmts[0]
        else {
            panic!("expected SUM OF expression");
        };
        assert!(matches!(
            args[0],
            Expr::Op {
                kind: OpKind::Mul,
                ..
            }
        ));
        assert_eq!(args[1], Expr::Constant(Constant::Numbr(4)));
    }

    #[test]
    fn smoosh_consumes_until_mkay() {
        let program = parse_kinds(banner(vec![
            TokenKind::Smoosh,
            yarn("a"),
            yarn("b"),
            TokenKind::An,
            yarn("c"),
            TokenKind::Mkay,
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        let Stmt::Expr(Expr::Op {
            kind: OpKind::Smoosh,
            args,
        }) = &program.block.stmts[0]
        else {
            panic!("expected SMOOSH expression");
        };
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn function_call_disambiguates_from_identifier() {
        let program = parse_source(
            "HAI 1.2\n\
             I IZ DOUBLE YR 4 MKAY\n\
             X\n\
             KTHXBYE\n",
        );
        assert!(matches!(
            &program.block.stmts[0],
            Stmt::Expr(Expr::FuncCall { .. })
        ));
        assert!(matches!(
            &program.block.stmts[1],
            Stmt::Expr(Expr::Identifier(_))
        ));
    }

    #[test]
    fn function_call_with_multiple_args() {
        let program = parse_kinds(banner(vec![
            ident("I"),
            TokenKind::Iz,
            ident("ADD"),
            TokenKind::Yr,
            TokenKind::Numbr(1),
            TokenKind::AnYr,
            TokenKind::Numbr(2),
            TokenKind::Mkay,
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        let Stmt::Expr(Expr::FuncCall { scope, name, args }) = &program.block.stmts[0] else {
            panic!("expected call");
        };
        assert_eq!(scope.to_string(), "I");
        assert_eq!(name.to_string(), "ADD");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn srs_identifier_wraps_expression() {
        let program = parse_kinds(banner(vec![
            TokenKind::Gimmeh,
            TokenKind::Srs,
            ident("NAME"),
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        let Stmt::Input { target } = &program.block.stmts[0] else {
            panic!("expected input statement");
        };
        assert!(matches!(target.kind, IdentifierKind::Indirect(_)));
        assert_eq!(target.loc.line, 0);
    }

    #[test]
    fn slot_chains_nest() {
        let program = parse_kinds(banner(vec![
            ident("A"),
            TokenKind::ApostropheZ,
            ident("B"),
            TokenKind::ApostropheZ,
            ident("C"),
            TokenKind::R,
            TokenKind::Numbr(1),
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        let Stmt::Assignment { target, .. } = &program.block.stmts[0] else {
            panic!("expected assignment");
        };
        let slot = target.slot.as_ref().expect("missing first slot");
        let inner = slot.slot.as_ref().expect("missing nested slot");
        assert_eq!(inner.to_string(), "C");
        assert_eq!(target.to_string(), "A'Z B'Z C");
    }

    #[test]
    fn deallocation_wins_over_assignment() {
        let program = parse_kinds(banner(vec![
            ident("X"),
            TokenKind::RNoob,
            TokenKind::Newline,
        ]))
        .expect("parse failed");
        assert_eq!(
            program.block.stmts,
            vec![Stmt::Deallocation {
                target: direct("X")
            }]
        );
    }

    #[test]
    fn cast_statement_and_expression() {
        let program = parse_source(
            "HAI 1.2\n\
             X IS NOW A TROOF\n\
             MAEK X A YARN\n\
             KTHXBYE\n",
        );
        assert!(matches!(
            program.block.stmts[0],
            Stmt::Cast {
                ty: TypeTag::Troof,
                ..
            }
        ));
        assert!(matches!(
            program.block.stmts[1],
            Stmt::Expr(Expr::Cast {
                ty: TypeTag::Yarn,
                ..
            })
        ));
    }

    #[test]
    fn function_definition_with_args_and_return() {
        let program = parse_source(
            "HAI 1.2\n\
             HOW IZ I ADD YR A AN YR B\n\
             FOUND YR SUM OF A AN B\n\
             IF U SAY SO\n\
             KTHXBYE\n",
        );
        let Stmt::FuncDef {
            scope,
            name,
            args,
            body,
        } = &program.block.stmts[0]
        else {
            panic!("expected function definition");
        };
        assert_eq!(scope.to_string(), "I");
        assert_eq!(name.to_string(), "ADD");
        assert_eq!(args.len(), 2);
        assert_eq!(body.stmts.len(), 1);
        assert!(matches!(body.stmts[0], Stmt::Return { .. }));
    }

    #[test]
    fn alt_array_definition_with_parent() {
        let program = parse_source(
            "HAI 1.2\n\
             O HAI IM CONFIG IM LIEK DEFAULTS\n\
             I HAS A DEPTH ITZ 1\n\
             KTHX\n\
             KTHXBYE\n",
        );
        let Stmt::AltArrayDef { name, parent, body } = &program.block.stmts[0] else {
            panic!("expected alternate array definition");
        };
        assert_eq!(name.to_string(), "CONFIG");
        assert_eq!(parent.as_ref().map(|p| p.to_string()), Some("DEFAULTS".to_string()));
        assert_eq!(body.stmts.len(), 1);
    }

    #[test]
    fn gimmeh_and_implicit_variable() {
        let program = parse_source(
            "HAI 1.2\n\
             GIMMEH NAME\n\
             IT\n\
             KTHXBYE\n",
        );
        assert!(matches!(program.block.stmts[0], Stmt::Input { .. }));
        assert_eq!(program.block.stmts[1], Stmt::Expr(Expr::It));
    }

    #[test]
    fn unclosed_block_reports_eof() {
        let err = parse_source_err(
            "HAI 1.2\n\
             O RLY?\n\
             YA RLY\n\
             VISIBLE 1\n",
        );
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
        assert_eq!(err.to_string(), "test.lol:4: expected OIC but got end of file");
    }

    #[test]
    fn missing_banner_is_rejected() {
        let err = parse_kinds(vec![
            TokenKind::Visible,
            TokenKind::Numbr(1),
            TokenKind::Newline,
            TokenKind::Eof,
        ])
        .expect_err("expected failure");
        assert!(err.to_string().contains("expected HAI"));
    }

    #[test]
    fn error_message_carries_file_and_line() {
        let tokens = tokenize("HAI 1.2\nGIMMEH 5\n", "oops.lol").expect("tokenize failed");
        let err = parse_tokens(tokens).expect_err("expected failure");
        assert_eq!(err.to_string(), "oops.lol:2: expected identifier but got 5");
    }

    #[test]
    fn identifiers_record_source_lines() {
        let tokens = tokenize(
            "HAI 1.2\nI HAS A X\nX R 1\nKTHXBYE\n",
            "lines.lol",
        )
        .expect("tokenize failed");
        let program = parse_tokens(tokens).expect("parse failed");
        let Stmt::Declaration { scope, target, .. } = &program.block.stmts[0] else {
            panic!("expected declaration");
        };
        assert_eq!(scope.loc.line, 2);
        assert_eq!(target.loc.line, 2);
        let Stmt::Assignment { target, .. } = &program.block.stmts[1] else {
            panic!("expected assignment");
        };
        assert_eq!(target.loc.line, 3);
        assert_eq!(&*target.loc.file, "lines.lol");
    }

    #[test]
    fn parsing_is_deterministic() {
        let tokens = tokenize(
            "HAI 1.2\nI HAS A X ITZ 1\nVISIBLE SUM OF X AN 2\nKTHXBYE\n",
            "test.lol",
        )
        .expect("tokenize failed");
        let first = parse_tokens(tokens.clone()).expect("parse failed");
        let second = parse_tokens(tokens).expect("parse failed");
        assert_eq!(first, second);
    }

    fn parse_source_err(source: &str) -> ParseError {
        let tokens = tokenize(source, "test.lol").expect("tokenize failed");
        parse_tokens(tokens).expect_err("expected parse failure")
    }

    fn assert_round_trip(source: &str) {
        let program = parse_source(source);
        let canonical = program.to_string();
        let reparsed = parse_source(&canonical);
        assert_eq!(
            reparsed.to_string(),
            canonical,
            "canonical rendering did not survive a re-parse"
        );
    }

    #[test]
    fn round_trips_every_statement_variant() {
        assert_round_trip("HAI 1.2\nX IS NOW A TROOF\nKTHXBYE\n");
        assert_round_trip("HAI 1.2\nVISIBLE \"hi\" X !\nKTHXBYE\n");
        assert_round_trip("HAI 1.2\nGIMMEH X\nKTHXBYE\n");
        assert_round_trip("HAI 1.2\nX R SUM OF 1 AN 2.5\nKTHXBYE\n");
        assert_round_trip("HAI 1.2\nI HAS A X ITZ LIEK A Y\nKTHXBYE\n");
        assert_round_trip(
            "HAI 1.2\nO RLY?\nYA RLY\nVISIBLE 1\nMEBBE WIN\nVISIBLE 2\nNO WAI\nVISIBLE 3\nOIC\nKTHXBYE\n",
        );
        assert_round_trip("HAI 1.2\nWTF?\nOMG 1\nGTFO\nOMGWTF\nVISIBLE 0\nOIC\nKTHXBYE\n");
        assert_round_trip("HAI 1.2\nFOUND YR MAEK X A NUMBR\nKTHXBYE\n");
        assert_round_trip(
            "HAI 1.2\nIM IN YR LOOP UPPIN YR I TIL BOTH SAEM I AN 10\nVISIBLE I\nIM OUTTA YR LOOP\nKTHXBYE\n",
        );
        assert_round_trip(
            "HAI 1.2\nIM IN YR LOOP GROW YR X WILE WIN\nGTFO\nIM OUTTA YR LOOP\nKTHXBYE\n",
        );
        assert_round_trip("HAI 1.2\nX R NOOB\nKTHXBYE\n");
        assert_round_trip(
            "HAI 1.2\nHOW IZ I ADD YR A AN YR B\nFOUND YR SUM OF A AN B\nIF U SAY SO\nKTHXBYE\n",
        );
        assert_round_trip("HAI 1.2\nI IZ ADD YR 1 AN YR 2 MKAY\nKTHXBYE\n");
        assert_round_trip("HAI 1.2\nO HAI IM BOX IM LIEK CRATE\nI HAS A X ITZ 1\nKTHX\nKTHXBYE\n");
        assert_round_trip("HAI 1.2\nSRS NAME'Z SLOT R ALL OF WIN AN FAIL MKAY\nKTHXBYE\n");
    }
}
