//! Tree-walking evaluator.
//!
//! Executes the parse tree directly: statements update a scope stack and the
//! implicit variable `IT`, expressions evaluate to `Value`s, and program
//! output is collected into a string the caller prints.

use std::collections::{HashMap, VecDeque};
use std::io::BufRead;
use std::rc::Rc;

use anyhow::Result;
use thiserror::Error;

use crate::ast::{
    Block, Constant, Expr, Identifier, IdentifierKind, Init, OpKind, Program, Stmt, SwitchCase,
    TypeTag,
};
use crate::token::Loc;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("{loc}: {name} has not been declared")]
    Undeclared { name: String, loc: Loc },
    #[error("{loc}: {name} has no slot {slot}")]
    MissingSlot {
        name: String,
        slot: String,
        loc: Loc,
    },
    #[error("{loc}: {name} is not a BUKKIT")]
    NotABukkit { name: String, loc: Loc },
    #[error("{loc}: {name} is not a FUNCSHUN")]
    NotAFunction { name: String, loc: Loc },
    #[error("{loc}: {name} takes {expected} arguments but got {received}")]
    WrongArity {
        name: String,
        expected: usize,
        received: usize,
        loc: Loc,
    },
    #[error("{loc}: function parameters must be plain names")]
    BadParameter { loc: Loc },
    #[error("{loc}: declaration target cannot have a 'Z slot")]
    SlottedDeclarationTarget { loc: Loc },
    #[error("cannot cast {from} to {to}")]
    BadCast { from: &'static str, to: String },
    #[error("expected a numeric value, got {found}")]
    NotNumeric { found: &'static str },
    #[error("division by zero")]
    DivisionByZero,
    #[error("GTFO outside a loop, switch, or function")]
    BreakOutsideConstruct,
    #[error("FOUND YR outside a function")]
    ReturnOutsideFunction,
}

type RunResult<T> = Result<T, RuntimeError>;

/// A user-defined function: parameter names plus the body to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    params: Vec<String>,
    body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Noob,
    Troof(bool),
    Numbr(i64),
    Numbar(f32),
    Yarn(String),
    Bukkit(HashMap<String, Value>),
    Funcshun(Rc<Function>),
}

/// Numeric view of a value for the math operators.
#[derive(Debug, Clone, Copy)]
enum Num {
    I(i64),
    F(f32),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Noob => "NOOB",
            Value::Troof(_) => "TROOF",
            Value::Numbr(_) => "NUMBR",
            Value::Numbar(_) => "NUMBAR",
            Value::Yarn(_) => "YARN",
            Value::Bukkit(_) => "BUKKIT",
            Value::Funcshun(_) => "FUNCSHUN",
        }
    }

    /// Truthiness, as used by guards and the boolean operators. Everything
    /// has one; empty and zero values are FAIL.
    fn as_troof(&self) -> bool {
        match self {
            Value::Noob => false,
            Value::Troof(value) => *value,
            Value::Numbr(value) => *value != 0,
            Value::Numbar(value) => *value != 0.0,
            Value::Yarn(value) => !value.is_empty(),
            Value::Bukkit(_) | Value::Funcshun(_) => true,
        }
    }

    fn as_num(&self) -> RunResult<Num> {
        match self {
            Value::Numbr(value) => Ok(Num::I(*value)),
            Value::Numbar(value) => Ok(Num::F(*value)),
            Value::Troof(value) => Ok(Num::I(i64::from(*value))),
            Value::Yarn(text) => {
                if let Ok(value) = text.parse::<i64>() {
                    Ok(Num::I(value))
                } else if let Ok(value) = text.parse::<f32>() {
                    Ok(Num::F(value))
                } else {
                    Err(RuntimeError::NotNumeric { found: "YARN" })
                }
            }
            other => Err(RuntimeError::NotNumeric {
                found: other.type_name(),
            }),
        }
    }

    /// Rendering used by VISIBLE and SMOOSH. NUMBARs keep two decimals.
    fn render(&self) -> RunResult<String> {
        match self {
            Value::Noob => Ok("NOOB".to_string()),
            Value::Troof(true) => Ok("WIN".to_string()),
            Value::Troof(false) => Ok("FAIL".to_string()),
            Value::Numbr(value) => Ok(value.to_string()),
            Value::Numbar(value) => Ok(format!("{value:.2}")),
            Value::Yarn(text) => Ok(text.clone()),
            other => Err(RuntimeError::BadCast {
                from: other.type_name(),
                to: "YARN".to_string(),
            }),
        }
    }

    /// Explicit `MAEK`/`IS NOW A` cast. NOOB casts to the target type's
    /// empty value; otherwise the usual coercions apply.
    fn cast_to(&self, ty: TypeTag) -> RunResult<Value> {
        match ty {
            TypeTag::Noob => Ok(Value::Noob),
            TypeTag::Troof => Ok(Value::Troof(self.as_troof())),
            TypeTag::Numbr => match self {
                Value::Noob => Ok(Value::Numbr(0)),
                other => match other.as_num() {
                    Ok(Num::I(value)) => Ok(Value::Numbr(value)),
                    Ok(Num::F(value)) => Ok(Value::Numbr(value as i64)),
                    Err(_) => Err(RuntimeError::BadCast {
                        from: other.type_name(),
                        to: "NUMBR".to_string(),
                    }),
                },
            },
            TypeTag::Numbar => match self {
                Value::Noob => Ok(Value::Numbar(0.0)),
                other => match other.as_num() {
                    Ok(Num::I(value)) => Ok(Value::Numbar(value as f32)),
                    Ok(Num::F(value)) => Ok(Value::Numbar(value)),
                    Err(_) => Err(RuntimeError::BadCast {
                        from: other.type_name(),
                        to: "NUMBAR".to_string(),
                    }),
                },
            },
            TypeTag::Yarn => match self {
                Value::Noob => Ok(Value::Yarn(String::new())),
                other => Ok(Value::Yarn(other.render()?)),
            },
        }
    }

    fn default_for(ty: TypeTag) -> Value {
        match ty {
            TypeTag::Noob => Value::Noob,
            TypeTag::Troof => Value::Troof(false),
            TypeTag::Numbr => Value::Numbr(0),
            TypeTag::Numbar => Value::Numbar(0.0),
            TypeTag::Yarn => Value::Yarn(String::new()),
        }
    }
}

/// Comparison without coercion, except NUMBR/NUMBAR which compare
/// numerically.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Numbr(int), Value::Numbar(float)) | (Value::Numbar(float), Value::Numbr(int)) => {
            *int as f32 == *float
        }
        _ => left == right,
    }
}

/// Outcome of executing a statement or block.
enum ExecResult {
    Continue,
    Break,
    Return(Value),
}

pub struct Interpreter {
    /// Scope stack; the first frame is the global scope, later frames are
    /// function calls and in-flight bukkit definitions.
    scopes: Vec<HashMap<String, Value>>,
    /// The implicit variable.
    it: Value,
    output: String,
    /// Injected GIMMEH lines; `None` falls back to stdin.
    input: Option<VecDeque<String>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            it: Value::Noob,
            output: String::new(),
            input: None,
        }
    }

    /// Run with canned GIMMEH input instead of stdin.
    pub fn with_input(lines: Vec<String>) -> Self {
        let mut interpreter = Self::new();
        interpreter.input = Some(lines.into());
        interpreter
    }

    pub fn run(&mut self, program: &Program) -> Result<String> {
        match self.exec_block(&program.block)? {
            ExecResult::Continue => Ok(std::mem::take(&mut self.output)),
            ExecResult::Break => Err(RuntimeError::BreakOutsideConstruct.into()),
            ExecResult::Return(_) => Err(RuntimeError::ReturnOutsideFunction.into()),
        }
    }

    // ------------------------------------------------------------------
    // Name resolution
    // ------------------------------------------------------------------

    /// Flattens an identifier into its chain of names, evaluating any
    /// `SRS` sub-expressions along the way.
    fn resolve_path(&mut self, identifier: &Identifier) -> RunResult<Vec<String>> {
        let mut path = Vec::new();
        let mut current = Some(identifier);
        while let Some(identifier) = current {
            let name = match &identifier.kind {
                IdentifierKind::Direct(name) => name.clone(),
                IdentifierKind::Indirect(expr) => {
                    let value = self.eval(expr)?;
                    value.render()?
                }
            };
            path.push(name);
            current = identifier.slot.as_deref();
        }
        Ok(path)
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }

    fn read(&mut self, identifier: &Identifier) -> RunResult<Value> {
        let path = self.resolve_path(identifier)?;
        let loc = &identifier.loc;
        let mut value = self
            .lookup(&path[0])
            .ok_or_else(|| RuntimeError::Undeclared {
                name: path[0].clone(),
                loc: loc.clone(),
            })?
            .clone();
        for (index, slot) in path[1..].iter().enumerate() {
            let Value::Bukkit(map) = value else {
                return Err(RuntimeError::NotABukkit {
                    name: path[index].clone(),
                    loc: loc.clone(),
                });
            };
            value = map
                .get(slot)
                .cloned()
                .ok_or_else(|| RuntimeError::MissingSlot {
                    name: path[index].clone(),
                    slot: slot.clone(),
                    loc: loc.clone(),
                })?;
        }
        Ok(value)
    }

    /// Mutable place named by a fully resolved path. Every segment must
    /// already be declared.
    fn place_mut(&mut self, path: &[String], loc: &Loc) -> RunResult<&mut Value> {
        let mut value = match self.lookup_mut(&path[0]) {
            Some(value) => value,
            None => {
                return Err(RuntimeError::Undeclared {
                    name: path[0].clone(),
                    loc: loc.clone(),
                });
            }
        };
        for (index, slot) in path[1..].iter().enumerate() {
            let Value::Bukkit(map) = value else {
                return Err(RuntimeError::NotABukkit {
                    name: path[index].clone(),
                    loc: loc.clone(),
                });
            };
            value = match map.get_mut(slot) {
                Some(value) => value,
                None => {
                    return Err(RuntimeError::MissingSlot {
                        name: path[index].clone(),
                        slot: slot.clone(),
                        loc: loc.clone(),
                    });
                }
            };
        }
        Ok(value)
    }

    fn assign(&mut self, identifier: &Identifier, value: Value) -> RunResult<()> {
        let path = self.resolve_path(identifier)?;
        let place = self.place_mut(&path, &identifier.loc)?;
        *place = value;
        Ok(())
    }

    /// Declares `name` in the scope an identifier names: `I` is the
    /// current scope, anything else must resolve to a bukkit.
    fn declare(&mut self, scope: &Identifier, name: String, value: Value) -> RunResult<()> {
        if scope.literal_name() == Some("I") {
            self.scopes
                .last_mut()
                .expect("scope stack is never empty")
                .insert(name, value);
            return Ok(());
        }
        let path = self.resolve_path(scope)?;
        let place = self.place_mut(&path, &scope.loc)?;
        let Value::Bukkit(map) = place else {
            return Err(RuntimeError::NotABukkit {
                name: path.last().cloned().unwrap_or_default(),
                loc: scope.loc.clone(),
            });
        };
        map.insert(name, value);
        Ok(())
    }

    fn target_name(&mut self, identifier: &Identifier) -> RunResult<String> {
        if identifier.slot.is_some() {
            return Err(RuntimeError::SlottedDeclarationTarget {
                loc: identifier.loc.clone(),
            });
        }
        match &identifier.kind {
            IdentifierKind::Direct(name) => Ok(name.clone()),
            IdentifierKind::Indirect(expr) => {
                let value = self.eval(expr)?;
                value.render()
            }
        }
    }

    // ------------------------------------------------------------------
    // Statement execution
    // ------------------------------------------------------------------

    fn exec_block(&mut self, block: &Block) -> RunResult<ExecResult> {
        for stmt in &block.stmts {
            match self.exec_stmt(stmt)? {
                ExecResult::Continue => {}
                other => return Ok(other),
            }
        }
        Ok(ExecResult::Continue)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> RunResult<ExecResult> {
        match stmt {
            Stmt::Cast { target, ty } => {
                let value = self.read(target)?.cast_to(*ty)?;
                self.assign(target, value)?;
            }
            Stmt::Print { args, no_newline } => {
                let mut line = String::new();
                for arg in args {
                    let value = self.eval(arg)?;
                    line.push_str(&value.render()?);
                }
                self.output.push_str(&line);
                if !no_newline {
                    self.output.push('\n');
                }
            }
            Stmt::Input { target } => {
                let line = self.read_input_line();
                self.assign(target, Value::Yarn(line))?;
            }
            Stmt::Assignment { target, expr } => {
                let value = self.eval(expr)?;
                self.assign(target, value)?;
            }
            Stmt::Declaration {
                scope,
                target,
                init,
            } => {
                let value = match init {
                    Some(Init::Expr(expr)) => self.eval(expr)?,
                    Some(Init::Type(ty)) => Value::default_for(*ty),
                    Some(Init::Liek(parent)) => {
                        let parent_value = self.read(parent)?;
                        let Value::Bukkit(_) = &parent_value else {
                            return Err(RuntimeError::NotABukkit {
                                name: parent.to_string(),
                                loc: parent.loc.clone(),
                            });
                        };
                        parent_value
                    }
                    None => Value::Noob,
                };
                let name = self.target_name(target)?;
                self.declare(scope, name, value)?;
            }
            Stmt::IfThenElse { yes, else_ifs, no } => {
                if self.it.as_troof() {
                    return self.exec_block(yes);
                }
                for arm in else_ifs {
                    if self.eval(&arm.guard)?.as_troof() {
                        return self.exec_block(&arm.block);
                    }
                }
                if let Some(no) = no {
                    return self.exec_block(no);
                }
            }
            Stmt::Switch { cases, default } => return self.exec_switch(cases, default.as_ref()),
            Stmt::Break => return Ok(ExecResult::Break),
            Stmt::Return { value } => {
                let value = self.eval(value)?;
                return Ok(ExecResult::Return(value));
            }
            Stmt::Loop {
                var,
                guard,
                update,
                body,
                ..
            } => return self.exec_loop(var.as_ref(), guard.as_ref(), update.as_ref(), body),
            Stmt::Deallocation { target } => {
                self.assign(target, Value::Noob)?;
            }
            Stmt::FuncDef {
                scope,
                name,
                args,
                body,
            } => {
                let params = args
                    .iter()
                    .map(|arg| {
                        arg.literal_name()
                            .map(str::to_string)
                            .ok_or(RuntimeError::BadParameter {
                                loc: arg.loc.clone(),
                            })
                    })
                    .collect::<RunResult<Vec<String>>>()?;
                let function = Value::Funcshun(Rc::new(Function {
                    params,
                    body: body.clone(),
                }));
                let name = self.target_name(name)?;
                self.declare(scope, name, function)?;
            }
            Stmt::Expr(expr) => {
                self.it = self.eval(expr)?;
            }
            Stmt::AltArrayDef { name, parent, body } => {
                let seed = match parent {
                    Some(parent) => {
                        let value = self.read(parent)?;
                        let Value::Bukkit(map) = value else {
                            return Err(RuntimeError::NotABukkit {
                                name: parent.to_string(),
                                loc: parent.loc.clone(),
                            });
                        };
                        map
                    }
                    None => HashMap::new(),
                };
                // The body runs in a fresh frame; whatever it declares
                // becomes the bukkit's slots.
                self.scopes.push(seed);
                let outcome = self.exec_block(body);
                let slots = self.scopes.pop().expect("scope stack is never empty");
                match outcome? {
                    ExecResult::Continue => {}
                    ExecResult::Break => return Err(RuntimeError::BreakOutsideConstruct),
                    ExecResult::Return(_) => return Err(RuntimeError::ReturnOutsideFunction),
                }
                let name = self.target_name(name)?;
                self.scopes
                    .last_mut()
                    .expect("scope stack is never empty")
                    .insert(name, Value::Bukkit(slots));
            }
        }
        Ok(ExecResult::Continue)
    }

    /// Cases fall through from the first match until a GTFO, like the
    /// original language.
    fn exec_switch(
        &mut self,
        cases: &[SwitchCase],
        default: Option<&Block>,
    ) -> RunResult<ExecResult> {
        let mut matched = None;
        for (index, case) in cases.iter().enumerate() {
            let guard = self.eval(&case.guard)?;
            if values_equal(&self.it, &guard) {
                matched = Some(index);
                break;
            }
        }

        let blocks: Vec<&Block> = match matched {
            Some(index) => {
                let mut blocks: Vec<&Block> =
                    cases[index..].iter().map(|case| &case.block).collect();
                blocks.extend(default);
                blocks
            }
            None => default.into_iter().collect(),
        };

        for block in blocks {
            match self.exec_block(block)? {
                ExecResult::Continue => {}
                ExecResult::Break => return Ok(ExecResult::Continue),
                other => return Ok(other),
            }
        }
        Ok(ExecResult::Continue)
    }

    fn exec_loop(
        &mut self,
        var: Option<&Identifier>,
        guard: Option<&Expr>,
        update: Option<&Expr>,
        body: &Block,
    ) -> RunResult<ExecResult> {
        loop {
            if let Some(guard) = guard
                && !self.eval(guard)?.as_troof()
            {
                return Ok(ExecResult::Continue);
            }
            match self.exec_block(body)? {
                ExecResult::Continue => {}
                ExecResult::Break => return Ok(ExecResult::Continue),
                other => return Ok(other),
            }
            if let Some(update) = update {
                let next = self.eval(update)?;
                let var = var.expect("loop update always names its variable");
                self.assign(var, next)?;
            }
        }
    }

    fn read_input_line(&mut self) -> String {
        match &mut self.input {
            Some(queue) => queue.pop_front().unwrap_or_default(),
            None => {
                let mut line = String::new();
                if std::io::stdin().lock().read_line(&mut line).is_ok() {
                    line.truncate(line.trim_end_matches(['\r', '\n']).len());
                }
                line
            }
        }
    }

    // ------------------------------------------------------------------
    // Expression evaluation
    // ------------------------------------------------------------------

    fn eval(&mut self, expr: &Expr) -> RunResult<Value> {
        match expr {
            Expr::Cast { target, ty } => self.eval(target)?.cast_to(*ty),
            Expr::Constant(constant) => Ok(match constant {
                Constant::Numbr(value) => Value::Numbr(*value),
                Constant::Numbar(value) => Value::Numbar(*value),
                Constant::Troof(value) => Value::Troof(*value),
                Constant::Yarn(text) => Value::Yarn(text.clone()),
                Constant::Noob => Value::Noob,
                Constant::Bukkit => Value::Bukkit(HashMap::new()),
            }),
            Expr::Identifier(identifier) => self.read(identifier),
            Expr::FuncCall { scope, name, args } => self.eval_call(scope, name, args),
            Expr::Op { kind, args } => self.eval_op(*kind, args),
            Expr::It => Ok(self.it.clone()),
        }
    }

    fn eval_call(
        &mut self,
        scope: &Identifier,
        name: &Identifier,
        args: &[Expr],
    ) -> RunResult<Value> {
        let function = self.lookup_function(scope, name)?;
        if function.params.len() != args.len() {
            return Err(RuntimeError::WrongArity {
                name: name.to_string(),
                expected: function.params.len(),
                received: args.len(),
                loc: name.loc.clone(),
            });
        }

        let mut frame = HashMap::new();
        for (param, arg) in function.params.iter().zip(args) {
            let value = self.eval(arg)?;
            frame.insert(param.clone(), value);
        }

        // Each call gets its own IT.
        let saved_it = std::mem::replace(&mut self.it, Value::Noob);
        self.scopes.push(frame);
        let outcome = self.exec_block(&function.body);
        self.scopes.pop();
        self.it = saved_it;

        match outcome? {
            ExecResult::Return(value) => Ok(value),
            // Falling off the end or GTFO returns NOOB.
            ExecResult::Continue | ExecResult::Break => Ok(Value::Noob),
        }
    }

    fn lookup_function(&mut self, scope: &Identifier, name: &Identifier) -> RunResult<Rc<Function>> {
        let function_name = self.target_name(name)?;
        let value = if scope.literal_name() == Some("I") {
            self.lookup(&function_name)
                .cloned()
                .ok_or_else(|| RuntimeError::Undeclared {
                    name: function_name.clone(),
                    loc: name.loc.clone(),
                })?
        } else {
            let holder = self.read(scope)?;
            let Value::Bukkit(map) = holder else {
                return Err(RuntimeError::NotABukkit {
                    name: scope.to_string(),
                    loc: scope.loc.clone(),
                });
            };
            map.get(&function_name)
                .cloned()
                .ok_or_else(|| RuntimeError::MissingSlot {
                    name: scope.to_string(),
                    slot: function_name.clone(),
                    loc: name.loc.clone(),
                })?
        };
        match value {
            Value::Funcshun(function) => Ok(function),
            _ => Err(RuntimeError::NotAFunction {
                name: function_name,
                loc: name.loc.clone(),
            }),
        }
    }

    fn eval_op(&mut self, kind: OpKind, args: &[Expr]) -> RunResult<Value> {
        match kind {
            OpKind::Add | OpKind::Sub | OpKind::Mul | OpKind::Div | OpKind::Mod | OpKind::Max
            | OpKind::Min => {
                let left = self.eval(&args[0])?.as_num()?;
                let right = self.eval(&args[1])?.as_num()?;
                math(kind, left, right)
            }
            OpKind::And => {
                let left = self.eval(&args[0])?.as_troof();
                let right = self.eval(&args[1])?.as_troof();
                Ok(Value::Troof(left && right))
            }
            OpKind::Or => {
                let left = self.eval(&args[0])?.as_troof();
                let right = self.eval(&args[1])?.as_troof();
                Ok(Value::Troof(left || right))
            }
            OpKind::Xor => {
                let left = self.eval(&args[0])?.as_troof();
                let right = self.eval(&args[1])?.as_troof();
                Ok(Value::Troof(left != right))
            }
            OpKind::Not => {
                let value = self.eval(&args[0])?.as_troof();
                Ok(Value::Troof(!value))
            }
            OpKind::Eq => {
                let left = self.eval(&args[0])?;
                let right = self.eval(&args[1])?;
                Ok(Value::Troof(values_equal(&left, &right)))
            }
            OpKind::Neq => {
                let left = self.eval(&args[0])?;
                let right = self.eval(&args[1])?;
                Ok(Value::Troof(!values_equal(&left, &right)))
            }
            OpKind::AllOf => {
                for arg in args {
                    if !self.eval(arg)?.as_troof() {
                        return Ok(Value::Troof(false));
                    }
                }
                Ok(Value::Troof(true))
            }
            OpKind::AnyOf => {
                for arg in args {
                    if self.eval(arg)?.as_troof() {
                        return Ok(Value::Troof(true));
                    }
                }
                Ok(Value::Troof(false))
            }
            OpKind::Smoosh => {
                let mut text = String::new();
                for arg in args {
                    let value = self.eval(arg)?;
                    text.push_str(&value.render()?);
                }
                Ok(Value::Yarn(text))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn math(kind: OpKind, left: Num, right: Num) -> RunResult<Value> {
    // Mixed NUMBR/NUMBAR promotes to NUMBAR.
    if let (Num::I(left), Num::I(right)) = (left, right) {
        let value = match kind {
            OpKind::Add => left.wrapping_add(right),
            OpKind::Sub => left.wrapping_sub(right),
            OpKind::Mul => left.wrapping_mul(right),
            OpKind::Div => {
                if right == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                left.wrapping_div(right)
            }
            OpKind::Mod => {
                if right == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                left.wrapping_rem(right)
            }
            OpKind::Max => left.max(right),
            OpKind::Min => left.min(right),
            _ => unreachable!("math called with non-math operator"),
        };
        return Ok(Value::Numbr(value));
    }

    let left = match left {
        Num::I(value) => value as f32,
        Num::F(value) => value,
    };
    let right = match right {
        Num::I(value) => value as f32,
        Num::F(value) => value,
    };
    let value = match kind {
        OpKind::Add => left + right,
        OpKind::Sub => left - right,
        OpKind::Mul => left * right,
        OpKind::Div => {
            if right == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            left / right
        }
        OpKind::Mod => {
            if right == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            left % right
        }
        OpKind::Max => left.max(right),
        OpKind::Min => left.min(right),
        _ => unreachable!("math called with non-math operator"),
    };
    Ok(Value::Numbar(value))
}

/// One-shot convenience entry: run a program with stdin GIMMEH input.
pub fn run(program: &Program) -> Result<String> {
    Interpreter::new().run(program)
}
