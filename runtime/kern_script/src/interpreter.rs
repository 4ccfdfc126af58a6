//! Tree-walking interpreter.
//!
//! Each file runs in the [`ExecutionScope`] the loader hands it: locals live
//! and die with that file, while constants and globals go to the namespace
//! shared by every file. `require` and `load` call back into the loader with
//! `$LOAD_PATH` copied over first, so changes a script makes to the global
//! are seen by the very next lookup.

use kern_load::{Evaluator, ExecutionScope, Input, Loader, Namespace, Shared};

use crate::ast::{Expr, ExprKind, Span, Stmt, StmtKind};
use crate::error::ScriptError;
use crate::lexer::LOAD_PATH;
use crate::output::{Output, SharedOutput};
use crate::parser::parse;
use crate::value::Value;

/// Path reported for `-e` code.
pub const INLINE_PATH: &str = "-e";

/// State for one file while it runs.
struct Frame<'a> {
    loader: &'a mut Loader,
    scope: &'a mut ExecutionScope<Value>,
    source: &'a str,
}

impl Frame<'_> {
    fn path(&self) -> String {
        self.scope.path().to_owned()
    }

    fn line(&self, span: Span) -> usize {
        span.line_in(self.source)
    }
}

pub struct Interpreter {
    namespace: Shared<Namespace<Value>>,
    output: SharedOutput,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter printing to stdout, with an empty `$LOAD_PATH`.
    pub fn new() -> Self {
        Self::with_output(Output::stdout())
    }

    pub fn with_output(output: SharedOutput) -> Self {
        let mut namespace = Namespace::new();
        namespace.set_global(LOAD_PATH, Value::Array(Vec::new()));
        Interpreter {
            namespace: Shared::new(namespace),
            output,
        }
    }

    /// Copy the loader's current search list into `$LOAD_PATH`.
    pub fn seed_load_path(&self, loader: &Loader) {
        let value = Value::from_input(loader.search_paths().as_input());
        self.namespace.borrow_mut().set_global(LOAD_PATH, value);
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    pub fn global(&self, name: &str) -> Option<Value> {
        self.namespace.borrow().global(name)
    }

    pub fn constant(&self, name: &str) -> Option<Value> {
        self.namespace.borrow().constant(name)
    }

    /// `require` from the host side, honouring the current `$LOAD_PATH`.
    pub fn require_feature(
        &mut self,
        loader: &mut Loader,
        feature: &str,
    ) -> Result<bool, ScriptError> {
        self.sync_load_path(loader);
        loader.require_feature(self, feature)
    }

    /// `load` from the host side, honouring the current `$LOAD_PATH`.
    pub fn load_file(&mut self, loader: &mut Loader, path: &str) -> Result<bool, ScriptError> {
        self.sync_load_path(loader);
        loader.load_path(self, path)
    }

    /// Run code that did not come from a file, such as `-e` or stdin.
    ///
    /// The code gets its own scope like any loaded file but is not recorded
    /// by the loader.
    pub fn run_inline(
        &mut self,
        loader: &mut Loader,
        path: &str,
        source: &str,
    ) -> Result<(), ScriptError> {
        let mut scope = ExecutionScope::new(self.namespace.clone(), path);
        self.evaluate(loader, source, &mut scope)
    }

    fn exec(&mut self, frame: &mut Frame<'_>, stmt: &Stmt) -> Result<Value, ScriptError> {
        match &stmt.kind {
            StmtKind::AssignLocal { name, value } => {
                let value = self.eval(frame, value)?;
                frame.scope.set_local(name.as_str(), value.clone());
                Ok(value)
            }
            StmtKind::AssignConst { name, value } => {
                let value = self.eval(frame, value)?;
                if frame
                    .scope
                    .set_constant(name.as_str(), value.clone())
                    .is_some()
                {
                    tracing::warn!(
                        constant = %name,
                        path = frame.scope.path(),
                        line = frame.line(stmt.span),
                        "already initialized constant"
                    );
                }
                Ok(value)
            }
            StmtKind::AssignGlobal { name, value } => {
                let value = self.eval(frame, value)?;
                frame.scope.set_global(name.as_str(), value.clone());
                Ok(value)
            }
            StmtKind::Expr(expr) => self.eval(frame, expr),
        }
    }

    fn eval(&mut self, frame: &mut Frame<'_>, expr: &Expr) -> Result<Value, ScriptError> {
        match &expr.kind {
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Sym(s) => Ok(Value::Sym(s.clone())),
            ExprKind::File => Ok(Value::Str(frame.path())),
            ExprKind::Array(items) => items
                .iter()
                .map(|item| self.eval(frame, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            ExprKind::Name(name) => {
                if let Some(value) = frame.scope.local(name) {
                    return Ok(value.clone());
                }
                if Builtin::lookup(name).is_none() {
                    return Err(ScriptError::UndefinedName {
                        name: name.clone(),
                        path: frame.path(),
                        line: frame.line(expr.span),
                    });
                }
                self.call(frame, name, &[], expr.span)
            }
            ExprKind::Const(name) => {
                frame
                    .scope
                    .constant(name)
                    .ok_or_else(|| ScriptError::UninitializedConstant {
                        name: name.clone(),
                        path: frame.path(),
                        line: frame.line(expr.span),
                    })
            }
            ExprKind::Global(name) => Ok(frame.scope.global(name).unwrap_or_default()),
            ExprKind::Call { name, args } => self.call(frame, name, args, expr.span),
            ExprKind::Append { target, values } => self.append(frame, target, values),
        }
    }

    /// `target << v...`, in place when the target is a variable.
    fn append(
        &mut self,
        frame: &mut Frame<'_>,
        target: &Expr,
        values: &[Expr],
    ) -> Result<Value, ScriptError> {
        // evaluate first: a value may require files that touch the namespace
        let items = values
            .iter()
            .map(|value| self.eval(frame, value))
            .collect::<Result<Vec<_>, _>>()?;

        let no_method = |frame: &Frame<'_>, receiver: &Value| ScriptError::NoMethod {
            method: "<<".to_owned(),
            receiver: receiver.type_name(),
            path: frame.path(),
            line: frame.line(target.span),
        };

        match &target.kind {
            ExprKind::Global(name) => {
                let namespace = frame.scope.namespace().clone();
                let mut namespace = namespace.borrow_mut();
                match namespace.global_mut(name) {
                    Some(Value::Array(list)) => {
                        list.extend(items);
                        Ok(Value::Array(list.clone()))
                    }
                    Some(other) => Err(no_method(frame, other)),
                    None => Err(no_method(frame, &Value::Nil)),
                }
            }
            ExprKind::Name(name) if frame.scope.local(name).is_some() => {
                match frame.scope.local_mut(name) {
                    Some(Value::Array(list)) => {
                        list.extend(items);
                        Ok(Value::Array(list.clone()))
                    }
                    Some(other) => {
                        let other = other.clone();
                        Err(no_method(frame, &other))
                    }
                    None => Err(no_method(frame, &Value::Nil)),
                }
            }
            _ => match self.eval(frame, target)? {
                Value::Array(mut list) => {
                    list.extend(items);
                    Ok(Value::Array(list))
                }
                other => Err(no_method(frame, &other)),
            },
        }
    }

    fn call(
        &mut self,
        frame: &mut Frame<'_>,
        name: &str,
        args: &[Expr],
        span: Span,
    ) -> Result<Value, ScriptError> {
        let Some(builtin) = Builtin::lookup(name) else {
            return Err(ScriptError::NoMethod {
                method: name.to_owned(),
                receiver: "main",
                path: frame.path(),
                line: frame.line(span),
            });
        };

        let args = args
            .iter()
            .map(|arg| self.eval(frame, arg))
            .collect::<Result<Vec<_>, _>>()?;

        match builtin {
            Builtin::Require | Builtin::Load => {
                self.sync_load_path(frame.loader);
                let inputs: Vec<Input> = args.iter().map(Value::to_input).collect();
                let executed = if builtin == Builtin::Require {
                    frame.loader.require(self, &inputs)?
                } else {
                    frame.loader.load(self, &inputs)?
                };
                Ok(Value::Bool(executed))
            }
            Builtin::Puts => {
                if args.is_empty() {
                    self.output.println("");
                }
                for arg in &args {
                    match arg {
                        Value::Array(items) => {
                            for item in items {
                                self.output.println(&item.to_string());
                            }
                        }
                        other => self.output.println(&other.to_string()),
                    }
                }
                Ok(Value::Nil)
            }
            Builtin::Raise => match args.as_slice() {
                [] => Err(ScriptError::Raised("unhandled exception".to_owned())),
                [message] => Err(ScriptError::Raised(message.to_string())),
                _ => Err(ScriptError::WrongArity {
                    method: "raise",
                    given: args.len(),
                    expected: "0..1",
                    path: frame.path(),
                    line: frame.line(span),
                }),
            },
        }
    }

    /// Hand the script's `$LOAD_PATH` to the loader, whatever it holds.
    ///
    /// A non-array value is passed through as-is; the loader reports the
    /// type error when it actually needs the list.
    fn sync_load_path(&self, loader: &mut Loader) {
        let value = self.namespace.borrow().global(LOAD_PATH).unwrap_or_default();
        loader.search_paths_mut().replace(value.to_input());
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Builtin {
    Require,
    Load,
    Puts,
    Raise,
}

impl Builtin {
    fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "require" => Some(Builtin::Require),
            "load" => Some(Builtin::Load),
            "puts" => Some(Builtin::Puts),
            "raise" => Some(Builtin::Raise),
            _ => None,
        }
    }
}

impl Evaluator for Interpreter {
    type Value = Value;
    type Error = ScriptError;

    fn namespace(&self) -> Shared<Namespace<Value>> {
        self.namespace.clone()
    }

    #[tracing::instrument(level = "trace", skip_all, fields(path = scope.path()))]
    fn evaluate(
        &mut self,
        loader: &mut Loader,
        source: &str,
        scope: &mut ExecutionScope<Value>,
    ) -> Result<(), ScriptError> {
        let program = parse(source).map_err(|err| ScriptError::syntax(scope.path(), source, err))?;

        let mut frame = Frame {
            loader,
            scope,
            source,
        };
        for stmt in &program.stmts {
            self.exec(&mut frame, stmt)?;
        }
        Ok(())
    }
}
