//! Shared test harness
//!
//! Builds IR units and executes lowered function bodies against a field
//! store, so guard semantics and statement ordering are observed rather than
//! assumed. `CallGetter` runs the unit's generated initializer before the
//! accessor body, standing in for the call sites the backend inserts on
//! first external access.
#![allow(dead_code)]

use rustc_hash::FxHashMap;

use opal_ir::{BinOp, Const, Expr, IrArena, NodeId, NodeKind, Stmt, Symbol, Ty};

/// Runtime value in the evaluator
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    /// Zero value static storage starts at
    pub fn default_for(ty: &Ty) -> Value {
        match ty {
            Ty::Bool => Value::Bool(false),
            Ty::Int => Value::Int(0),
            Ty::Str => Value::Str(String::new()),
            _ => Value::Unit,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            other => panic!("expected bool, got {:?}", other),
        }
    }

    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(v) => *v,
            other => panic!("expected int, got {:?}", other),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Value::Str(v) => v,
            other => panic!("expected string, got {:?}", other),
        }
    }
}

/// Instance field storage keyed by field declaration
pub type Instance = FxHashMap<NodeId, Value>;

#[derive(Default)]
struct Frame {
    this: Option<Instance>,
    params: Vec<Value>,
}

/// Executes function bodies against unit-scoped field storage
pub struct Evaluator<'a> {
    arena: &'a IrArena,
    statics: FxHashMap<NodeId, Value>,
    init_function: Option<NodeId>,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(arena: &'a IrArena) -> Self {
        Self {
            arena,
            statics: FxHashMap::default(),
            init_function: None,
            depth: 0,
        }
    }

    /// Register the generated initializer to run before accessor calls
    pub fn with_init_function(mut self, func: NodeId) -> Self {
        self.init_function = Some(func);
        self
    }

    /// Current value of a unit-scoped field, if it was ever assigned
    pub fn static_value(&self, field: NodeId) -> Option<&Value> {
        self.statics.get(&field)
    }

    /// Overwrite a unit-scoped field from outside any function body
    pub fn set_static(&mut self, field: NodeId, value: Value) {
        self.statics.insert(field, value);
    }

    /// Execute a parameterless function body
    pub fn call_function(&mut self, func: NodeId) {
        self.depth += 1;
        assert!(
            self.depth <= 64,
            "evaluator recursion limit exceeded; a guard failed to stop re-entry"
        );
        let body = self
            .arena
            .get(func)
            .as_function()
            .expect("call target must be a function")
            .body
            .clone();
        let mut frame = Frame::default();
        self.exec_block(&body, &mut frame);
        self.depth -= 1;
    }

    /// Execute a constructor with positional arguments, returning the
    /// constructed instance's field storage
    pub fn construct(&mut self, ctor: NodeId, args: Vec<Value>) -> Instance {
        let body = self
            .arena
            .get(ctor)
            .as_constructor()
            .expect("construct target must be a constructor")
            .body
            .clone();
        let mut frame = Frame {
            this: Some(Instance::default()),
            params: args,
        };
        self.exec_block(&body, &mut frame);
        frame.this.expect("constructor frame keeps its instance")
    }

    /// Read a property of a constructed instance through its getter
    pub fn read_instance_property(&mut self, instance: &Instance, prop: NodeId) -> Value {
        let getter = self
            .arena
            .get(prop)
            .as_property()
            .expect("read target must be a property")
            .getter
            .expect("property has no getter");
        let body = self
            .arena
            .resolve(getter)
            .as_function()
            .expect("getter symbol must refer to a function")
            .body
            .clone();
        let mut frame = Frame {
            this: Some(instance.clone()),
            params: Vec::new(),
        };
        self.exec_block(&body, &mut frame)
            .unwrap_or(Value::Unit)
    }

    /// Read a unit-level property as an external access would: run the
    /// generated initializer, then the getter body
    pub fn read_unit_property(&mut self, prop: NodeId) -> Value {
        let getter = self
            .arena
            .get(prop)
            .as_property()
            .expect("read target must be a property")
            .getter
            .expect("property has no getter");
        self.eval(&Expr::CallGetter { getter }, &Frame::default())
    }

    fn run_init(&mut self) {
        if let Some(func) = self.init_function {
            self.call_function(func);
        }
    }

    fn exec_block(&mut self, stmts: &[Stmt], frame: &mut Frame) -> Option<Value> {
        for stmt in stmts {
            match stmt {
                Stmt::Expr(e) => {
                    self.eval(e, frame);
                }
                Stmt::SetField {
                    field,
                    receiver,
                    value,
                } => {
                    let value = self.eval(value, frame);
                    match receiver {
                        None => {
                            self.statics.insert(field.node(), value);
                        }
                        Some(Expr::This) => {
                            frame
                                .this
                                .as_mut()
                                .expect("field write through `this` outside a member")
                                .insert(field.node(), value);
                        }
                        Some(other) => panic!("unsupported receiver {:?}", other),
                    }
                }
                Stmt::If { cond, then_branch } => {
                    if self.eval(cond, frame).as_bool() {
                        if let Some(ret) = self.exec_block(then_branch, frame) {
                            return Some(ret);
                        }
                    }
                }
                Stmt::Return(value) => {
                    return Some(
                        value
                            .as_ref()
                            .map(|e| self.eval(e, frame))
                            .unwrap_or(Value::Unit),
                    );
                }
                Stmt::DelegatingCall { .. } => {
                    // The root supertype constructor initializes nothing.
                }
            }
        }
        None
    }

    fn eval(&mut self, expr: &Expr, frame: &Frame) -> Value {
        match expr {
            Expr::Const(c) => match c {
                Const::Unit => Value::Unit,
                Const::Bool(v) => Value::Bool(*v),
                Const::Int(v) => Value::Int(*v),
                Const::Str(v) => Value::Str(v.clone()),
            },
            Expr::GetField { field, receiver } => {
                let decl = self
                    .arena
                    .resolve(*field)
                    .as_field()
                    .expect("field symbol must refer to a field");
                match receiver {
                    None => self
                        .statics
                        .get(&field.node())
                        .cloned()
                        .unwrap_or_else(|| Value::default_for(&decl.ty)),
                    Some(recv) => match recv.as_ref() {
                        Expr::This => frame
                            .this
                            .as_ref()
                            .expect("field read through `this` outside a member")
                            .get(&field.node())
                            .cloned()
                            .unwrap_or_else(|| Value::default_for(&decl.ty)),
                        other => panic!("unsupported receiver {:?}", other),
                    },
                }
            }
            Expr::GetParam { index } => frame.params[*index as usize].clone(),
            Expr::This => panic!("bare `this` has no value representation here"),
            Expr::Not(e) => Value::Bool(!self.eval(e, frame).as_bool()),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs, frame);
                let rhs = self.eval(rhs, frame);
                match op {
                    BinOp::Add => Value::Int(lhs.as_int() + rhs.as_int()),
                    BinOp::Sub => Value::Int(lhs.as_int() - rhs.as_int()),
                    BinOp::Mul => Value::Int(lhs.as_int() * rhs.as_int()),
                    BinOp::Eq => Value::Bool(lhs == rhs),
                    BinOp::And => Value::Bool(lhs.as_bool() && rhs.as_bool()),
                    BinOp::Or => Value::Bool(lhs.as_bool() || rhs.as_bool()),
                }
            }
            Expr::CallGetter { getter } => {
                // First external access triggers the generated initializer.
                self.run_init();
                let body = self
                    .arena
                    .resolve(*getter)
                    .as_function()
                    .expect("getter symbol must refer to a function")
                    .body
                    .clone();
                let mut inner = Frame::default();
                self.exec_block(&body, &mut inner).unwrap_or(Value::Unit)
            }
        }
    }
}

/// Backing-field symbol of a property
pub fn backing_field(arena: &IrArena, prop: NodeId) -> Symbol {
    arena
        .get(prop)
        .as_property()
        .expect("not a property")
        .backing_field
        .expect("property has no backing field")
}

/// Getter symbol of a property
pub fn getter_of(arena: &IrArena, prop: NodeId) -> Symbol {
    arena
        .get(prop)
        .as_property()
        .expect("not a property")
        .getter
        .expect("property has no getter")
}

/// Overwrite a property's backing-field initializer
pub fn set_initializer(arena: &mut IrArena, prop: NodeId, init: Expr) {
    let field = backing_field(arena, prop);
    arena
        .resolve_mut(field)
        .as_field_mut()
        .expect("backing field symbol must refer to a field")
        .initializer = Some(init);
}

/// Synthesized fields attached directly to a declaration
pub fn synthesized_fields(arena: &IrArena, parent: NodeId) -> Vec<NodeId> {
    arena
        .children(parent)
        .iter()
        .copied()
        .filter(|&id| {
            let node = arena.get(id);
            node.is_synthesized() && matches!(node.kind, NodeKind::Field(_))
        })
        .collect()
}

/// Synthesized functions attached directly to a declaration
pub fn synthesized_functions(arena: &IrArena, parent: NodeId) -> Vec<NodeId> {
    arena
        .children(parent)
        .iter()
        .copied()
        .filter(|&id| {
            let node = arena.get(id);
            node.is_synthesized() && matches!(node.kind, NodeKind::Function(_))
        })
        .collect()
}

/// Constructors attached directly to a declaration
pub fn constructors(arena: &IrArena, parent: NodeId) -> Vec<NodeId> {
    arena
        .children(parent)
        .iter()
        .copied()
        .filter(|&id| matches!(arena.get(id).kind, NodeKind::Constructor(_)))
        .collect()
}

/// Shorthand for an integer literal
pub fn int(v: i64) -> Expr {
    Expr::Const(Const::Int(v))
}

/// Shorthand for a string literal
pub fn str_lit(s: &str) -> Expr {
    Expr::Const(Const::Str(s.to_string()))
}
