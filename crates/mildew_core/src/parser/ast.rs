//! Abstract syntax tree node definitions for Mildew.
//!
//! Two disjoint hierarchies share only the "accept a visitor" capability:
//!
//! - [`Expr`] — expression nodes.  Pure values; the spanning token carries
//!   the source position when one is required.
//! - [`Stmt`] — statement nodes.  Each carries the source line number for
//!   later diagnostics.
//!
//! Nodes are never mutated after construction.  Consumers implement
//! [`ExprVisitor`] / [`StmtVisitor`] and dispatch through [`Expr::accept`] /
//! [`Stmt::accept`]; `Display` on every node yields an unambiguous,
//! re-parseable rendering used for diagnostics.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::parser::lexer::Token;
use crate::values::any::ScriptAny;

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// A Mildew expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal token: number, string, regex, or a value keyword.
    Literal(LiteralExpr),
    /// `function [name](args) { … }` used as a value.
    FunctionLiteral(FunctionLiteralExpr),
    /// `(args) => …` or `arg => …`.
    Lambda(LambdaExpr),
    /// A backtick string after interpolation expansion.
    TemplateString(TemplateStringExpr),
    /// `[a, b, …]`
    ArrayLiteral(ArrayLiteralExpr),
    /// `{key: value, …}`
    ObjectLiteral(ObjectLiteralExpr),
    /// `class [name] [extends Base] { … }` used as a value.
    ClassLiteral(ClassLiteralExpr),
    /// `left op right`
    BinaryOp(BinaryOpExpr),
    /// `op operand` or `operand op` (postfix flag).
    UnaryOp(UnaryOpExpr),
    /// `condition ? on_true : on_false`
    Ternary(TernaryExpr),
    /// A bare identifier.
    VarAccess(VarAccessExpr),
    /// `callee(args)`; `return_this` is set for `new` calls.
    FunctionCall(FunctionCallExpr),
    /// `object[index]`
    ArrayIndex(ArrayIndexExpr),
    /// `object.member`
    MemberAccess(MemberAccessExpr),
    /// `new callee(args)`
    New(NewExpr),
    /// `super` — only legal inside a derived class body.
    Super(SuperExpr),
    /// `yield [expr]` — only legal inside a generator body.
    Yield(YieldExpr),
}

/// A literal token wrapped as an expression.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    /// The literal token (integer, double, string, regex, or value keyword).
    pub token: Token,
}

/// `function [name](args) { statements }`
#[derive(Debug, Clone)]
pub struct FunctionLiteralExpr {
    /// The `function` keyword token (or the method-name token for class
    /// methods).
    pub token: Token,
    /// Parameter names in declaration order.
    pub arg_names: Vec<String>,
    /// Default-value expressions for the trailing parameters.
    pub default_arguments: Vec<Expr>,
    /// Body statements.
    pub statements: Vec<Stmt>,
    /// The optional function name; empty when anonymous.
    pub optional_name: String,
    /// `true` when this literal is a class constructor.
    pub is_class: bool,
    /// `true` for generator functions (`function *g() { … }`).
    pub is_generator: bool,
}

/// The body of a [`LambdaExpr`]: either a block or a single expression.
#[derive(Debug, Clone)]
pub enum LambdaBody {
    /// `(args) => { statements }`
    Block(Vec<Stmt>),
    /// `(args) => expression`
    Expression(Box<Expr>),
}

/// `(args) => body`
#[derive(Debug, Clone)]
pub struct LambdaExpr {
    /// The `=>` token.
    pub arrow_token: Token,
    /// Parameter names in declaration order.
    pub arg_names: Vec<String>,
    /// Default-value expressions for the trailing parameters.
    pub default_arguments: Vec<Expr>,
    /// Block or single-expression body.
    pub body: LambdaBody,
}

/// A template string whose children alternate literal string segments and
/// interpolated sub-expressions.
#[derive(Debug, Clone)]
pub struct TemplateStringExpr {
    /// The alternating literal/expression children, in source order.
    pub nodes: Vec<Expr>,
}

/// `[a, b, …]`
#[derive(Debug, Clone)]
pub struct ArrayLiteralExpr {
    /// Element expressions; empty arrays are allowed.
    pub elements: Vec<Expr>,
}

/// `{key: value, …}`
#[derive(Debug, Clone)]
pub struct ObjectLiteralExpr {
    /// Property keys, parallel to `values`.
    pub keys: Vec<String>,
    /// Property value expressions, parallel to `keys`.
    pub values: Vec<Expr>,
}

/// `class [name] [extends Base] { … }` in expression position.
#[derive(Debug, Clone)]
pub struct ClassLiteralExpr {
    /// The `class` keyword token.
    pub class_token: Token,
    /// The shared class definition.
    pub definition: Rc<ClassDefinition>,
}

/// `left op right`
#[derive(Debug, Clone)]
pub struct BinaryOpExpr {
    /// The operator token.
    pub op_token: Token,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
}

/// `op operand` (prefix) or `operand op` (postfix).
#[derive(Debug, Clone)]
pub struct UnaryOpExpr {
    /// The operator token.
    pub op_token: Token,
    /// The operand.
    pub operand: Box<Expr>,
    /// `true` for postfix `++`/`--`.
    pub is_postfix: bool,
}

/// `condition ? on_true : on_false`
#[derive(Debug, Clone)]
pub struct TernaryExpr {
    /// The condition.
    pub condition: Box<Expr>,
    /// Value when the condition is truthy.
    pub on_true: Box<Expr>,
    /// Value when the condition is falsy.
    pub on_false: Box<Expr>,
}

/// A bare identifier reference.
#[derive(Debug, Clone)]
pub struct VarAccessExpr {
    /// The identifier token; for destructuring declarations the text is the
    /// preserved shape string (e.g. `[a, b, ...r]`).
    pub token: Token,
}

impl VarAccessExpr {
    /// The referenced name.
    pub fn name(&self) -> &str {
        &self.token.text
    }
}

/// `callee(arguments)`
#[derive(Debug, Clone)]
pub struct FunctionCallExpr {
    /// The expression being called.
    pub callee: Box<Expr>,
    /// Call arguments in source order.
    pub arguments: Vec<Expr>,
    /// `true` when the call was produced by a `new` expression and the
    /// constructed `this` is the call result.
    pub return_this: bool,
}

/// `object[index]`
#[derive(Debug, Clone)]
pub struct ArrayIndexExpr {
    /// The indexed object.
    pub object: Box<Expr>,
    /// The index expression.
    pub index: Box<Expr>,
}

/// `object.member`
#[derive(Debug, Clone)]
pub struct MemberAccessExpr {
    /// The accessed object.
    pub object: Box<Expr>,
    /// The `.` token.
    pub dot_token: Token,
    /// The member; always a [`Expr::VarAccess`] (parser-checked).
    pub member: Box<Expr>,
}

/// `new callee(args)` — wraps the synthesized call.
#[derive(Debug, Clone)]
pub struct NewExpr {
    /// The constructor call with `return_this` set.
    pub call: FunctionCallExpr,
}

/// `super` inside a derived class body.
#[derive(Debug, Clone)]
pub struct SuperExpr {
    /// The `super` keyword token.
    pub token: Token,
    /// The innermost enclosing base-class expression.
    pub base_class: Box<Expr>,
}

/// `yield [expression]` inside a generator body.
#[derive(Debug, Clone)]
pub struct YieldExpr {
    /// The `yield` keyword token.
    pub token: Token,
    /// The yielded expression, when present.
    pub expression: Option<Box<Expr>>,
}

impl Expr {
    pub(crate) fn literal(token: Token) -> Self {
        Expr::Literal(LiteralExpr { token })
    }

    pub(crate) fn var_access(token: Token) -> Self {
        Expr::VarAccess(VarAccessExpr { token })
    }

    pub(crate) fn binary(op_token: Token, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp(BinaryOpExpr {
            op_token,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub(crate) fn unary(op_token: Token, operand: Expr, is_postfix: bool) -> Self {
        Expr::UnaryOp(UnaryOpExpr {
            op_token,
            operand: Box::new(operand),
            is_postfix,
        })
    }

    pub(crate) fn ternary(condition: Expr, on_true: Expr, on_false: Expr) -> Self {
        Expr::Ternary(TernaryExpr {
            condition: Box::new(condition),
            on_true: Box::new(on_true),
            on_false: Box::new(on_false),
        })
    }

    pub(crate) fn member_access(object: Expr, dot_token: Token, member: Expr) -> Self {
        Expr::MemberAccess(MemberAccessExpr {
            object: Box::new(object),
            dot_token,
            member: Box::new(member),
        })
    }

    pub(crate) fn array_index(object: Expr, index: Expr) -> Self {
        Expr::ArrayIndex(ArrayIndexExpr {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    pub(crate) fn function_call(callee: Expr, arguments: Vec<Expr>, return_this: bool) -> Self {
        Expr::FunctionCall(FunctionCallExpr {
            callee: Box::new(callee),
            arguments,
            return_this,
        })
    }

    /// Dispatch to the visitor method matching this variant.
    pub fn accept<V: ExprVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Literal(node) => visitor.visit_literal(node),
            Expr::FunctionLiteral(node) => visitor.visit_function_literal(node),
            Expr::Lambda(node) => visitor.visit_lambda(node),
            Expr::TemplateString(node) => visitor.visit_template_string(node),
            Expr::ArrayLiteral(node) => visitor.visit_array_literal(node),
            Expr::ObjectLiteral(node) => visitor.visit_object_literal(node),
            Expr::ClassLiteral(node) => visitor.visit_class_literal(node),
            Expr::BinaryOp(node) => visitor.visit_binary_op(node),
            Expr::UnaryOp(node) => visitor.visit_unary_op(node),
            Expr::Ternary(node) => visitor.visit_ternary(node),
            Expr::VarAccess(node) => visitor.visit_var_access(node),
            Expr::FunctionCall(node) => visitor.visit_function_call(node),
            Expr::ArrayIndex(node) => visitor.visit_array_index(node),
            Expr::MemberAccess(node) => visitor.visit_member_access(node),
            Expr::New(node) => visitor.visit_new(node),
            Expr::Super(node) => visitor.visit_super(node),
            Expr::Yield(node) => visitor.visit_yield(node),
        }
    }
}

/// One method per [`Expr`] variant.  A tree-walking interpreter implements
/// this with `Output = ScriptAny`.
pub trait ExprVisitor {
    /// The value produced per node.
    type Output;

    fn visit_literal(&mut self, node: &LiteralExpr) -> Self::Output;
    fn visit_function_literal(&mut self, node: &FunctionLiteralExpr) -> Self::Output;
    fn visit_lambda(&mut self, node: &LambdaExpr) -> Self::Output;
    fn visit_template_string(&mut self, node: &TemplateStringExpr) -> Self::Output;
    fn visit_array_literal(&mut self, node: &ArrayLiteralExpr) -> Self::Output;
    fn visit_object_literal(&mut self, node: &ObjectLiteralExpr) -> Self::Output;
    fn visit_class_literal(&mut self, node: &ClassLiteralExpr) -> Self::Output;
    fn visit_binary_op(&mut self, node: &BinaryOpExpr) -> Self::Output;
    fn visit_unary_op(&mut self, node: &UnaryOpExpr) -> Self::Output;
    fn visit_ternary(&mut self, node: &TernaryExpr) -> Self::Output;
    fn visit_var_access(&mut self, node: &VarAccessExpr) -> Self::Output;
    fn visit_function_call(&mut self, node: &FunctionCallExpr) -> Self::Output;
    fn visit_array_index(&mut self, node: &ArrayIndexExpr) -> Self::Output;
    fn visit_member_access(&mut self, node: &MemberAccessExpr) -> Self::Output;
    fn visit_new(&mut self, node: &NewExpr) -> Self::Output;
    fn visit_super(&mut self, node: &SuperExpr) -> Self::Output;
    fn visit_yield(&mut self, node: &YieldExpr) -> Self::Output;
}

// ─────────────────────────────────────────────────────────────────────────────
// Class definition
// ─────────────────────────────────────────────────────────────────────────────

/// The body of a class, shared between [`ClassLiteralExpr`] and
/// [`ClassDeclarationStmt`].
///
/// Method lists are parallel `(name, literal)` pairs.  The parser guarantees
/// at most one constructor, no duplicate names within a list, and — for a
/// derived class — exactly one `super(…)` call in the constructor body.
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The class name; `<anonymous class>` when omitted.
    pub class_name: String,
    /// The constructor, when declared.
    pub constructor: Option<FunctionLiteralExpr>,
    /// Ordinary method names.
    pub method_names: Vec<String>,
    /// Ordinary methods, parallel to `method_names`.
    pub methods: Vec<FunctionLiteralExpr>,
    /// Get-accessor names.
    pub get_method_names: Vec<String>,
    /// Get-accessors, parallel to `get_method_names`.
    pub get_methods: Vec<FunctionLiteralExpr>,
    /// Set-accessor names.
    pub set_method_names: Vec<String>,
    /// Set-accessors, parallel to `set_method_names`.
    pub set_methods: Vec<FunctionLiteralExpr>,
    /// Static method names.
    pub static_method_names: Vec<String>,
    /// Static methods, parallel to `static_method_names`.
    pub static_methods: Vec<FunctionLiteralExpr>,
    /// The base-class expression of a derived class.
    pub base_class: Option<Box<Expr>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A Mildew statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `var / let / const` declaration.
    VarDeclaration(VarDeclarationStmt),
    /// `{ … }` block (also the whole program).
    Block(BlockStmt),
    /// `if (cond) … [else …]`
    If(IfStmt),
    /// `switch (expr) { case …: … default: … }`
    Switch(SwitchStmt),
    /// `while (cond) body`
    While(WhileStmt),
    /// `do body while (cond);`
    DoWhile(DoWhileStmt),
    /// `for (init; cond; inc) body`
    For(ForStmt),
    /// `for (let a[, b] of|in expr) body`
    ForOf(ForOfStmt),
    /// `break [label];` or `continue [label];`
    BreakOrContinue(BreakOrContinueStmt),
    /// `return [expr];`
    Return(ReturnStmt),
    /// `function name(args) { … }`
    FunctionDeclaration(FunctionDeclarationStmt),
    /// `throw expr;`
    Throw(ThrowStmt),
    /// `try { … } [catch (name) { … }] [finally { … }]`
    TryBlock(TryBlockStmt),
    /// `delete object.member;` or `delete object[index];`
    Delete(DeleteStmt),
    /// `class Name [extends Base] { … }`
    ClassDeclaration(ClassDeclarationStmt),
    /// `expr;` — wraps no expression for the empty `;`.
    Expression(ExpressionStmt),
}

/// `var / let / const declarators ;`
#[derive(Debug, Clone)]
pub struct VarDeclarationStmt {
    /// Source line number.
    pub line: u32,
    /// The `var`, `let`, or `const` keyword token.
    pub qualifier_token: Token,
    /// One entry per declarator: either a bare [`Expr::VarAccess`] or an
    /// `=`-rooted [`Expr::BinaryOp`] whose left side is a `VarAccess`
    /// (parser-checked).
    pub assignments: Vec<Expr>,
}

/// `{ statements }`
#[derive(Debug, Clone)]
pub struct BlockStmt {
    /// Source line number.
    pub line: u32,
    /// Statements in the block.
    pub statements: Vec<Stmt>,
}

/// `if (condition) on_true [else on_false]`
#[derive(Debug, Clone)]
pub struct IfStmt {
    /// Source line number.
    pub line: u32,
    /// The condition expression.
    pub condition: Expr,
    /// The taken branch.
    pub on_true: Box<Stmt>,
    /// The not-taken branch, when present.
    pub on_false: Option<Box<Stmt>>,
}

/// `switch (expression) { … }`
///
/// Case bodies are flattened into one statement vector; each folded case key
/// maps to the index of the first statement it covers.
#[derive(Debug, Clone)]
pub struct SwitchStmt {
    /// Source line number.
    pub line: u32,
    /// The discriminant expression.
    pub expression: Expr,
    /// The flattened statements of all case bodies, in source order.
    pub statements: Vec<Stmt>,
    /// Index of the first statement after `default:`, when present.
    pub default_index: Option<usize>,
    /// Compile-time-folded case key → first covered statement index.
    pub jump_table: FxHashMap<ScriptAny, usize>,
}

/// `while (condition) body`
#[derive(Debug, Clone)]
pub struct WhileStmt {
    /// Source line number.
    pub line: u32,
    /// The loop label; empty when unlabeled.
    pub label: String,
    /// The loop condition.
    pub condition: Expr,
    /// The loop body.
    pub body: Box<Stmt>,
}

/// `do body while (condition);`
#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    /// Source line number.
    pub line: u32,
    /// The loop label; empty when unlabeled.
    pub label: String,
    /// The loop body.
    pub body: Box<Stmt>,
    /// The loop condition.
    pub condition: Expr,
}

/// `for (init; condition; increment) body`
#[derive(Debug, Clone)]
pub struct ForStmt {
    /// Source line number.
    pub line: u32,
    /// The loop label; empty when unlabeled.
    pub label: String,
    /// The optional initializer statement (declaration or expression).
    pub init: Option<Box<Stmt>>,
    /// The optional loop condition.
    pub condition: Option<Expr>,
    /// The optional per-iteration expression.
    pub increment: Option<Expr>,
    /// The loop body.
    pub body: Box<Stmt>,
}

/// `for (qualifier bindings of|in iterable) body`
#[derive(Debug, Clone)]
pub struct ForOfStmt {
    /// Source line number.
    pub line: u32,
    /// The loop label; empty when unlabeled.
    pub label: String,
    /// The `let` or `const` keyword token.
    pub qualifier_token: Token,
    /// The `of` identifier token or the `in` keyword token.
    pub of_in_token: Token,
    /// The declared binding tokens; at most two (parser-checked).
    pub bindings: Vec<Token>,
    /// The iterated object.
    pub iterable: Expr,
    /// The loop body.
    pub body: Box<Stmt>,
}

/// `break [label];` or `continue [label];`
#[derive(Debug, Clone)]
pub struct BreakOrContinueStmt {
    /// Source line number.
    pub line: u32,
    /// The `break` or `continue` keyword token.
    pub token: Token,
    /// The optional target label; must name an enclosing loop.
    pub label: Option<String>,
}

/// `return [expression];`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    /// Source line number.
    pub line: u32,
    /// The returned expression, when present.
    pub expression: Option<Expr>,
}

/// `function name(args) { statements }`
#[derive(Debug, Clone)]
pub struct FunctionDeclarationStmt {
    /// Source line number.
    pub line: u32,
    /// The declared function name.
    pub name: String,
    /// Parameter names in declaration order.
    pub arg_names: Vec<String>,
    /// Default-value expressions for the trailing parameters.
    pub default_arguments: Vec<Expr>,
    /// Body statements.
    pub statements: Vec<Stmt>,
    /// `true` for `function *name() { … }`.
    pub is_generator: bool,
}

/// `throw expression;`
#[derive(Debug, Clone)]
pub struct ThrowStmt {
    /// Source line number.
    pub line: u32,
    /// The thrown expression.
    pub expression: Expr,
}

/// `try { … } [catch (name) { … }] [finally { … }]`
///
/// The catch and finally blocks are independently optional, but the parser
/// requires at least one of them.
#[derive(Debug, Clone)]
pub struct TryBlockStmt {
    /// Source line number.
    pub line: u32,
    /// The guarded block.
    pub try_block: Box<Stmt>,
    /// The caught exception's binding name; empty without a catch clause.
    pub exception_name: String,
    /// The catch block, when present.
    pub catch_block: Option<Box<Stmt>>,
    /// The finally block, when present.
    pub finally_block: Option<Box<Stmt>>,
}

/// `delete target;` where `target` is a member access or array index
/// (parser-checked).
#[derive(Debug, Clone)]
pub struct DeleteStmt {
    /// Source line number.
    pub line: u32,
    /// The `delete` keyword token.
    pub delete_token: Token,
    /// The member-access or array-index expression to remove.
    pub target: Expr,
}

/// `class Name [extends Base] { … }`
#[derive(Debug, Clone)]
pub struct ClassDeclarationStmt {
    /// Source line number.
    pub line: u32,
    /// The `class` keyword token.
    pub class_token: Token,
    /// The shared class definition.
    pub definition: Rc<ClassDefinition>,
}

/// `expression ;` — `expression` is `None` for the empty statement `;`.
#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    /// Source line number.
    pub line: u32,
    /// The wrapped expression, when present.
    pub expression: Option<Expr>,
}

impl Stmt {
    /// The source line number of this statement.
    pub fn line(&self) -> u32 {
        match self {
            Stmt::VarDeclaration(s) => s.line,
            Stmt::Block(s) => s.line,
            Stmt::If(s) => s.line,
            Stmt::Switch(s) => s.line,
            Stmt::While(s) => s.line,
            Stmt::DoWhile(s) => s.line,
            Stmt::For(s) => s.line,
            Stmt::ForOf(s) => s.line,
            Stmt::BreakOrContinue(s) => s.line,
            Stmt::Return(s) => s.line,
            Stmt::FunctionDeclaration(s) => s.line,
            Stmt::Throw(s) => s.line,
            Stmt::TryBlock(s) => s.line,
            Stmt::Delete(s) => s.line,
            Stmt::ClassDeclaration(s) => s.line,
            Stmt::Expression(s) => s.line,
        }
    }

    /// Dispatch to the visitor method matching this variant.
    pub fn accept<V: StmtVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Stmt::VarDeclaration(node) => visitor.visit_var_declaration(node),
            Stmt::Block(node) => visitor.visit_block(node),
            Stmt::If(node) => visitor.visit_if(node),
            Stmt::Switch(node) => visitor.visit_switch(node),
            Stmt::While(node) => visitor.visit_while(node),
            Stmt::DoWhile(node) => visitor.visit_do_while(node),
            Stmt::For(node) => visitor.visit_for(node),
            Stmt::ForOf(node) => visitor.visit_for_of(node),
            Stmt::BreakOrContinue(node) => visitor.visit_break_or_continue(node),
            Stmt::Return(node) => visitor.visit_return(node),
            Stmt::FunctionDeclaration(node) => visitor.visit_function_declaration(node),
            Stmt::Throw(node) => visitor.visit_throw(node),
            Stmt::TryBlock(node) => visitor.visit_try_block(node),
            Stmt::Delete(node) => visitor.visit_delete(node),
            Stmt::ClassDeclaration(node) => visitor.visit_class_declaration(node),
            Stmt::Expression(node) => visitor.visit_expression(node),
        }
    }
}

/// One method per [`Stmt`] variant, mirroring [`ExprVisitor`].
pub trait StmtVisitor {
    /// The value produced per node.
    type Output;

    fn visit_var_declaration(&mut self, node: &VarDeclarationStmt) -> Self::Output;
    fn visit_block(&mut self, node: &BlockStmt) -> Self::Output;
    fn visit_if(&mut self, node: &IfStmt) -> Self::Output;
    fn visit_switch(&mut self, node: &SwitchStmt) -> Self::Output;
    fn visit_while(&mut self, node: &WhileStmt) -> Self::Output;
    fn visit_do_while(&mut self, node: &DoWhileStmt) -> Self::Output;
    fn visit_for(&mut self, node: &ForStmt) -> Self::Output;
    fn visit_for_of(&mut self, node: &ForOfStmt) -> Self::Output;
    fn visit_break_or_continue(&mut self, node: &BreakOrContinueStmt) -> Self::Output;
    fn visit_return(&mut self, node: &ReturnStmt) -> Self::Output;
    fn visit_function_declaration(&mut self, node: &FunctionDeclarationStmt) -> Self::Output;
    fn visit_throw(&mut self, node: &ThrowStmt) -> Self::Output;
    fn visit_try_block(&mut self, node: &TryBlockStmt) -> Self::Output;
    fn visit_delete(&mut self, node: &DeleteStmt) -> Self::Output;
    fn visit_class_declaration(&mut self, node: &ClassDeclarationStmt) -> Self::Output;
    fn visit_expression(&mut self, node: &ExpressionStmt) -> Self::Output;
}

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────

fn join_exprs(exprs: &[Expr], sep: &str) -> String {
    exprs
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

fn join_stmts(stmts: &[Stmt]) -> String {
    stmts
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a parameter list, attaching defaults to the trailing parameters.
fn fmt_params(names: &[String], defaults: &[Expr]) -> String {
    let plain = names.len() - defaults.len();
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i >= plain {
                format!("{} = {}", name, defaults[i - plain])
            } else {
                name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(node) => match node.token.kind {
                crate::parser::lexer::TokenKind::Str => write!(f, "\"{}\"", node.token.text),
                _ => write!(f, "{}", node.token.text),
            },
            Expr::FunctionLiteral(node) => write!(
                f,
                "function {}({}) {{{}}}",
                node.optional_name,
                fmt_params(&node.arg_names, &node.default_arguments),
                join_stmts(&node.statements)
            ),
            Expr::Lambda(node) => match &node.body {
                LambdaBody::Block(stmts) => write!(
                    f,
                    "({}) => {{{}}}",
                    fmt_params(&node.arg_names, &node.default_arguments),
                    join_stmts(stmts)
                ),
                LambdaBody::Expression(expr) => write!(
                    f,
                    "({}) => {}",
                    fmt_params(&node.arg_names, &node.default_arguments),
                    expr
                ),
            },
            Expr::TemplateString(node) => {
                write!(f, "`")?;
                for child in &node.nodes {
                    match child {
                        Expr::Literal(lit)
                            if lit.token.kind == crate::parser::lexer::TokenKind::Str =>
                        {
                            write!(f, "{}", lit.token.text)?;
                        }
                        other => write!(f, "${{{other}}}")?,
                    }
                }
                write!(f, "`")
            }
            Expr::ArrayLiteral(node) => write!(f, "[{}]", join_exprs(&node.elements, ", ")),
            Expr::ObjectLiteral(node) => {
                write!(f, "{{")?;
                for (i, (key, value)) in node.keys.iter().zip(&node.values).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Expr::ClassLiteral(node) => write!(f, "{}", node.definition),
            Expr::BinaryOp(node) => write!(
                f,
                "({} {} {})",
                node.left,
                node.op_token.symbol(),
                node.right
            ),
            Expr::UnaryOp(node) => {
                if node.is_postfix {
                    write!(f, "({}{})", node.operand, node.op_token.symbol())
                } else if node.op_token.kind == crate::parser::lexer::TokenKind::Keyword {
                    write!(f, "({} {})", node.op_token.symbol(), node.operand)
                } else {
                    write!(f, "({}{})", node.op_token.symbol(), node.operand)
                }
            }
            Expr::Ternary(node) => write!(
                f,
                "({} ? {} : {})",
                node.condition, node.on_true, node.on_false
            ),
            Expr::VarAccess(node) => write!(f, "{}", node.name()),
            Expr::FunctionCall(node) => {
                write!(f, "{}({})", node.callee, join_exprs(&node.arguments, ", "))
            }
            Expr::ArrayIndex(node) => write!(f, "{}[{}]", node.object, node.index),
            Expr::MemberAccess(node) => write!(f, "{}.{}", node.object, node.member),
            Expr::New(node) => write!(
                f,
                "new {}({})",
                node.call.callee,
                join_exprs(&node.call.arguments, ", ")
            ),
            Expr::Super(_) => write!(f, "super"),
            Expr::Yield(node) => match &node.expression {
                Some(expr) => write!(f, "yield {expr}"),
                None => write!(f, "yield"),
            },
        }
    }
}

impl fmt::Display for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.class_name)?;
        if let Some(base) = &self.base_class {
            write!(f, " extends {base}")?;
        }
        write!(f, " {{")?;
        if let Some(ctor) = &self.constructor {
            write!(
                f,
                " constructor({}) {{{}}}",
                fmt_params(&ctor.arg_names, &ctor.default_arguments),
                join_stmts(&ctor.statements)
            )?;
        }
        for (name, method) in self.method_names.iter().zip(&self.methods) {
            write!(
                f,
                " {name}({}) {{{}}}",
                fmt_params(&method.arg_names, &method.default_arguments),
                join_stmts(&method.statements)
            )?;
        }
        for (name, method) in self.get_method_names.iter().zip(&self.get_methods) {
            write!(f, " get {name}() {{{}}}", join_stmts(&method.statements))?;
        }
        for (name, method) in self.set_method_names.iter().zip(&self.set_methods) {
            write!(
                f,
                " set {name}({}) {{{}}}",
                fmt_params(&method.arg_names, &method.default_arguments),
                join_stmts(&method.statements)
            )?;
        }
        for (name, method) in self.static_method_names.iter().zip(&self.static_methods) {
            write!(
                f,
                " static {name}({}) {{{}}}",
                fmt_params(&method.arg_names, &method.default_arguments),
                join_stmts(&method.statements)
            )?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::VarDeclaration(node) => write!(
                f,
                "{} {};",
                node.qualifier_token.text,
                join_exprs(&node.assignments, ", ")
            ),
            Stmt::Block(node) => write!(f, "{{{}}}", join_stmts(&node.statements)),
            Stmt::If(node) => {
                write!(f, "if ({}) {}", node.condition, node.on_true)?;
                if let Some(on_false) = &node.on_false {
                    write!(f, " else {on_false}")?;
                }
                Ok(())
            }
            Stmt::Switch(node) => write!(
                f,
                "switch ({}) {{{}}}",
                node.expression,
                join_stmts(&node.statements)
            ),
            Stmt::While(node) => {
                if !node.label.is_empty() {
                    write!(f, "{}: ", node.label)?;
                }
                write!(f, "while ({}) {}", node.condition, node.body)
            }
            Stmt::DoWhile(node) => {
                if !node.label.is_empty() {
                    write!(f, "{}: ", node.label)?;
                }
                write!(f, "do {} while ({});", node.body, node.condition)
            }
            Stmt::For(node) => {
                if !node.label.is_empty() {
                    write!(f, "{}: ", node.label)?;
                }
                write!(f, "for (")?;
                match &node.init {
                    Some(init) => write!(f, "{init}")?,
                    None => write!(f, ";")?,
                }
                match &node.condition {
                    Some(cond) => write!(f, " {cond};")?,
                    None => write!(f, ";")?,
                }
                if let Some(inc) = &node.increment {
                    write!(f, " {inc}")?;
                }
                write!(f, ") {}", node.body)
            }
            Stmt::ForOf(node) => {
                if !node.label.is_empty() {
                    write!(f, "{}: ", node.label)?;
                }
                let names = node
                    .bindings
                    .iter()
                    .map(|t| t.text.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "for ({} {} {} {}) {}",
                    node.qualifier_token.text, names, node.of_in_token.text, node.iterable,
                    node.body
                )
            }
            Stmt::BreakOrContinue(node) => match &node.label {
                Some(label) => write!(f, "{} {label};", node.token.text),
                None => write!(f, "{};", node.token.text),
            },
            Stmt::Return(node) => match &node.expression {
                Some(expr) => write!(f, "return {expr};"),
                None => write!(f, "return;"),
            },
            Stmt::FunctionDeclaration(node) => write!(
                f,
                "function {}{}({}) {{{}}}",
                if node.is_generator { "*" } else { "" },
                node.name,
                fmt_params(&node.arg_names, &node.default_arguments),
                join_stmts(&node.statements)
            ),
            Stmt::Throw(node) => write!(f, "throw {};", node.expression),
            Stmt::TryBlock(node) => {
                write!(f, "try {}", node.try_block)?;
                if let Some(catch_block) = &node.catch_block {
                    write!(f, " catch ({}) {}", node.exception_name, catch_block)?;
                }
                if let Some(finally_block) = &node.finally_block {
                    write!(f, " finally {finally_block}")?;
                }
                Ok(())
            }
            Stmt::Delete(node) => write!(f, "delete {};", node.target),
            Stmt::ClassDeclaration(node) => write!(f, "{}", node.definition),
            Stmt::Expression(node) => match &node.expression {
                Some(expr) => write!(f, "{expr};"),
                None => write!(f, ";"),
            },
        }
    }
}
