//! Mildew parser.
//!
//! A Pratt-style operator-precedence expression parser fused with a
//! recursive-descent statement parser.  [`Parser::parse_program`] consumes
//! the token vector produced by the [`Lexer`](crate::parser::lexer::Lexer)
//! and returns the program as one [`Stmt::Block`], or fails fast with a
//! [`MildewError::Compile`] carrying the offending token and position.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{MildewError, MildewResult};
use crate::parser::ast::{
    BlockStmt, BreakOrContinueStmt, ClassDeclarationStmt, ClassDefinition, ClassLiteralExpr,
    DeleteStmt, DoWhileStmt, Expr, ExpressionStmt, ForOfStmt, ForStmt, FunctionCallExpr,
    FunctionDeclarationStmt, FunctionLiteralExpr, IfStmt, LambdaBody, LambdaExpr, NewExpr,
    ReturnStmt, Stmt, SuperExpr, SwitchStmt, TemplateStringExpr, ThrowStmt, TryBlockStmt,
    VarDeclarationStmt, WhileStmt, YieldExpr,
};
use crate::parser::lexer::{Lexer, LiteralFlag, Token, TokenKind};
use crate::values::any::ScriptAny;

// ─────────────────────────────────────────────────────────────────────────────
// Precedence tables
// ─────────────────────────────────────────────────────────────────────────────

/// Precedence of `token` as a unary operator; 0 when it is not one in the
/// requested (prefix/postfix) role.
fn unary_op_precedence(token: &Token, is_postfix: bool) -> i32 {
    if token.is_keyword("typeof") && !is_postfix {
        return 17;
    }
    match token.kind {
        TokenKind::BitNot | TokenKind::Not | TokenKind::Plus | TokenKind::Dash => {
            if is_postfix {
                0
            } else {
                17
            }
        }
        TokenKind::Inc | TokenKind::Dec => {
            if is_postfix {
                18
            } else {
                17
            }
        }
        _ => 0,
    }
}

/// Precedence of `token` as a binary (or member/index/call/ternary)
/// operator; 0 when it is not one.
fn binary_op_precedence(token: &Token) -> i32 {
    if token.is_keyword("instanceof") {
        return 12;
    }
    match token.kind {
        TokenKind::LeftBracket | TokenKind::Dot | TokenKind::LeftParen => 20,
        TokenKind::Pow => 16,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 15,
        TokenKind::Plus | TokenKind::Dash => 14,
        TokenKind::ShiftLeft | TokenKind::ShiftRight | TokenKind::UnsignedShiftRight => 13,
        TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => 12,
        TokenKind::Equals
        | TokenKind::NotEquals
        | TokenKind::StrictEquals
        | TokenKind::StrictNotEquals => 11,
        TokenKind::BitAnd => 10,
        TokenKind::BitXor => 9,
        TokenKind::BitOr => 8,
        TokenKind::And => 7,
        TokenKind::Or => 6,
        TokenKind::NullCoalesce => 5,
        TokenKind::Question => 4,
        _ if token.is_assignment_operator() => 3,
        _ => 0,
    }
}

/// Returns `true` for left-associative binary operators.  `**`, `?:`, and
/// the assignment family associate to the right.
fn is_binary_op_left_assoc(token: &Token) -> bool {
    if token.is_keyword("instanceof") {
        return true;
    }
    match token.kind {
        TokenKind::Pow | TokenKind::Question => false,
        _ if token.is_assignment_operator() => false,
        _ => binary_op_precedence(token) > 0,
    }
}

/// A statement beginning with any of these opens a (possibly labeled) loop.
fn token_begins_loop(token: &Token) -> bool {
    token.kind == TokenKind::Label
        || token.is_keyword("while")
        || token.is_keyword("do")
        || token.is_keyword("for")
}

// ─────────────────────────────────────────────────────────────────────────────
// Function context
// ─────────────────────────────────────────────────────────────────────────────

/// What kind of function body the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionContextKind {
    Normal,
    Constructor,
    Method,
    Generator,
}

/// One frame of the function-context stack; pushed on entry to any function,
/// method, or constructor body.
#[derive(Debug)]
struct FunctionContext {
    kind: FunctionContextKind,
    loop_depth: usize,
    switch_depth: usize,
    label_stack: SmallVec<[String; 4]>,
}

impl FunctionContext {
    fn new(kind: FunctionContextKind) -> Self {
        Self {
            kind,
            loop_depth: 0,
            switch_depth: 0,
            label_stack: SmallVec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Recursive-descent / precedence-climbing parser over a token vector.
///
/// # Example
///
/// ```
/// use mildew_core::parser::lexer::Lexer;
/// use mildew_core::parser::parser::Parser;
///
/// let mut lexer = Lexer::new("let x = 1 + 2 * 3;");
/// let tokens = lexer.tokenize();
/// assert!(!lexer.has_errors());
/// let program = Parser::new(tokens).parse_program().unwrap();
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    token_index: usize,
    current_token: Option<Token>,
    function_context_stack: Vec<FunctionContext>,
    base_class_stack: Vec<Expr>,
}

impl Parser {
    /// Create a parser over the token vector, pre-reading the first token.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut parser = Self {
            tokens,
            token_index: 0,
            current_token: None,
            function_context_stack: Vec::new(),
            base_class_stack: Vec::new(),
        };
        parser.next_token();
        parser
    }

    /// Parse the whole token stream into the program block.
    pub fn parse_program(&mut self) -> MildewResult<Stmt> {
        self.function_context_stack
            .push(FunctionContext::new(FunctionContextKind::Normal));
        let statements = self.parse_statements(TokenKind::Eof)?;
        self.function_context_stack.pop();
        Ok(Stmt::Block(BlockStmt {
            line: 1,
            statements,
        }))
    }

    /// Parse a single expression.  Used by the template-string sub-parser
    /// and by test drivers.
    pub fn parse_expression(&mut self) -> MildewResult<Expr> {
        self.parse_expression_prec(1)
    }

    /// Returns `true` when the parser has consumed everything but the EOF
    /// token.
    pub fn at_eof(&self) -> bool {
        match &self.current_token {
            Some(token) => token.kind == TokenKind::Eof,
            None => true,
        }
    }

    // ── Token-stream plumbing ───────────────────────────────────────────────

    fn next_token(&mut self) {
        if self.token_index >= self.tokens.len() {
            self.current_token = None;
        } else {
            self.current_token = Some(self.tokens[self.token_index].clone());
            self.token_index += 1;
        }
    }

    /// The token after the current one; a default EOF token past the end.
    fn peek_token(&self) -> Token {
        self.tokens
            .get(self.token_index)
            .cloned()
            .unwrap_or_default()
    }

    /// The `count` tokens after the current one, padded with EOF tokens.
    fn peek_tokens(&self, count: usize) -> SmallVec<[Token; 3]> {
        (0..count)
            .map(|i| {
                self.tokens
                    .get(self.token_index + i)
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }

    fn check_eof(&self, location: &str) -> MildewResult<()> {
        if self.current_token.is_none() {
            return Err(MildewError::Compile(format!("Unexpected EOF in {location}")));
        }
        Ok(())
    }

    /// The current token, or a compile error naming `location`.
    fn current(&self, location: &str) -> MildewResult<&Token> {
        self.current_token
            .as_ref()
            .ok_or_else(|| MildewError::Compile(format!("Unexpected EOF in {location}")))
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current_token.as_ref().map(|t| t.kind)
    }

    /// Require the current token to have `kind`, then advance past it.
    fn consume(&mut self, kind: TokenKind, location: &str) -> MildewResult<()> {
        match &self.current_token {
            None => Err(MildewError::Compile(format!(
                "Unexpected EOF, expected {kind} in {location}"
            ))),
            Some(token) if token.kind != kind => Err(MildewError::Compile(format!(
                "Unexpected token {token} expected {kind} in {location} at {}",
                token.position
            ))),
            Some(_) => {
                self.next_token();
                Ok(())
            }
        }
    }

    /// Require the current token to be the given keyword, then advance.
    fn consume_keyword(&mut self, text: &str, location: &str) -> MildewResult<()> {
        match &self.current_token {
            None => Err(MildewError::Compile(format!(
                "Unexpected EOF, expected keyword {text} in {location}"
            ))),
            Some(token) if !token.is_keyword(text) => Err(MildewError::Compile(format!(
                "Unexpected token {token} expected keyword {text} in {location} at {}",
                token.position
            ))),
            Some(_) => {
                self.next_token();
                Ok(())
            }
        }
    }

    fn innermost_context(&mut self) -> &mut FunctionContext {
        self.function_context_stack
            .last_mut()
            .expect("the program frame is pushed before any statement is parsed")
    }

    // ── Expression parsing ──────────────────────────────────────────────────

    /// Precedence-climbing expression parser.  `min_prec` is the loosest
    /// operator precedence this call may consume.
    fn parse_expression_prec(&mut self, min_prec: i32) -> MildewResult<Expr> {
        self.check_eof("expression")?;
        let current = self.current("expression")?.clone();
        let un_op_prec = unary_op_precedence(&current, false);
        let mut left = if un_op_prec > min_prec {
            let op_token = current;
            self.next_token();
            let operand = self.parse_primary_expression()?;
            Expr::unary(op_token, operand, false)
        } else {
            self.parse_primary_expression()?
        };

        loop {
            let Some(token) = self.current_token.clone() else {
                break;
            };
            let postfix_prec = unary_op_precedence(&token, true);
            let bin_prec = binary_op_precedence(&token);
            if bin_prec < min_prec && postfix_prec < min_prec {
                break;
            }

            if postfix_prec >= min_prec {
                // A postfix operator binds tighter than a pending prefix
                // operator, so rotate it inside the prefix node.
                left = match left {
                    Expr::UnaryOp(parent) if !parent.is_postfix => Expr::unary(
                        parent.op_token,
                        Expr::unary(token, *parent.operand, true),
                        false,
                    ),
                    other => Expr::unary(token, other, true),
                };
                self.next_token();
                continue;
            }

            let op_token = token;
            let prec = bin_prec;
            let next_min_prec = if is_binary_op_left_assoc(&op_token) {
                prec + 1
            } else {
                prec
            };
            self.next_token();

            match op_token.kind {
                TokenKind::Question => {
                    let on_true = self.parse_expression()?;
                    self.consume(TokenKind::Colon, "ternary expression")?;
                    let on_false = self.parse_expression()?;
                    left = Expr::ternary(left, on_true, on_false);
                }
                TokenKind::Dot => {
                    let right = self.parse_primary_expression()?;
                    if !matches!(right, Expr::VarAccess(_)) {
                        return Err(MildewError::Compile(format!(
                            "Right hand side of `.` operator must be identifier at {}",
                            op_token.position
                        )));
                    }
                    left = Self::rotate_into_prefix(left, un_op_prec, prec, |object| {
                        Expr::member_access(object, op_token, right)
                    });
                }
                TokenKind::LeftBracket => {
                    let index = self.parse_expression()?;
                    self.consume(TokenKind::RightBracket, "index expression")?;
                    left = Self::rotate_into_prefix(left, un_op_prec, prec, |object| {
                        Expr::array_index(object, index)
                    });
                }
                TokenKind::LeftParen => {
                    let arguments = self.parse_comma_separated_expressions(TokenKind::RightParen)?;
                    self.consume(TokenKind::RightParen, "function call")?;
                    left = Self::rotate_into_prefix(left, un_op_prec, prec, |callee| {
                        Expr::function_call(callee, arguments, false)
                    });
                }
                _ => {
                    let right = self.parse_expression_prec(next_min_prec)?;
                    if op_token.is_assignment_operator()
                        && !matches!(
                            left,
                            Expr::VarAccess(_) | Expr::MemberAccess(_) | Expr::ArrayIndex(_)
                        )
                    {
                        return Err(MildewError::Compile(format!(
                            "Invalid left hand operand for assignment {} at {}",
                            left, op_token.position
                        )));
                    }
                    left = Expr::binary(op_token, left, right);
                }
            }
        }
        Ok(left)
    }

    /// When a member/index/call operator binds tighter than the prefix
    /// operator that opened this expression, the access applies to the
    /// prefix operand and the prefix node stays outermost.  Any other shape
    /// cannot arise here; the assertion documents that.
    fn rotate_into_prefix(
        left: Expr,
        un_op_prec: i32,
        prec: i32,
        build: impl FnOnce(Expr) -> Expr,
    ) -> Expr {
        if un_op_prec != 0 && prec > un_op_prec {
            if let Expr::UnaryOp(parent) = left {
                if !parent.is_postfix {
                    return Expr::unary(parent.op_token, build(*parent.operand), false);
                }
                debug_assert!(false, "prefix rotation reached a postfix node");
                return build(Expr::UnaryOp(parent));
            }
            debug_assert!(false, "prefix rotation reached a non-unary node");
            return build(left);
        }
        build(left)
    }

    fn parse_primary_expression(&mut self) -> MildewResult<Expr> {
        let current = self.current("primary expression")?.clone();
        match current.kind {
            TokenKind::LeftParen => {
                // Three tokens of lookahead split lambda parameter lists
                // from parenthesized groups.
                let lookahead = self.peek_tokens(3);
                if (lookahead[1].kind == TokenKind::Comma
                    || lookahead[1].kind == TokenKind::Arrow
                    || lookahead[2].kind == TokenKind::Arrow)
                    && lookahead[0].kind != TokenKind::LeftParen
                {
                    self.parse_lambda(true)
                } else {
                    self.next_token();
                    let inner = self.parse_expression()?;
                    self.check_eof("parenthesis expression")?;
                    self.consume(TokenKind::RightParen, "primary expression")?;
                    Ok(inner)
                }
            }
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Integer | TokenKind::Double | TokenKind::Regex => {
                self.next_token();
                Ok(Expr::literal(current))
            }
            TokenKind::Str => {
                let node = if current.literal_flag == LiteralFlag::Template {
                    self.parse_template_string(&current)?
                } else {
                    Expr::literal(current)
                };
                self.next_token();
                Ok(node)
            }
            TokenKind::Keyword => match current.text.as_str() {
                "true" | "false" | "null" | "undefined" => {
                    self.next_token();
                    Ok(Expr::literal(current))
                }
                "function" => self.parse_function_literal(),
                "class" => self.parse_class_expression(),
                "new" => self.parse_new_expression(),
                "super" => self.parse_super(),
                "yield" => self.parse_yield(),
                other => Err(MildewError::Compile(format!(
                    "Unexpected keyword {other} in primary expression at {}",
                    current.position
                ))),
            },
            TokenKind::Identifier => {
                if self.peek_token().kind == TokenKind::Arrow {
                    self.parse_lambda(false)
                } else {
                    self.next_token();
                    Ok(Expr::var_access(current))
                }
            }
            TokenKind::LeftBracket => {
                self.next_token();
                let elements = self.parse_comma_separated_expressions(TokenKind::RightBracket)?;
                self.consume(TokenKind::RightBracket, "array literal")?;
                Ok(Expr::ArrayLiteral(crate::parser::ast::ArrayLiteralExpr {
                    elements,
                }))
            }
            _ => Err(MildewError::Compile(format!(
                "Unexpected token {current} in primary expression at {}",
                current.position
            ))),
        }
    }

    /// Comma-separated expressions up to (but not consuming) `stop`.  Also
    /// stops at the `of`/`in` markers so for-of heads can share this path.
    fn parse_comma_separated_expressions(&mut self, stop: TokenKind) -> MildewResult<Vec<Expr>> {
        let mut expressions = Vec::new();
        loop {
            let Some(token) = self.current_token.clone() else {
                break;
            };
            if token.kind == stop
                || token.kind == TokenKind::Eof
                || token.is_identifier("of")
                || token.is_keyword("in")
            {
                break;
            }
            expressions.push(self.parse_expression()?);
            match &self.current_token {
                Some(token) if token.kind == TokenKind::Comma => self.next_token(),
                Some(token)
                    if token.kind != stop && !token.is_identifier("of") && !token.is_keyword("in") =>
                {
                    return Err(MildewError::Compile(format!(
                        "Comma separated list items must be separated by ',' not {token} or missing {stop} at {}",
                        token.position
                    )));
                }
                _ => {}
            }
        }
        Ok(expressions)
    }

    /// A parenthesized parameter list: plain identifiers with optional
    /// trailing defaults.  Leaves the closing `)` current.
    fn parse_argument_list(&mut self) -> MildewResult<(Vec<String>, Vec<Expr>)> {
        let mut arg_names = Vec::new();
        let mut default_arguments = Vec::new();
        loop {
            let token = self.current("argument list")?.clone();
            if token.kind == TokenKind::RightParen || token.kind == TokenKind::Eof {
                break;
            }
            arg_names.push(token.text.clone());
            self.consume(TokenKind::Identifier, "argument list")?;
            if self.current_kind() == Some(TokenKind::Assign) {
                self.next_token();
                default_arguments.push(self.parse_expression()?);
            } else if !default_arguments.is_empty() {
                return Err(MildewError::Compile(format!(
                    "Default arguments must be last at {}",
                    token.position
                )));
            }
            match &self.current_token {
                Some(t) if t.kind == TokenKind::Comma => self.next_token(),
                Some(t) if t.kind != TokenKind::RightParen => {
                    return Err(MildewError::Compile(format!(
                        "Arguments must be separated by comma not {t} at {}",
                        t.position
                    )));
                }
                _ => {}
            }
        }
        Ok((arg_names, default_arguments))
    }

    fn parse_function_literal(&mut self) -> MildewResult<Expr> {
        let token = self.current("function literal")?.clone();
        self.next_token(); // function
        let mut is_generator = false;
        if self.current_kind() == Some(TokenKind::Star) {
            is_generator = true;
            self.next_token();
        }
        let mut optional_name = String::new();
        if self.current_kind() == Some(TokenKind::Identifier) {
            optional_name = self.current("function literal")?.text.clone();
            self.next_token();
        }
        self.consume(TokenKind::LeftParen, "function literal")?;
        let (arg_names, default_arguments) = self.parse_argument_list()?;
        self.consume(TokenKind::RightParen, "function literal")?;
        self.consume(TokenKind::LeftBrace, "function literal")?;
        self.function_context_stack.push(FunctionContext::new(
            if is_generator {
                FunctionContextKind::Generator
            } else {
                FunctionContextKind::Normal
            },
        ));
        let statements = self.parse_statements(TokenKind::RightBrace)?;
        self.function_context_stack.pop();
        self.consume(TokenKind::RightBrace, "function literal")?;
        Ok(Expr::FunctionLiteral(FunctionLiteralExpr {
            token,
            arg_names,
            default_arguments,
            statements,
            optional_name,
            is_class: false,
            is_generator,
        }))
    }

    fn parse_lambda(&mut self, has_parentheses: bool) -> MildewResult<Expr> {
        let mut arg_names = Vec::new();
        let mut default_arguments = Vec::new();
        if has_parentheses {
            self.next_token(); // (
            let (names, defaults) = self.parse_argument_list()?;
            arg_names = names;
            default_arguments = defaults;
            self.consume(TokenKind::RightParen, "lambda expression")?;
        } else {
            let token = self.current("lambda expression")?.clone();
            arg_names.push(token.text);
            self.consume(TokenKind::Identifier, "lambda expression")?;
        }
        let arrow_token = self.current("lambda expression")?.clone();
        self.consume(TokenKind::Arrow, "lambda expression")?;
        if self.current_kind() == Some(TokenKind::LeftBrace) {
            self.next_token();
            let statements = self.parse_statements(TokenKind::RightBrace)?;
            self.consume(TokenKind::RightBrace, "lambda expression")?;
            Ok(Expr::Lambda(LambdaExpr {
                arrow_token,
                arg_names,
                default_arguments,
                body: LambdaBody::Block(statements),
            }))
        } else {
            let expression = self.parse_expression()?;
            Ok(Expr::Lambda(LambdaExpr {
                arrow_token,
                arg_names,
                default_arguments,
                body: LambdaBody::Expression(Box::new(expression)),
            }))
        }
    }

    fn parse_object_literal(&mut self) -> MildewResult<Expr> {
        self.next_token(); // {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        while self.current("object literal")?.kind != TokenKind::RightBrace {
            let key_token = self.current("object literal")?.clone();
            if !matches!(
                key_token.kind,
                TokenKind::Identifier | TokenKind::Str | TokenKind::Label
            ) {
                return Err(MildewError::Compile(format!(
                    "Invalid key for object literal {key_token} at {}",
                    key_token.position
                )));
            }
            keys.push(key_token.text.clone());
            self.next_token();
            // A Label key already carries its own ':'.
            if key_token.kind != TokenKind::Label {
                self.consume(TokenKind::Colon, "object literal")?;
            }
            values.push(self.parse_expression()?);
            match &self.current_token {
                Some(t) if t.kind == TokenKind::Comma => self.next_token(),
                Some(t) if t.kind != TokenKind::RightBrace => {
                    return Err(MildewError::Compile(format!(
                        "Key value pairs must be separated by ',' not {t} at {}",
                        t.position
                    )));
                }
                _ => {}
            }
        }
        self.next_token(); // }
        Ok(Expr::ObjectLiteral(crate::parser::ast::ObjectLiteralExpr {
            keys,
            values,
        }))
    }

    fn parse_new_expression(&mut self) -> MildewResult<Expr> {
        self.next_token(); // new
        let expression = self.parse_expression()?;
        let call = match expression {
            Expr::FunctionCall(call) => FunctionCallExpr {
                callee: call.callee,
                arguments: call.arguments,
                return_this: true,
            },
            other => FunctionCallExpr {
                callee: Box::new(other),
                arguments: Vec::new(),
                return_this: true,
            },
        };
        Ok(Expr::New(NewExpr { call }))
    }

    fn parse_super(&mut self) -> MildewResult<Expr> {
        let token = self.current("super expression")?.clone();
        let Some(base_class) = self.base_class_stack.last().cloned() else {
            return Err(MildewError::Compile(format!(
                "Super expression only allowed in derived classes at {}",
                token.position
            )));
        };
        self.next_token(); // super
        Ok(Expr::Super(SuperExpr {
            token,
            base_class: Box::new(base_class),
        }))
    }

    fn parse_yield(&mut self) -> MildewResult<Expr> {
        let token = self.current("yield expression")?.clone();
        let in_generator = self
            .function_context_stack
            .last()
            .map(|ctx| ctx.kind == FunctionContextKind::Generator)
            .unwrap_or(false);
        if !in_generator {
            return Err(MildewError::Compile(format!(
                "Yield may only be used in Generator functions at {}",
                token.position
            )));
        }
        self.next_token(); // yield
        let expression = match self.current_kind() {
            Some(TokenKind::RightBrace) | Some(TokenKind::Semicolon) | None => None,
            _ => Some(Box::new(self.parse_expression()?)),
        };
        Ok(Expr::Yield(YieldExpr { token, expression }))
    }

    // ── Template strings ────────────────────────────────────────────────────

    /// Re-scan a template token's body, alternating literal and expression
    /// states.  Each `${…}` substring runs through a fresh [`Lexer`] and
    /// [`Parser::parse_expression`].
    fn parse_template_string(&mut self, token: &Token) -> MildewResult<Expr> {
        let bytes = token.text.as_bytes();
        let mut literal_state = true;
        let mut index: usize = 0;
        let mut current_expr: Vec<u8> = Vec::new();
        let mut current_lit: Vec<u8> = Vec::new();
        let mut nodes = Vec::new();
        let mut bracket_depth = 0usize;

        while index < bytes.len() {
            if literal_state {
                if bytes[index] == b'$' && bytes.get(index + 1) == Some(&b'{') {
                    index += 2;
                    literal_state = false;
                    current_expr.clear();
                    if !current_lit.is_empty() {
                        let text = String::from_utf8_lossy(&current_lit).into_owned();
                        nodes.push(Expr::literal(Token::fake(TokenKind::Str, &text)));
                        current_lit.clear();
                    }
                } else {
                    current_lit.push(bytes[index]);
                    index += 1;
                }
            } else if bytes[index] == b'}' {
                if bracket_depth > 0 {
                    bracket_depth -= 1;
                    current_expr.push(bytes[index]);
                    index += 1;
                } else {
                    index += 1;
                    literal_state = true;
                    if !current_expr.is_empty() {
                        let source = String::from_utf8_lossy(&current_expr).into_owned();
                        let mut lexer = Lexer::new(&source);
                        let sub_tokens = lexer.tokenize();
                        if lexer.has_errors() {
                            return Err(MildewError::Compile(format!(
                                "Invalid characters in template expression at {}",
                                token.position
                            )));
                        }
                        let mut sub_parser = Parser::new(sub_tokens);
                        nodes.push(sub_parser.parse_expression()?);
                        if !sub_parser.at_eof() {
                            return Err(MildewError::Compile(format!(
                                "Unexpected token in template expression at {}",
                                token.position
                            )));
                        }
                    }
                }
            } else {
                if bytes[index] == b'{' {
                    bracket_depth += 1;
                }
                current_expr.push(bytes[index]);
                index += 1;
            }
        }
        if !literal_state {
            return Err(MildewError::Compile(format!(
                "Unclosed template expression at {}",
                token.position
            )));
        }
        if !current_lit.is_empty() {
            let text = String::from_utf8_lossy(&current_lit).into_owned();
            nodes.push(Expr::literal(Token::fake(TokenKind::Str, &text)));
        }
        Ok(Expr::TemplateString(TemplateStringExpr { nodes }))
    }

    // ── Compile-time folding ────────────────────────────────────────────────

    /// Fold a literal expression to its static value; `None` when the
    /// expression is not a recognized literal.
    fn evaluate_ctfe(expr: &Expr) -> Option<ScriptAny> {
        let Expr::Literal(literal) = expr else {
            return None;
        };
        let token = &literal.token;
        if token.is_keyword("true") {
            return Some(ScriptAny::from(true));
        }
        if token.is_keyword("false") {
            return Some(ScriptAny::from(false));
        }
        if token.is_keyword("null") {
            return Some(ScriptAny::Null);
        }
        if token.is_keyword("undefined") {
            return Some(ScriptAny::Undefined);
        }
        match token.kind {
            TokenKind::Double => token.text.parse::<f64>().ok().map(ScriptAny::from),
            TokenKind::Str if token.literal_flag != LiteralFlag::Template => {
                Some(ScriptAny::from(token.text.as_str()))
            }
            TokenKind::Integer => {
                let folded = match token.literal_flag {
                    LiteralFlag::Binary => i64::from_str_radix(&token.text[2..], 2).ok(),
                    LiteralFlag::Hexadecimal => i64::from_str_radix(&token.text[2..], 16).ok(),
                    LiteralFlag::Octal => i64::from_str_radix(&token.text[2..], 8).ok(),
                    _ => token.text.parse::<i64>().ok(),
                };
                folded.map(ScriptAny::from)
            }
            _ => None,
        }
    }

    // ── Statement parsing ───────────────────────────────────────────────────

    /// Statements until `stop` (not consumed).  Hitting EOF is an error
    /// unless `stop` is [`TokenKind::Eof`].
    fn parse_statements(&mut self, stop: TokenKind) -> MildewResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            match &self.current_token {
                None => {
                    if stop == TokenKind::Eof {
                        break;
                    }
                    return Err(MildewError::Compile(format!(
                        "Unexpected EOF, expected {stop} in statement list"
                    )));
                }
                Some(token) if token.kind == stop => break,
                Some(token) if token.kind == TokenKind::Eof => {
                    return Err(MildewError::Compile(format!(
                        "Unexpected EOF, expected {stop} in statement list"
                    )));
                }
                Some(_) => statements.push(self.parse_statement()?),
            }
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> MildewResult<Stmt> {
        let token = self.current("statement")?.clone();
        if token_begins_loop(&token) {
            return self.parse_loop_statement();
        }
        match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "var" | "let" | "const" => self.parse_var_declaration(true),
                "if" => self.parse_if_statement(),
                "switch" => self.parse_switch_statement(),
                "break" | "continue" => self.parse_break_or_continue(),
                "return" => self.parse_return_statement(),
                "function" => self.parse_function_declaration(),
                "throw" => self.parse_throw_statement(),
                "try" => self.parse_try_block_statement(),
                "delete" => self.parse_delete_statement(),
                "class" => self.parse_class_declaration(),
                _ => self.parse_expression_statement(),
            },
            TokenKind::LeftBrace => {
                let line = token.position.line;
                self.next_token();
                let statements = self.parse_statements(TokenKind::RightBrace)?;
                self.consume(TokenKind::RightBrace, "block statement")?;
                Ok(Stmt::Block(BlockStmt { line, statements }))
            }
            TokenKind::Semicolon => {
                self.next_token();
                Ok(Stmt::Expression(ExpressionStmt {
                    line: token.position.line,
                    expression: None,
                }))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> MildewResult<Stmt> {
        let line = self.current("expression statement")?.position.line;
        let expression = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "expression statement")?;
        Ok(Stmt::Expression(ExpressionStmt {
            line,
            expression: Some(expression),
        }))
    }

    // ── Declarations ────────────────────────────────────────────────────────

    fn parse_var_declaration(&mut self, consume_semicolon: bool) -> MildewResult<Stmt> {
        let qualifier_token = self.current("variable declaration")?.clone();
        let line = qualifier_token.position.line;
        self.next_token();

        let mut assignments = Vec::new();
        loop {
            let token = self.current("variable declaration")?.clone();
            let target = match token.kind {
                TokenKind::LeftBrace | TokenKind::LeftBracket => {
                    Expr::var_access(self.parse_destructure_target()?)
                }
                TokenKind::Identifier => {
                    self.next_token();
                    Expr::var_access(token)
                }
                _ => {
                    return Err(MildewError::Compile(format!(
                        "Expected identifier or destructuring target in variable declaration, not {token} at {}",
                        token.position
                    )));
                }
            };
            if self.current_kind() == Some(TokenKind::Assign) {
                let assign_token = self.current("variable declaration")?.clone();
                self.next_token();
                let value = self.parse_expression()?;
                assignments.push(Expr::binary(assign_token, target, value));
            } else {
                assignments.push(target);
            }
            if self.current_kind() == Some(TokenKind::Comma) {
                self.next_token();
            } else {
                break;
            }
        }

        if consume_semicolon {
            self.consume(TokenKind::Semicolon, "variable declaration")?;
        }
        Ok(Stmt::VarDeclaration(VarDeclarationStmt {
            line,
            qualifier_token,
            assignments,
        }))
    }

    /// Collapse a `{a, b, ...r}` or `[a, b, ...r]` destructuring target into
    /// a single identifier token whose text preserves the shape.
    fn parse_destructure_target(&mut self) -> MildewResult<Token> {
        let open = self.current("destructuring declaration")?.clone();
        let (close_kind, open_ch, close_ch) = if open.kind == TokenKind::LeftBrace {
            (TokenKind::RightBrace, '{', '}')
        } else {
            (TokenKind::RightBracket, '[', ']')
        };
        self.next_token();

        let mut names: Vec<String> = Vec::new();
        let mut spread_seen = false;
        loop {
            let token = self.current("destructuring declaration")?.clone();
            if token.kind == close_kind {
                break;
            }
            if spread_seen {
                return Err(MildewError::Compile(format!(
                    "Spread element must be last in destructuring declaration at {}",
                    token.position
                )));
            }
            match token.kind {
                TokenKind::TDot => {
                    self.next_token();
                    let name = self.current("destructuring declaration")?.clone();
                    self.consume(TokenKind::Identifier, "destructuring declaration")?;
                    names.push(format!("...{}", name.text));
                    spread_seen = true;
                }
                TokenKind::Identifier => {
                    self.next_token();
                    names.push(token.text);
                }
                _ => {
                    return Err(MildewError::Compile(format!(
                        "Expected identifier in destructuring declaration, not {token} at {}",
                        token.position
                    )));
                }
            }
            match &self.current_token {
                Some(t) if t.kind == TokenKind::Comma => self.next_token(),
                Some(t) if t.kind != close_kind => {
                    return Err(MildewError::Compile(format!(
                        "Destructuring targets must be separated by ',' not {t} at {}",
                        t.position
                    )));
                }
                _ => {}
            }
        }
        self.next_token(); // close bracket/brace
        let shape = format!("{}{}{}", open_ch, names.join(", "), close_ch);
        Ok(Token::with_text(TokenKind::Identifier, open.position, shape))
    }

    // ── Control flow ────────────────────────────────────────────────────────

    fn parse_if_statement(&mut self) -> MildewResult<Stmt> {
        let line = self.current("if statement")?.position.line;
        self.next_token(); // if
        self.consume(TokenKind::LeftParen, "if statement")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "if statement")?;
        let on_true = Box::new(self.parse_statement()?);
        let mut on_false = None;
        if matches!(&self.current_token, Some(t) if t.is_keyword("else")) {
            self.next_token();
            on_false = Some(Box::new(self.parse_statement()?));
        }
        Ok(Stmt::If(IfStmt {
            line,
            condition,
            on_true,
            on_false,
        }))
    }

    /// A possibly-labeled `while` / `do` / `for` statement.
    fn parse_loop_statement(&mut self) -> MildewResult<Stmt> {
        let mut label = String::new();
        let token = self.current("loop statement")?.clone();
        if token.kind == TokenKind::Label {
            label = token.text.clone();
            self.innermost_context().label_stack.push(label.clone());
            self.next_token();
        }
        let head = self.current("loop statement")?.clone();
        let result = if head.is_keyword("while") {
            self.parse_while_statement(label.clone())
        } else if head.is_keyword("do") {
            self.parse_do_while_statement(label.clone())
        } else if head.is_keyword("for") {
            self.parse_for_statement(label.clone())
        } else {
            Err(MildewError::Compile(format!(
                "Expected loop statement after label, not {head} at {}",
                head.position
            )))
        };
        if !label.is_empty() {
            self.innermost_context().label_stack.pop();
        }
        result
    }

    fn parse_while_statement(&mut self, label: String) -> MildewResult<Stmt> {
        let line = self.current("while statement")?.position.line;
        self.next_token(); // while
        self.consume(TokenKind::LeftParen, "while statement")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "while statement")?;
        self.innermost_context().loop_depth += 1;
        let body = Box::new(self.parse_statement()?);
        self.innermost_context().loop_depth -= 1;
        Ok(Stmt::While(WhileStmt {
            line,
            label,
            condition,
            body,
        }))
    }

    fn parse_do_while_statement(&mut self, label: String) -> MildewResult<Stmt> {
        let line = self.current("do-while statement")?.position.line;
        self.next_token(); // do
        self.innermost_context().loop_depth += 1;
        let body = Box::new(self.parse_statement()?);
        self.innermost_context().loop_depth -= 1;
        self.consume_keyword("while", "do-while statement")?;
        self.consume(TokenKind::LeftParen, "do-while statement")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "do-while statement")?;
        self.consume(TokenKind::Semicolon, "do-while statement")?;
        Ok(Stmt::DoWhile(DoWhileStmt {
            line,
            label,
            body,
            condition,
        }))
    }

    fn parse_for_statement(&mut self, label: String) -> MildewResult<Stmt> {
        let line = self.current("for statement")?.position.line;
        self.next_token(); // for
        self.consume(TokenKind::LeftParen, "for statement")?;

        // Initializer: empty, declaration, or expression.  A declaration may
        // turn out to head a for-of/for-in instead.
        let mut init: Option<Box<Stmt>> = None;
        if self.current_kind() == Some(TokenKind::Semicolon) {
            self.next_token();
        } else if matches!(&self.current_token,
            Some(t) if t.is_keyword("var") || t.is_keyword("let") || t.is_keyword("const"))
        {
            let declaration = self.parse_var_declaration(false)?;
            let is_of_in = matches!(&self.current_token,
                Some(t) if t.is_identifier("of") || t.is_keyword("in"));
            if is_of_in {
                return self.parse_for_of_statement(line, label, declaration);
            }
            self.consume(TokenKind::Semicolon, "for statement")?;
            init = Some(Box::new(declaration));
        } else {
            init = Some(Box::new(self.parse_expression_statement()?));
        }

        let condition = if self.current_kind() == Some(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon, "for statement")?;

        let increment = if self.current_kind() == Some(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::RightParen, "for statement")?;

        self.innermost_context().loop_depth += 1;
        let body = Box::new(self.parse_statement()?);
        self.innermost_context().loop_depth -= 1;
        Ok(Stmt::For(ForStmt {
            line,
            label,
            init,
            condition,
            increment,
            body,
        }))
    }

    /// Continue a `for (qualifier …` head as for-of/for-in once the `of` or
    /// `in` marker is current.
    fn parse_for_of_statement(
        &mut self,
        line: u32,
        label: String,
        declaration: Stmt,
    ) -> MildewResult<Stmt> {
        let of_in_token = self.current("for-of statement")?.clone();
        self.next_token();

        let Stmt::VarDeclaration(declaration) = declaration else {
            return Err(MildewError::Compile(format!(
                "Expected declaration in for-of statement at {}",
                of_in_token.position
            )));
        };
        let qualifier_token = declaration.qualifier_token.clone();
        if !qualifier_token.is_keyword("let") && !qualifier_token.is_keyword("const") {
            return Err(MildewError::Compile(format!(
                "Only let or const variables may be declared in for-of statement at {}",
                qualifier_token.position
            )));
        }
        let mut bindings = Vec::new();
        for assignment in &declaration.assignments {
            match assignment {
                Expr::VarAccess(access) => bindings.push(access.token.clone()),
                _ => {
                    return Err(MildewError::Compile(format!(
                        "For-of variables may not carry initializers at {}",
                        qualifier_token.position
                    )));
                }
            }
        }
        if bindings.is_empty() || bindings.len() > 2 {
            return Err(MildewError::Compile(format!(
                "For-of statement may declare one or two bindings at {}",
                qualifier_token.position
            )));
        }

        let iterable = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "for-of statement")?;
        self.innermost_context().loop_depth += 1;
        let body = Box::new(self.parse_statement()?);
        self.innermost_context().loop_depth -= 1;
        Ok(Stmt::ForOf(ForOfStmt {
            line,
            label,
            qualifier_token,
            of_in_token,
            bindings,
            iterable,
            body,
        }))
    }

    fn parse_break_or_continue(&mut self) -> MildewResult<Stmt> {
        let token = self.current("break or continue statement")?.clone();
        let line = token.position.line;
        let is_break = token.is_keyword("break");
        self.next_token();

        let mut label = None;
        if self.current_kind() == Some(TokenKind::Identifier) {
            label = Some(self.current("break or continue statement")?.text.clone());
            self.next_token();
        }
        self.consume(TokenKind::Semicolon, "break or continue statement")?;

        let context = self
            .function_context_stack
            .last()
            .expect("the program frame is pushed before any statement is parsed");
        if is_break {
            if context.loop_depth + context.switch_depth == 0 {
                return Err(MildewError::Compile(format!(
                    "Break statements are only allowed in loops or switch at {}",
                    token.position
                )));
            }
        } else if context.loop_depth == 0 {
            return Err(MildewError::Compile(format!(
                "Continue statements are only allowed in loops at {}",
                token.position
            )));
        }
        if let Some(name) = &label {
            if !context.label_stack.iter().any(|l| l == name) {
                return Err(MildewError::Compile(format!(
                    "Label {name} does not name an enclosing loop at {}",
                    token.position
                )));
            }
        }
        Ok(Stmt::BreakOrContinue(BreakOrContinueStmt {
            line,
            token,
            label,
        }))
    }

    fn parse_return_statement(&mut self) -> MildewResult<Stmt> {
        let line = self.current("return statement")?.position.line;
        self.next_token(); // return
        let expression = match self.current_kind() {
            Some(TokenKind::Semicolon) => None,
            _ => Some(self.parse_expression()?),
        };
        self.consume(TokenKind::Semicolon, "return statement")?;
        Ok(Stmt::Return(ReturnStmt { line, expression }))
    }

    fn parse_throw_statement(&mut self) -> MildewResult<Stmt> {
        let line = self.current("throw statement")?.position.line;
        self.next_token(); // throw
        let expression = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "throw statement")?;
        Ok(Stmt::Throw(ThrowStmt { line, expression }))
    }

    fn parse_try_block_statement(&mut self) -> MildewResult<Stmt> {
        let line = self.current("try block")?.position.line;
        self.next_token(); // try
        let try_block = Box::new(self.parse_statement()?);

        let mut exception_name = String::new();
        let mut catch_block = None;
        if matches!(&self.current_token, Some(t) if t.is_keyword("catch")) {
            self.next_token();
            self.consume(TokenKind::LeftParen, "catch block")?;
            exception_name = self.current("catch block")?.text.clone();
            self.consume(TokenKind::Identifier, "catch block")?;
            self.consume(TokenKind::RightParen, "catch block")?;
            catch_block = Some(Box::new(self.parse_statement()?));
        }
        let mut finally_block = None;
        if matches!(&self.current_token, Some(t) if t.is_keyword("finally")) {
            self.next_token();
            finally_block = Some(Box::new(self.parse_statement()?));
        }
        if catch_block.is_none() && finally_block.is_none() {
            return Err(MildewError::Compile(format!(
                "Try statements must have catch and/or finally block at line {line}"
            )));
        }
        Ok(Stmt::TryBlock(TryBlockStmt {
            line,
            try_block,
            exception_name,
            catch_block,
            finally_block,
        }))
    }

    fn parse_delete_statement(&mut self) -> MildewResult<Stmt> {
        let delete_token = self.current("delete statement")?.clone();
        let line = delete_token.position.line;
        self.next_token(); // delete
        let target = self.parse_expression()?;
        if !matches!(target, Expr::MemberAccess(_) | Expr::ArrayIndex(_)) {
            return Err(MildewError::Compile(format!(
                "Invalid operand for delete operation {} at {}",
                target, delete_token.position
            )));
        }
        self.consume(TokenKind::Semicolon, "delete statement")?;
        Ok(Stmt::Delete(DeleteStmt {
            line,
            delete_token,
            target,
        }))
    }

    fn parse_function_declaration(&mut self) -> MildewResult<Stmt> {
        let line = self.current("function declaration")?.position.line;
        self.next_token(); // function
        let mut is_generator = false;
        if self.current_kind() == Some(TokenKind::Star) {
            is_generator = true;
            self.next_token();
        }
        let name_token = self.current("function declaration")?.clone();
        self.consume(TokenKind::Identifier, "function declaration")?;
        self.consume(TokenKind::LeftParen, "function declaration")?;
        let (arg_names, default_arguments) = self.parse_argument_list()?;
        self.consume(TokenKind::RightParen, "function declaration")?;
        self.consume(TokenKind::LeftBrace, "function declaration")?;
        self.function_context_stack.push(FunctionContext::new(
            if is_generator {
                FunctionContextKind::Generator
            } else {
                FunctionContextKind::Normal
            },
        ));
        let statements = self.parse_statements(TokenKind::RightBrace)?;
        self.function_context_stack.pop();
        self.consume(TokenKind::RightBrace, "function declaration")?;
        Ok(Stmt::FunctionDeclaration(FunctionDeclarationStmt {
            line,
            name: name_token.text,
            arg_names,
            default_arguments,
            statements,
            is_generator,
        }))
    }

    // ── Switch ──────────────────────────────────────────────────────────────

    fn parse_switch_statement(&mut self) -> MildewResult<Stmt> {
        let line = self.current("switch statement")?.position.line;
        self.next_token(); // switch
        self.consume(TokenKind::LeftParen, "switch statement")?;
        let expression = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "switch statement")?;
        self.consume(TokenKind::LeftBrace, "switch statement")?;
        self.innermost_context().switch_depth += 1;

        let mut statements: Vec<Stmt> = Vec::new();
        let mut jump_table: FxHashMap<ScriptAny, usize> = FxHashMap::default();
        let mut default_index: Option<usize> = None;
        loop {
            let token = self.current("switch statement")?.clone();
            if token.kind == TokenKind::RightBrace {
                break;
            }
            if token.is_keyword("case") {
                self.next_token();
                let case_expr = self.parse_expression()?;
                self.consume(TokenKind::Colon, "switch case")?;
                let Some(folded) = Self::evaluate_ctfe(&case_expr) else {
                    return Err(MildewError::Compile(format!(
                        "Case expression must be a literal value, not {case_expr} at {}",
                        token.position
                    )));
                };
                if jump_table.contains_key(&folded) {
                    return Err(MildewError::Compile(format!(
                        "Duplicate case value {folded} in switch statement at {}",
                        token.position
                    )));
                }
                jump_table.insert(folded, statements.len());
            } else if token.is_keyword("default") {
                self.next_token();
                self.consume(TokenKind::Colon, "switch statement")?;
                if default_index.is_some() {
                    return Err(MildewError::Compile(format!(
                        "Only one default case is allowed in switch statement at {}",
                        token.position
                    )));
                }
                default_index = Some(statements.len());
            } else {
                statements.push(self.parse_statement()?);
            }
        }
        self.next_token(); // }
        self.innermost_context().switch_depth -= 1;
        Ok(Stmt::Switch(SwitchStmt {
            line,
            expression,
            statements,
            default_index,
            jump_table,
        }))
    }

    // ── Classes ─────────────────────────────────────────────────────────────

    fn parse_class_expression(&mut self) -> MildewResult<Expr> {
        let class_token = self.current("class expression")?.clone();
        self.next_token(); // class
        let mut class_name = "<anonymous class>".to_string();
        if self.current_kind() == Some(TokenKind::Identifier) {
            class_name = self.current("class expression")?.text.clone();
            self.next_token();
        }
        let definition = self.parse_class_definition(class_name)?;
        Ok(Expr::ClassLiteral(ClassLiteralExpr {
            class_token,
            definition,
        }))
    }

    fn parse_class_declaration(&mut self) -> MildewResult<Stmt> {
        let class_token = self.current("class declaration")?.clone();
        let line = class_token.position.line;
        self.next_token(); // class
        let name_token = self.current("class declaration")?.clone();
        self.consume(TokenKind::Identifier, "class declaration")?;
        let definition = self.parse_class_definition(name_token.text)?;
        Ok(Stmt::ClassDeclaration(ClassDeclarationStmt {
            line,
            class_token,
            definition,
        }))
    }

    /// Parse `[extends Base] { members }` and build the shared definition.
    fn parse_class_definition(&mut self, class_name: String) -> MildewResult<Rc<ClassDefinition>> {
        let mut base_class: Option<Box<Expr>> = None;
        if matches!(&self.current_token, Some(t) if t.is_keyword("extends")) {
            self.next_token();
            let base = self.parse_expression()?;
            self.base_class_stack.push(base.clone());
            base_class = Some(Box::new(base));
        }
        self.consume(TokenKind::LeftBrace, "class definition")?;

        let mut constructor: Option<FunctionLiteralExpr> = None;
        let mut method_names = Vec::new();
        let mut methods = Vec::new();
        let mut get_method_names = Vec::new();
        let mut get_methods = Vec::new();
        let mut set_method_names = Vec::new();
        let mut set_methods = Vec::new();
        let mut static_method_names = Vec::new();
        let mut static_methods = Vec::new();

        loop {
            let token = self.current("class definition")?.clone();
            if token.kind == TokenKind::RightBrace {
                break;
            }

            // One-token member prefix: get / set / static, unless the word
            // itself is the method name (`get() {…}`).
            let mut prefix = "";
            if token.kind == TokenKind::Identifier
                && matches!(token.text.as_str(), "get" | "set" | "static")
                && self.peek_token().kind != TokenKind::LeftParen
            {
                prefix = match token.text.as_str() {
                    "get" => "get",
                    "set" => "set",
                    _ => "static",
                };
                self.next_token();
            }

            let name_token = self.current("class definition")?.clone();
            if name_token.kind != TokenKind::Identifier {
                return Err(MildewError::Compile(format!(
                    "Expected method name in class definition, not {name_token} at {}",
                    name_token.position
                )));
            }
            self.next_token();

            let is_constructor = name_token.text == "constructor";
            if is_constructor && !prefix.is_empty() {
                return Err(MildewError::Compile(format!(
                    "Constructors may not be get, set, or static at {}",
                    name_token.position
                )));
            }
            let kind = if is_constructor {
                FunctionContextKind::Constructor
            } else {
                FunctionContextKind::Method
            };
            let method = self.parse_class_method(&name_token, kind, is_constructor)?;

            if is_constructor {
                if constructor.is_some() {
                    return Err(MildewError::Compile(format!(
                        "Classes may only have one constructor at {}",
                        name_token.position
                    )));
                }
                if base_class.is_some() {
                    Self::check_super_call(&method, &name_token)?;
                }
                constructor = Some(method);
            } else {
                let (names, literals): (&mut Vec<String>, &mut Vec<FunctionLiteralExpr>) =
                    match prefix {
                        "get" => (&mut get_method_names, &mut get_methods),
                        "set" => (&mut set_method_names, &mut set_methods),
                        "static" => (&mut static_method_names, &mut static_methods),
                        _ => (&mut method_names, &mut methods),
                    };
                if names.contains(&name_token.text) {
                    return Err(MildewError::Compile(format!(
                        "Duplicate method name {} in class definition at {}",
                        name_token.text, name_token.position
                    )));
                }
                names.push(name_token.text.clone());
                literals.push(method);
            }
        }
        self.next_token(); // }

        if base_class.is_some() {
            self.base_class_stack.pop();
        }
        Ok(Rc::new(ClassDefinition {
            class_name,
            constructor,
            method_names,
            methods,
            get_method_names,
            get_methods,
            set_method_names,
            set_methods,
            static_method_names,
            static_methods,
            base_class,
        }))
    }

    /// Parse `(args) { body }` for a class member whose name token was
    /// already consumed.
    fn parse_class_method(
        &mut self,
        name_token: &Token,
        kind: FunctionContextKind,
        is_constructor: bool,
    ) -> MildewResult<FunctionLiteralExpr> {
        self.consume(TokenKind::LeftParen, "class method")?;
        let (arg_names, default_arguments) = self.parse_argument_list()?;
        self.consume(TokenKind::RightParen, "class method")?;
        self.consume(TokenKind::LeftBrace, "class method")?;
        self.function_context_stack.push(FunctionContext::new(kind));
        let statements = self.parse_statements(TokenKind::RightBrace)?;
        self.function_context_stack.pop();
        self.consume(TokenKind::RightBrace, "class method")?;
        Ok(FunctionLiteralExpr {
            token: name_token.clone(),
            arg_names,
            default_arguments,
            statements,
            optional_name: name_token.text.clone(),
            is_class: is_constructor,
            is_generator: false,
        })
    }

    /// A derived-class constructor body must contain exactly one expression
    /// statement that is a call whose callee is `super`.
    fn check_super_call(
        constructor: &FunctionLiteralExpr,
        name_token: &Token,
    ) -> MildewResult<()> {
        let super_calls = constructor
            .statements
            .iter()
            .filter(|stmt| {
                matches!(stmt,
                    Stmt::Expression(ExpressionStmt {
                        expression: Some(Expr::FunctionCall(call)),
                        ..
                    }) if matches!(call.callee.as_ref(), Expr::Super(_)))
            })
            .count();
        if super_calls != 1 {
            return Err(MildewError::Compile(format!(
                "Derived class constructors must contain exactly one super call at {}",
                name_token.position
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let tokens = lexer.tokenize();
        assert!(
            !lexer.has_errors(),
            "unexpected lex errors for {src:?}: {:?}",
            lexer.errors()
        );
        tokens
    }

    /// Parse one expression and return it.
    fn parse_expr(src: &str) -> Expr {
        let mut parser = Parser::new(lex(src));
        let expr = parser.parse_expression().unwrap();
        assert!(parser.at_eof(), "leftover tokens after {src:?}");
        expr
    }

    /// Parse one expression and return its parenthesized rendering.
    fn render(src: &str) -> String {
        parse_expr(src).to_string()
    }

    /// Parse a whole program and return the block's statements.
    fn parse_program(src: &str) -> Vec<Stmt> {
        match Parser::new(lex(src)).parse_program() {
            Ok(Stmt::Block(block)) => block.statements,
            Ok(other) => panic!("expected block, got {other}"),
            Err(error) => panic!("unexpected compile error for {src:?}: {error}"),
        }
    }

    /// Parse a whole program expecting a compile error; returns its message.
    fn parse_error(src: &str) -> String {
        match Parser::new(lex(src)).parse_program() {
            Ok(program) => panic!("expected compile error for {src:?}, got {program}"),
            Err(error) => error.to_string(),
        }
    }

    // ── Precedence and associativity ─────────────────────────────────────────

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(render("a + b * c"), "(a + (b * c))");
        assert_eq!(render("a * b + c"), "((a * b) + c)");
    }

    #[test]
    fn test_addition_is_left_associative() {
        assert_eq!(render("a + b + c"), "((a + b) + c)");
        assert_eq!(render("a - b + c"), "((a - b) + c)");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(render("a ** b ** c"), "(a ** (b ** c))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(render("a = b = c"), "(a = (b = c))");
        assert_eq!(render("a += b -= c"), "(a += (b -= c))");
    }

    #[test]
    fn test_shift_looser_than_additive() {
        assert_eq!(render("a << b + c"), "(a << (b + c))");
        assert_eq!(render("a + b >>> c"), "((a + b) >>> c)");
    }

    #[test]
    fn test_comparison_and_equality_layers() {
        assert_eq!(render("a < b == c"), "((a < b) == c)");
        assert_eq!(render("a === b != c"), "((a === b) != c)");
        assert_eq!(render("a instanceof B == c"), "((a instanceof B) == c)");
    }

    #[test]
    fn test_bitwise_layers() {
        assert_eq!(render("a & b ^ c | d"), "(((a & b) ^ c) | d)");
    }

    #[test]
    fn test_logical_and_coalescing_layers() {
        assert_eq!(render("a && b || c ?? d"), "(((a && b) || c) ?? d)");
    }

    #[test]
    fn test_ternary_is_right_associative() {
        assert_eq!(render("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
    }

    #[test]
    fn test_ternary_over_assignment() {
        assert_eq!(render("x = a ? b : c"), "(x = (a ? b : c))");
    }

    // ── Unary operators ──────────────────────────────────────────────────────

    #[test]
    fn test_prefix_unary() {
        assert_eq!(render("-x + y"), "((-x) + y)");
        assert_eq!(render("!a && b"), "((!a) && b)");
        assert_eq!(render("typeof x == 'number'"), "((typeof x) == \"number\")");
    }

    #[test]
    fn test_postfix_rotates_inside_prefix() {
        // `-x++` keeps the prefix outermost: `-(x++)`.
        assert_eq!(render("-x++"), "(-(x++))");
        assert_eq!(render("x++"), "(x++)");
        assert_eq!(render("--x"), "(--x)");
    }

    #[test]
    fn test_member_access_rotates_inside_prefix() {
        assert_eq!(render("-x.y"), "(-x.y)");
        assert_eq!(render("typeof x.y.z"), "(typeof x.y.z)");
        assert_eq!(render("-f(a)"), "(-f(a))");
        assert_eq!(render("-x[0]"), "(-x[0])");
    }

    // ── Member / index / call chains ─────────────────────────────────────────

    #[test]
    fn test_member_index_call_chain() {
        assert_eq!(render("a.b[c](d)"), "a.b[c](d)");
        assert_eq!(render("obj.method(1, 2).field"), "obj.method(1, 2).field");
    }

    #[test]
    fn test_dot_requires_identifier_rhs() {
        let mut parser = Parser::new(lex("a.1"));
        let error = parser.parse_expression().unwrap_err().to_string();
        assert!(error.contains("must be identifier"), "{error}");
    }

    #[test]
    fn test_assignment_target_validation() {
        let error = parse_error("1 = 2;");
        assert!(error.contains("Invalid left hand operand"), "{error}");
        let error = parse_error("a + b = 2;");
        assert!(error.contains("Invalid left hand operand"), "{error}");
        // Member and index targets are fine.
        parse_program("a.b = 2;");
        parse_program("a[0] += 2;");
    }

    // ── Primary expressions ──────────────────────────────────────────────────

    #[test]
    fn test_parenthesized_group() {
        assert_eq!(render("(a + b) * c"), "((a + b) * c)");
    }

    #[test]
    fn test_array_literal() {
        let expr = parse_expr("[1, 2, 3]");
        match expr {
            Expr::ArrayLiteral(array) => assert_eq!(array.elements.len(), 3),
            other => panic!("expected array literal, got {other}"),
        }
        let empty = parse_expr("[]");
        assert!(matches!(empty, Expr::ArrayLiteral(a) if a.elements.is_empty()));
    }

    #[test]
    fn test_object_literal_keys() {
        // `a:` lexes as a label key; quoted keys need an explicit colon.
        let expr = parse_expr("{a: 1, \"b\": 2, c : 3}");
        match expr {
            Expr::ObjectLiteral(object) => {
                assert_eq!(object.keys, vec!["a", "b", "c"]);
                assert_eq!(object.values.len(), 3);
            }
            other => panic!("expected object literal, got {other}"),
        }
    }

    #[test]
    fn test_object_literal_invalid_key() {
        let mut parser = Parser::new(lex("{1: 2}"));
        let error = parser.parse_expression().unwrap_err().to_string();
        assert!(error.contains("Invalid key for object literal"), "{error}");
    }

    #[test]
    fn test_regex_literal_primary() {
        let expr = parse_expr("/abc/gi");
        match expr {
            Expr::Literal(literal) => {
                assert_eq!(literal.token.kind, TokenKind::Regex);
                assert_eq!(literal.token.text, "/abc/gi");
            }
            other => panic!("expected literal, got {other}"),
        }
    }

    #[test]
    fn test_value_keyword_literals() {
        for src in ["true", "false", "null", "undefined"] {
            let expr = parse_expr(src);
            assert!(matches!(expr, Expr::Literal(_)), "{src}");
        }
    }

    // ── Lambdas ──────────────────────────────────────────────────────────────

    #[test]
    fn test_lambda_with_parentheses() {
        assert_eq!(render("(a, b) => a + b"), "(a, b) => (a + b)");
        assert_eq!(render("() => 1"), "() => 1");
    }

    #[test]
    fn test_lambda_single_parameter() {
        let expr = parse_expr("x => x * 2");
        match expr {
            Expr::Lambda(lambda) => {
                assert_eq!(lambda.arg_names, vec!["x"]);
                assert!(matches!(lambda.body, LambdaBody::Expression(_)));
            }
            other => panic!("expected lambda, got {other}"),
        }
    }

    #[test]
    fn test_lambda_block_body() {
        let expr = parse_expr("(a) => { return a; }");
        match expr {
            Expr::Lambda(lambda) => match lambda.body {
                LambdaBody::Block(statements) => assert_eq!(statements.len(), 1),
                LambdaBody::Expression(_) => panic!("expected block body"),
            },
            other => panic!("expected lambda, got {other}"),
        }
    }

    #[test]
    fn test_lambda_default_arguments() {
        let expr = parse_expr("(a, b = 2) => a + b");
        match expr {
            Expr::Lambda(lambda) => {
                assert_eq!(lambda.arg_names.len(), 2);
                assert_eq!(lambda.default_arguments.len(), 1);
            }
            other => panic!("expected lambda, got {other}"),
        }
    }

    // ── Function literals and new ────────────────────────────────────────────

    #[test]
    fn test_function_literal_expression() {
        let expr = parse_expr("function add(a, b) { return a + b; }");
        match expr {
            Expr::FunctionLiteral(function) => {
                assert_eq!(function.optional_name, "add");
                assert_eq!(function.arg_names, vec!["a", "b"]);
                assert!(!function.is_generator);
                assert_eq!(function.statements.len(), 1);
            }
            other => panic!("expected function literal, got {other}"),
        }
    }

    #[test]
    fn test_new_expression_sets_return_this() {
        let expr = parse_expr("new Foo(1, 2)");
        match expr {
            Expr::New(new_expr) => {
                assert!(new_expr.call.return_this);
                assert_eq!(new_expr.call.arguments.len(), 2);
            }
            other => panic!("expected new expression, got {other}"),
        }
    }

    #[test]
    fn test_new_without_arguments() {
        let expr = parse_expr("new Foo");
        match expr {
            Expr::New(new_expr) => {
                assert!(new_expr.call.return_this);
                assert!(new_expr.call.arguments.is_empty());
            }
            other => panic!("expected new expression, got {other}"),
        }
    }

    // ── Template strings ─────────────────────────────────────────────────────

    #[test]
    fn test_template_string_children_alternate() {
        let expr = parse_expr("`hi ${name}`");
        match expr {
            Expr::TemplateString(template) => {
                assert_eq!(template.nodes.len(), 2);
                match &template.nodes[0] {
                    Expr::Literal(literal) => assert_eq!(literal.token.text, "hi "),
                    other => panic!("expected literal, got {other}"),
                }
                assert!(matches!(&template.nodes[1], Expr::VarAccess(v) if v.name() == "name"));
            }
            other => panic!("expected template string, got {other}"),
        }
    }

    #[test]
    fn test_template_string_nested_braces() {
        let expr = parse_expr("`v: ${ {a: 1}.a }`");
        match expr {
            Expr::TemplateString(template) => {
                assert_eq!(template.nodes.len(), 2);
                assert!(matches!(&template.nodes[1], Expr::MemberAccess(_)));
            }
            other => panic!("expected template string, got {other}"),
        }
    }

    #[test]
    fn test_template_string_leftover_tokens_error() {
        let mut parser = Parser::new(lex("`${a b}`"));
        let error = parser.parse_expression().unwrap_err().to_string();
        assert!(error.contains("template expression"), "{error}");
    }

    #[test]
    fn test_template_string_unclosed_expression_error() {
        let mut parser = Parser::new(lex("`${a`"));
        let error = parser.parse_expression().unwrap_err().to_string();
        assert!(error.contains("Unclosed template expression"), "{error}");
    }

    // ── Declarations ─────────────────────────────────────────────────────────

    #[test]
    fn test_var_declaration_tree_shape() {
        // `let x = 1 + 2 * 3;` from the front-door contract.
        let statements = parse_program("let x = 1 + 2 * 3;");
        assert_eq!(statements.len(), 1);
        match &statements[0] {
            Stmt::VarDeclaration(declaration) => {
                assert!(declaration.qualifier_token.is_keyword("let"));
                assert_eq!(declaration.assignments.len(), 1);
                match &declaration.assignments[0] {
                    Expr::BinaryOp(assign) => {
                        assert_eq!(assign.op_token.kind, TokenKind::Assign);
                        assert!(matches!(assign.left.as_ref(), Expr::VarAccess(v) if v.name() == "x"));
                        assert_eq!(assign.right.to_string(), "(1 + (2 * 3))");
                    }
                    other => panic!("expected assignment, got {other}"),
                }
            }
            other => panic!("expected declaration, got {other}"),
        }
    }

    #[test]
    fn test_var_declaration_multiple_declarators() {
        let statements = parse_program("var a, b = 2, c;");
        match &statements[0] {
            Stmt::VarDeclaration(declaration) => {
                assert_eq!(declaration.assignments.len(), 3);
                assert!(matches!(&declaration.assignments[0], Expr::VarAccess(_)));
                assert!(matches!(&declaration.assignments[1], Expr::BinaryOp(_)));
            }
            other => panic!("expected declaration, got {other}"),
        }
    }

    #[test]
    fn test_destructuring_preserves_shape() {
        let statements = parse_program("let [a, b, ...r] = rhs;");
        match &statements[0] {
            Stmt::VarDeclaration(declaration) => match &declaration.assignments[0] {
                Expr::BinaryOp(assign) => {
                    assert!(matches!(
                        assign.left.as_ref(),
                        Expr::VarAccess(v) if v.name() == "[a, b, ...r]"
                    ));
                }
                other => panic!("expected assignment, got {other}"),
            },
            other => panic!("expected declaration, got {other}"),
        }
        let statements = parse_program("const {x, y} = point;");
        match &statements[0] {
            Stmt::VarDeclaration(declaration) => match &declaration.assignments[0] {
                Expr::BinaryOp(assign) => {
                    assert!(matches!(
                        assign.left.as_ref(),
                        Expr::VarAccess(v) if v.name() == "{x, y}"
                    ));
                }
                other => panic!("expected assignment, got {other}"),
            },
            other => panic!("expected declaration, got {other}"),
        }
    }

    #[test]
    fn test_destructuring_spread_must_be_last() {
        let error = parse_error("let [...r, a] = rhs;");
        assert!(error.contains("Spread element must be last"), "{error}");
    }

    // ── Control flow ─────────────────────────────────────────────────────────

    #[test]
    fn test_if_else() {
        let statements = parse_program("if (a) b; else { c; }");
        match &statements[0] {
            Stmt::If(if_stmt) => {
                assert!(if_stmt.on_false.is_some());
            }
            other => panic!("expected if, got {other}"),
        }
    }

    #[test]
    fn test_while_and_break() {
        parse_program("while (x < 10) { x += 1; break; }");
        parse_program("do { x -= 1; } while (x > 0);");
    }

    #[test]
    fn test_break_outside_loop_is_error() {
        let error = parse_error("break;");
        assert!(error.contains("only allowed in loops"), "{error}");
    }

    #[test]
    fn test_continue_outside_loop_is_error() {
        let error = parse_error("continue;");
        assert!(error.contains("only allowed in loops"), "{error}");
    }

    #[test]
    fn test_break_allowed_in_switch_but_not_continue() {
        parse_program("switch (n) { case 1: break; }");
        let error = parse_error("switch (n) { case 1: continue; }");
        assert!(error.contains("only allowed in loops"), "{error}");
    }

    #[test]
    fn test_labeled_loop_and_break_label() {
        let statements = parse_program("outer: while (a) { break outer; }");
        match &statements[0] {
            Stmt::While(while_stmt) => assert_eq!(while_stmt.label, "outer"),
            other => panic!("expected while, got {other}"),
        }
    }

    #[test]
    fn test_unknown_break_label_is_error() {
        let error = parse_error("while (a) { break outer; }");
        assert!(error.contains("does not name an enclosing loop"), "{error}");
    }

    #[test]
    fn test_for_statement_variants() {
        parse_program("for (let i = 0; i < 10; i += 1) { f(i); }");
        parse_program("for (;;) ;");
        parse_program("for (i = 0; i < 3; i += 1) g();");
    }

    #[test]
    fn test_for_of_bindings() {
        let statements = parse_program("for (let a of arr) { f(a); }");
        match &statements[0] {
            Stmt::ForOf(for_of) => {
                assert!(for_of.qualifier_token.is_keyword("let"));
                assert!(for_of.of_in_token.is_identifier("of"));
                assert_eq!(for_of.bindings.len(), 1);
            }
            other => panic!("expected for-of, got {other}"),
        }
        let statements = parse_program("for (const k, v in obj) { f(k, v); }");
        match &statements[0] {
            Stmt::ForOf(for_of) => {
                assert!(for_of.of_in_token.is_keyword("in"));
                assert_eq!(for_of.bindings.len(), 2);
            }
            other => panic!("expected for-of, got {other}"),
        }
    }

    #[test]
    fn test_for_of_rejects_var_and_extra_bindings() {
        let error = parse_error("for (var a of arr) { }");
        assert!(error.contains("let or const"), "{error}");
        let error = parse_error("for (let a, b, c of arr) { }");
        assert!(error.contains("one or two bindings"), "{error}");
    }

    #[test]
    fn test_empty_statement() {
        let statements = parse_program(";");
        assert!(matches!(
            &statements[0],
            Stmt::Expression(ExpressionStmt {
                expression: None,
                ..
            })
        ));
    }

    // ── Switch ───────────────────────────────────────────────────────────────

    #[test]
    fn test_switch_jump_table_indices() {
        let statements =
            parse_program("switch (n) { case 1: a(); break; case 2: b(); break; default: c(); }");
        match &statements[0] {
            Stmt::Switch(switch_stmt) => {
                assert_eq!(switch_stmt.statements.len(), 5);
                assert_eq!(
                    switch_stmt.jump_table.get(&ScriptAny::from(1i64)),
                    Some(&0)
                );
                assert_eq!(
                    switch_stmt.jump_table.get(&ScriptAny::from(2i64)),
                    Some(&2)
                );
                assert_eq!(switch_stmt.default_index, Some(4));
            }
            other => panic!("expected switch, got {other}"),
        }
    }

    #[test]
    fn test_switch_folds_radix_and_string_keys() {
        let statements =
            parse_program("switch (n) { case 0x10: a(); case 'two': b(); case 2.5: c(); }");
        match &statements[0] {
            Stmt::Switch(switch_stmt) => {
                assert!(switch_stmt.jump_table.contains_key(&ScriptAny::from(16i64)));
                assert!(switch_stmt.jump_table.contains_key(&ScriptAny::from("two")));
                assert!(switch_stmt.jump_table.contains_key(&ScriptAny::from(2.5)));
                assert_eq!(switch_stmt.default_index, None);
            }
            other => panic!("expected switch, got {other}"),
        }
    }

    #[test]
    fn test_switch_duplicate_case_is_error() {
        let error = parse_error("switch (n) { case 1: foo(); break; case 1: bar(); break; }");
        assert!(error.to_lowercase().contains("duplicate case"), "{error}");
    }

    #[test]
    fn test_switch_non_literal_case_is_error() {
        let error = parse_error("switch (n) { case x + 1: foo(); }");
        assert!(error.contains("literal value"), "{error}");
    }

    #[test]
    fn test_switch_two_defaults_is_error() {
        let error = parse_error("switch (n) { default: a(); default: b(); }");
        assert!(error.contains("one default"), "{error}");
    }

    // ── Functions, yield ─────────────────────────────────────────────────────

    #[test]
    fn test_function_declaration() {
        let statements = parse_program("function add(a, b = 1) { return a + b; }");
        match &statements[0] {
            Stmt::FunctionDeclaration(function) => {
                assert_eq!(function.name, "add");
                assert_eq!(function.arg_names, vec!["a", "b"]);
                assert_eq!(function.default_arguments.len(), 1);
                assert!(!function.is_generator);
            }
            other => panic!("expected function declaration, got {other}"),
        }
    }

    #[test]
    fn test_generator_function_with_yield() {
        let statements = parse_program("function *g() { yield 1; yield 2; }");
        match &statements[0] {
            Stmt::FunctionDeclaration(function) => {
                assert!(function.is_generator);
                assert_eq!(function.statements.len(), 2);
                for statement in &function.statements {
                    assert!(matches!(
                        statement,
                        Stmt::Expression(ExpressionStmt {
                            expression: Some(Expr::Yield(_)),
                            ..
                        })
                    ));
                }
            }
            other => panic!("expected function declaration, got {other}"),
        }
    }

    #[test]
    fn test_yield_outside_generator_is_error() {
        let error = parse_error("function f() { yield 1; }");
        assert!(error.contains("Generator functions"), "{error}");
        let error = parse_error("yield 1;");
        assert!(error.contains("Generator functions"), "{error}");
    }

    #[test]
    fn test_default_arguments_must_be_last() {
        let error = parse_error("function f(a = 1, b) { }");
        assert!(error.contains("Default arguments must be last"), "{error}");
    }

    // ── Throw / try / delete ─────────────────────────────────────────────────

    #[test]
    fn test_throw_statement() {
        let statements = parse_program("throw err;");
        assert!(matches!(&statements[0], Stmt::Throw(_)));
    }

    #[test]
    fn test_try_catch_finally_combinations() {
        parse_program("try { f(); } catch (e) { g(e); }");
        parse_program("try { f(); } finally { h(); }");
        let statements = parse_program("try { f(); } catch (e) { g(e); } finally { h(); }");
        match &statements[0] {
            Stmt::TryBlock(try_block) => {
                assert_eq!(try_block.exception_name, "e");
                assert!(try_block.catch_block.is_some());
                assert!(try_block.finally_block.is_some());
            }
            other => panic!("expected try block, got {other}"),
        }
    }

    #[test]
    fn test_try_requires_catch_or_finally() {
        let error = parse_error("try { f(); }");
        assert!(error.contains("catch and/or finally"), "{error}");
    }

    #[test]
    fn test_delete_requires_member_or_index() {
        parse_program("delete a.b;");
        parse_program("delete a[0];");
        let error = parse_error("delete a;");
        assert!(error.contains("Invalid operand for delete"), "{error}");
    }

    // ── Classes ──────────────────────────────────────────────────────────────

    #[test]
    fn test_class_declaration_member_classification() {
        let statements = parse_program(
            "class Point { constructor(x, y) { } norm() { } get x() { } set x(v) { } static origin() { } }",
        );
        match &statements[0] {
            Stmt::ClassDeclaration(class) => {
                let definition = &class.definition;
                assert_eq!(definition.class_name, "Point");
                assert!(definition.constructor.is_some());
                assert_eq!(definition.method_names, vec!["norm"]);
                assert_eq!(definition.get_method_names, vec!["x"]);
                assert_eq!(definition.set_method_names, vec!["x"]);
                assert_eq!(definition.static_method_names, vec!["origin"]);
                assert!(definition.base_class.is_none());
            }
            other => panic!("expected class declaration, got {other}"),
        }
    }

    #[test]
    fn test_class_expression() {
        let expr = parse_expr("class { run() { } }");
        match expr {
            Expr::ClassLiteral(class) => {
                assert_eq!(class.definition.class_name, "<anonymous class>");
                assert_eq!(class.definition.method_names, vec!["run"]);
            }
            other => panic!("expected class literal, got {other}"),
        }
    }

    #[test]
    fn test_class_duplicate_method_is_error() {
        let error = parse_error("class C { f() { } f() { } }");
        assert!(error.contains("Duplicate method name"), "{error}");
    }

    #[test]
    fn test_class_two_constructors_is_error() {
        let error = parse_error("class C { constructor() { } constructor() { } }");
        assert!(error.contains("one constructor"), "{error}");
    }

    #[test]
    fn test_class_constructor_forbids_prefixes() {
        let error = parse_error("class C { static constructor() { } }");
        assert!(error.contains("Constructors may not be"), "{error}");
    }

    #[test]
    fn test_method_named_get_is_not_an_accessor() {
        let statements = parse_program("class C { get() { } }");
        match &statements[0] {
            Stmt::ClassDeclaration(class) => {
                assert_eq!(class.definition.method_names, vec!["get"]);
                assert!(class.definition.get_method_names.is_empty());
            }
            other => panic!("expected class declaration, got {other}"),
        }
    }

    #[test]
    fn test_derived_class_requires_single_super_call() {
        parse_program("class B extends A { constructor() { super(1); } }");
        let error = parse_error("class B extends A { constructor() { } }");
        assert!(error.contains("exactly one super call"), "{error}");
        let error = parse_error("class B extends A { constructor() { super(); super(); } }");
        assert!(error.contains("exactly one super call"), "{error}");
    }

    #[test]
    fn test_super_outside_derived_class_is_error() {
        let error = parse_error("super;");
        assert!(error.contains("derived classes"), "{error}");
        let error = parse_error("class C { constructor() { super(); } }");
        assert!(error.contains("derived classes"), "{error}");
    }

    #[test]
    fn test_super_method_call_in_derived_method() {
        parse_program("class B extends A { constructor() { super(); } go() { super.go(); } }");
    }

    // ── Regex / division end to end ──────────────────────────────────────────

    #[test]
    fn test_regex_and_division_through_parser() {
        let statements = parse_program("let re = /ab+c/i; let q = x / 2;");
        assert_eq!(statements.len(), 2);
    }
}
