//! Recursive-descent parser.
//!
//! Grounded in `original_source/brewparse.py`'s grammar and precedence table
//! (lowest to highest): `||`, `&&`, the six comparison operators (one level,
//! left-associative), `+ -`, `* /`, then unary `neg`/`!` bind tightest.
//! Productions are implemented as one function per precedence level, each
//! calling the next-tighter level and folding same-level operators in a loop
//! — the usual precedence-climbing shape, mirroring the lexer's small
//! single-purpose functions (`lexer.rs`).

use std::rc::Rc;

use smol_str::SmolStr;

use crate::ast::{
    BinaryOp, Call, Expr, FuncDef, Lambda, MethodCall, Param, ParamKind, Program, Stmt, UnaryOp,
};
use crate::error::{Error, Result};
use crate::lexer::{self, Lexer};
use crate::token::{Token, TokenKind};

/// Parse a complete program: one or more `func` definitions.
pub fn parse(source: &str) -> Result<Program> {
    Parser::new(source).parse_program()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
    /// Lookahead buffer; `buf[0]` is the next unconsumed token.
    buf: Vec<Token>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            source,
            buf: Vec::new(),
        }
    }

    fn fill(&mut self, n: usize) -> Result<()> {
        while self.buf.len() <= n {
            let token = self.lexer.next_token()?;
            self.buf.push(token);
        }
        Ok(())
    }

    fn peek_kind(&mut self, n: usize) -> Result<TokenKind> {
        self.fill(n)?;
        Ok(self.buf[n].kind)
    }

    fn current(&mut self) -> Result<Token> {
        self.fill(0)?;
        Ok(self.buf[0].clone())
    }

    fn bump(&mut self) -> Result<Token> {
        self.fill(0)?;
        Ok(self.buf.remove(0))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.bump()?;
        if token.kind != kind {
            return Err(Error::syntax(
                format!("expected {kind:?}, found {:?}", token.kind),
                Some(token.line),
            ));
        }
        Ok(token)
    }

    fn text(&self, token: &Token) -> &'a str {
        token.fragment(self.source)
    }

    // -- top level -----------------------------------------------------

    fn parse_program(&mut self) -> Result<Program> {
        let mut functions = Vec::new();
        while self.peek_kind(0)? != TokenKind::Eof {
            functions.push(Rc::new(self.parse_func()?));
        }
        Ok(Program { functions })
    }

    fn parse_func(&mut self) -> Result<FuncDef> {
        self.expect(TokenKind::Func)?;
        let name_tok = self.expect(TokenKind::Ident)?;
        let name = SmolStr::new(self.text(&name_tok));
        self.expect(TokenKind::LeftParen)?;
        let params = self.parse_formal_args()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::LeftBrace)?;
        let body = self.parse_statements_until(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace)?;
        Ok(FuncDef { name, params, body })
    }

    fn parse_formal_args(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        if self.peek_kind(0)? == TokenKind::RightParen {
            return Ok(params);
        }
        loop {
            let kind = if self.peek_kind(0)? == TokenKind::Ref {
                self.bump()?;
                ParamKind::Reference
            } else {
                ParamKind::Value
            };
            let name_tok = self.expect(TokenKind::Ident)?;
            params.push(Param {
                name: SmolStr::new(self.text(&name_tok)),
                kind,
            });
            if self.peek_kind(0)? == TokenKind::Comma {
                self.bump()?;
                continue;
            }
            break;
        }
        Ok(params)
    }

    fn parse_statements_until(&mut self, stop: TokenKind) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            let kind = self.peek_kind(0)?;
            if kind == stop {
                break;
            }
            if kind == TokenKind::Eof {
                let line = self.current()?.line;
                return Err(Error::syntax(
                    format!("unexpected end of file, expected {stop:?}"),
                    Some(line),
                ));
            }
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    // -- statements ------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Stmt> {
        match self.peek_kind(0)? {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            _ => {
                if self.is_assignment_start()? {
                    self.parse_assignment()
                } else {
                    let expr = self.parse_expr()?;
                    self.expect(TokenKind::Semi)?;
                    Ok(Stmt::ExprStmt(expr))
                }
            }
        }
    }

    /// A statement starting with `NAME` is an assignment iff it is followed
    /// (after an optional `.NAME`) by `=`; otherwise it is an expression
    /// statement (in practice always an `fcall`/`mcall`).
    fn is_assignment_start(&mut self) -> Result<bool> {
        if self.peek_kind(0)? != TokenKind::Ident {
            return Ok(false);
        }
        match self.peek_kind(1)? {
            TokenKind::Assign => Ok(true),
            TokenKind::Dot => {
                Ok(self.peek_kind(2)? == TokenKind::Ident && self.peek_kind(3)? == TokenKind::Assign)
            }
            _ => Ok(false),
        }
    }

    fn parse_assignment(&mut self) -> Result<Stmt> {
        let name_tok = self.expect(TokenKind::Ident)?;
        let line = name_tok.line;
        let mut name = self.text(&name_tok).to_string();
        if self.peek_kind(0)? == TokenKind::Dot {
            self.bump()?;
            let name2_tok = self.expect(TokenKind::Ident)?;
            name.push('.');
            name.push_str(self.text(&name2_tok));
        }
        self.expect(TokenKind::Assign)?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Assign {
            name: SmolStr::new(name),
            expr,
            line,
        })
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::If)?.line;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::LeftBrace)?;
        let then_branch = self.parse_statements_until(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace)?;

        let else_branch = if self.peek_kind(0)? == TokenKind::Else {
            self.bump()?;
            self.expect(TokenKind::LeftBrace)?;
            let stmts = self.parse_statements_until(TokenKind::RightBrace)?;
            self.expect(TokenKind::RightBrace)?;
            Some(stmts)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            line,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::While)?.line;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::LeftBrace)?;
        let body = self.parse_statements_until(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace)?;
        Ok(Stmt::While {
            condition,
            body,
            line,
        })
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::Return)?.line;
        if self.peek_kind(0)? == TokenKind::Semi {
            self.bump()?;
            return Ok(Stmt::Return { expr: None, line });
        }
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Return {
            expr: Some(expr),
            line,
        })
    }

    // -- expressions, precedence climbing low to high ---------------------

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.peek_kind(0)? == TokenKind::OrOr {
            let line = self.bump()?.line;
            let rhs = self.parse_and()?;
            lhs = Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_comparison()?;
        while self.peek_kind(0)? == TokenKind::AndAnd {
            let line = self.bump()?.line;
            let rhs = self.parse_comparison()?;
            lhs = Expr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            };
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind(0)? {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::LessEq => BinaryOp::LessEq,
                TokenKind::GreaterEq => BinaryOp::GreaterEq,
                _ => break,
            };
            let line = self.bump()?.line;
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind(0)? {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let line = self.bump()?.line;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind(0)? {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            let line = self.bump()?.line;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.peek_kind(0)? {
            TokenKind::Minus => {
                let line = self.bump()?.line;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                    line,
                })
            }
            TokenKind::Not => {
                let line = self.bump()?.line;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                    line,
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.current()?;
        match token.kind {
            TokenKind::Number => {
                self.bump()?;
                let text = self.text(&token);
                let value: i64 = text.parse().map_err(|_| {
                    Error::syntax(format!("integer literal out of range: {text}"), Some(token.line))
                })?;
                Ok(Expr::Int(value))
            }
            TokenKind::String => {
                self.bump()?;
                Ok(Expr::Str(SmolStr::new(lexer::string_contents(&token, self.source))))
            }
            TokenKind::True => {
                self.bump()?;
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.bump()?;
                Ok(Expr::Bool(false))
            }
            TokenKind::Nil => {
                self.bump()?;
                Ok(Expr::Nil)
            }
            TokenKind::At => {
                self.bump()?;
                Ok(Expr::ObjectLiteral { line: token.line })
            }
            TokenKind::LeftParen => {
                self.bump()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }
            TokenKind::Lambda => self.parse_lambda(),
            TokenKind::Ident => self.parse_ident_expr(),
            other => Err(Error::syntax(
                format!("unexpected token {other:?}"),
                Some(token.line),
            )),
        }
    }

    fn parse_lambda(&mut self) -> Result<Expr> {
        self.expect(TokenKind::Lambda)?;
        self.expect(TokenKind::LeftParen)?;
        let params = self.parse_formal_args()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::LeftBrace)?;
        let body = self.parse_statements_until(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace)?;
        Ok(Expr::Lambda(Rc::new(Lambda { params, body })))
    }

    /// A bare `NAME`: a variable (possibly dotted), a function call, or a
    /// method call — disambiguated by what follows.
    fn parse_ident_expr(&mut self) -> Result<Expr> {
        let name_tok = self.bump()?;
        let line = name_tok.line;
        let name = self.text(&name_tok).to_string();

        if self.peek_kind(0)? == TokenKind::Dot {
            self.bump()?;
            let name2_tok = self.expect(TokenKind::Ident)?;
            let name2 = self.text(&name2_tok).to_string();

            if self.peek_kind(0)? == TokenKind::LeftParen {
                self.bump()?;
                let args = self.parse_args()?;
                self.expect(TokenKind::RightParen)?;
                return Ok(Expr::MethodCall(MethodCall {
                    objref: SmolStr::new(name),
                    name: SmolStr::new(name2),
                    args,
                    line,
                }));
            }

            return Ok(Expr::Var {
                name: SmolStr::new(format!("{name}.{name2}")),
                line,
            });
        }

        if self.peek_kind(0)? == TokenKind::LeftParen {
            self.bump()?;
            let args = self.parse_args()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(Expr::Call(Call {
                name: SmolStr::new(name),
                args,
                line,
            }));
        }

        Ok(Expr::Var {
            name: SmolStr::new(name),
            line,
        })
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek_kind(0)? == TokenKind::RightParen {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.peek_kind(0)? == TokenKind::Comma {
                self.bump()?;
                continue;
            }
            break;
        }
        Ok(args)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_ok(source: &str) -> Program {
        parse(source).unwrap_or_else(|err| panic!("parse failed: {err}"))
    }

    #[test]
    fn test_empty_function() {
        let program = parse_ok("func main() { }");
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.functions[0].name, "main");
        assert!(program.functions[0].body.is_empty());
    }

    #[test]
    fn test_overloads_by_arity() {
        let program = parse_ok(
            "func f(a) { return a; } func f(a, b) { return a + b; } func main() { }",
        );
        assert_eq!(program.functions.len(), 3);
        assert_eq!(program.functions[0].params.len(), 1);
        assert_eq!(program.functions[1].params.len(), 2);
    }

    #[test]
    fn test_ref_param() {
        let program = parse_ok("func inc(ref a) { a = a + 1; }");
        assert_eq!(program.functions[0].params[0].kind, ParamKind::Reference);
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3), not (1 + 2) * 3.
        let program = parse_ok("func main() { x = 1 + 2 * 3; }");
        let Stmt::Assign { expr, .. } = &program.functions[0].body[0] else {
            panic!("expected assignment");
        };
        let Expr::Binary { op: BinaryOp::Add, rhs, .. } = expr else {
            panic!("expected top-level +");
        };
        assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_logical_operators_are_strict_binary_nodes() {
        let program = parse_ok("func main() { x = false && side(x); }");
        let Stmt::Assign { expr, .. } = &program.functions[0].body[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn test_fcall_as_statement() {
        let program = parse_ok("func main() { print(\"hi\"); }");
        assert!(matches!(program.functions[0].body[0], Stmt::ExprStmt(Expr::Call(_))));
    }

    #[test]
    fn test_if_else() {
        let program = parse_ok("func main() { if (true) { x = 1; } else { x = 2; } }");
        let Stmt::If { else_branch, .. } = &program.functions[0].body[0] else {
            panic!("expected if");
        };
        assert!(else_branch.is_some());
    }

    #[test]
    fn test_while_loop() {
        let program = parse_ok("func main() { while (x < 10) { x = x + 1; } }");
        assert!(matches!(program.functions[0].body[0], Stmt::While { .. }));
    }

    #[test]
    fn test_lambda_expression() {
        let program = parse_ok("func main() { f = lambda() { return 1; }; }");
        let Stmt::Assign { expr, .. } = &program.functions[0].body[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(expr, Expr::Lambda(_)));
    }

    #[test]
    fn test_dotted_assignment_target() {
        let program = parse_ok("func main() { a.b = 1; }");
        let Stmt::Assign { name, .. } = &program.functions[0].body[0] else {
            panic!("expected assignment");
        };
        assert_eq!(name, "a.b");
    }

    #[test]
    fn test_method_call_expression() {
        let program = parse_ok("func main() { a.foo(1, 2); }");
        assert!(matches!(
            program.functions[0].body[0],
            Stmt::ExprStmt(Expr::MethodCall(_))
        ));
    }

    #[test]
    fn test_object_literal() {
        let program = parse_ok("func main() { a = @; }");
        let Stmt::Assign { expr, .. } = &program.functions[0].body[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(expr, Expr::ObjectLiteral { .. }));
    }

    #[test]
    fn test_unterminated_block_is_syntax_error() {
        assert!(parse("func main() { ").is_err());
    }

    #[test]
    fn test_return_with_and_without_expression() {
        let program = parse_ok("func main() { return; } func g() { return 1; }");
        assert!(matches!(
            program.functions[0].body[0],
            Stmt::Return { expr: None, .. }
        ));
        assert!(matches!(
            program.functions[1].body[0],
            Stmt::Return { expr: Some(_), .. }
        ));
    }
}
