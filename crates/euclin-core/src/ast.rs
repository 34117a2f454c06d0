//! Arena-allocated AST consumed by the code generator.
//!
//! Nodes borrow from a [`bumpalo::Bump`] arena and stay valid for the arena's
//! lifetime. Every expression carries its literal source text: the lambda
//! hoister deduplicates on it and diagnostics quote it.
//!
//! The parser lives outside this workspace. [`AstBuilder`] builds the same
//! trees programmatically and renders canonical source text for each node
//! (`f(a,b)`, `(a,b)`, `{_}`), which is what tests and benchmarks use.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use euclin_core::ast::AstBuilder;
//!
//! let arena = Bump::new();
//! let ast = AstBuilder::new(&arena);
//! let call = ast.call("f", &[ast.float(1.0), ast.lambda(ast.placeholder())]);
//! assert_eq!(call.text(), "f(1.0,{_})");
//! ```

use std::cell::Cell;

use bumpalo::Bump;

use crate::Span;

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    /// The name.
    pub name: &'ast str,
    /// Source location.
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Pair construction `(a, b)`
    Couple(&'ast CoupleExpr<'ast>),
    /// Variable or function-name reference
    Var(VarExpr<'ast>),
    /// The lambda placeholder `_`
    LambdaVar(LambdaVarExpr),
    /// Inline lambda literal `{ body }`
    Lambda(&'ast LambdaExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Couple(e) => e.span,
            Self::Var(e) => e.ident.span,
            Self::LambdaVar(e) => e.span,
            Self::Lambda(e) => e.span,
            Self::Call(e) => e.span,
        }
    }

    /// Literal source text of this expression.
    pub fn text(&self) -> &'ast str {
        match self {
            Self::Literal(e) => e.text,
            Self::Couple(e) => e.text,
            Self::Var(e) => e.ident.name,
            Self::LambdaVar(_) => LambdaVarExpr::TEXT,
            Self::Lambda(e) => e.text,
            Self::Call(e) => e.text,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    /// The literal kind
    pub kind: LiteralKind<'ast>,
    /// Source text
    pub text: &'ast str,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Boolean literal
    Bool(bool),
    /// String literal, without quotes
    String(&'ast str),
    /// The unit value `()`
    Unit,
}

/// A pair construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoupleExpr<'ast> {
    /// First element
    pub first: Expr<'ast>,
    /// Second element
    pub second: Expr<'ast>,
    /// Source text
    pub text: &'ast str,
    /// Source location
    pub span: Span,
}

/// A name reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarExpr<'ast> {
    /// The referenced name
    pub ident: Ident<'ast>,
}

/// The lambda placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaVarExpr {
    /// Source location
    pub span: Span,
}

impl LambdaVarExpr {
    /// Source form of the placeholder.
    pub const TEXT: &'static str = "_";
}

/// An inline lambda with one implicit Real parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaExpr<'ast> {
    /// Lambda body
    pub body: Expr<'ast>,
    /// Source text of the whole lambda, braces included
    pub text: &'ast str,
    /// Source location
    pub span: Span,
}

/// A call to a named function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// Called function
    pub callee: Ident<'ast>,
    /// Actual arguments
    pub args: &'ast [Expr<'ast>],
    /// Source text
    pub text: &'ast str,
    /// Source location
    pub span: Span,
}

/// One instruction of a block or function body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction<'ast> {
    /// Bare expression
    Expr(Expr<'ast>),
    /// Explicit `return`
    Return(ReturnInstr<'ast>),
    /// Function declaration
    FunctionDecl(&'ast FunctionDecl<'ast>),
}

impl<'ast> Instruction<'ast> {
    /// Get the span of this instruction.
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(e) => e.span(),
            Self::Return(r) => r.span,
            Self::FunctionDecl(d) => d.span,
        }
    }
}

/// `return value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnInstr<'ast> {
    /// Returned value
    pub value: Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A function declaration. Its signature is resolved by name against the
/// function table supplied to the compiler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    /// Declared name
    pub name: Ident<'ast>,
    /// Body
    pub body: FunctionBody<'ast>,
    /// Source location
    pub span: Span,
}

/// The instructions of a function body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionBody<'ast> {
    /// Instructions, in order
    pub instructions: &'ast [Instruction<'ast>],
    /// Source location
    pub span: Span,
}

/// A top-level code block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeBlock<'ast> {
    /// Instructions, in order
    pub instructions: &'ast [Instruction<'ast>],
}

impl<'ast> CodeBlock<'ast> {
    /// Iterate over the top-level function declarations.
    pub fn functions(self) -> impl Iterator<Item = &'ast FunctionDecl<'ast>> + 'ast {
        self.instructions.iter().filter_map(|instr| match instr {
            Instruction::FunctionDecl(decl) => Some(*decl),
            _ => None,
        })
    }
}

/// Builds AST nodes in an arena, rendering canonical source text.
///
/// Every node gets a point span on the current line, which starts at 1 and
/// is moved with [`AstBuilder::at_line`].
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    line: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder over an arena.
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            line: Cell::new(1),
        }
    }

    /// Place subsequently built nodes on `line`.
    pub fn at_line(&self, line: u32) -> &Self {
        self.line.set(line);
        self
    }

    fn span(&self) -> Span {
        Span::point(self.line.get(), 1)
    }

    fn literal(&self, kind: LiteralKind<'ast>, text: &str) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind,
            text: self.arena.alloc_str(text),
            span: self.span(),
        })
    }

    /// Integer literal.
    pub fn int(&self, value: i64) -> Expr<'ast> {
        self.literal(LiteralKind::Int(value), &value.to_string())
    }

    /// Float literal.
    pub fn float(&self, value: f64) -> Expr<'ast> {
        self.literal(LiteralKind::Float(value), &format!("{:?}", value))
    }

    /// Boolean literal.
    pub fn bool(&self, value: bool) -> Expr<'ast> {
        self.literal(LiteralKind::Bool(value), if value { "true" } else { "false" })
    }

    /// String literal.
    pub fn string(&self, value: &str) -> Expr<'ast> {
        let value: &'ast str = self.arena.alloc_str(value);
        self.literal(LiteralKind::String(value), &format!("\"{}\"", value))
    }

    /// The unit literal `()`.
    pub fn unit(&self) -> Expr<'ast> {
        self.literal(LiteralKind::Unit, "()")
    }

    /// Reference to a variable or function by name.
    pub fn var(&self, name: &str) -> Expr<'ast> {
        Expr::Var(VarExpr {
            ident: self.ident(name),
        })
    }

    /// The lambda placeholder `_`.
    pub fn placeholder(&self) -> Expr<'ast> {
        Expr::LambdaVar(LambdaVarExpr { span: self.span() })
    }

    /// Pair `(first,second)`.
    pub fn couple(&self, first: Expr<'ast>, second: Expr<'ast>) -> Expr<'ast> {
        let text = format!("({},{})", first.text(), second.text());
        Expr::Couple(self.arena.alloc(CoupleExpr {
            first,
            second,
            text: self.arena.alloc_str(&text),
            span: self.span(),
        }))
    }

    /// Lambda `{body}`.
    pub fn lambda(&self, body: Expr<'ast>) -> Expr<'ast> {
        let text = format!("{{{}}}", body.text());
        Expr::Lambda(self.arena.alloc(LambdaExpr {
            body,
            text: self.arena.alloc_str(&text),
            span: self.span(),
        }))
    }

    /// Call `name(args...)`.
    pub fn call(&self, name: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        let rendered: Vec<&str> = args.iter().map(|a| a.text()).collect();
        let text = format!("{}({})", name, rendered.join(","));
        Expr::Call(self.arena.alloc(CallExpr {
            callee: self.ident(name),
            args: self.arena.alloc_slice_copy(args),
            text: self.arena.alloc_str(&text),
            span: self.span(),
        }))
    }

    /// Bare expression instruction.
    pub fn expr(&self, expr: Expr<'ast>) -> Instruction<'ast> {
        Instruction::Expr(expr)
    }

    /// `return value`.
    pub fn ret(&self, value: Expr<'ast>) -> Instruction<'ast> {
        Instruction::Return(ReturnInstr {
            value,
            span: self.span(),
        })
    }

    /// Function declaration `name { body }`.
    pub fn function(&self, name: &str, body: &[Instruction<'ast>]) -> Instruction<'ast> {
        let span = self.span();
        Instruction::FunctionDecl(self.arena.alloc(FunctionDecl {
            name: self.ident(name),
            body: FunctionBody {
                instructions: self.arena.alloc_slice_copy(body),
                span,
            },
            span,
        }))
    }

    /// Function body made of `instructions`.
    pub fn body(&self, instructions: &[Instruction<'ast>]) -> FunctionBody<'ast> {
        FunctionBody {
            instructions: self.arena.alloc_slice_copy(instructions),
            span: self.span(),
        }
    }

    /// Top-level block.
    pub fn block(&self, instructions: &[Instruction<'ast>]) -> CodeBlock<'ast> {
        CodeBlock {
            instructions: self.arena.alloc_slice_copy(instructions),
        }
    }

    fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span())
    }
}
