//! Expression compilation.
//!
//! Every expression compiles to code that leaves at most one value on the
//! operand stack, and pushes that value's type onto the compiler's
//! [`TypeStack`](crate::type_stack::TypeStack). A call to a function
//! returning `Unit` is the only expression that leaves nothing.
//!
//! Types are decided by translation first, then code is emitted: pair
//! element checks and argument promotion never leave partial code behind
//! a type error.

mod calls;
mod couple;
mod identifiers;
mod literals;

use euclin_core::ast::Expr;
use euclin_core::{Result, TypeDefinition};

use crate::function_compiler::FunctionCompiler;

impl<'a, 'u> FunctionCompiler<'a, 'u> {
    /// Compile an expression, pushing the type of the value it produces.
    pub(crate) fn compile_expr(&mut self, expr: &Expr<'_>) -> Result<()> {
        self.enter(expr.span())?;
        let result = match expr {
            Expr::Literal(lit) => literals::compile_literal(self, lit),
            Expr::Couple(couple) => couple::compile_couple(self, couple),
            Expr::Var(var) => identifiers::compile_var(self, var),
            Expr::LambdaVar(placeholder) => identifiers::compile_placeholder(self, placeholder),
            Expr::Lambda(lambda) => identifiers::compile_lambda(self, lambda),
            Expr::Call(call) => calls::compile_call(self, call),
        };
        self.leave();
        result
    }

    /// Compile an expression whose value is consumed right away.
    ///
    /// Exactly one value is left on the machine stack; a `Unit` call is
    /// followed by the unit value. The value's type is popped from the type
    /// stack and returned to the consumer.
    pub(crate) fn compile_operand(&mut self, expr: &Expr<'_>) -> Result<TypeDefinition> {
        let before = self.stack().len();
        self.compile_expr(expr)?;
        if self.stack().len() == before {
            self.emitter().emit_unit();
            self.stack().push(TypeDefinition::NoValue);
        }
        self.stack().pop(expr.text(), expr.span())
    }
}
