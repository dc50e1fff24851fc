//! Árbol de sintaxis abstracta de MiniLang.
//!
//! El analizador léxico y el parser son colaboradores externos: este
//! módulo es el contrato que ese frontend debe satisfacer. El árbol es
//! un conjunto cerrado de variantes; cada nodo conserva los tokens de
//! nombre, operador o literal con su posición original para que las
//! fases semánticas puedan reportar líneas y columnas exactas.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::source::{Located, Position};

/// Un identificador del programa fuente.
///
/// Los identificadores de MiniLang distinguen mayúsculas de minúsculas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(Rc<str>);

impl Identifier {
    /// Obtiene el nombre como texto plano.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier(Rc::from(name))
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Identifier(Rc::from(name))
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(fmt)
    }
}

/// Programa completo: la secuencia de sentencias de nivel superior.
#[derive(Debug)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Una sentencia del programa.
#[derive(Debug)]
pub enum Statement {
    /// Declaración `var nombre = valor;`, con inicializador opcional.
    VarDeclaration {
        name: Located<Identifier>,
        init: Option<Expr>,
    },

    Assignment {
        target: Located<Identifier>,
        value: Expr,
    },

    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },

    While {
        condition: Expr,
        body: Box<Statement>,
    },

    /// Lazo `for`. Las tres ranuras del encabezado son opcionales; `init`
    /// y `update` son sentencias (declaración o asignación).
    For {
        init: Option<Box<Statement>>,
        condition: Option<Expr>,
        update: Option<Box<Statement>>,
        body: Box<Statement>,
    },

    Print(Vec<Expr>),

    Input {
        target: Located<Identifier>,
    },

    Block(Vec<Statement>),
}

impl Statement {
    /// Nombre del tipo de nodo, como aparece en reportes internos.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::VarDeclaration { .. } => "VarDeclaration",
            Statement::Assignment { .. } => "Assignment",
            Statement::If { .. } => "IfStatement",
            Statement::While { .. } => "WhileLoop",
            Statement::For { .. } => "ForLoop",
            Statement::Print(_) => "PrintStatement",
            Statement::Input { .. } => "InputStatement",
            Statement::Block(_) => "Block",
        }
    }

    /// Mejor posición disponible para señalar esta sentencia.
    ///
    /// No toda sentencia conserva un token propio (un bloque vacío no
    /// tiene ninguno), por lo que el resultado es opcional.
    pub fn position(&self) -> Option<Position> {
        match self {
            Statement::VarDeclaration { name, .. } => Some(name.position()),
            Statement::Assignment { target, .. } => Some(target.position()),
            Statement::If { condition, .. } => Some(condition.position()),
            Statement::While { condition, .. } => Some(condition.position()),
            Statement::For {
                init,
                condition,
                update,
                body,
            } => init
                .as_ref()
                .and_then(|init| init.position())
                .or_else(|| condition.as_ref().map(Expr::position))
                .or_else(|| update.as_ref().and_then(|update| update.position()))
                .or_else(|| body.position()),
            Statement::Print(values) => values.first().map(Expr::position),
            Statement::Input { target } => Some(target.position()),
            Statement::Block(statements) => {
                statements.iter().find_map(Statement::position)
            }
        }
    }
}

/// Una expresión del programa.
#[derive(Debug)]
pub enum Expr {
    Literal(Located<Literal>),

    Variable(Located<Identifier>),

    Binary {
        op: Located<BinOp>,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary {
        op: Located<UnOp>,
        operand: Box<Expr>,
    },

    Call {
        target: Located<Identifier>,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    /// Nombre del tipo de nodo, como aparece en reportes internos.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "Literal",
            Expr::Variable(_) => "Variable",
            Expr::Binary { .. } => "BinaryOp",
            Expr::Unary { .. } => "UnaryOp",
            Expr::Call { .. } => "FunctionCall",
        }
    }

    /// Posición del token principal de la expresión.
    pub fn position(&self) -> Position {
        match self {
            Expr::Literal(literal) => literal.position(),
            Expr::Variable(name) => name.position(),
            Expr::Binary { op, .. } => op.position(),
            Expr::Unary { op, .. } => op.position(),
            Expr::Call { target, .. } => target.position(),
        }
    }
}

/// Una constante literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Float(f64),
    Str(Rc<str>),
    Bool(bool),
}

impl Display for Literal {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(fmt, "{}", value),
            // {:?} conserva la parte decimal de flotantes exactos: 5.0, no 5
            Literal::Float(value) => write!(fmt, "{:?}", value),
            Literal::Str(value) => write!(fmt, "\"{}\"", value),
            Literal::Bool(value) => write!(fmt, "{}", value),
        }
    }
}

/// Operador binario, en su grafía del lenguaje fuente.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    And,
    Or,
}

impl Display for BinOp {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessOrEqual => "<=",
            BinOp::GreaterOrEqual => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        })
    }
}

/// Operador unario, en su grafía del lenguaje fuente.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Negate,
}

impl Display for UnOp {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            UnOp::Not => "!",
            UnOp::Negate => "-",
        })
    }
}
