//! Análisis semántico.
//!
//! Esta fase recorre el árbol completo una sola vez, resuelve nombres
//! contra la tabla de símbolos y tipa cada expresión contra el modelo
//! de tipos. Los errores se acumulan en una lista ordenada en lugar de
//! detener el recorrido, de modo que un solo análisis reporta todos los
//! problemas independientes del programa.

use thiserror::Error;

use std::{
    any::Any,
    fmt::{self, Display, Formatter},
    panic,
};

use crate::{
    ast::{BinOp, Expr, Identifier, Literal, Program, Statement, UnOp},
    error::{Category, Diagnostic},
    scope::SymbolTable,
    source::{Located, Position},
};

/// Tipo estático de una expresión de MiniLang.
///
/// `Error` es un centinela de envenenamiento: marca un subárbol ya
/// reportado para que sus dependientes no generen reportes duplicados.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    String,
    Boolean,
    Error,
}

impl Type {
    /// `true` para `int` y `float`.
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Tipo de una constante literal.
    pub fn of_literal(literal: &Literal) -> Type {
        match literal {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::Str(_) => Type::String,
            Literal::Bool(_) => Type::Boolean,
        }
    }

    /// Tipo resultante de un operador binario, o `Error` si la
    /// combinación es ilegal.
    ///
    /// Aritmética: concatenación para string+string y coerción a string
    /// si un solo operando de `+` es string; en lo demás ambos operandos
    /// deben ser numéricos y el resultado se promueve a `float` si
    /// cualquiera lo es. Igualdad: pares numéricos, booleanos o de
    /// strings. Relacionales: pares numéricos o de strings. Lógicos:
    /// solo booleanos.
    pub fn binary_result(left: Type, right: Type, op: BinOp) -> Type {
        if left == Type::Error || right == Type::Error {
            return Type::Error;
        }

        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                if left == Type::String && right == Type::String && op == BinOp::Add {
                    Type::String
                } else if !(left.is_numeric() && right.is_numeric()) {
                    if op == BinOp::Add && (left == Type::String || right == Type::String) {
                        Type::String
                    } else {
                        Type::Error
                    }
                } else if left == Type::Float || right == Type::Float {
                    Type::Float
                } else {
                    Type::Int
                }
            }

            BinOp::Equal | BinOp::NotEqual => {
                let comparable = (left.is_numeric() && right.is_numeric())
                    || (left == Type::Boolean && right == Type::Boolean)
                    || (left == Type::String && right == Type::String);

                if comparable {
                    Type::Boolean
                } else {
                    Type::Error
                }
            }

            BinOp::Less | BinOp::Greater | BinOp::LessOrEqual | BinOp::GreaterOrEqual => {
                let ordered = (left.is_numeric() && right.is_numeric())
                    || (left == Type::String && right == Type::String);

                if ordered {
                    Type::Boolean
                } else {
                    Type::Error
                }
            }

            BinOp::And | BinOp::Or => {
                if left == Type::Boolean && right == Type::Boolean {
                    Type::Boolean
                } else {
                    Type::Error
                }
            }
        }
    }

    /// Tipo resultante de un operador unario, o `Error` si es ilegal.
    pub fn unary_result(operand: Type, op: UnOp) -> Type {
        if operand == Type::Error {
            return Type::Error;
        }

        match op {
            UnOp::Not => {
                if operand == Type::Boolean || operand.is_numeric() {
                    Type::Boolean
                } else {
                    Type::Error
                }
            }

            UnOp::Negate => {
                if operand.is_numeric() {
                    operand
                } else {
                    Type::Error
                }
            }
        }
    }

    /// `true` si un valor de tipo `source` puede asignarse a una
    /// variable de este tipo: tipos iguales o ensanchamiento int→float.
    pub fn assignable_from(self, source: Type) -> bool {
        self == source || (self == Type::Float && source == Type::Int)
    }
}

impl Display for Type {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => fmt.write_str("int"),
            Type::Float => fmt.write_str("float"),
            Type::String => fmt.write_str("string"),
            Type::Boolean => fmt.write_str("boolean"),
            Type::Error => fmt.write_str("error"),
        }
    }
}

pub type Semantic<T> = Result<T, Located<SemanticError>>;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("Variable '{0}' ya declarada en este ámbito")]
    DuplicateDeclaration(Identifier),

    #[error("Variable '{0}' no declarada")]
    UndeclaredVariable(Identifier),

    #[error("Variable '{0}' no declarada antes de la asignación")]
    UndeclaredBeforeAssignment(Identifier),

    #[error("no se puede asignar tipo '{value}' a variable '{name}' de tipo '{target}'")]
    TypeMismatchAssignment {
        name: Identifier,
        target: Type,
        value: Type,
    },

    #[error("operador '{operator}' incompatible con tipos '{left}' y '{right}'")]
    TypeMismatchOperator {
        operator: BinOp,
        left: Type,
        right: Type,
    },

    #[error("operador '{operator}' incompatible con tipo '{operand}'")]
    TypeMismatchUnary { operator: UnOp, operand: Type },

    #[error("condición de {statement} debe ser booleana o numérica, no '{found}'")]
    InvalidConditionType {
        statement: &'static str,
        found: Type,
    },

    #[error("función '{0}' no definida")]
    UnknownFunction(Identifier),

    #[error("función '{name}' espera {expected} argumento, recibió {found}")]
    ArgumentCountMismatch {
        name: Identifier,
        expected: usize,
        found: usize,
    },

    #[error("función '{name}' espera un {expected}, recibió '{found}'")]
    ArgumentTypeMismatch {
        name: Identifier,
        expected: Type,
        found: Type,
    },

    #[error("{message}")]
    Internal {
        node: Option<&'static str>,
        message: String,
    },
}

impl SemanticError {
    /// Clase de reporte a la que pertenece el error.
    pub fn category(&self) -> Category {
        match self {
            SemanticError::DuplicateDeclaration(_)
            | SemanticError::UndeclaredVariable(_)
            | SemanticError::UndeclaredBeforeAssignment(_)
            | SemanticError::UnknownFunction(_) => Category::Semantic,

            SemanticError::TypeMismatchAssignment { .. }
            | SemanticError::TypeMismatchOperator { .. }
            | SemanticError::TypeMismatchUnary { .. }
            | SemanticError::InvalidConditionType { .. }
            | SemanticError::ArgumentTypeMismatch { .. } => Category::Type,

            SemanticError::ArgumentCountMismatch { .. } => Category::Argument,

            SemanticError::Internal { .. } => Category::Internal,
        }
    }
}

/// Nodo bajo análisis, usado como contexto de último recurso cuando se
/// sintetiza un diagnóstico interno.
#[derive(Copy, Clone)]
struct NodeContext {
    kind: &'static str,
    position: Option<Position>,
}

/// Recorrido de verificación semántica.
///
/// Cada instancia posee su propia tabla de símbolos y su propia lista de
/// diagnósticos; árboles independientes pueden analizarse con instancias
/// independientes. `analyze` reinicia todo el estado, así que una misma
/// instancia puede reutilizarse entre corridas.
pub struct Analyzer {
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    current: Option<NodeContext>,
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer {
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
            current: None,
        }
    }

    /// Analiza un programa completo.
    ///
    /// Devuelve `true` si no se acumuló ningún diagnóstico. La lista
    /// completa queda disponible en [`Analyzer::diagnostics`].
    pub fn analyze(&mut self, program: &Program) -> bool {
        self.symbols = SymbolTable::new();
        self.diagnostics.clear();
        self.current = None;

        // Ninguna falla interna debe escapar del análisis; un pánico
        // durante el recorrido se vuelve un diagnóstico con el último
        // nodo visitado como contexto. El estado parcial solo se lee
        // para reportar, por eso el AssertUnwindSafe.
        let walk = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            for statement in &program.statements {
                self.statement(statement);
            }
        }));

        if let Err(payload) = walk {
            self.internal(panic_text(payload));
        }

        self.diagnostics.is_empty()
    }

    /// Diagnósticos acumulados por la última corrida, en orden de fuente.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume el analizador y entrega los diagnósticos acumulados.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn report(&mut self, error: Located<SemanticError>) {
        self.diagnostics.push(Diagnostic::from(error));
    }

    fn internal(&mut self, message: String) {
        let node = self.current.map(|context| context.kind);
        let position = self.current.and_then(|context| context.position);

        self.diagnostics
            .push(Diagnostic::new(SemanticError::Internal { node, message }, position));
    }

    fn statement(&mut self, statement: &Statement) {
        let previous = self.current.replace(NodeContext {
            kind: statement.kind_name(),
            position: statement.position(),
        });

        match statement {
            Statement::VarDeclaration { name, init } => {
                let typ = match init {
                    Some(init) => self.expression_type(init),
                    None => Type::Int,
                };

                // La declaración procede aunque el inicializador sea
                // erróneo; el nombre queda registrado con tipo error
                if let Err(error) = self.symbols.declare(name, typ) {
                    self.report(error);
                }
            }

            Statement::Assignment { target, value } => match self.symbols.update(target) {
                Err(error) => self.report(error),

                Ok(target_type) => {
                    let value_type = self.expression_type(value);

                    if target_type != Type::Error
                        && value_type != Type::Error
                        && !target_type.assignable_from(value_type)
                    {
                        self.report(Located::at(
                            SemanticError::TypeMismatchAssignment {
                                name: target.as_ref().clone(),
                                target: target_type,
                                value: value_type,
                            },
                            target.position(),
                        ));
                    }
                }
            },

            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.condition(condition, "if");
                self.statement(then_branch);

                if let Some(else_branch) = else_branch {
                    self.statement(else_branch);
                }
            }

            Statement::While { condition, body } => {
                self.condition(condition, "while");
                self.statement(body);
            }

            Statement::For {
                init,
                condition,
                update,
                body,
            } => {
                // El encabezado del lazo vive en su propio ámbito; un
                // cuerpo que sea bloque abre además el suyo anidado
                self.symbols.enter_scope();

                if let Some(init) = init {
                    self.statement(init);
                }

                if let Some(condition) = condition {
                    self.condition(condition, "for");
                }

                if let Some(update) = update {
                    self.statement(update);
                }

                self.statement(body);
                self.symbols.exit_scope();
            }

            Statement::Print(values) => {
                for value in values {
                    self.expression_type(value);
                }
            }

            Statement::Input { target } => {
                if let Err(error) = self.symbols.lookup(target) {
                    self.report(error);
                }
            }

            Statement::Block(statements) => {
                self.symbols.enter_scope();

                for statement in statements {
                    self.statement(statement);
                }

                self.symbols.exit_scope();
            }
        }

        self.current = previous;
    }

    /// Verifica la condición de un `if`, `while` o `for`.
    ///
    /// Una condición de tipo error pasa en silencio: ya fue reportada
    /// en su origen.
    fn condition(&mut self, condition: &Expr, statement: &'static str) {
        let found = self.expression_type(condition);

        if !matches!(
            found,
            Type::Boolean | Type::Int | Type::Float | Type::Error
        ) {
            self.report(Located::at(
                SemanticError::InvalidConditionType { statement, found },
                condition.position(),
            ));
        }
    }

    /// Resuelve el tipo de una expresión, reportando violaciones.
    ///
    /// Toda expresión resuelve a exactamente un tipo; los subárboles
    /// envenenados resuelven a error sin reportes adicionales.
    fn expression_type(&mut self, expr: &Expr) -> Type {
        let previous = self.current.replace(NodeContext {
            kind: expr.kind_name(),
            position: Some(expr.position()),
        });

        let typ = match expr {
            Expr::Literal(literal) => Type::of_literal(literal.as_ref()),

            Expr::Variable(name) => match self.symbols.lookup(name) {
                Ok(typ) => typ,
                Err(error) => {
                    self.report(error);
                    Type::Error
                }
            },

            Expr::Binary { op, left, right } => {
                let left = self.expression_type(left);
                let right = self.expression_type(right);

                if left == Type::Error || right == Type::Error {
                    Type::Error
                } else {
                    let result = Type::binary_result(left, right, *op.as_ref());

                    if result == Type::Error {
                        self.report(Located::at(
                            SemanticError::TypeMismatchOperator {
                                operator: *op.as_ref(),
                                left,
                                right,
                            },
                            op.position(),
                        ));
                    }

                    result
                }
            }

            Expr::Unary { op, operand } => {
                let operand = self.expression_type(operand);

                if operand == Type::Error {
                    Type::Error
                } else {
                    let result = Type::unary_result(operand, *op.as_ref());

                    if result == Type::Error {
                        self.report(Located::at(
                            SemanticError::TypeMismatchUnary {
                                operator: *op.as_ref(),
                                operand,
                            },
                            op.position(),
                        ));
                    }

                    result
                }
            }

            Expr::Call { target, arguments } => {
                let argument_types: Vec<Type> = arguments
                    .iter()
                    .map(|argument| self.expression_type(argument))
                    .collect();

                if argument_types.contains(&Type::Error) {
                    Type::Error
                } else if target.as_ref().as_str() == "len" {
                    if argument_types.len() != 1 {
                        self.report(Located::at(
                            SemanticError::ArgumentCountMismatch {
                                name: target.as_ref().clone(),
                                expected: 1,
                                found: argument_types.len(),
                            },
                            target.position(),
                        ));

                        Type::Error
                    } else if argument_types[0] != Type::String {
                        self.report(Located::at(
                            SemanticError::ArgumentTypeMismatch {
                                name: target.as_ref().clone(),
                                expected: Type::String,
                                found: argument_types[0],
                            },
                            target.position(),
                        ));

                        Type::Error
                    } else {
                        Type::Int
                    }
                } else {
                    self.report(Located::at(
                        SemanticError::UnknownFunction(target.as_ref().clone()),
                        target.position(),
                    ));

                    Type::Error
                }
            }
        };

        self.current = previous;
        typ
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new()
    }
}

/// Extrae el texto descriptivo de un pánico capturado.
fn panic_text(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(_) => String::from("falla interna sin descripción"),
        },
    }
}
