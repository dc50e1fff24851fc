use crate::{
    semantic::SemanticError,
    source::{Located, Position},
};
use std::fmt::{self, Display, Formatter};

/// Clase de un diagnóstico; determina el encabezado del reporte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Semantic,
    Type,
    Argument,
    Internal,
}

/// Un error semántico junto con la posición de fuente donde ocurrió,
/// si se conoce.
#[derive(Debug)]
pub struct Diagnostic {
    error: SemanticError,
    position: Option<Position>,
}

impl Diagnostic {
    pub fn new(error: SemanticError, position: Option<Position>) -> Self {
        Diagnostic { error, position }
    }

    pub fn error(&self) -> &SemanticError {
        &self.error
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

impl From<Located<SemanticError>> for Diagnostic {
    fn from(error: Located<SemanticError>) -> Self {
        let (position, error) = error.split();

        Diagnostic {
            error,
            position: Some(position),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self.error.category() {
            Category::Semantic => match self.position {
                Some(position) => write!(
                    fmt,
                    "Error semántico en línea {}, columna {}: {}",
                    position.line(),
                    position.column(),
                    self.error
                ),

                None => write!(fmt, "Error semántico: {}", self.error),
            },

            Category::Type => {
                fmt.write_str("Error de tipo en ")?;
                short_clause(fmt, self.position)?;
                write!(fmt, ": {}", self.error)
            }

            Category::Argument => {
                fmt.write_str("Error de argumento en ")?;
                short_clause(fmt, self.position)?;
                write!(fmt, ": {}", self.error)
            }

            Category::Internal => {
                fmt.write_str("Error interno del analizador")?;

                if let Some(position) = self.position {
                    write!(
                        fmt,
                        " cerca de línea {}, columna {}",
                        position.line(),
                        position.column()
                    )?;
                }

                if let SemanticError::Internal {
                    node: Some(node), ..
                } = &self.error
                {
                    write!(fmt, " (Nodo: {})", node)?;
                }

                write!(fmt, ": {}", self.error)
            }
        }
    }
}

// Los reportes de tipo y argumento abrevian "columna" y conservan la
// cláusula con comodines cuando la posición se desconoce
fn short_clause(fmt: &mut Formatter<'_>, position: Option<Position>) -> fmt::Result {
    match position {
        Some(position) => write!(fmt, "línea {}, col {}", position.line(), position.column()),
        None => fmt.write_str("línea ?, col ?"),
    }
}

/// Lote ordenado de diagnósticos de una corrida del analizador.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Diagnostics {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Diagnostics { diagnostics }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        let Diagnostics { diagnostics } = self;

        if diagnostics.is_empty() {
            return writeln!(fmt, "No se encontraron errores");
        }

        writeln!(fmt, "Errores semánticos encontrados:")?;

        for (index, diagnostic) in diagnostics.iter().enumerate() {
            writeln!(fmt, "  {}. {}", index + 1, diagnostic)?;
        }

        Ok(())
    }
}
