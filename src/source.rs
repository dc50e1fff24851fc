//! Rastreo de ubicaciones originales en código fuente.
//!
//! Los distintos objetos internos que el compilador construye
//! deben llevar cuenta de posiciones en el código fuente original,
//! lo cual permite determinar un punto exacto o aproximado en donde
//! ocurre un error de abstracción arbitraria.
//!
//! El analizador léxico y el parser son colaboradores externos; este
//! módulo define el modelo de posiciones que ese frontend debe anotar
//! en cada token del árbol que entrega.

use std::fmt::{self, Display, Formatter};

/// Un objeto cualquiera con una posición original asociada.
#[derive(Debug, Clone)]
pub struct Located<T> {
    position: Position,
    value: T,
}

impl<T> Located<T> {
    /// Construye a partir de un valor y una posición.
    pub fn at(value: T, position: Position) -> Self {
        Located { value, position }
    }

    /// Obtiene la posición.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Descarta la posición y toma ownership del valor.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Descompone y toma ownership de las dos partes.
    pub fn split(self) -> (Position, T) {
        (self.position, self.value)
    }

    /// Transforma el valor con la misma posición.
    pub fn map<U, F>(self, map: F) -> Located<U>
    where
        F: FnOnce(T) -> U,
    {
        Located {
            value: map(self.value),
            position: self.position,
        }
    }
}

impl<T> AsRef<T> for Located<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Una posición línea-columna en un archivo.
///
/// Ambos componentes comienzan en 1, como los reporta un editor.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    /// Construye una posición explícita.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Obtiene el número de línea.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Obtiene el número de columna.
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl Display for Position {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_displays_line_and_column() {
        assert_eq!(Position::new(3, 14).to_string(), "3:14");
    }

    #[test]
    fn default_position_is_file_start() {
        let position = Position::default();
        assert_eq!((position.line(), position.column()), (1, 1));
    }

    #[test]
    fn located_map_preserves_position() {
        let number = Located::at(21, Position::new(2, 7));
        let doubled = number.map(|n| n * 2);
        assert_eq!(*doubled.as_ref(), 42);
        assert_eq!(doubled.position(), Position::new(2, 7));
    }

    #[test]
    fn located_split_returns_both_parts() {
        let (position, value) = Located::at("x", Position::new(1, 5)).split();
        assert_eq!(position, Position::new(1, 5));
        assert_eq!(value, "x");
    }
}
