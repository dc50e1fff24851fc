//! Tabla de símbolos con ámbitos léxicos.

use std::collections::HashMap;

use crate::{
    ast::Identifier,
    semantic::{Semantic, SemanticError, Type},
    source::{Located, Position},
};

/// Información registrada para un nombre declarado.
#[derive(Debug, Clone)]
pub struct Symbol {
    typ: Type,
    declared_at: Position,
}

impl Symbol {
    /// Tipo fijado en la declaración; no cambia durante la vida del nombre.
    pub fn typ(&self) -> Type {
        self.typ
    }

    /// Posición del token de nombre en la declaración.
    pub fn declared_at(&self) -> Position {
        self.declared_at
    }
}

/// Los nombres declarados directamente en un ámbito.
#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<Identifier, Symbol>,
}

/// Pila de ámbitos léxicos.
///
/// El ámbito global existe desde la construcción y nunca se desapila;
/// cada bloque o encabezado de lazo apila un ámbito al entrar y lo
/// desapila al salir. Ocultar un nombre de un ámbito exterior es válido.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    /// Cantidad de ámbitos actualmente apilados.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Apila un ámbito nuevo.
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Desapila el ámbito más interno. En el ámbito global no hace nada.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declara un nombre en el ámbito más interno.
    ///
    /// Falla únicamente si ese mismo ámbito ya contiene el nombre.
    pub fn declare(&mut self, name: &Located<Identifier>, typ: Type) -> Semantic<()> {
        match self.scopes.last_mut() {
            Some(scope) => {
                if scope.symbols.contains_key(name.as_ref()) {
                    Err(Located::at(
                        SemanticError::DuplicateDeclaration(name.as_ref().clone()),
                        name.position(),
                    ))
                } else {
                    let symbol = Symbol {
                        typ,
                        declared_at: name.position(),
                    };

                    scope.symbols.insert(name.as_ref().clone(), symbol);
                    Ok(())
                }
            }

            // new() siembra el ámbito global y exit_scope nunca lo desapila
            None => unreachable!(),
        }
    }

    /// Resuelve un nombre buscando del ámbito más interno hacia afuera.
    pub fn lookup(&self, name: &Located<Identifier>) -> Semantic<Type> {
        self.symbol(name.as_ref()).map(Symbol::typ).ok_or_else(|| {
            Located::at(
                SemanticError::UndeclaredVariable(name.as_ref().clone()),
                name.position(),
            )
        })
    }

    /// Verifica que un nombre ya esté declarado antes de asignarlo.
    ///
    /// No altera el tipo registrado; solo lo devuelve para que la
    /// asignación pueda comprobar compatibilidad.
    pub fn update(&self, name: &Located<Identifier>) -> Semantic<Type> {
        self.symbol(name.as_ref()).map(Symbol::typ).ok_or_else(|| {
            Located::at(
                SemanticError::UndeclaredBeforeAssignment(name.as_ref().clone()),
                name.position(),
            )
        })
    }

    /// Busca el símbolo visible para un nombre, si alguno.
    pub fn symbol(&self, name: &Identifier) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str, line: u32, column: u32) -> Located<Identifier> {
        Located::at(Identifier::from(text), Position::new(line, column))
    }

    #[test]
    fn declared_name_resolves_to_its_type() {
        let mut table = SymbolTable::new();
        table.declare(&name("x", 1, 5), Type::Float).unwrap();

        assert_eq!(table.lookup(&name("x", 2, 1)).unwrap(), Type::Float);
    }

    #[test]
    fn duplicate_in_same_scope_is_rejected() {
        let mut table = SymbolTable::new();
        table.declare(&name("x", 1, 5), Type::Int).unwrap();

        let error = table.declare(&name("x", 2, 5), Type::Int).unwrap_err();
        assert!(matches!(
            error.as_ref(),
            SemanticError::DuplicateDeclaration(_)
        ));
        assert_eq!(error.position(), Position::new(2, 5));
    }

    #[test]
    fn shadowing_in_nested_scope_is_legal() {
        let mut table = SymbolTable::new();
        table.declare(&name("x", 1, 5), Type::Int).unwrap();

        table.enter_scope();
        table.declare(&name("x", 3, 9), Type::String).unwrap();
        assert_eq!(table.lookup(&name("x", 4, 1)).unwrap(), Type::String);

        let inner = table.symbol(&Identifier::from("x")).unwrap();
        assert_eq!(inner.declared_at(), Position::new(3, 9));

        table.exit_scope();
        assert_eq!(table.lookup(&name("x", 6, 1)).unwrap(), Type::Int);
    }

    #[test]
    fn outer_names_are_visible_from_inner_scopes() {
        let mut table = SymbolTable::new();
        table.declare(&name("total", 1, 5), Type::Int).unwrap();

        table.enter_scope();
        table.enter_scope();
        assert_eq!(table.lookup(&name("total", 5, 1)).unwrap(), Type::Int);
    }

    #[test]
    fn missing_name_fails_lookup_and_update() {
        let table = SymbolTable::new();

        let lookup = table.lookup(&name("x", 1, 1)).unwrap_err();
        assert!(matches!(
            lookup.as_ref(),
            SemanticError::UndeclaredVariable(_)
        ));

        let update = table.update(&name("x", 2, 1)).unwrap_err();
        assert!(matches!(
            update.as_ref(),
            SemanticError::UndeclaredBeforeAssignment(_)
        ));
    }

    #[test]
    fn update_sees_outer_declarations_without_retyping() {
        let mut table = SymbolTable::new();
        table.declare(&name("x", 1, 5), Type::Boolean).unwrap();

        table.enter_scope();
        assert_eq!(table.update(&name("x", 3, 1)).unwrap(), Type::Boolean);
        assert_eq!(table.lookup(&name("x", 3, 1)).unwrap(), Type::Boolean);
    }

    #[test]
    fn global_scope_survives_exit() {
        let mut table = SymbolTable::new();
        table.declare(&name("x", 1, 5), Type::Int).unwrap();

        table.exit_scope();
        table.exit_scope();

        assert_eq!(table.depth(), 1);
        assert_eq!(table.lookup(&name("x", 9, 1)).unwrap(), Type::Int);
    }

    #[test]
    fn scopes_nest_and_unwind() {
        let mut table = SymbolTable::new();
        assert_eq!(table.depth(), 1);

        table.enter_scope();
        table.enter_scope();
        assert_eq!(table.depth(), 3);

        table.exit_scope();
        assert_eq!(table.depth(), 2);
    }
}
