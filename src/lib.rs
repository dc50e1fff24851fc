//! Etapa media del compilador de MiniLang.
//!
//! # Contrato de entrada
//! Cada programa llega como un árbol sintáctico ya construido, descrito
//! en [`ast`] junto con las posiciones de fuente de [`source`]. El
//! análisis léxico y sintáctico es responsabilidad de un colaborador
//! externo; esta crate asume árboles bien formados y solo responde por
//! su significado.
//!
//! # Fases
//! El árbol se somete primero a análisis semántico en [`semantic`], que
//! resuelve nombres contra la tabla de símbolos de [`scope`] y acumula
//! los diagnósticos descritos en [`error`] sin detenerse en el primero.
//! Únicamente cuando no se reportó ningún problema, [`lower`] baja el
//! árbol al código de tres direcciones descrito en [`ir`], con lo cual
//! concluye la etapa media.

pub mod ast;
pub mod error;
pub mod ir;
pub mod lower;
pub mod scope;
pub mod semantic;
pub mod source;

use crate::{
    ast::Program, error::Diagnostics, ir::Instruction, lower::Generator, semantic::Analyzer,
};

/// Corre la etapa media completa sobre un programa.
///
/// El código intermedio se genera solo si el análisis semántico terminó
/// sin diagnósticos; en caso contrario se devuelve el lote completo, en
/// orden de fuente.
pub fn compile(program: &Program) -> Result<Vec<Instruction>, Diagnostics> {
    let mut analyzer = Analyzer::new();

    if analyzer.analyze(program) {
        Ok(Generator::new().generate(program))
    } else {
        Err(Diagnostics::from(analyzer.into_diagnostics()))
    }
}
