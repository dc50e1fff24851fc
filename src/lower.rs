//! Bajada del árbol verificado a código de tres direcciones.

use std::mem;

use crate::{
    ast::{Expr, Program, Statement},
    ir::{Instruction, Label, Temp},
};

/// Generador de código intermedio.
///
/// La bajada es total: todo árbol bien formado produce un listado, por
/// lo que el llamador debe correr el análisis semántico antes y generar
/// código solo cuando no hubo diagnósticos.
pub struct Generator {
    code: Vec<Instruction>,
    temps: u32,
    labels: u32,
}

impl Generator {
    pub fn new() -> Self {
        Generator {
            code: Vec::new(),
            temps: 0,
            labels: 0,
        }
    }

    /// Baja un programa completo a su listado de instrucciones.
    ///
    /// Los contadores de temporales y etiquetas se reinician en cada
    /// corrida; generar dos veces el mismo árbol produce listados
    /// idénticos.
    pub fn generate(&mut self, program: &Program) -> Vec<Instruction> {
        self.code.clear();
        self.temps = 0;
        self.labels = 0;

        for statement in &program.statements {
            self.statement(statement);
        }

        mem::take(&mut self.code)
    }

    fn temp(&mut self) -> Temp {
        let temp = Temp(self.temps);
        self.temps += 1;

        temp
    }

    fn label(&mut self) -> Label {
        let label = Label(self.labels);
        self.labels += 1;

        label
    }

    fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VarDeclaration { name, init } => {
                // Sin inicializador no hay instrucción; la variable
                // existe solo en la tabla de símbolos
                if let Some(init) = init {
                    let value = self.expression(init);
                    self.emit(Instruction::Store(value, name.as_ref().clone()));
                }
            }

            Statement::Assignment { target, value } => {
                let value = self.expression(value);
                self.emit(Instruction::Store(value, target.as_ref().clone()));
            }

            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let checked = self.expression(condition);
                let else_label = self.label();

                match else_branch {
                    // Sin rama alterna la etiqueta de else sirve de fin
                    None => {
                        self.emit(Instruction::JumpIfFalse(checked, else_label));
                        self.statement(then_branch);
                        self.emit(Instruction::SetLabel(else_label));
                    }

                    Some(else_branch) => {
                        let end_label = self.label();

                        self.emit(Instruction::JumpIfFalse(checked, else_label));
                        self.statement(then_branch);
                        self.emit(Instruction::Jump(end_label));
                        self.emit(Instruction::SetLabel(else_label));
                        self.statement(else_branch);
                        self.emit(Instruction::SetLabel(end_label));
                    }
                }
            }

            Statement::While { condition, body } => {
                let start = self.label();
                let end = self.label();

                self.emit(Instruction::SetLabel(start));
                let checked = self.expression(condition);
                self.emit(Instruction::JumpIfFalse(checked, end));
                self.statement(body);
                self.emit(Instruction::Jump(start));
                self.emit(Instruction::SetLabel(end));
            }

            Statement::For {
                init,
                condition,
                update,
                body,
            } => {
                let start = self.label();
                let check = self.label();
                let advance = self.label();
                let end = self.label();

                if let Some(init) = init {
                    self.statement(init);
                }

                // La condición se evalúa al final del cuerpo; la primera
                // vuelta salta directo al punto de chequeo
                self.emit(Instruction::Jump(check));
                self.emit(Instruction::SetLabel(start));
                self.statement(body);

                self.emit(Instruction::SetLabel(advance));
                if let Some(update) = update {
                    self.statement(update);
                }

                self.emit(Instruction::SetLabel(check));
                match condition {
                    Some(condition) => {
                        let checked = self.expression(condition);
                        self.emit(Instruction::JumpIfTrue(checked, start));
                    }

                    None => self.emit(Instruction::Jump(start)),
                }

                self.emit(Instruction::SetLabel(end));
            }

            Statement::Print(values) => {
                for value in values {
                    let value = self.expression(value);
                    self.emit(Instruction::Print(value));
                }
            }

            Statement::Input { target } => {
                self.emit(Instruction::Input(target.as_ref().clone()));
            }

            Statement::Block(statements) => {
                for statement in statements {
                    self.statement(statement);
                }
            }
        }
    }

    /// Baja una expresión y devuelve el temporal que guarda su valor.
    fn expression(&mut self, expr: &Expr) -> Temp {
        match expr {
            Expr::Literal(literal) => {
                let dst = self.temp();
                self.emit(Instruction::LoadConst(literal.as_ref().clone(), dst));

                dst
            }

            Expr::Variable(name) => {
                let dst = self.temp();
                self.emit(Instruction::LoadVar(name.as_ref().clone(), dst));

                dst
            }

            Expr::Binary { op, left, right } => {
                let left = self.expression(left);
                let right = self.expression(right);
                let dst = self.temp();

                self.emit(Instruction::Binary {
                    op: *op.as_ref(),
                    dst,
                    left,
                    right,
                });

                dst
            }

            Expr::Unary { op, operand } => {
                let operand = self.expression(operand);
                let dst = self.temp();

                self.emit(Instruction::Unary {
                    op: *op.as_ref(),
                    dst,
                    operand,
                });

                dst
            }

            Expr::Call { target, arguments } => {
                let arguments: Vec<Temp> = arguments
                    .iter()
                    .map(|argument| self.expression(argument))
                    .collect();
                let output = self.temp();

                self.emit(Instruction::Call {
                    target: target.as_ref().clone(),
                    arguments,
                    output,
                });

                output
            }
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new()
    }
}
